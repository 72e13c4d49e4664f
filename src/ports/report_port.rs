//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::DipbuyerError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        code: &str,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), DipbuyerError>;
}

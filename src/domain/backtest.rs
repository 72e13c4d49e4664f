//! Backtest configuration and the end-to-end run pipeline.

use chrono::NaiveDate;

use crate::domain::error::DipbuyerError;
use crate::domain::indicator::compute_indicators;
use crate::domain::price::PricePoint;
use crate::domain::signal::generate_signals;
use crate::domain::simulator::{simulate, SimulationResult};
use crate::domain::stats::Summary;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    /// Stop-loss distance in price points below the entry close.
    pub stop_loss: f64,
    /// Currency value of one price point per contract.
    pub contract_value_per_point: f64,
    /// Units per position. Fixed at 1.0 in current behavior; not read
    /// from configuration.
    pub position_size: f64,
}

impl BacktestConfig {
    /// Fail-fast parameter check, run before any simulation starts.
    pub fn validate(&self) -> Result<(), DipbuyerError> {
        if self.initial_capital <= 0.0 {
            return Err(invalid("initial_capital", "must be positive"));
        }
        if self.stop_loss <= 0.0 {
            return Err(invalid("stop_loss", "must be positive"));
        }
        if self.contract_value_per_point <= 0.0 {
            return Err(invalid("contract_value_per_point", "must be positive"));
        }
        if self.position_size <= 0.0 {
            return Err(invalid("position_size", "must be positive"));
        }
        if self.start_date >= self.end_date {
            return Err(invalid("start_date", "must be before end_date"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParams {
    /// Long moving-average window (trend filter).
    pub sma_long: usize,
    /// Short moving-average window (exit trigger).
    pub sma_short: usize,
    /// Width of the elapsed window the down-day count looks at.
    pub down_day_window: usize,
    /// Down days required inside that window to arm the entry.
    pub min_down_days: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            sma_long: 200,
            sma_short: 5,
            down_day_window: 3,
            min_down_days: 3,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), DipbuyerError> {
        if self.sma_long == 0 {
            return Err(invalid_strategy("sma_long", "must be at least 1"));
        }
        if self.sma_short == 0 {
            return Err(invalid_strategy("sma_short", "must be at least 1"));
        }
        if self.down_day_window == 0 {
            return Err(invalid_strategy("down_day_window", "must be at least 1"));
        }
        if self.min_down_days as usize > self.down_day_window {
            return Err(invalid_strategy(
                "min_down_days",
                "cannot exceed down_day_window",
            ));
        }
        Ok(())
    }

    /// Bars needed before any entry signal can fire.
    pub fn warmup_bars(&self) -> usize {
        self.sma_long.max(self.down_day_window + 1)
    }
}

fn invalid(key: &str, reason: &str) -> DipbuyerError {
    DipbuyerError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: format!("{key} {reason}"),
    }
}

fn invalid_strategy(key: &str, reason: &str) -> DipbuyerError {
    DipbuyerError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: format!("{key} {reason}"),
    }
}

/// Everything a run produces: the raw simulation output plus the
/// derived grand-total summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub simulation: SimulationResult,
    pub summary: Summary,
    pub initial_capital: f64,
}

/// Run the full pipeline over one instrument's series:
/// indicators → signals → simulation → summary.
///
/// A series shorter than the indicator warmup is not an error: no
/// signal fires and the run completes with zero trades and a flat
/// capital trace.
pub fn run_backtest(
    prices: &[PricePoint],
    params: &StrategyParams,
    config: &BacktestConfig,
) -> Result<BacktestResult, DipbuyerError> {
    config.validate()?;
    params.validate()?;

    let indicators = compute_indicators(prices, params);
    let signals = generate_signals(prices, &indicators, params);
    let simulation = simulate(prices, &signals, config);

    let summary = Summary::compute(
        &simulation.years,
        config.initial_capital,
        simulation.final_capital,
    );

    Ok(BacktestResult {
        simulation,
        summary,
        initial_capital: config.initial_capital,
    })
}

//! Data access port trait.

use crate::domain::error::DipbuyerError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Fetch the daily series for one instrument, chronologically
    /// ordered and bounded to the date range.
    fn fetch_prices(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, DipbuyerError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, DipbuyerError>;

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipbuyerError>;
}

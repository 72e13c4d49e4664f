#![allow(dead_code)]

use chrono::NaiveDate;
use dipbuyer::domain::backtest::{BacktestConfig, StrategyParams};
use dipbuyer::domain::error::DipbuyerError;
pub use dipbuyer::domain::price::PricePoint;
use dipbuyer::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, code: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(code.to_string(), prices);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        code: &str,
        _exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, DipbuyerError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(DipbuyerError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect())
    }

    fn list_symbols(&self, _exchange: &str) -> Result<Vec<String>, DipbuyerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        _exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipbuyerError> {
        match self.data.get(code) {
            Some(prices) if !prices.is_empty() => {
                let min = prices.iter().map(|p| p.date).min().unwrap();
                let max = prices.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, prices.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_point(day: NaiveDate, open: f64, close: f64) -> PricePoint {
    PricePoint {
        date: day,
        open,
        close,
    }
}

/// Sequential daily series starting at `start`, one point per (open, close).
pub fn make_series(start: NaiveDate, bars: &[(f64, f64)]) -> Vec<PricePoint> {
    bars.iter()
        .enumerate()
        .map(|(i, &(open, close))| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            open,
            close,
        })
        .collect()
}

/// Flat series: every day opens and closes at `close`.
pub fn flat_series(start: NaiveDate, len: usize, close: f64) -> Vec<PricePoint> {
    make_series(start, &vec![(close, close); len])
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(1997, 1, 1),
        end_date: date(2024, 6, 30),
        initial_capital: 1000.0,
        stop_loss: 10.0,
        contract_value_per_point: 20.0,
        position_size: 1.0,
    }
}

/// Reduced windows so entries fire on short hand-built series.
pub fn small_params() -> StrategyParams {
    StrategyParams {
        sma_long: 4,
        sma_short: 2,
        down_day_window: 3,
        min_down_days: 3,
    }
}

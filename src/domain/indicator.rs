//! Rolling indicator calculations over daily price series.
//!
//! Two warmup conventions coexist here and both are load-bearing:
//! moving averages are invalid until a full window has elapsed, while
//! the consecutive-down-day count is zero-filled from day one. Signal
//! generation relies on the difference.

use chrono::NaiveDate;

use crate::domain::backtest::StrategyParams;
use crate::domain::price::PricePoint;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

/// Indicator series aligned index-for-index with the price series.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    pub sma_long: Vec<IndicatorPoint>,
    pub sma_short: Vec<IndicatorPoint>,
    pub consec_down: Vec<u32>,
}

pub fn compute_indicators(prices: &[PricePoint], params: &StrategyParams) -> Indicators {
    Indicators {
        sma_long: sma(prices, params.sma_long),
        sma_short: sma(prices, params.sma_short),
        consec_down: consec_down_days(prices, params.down_day_window),
    }
}

/// Simple moving average of closes over the trailing `period` bars.
///
/// O(n) running-sum window. The first `period - 1` points are invalid.
pub fn sma(prices: &[PricePoint], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || prices.is_empty() {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(prices.len());
    let mut window_sum: f64 = 0.0;

    for (i, bar) in prices.iter().enumerate() {
        window_sum += bar.close;
        if i >= period {
            window_sum -= prices[i - period].close;
        }

        let valid = i >= period - 1;
        let value = if valid { window_sum / period as f64 } else { 0.0 };

        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value,
        });
    }

    values
}

/// Count of down days (close < open) in the `window` days strictly
/// before each day.
///
/// The count at day t covers {t-window, ..., t-1}: it reflects state
/// before today's bar, so today's own close cannot feed its entry
/// signal. The first `window` days carry a count of zero, not an
/// invalid marker.
pub fn consec_down_days(prices: &[PricePoint], window: usize) -> Vec<u32> {
    let mut counts = vec![0u32; prices.len()];
    if window == 0 {
        return counts;
    }

    let mut running: u32 = 0;
    for (t, bar) in prices.iter().enumerate() {
        if t >= window {
            counts[t] = running;
        }
        if bar.is_down_day() {
            running += 1;
        }
        if t >= window && prices[t - window].is_down_day() {
            running -= 1;
        }
    }

    counts
}

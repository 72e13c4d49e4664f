//! Entry/exit condition evaluation.
//!
//! Stateless per-day boolean combination of indicator values. A
//! condition whose inputs are still invalid evaluates to false.

use chrono::NaiveDate;

use crate::domain::backtest::StrategyParams;
use crate::domain::indicator::Indicators;
use crate::domain::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub enter_long: bool,
    pub exit_long: bool,
}

/// Evaluate the dip-buy conditions for every day of the series.
///
/// Entry: at least `min_down_days` down days in the elapsed window AND
/// close above the long moving average. Exit: close above the short
/// moving average.
pub fn generate_signals(
    prices: &[PricePoint],
    indicators: &Indicators,
    params: &StrategyParams,
) -> Vec<SignalPoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let sma_long = &indicators.sma_long[i];
            let sma_short = &indicators.sma_short[i];

            let enter_long = indicators.consec_down[i] >= params.min_down_days
                && sma_long.valid
                && bar.close > sma_long.value;
            let exit_long = sma_short.valid && bar.close > sma_short.value;

            SignalPoint {
                date: bar.date,
                enter_long,
                exit_long,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::compute_indicators;

    fn make_prices(bars: &[(f64, f64)]) -> Vec<PricePoint> {
        bars.iter()
            .enumerate()
            .map(|(i, &(open, close))| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open,
                close,
            })
            .collect()
    }

    fn small_params() -> StrategyParams {
        StrategyParams {
            sma_long: 4,
            sma_short: 2,
            down_day_window: 3,
            min_down_days: 3,
        }
    }

    #[test]
    fn no_entry_while_sma_long_invalid() {
        // three down days in a row, but the long SMA never warms up
        let prices = make_prices(&[(10.0, 9.0), (10.0, 9.0), (10.0, 9.0)]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert!(signals.iter().all(|s| !s.enter_long));
    }

    #[test]
    fn no_exit_while_sma_short_invalid() {
        let prices = make_prices(&[(10.0, 100.0)]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert!(!signals[0].exit_long);
    }

    #[test]
    fn entry_fires_after_down_run_above_long_sma() {
        // 3 down days into a close back above the 4-bar average
        let prices = make_prices(&[
            (100.0, 99.0),
            (99.0, 98.0),
            (98.0, 97.0),
            (97.0, 120.0),
        ]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert!(!signals[0].enter_long);
        assert!(!signals[1].enter_long);
        assert!(!signals[2].enter_long);
        assert!(signals[3].enter_long);
    }

    #[test]
    fn entry_requires_close_above_long_sma() {
        // same down run but the fourth close stays below the average
        let prices = make_prices(&[
            (100.0, 99.0),
            (99.0, 98.0),
            (98.0, 97.0),
            (97.0, 96.5),
        ]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert!(!signals[3].enter_long);
    }

    #[test]
    fn entry_requires_full_down_run() {
        // only two down days in the window
        let prices = make_prices(&[
            (100.0, 101.0),
            (101.0, 100.0),
            (100.0, 99.0),
            (99.0, 120.0),
        ]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert!(!signals[3].enter_long);
    }

    #[test]
    fn exit_fires_above_short_sma() {
        let prices = make_prices(&[(10.0, 10.0), (10.0, 10.0), (10.0, 30.0)]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        // day 2: sma_short(2) over {10, 30} = 20, close 30 > 20
        assert!(signals[2].exit_long);
        // day 1: sma_short over {10, 10} = 10, close not above
        assert!(!signals[1].exit_long);
    }

    #[test]
    fn signals_aligned_with_prices() {
        let prices = make_prices(&[(10.0, 9.0), (9.0, 8.0), (8.0, 7.0), (7.0, 9.0), (9.0, 10.0)]);
        let params = small_params();
        let indicators = compute_indicators(&prices, &params);
        let signals = generate_signals(&prices, &indicators, &params);

        assert_eq!(signals.len(), prices.len());
        for (signal, bar) in signals.iter().zip(&prices) {
            assert_eq!(signal.date, bar.date);
        }
    }
}

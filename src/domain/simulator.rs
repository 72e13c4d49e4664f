//! Position simulator: the day-by-day state machine.
//!
//! A single long position at a time. Each day is evaluated once, in
//! chronological order, and performs at most one transition:
//!
//! - FLAT + entry signal  → open at today's close
//! - LONG + close below `entry - stop_loss` → stop-loss close
//! - LONG + exit signal (no stop-loss) → close as win or loss
//!
//! The stop-loss is checked before the exit condition and the realized
//! loss is always exactly `stop_loss` points, however far the close
//! gapped through the threshold. A day that closes a position cannot
//! also open one; re-entry needs a later day's entry signal.

use chrono::NaiveDate;

use crate::domain::backtest::BacktestConfig;
use crate::domain::price::PricePoint;
use crate::domain::signal::SignalPoint;
use crate::domain::stats::{AnnualLedger, AnnualStats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionState {
    Flat,
    Long { entry_price: f64 },
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
    StopLoss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    /// The close on the exit day. For a stop-loss close this can sit
    /// well below `entry_price - stop_loss`; `points` will not.
    pub exit_price: f64,
    /// Points credited (win) or debited (loss) against capital.
    pub points: f64,
    pub outcome: TradeOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapitalPoint {
    pub date: NaiveDate,
    pub capital: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// One point per processed day.
    pub capital_trace: Vec<CapitalPoint>,
    pub years: Vec<AnnualStats>,
    pub trades: Vec<TradeRecord>,
    /// Position left open when the series ran out, if any.
    pub open_position: Option<OpenPosition>,
    pub final_capital: f64,
}

/// Walk the aligned price/signal series and fold capital and position
/// state through every day.
///
/// `prices` and `signals` must be index-aligned; the caller produces
/// both from the same series.
pub fn simulate(
    prices: &[PricePoint],
    signals: &[SignalPoint],
    config: &BacktestConfig,
) -> SimulationResult {
    debug_assert_eq!(prices.len(), signals.len());

    let point_value = config.position_size * config.contract_value_per_point;

    let mut capital = config.initial_capital;
    let mut state = PositionState::Flat;
    let mut entry_date: Option<NaiveDate> = None;
    let mut trace = Vec::with_capacity(prices.len());
    let mut trades = Vec::new();
    let mut ledger = AnnualLedger::new();

    for (bar, signal) in prices.iter().zip(signals) {
        ledger.enter_day(bar.year(), capital);

        match state {
            PositionState::Flat => {
                if signal.enter_long {
                    state = PositionState::Long {
                        entry_price: bar.close,
                    };
                    entry_date = Some(bar.date);
                    ledger.record_entry();
                }
            }
            PositionState::Long { entry_price } => {
                if bar.close < entry_price - config.stop_loss {
                    // Forced close at a fixed loss of stop_loss points.
                    let points = config.stop_loss;
                    capital -= points * point_value;
                    ledger.record_loss(points);
                    trades.push(TradeRecord {
                        entry_date: entry_date.take().unwrap_or(bar.date),
                        exit_date: bar.date,
                        entry_price,
                        exit_price: bar.close,
                        points,
                        outcome: TradeOutcome::StopLoss,
                    });
                    state = PositionState::Flat;
                } else if signal.exit_long {
                    let outcome = if bar.close > entry_price {
                        TradeOutcome::Win
                    } else {
                        TradeOutcome::Loss
                    };
                    let points = (bar.close - entry_price).abs();
                    match outcome {
                        TradeOutcome::Win => {
                            capital += points * point_value;
                            ledger.record_win(points);
                        }
                        _ => {
                            capital -= points * point_value;
                            ledger.record_loss(points);
                        }
                    }
                    trades.push(TradeRecord {
                        entry_date: entry_date.take().unwrap_or(bar.date),
                        exit_date: bar.date,
                        entry_price,
                        exit_price: bar.close,
                        points,
                        outcome,
                    });
                    state = PositionState::Flat;
                }
            }
        }

        trace.push(CapitalPoint {
            date: bar.date,
            capital,
        });
        ledger.close_day(capital);
    }

    let open_position = match state {
        PositionState::Long { entry_price } => entry_date.map(|date| OpenPosition {
            entry_date: date,
            entry_price,
        }),
        PositionState::Flat => None,
    };

    SimulationResult {
        capital_trace: trace,
        years: ledger.finish(),
        trades,
        open_position,
        final_capital: capital,
    }
}

//! Plain-text report adapter.
//!
//! Renders the per-year table, the grand-total summary and the trade
//! log as a text report, and can write the capital trace as a CSV of
//! strategy-vs-buy-and-hold percentage returns for plotting.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::DipbuyerError;
use crate::domain::price::PricePoint;
use crate::domain::simulator::TradeOutcome;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        code: &str,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &str,
    ) -> Result<(), DipbuyerError> {
        let report = render_report(code, result, config);
        fs::write(output_path, report)?;
        Ok(())
    }
}

fn fmt_opt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

pub fn render_report(code: &str, result: &BacktestResult, config: &BacktestConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Backtest results for {}", code);
    let _ = writeln!(
        out,
        "Period: {} to {}",
        config.start_date, config.end_date
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<6} {:>12} {:>10} {:>14} {:>13}",
        "Year", "Total Trades", "Return %", "Points Gained", "Points Lost"
    );
    for year in &result.simulation.years {
        let _ = writeln!(
            out,
            "{:<6} {:>12} {:>10} {:>14.2} {:>13.2}",
            year.year,
            year.total_positions,
            fmt_opt_pct(year.return_pct),
            year.total_points_gained,
            year.total_points_lost,
        );
    }
    let _ = writeln!(out);

    let summary = &result.summary;
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  Total positions:    {}", summary.total_positions);
    let _ = writeln!(out, "  Winning positions:  {}", summary.winning_positions);
    let _ = writeln!(out, "  Losing positions:   {}", summary.losing_positions);
    let _ = writeln!(
        out,
        "  Win rate:           {}",
        match summary.win_rate() {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => "n/a".to_string(),
        }
    );
    let _ = writeln!(out, "  Initial capital:    {:.2}", summary.initial_capital);
    let _ = writeln!(out, "  Final capital:      {:.2}", summary.final_capital);
    let _ = writeln!(out, "  Total return:       {:.2}", summary.total_return);
    let _ = writeln!(
        out,
        "  Total return %:     {}",
        fmt_opt_pct(summary.total_return_pct)
    );
    let _ = writeln!(
        out,
        "  Total points gained: {:.2}",
        summary.total_points_gained
    );
    let _ = writeln!(
        out,
        "  Total points lost:   {:.2}",
        summary.total_points_lost
    );
    let _ = writeln!(
        out,
        "  Avg winning points:  {}",
        fmt_opt_pct(summary.avg_winning_points)
    );
    let _ = writeln!(
        out,
        "  Avg losing points:   {}",
        fmt_opt_pct(summary.avg_losing_points)
    );

    if !result.simulation.trades.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:>10} {:>10} {:>8}  {}",
            "Entry", "Exit", "In", "Out", "Points", "Outcome"
        );
        for trade in &result.simulation.trades {
            let outcome = match trade.outcome {
                TradeOutcome::Win => "win",
                TradeOutcome::Loss => "loss",
                TradeOutcome::StopLoss => "stop-loss",
            };
            let _ = writeln!(
                out,
                "{:<12} {:<12} {:>10.2} {:>10.2} {:>8.2}  {}",
                trade.entry_date,
                trade.exit_date,
                trade.entry_price,
                trade.exit_price,
                trade.points,
                outcome,
            );
        }
    }

    if let Some(open) = &result.simulation.open_position {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Open position: entered {} at {:.2}",
            open.entry_date, open.entry_price
        );
    }

    out
}

/// Strategy and buy-and-hold returns per day, both as a percentage of
/// the initial value.
pub fn render_capital_trace(prices: &[PricePoint], result: &BacktestResult) -> String {
    let mut out = String::from("date,strategy_pct,buy_hold_pct\n");

    let initial = result.initial_capital;
    let first_close = prices.first().map(|p| p.close);

    for (point, bar) in result.simulation.capital_trace.iter().zip(prices) {
        let strategy_pct = (point.capital - initial) / initial * 100.0;
        let buy_hold_pct = match first_close {
            Some(first) if first != 0.0 => (bar.close / first - 1.0) * 100.0,
            _ => 0.0,
        };
        let _ = writeln!(
            out,
            "{},{:.4},{:.4}",
            point.date, strategy_pct, buy_hold_pct
        );
    }

    out
}

pub fn write_capital_trace<P: AsRef<Path>>(
    path: P,
    prices: &[PricePoint],
    result: &BacktestResult,
) -> Result<(), DipbuyerError> {
    fs::write(path, render_capital_trace(prices, result))?;
    Ok(())
}

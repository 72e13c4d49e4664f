//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::{self, TextReportAdapter};
use crate::domain::backtest::{run_backtest, BacktestConfig, StrategyParams};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::DipbuyerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dipbuyer", about = "Dip-buying trend strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the capital trace (strategy vs buy-and-hold %) as CSV
        #[arg(long)]
        trace: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for a symbol
    Info {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(long)]
        exchange: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            exchange,
            output,
            trace,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest_cmd(
                    &config,
                    code.as_deref(),
                    exchange.as_deref(),
                    output.as_ref(),
                    trace.as_ref(),
                )
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            code,
            exchange,
            config,
        } => run_info(code.as_deref(), exchange.as_deref(), &config),
        Command::ListSymbols { exchange, config } => run_list_symbols(&exchange, &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DipbuyerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, DipbuyerError> {
    let start_date = read_date(adapter, "start_date")?;
    let end_date = read_date(adapter, "end_date")?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        initial_capital: adapter.get_double("backtest", "initial_capital", 1000.0),
        stop_loss: adapter.get_double("backtest", "stop_loss", 10.0),
        contract_value_per_point: adapter.get_double("backtest", "contract_value_per_point", 20.0),
        position_size: 1.0,
    })
}

fn read_date(adapter: &dyn ConfigPort, key: &str) -> Result<NaiveDate, DipbuyerError> {
    let value = adapter
        .get_string("backtest", key)
        .ok_or_else(|| DipbuyerError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| DipbuyerError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn build_strategy_params(adapter: &dyn ConfigPort) -> StrategyParams {
    let defaults = StrategyParams::default();
    StrategyParams {
        sma_long: adapter.get_int("strategy", "sma_long", defaults.sma_long as i64) as usize,
        sma_short: adapter.get_int("strategy", "sma_short", defaults.sma_short as i64) as usize,
        down_day_window: adapter.get_int(
            "strategy",
            "down_day_window",
            defaults.down_day_window as i64,
        ) as usize,
        min_down_days: adapter.get_int("strategy", "min_down_days", defaults.min_down_days as i64)
            as u32,
    }
}

fn resolve_code(code_override: Option<&str>, adapter: &dyn ConfigPort) -> Option<String> {
    code_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", "code"))
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

fn resolve_exchange(exchange_override: Option<&str>, adapter: &dyn ConfigPort) -> Option<String> {
    exchange_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("backtest", "exchange"))
        .map(|e| e.trim().to_uppercase())
        .filter(|e| !e.is_empty())
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    code_override: Option<&str>,
    exchange_override: Option<&str>,
    output_path: Option<&PathBuf>,
    trace_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = build_strategy_params(&adapter);

    let (code, exchange) = match (
        resolve_code(code_override, &adapter),
        resolve_exchange(exchange_override, &adapter),
    ) {
        (Some(c), Some(e)) => (c, e),
        _ => {
            eprintln!("error: code and exchange are required");
            return ExitCode::from(2);
        }
    };

    let data_port = match CsvAdapter::from_config(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Fetching {} on {} from {} to {}",
        code, exchange, bt_config.start_date, bt_config.end_date
    );
    let prices = match data_port.fetch_prices(&code, &exchange, bt_config.start_date, bt_config.end_date)
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if prices.is_empty() {
        let err = DipbuyerError::NoData {
            code,
            exchange,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    if prices.len() < params.warmup_bars() {
        eprintln!(
            "warning: {} bars is fewer than the {}-bar warmup; no signal can fire",
            prices.len(),
            params.warmup_bars(),
        );
    }

    eprintln!("Running backtest over {} days", prices.len());
    let result = match run_backtest(&prices, &params, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let summary = &result.summary;
    eprintln!("\n=== Results for {} ===", code);
    eprintln!("Total positions:  {}", summary.total_positions);
    eprintln!(
        "Win rate:         {}",
        match summary.win_rate() {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => "n/a".to_string(),
        }
    );
    eprintln!("Final capital:    {:.2}", summary.final_capital);
    eprintln!(
        "Total return:     {}",
        match summary.total_return_pct {
            Some(pct) => format!("{:.2}%", pct),
            None => "n/a".to_string(),
        }
    );

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report.txt"));
    if let Err(e) = TextReportAdapter.write(
        &code,
        &result,
        &bt_config,
        &output.display().to_string(),
    ) {
        eprintln!("error: failed to write report: {e}");
        return (&e).into();
    }
    eprintln!("\nReport written to: {}", output.display());

    if let Some(trace) = trace_path {
        if let Err(e) = text_report_adapter::write_capital_trace(trace, &prices, &result) {
            eprintln!("error: failed to write trace: {e}");
            return (&e).into();
        }
        eprintln!("Capital trace written to: {}", trace.display());
    }

    ExitCode::SUCCESS
}

fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = build_strategy_params(&adapter);
    eprintln!("Config validated successfully");
    eprintln!("\nStrategy:");
    eprintln!("  trend filter:   SMA({})", params.sma_long);
    eprintln!("  exit trigger:   close > SMA({})", params.sma_short);
    eprintln!(
        "  entry trigger:  {} down days in the prior {}-day window",
        params.min_down_days, params.down_day_window
    );
    eprintln!("  warmup:         {} bars", params.warmup_bars());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(code: Option<&str>, exchange: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let (code, exchange) = match (
        resolve_code(code, &adapter),
        resolve_exchange(exchange, &adapter),
    ) {
        (Some(c), Some(e)) => (c, e),
        _ => {
            eprintln!("error: code and exchange are required (flags or config)");
            return ExitCode::from(2);
        }
    };

    let data_port = match CsvAdapter::from_config(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.get_data_range(&code, &exchange) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}.{}: {} bars, {} to {}", code, exchange, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}.{}: no data found", code, exchange);
            ExitCode::from(5)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(exchange: &str, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match CsvAdapter::from_config(&adapter) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_symbols(exchange) {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found for exchange {}", exchange);
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

//! Configuration validation.
//!
//! Checks every config field through the [`ConfigPort`] before a
//! backtest runs, so bad values fail fast with a pointed message
//! instead of surfacing mid-run.

use crate::domain::error::DipbuyerError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), DipbuyerError> {
    validate_positive_double(config, "initial_capital")?;
    validate_positive_double(config, "stop_loss")?;
    validate_positive_double(config, "contract_value_per_point")?;
    validate_dates(config)?;
    validate_code(config)?;
    validate_exchange(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DipbuyerError> {
    validate_window(config, "sma_long", 200)?;
    validate_window(config, "sma_short", 5)?;
    validate_window(config, "down_day_window", 3)?;
    let window = config.get_int("strategy", "down_day_window", 3);
    let min_down = config.get_int("strategy", "min_down_days", 3);
    if min_down < 1 {
        return Err(DipbuyerError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "min_down_days".to_string(),
            reason: "min_down_days must be at least 1".to_string(),
        });
    }
    if min_down > window {
        return Err(DipbuyerError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "min_down_days".to_string(),
            reason: "min_down_days cannot exceed down_day_window".to_string(),
        });
    }
    Ok(())
}

fn validate_positive_double(config: &dyn ConfigPort, key: &str) -> Result<(), DipbuyerError> {
    let value = config.get_double("backtest", key, 0.0);
    if value <= 0.0 {
        return Err(DipbuyerError::ConfigInvalid {
            section: "backtest".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), DipbuyerError> {
    let value = config.get_int("strategy", key, default);
    if value < 1 {
        return Err(DipbuyerError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be at least 1"),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DipbuyerError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if start >= end {
        return Err(DipbuyerError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, DipbuyerError> {
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| DipbuyerError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| DipbuyerError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: format!("invalid {key} format, expected YYYY-MM-DD"),
    })
}

fn validate_code(config: &dyn ConfigPort) -> Result<(), DipbuyerError> {
    match config.get_string("backtest", "code") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DipbuyerError::ConfigMissing {
            section: "backtest".to_string(),
            key: "code".to_string(),
        }),
    }
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), DipbuyerError> {
    match config.get_string("backtest", "exchange") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DipbuyerError::ConfigMissing {
            section: "backtest".to_string(),
            key: "exchange".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[backtest]
initial_capital = 1000.0
stop_loss = 10
contract_value_per_point = 20
start_date = 1997-01-01
end_date = 2024-06-30
code = GSPC
exchange = INDEX
"#;

    #[test]
    fn valid_backtest_config_passes() {
        assert!(validate_backtest_config(&make_config(VALID)).is_ok());
    }

    #[test]
    fn missing_initial_capital_fails() {
        let config = make_config("[backtest]\nstop_loss = 10\ncontract_value_per_point = 20\nstart_date = 1997-01-01\nend_date = 2024-06-30\ncode = GSPC\nexchange = INDEX\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn negative_stop_loss_fails() {
        let config = make_config(&VALID.replace("stop_loss = 10", "stop_loss = -5"));
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "stop_loss"));
    }

    #[test]
    fn zero_contract_value_fails() {
        let config = make_config(
            &VALID.replace("contract_value_per_point = 20", "contract_value_per_point = 0"),
        );
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "contract_value_per_point")
        );
    }

    #[test]
    fn bad_date_format_fails() {
        let config = make_config(&VALID.replace("1997-01-01", "01/01/1997"));
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_end_date_fails() {
        let config = make_config(&VALID.replace("end_date = 2024-06-30", ""));
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_after_end_fails() {
        let config = make_config(
            &VALID
                .replace("start_date = 1997-01-01", "start_date = 2025-01-01"),
        );
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_code_fails() {
        let config = make_config(&VALID.replace("code = GSPC", ""));
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigMissing { key, .. } if key == "code"));
    }

    #[test]
    fn missing_exchange_fails() {
        let config = make_config(&VALID.replace("exchange = INDEX", ""));
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigMissing { key, .. } if key == "exchange"));
    }

    #[test]
    fn strategy_defaults_pass_without_section() {
        assert!(validate_strategy_config(&make_config("[backtest]\n")).is_ok());
    }

    #[test]
    fn strategy_zero_window_fails() {
        let config = make_config("[strategy]\nsma_long = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "sma_long"));
    }

    #[test]
    fn strategy_min_down_days_exceeding_window_fails() {
        let config = make_config("[strategy]\ndown_day_window = 3\nmin_down_days = 4\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, DipbuyerError::ConfigInvalid { key, .. } if key == "min_down_days"));
    }

    #[test]
    fn strategy_explicit_values_pass() {
        let config = make_config(
            "[strategy]\nsma_long = 200\nsma_short = 5\ndown_day_window = 3\nmin_down_days = 3\n",
        );
        assert!(validate_strategy_config(&config).is_ok());
    }
}

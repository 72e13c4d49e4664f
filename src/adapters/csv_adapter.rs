//! CSV file data adapter.
//!
//! Reads daily series from `{CODE}_{EXCHANGE}.csv` files under a base
//! directory. Columns are located by header name (`date`, `open`,
//! `close`, case-insensitive); extra columns such as high/low/volume
//! from full OHLCV exports are ignored.

use crate::domain::error::DipbuyerError;
use crate::domain::price::PricePoint;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Build from the `[data] path` config key.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DipbuyerError> {
        let path = config
            .get_string("data", "path")
            .ok_or_else(|| DipbuyerError::ConfigMissing {
                section: "data".to_string(),
                key: "path".to_string(),
            })?;
        Ok(Self::new(PathBuf::from(path)))
    }

    fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }

    fn read_all(&self, code: &str, exchange: &str) -> Result<Vec<PricePoint>, DipbuyerError> {
        let path = self.csv_path(code, exchange);
        let content = fs::read_to_string(&path).map_err(|e| DipbuyerError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| DipbuyerError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_col = find_column(&headers, "date")?;
        let open_col = find_column(&headers, "open")?;
        let close_col = find_column(&headers, "close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DipbuyerError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, date_col, "date")?;
            let date =
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| DipbuyerError::Data {
                    reason: format!("invalid date {}: {}", date_str, e),
                })?;

            let open = parse_price(field(&record, open_col, "open")?, "open")?;
            let close = parse_price(field(&record, close_col, "close")?, "close")?;

            points.push(PricePoint { date, open, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, DipbuyerError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| DipbuyerError::Data {
            reason: format!("missing {} column", name),
        })
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, DipbuyerError> {
    record.get(index).ok_or_else(|| DipbuyerError::Data {
        reason: format!("missing {} value", name),
    })
}

fn parse_price(value: &str, name: &str) -> Result<f64, DipbuyerError> {
    value.trim().parse().map_err(|e| DipbuyerError::Data {
        reason: format!("invalid {} value {:?}: {}", name, value, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, DipbuyerError> {
        let points = self.read_all(code, exchange)?;
        Ok(points
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect())
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, DipbuyerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DipbuyerError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", exchange);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DipbuyerError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(&suffix) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipbuyerError> {
        let points = self.read_all(code, exchange)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}

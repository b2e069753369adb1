//! CSV file data adapter.
//!
//! Reads a directory of `SYMBOL.csv` files with a
//! `Date,Open,High,Low,Close,Volume` header, date format YYYY-MM-DD.
//! Rows are sorted by date on load.

use crate::domain::error::StratsimError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, StratsimError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| StratsimError::DataSource {
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e| StratsimError::DataSource {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<PriceBar>, StratsimError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StratsimError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StratsimError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StratsimError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                StratsimError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            bars.push(PriceBar {
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratsimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StratsimError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StratsimError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

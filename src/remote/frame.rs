//! Page accumulation and the resulting row table

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use super::FetchError;
use crate::data::io::ensure_parent;

/// Column parsed into a timestamp when present
pub const DATE_COLUMN: &str = "date";

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Space-separated; `%.f` makes the fractional seconds optional
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Field holding a page's rows
const RESULTS_FIELD: &str = "results";

/// Field holding the next page URL (null on the last page)
const NEXT_FIELD: &str = "next";

/// Collects rows across pages until the server stops returning `next`
#[derive(Debug, Default)]
pub struct PageCollector {
    rows: Vec<Map<String, Value>>,
    pages: usize,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Take one page payload fetched from `url`; returns the next page URL
    pub fn absorb(&mut self, url: &str, payload: Value) -> Result<Option<String>, FetchError> {
        let Value::Object(mut page) = payload else {
            return Err(FetchError::PayloadShape {
                url: url.to_string(),
                keys: Vec::new(),
            });
        };

        let results = match page.remove(RESULTS_FIELD) {
            Some(Value::Array(results)) => results,
            other => {
                let mut keys: Vec<String> = page.keys().cloned().collect();
                if other.is_some() {
                    keys.push(RESULTS_FIELD.to_string());
                }
                return Err(FetchError::PayloadShape {
                    url: url.to_string(),
                    keys,
                });
            }
        };

        for row in results {
            match row {
                Value::Object(fields) => self.rows.push(fields),
                _ => {
                    let mut keys: Vec<String> = page.keys().cloned().collect();
                    keys.push(RESULTS_FIELD.to_string());
                    return Err(FetchError::PayloadShape {
                        url: url.to_string(),
                        keys,
                    });
                }
            }
        }
        self.pages += 1;

        Ok(page
            .get(NEXT_FIELD)
            .and_then(Value::as_str)
            .filter(|next| !next.is_empty())
            .map(str::to_string))
    }

    /// Build the table, parsing and sorting by date when that column exists
    pub fn finish(self) -> Result<MetricFrame, FetchError> {
        MetricFrame::from_rows(self.rows)
    }
}

/// One fetched row
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// Parsed `date` column, if the dataset has one; offsets are normalised to UTC
    pub date: Option<NaiveDateTime>,
    pub fields: Map<String, Value>,
}

/// All rows of a fetched dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricFrame {
    columns: Vec<String>,
    rows: Vec<MetricRow>,
}

impl MetricFrame {
    pub fn from_rows(raw: Vec<Map<String, Value>>) -> Result<Self, FetchError> {
        let mut columns: Vec<String> = Vec::new();
        for row in &raw {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let has_date = columns.iter().any(|c| c == DATE_COLUMN);
        let mut rows = raw
            .into_iter()
            .enumerate()
            .map(|(index, fields)| {
                let date = if has_date {
                    parse_date(fields.get(DATE_COLUMN), index)?
                } else {
                    None
                };
                Ok(MetricRow { date, fields })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        if has_date {
            // Stable; undated rows go last
            rows.sort_by_key(|r| (r.date.is_none(), r.date));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric column as `(timestamp, value)` pairs, skipping rows without either
    pub fn series(&self, column: &str) -> Vec<(NaiveDateTime, f64)> {
        self.rows
            .iter()
            .filter_map(|r| Some((r.date?, r.fields.get(column)?.as_f64()?)))
            .collect()
    }

    /// Write every column, creating parent directories as needed
    ///
    /// Dates are written as `YYYY-MM-DD` when every timestamp falls on
    /// midnight, otherwise with the time of day.
    pub fn write_csv(&self, path: &Path) -> Result<(), FetchError> {
        ensure_parent(path)?;

        let date_format = if self
            .rows
            .iter()
            .filter_map(|r| r.date)
            .all(|dt| dt.time() == NaiveTime::MIN)
        {
            DATE_ONLY_FORMAT
        } else {
            DATETIME_FORMAT
        };

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let cells = self.columns.iter().map(|column| {
                if column == DATE_COLUMN {
                    if let Some(date) = row.date {
                        return date.format(date_format).to_string();
                    }
                }
                row.fields.get(column).map(cell_text).unwrap_or_default()
            });
            writer.write_record(cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_date(value: Option<&Value>, row: usize) -> Result<Option<NaiveDateTime>, FetchError> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) => text.as_str(),
        Some(other) => {
            return Err(FetchError::InvalidDate {
                value: other.to_string(),
                row,
            })
        }
    };

    NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.naive_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATETIME_FORMAT))
        .map(Some)
        .map_err(|_| FetchError::InvalidDate {
            value: text.to_string(),
            row,
        })
}

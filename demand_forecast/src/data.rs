//! Sales history loading and grouping
//!
//! The sales CSV carries a header row followed by one row per dish and day.
//! Columns are read by position, whatever the header says: dish name,
//! date (`DD-MM-YYYY`) and the number of servings sold. A blank count is
//! read as missing (`NaN`); the row still belongs to the dish's history
//! but the model leaves it out of the fit.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Date format used by the sales export
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Dish the sales belong to
    pub dish: String,
    /// Day of the sales
    pub date: NaiveDate,
    /// Servings sold that day, `NaN` when missing
    pub sold: f64,
}

/// Sales history of a single dish, sorted by date
#[derive(Debug, Clone, PartialEq)]
pub struct SalesHistory {
    dish: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Loader for the sales CSV
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales records from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load sales records from any reader producing CSV text
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        if headers.len() < 3 {
            return Err(ForecastError::DataError(format!(
                "Expected at least 3 columns (dish, date, sold), found {}",
                headers.len()
            )));
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            records.push(Self::parse_record(&row?)?);
        }

        Ok(records)
    }

    /// Parse one CSV row into a sales record
    fn parse_record(row: &StringRecord) -> Result<SalesRecord> {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize| {
            row.get(idx).ok_or_else(|| {
                ForecastError::DataError(format!("Line {}: missing column {}", line, idx + 1))
            })
        };

        let (dish, raw_date, raw_sold) = (field(0)?, field(1)?, field(2)?);

        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
            ForecastError::ParseError(format!("Line {}: invalid date '{}': {}", line, raw_date, e))
        })?;
        let sold = if raw_sold.is_empty() {
            f64::NAN
        } else {
            raw_sold.parse::<f64>().map_err(|e| {
                ForecastError::ParseError(format!(
                    "Line {}: invalid count '{}': {}",
                    line, raw_sold, e
                ))
            })?
        };

        Ok(SalesRecord {
            dish: dish.to_string(),
            date,
            sold,
        })
    }
}

/// Group records into one history per dish, in order of first appearance
pub fn group_by_dish(records: &[SalesRecord]) -> Vec<SalesHistory> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.dish.as_str()).or_insert_with(|| {
            groups.push((record.dish.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((record.date, record.sold));
    }

    groups
        .into_iter()
        .map(|(dish, points)| SalesHistory::from_points(dish, points))
        .collect()
}

impl SalesHistory {
    /// Create a history from unordered `(date, sold)` points
    pub fn from_points(dish: impl Into<String>, mut points: Vec<(NaiveDate, f64)>) -> Self {
        // Stable, so duplicate dates keep their file order
        points.sort_by_key(|(date, _)| *date);
        let (dates, values) = points.into_iter().unzip();

        Self {
            dish: dish.into(),
            dates,
            values,
        }
    }

    /// Name of the dish
    pub fn dish(&self) -> &str {
        &self.dish
    }

    /// Observation dates in ascending order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Servings sold, aligned with `dates`
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the history has no observations
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of days with a finite sales count
    pub fn observed_len(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// The same history without the days whose count is missing
    pub fn observed(&self) -> SalesHistory {
        let (dates, values) = self
            .dates
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.is_finite())
            .map(|(date, value)| (*date, *value))
            .unzip();

        SalesHistory {
            dish: self.dish.clone(),
            dates,
            values,
        }
    }

    /// Earliest observed date
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Latest observed date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Days between the first and last observation
    pub fn span_days(&self) -> i64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }
}

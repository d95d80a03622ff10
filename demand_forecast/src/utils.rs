//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

/// The `horizon` calendar days following `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::ValidationError(format!(
                    "Date {} + {} days is out of range",
                    last_date, offset
                ))
            })
        })
        .collect()
}

/// Serialize to JSON indented by four spaces
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| ForecastError::DataError(e.to_string()))
}

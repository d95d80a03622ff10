//! Serving recommendations derived from a forecast
//!
//! Each forecasted day becomes one flat record: the rounded estimate and
//! bounds, a recommendation padded by half the headroom to the upper bound,
//! and a coarse confidence label from the interval width.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval width below which a forecast is labelled high confidence
pub const HIGH_CONFIDENCE_GAP: i64 = 15;

/// Interval width below which a forecast is labelled medium confidence
pub const MEDIUM_CONFIDENCE_GAP: i64 = 30;

/// Share of the headroom above the estimate added to the recommendation
pub const BUFFER_RATIO: f64 = 0.5;

/// Coarse confidence label of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Label an interval by its width in servings
    pub fn from_gap(gap: i64) -> Self {
        if gap < HIGH_CONFIDENCE_GAP {
            Confidence::High
        } else if gap < MEDIUM_CONFIDENCE_GAP {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(label)
    }
}

/// One dish's forecast for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingPrediction {
    pub dish: String,
    pub date: NaiveDate,
    pub weekday: String,
    pub predicted: i64,
    pub min: i64,
    pub max: i64,
    pub recommended_servings: i64,
    pub confidence: Confidence,
}

impl ServingPrediction {
    /// Build the record from a point estimate and its interval
    pub fn from_forecast(dish: &str, date: NaiveDate, estimate: f64, lower: f64, upper: f64) -> Self {
        let predicted = round_count(estimate);
        let min = round_count(lower);
        let max = round_count(upper);

        Self {
            dish: dish.to_string(),
            date,
            weekday: weekday_name(date),
            predicted,
            min,
            max,
            recommended_servings: recommended_servings(predicted, max),
            confidence: Confidence::from_gap(max - min),
        }
    }
}

/// Round to the nearest count, ties to even
pub fn round_count(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Estimate plus half the headroom up to the upper bound
pub fn recommended_servings(predicted: i64, upper: i64) -> i64 {
    let buffer = round_count((upper - predicted) as f64 * BUFFER_RATIO);
    predicted + buffer
}

/// Full English name of the day
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

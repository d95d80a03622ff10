use chrono::{Datelike, Days, NaiveDate, Weekday};
use demand_forecast::data::SalesHistory;
use demand_forecast::models::additive::AdditiveModel;
use demand_forecast::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use demand_forecast::utils::future_dates;
use rstest::rstest;

fn start() -> NaiveDate {
    // A Monday
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn history_from(values: &[f64]) -> SalesHistory {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| (start() + Days::new(i as u64), *v))
        .collect();
    SalesHistory::from_points("Test Dish", points)
}

fn forecast_week(history: &SalesHistory, model: &AdditiveModel) -> ForecastResult {
    let trained = model.train(history).unwrap();
    let dates = future_dates(history.last_date().unwrap(), 7).unwrap();
    trained.predict(&dates).unwrap()
}

#[test]
fn test_constant_sales_forecast_flat() {
    let history = history_from(&[50.0; 14]);
    let forecast = forecast_week(&history, &AdditiveModel::default());

    assert_eq!(forecast.horizons(), 7);
    for (_, estimate, lower, upper) in forecast.rows() {
        assert!((estimate - 50.0).abs() < 0.5, "estimate {}", estimate);
        assert!(upper - lower < 1.0, "interval [{}, {}]", lower, upper);
    }
}

#[test]
fn test_linear_trend_is_extrapolated() {
    let values: Vec<f64> = (0..21).map(|d| 10.0 + 2.0 * d as f64).collect();
    let history = history_from(&values);
    let forecast = forecast_week(&history, &AdditiveModel::default());

    for (i, value) in forecast.values().iter().enumerate() {
        let expected = 10.0 + 2.0 * (21 + i) as f64;
        assert!(
            (value - expected).abs() < 3.0,
            "day {}: {} vs {}",
            i,
            value,
            expected
        );
    }
}

#[test]
fn test_weekly_pattern_is_learned() {
    // Busy weekends, quiet weekdays, for eight weeks
    let values: Vec<f64> = (0..56)
        .map(|d| match (start() + Days::new(d)).weekday() {
            Weekday::Sat | Weekday::Sun => 80.0,
            _ => 40.0,
        })
        .collect();
    let history = history_from(&values);
    let model = AdditiveModel::default();
    let trained = model.train(&history).unwrap();
    assert!(trained.has_weekly_seasonality());
    assert!(!trained.has_yearly_seasonality());

    let dates = future_dates(history.last_date().unwrap(), 7).unwrap();
    let forecast = trained.predict(&dates).unwrap();

    let by_day = |day: Weekday| {
        forecast
            .rows()
            .find(|(date, ..)| date.weekday() == day)
            .map(|(_, estimate, ..)| estimate)
            .unwrap()
    };
    assert!(by_day(Weekday::Sat) > by_day(Weekday::Wed) + 20.0);
    assert!(by_day(Weekday::Sun) > by_day(Weekday::Mon) + 20.0);
}

#[test]
fn test_noisy_sales_have_intervals_around_estimate() {
    let values: Vec<f64> = (0..28)
        .map(|d| 60.0 + if d % 3 == 0 { 8.0 } else { -4.0 } + (d % 5) as f64)
        .collect();
    let history = history_from(&values);
    let forecast = forecast_week(&history, &AdditiveModel::default());

    for (_, estimate, lower, upper) in forecast.rows() {
        assert!(lower < estimate && estimate < upper);
        assert!(upper - lower > 1.0);
    }
}

#[test]
fn test_predictions_are_repeatable_for_a_seed() {
    let values: Vec<f64> = (0..20).map(|d| 30.0 + (d * 7 % 11) as f64).collect();
    let history = history_from(&values);

    let model = AdditiveModel::new(0.8, 500).unwrap().with_seed(42);
    let first = forecast_week(&history, &model);
    let second = forecast_week(&history, &model);

    assert_eq!(first.values(), second.values());
    assert_eq!(first.intervals(), second.intervals());
}

#[test]
fn test_changepoints_follow_history_length() {
    let model = AdditiveModel::default();

    // floor(0.8 * 5) - 1 = 3
    let short = model.train(&history_from(&[5.0, 6.0, 7.0, 6.0, 5.0])).unwrap();
    assert_eq!(short.changepoint_count(), 3);

    // capped at 25
    let long = model.train(&history_from(&[10.0; 100])).unwrap();
    assert_eq!(long.changepoint_count(), 25);

    let none = model
        .clone()
        .with_changepoints(0)
        .train(&history_from(&[5.0, 6.0, 7.0, 6.0, 5.0]))
        .unwrap();
    assert_eq!(none.changepoint_count(), 0);
}

#[test]
fn test_single_day_history_still_fits() {
    let history = SalesHistory::from_points("Tea", vec![(start(), 20.0); 5]);
    let forecast = forecast_week(&history, &AdditiveModel::default());

    assert_eq!(forecast.horizons(), 7);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_empty_history_is_rejected() {
    let history = SalesHistory::from_points("Nothing", Vec::new());
    assert!(AdditiveModel::default().train(&history).is_err());

    let unobserved = history_from(&[f64::NAN; 6]);
    assert!(AdditiveModel::default().train(&unobserved).is_err());
}

#[test]
fn test_missing_counts_are_left_out_of_the_fit() {
    let mut values = vec![30.0; 21];
    values[4] = f64::NAN;
    values[11] = f64::INFINITY;
    let history = history_from(&values);

    let forecast = forecast_week(&history, &AdditiveModel::new(0.8, 200).unwrap());

    assert_eq!(forecast.horizons(), 7);
    for (_, estimate, lower, upper) in forecast.rows() {
        assert!((estimate - 30.0).abs() < 0.5, "estimate {}", estimate);
        assert!(lower.is_finite() && upper.is_finite());
    }
}

#[rstest]
#[case(14, false)]
#[case(15, true)]
fn test_weekly_seasonality_needs_two_weeks(#[case] days: usize, #[case] weekly: bool) {
    // `days` observations span `days - 1` days
    let values: Vec<f64> = (0..days).map(|d| 20.0 + (d % 7) as f64).collect();
    let trained = AdditiveModel::default()
        .train(&history_from(&values))
        .unwrap();

    assert_eq!(trained.has_weekly_seasonality(), weekly);
    assert!(!trained.has_yearly_seasonality());
}

#[test]
fn test_yearly_seasonality_after_two_years() {
    let values: Vec<f64> = (0..731)
        .map(|d| 100.0 + 30.0 * (2.0 * std::f64::consts::PI * d as f64 / 365.25).sin())
        .collect();
    let history = history_from(&values);
    assert_eq!(history.span_days(), 730);

    let model = AdditiveModel::new(0.8, 200).unwrap();
    let trained = model.train(&history).unwrap();
    assert!(trained.has_weekly_seasonality());
    assert!(trained.has_yearly_seasonality());

    let dates = future_dates(history.last_date().unwrap(), 7).unwrap();
    let forecast = trained.predict(&dates).unwrap();
    for (_, estimate, lower, upper) in forecast.rows() {
        assert!(estimate.is_finite() && lower.is_finite() && upper.is_finite());
        assert!(lower <= upper);
    }

    let short = model.train(&history_from(&values[..730])).unwrap();
    assert!(!short.has_yearly_seasonality());
}

#[rstest]
#[case(0.0, 1000)]
#[case(1.0, 1000)]
#[case(-0.5, 1000)]
#[case(0.8, 0)]
fn test_model_parameter_validation(#[case] width: f64, #[case] samples: usize) {
    assert!(AdditiveModel::new(width, samples).is_err());
}

#[test]
fn test_prior_scale_validation() {
    assert!(AdditiveModel::default().with_changepoint_prior_scale(0.0).is_err());
    assert!(AdditiveModel::default().with_seasonality_prior_scale(-1.0).is_err());
    assert!(AdditiveModel::default().with_changepoint_prior_scale(0.5).is_ok());
}

#[test]
fn test_forecast_result_validation() {
    let dates = vec![start()];
    assert!(ForecastResult::new(dates.clone(), vec![1.0, 2.0], vec![(0.0, 2.0)]).is_err());
    assert!(ForecastResult::new(dates.clone(), vec![1.0], vec![]).is_err());

    let result = ForecastResult::new(dates, vec![1.0], vec![(0.5, 1.5)]).unwrap();
    assert_eq!(result.horizons(), 1);
    assert_eq!(result.rows().next(), Some((start(), 1.0, 0.5, 1.5)));
}

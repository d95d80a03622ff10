use chrono::{Datelike, Days, NaiveDate, Weekday};
use demand_forecast::data::SalesHistory;
use demand_forecast::models::additive::AdditiveModel;
use demand_forecast::models::{ForecastModel, TrainedForecastModel};
use demand_forecast::serving::ServingPrediction;
use demand_forecast::utils::future_dates;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    // Create sample data
    println!("Creating sample data...");
    let history = create_sample_history();
    println!(
        "Sample data created: {} days of {} sales\n",
        history.len(),
        history.dish()
    );

    // Train the model
    println!("Training model...");
    let model = AdditiveModel::new(0.8, 1000)?;
    let trained = model.train(&history)?;
    println!(
        "Model trained: {} changepoints, weekly seasonality: {}, residual std: {:.2}\n",
        trained.changepoint_count(),
        trained.has_weekly_seasonality(),
        trained.residual_std()
    );

    // Forecast the next week
    let last_date = history.last_date().ok_or("empty history")?;
    let dates = future_dates(last_date, 7)?;
    let forecast = trained.predict(&dates)?;

    println!("Next week:");
    for (date, estimate, lower, upper) in forecast.rows() {
        let serving = ServingPrediction::from_forecast(history.dish(), date, estimate, lower, upper);
        println!(
            "  {} {:<9} predicted {:>3} [{:>3}, {:>3}] -> cook {:>3} ({})",
            serving.date,
            serving.weekday,
            serving.predicted,
            serving.min,
            serving.max,
            serving.recommended_servings,
            serving.confidence
        );
    }

    Ok(())
}

/// Six weeks of sales with a Friday rush and a slow upward trend
fn create_sample_history() -> SalesHistory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let points = (0..42u64)
        .map(|day| {
            let date = start + Days::new(day);
            let rush = if date.weekday() == Weekday::Fri { 25.0 } else { 0.0 };
            let wobble = ((day * 37) % 9) as f64 - 4.0;
            (date, 60.0 + 0.3 * day as f64 + rush + wobble)
        })
        .collect();

    SalesHistory::from_points("Veg Biryani", points)
}

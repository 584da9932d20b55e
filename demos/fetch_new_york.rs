// demos/fetch_new_york.rs
//
// WEATHERSOURCE_API_KEY=... RUST_LOG=debug cargo run --example fetch_new_york --features demos
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::str::FromStr;
use weathersource_etl::{FileFormat, PipelineConfig, WeatherEtlError, WeatherPipeline};

fn setup_logger() -> Result<(), log::SetLoggerError> {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| LevelFilter::from_str(&value).ok())
        .unwrap_or(LevelFilter::Info);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
}

fn main() -> Result<(), WeatherEtlError> {
    if let Err(e) = setup_logger() {
        eprintln!("Logger already set: {}", e);
    }

    let config = PipelineConfig {
        api_key: std::env::var("WEATHERSOURCE_API_KEY").unwrap_or_default(),
        output_dir: "data".into(),
        ..Default::default()
    };
    let pipeline = WeatherPipeline::from_config(&config)?;

    // One week of the popular fields for New York City.
    let historical = pipeline
        .process_historical_data()
        .latitude(40.7128)
        .longitude(-74.0060)
        .start_date("2023-12-01")
        .end_date("2023-12-07")
        .call()?;
    println!(
        "Historical: {} rows written to {}",
        historical.row_count(),
        historical.location()
    );

    let today = chrono::Utc::now().date_naive();
    let in_five_days = today + chrono::Duration::days(5);
    let forecast = pipeline
        .process_forecast_data()
        .latitude(40.7128)
        .longitude(-74.0060)
        .start_date(&today.format("%Y-%m-%d").to_string())
        .end_date(&in_five_days.format("%Y-%m-%d").to_string())
        .fields("temp,precipProb,windSpd")
        .file_format(FileFormat::Csv)
        .call()?;
    if forecast.is_empty() {
        println!("The provider returned no forecast points.");
    }
    println!(
        "Forecast: {} rows written to {}",
        forecast.row_count(),
        forecast.location()
    );

    Ok(())
}

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use weather_companion::app::build_services;
use weather_companion::config::Config;
use weather_companion::services::ChatOutcome;

#[derive(Parser)]
#[command(name = "ask")]
#[command(about = "Ask a weather question from the command line", long_about = None)]
struct Cli {
    /// The question, e.g. "weather in Paris next week"
    #[arg(required = true)]
    query: Vec<String>,

    /// Print the tagged outcome as JSON
    #[arg(long)]
    json: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, env = "ASK_TODAY")]
    today: Option<NaiveDate>,
}

fn print_outcome(outcome: &ChatOutcome) {
    match outcome {
        ChatOutcome::ClarificationNeeded {
            message,
            suggested_questions,
        } => {
            println!("❓ {}", message);
            for question in suggested_questions {
                println!("   - {}", question);
            }
        }
        ChatOutcome::LocationNotCovered { message, location } => {
            println!("📍 {} ({})", message, location);
        }
        ChatOutcome::ServiceUnavailable { message } => {
            println!("⚠️  {}", message);
        }
        ChatOutcome::WeatherAnswer {
            headline,
            explanation,
            source_note,
            series,
            averages,
            location,
            date_range_label,
        } => {
            println!("{}\n", headline);
            println!("{}\n", explanation);
            println!("{} | {}", location, date_range_label);
            println!(
                "Averages: {}°C, {}mm, {} m/s over {} days",
                averages.temperature,
                averages.precipitation,
                averages.wind_speed,
                series.len()
            );
            for day in series.observations() {
                println!(
                    "  {}  {:>6.1}°C  {:>6.2}mm  {:>5.1} m/s",
                    day.date, day.temperature, day.precipitation, day.wind_speed
                );
            }
            println!("\n{}", source_note);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let services = build_services(&config)?;

    let query = cli.query.join(" ");
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = services.chat_service.handle(&query, today).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

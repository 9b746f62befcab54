use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use snowcast::api::AppState;
use snowcast::snow::ReadingAssessment;
use snowcast::{Advisor, ConditionsReport, LocationInput, SnowcastConfig, TemperatureUnit};

#[derive(Parser)]
#[command(
    name = "snowcast",
    version,
    about = "Snowmaking conditions advisor",
    long_about = "Estimates wet-bulb temperatures from weather forecasts and rates snowmaking conditions."
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on, overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a conditions report for a location name or "lat,lon"
    Report {
        #[arg(allow_hyphen_values = true)]
        location: String,

        /// Display unit (celsius or fahrenheit)
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SnowcastConfig::load_from_path(cli.config)?;
    snowcast::logging::init(&config.logging, cli.verbose)?;

    let advisor = Advisor::from_config(&config)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting snowcast {} on port {}", snowcast::VERSION, config.server.port);
            let state = AppState {
                advisor,
                default_unit: config.defaults.unit,
            };
            snowcast::web::run(state, &config.server).await
        }
        Command::Report { location, unit, json } => {
            let unit = unit.unwrap_or(config.defaults.unit);
            let report = advisor
                .conditions(LocationInput::parse(&location), unit)
                .await
                .map_err(|e| match e.downcast_ref::<snowcast::SnowcastError>() {
                    Some(err) => anyhow::anyhow!(err.user_message()),
                    None => e,
                })?;

            if json {
                let rendered =
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
                println!("{rendered}");
            } else {
                print_report(&report);
            }
            Ok(())
        }
    }
}

fn print_report(report: &ConditionsReport) {
    let unit = report.unit;
    println!("Snowmaking conditions for {}", report.location.display_name());
    println!(
        "Thresholds: excellent below {}, marginal below {}",
        unit.format(report.thresholds.excellent),
        unit.format(report.thresholds.good)
    );

    if let Some(current) = &report.current {
        println!();
        println!("Now: {}", describe(current, unit));
    }

    if !report.hourly.is_empty() {
        println!();
        println!("Hourly:");
        for hour in &report.hourly {
            println!("  {}  {}", hour.time.format("%a %H:%M"), describe(&hour.assessment, unit));
        }
    }

    if !report.daily.is_empty() {
        println!();
        println!("Daily:");
        for day in &report.daily {
            println!(
                "  {}  high {} / low {}  precip {:.0}%",
                day.date.format("%a %b %d"),
                unit.format(day.high),
                unit.format(day.low),
                day.precipitation_probability_max
            );
            println!("    day:   {}", describe(&day.day, unit));
            for note in &day.day_notes {
                println!("           - {note}");
            }
            println!("    night: {}", describe(&day.night, unit));
            for note in &day.night_notes {
                println!("           - {note}");
            }
        }
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}

fn describe(assessment: &ReadingAssessment, unit: TemperatureUnit) -> String {
    let mut line = format!(
        "{} at {:.0}% RH, wet-bulb {} ({})",
        unit.format(assessment.temperature),
        assessment.humidity,
        unit.format(assessment.wet_bulb),
        assessment.label
    );
    if let Some(excess) = assessment.degrees_too_warm {
        line.push_str(&format!(", {excess:.1}{} too warm", unit.symbol()));
    }
    line
}

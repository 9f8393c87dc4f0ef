mod config;
mod display;
mod error;
mod export;
mod grid;
mod logging;
mod parser;
mod schedule;
mod sink;
mod source;
#[cfg(test)]
mod test_server;
mod web;

use std::path::{Path, PathBuf};
use chrono::Utc;

use config::Config;
use display::compose_message;
use error::AppError;
use export::export_tallies_to_csv;
use schedule::build_report;
use sink::{sink_for, MessageSink, StdoutSink};
use source::{source_for, FileSource, GridSource};

const USAGE: &str = "usage: availability-digest [web [port] | export <grid.json> <out.csv> | preview <grid.json>]";

#[derive(Debug, PartialEq)]
enum Command {
    Digest,
    Web { port: u16 },
    Export { grid: PathBuf, out: PathBuf },
    Preview { grid: PathBuf },
}

/// Reads the subcommand from the arguments after the program name
fn parse_command(args: &[String]) -> Result<Command, AppError> {
    let usage = || AppError::Usage(USAGE.to_string());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] => Ok(Command::Digest),
        ["web"] => Ok(Command::Web { port: 8080 }),
        ["web", port] => port
            .parse()
            .map(|port| Command::Web { port })
            .map_err(|_| usage()),
        ["export", grid, out] => Ok(Command::Export {
            grid: PathBuf::from(grid),
            out: PathBuf::from(out),
        }),
        ["preview", grid] => Ok(Command::Preview {
            grid: PathBuf::from(grid),
        }),
        _ => Err(usage()),
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // before logging so RUST_LOG may come from the file
    let env_file = config::load_env_file(Path::new(config::DOTENV_FILE));
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match env_file {
        Ok(loaded) => {
            tracing::debug!(loaded, file = config::DOTENV_FILE, "env file checked");
            match parse_command(&args) {
                Ok(command) => run(command).await,
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "run failed");
    }
    result
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Digest => run_digest().await,
        Command::Web { port } => {
            let config = Config::from_env()?;
            println!("Access the API at http://localhost:{}/api/digest", port);
            web::start_server(port, config.admin_password).await.map_err(AppError::from)
        }
        Command::Export { grid, out } => export_grid(&grid, &out).await,
        Command::Preview { grid } => preview_grid(&grid).await,
    }
}

/// Fetches the configured grid, builds the digest and delivers it
async fn run_digest() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let source = source_for(config.grid_location()?);
    let rows = source.fetch_rows().await?;

    let report = build_report(&rows);
    let Some(digest) = report.digest() else {
        tracing::info!("no qualifying slots this week, nothing to send");
        return Ok(());
    };

    let message = compose_message(&digest, Utc::now());
    sink_for(&config).deliver(&message).await?;
    tracing::info!(days = report.days.len(), "digest delivered");
    Ok(())
}

/// Prints the digest of a saved grid without delivering it
async fn preview_grid(grid_path: &Path) -> Result<(), AppError> {
    let rows = FileSource::new(grid_path).fetch_rows().await?;
    match build_report(&rows).digest() {
        Some(digest) => StdoutSink.deliver(&compose_message(&digest, Utc::now())).await,
        None => {
            println!("Nothing to report.");
            Ok(())
        }
    }
}

async fn export_grid(grid_path: &Path, csv_path: &Path) -> Result<(), AppError> {
    let rows = FileSource::new(grid_path).fetch_rows().await?;
    let report = build_report(&rows);
    export_tallies_to_csv(&report, csv_path)?;
    println!("Tallies saved to {}", csv_path.display());
    Ok(())
}

//! visitday - candidate visit schedules from shared spreadsheets
//!
//! Usage:
//!   visitday calendar <URL> [--sheet NAME] [-o FILE]       Write one schedule as .ics
//!   visitday participation <REFS_FILE> [--json] [-o FILE]  Meal/1:1 counts across schedules
//!   visitday parse <TSV_FILE>                              Calendar from a local export
//!   visitday init-config [--force]                         Write ~/.visitday/config.json

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use visitday_lib::calendar::synthesize;
use visitday_lib::config::{config_path, load_config, save_config_to};
use visitday_lib::error::Error;
use visitday_lib::orchestrator::{fetch_schedule, fetch_schedules, FetchOptions};
use visitday_lib::participation::{counts_to_tsv, participation_report};
use visitday_lib::schedule::extract_schedule;
use visitday_lib::sheets::{SheetsClient, TableSource};
use visitday_lib::table::parse_tsv;
use visitday_lib::types::Config;

#[derive(Parser)]
#[command(
    name = "visitday",
    version,
    about = "Candidate visit schedules from shared spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one schedule and write it as an iCalendar file
    Calendar {
        /// Spreadsheet link, e.g. https://docs.google.com/spreadsheets/d/<id>/edit#gid=<gid>
        url: String,
        /// Sheet tab to export instead of the link's gid
        #[arg(long)]
        sheet: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count meals and 1:1s per person across many schedules
    Participation {
        /// File with one spreadsheet link per line
        refs_file: PathBuf,
        /// Emit JSON instead of TSV
        #[arg(long)]
        json: bool,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a calendar from a locally saved TSV export
    Parse {
        tsv_file: PathBuf,
    },
    /// Write a config file with every setting at its default
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        log::error!("{}", e);
        eprintln!("Error: {}\n{}", e, e.recovery_suggestion());
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Calendar { url, sheet, output } => {
            let config = load_config()?;
            let client = SheetsClient::new(&config)?;
            let schedule = fetch_schedule(&client, &url, sheet.as_deref()).await?;
            let calendar = synthesize(&schedule);
            log::info!(
                "{}: {} events, {} warnings",
                calendar.title,
                calendar.events.len(),
                calendar.warnings.len()
            );
            write_output(output.as_deref(), &calendar.to_ics())
        }
        Command::Participation {
            refs_file,
            json,
            output,
        } => {
            let config = load_config()?;
            let references = read_references(&refs_file)?;
            let source: Arc<dyn TableSource> = Arc::new(SheetsClient::new(&config)?);
            let options = FetchOptions::from(&config);
            let schedules = fetch_schedules(source, &references, &options, |p| {
                let outcome = if p.succeeded { "ok" } else { "failed" };
                log::info!("[{}/{}] {} {}", p.completed, p.total, outcome, p.reference);
            })
            .await;

            let counts = participation_report(&schedules);
            let rendered = if json {
                serde_json::to_string_pretty(&counts)?
            } else {
                counts_to_tsv(&counts)
            };
            write_output(output.as_deref(), &rendered)
        }
        Command::Parse { tsv_file } => {
            let text = std::fs::read_to_string(&tsv_file)?;
            let calendar = synthesize(&extract_schedule(&parse_tsv(&text)));
            write_output(None, &calendar.to_ics())
        }
        Command::InitConfig { force } => init_config(force),
    }
}

fn init_config(force: bool) -> Result<(), Error> {
    let path = config_path()?;
    if path.exists() && !force {
        log::info!("{} already exists; pass --force to overwrite", path.display());
        return Ok(());
    }
    save_config_to(&path, &Config::default())?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// One reference per line; blank lines and `#` comments are skipped.
fn read_references(path: &Path) -> Result<Vec<String>, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Error> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

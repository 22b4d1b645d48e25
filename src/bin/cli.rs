//! China holiday CLI
//!
//! Local entry point for checking dates and listing holidays.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use china_holiday::{
    ChinaHoliday,
    error::Result,
    models::{Config, Listing},
};

/// holiday - China public holiday lookup
#[derive(Parser, Debug)]
#[command(
    name = "holiday",
    version,
    about = "China public holidays and make-up workdays"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "holiday.toml")]
    config: PathBuf,

    /// Cache file (overrides cache.filename)
    #[arg(long, global = true)]
    cache_file: Option<String>,

    /// Do not read or write the cache file
    #[arg(long, global = true, conflicts_with = "cache_file")]
    no_cache: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a date (YYYY-MM-DD) is a day off
    Check { date: String },

    /// List holidays and workdays of one or more years
    List {
        #[arg(required = true)]
        years: Vec<i32>,
    },

    /// List holidays and workdays strictly between two dates
    Range { start: String, end: String },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_listing(listing: &Listing, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }
    let join = |dates: &[chrono::NaiveDate]| {
        dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    println!("holidays: {}", join(&listing.holidays));
    println!("workdays: {}", join(&listing.workdays));
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(cli.verbose, &config.logging.level);

    if let Some(path) = cli.cache_file {
        config = config.with_filename(path);
    }
    if cli.no_cache {
        config = config.online_only();
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let calendar = ChinaHoliday::new(config)?;
    log::debug!(
        "Cache {}",
        if calendar.is_persistent() {
            "enabled"
        } else {
            "disabled"
        }
    );

    match cli.command {
        Command::Check { date } => {
            let off = calendar.check(&date).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "date": date, "holiday": off }));
            } else {
                println!("{off}");
            }
        }

        Command::List { years } => {
            let listing = calendar.list(&years).await;
            print_listing(&listing, cli.json)?;
        }

        Command::Range { start, end } => {
            let listing = calendar.range(&start, &end).await?;
            if listing.is_empty() {
                log::info!("No holidays or workdays between {} and {}", start, end);
            }
            print_listing(&listing, cli.json)?;
        }
    }

    Ok(())
}

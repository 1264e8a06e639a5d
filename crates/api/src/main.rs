//! Cyclarc - cycle tracker and agenda
//!
//! Without a subcommand the cycle calendar is shown for today using the
//! configured default granularity. The bearer token of the signed-in user is
//! read from `CYCLARC_TOKEN`.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cyclarc_domain::Granularity;
use cyclarc_lib::utils::logging::init_tracing;
use cyclarc_lib::{commands, AppContext};

#[derive(Parser, Debug)]
#[command(name = "cyclarc")]
#[command(version, about = "Cycle tracker and agenda", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the cycle calendar
    Cycle {
        /// month, week or day (defaults to the configured view)
        #[arg(short, long, value_parser = parse_granularity)]
        granularity: Option<Granularity>,
        /// Pivot date as YYYY-MM-DD, today when omitted
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the agenda
    Agenda {
        /// month, week or day (defaults to the configured view)
        #[arg(short, long, value_parser = parse_granularity)]
        granularity: Option<Granularity>,
        /// Pivot date as YYYY-MM-DD, today when omitted
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Record the first day of a period
    StartPeriod {
        /// YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Close the open period on a day
    EndPeriod {
        /// YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}"))
}

fn parse_granularity(raw: &str) -> Result<Granularity, String> {
    raw.parse()
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before configuration so CYCLARC_* variables apply
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    let config = cyclarc_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);
    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let token = std::env::var("CYCLARC_TOKEN").ok();
    let default_granularity = config.view.default_granularity;
    let ctx = AppContext::new(config, token)?;

    let command = args.command.unwrap_or(Command::Cycle { granularity: None, date: None });
    let outcome = match command {
        Command::Cycle { granularity, date } => commands::show_cycle(
            &ctx,
            granularity.unwrap_or(default_granularity),
            date,
        )
        .await
        .map(|text| print!("{text}")),
        Command::Agenda { granularity, date } => commands::show_agenda(
            &ctx,
            granularity.unwrap_or(default_granularity),
            date,
        )
        .await
        .map(|text| print!("{text}")),
        Command::StartPeriod { date } => commands::start_period(&ctx, date).await,
        Command::EndPeriod { date } => commands::end_period(&ctx, date).await,
    };

    for notification in ctx.notifications.drain() {
        if notification.is_error() {
            eprintln!("! {}", notification.message);
        } else {
            println!("✓ {}", notification.message);
        }
    }

    outcome?;
    Ok(())
}

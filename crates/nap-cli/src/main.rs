use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use nap_core::NapUpdate;
use tracing_subscriber::EnvFilter;

use nap_cli::commands::util::{now_minutes, parse_date, parse_nap_id, parse_time, today};
use nap_cli::commands::{history, log, nap, now, schedule, status};
use nap_cli::{Cli, Commands, Config, NapAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(nap_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = nap_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn run_nap_action<W: Write>(
    out: &mut W,
    action: &NapAction,
    config_path: Option<&Path>,
) -> Result<()> {
    let (mut db, _config) = open_database(config_path)?;
    match action {
        NapAction::Add { start, end, date } => {
            let date = parse_date(date.as_deref(), today())?;
            let end = end.as_deref().map(parse_time).transpose()?;
            nap::add(out, &mut db, date, parse_time(start)?, end)
        }
        NapAction::End { id, time } => {
            nap::end(out, &mut db, &parse_nap_id(id)?, parse_time(time)?)
        }
        NapAction::Edit {
            id,
            start,
            end,
            reopen,
        } => {
            let end_time = if *reopen {
                Some(None)
            } else {
                end.as_deref().map(parse_time).transpose()?.map(Some)
            };
            let update = NapUpdate {
                start_time: start.as_deref().map(parse_time).transpose()?,
                end_time,
            };
            nap::edit(out, &mut db, &parse_nap_id(id)?, update)
        }
        NapAction::Move { id, by } => nap::shift(out, &mut db, &parse_nap_id(id)?, *by),
        NapAction::Delete { id } => nap::delete(out, &mut db, &parse_nap_id(id)?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config_path = cli.config.as_deref();
    let mut out = io::stdout().lock();

    match &cli.command {
        Some(Commands::Schedule { date, json }) => {
            let (db, config) = open_database(config_path)?;
            let date = parse_date(date.as_deref(), today())?;
            schedule::run(&mut out, &db, &config, date, *json)?;
        }
        Some(Commands::Now { json }) => {
            let (db, config) = open_database(config_path)?;
            now::run(&mut out, &db, &config, today(), now_minutes(), *json)?;
        }
        Some(Commands::Wake { time, date }) => {
            let (mut db, _config) = open_database(config_path)?;
            let date = parse_date(date.as_deref(), today())?;
            log::wake(&mut out, &mut db, date, parse_time(time)?)?;
        }
        Some(Commands::Bedtime { time, date }) => {
            let (mut db, _config) = open_database(config_path)?;
            let date = parse_date(date.as_deref(), today())?;
            log::bedtime(&mut out, &mut db, date, parse_time(time)?)?;
        }
        Some(Commands::Nap(action)) => {
            run_nap_action(&mut out, action, config_path)?;
        }
        Some(Commands::Skip { slot, date }) => {
            let (mut db, config) = open_database(config_path)?;
            let date = parse_date(date.as_deref(), today())?;
            log::skip(&mut out, &mut db, &config, date, *slot)?;
        }
        Some(Commands::History { days, json }) => {
            let (db, _config) = open_database(config_path)?;
            history::run(&mut out, &db, today(), *days, *json)?;
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(config_path)?;
            status::run(&mut out, &db, &config, today())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}

mod cli;
mod config;
mod db;
mod models;
mod prayer_times;
mod scheduler;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::PrayerTimeRepo;
use prayer_times::PrayerStore;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let mut conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    let store = PrayerStore::new(PrayerTimeRepo::load_all(&conn).context("Loading prayer times")?);
    if store.is_empty() {
        log::info!("No prayer times stored yet");
    } else {
        log::debug!("Loaded {} prayer times from {:?}", store.len(), db_path);
    }

    match cli.command {
        Some(Commands::Import { file }) => handlers::handle_import(&mut conn, &store, &file)?,
        Some(Commands::Times { date }) => handlers::handle_times(&store, &config, date)?,
        Some(Commands::Now) => handlers::handle_now(&store, &config)?,
        Some(Commands::Dates) => handlers::handle_dates(&conn, &store)?,
        Some(Commands::Schedule { date }) => handlers::handle_schedule(&store, &config, date)?,
        Some(Commands::Settings { action }) => handlers::handle_settings(&mut config, &action)?,

        // No subcommand → launch TUI
        None => tui::app::run(&store, &config)?,
    }

    Ok(())
}

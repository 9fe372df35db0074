use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "namaz", version, author, about = "Prayer times from CSV, with notification planning")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import prayer times from a CSV file (date,prayer,start,end)
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Show prayer times for a date
    Times {
        /// Date as YYYY-MM-DD (default: today in the configured time zone)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the current and next prayer
    Now,
    /// List dates that have prayer times
    Dates,
    /// Show the notifications that would be scheduled for a date
    Schedule {
        /// Date as YYYY-MM-DD (default: today in the configured time zone)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Notification settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Write settings to a JSON file
    Export {
        /// Destination file
        file: PathBuf,
    },
    /// Load settings from a JSON file
    Import {
        /// Source file
        file: PathBuf,
    },
    /// Change a setting
    Set {
        #[command(subcommand)]
        setting: SetCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetCommands {
    /// Turn all notifications on or off
    Notifications {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Deliver notifications without sound
    Silent {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// IANA time zone, e.g. Asia/Dhaka
    TimeZone {
        zone: String,
    },
    /// Turn notifications for one prayer on or off
    Prayer {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

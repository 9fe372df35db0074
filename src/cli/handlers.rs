use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::cli::args::{SetCommands, SettingsCommands};
use crate::config::{AppConfig, NotificationSettings};
use crate::db::repository::{MetaRepo, PrayerTimeRepo, LAST_IMPORT_AT, LAST_IMPORT_SOURCE};
use crate::models::{PrayerName, PrayerRecord};
use crate::prayer_times::csv_import::EXPECTED_HEADER;
use crate::prayer_times::{
    available_dates, current_prayer, next_prayer, parse_csv, records_for_date, time_until_end,
    PrayerStore,
};
use crate::scheduler::plan_day;
use crate::utils::format::{format_countdown, format_date_long, format_duration_secs, format_time};
use crate::utils::time::now_in;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Import ──────────────────────────────────────────────────────────────────

/// Parse, persist, then publish. The store only changes once the database
/// write has committed.
pub fn import_csv(
    conn: &mut Connection,
    store: &PrayerStore,
    path: &Path,
) -> Result<Vec<PrayerRecord>> {
    log::info!("Starting CSV import from {:?}", path);
    let file = File::open(path).with_context(|| format!("Opening {:?}", path))?;
    let records = parse_csv(BufReader::new(file))
        .map_err(|e| {
            log::warn!("CSV import failed: {}", e);
            e
        })
        .with_context(|| format!("Importing {:?}", path))?;

    PrayerTimeRepo::replace_all(conn, &records)?;
    MetaRepo::set(conn, LAST_IMPORT_AT, &Utc::now().to_rfc3339())?;
    MetaRepo::set(conn, LAST_IMPORT_SOURCE, &path.display().to_string())?;
    store.replace(records.clone());
    Ok(records)
}

pub fn handle_import(conn: &mut Connection, store: &PrayerStore, path: &Path) -> Result<()> {
    let records = import_csv(conn, store, path)?;
    let dates = available_dates(&records);

    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => {
            println_colored!(
                GREEN,
                "  ✓ Imported {} prayer times ({} to {}, {} days)",
                records.len(),
                first,
                last,
                dates.len()
            );
        }
        _ => {
            println_colored!(AMBER, "  Imported an empty file (header only). No prayer times loaded.");
        }
    }
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    store: &PrayerStore,
    config: &AppConfig,
    date: Option<NaiveDate>,
) -> Result<()> {
    let tz = config.notifications.tz();
    let now = now_in(&tz);
    let today = now.date_naive();
    let date = date.unwrap_or(today);
    let records = store.snapshot();

    println!();
    println_colored!(GOLD, "  Prayer Times — {} ({})", format_date_long(date), tz.name());
    println!();

    let day = records_for_date(&records, date);
    if records.is_empty() {
        print_no_imports();
        return Ok(());
    }
    if day.is_empty() {
        println_colored!(DIM, "  No prayer times for {}", date);
        println!();
        return Ok(());
    }

    let (current, next) = if date == today {
        (
            current_prayer(&records, today, now.time()),
            next_prayer(&records, today, now.time()),
        )
    } else {
        (None, None)
    };

    for r in day {
        let line = format!(
            "  {:<8}  {} – {}",
            r.name().display_name(),
            format_time(r.start()),
            format_time(r.end())
        );
        if current == Some(r) {
            println_colored!(GREEN, "{}  ◀ current", line);
        } else if next == Some(r) {
            println_colored!(AMBER, "{}  ◀ next", line);
        } else if date == today && r.end() < now.time() {
            println_colored!(DIM, "{}", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }
    println!();
    Ok(())
}

fn print_no_imports() {
    println_colored!(AMBER, "  No prayer times imported yet.");
    println_colored!(DIM, "  Run `namaz import <file.csv>` (header: {})", EXPECTED_HEADER);
    println!();
}

// ─── Now ─────────────────────────────────────────────────────────────────────

pub fn handle_now(store: &PrayerStore, config: &AppConfig) -> Result<()> {
    let tz = config.notifications.tz();
    let now = now_in(&tz);
    let today = now.date_naive();
    let time = now.time();
    let records = store.snapshot();

    println!();
    match current_prayer(&records, today, time) {
        Some(r) => {
            let left = match time_until_end(r, time) {
                Some(left) => format!("{} left", format_countdown(left)),
                None => "Prayer time ended".to_string(),
            };
            println_colored!(
                GREEN,
                "  Current: {} ({} – {})  {}",
                r.name(),
                format_time(r.start()),
                format_time(r.end()),
                left
            );
        }
        None => println_colored!(DIM, "  Current: none"),
    }

    match next_prayer(&records, today, time) {
        Some(r) => {
            let starts = r.date().and_time(r.start()) - now.naive_local();
            let when = if r.date() == today {
                format!("at {}", format_time(r.start()))
            } else {
                format!("on {} at {}", r.date(), format_time(r.start()))
            };
            println_colored!(
                AMBER,
                "  Next:    {} {} (in {})",
                r.name(),
                when,
                format_duration_secs(starts.num_seconds())
            );
        }
        None => println_colored!(DIM, "  Next:    none"),
    }
    println!();
    Ok(())
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn handle_dates(conn: &Connection, store: &PrayerStore) -> Result<()> {
    let records = store.snapshot();
    let dates = available_dates(&records);
    println!();
    if dates.is_empty() {
        print_no_imports();
        return Ok(());
    }
    println_colored!(GOLD, "  Available dates ({})", dates.len());
    println!();
    for date in &dates {
        let count = records.iter().filter(|r| r.date() == *date).count();
        println!("  {}  {} prayers", date, count);
    }

    if let Some(source) = MetaRepo::get(conn, LAST_IMPORT_SOURCE)? {
        let at = MetaRepo::get(conn, LAST_IMPORT_AT)?.unwrap_or_default();
        println!();
        println_colored!(
            DIM,
            "  {} rows from {} (imported {})",
            PrayerTimeRepo::count(conn)?,
            source,
            at
        );
    }
    println!();
    Ok(())
}

// ─── Schedule ────────────────────────────────────────────────────────────────

pub fn handle_schedule(
    store: &PrayerStore,
    config: &AppConfig,
    date: Option<NaiveDate>,
) -> Result<()> {
    let settings = &config.notifications;
    let tz = settings.tz();
    let now = now_in(&tz);
    let date = date.unwrap_or(now.date_naive());
    let records = store.snapshot();

    println!();
    println_colored!(GOLD, "  Notifications for {} ({})", format_date_long(date), tz.name());
    println!();

    if !settings.notifications_enabled {
        println_colored!(AMBER, "  Notifications are turned off.");
        println!();
        return Ok(());
    }

    let planned = plan_day(&records, date, settings, &tz, &now);
    if planned.is_empty() {
        println_colored!(DIM, "  Nothing to schedule.");
        println!();
        return Ok(());
    }

    for n in &planned {
        let delay = chrono::TimeDelta::from_std(n.delay).unwrap_or(chrono::TimeDelta::zero());
        let fire_at = now + delay;
        let when = if n.delay.is_zero() {
            "immediately".to_string()
        } else {
            format!("in {}", format_duration_secs(delay.num_seconds()))
        };
        println!(
            "  {:<38} {:<34} {}  {}",
            n.job_name,
            n.payload.title(),
            fire_at.format("%Y-%m-%d %H:%M"),
            when
        );
    }
    if settings.silent_notifications {
        println!();
        println_colored!(DIM, "  (silent)");
    }
    println!();
    Ok(())
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn handle_settings(config: &mut AppConfig, action: &SettingsCommands) -> Result<()> {
    match action {
        SettingsCommands::Show => print_settings(&config.notifications),
        SettingsCommands::Export { file } => {
            let json = config.notifications.export_json()?;
            std::fs::write(file, json).with_context(|| format!("Writing {:?}", file))?;
            println_colored!(GREEN, "  ✓ Settings exported to {}", file.display());
        }
        SettingsCommands::Import { file } => {
            let text =
                std::fs::read_to_string(file).with_context(|| format!("Reading {:?}", file))?;
            config.notifications = NotificationSettings::import_json(&text)
                .with_context(|| format!("Importing settings from {:?}", file))?;
            config.save()?;
            log::info!("Imported settings from {:?}", file);
            println_colored!(GREEN, "  ✓ Settings imported from {}", file.display());
            print_settings(&config.notifications);
        }
        SettingsCommands::Set { setting } => {
            apply_setting(&mut config.notifications, setting)?;
            config.save()?;
            println_colored!(GREEN, "  ✓ Settings saved");
            print_settings(&config.notifications);
        }
    }
    Ok(())
}

fn apply_setting(settings: &mut NotificationSettings, setting: &SetCommands) -> Result<()> {
    match setting {
        SetCommands::Notifications { enabled } => settings.notifications_enabled = *enabled,
        SetCommands::Silent { enabled } => settings.silent_notifications = *enabled,
        SetCommands::TimeZone { zone } => settings.set_time_zone(zone)?,
        SetCommands::Prayer { prayer, enabled } => {
            let name = PrayerName::from_str(prayer).map_err(|_| {
                anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", prayer)
            })?;
            settings.set_prayer_enabled(name, *enabled);
        }
    }
    log::info!("Updated settings: {:?}", setting);
    Ok(())
}

fn print_settings(s: &NotificationSettings) {
    let on_off = |b: bool| if b { "on" } else { "off" };
    println!();
    println_colored!(GOLD, "  Settings");
    println!();
    println!("  Notifications   {}", on_off(s.notifications_enabled));
    println!("  Silent          {}", on_off(s.silent_notifications));
    println!("  Time zone       {}", s.time_zone);
    println!();
    for prayer in PrayerName::all() {
        let enabled = s.prayer_enabled(prayer);
        if enabled {
            println_colored!(BOLD, "  {:<10}      {}", prayer.display_name(), on_off(enabled));
        } else {
            println_colored!(DIM, "  {:<10}      {}", prayer.display_name(), on_off(enabled));
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use std::io::Write;

    fn setup() -> (Connection, PrayerStore, tempfile::TempDir) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        (conn, PrayerStore::default(), tempfile::tempdir().unwrap())
    }

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn import_persists_and_publishes() {
        let (mut conn, store, dir) = setup();
        let path = write(
            &dir,
            "times.csv",
            "date,prayer,start,end\n2024-01-02,Fajr,05:01,06:01\n2024-01-01,Fajr,05:00,06:00\n",
        );

        let records = import_csv(&mut conn, &store, &path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(PrayerTimeRepo::load_all(&conn).unwrap(), records);
        assert!(MetaRepo::get(&conn, LAST_IMPORT_AT).unwrap().is_some());
        assert_eq!(
            MetaRepo::get(&conn, LAST_IMPORT_SOURCE).unwrap(),
            Some(path.display().to_string())
        );
    }

    #[test]
    fn listing_commands_handle_an_empty_store() {
        let (conn, store, _dir) = setup();
        let config = AppConfig::default();
        assert!(handle_dates(&conn, &store).is_ok());
        assert!(handle_times(&store, &config, None).is_ok());
        assert!(handle_times(&store, &config, NaiveDate::from_ymd_opt(2024, 1, 1)).is_ok());
    }

    #[test]
    fn failed_import_keeps_previous_data() {
        let (mut conn, store, dir) = setup();
        let good = write(&dir, "good.csv", "date,prayer,start,end\n2024-01-01,Asr,15:00,16:00\n");
        import_csv(&mut conn, &store, &good).unwrap();

        let bad = write(
            &dir,
            "bad.csv",
            "date,prayer,start,end\n2024-02-01,Fajr,05:00,06:00\n2024-02-01,Dhuhr,noon,13:00\n",
        );
        let err = import_csv(&mut conn, &store, &bad).unwrap_err();
        assert!(format!("{:#}", err).contains("Error in line 3"), "{:#}", err);

        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].name(), PrayerName::Asr);
        assert_eq!(PrayerTimeRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn apply_setting_validates_input() {
        let mut s = NotificationSettings::default();
        apply_setting(&mut s, &SetCommands::TimeZone { zone: "Europe/Istanbul".into() }).unwrap();
        assert_eq!(s.time_zone, "Europe/Istanbul");

        assert!(apply_setting(&mut s, &SetCommands::TimeZone { zone: "Atlantis/Capital".into() }).is_err());
        assert_eq!(s.time_zone, "Europe/Istanbul");

        apply_setting(&mut s, &SetCommands::Prayer { prayer: "zuhr".into(), enabled: false }).unwrap();
        assert!(!s.dhuhr_notification);
        assert!(apply_setting(&mut s, &SetCommands::Prayer { prayer: "witr".into(), enabled: false }).is_err());
    }
}

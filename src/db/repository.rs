use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{PrayerName, PrayerRecord};

pub const LAST_IMPORT_AT: &str = "last_import_at";
pub const LAST_IMPORT_SOURCE: &str = "last_import_source";

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

// ─── Prayer times ───────────────────────────────────────────────────────────

pub struct PrayerTimeRepo;

impl PrayerTimeRepo {
    /// Swap the stored table for `records` in one transaction. If anything
    /// fails the previous import stays in place.
    pub fn replace_all(conn: &mut Connection, records: &[PrayerRecord]) -> Result<()> {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM prayer_times", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO prayer_times (position, date, prayer, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (pos, r) in records.iter().enumerate() {
                stmt.execute(params![
                    pos as i64,
                    r.date().format("%Y-%m-%d").to_string(),
                    r.name().as_str(),
                    r.start().format("%H:%M").to_string(),
                    r.end().format("%H:%M").to_string(),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("Stored {} prayer times", records.len());
        Ok(())
    }

    /// All stored records in import order.
    pub fn load_all(conn: &Connection) -> Result<Vec<PrayerRecord>> {
        let mut stmt = conn.prepare(
            "SELECT date, prayer, start_time, end_time FROM prayer_times ORDER BY position",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (date, prayer, start, end) = row?;
            let name: PrayerName = prayer.parse()?;
            let record = PrayerRecord::new(parse_date(&date)?, name, parse_time(&start)?, parse_time(&end)?)
                .with_context(|| format!("Stored row for {} {}", date, prayer))?;
            result.push(record);
        }
        Ok(result)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let n = conn.query_row("SELECT COUNT(*) FROM prayer_times", [], |row| row.get(0))?;
        Ok(n)
    }
}

// ─── App meta ───────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn record(day: u32, name: PrayerName, h: u32) -> PrayerRecord {
        PrayerRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            name,
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(h + 1, 30, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn replace_all_keeps_order_and_values() {
        let mut conn = conn();
        let records = vec![
            record(1, PrayerName::Maghrib, 18),
            record(1, PrayerName::Fajr, 5),
            record(2, PrayerName::Isha, 20),
        ];
        PrayerTimeRepo::replace_all(&mut conn, &records).unwrap();
        assert_eq!(PrayerTimeRepo::load_all(&conn).unwrap(), records);
    }

    #[test]
    fn replace_all_discards_previous_import() {
        let mut conn = conn();
        PrayerTimeRepo::replace_all(&mut conn, &[record(1, PrayerName::Fajr, 5), record(1, PrayerName::Asr, 15)])
            .unwrap();
        PrayerTimeRepo::replace_all(&mut conn, &[record(9, PrayerName::Isha, 20)]).unwrap();

        let loaded = PrayerTimeRepo::load_all(&conn).unwrap();
        assert_eq!(PrayerTimeRepo::count(&conn).unwrap(), 1);
        assert_eq!(loaded[0].name(), PrayerName::Isha);
    }

    #[test]
    fn meta_upserts() {
        let conn = conn();
        assert_eq!(MetaRepo::get(&conn, LAST_IMPORT_SOURCE).unwrap(), None);
        MetaRepo::set(&conn, LAST_IMPORT_SOURCE, "a.csv").unwrap();
        MetaRepo::set(&conn, LAST_IMPORT_SOURCE, "b.csv").unwrap();
        assert_eq!(MetaRepo::get(&conn, LAST_IMPORT_SOURCE).unwrap().as_deref(), Some("b.csv"));
    }
}

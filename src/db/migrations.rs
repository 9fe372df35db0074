use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS prayer_times (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            position    INTEGER NOT NULL,
            date        TEXT NOT NULL,
            prayer      TEXT NOT NULL
                        CHECK(prayer IN ('fajr','dhuhr','asr','maghrib','isha')),
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_prayer_times_date ON prayer_times(date);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('prayer_times', 'app_meta')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}

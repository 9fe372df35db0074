use chrono::{NaiveDate, NaiveTime};
use std::io::BufRead;
use thiserror::Error;

use crate::models::{PrayerName, PrayerRecord};

pub const EXPECTED_HEADER: &str = "date,prayer,start,end";
const REQUIRED_COLUMNS: [&str; 4] = ["date", "prayer", "start", "end"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file is empty. Expected header: date,prayer,start,end")]
    MissingHeader,
    #[error("Invalid CSV format. Expected header: date,prayer,start,end")]
    InvalidHeader,
    #[error("Error in line {line}: {reason}")]
    Line { line: usize, reason: String },
    #[error("Reading CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a whole CSV document. Any bad row rejects the entire file; on
/// success the records are sorted by date, keeping file order within a day.
pub fn parse_csv<R: BufRead>(reader: R) -> Result<Vec<PrayerRecord>, ImportError> {
    let mut lines = reader.lines();

    let header = lines.next().ok_or(ImportError::MissingHeader)??;
    let header = header.trim_start_matches('\u{feff}');
    log::debug!("CSV header: {}", header);
    if !REQUIRED_COLUMNS.iter().all(|col| header.contains(col)) {
        return Err(ImportError::InvalidHeader);
    }

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        // Header is line 1.
        let line_no = idx + 2;
        let line = line.map_err(|e| ImportError::Line {
            line: line_no,
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_row(&line).map_err(|reason| {
            log::warn!("Error parsing line {}: {}", line_no, line);
            ImportError::Line {
                line: line_no,
                reason,
            }
        })?;
        records.push(record);
    }

    records.sort_by_key(|r| r.date());
    log::info!("Parsed {} prayer times", records.len());
    Ok(records)
}

fn parse_row(line: &str) -> Result<PrayerRecord, String> {
    let parts: Vec<&str> = line.split(',').collect();
    let &[date_str, prayer_str, start_str, end_str] = parts.as_slice() else {
        return Err(format!(
            "Invalid line format. Expected 4 columns, got {}",
            parts.len()
        ));
    };

    let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
        .map_err(|e| format!("Bad date '{}': {}", date_str.trim(), e))?;
    let name: PrayerName = prayer_str.parse().map_err(|e| format!("{}", e))?;
    let start = parse_time(start_str)?;
    let end = parse_time(end_str)?;

    PrayerRecord::new(date, name, start, end).map_err(|e| e.to_string())
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|e| format!("Bad time '{}': {}", s.trim(), e))
}

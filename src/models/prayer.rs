use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer name: {}", s)),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("{name} on {date}: start {start} must be before end {end}")]
    EmptyWindow {
        date: NaiveDate,
        name: PrayerName,
        start: NaiveTime,
        end: NaiveTime,
    },
}

/// One prayer window on one day. Fields are private so `start < end` holds
/// for every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerRecord {
    date: NaiveDate,
    name: PrayerName,
    start: NaiveTime,
    end: NaiveTime,
}

impl PrayerRecord {
    pub fn new(
        date: NaiveDate,
        name: PrayerName,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, RecordError> {
        if start >= end {
            return Err(RecordError::EmptyWindow {
                date,
                name,
                start,
                end,
            });
        }
        Ok(Self {
            date,
            name,
            start,
            end,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn name(&self) -> PrayerName {
        self.name
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn parses_names_case_insensitively_with_variants() {
        assert_eq!("FAJR".parse::<PrayerName>().unwrap(), PrayerName::Fajr);
        assert_eq!("Zuhr".parse::<PrayerName>().unwrap(), PrayerName::Dhuhr);
        assert_eq!(" maghrib ".parse::<PrayerName>().unwrap(), PrayerName::Maghrib);
        assert!("tahajjud".parse::<PrayerName>().is_err());
    }

    #[test]
    fn rejects_window_that_does_not_move_forward() {
        let err = PrayerRecord::new(d(), PrayerName::Asr, t(15, 0), t(15, 0)).unwrap_err();
        assert!(matches!(err, RecordError::EmptyWindow { .. }));
        assert!(PrayerRecord::new(d(), PrayerName::Asr, t(16, 0), t(15, 0)).is_err());
    }

    #[test]
    fn window_contains_both_edges() {
        let r = PrayerRecord::new(d(), PrayerName::Dhuhr, t(12, 0), t(13, 0)).unwrap();
        assert!(r.contains(t(12, 0)));
        assert!(r.contains(t(13, 0)));
        assert!(!r.contains(t(13, 1)));
    }
}

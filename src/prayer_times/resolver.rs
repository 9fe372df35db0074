use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::models::PrayerRecord;

/// The prayer whose window contains `now`, or failing that the one that ended
/// most recently today.
pub fn current_prayer(
    records: &[PrayerRecord],
    today: NaiveDate,
    now: NaiveTime,
) -> Option<&PrayerRecord> {
    let todays: Vec<&PrayerRecord> = records.iter().filter(|r| r.date() == today).collect();

    if let Some(active) = todays.iter().copied().find(|r| r.contains(now)) {
        log::debug!(
            "Active prayer: {} ({}-{})",
            active.name(),
            active.start(),
            active.end()
        );
        return Some(active);
    }

    let ended = todays
        .into_iter()
        .filter(|r| r.end() <= now)
        .max_by_key(|r| r.end());
    match ended {
        Some(r) => log::debug!("Last ended prayer: {} ({})", r.name(), r.end()),
        None => log::debug!("No current or recent prayer for {} {}", today, now),
    }
    ended
}

/// First prayer starting after `now` today, else the earliest prayer on the
/// nearest future date.
pub fn next_prayer(
    records: &[PrayerRecord],
    today: NaiveDate,
    now: NaiveTime,
) -> Option<&PrayerRecord> {
    let later_today = records
        .iter()
        .filter(|r| r.date() == today && r.start() > now)
        .min_by_key(|r| r.start());

    if later_today.is_some() {
        return later_today;
    }

    records
        .iter()
        .filter(|r| r.date() > today)
        .min_by_key(|r| (r.date(), r.start()))
}

/// Records on `date`, earliest start first.
pub fn records_for_date(records: &[PrayerRecord], date: NaiveDate) -> Vec<&PrayerRecord> {
    let mut out: Vec<&PrayerRecord> = records.iter().filter(|r| r.date() == date).collect();
    out.sort_by_key(|r| r.start());
    out
}

pub fn available_dates(records: &[PrayerRecord]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date()).collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Time left in the record's window, `None` once `now` is past the end.
pub fn time_until_end(record: &PrayerRecord, now: NaiveTime) -> Option<TimeDelta> {
    let left = record.end() - now;
    (left > TimeDelta::zero()).then_some(left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn rec(day: u32, name: PrayerName, start: (u32, u32), end: (u32, u32)) -> PrayerRecord {
        PrayerRecord::new(d(day), name, t(start.0, start.1), t(end.0, end.1)).unwrap()
    }

    fn sample() -> Vec<PrayerRecord> {
        vec![
            rec(1, PrayerName::Fajr, (5, 0), (6, 0)),
            rec(1, PrayerName::Dhuhr, (12, 0), (13, 0)),
            rec(2, PrayerName::Dhuhr, (12, 1), (13, 1)),
            rec(2, PrayerName::Fajr, (5, 1), (6, 1)),
        ]
    }

    #[test]
    fn midday_example() {
        let records = sample();
        let current = current_prayer(&records, d(1), t(12, 30)).unwrap();
        assert_eq!(current.name(), PrayerName::Dhuhr);

        let next = next_prayer(&records, d(1), t(12, 30)).unwrap();
        assert_eq!(next.date(), d(2));
        assert_eq!(next.name(), PrayerName::Fajr);
    }

    #[test]
    fn current_falls_back_to_most_recently_ended() {
        let records = sample();
        let current = current_prayer(&records, d(1), t(9, 0)).unwrap();
        assert_eq!(current.name(), PrayerName::Fajr);

        let current = current_prayer(&records, d(1), t(22, 0)).unwrap();
        assert_eq!(current.name(), PrayerName::Dhuhr);
    }

    #[test]
    fn current_is_none_before_first_window() {
        let records = sample();
        assert!(current_prayer(&records, d(1), t(4, 0)).is_none());
    }

    #[test]
    fn current_window_edges_are_inclusive() {
        let records = sample();
        assert_eq!(
            current_prayer(&records, d(1), t(12, 0)).unwrap().name(),
            PrayerName::Dhuhr
        );
        assert_eq!(
            current_prayer(&records, d(1), t(13, 0)).unwrap().name(),
            PrayerName::Dhuhr
        );
    }

    #[test]
    fn next_prefers_today() {
        let records = sample();
        let next = next_prayer(&records, d(1), t(4, 0)).unwrap();
        assert_eq!((next.date(), next.name()), (d(1), PrayerName::Fajr));

        let next = next_prayer(&records, d(1), t(5, 0)).unwrap();
        assert_eq!(next.name(), PrayerName::Dhuhr);
    }

    #[test]
    fn next_tie_breaks_on_start_within_future_date() {
        // Day 2 rows are stored Dhuhr-first; Fajr must still win.
        let records = sample();
        let next = next_prayer(&records, d(1), t(23, 0)).unwrap();
        assert_eq!(next.name(), PrayerName::Fajr);
        assert_eq!(next.date(), d(2));
    }

    #[test]
    fn next_never_goes_backwards() {
        let records = sample();
        for day in 1..=3 {
            for hour in [0, 6, 12, 18, 23] {
                if let Some(next) = next_prayer(&records, d(day), t(hour, 0)) {
                    assert!(next.date() >= d(day));
                }
            }
        }
        assert!(next_prayer(&records, d(3), t(0, 0)).is_none());
    }

    #[test]
    fn no_data_for_date_is_none() {
        assert!(current_prayer(&[], d(1), t(12, 0)).is_none());
        assert!(next_prayer(&[], d(1), t(12, 0)).is_none());
    }

    #[test]
    fn records_for_date_are_ordered_by_start() {
        let records = sample();
        let names: Vec<_> = records_for_date(&records, d(2)).iter().map(|r| r.name()).collect();
        assert_eq!(names, vec![PrayerName::Fajr, PrayerName::Dhuhr]);
        assert_eq!(available_dates(&records), vec![d(1), d(2)]);
    }

    #[test]
    fn time_until_end_stops_at_end() {
        let r = rec(1, PrayerName::Asr, (15, 0), (16, 0));
        assert_eq!(time_until_end(&r, t(15, 45)), Some(TimeDelta::minutes(15)));
        assert_eq!(time_until_end(&r, t(16, 0)), None);
    }
}

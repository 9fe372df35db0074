use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use std::time::Duration;

use crate::config::NotificationSettings;
use crate::models::{NotificationKind, NotificationPayload, PrayerRecord};

/// A notification ready to hand to the job runner.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    /// Stable per prayer and kind, so re-planning replaces the earlier job.
    pub job_name: String,
    pub delay: Duration,
    pub payload: NotificationPayload,
}

/// Wall-clock moment a notification of `kind` is due for `record`.
pub fn target_time(record: &PrayerRecord, kind: NotificationKind) -> NaiveDateTime {
    match kind {
        NotificationKind::Start => record.date().and_time(record.start()),
        NotificationKind::BeforeEnd => {
            record.date().and_time(record.end()) - NotificationKind::lead()
        }
        NotificationKind::End => record.date().and_time(record.end()),
    }
}

/// Delay from `now` until `target` in `tz`. Past targets give zero.
pub fn delay_until(target: NaiveDateTime, tz: &Tz, now: &DateTime<Tz>) -> Duration {
    signed_delay(target, tz, now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Signed distance from `now` to a local wall-clock target.
pub fn signed_delay(target: NaiveDateTime, tz: &Tz, now: &DateTime<Tz>) -> TimeDelta {
    match tz.from_local_datetime(&target).earliest() {
        Some(at) => at.signed_duration_since(*now),
        // Skipped by a DST jump; count plain wall-clock time instead.
        None => target - now.naive_local(),
    }
}

pub fn job_name(record: &PrayerRecord, kind: NotificationKind) -> String {
    format!(
        "prayer_{}_{}_{}",
        kind.as_str(),
        record.date().format("%Y-%m-%d"),
        record.name().display_name()
    )
}

pub fn schedule(
    record: &PrayerRecord,
    kind: NotificationKind,
    tz: &Tz,
    now: &DateTime<Tz>,
) -> ScheduledNotification {
    let delay = delay_until(target_time(record, kind), tz, now);
    ScheduledNotification {
        job_name: job_name(record, kind),
        delay,
        payload: NotificationPayload {
            prayer_name: record.name(),
            notification_type: kind,
        },
    }
}

/// Start, ending-soon and end notifications for one prayer, or nothing if the
/// user has silenced it.
pub fn plan_notifications(
    record: &PrayerRecord,
    settings: &NotificationSettings,
    tz: &Tz,
    now: &DateTime<Tz>,
) -> Vec<ScheduledNotification> {
    if !settings.should_notify(record.name()) {
        log::debug!("Notifications off for {}", record.name());
        return Vec::new();
    }
    NotificationKind::all()
        .into_iter()
        .map(|kind| schedule(record, kind, tz, now))
        .collect()
}

pub fn plan_day(
    records: &[PrayerRecord],
    date: NaiveDate,
    settings: &NotificationSettings,
    tz: &Tz,
    now: &DateTime<Tz>,
) -> Vec<ScheduledNotification> {
    let mut planned: Vec<ScheduledNotification> = records
        .iter()
        .filter(|r| r.date() == date)
        .flat_map(|r| plan_notifications(r, settings, tz, now))
        .collect();
    planned.sort_by_key(|n| n.delay);
    log::info!("Planned {} notifications for {}", planned.len(), date);
    planned
}

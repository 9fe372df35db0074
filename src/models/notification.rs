use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::PrayerName;

/// Lead time of the "ending soon" reminder.
pub const BEFORE_END_LEAD_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Start,
    BeforeEnd,
    End,
}

impl NotificationKind {
    pub fn all() -> [NotificationKind; 3] {
        [
            NotificationKind::Start,
            NotificationKind::BeforeEnd,
            NotificationKind::End,
        ]
    }

    /// Key used in job names, e.g. `prayer_before_end_2024-01-01_Fajr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Start => "start",
            NotificationKind::BeforeEnd => "before_end",
            NotificationKind::End => "end",
        }
    }

    pub fn lead() -> TimeDelta {
        TimeDelta::minutes(BEFORE_END_LEAD_MINUTES)
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data handed to the job runner; everything the notification needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub prayer_name: PrayerName,
    pub notification_type: NotificationKind,
}

impl NotificationPayload {
    pub fn title(&self) -> String {
        let name = self.prayer_name.display_name();
        match self.notification_type {
            NotificationKind::Start => format!("{} Prayer Time Started", name),
            NotificationKind::BeforeEnd => format!("{} Prayer Time Ending Soon", name),
            NotificationKind::End => format!("{} Prayer Time Ended", name),
        }
    }
}

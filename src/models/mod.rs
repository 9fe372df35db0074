pub mod notification;
pub mod prayer;

pub use notification::{NotificationKind, NotificationPayload};
pub use prayer::{PrayerName, PrayerRecord};

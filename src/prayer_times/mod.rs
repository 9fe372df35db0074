pub mod csv_import;
pub mod resolver;
pub mod store;

pub use csv_import::parse_csv;
pub use resolver::{available_dates, current_prayer, next_prayer, records_for_date, time_until_end};
pub use store::PrayerStore;

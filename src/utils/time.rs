use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Current instant in the configured zone.
pub fn now_in(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_the_requested_zone() {
        let now = now_in(&Tz::Asia__Dhaka);
        assert_eq!(now.timezone(), Tz::Asia__Dhaka);
        assert!((Utc::now() - now.with_timezone(&Utc)).num_seconds().abs() < 5);
    }
}

use chrono::{NaiveDate, NaiveTime, TimeDelta};

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// "HH:MM:SS" for a countdown; negative values read as zero.
pub fn format_countdown(left: TimeDelta) -> String {
    let secs = left.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// "Jan 01, 2024", as on the date picker
pub fn format_date_long(d: NaiveDate) -> String {
    d.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration_secs(0), "now");
        assert_eq!(format_duration_secs(59 * 60), "59m");
        assert_eq!(format_duration_secs(3 * 3600 + 5 * 60), "3h 5m");
    }

    #[test]
    fn countdowns() {
        assert_eq!(format_countdown(TimeDelta::seconds(3725)), "01:02:05");
        assert_eq!(format_countdown(TimeDelta::seconds(-5)), "00:00:00");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date_long(d), "Jan 01, 2024");
    }
}

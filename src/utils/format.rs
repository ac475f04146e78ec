//! Countdown and uptime formatting

/// Format seconds as `HH:MM:SS`, or `MM:SS` under an hour
pub fn format_countdown(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format an elapsed duration as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_formats() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(3599), "59:59");
        assert_eq!(format_countdown(3600), "01:00:00");
        assert_eq!(format_countdown(8 * 3600 + 5), "08:00:05");
    }

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(7), "7s");
        assert_eq!(format_uptime(61), "1m 1s");
        assert_eq!(format_uptime(3723), "1h 2m 3s");
    }
}

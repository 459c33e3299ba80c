/// File size for the drop zone, always in megabytes, e.g. `12.34 MB`.
pub fn format_size(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    format!("{:.2} MB", bytes as f64 / MB)
}

/// Offset within the source video as `m:ss` (or `h:mm:ss`).
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Relevance score in `0..=1` as a rounded percentage.
pub fn score_percent(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub fn round_seconds(seconds: f64) -> u64 {
    seconds.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(512 * 1024), "0.50 MB");
        assert_eq!(format_size(25 * 1024 * 1024), "25.00 MB");
        assert_eq!(format_size(500 * 1024 * 1024), "500.00 MB");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(65.9), "1:05");
        assert_eq!(format_timestamp(3725.0), "1:02:05");
        assert_eq!(format_timestamp(-3.0), "0:00");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(score_percent(0.873), 87);
        assert_eq!(score_percent(0.875), 88);
        assert_eq!(score_percent(1.7), 100);
        assert_eq!(round_seconds(27.5), 28);
        assert_eq!(round_seconds(27.49), 27);
    }
}

use std::fmt::Write;
use std::time::{Duration, Instant};

/// Instant the service started, captured once at startup.
#[derive(Debug, Clone, Copy)]
pub struct StartTime(Instant);

impl StartTime {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Time elapsed since start. Monotonic, so never decreases between calls.
    pub fn uptime(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Formats a duration as compact text: `1h2m3.5s`, `42.1s`, `250ms`, `0s`.
///
/// Durations under a second use the largest sub-second unit that keeps the
/// integer part non-zero. Trailing fractional zeros are dropped.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    match nanos {
        0 => return "0s".to_owned(),
        1..1_000 => return format!("{nanos}ns"),
        1_000..1_000_000 => return format!("{}µs", fraction(nanos, 1_000, 3)),
        1_000_000..1_000_000_000 => return format!("{}ms", fraction(nanos, 1_000_000, 6)),
        _ => {}
    }

    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs / 60) % 60, secs % 60);
    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let seconds = u128::from(seconds) * 1_000_000_000 + u128::from(d.subsec_nanos());
    let _ = write!(out, "{}s", fraction(seconds, 1_000_000_000, 9));
    out
}

fn fraction(value: u128, unit: u128, digits: usize) -> String {
    let (whole, rem) = (value / unit, value % unit);
    if rem == 0 {
        return whole.to_string();
    }
    let frac = format!("{rem:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_sub_second() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }

    #[test]
    fn test_format_duration_seconds_and_up() {
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(42_100)), "42.1s");
        assert_eq!(format_duration(Duration::from_nanos(1_000_000_001)), "1.000000001s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_millis(3_723_500)), "1h2m3.5s");
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let start = StartTime::now();
        let first = start.uptime();
        let second = start.uptime();
        assert!(second >= first);
    }
}

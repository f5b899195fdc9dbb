//! Duration parsing utilities.

use anyhow::Context;
use std::time::Duration;

/// Parse an interval string like "100ms", "2s", "1m", "1h" or "250".
/// Supports:
/// - Plain numbers (interpreted as milliseconds): "250"
/// - Milliseconds suffix: "100ms"
/// - Seconds suffix: "2s"
/// - Minutes suffix: "1m"
/// - Hours suffix: "1h"
///
/// Zero is rejected: the pacing loop needs a real pause between sends.
pub fn parse_interval(s: &str) -> anyhow::Result<Duration> {
    let interval = parse_duration(s)?;
    if interval.is_zero() {
        anyhow::bail!("Interval must be greater than zero: {s}");
    }
    Ok(interval)
}

fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        let millis: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {num_str}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(num_str) = s.strip_suffix('h') {
        let hours: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid hours value: {num_str}"))?;
        let secs = hours
            .checked_mul(3600)
            .with_context(|| format!("Hours value too large: {num_str}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let minutes: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid minutes value: {num_str}"))?;
        let secs = minutes
            .checked_mul(60)
            .with_context(|| format!("Minutes value too large: {num_str}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        let secs: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid seconds value: {num_str}"))?;
        return Ok(Duration::from_secs(secs));
    }

    // No suffix - treat as milliseconds
    let millis: u64 = s
        .parse()
        .with_context(|| format!("Invalid duration value: {s}"))?;
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_interval("100ms").unwrap(), Duration::from_millis(100));
        assert_eq!(parse_interval("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_interval("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_plain_number_is_milliseconds() {
        assert_eq!(parse_interval("250").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_interval(" 75 ").unwrap(), Duration::from_millis(75));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(parse_interval("").is_err());
        assert!(parse_interval("fast").is_err());
        assert!(parse_interval("-5ms").is_err());
        assert!(parse_interval("1.5s").is_err());
    }

    #[test]
    fn test_rejects_zero() {
        let err = parse_interval("0ms").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_rejects_overflowing_hours_and_minutes() {
        let err = parse_interval("5124095576030432h").unwrap_err();
        assert!(err.to_string().contains("too large"));

        let err = parse_interval(&format!("{}m", u64::MAX)).unwrap_err();
        assert!(err.to_string().contains("too large"));

        assert_eq!(
            parse_interval("5124095576030h").unwrap(),
            Duration::from_secs(5_124_095_576_030 * 3600)
        );
    }
}

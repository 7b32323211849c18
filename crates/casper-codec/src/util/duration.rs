//! Humanized durations for transaction TTLs.
//!
//! A TTL is a whole number of milliseconds. Its JSON form is a list of
//! `<number><unit>` terms, e.g. `30m`, `1h 30m`, `2days`, `1day 12h 500ms`.

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;

/// Error type for duration parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParseError {
    pub message: String,
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DurationParseError {}

const NS_PER_MS: u128 = 1_000_000;
// Calendar units as nodes render them: 30.44-day months, 365.25-day years.
const MS_PER_MONTH: u64 = 2_630_016 * MS_PER_SECOND;
const MS_PER_YEAR: u64 = 31_557_600 * MS_PER_SECOND;

fn unit_nanos(unit: &str) -> Option<u128> {
    let ms = match unit {
        "ns" | "nsec" | "nanos" => return Some(1),
        "us" | "usec" | "micros" => return Some(1_000),
        "ms" | "msec" | "millis" => 1,
        "s" | "sec" | "secs" | "second" | "seconds" => MS_PER_SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => MS_PER_HOUR,
        "d" | "day" | "days" => MS_PER_DAY,
        "w" | "week" | "weeks" => MS_PER_WEEK,
        "M" | "month" | "months" => MS_PER_MONTH,
        "y" | "year" | "years" => MS_PER_YEAR,
        _ => return None,
    };
    Some(u128::from(ms) * NS_PER_MS)
}

/// Parses a humanized duration into milliseconds.
///
/// Sub-millisecond remainders from `us` and `ns` terms are truncated.
pub fn parse_ttl(input: &str) -> Result<u64, DurationParseError> {
    let err = |reason: &str| DurationParseError {
        message: format!("Invalid duration {:?}: {}", input, reason),
    };

    let mut rest = input.trim_start();
    if rest.is_empty() {
        return Err(err("empty"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(err("expected a number"));
        }
        let number: u64 = rest[..digits_end].parse().map_err(|_| err("number too large"))?;
        rest = &rest[digits_end..];

        let unit_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if unit_end == 0 {
            return Err(err("missing unit"));
        }
        let factor = unit_nanos(&rest[..unit_end]).ok_or_else(|| err("unknown unit"))?;
        rest = rest[unit_end..].trim_start();

        total = u128::from(number)
            .checked_mul(factor)
            .and_then(|term| total.checked_add(term))
            .ok_or_else(|| err("overflow"))?;
    }

    u64::try_from(total / NS_PER_MS).map_err(|_| err("overflow"))
}

/// Formats milliseconds as a humanized duration (`0s` for zero).
pub fn format_ttl(millis: u64) -> String {
    if millis == 0 {
        return "0s".to_string();
    }

    let days = millis / MS_PER_DAY;
    let hours = (millis % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (millis % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (millis % MS_PER_MINUTE) / MS_PER_SECOND;
    let ms = millis % MS_PER_SECOND;

    let mut parts = Vec::with_capacity(5);
    match days {
        0 => {}
        1 => parts.push("1day".to_string()),
        n => parts.push(format!("{}days", n)),
    }
    for (value, unit) in [(hours, "h"), (minutes, "m"), (seconds, "s"), (ms, "ms")] {
        if value > 0 {
            parts.push(format!("{}{}", value, unit));
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_terms() {
        assert_eq!(parse_ttl("30m").unwrap(), 1_800_000);
        assert_eq!(parse_ttl("2h").unwrap(), 7_200_000);
        assert_eq!(parse_ttl("1day").unwrap(), 86_400_000);
        assert_eq!(parse_ttl("2days").unwrap(), 172_800_000);
        assert_eq!(parse_ttl("500ms").unwrap(), 500);
        assert_eq!(parse_ttl("45s").unwrap(), 45_000);
    }

    #[test]
    fn test_parse_compound() {
        assert_eq!(parse_ttl("1h 30m").unwrap(), 5_400_000);
        assert_eq!(parse_ttl("1h30m").unwrap(), 5_400_000);
        assert_eq!(parse_ttl("1day 2h 3m 4s 5ms").unwrap(), 93_784_005);
    }

    #[test]
    fn test_parse_calendar_and_sub_millisecond_units() {
        assert_eq!(parse_ttl("1month").unwrap(), 2_630_016_000);
        assert_eq!(parse_ttl("2months").unwrap(), 5_260_032_000);
        assert_eq!(parse_ttl("1M").unwrap(), 2_630_016_000);
        assert_eq!(parse_ttl("1year").unwrap(), 31_557_600_000);
        assert_eq!(parse_ttl("2years 1month").unwrap(), 65_745_216_000);
        assert_eq!(parse_ttl("1y 1m").unwrap(), 31_557_660_000);
        assert_eq!(parse_ttl("1500us").unwrap(), 1);
        assert_eq!(parse_ttl("1s 999us 999999ns").unwrap(), 1_001);
        assert_eq!(parse_ttl("500ns").unwrap(), 0);
        assert!(parse_ttl("18446744073709551615years").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_ttl(1_800_000), "30m");
        assert_eq!(format_ttl(5_400_000), "1h 30m");
        assert_eq!(format_ttl(86_400_000), "1day");
        assert_eq!(format_ttl(172_800_000), "2days");
        assert_eq!(format_ttl(93_784_005), "1day 2h 3m 4s 5ms");
        assert_eq!(format_ttl(0), "0s");
    }

    #[test]
    fn test_roundtrip() {
        for millis in [0, 1, 999, 1_000, 1_800_000, 5_400_000, 86_400_000, 93_784_005] {
            assert_eq!(parse_ttl(&format_ttl(millis)).unwrap(), millis);
        }
    }

    #[test]
    fn test_invalid() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("30").is_err()); // missing unit
        assert!(parse_ttl("m30").is_err());
        assert!(parse_ttl("30 parsecs").is_err());
        assert!(parse_ttl("99999999999999999999ms").is_err());
    }
}

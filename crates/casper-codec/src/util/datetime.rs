//! RFC 3339 timestamp parsing and formatting.
//!
//! Transaction timestamps are milliseconds since the Unix epoch on the wire
//! and RFC 3339 strings with millisecond precision in JSON
//! (`2024-03-15T14:30:00.000Z`).

const MILLISECONDS_PER_SECOND: i64 = 1_000;
const MILLISECONDS_PER_MINUTE: i64 = 60 * MILLISECONDS_PER_SECOND;
const MILLISECONDS_PER_HOUR: i64 = 60 * MILLISECONDS_PER_MINUTE;
const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;

/// Last millisecond with a four-digit year (`9999-12-31T23:59:59.999Z`).
pub const MAX_TIMESTAMP_MILLIS: u64 = 253_402_300_799_999;

/// Error type for RFC 3339 parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// A timestamp with no four-digit-year RFC 3339 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRangeError {
    pub millis: u64,
}

impl std::fmt::Display for TimestampRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timestamp {} ms is after year 9999", self.millis)
    }
}

impl std::error::Error for TimestampRangeError {}

fn invalid(what: &str, input: &str) -> DateTimeParseError {
    DateTimeParseError {
        message: format!("Invalid {} in timestamp: {}", what, input),
    }
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i64, DateTimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(invalid("timezone offset", offset));
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid("timezone offset", offset)),
    };

    let hours: i64 = offset[1..3]
        .parse()
        .map_err(|_| invalid("timezone offset", offset))?;
    let minutes: i64 = offset[4..6]
        .parse()
        .map_err(|_| invalid("timezone offset", offset))?;

    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid("timezone offset", offset));
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Parses fractional seconds and returns milliseconds (extra digits truncated).
fn parse_fractional_millis(frac: &str) -> i64 {
    let mut padded: String = frac.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

/// Returns true if the given year is a leap year.
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Calculates days since Unix epoch for a given date (Howard Hinnant's algorithm).
fn date_to_days(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 {
        month as i64 + 9
    } else {
        month as i64 - 3
    };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146097 + doe - 719468
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Parses an RFC 3339 datetime and returns milliseconds since the Unix epoch.
///
/// Accepts `T` or a space as separator, optional fractional seconds (beyond
/// millisecond precision is truncated) and `Z` or a numeric offset.
pub fn parse_timestamp(input: &str) -> Result<u64, DateTimeParseError> {
    // Minimum length is 19 (YYYY-MM-DDTHH:MM:SS)
    let bytes = input.as_bytes();
    if bytes.len() < 19 || !input.is_ascii() {
        return Err(invalid("format", input));
    }
    if bytes[4] != b'-' || bytes[7] != b'-' || (bytes[10] != b'T' && bytes[10] != b't' && bytes[10] != b' ') {
        return Err(invalid("format", input));
    }
    if bytes[13] != b':' || bytes[16] != b':' {
        return Err(invalid("format", input));
    }

    let year: i64 = input[..4].parse().map_err(|_| invalid("year", input))?;
    let month: u32 = input[5..7].parse().map_err(|_| invalid("month", input))?;
    let day: u32 = input[8..10].parse().map_err(|_| invalid("day", input))?;
    let hours: i64 = input[11..13].parse().map_err(|_| invalid("hours", input))?;
    let minutes: i64 = input[14..16].parse().map_err(|_| invalid("minutes", input))?;
    let seconds: i64 = input[17..19].parse().map_err(|_| invalid("seconds", input))?;

    if !(1..=12).contains(&month) {
        return Err(invalid("month", input));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(invalid("day", input));
    }
    if hours > 23 {
        return Err(invalid("hours", input));
    }
    if minutes > 59 {
        return Err(invalid("minutes", input));
    }
    if seconds > 59 {
        return Err(invalid("seconds", input));
    }

    let rest = &input[19..];
    let (millis, offset_str) = if let Some(frac_rest) = rest.strip_prefix('.') {
        let frac_end = frac_rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(frac_rest.len());
        if frac_end == 0 {
            return Err(invalid("fractional seconds", input));
        }
        (
            parse_fractional_millis(&frac_rest[..frac_end]),
            &frac_rest[frac_end..],
        )
    } else {
        (0, rest)
    };

    let offset_min = if offset_str.is_empty() {
        0
    } else {
        parse_timezone_offset(offset_str)?
    };

    let local = date_to_days(year, month, day) * MILLISECONDS_PER_DAY
        + hours * MILLISECONDS_PER_HOUR
        + minutes * MILLISECONDS_PER_MINUTE
        + seconds * MILLISECONDS_PER_SECOND
        + millis;

    // local time = UTC + offset
    let epoch_millis = local - offset_min * MILLISECONDS_PER_MINUTE;
    u64::try_from(epoch_millis).map_err(|_| DateTimeParseError {
        message: format!("Timestamp before Unix epoch: {}", input),
    })
}

/// Formats milliseconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Fails past [`MAX_TIMESTAMP_MILLIS`], which [`parse_timestamp`] could not
/// read back.
pub fn format_timestamp(epoch_millis: u64) -> Result<String, TimestampRangeError> {
    if epoch_millis > MAX_TIMESTAMP_MILLIS {
        return Err(TimestampRangeError { millis: epoch_millis });
    }
    let epoch_millis = epoch_millis as i64;
    let days = epoch_millis / MILLISECONDS_PER_DAY;
    let time = epoch_millis % MILLISECONDS_PER_DAY;

    let (year, month, day) = days_to_date(days);

    let hours = time / MILLISECONDS_PER_HOUR;
    let minutes = (time % MILLISECONDS_PER_HOUR) / MILLISECONDS_PER_MINUTE;
    let seconds = (time % MILLISECONDS_PER_MINUTE) / MILLISECONDS_PER_SECOND;
    let millis = time % MILLISECONDS_PER_SECOND;

    Ok(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year, month, day, hours, minutes, seconds, millis
    ))
}

/// Returns the current time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(
            parse_timestamp("2024-03-15T14:30:00Z").unwrap(),
            1_710_513_000_000
        );
        assert_eq!(
            parse_timestamp("2024-03-15T14:30:00.123Z").unwrap(),
            1_710_513_000_123
        );
        // Sub-millisecond digits are truncated
        assert_eq!(
            parse_timestamp("2024-03-15T14:30:00.123999Z").unwrap(),
            1_710_513_000_123
        );
        assert_eq!(
            parse_timestamp("2024-03-15T14:30:00.5Z").unwrap(),
            1_710_513_000_500
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format_timestamp(0).unwrap(), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(1_710_513_000_000).unwrap(), "2024-03-15T14:30:00.000Z");
        assert_eq!(format_timestamp(1_710_513_000_123).unwrap(), "2024-03-15T14:30:00.123Z");
    }

    #[test]
    fn test_format_year_boundary() {
        let last = format_timestamp(253_402_300_799_999).unwrap();
        assert_eq!(last, "9999-12-31T23:59:59.999Z");
        assert_eq!(parse_timestamp(&last).unwrap(), MAX_TIMESTAMP_MILLIS);

        assert_eq!(
            format_timestamp(253_402_300_800_000),
            Err(TimestampRangeError { millis: 253_402_300_800_000 })
        );
        assert!(format_timestamp(i64::MAX as u64 + 1).is_err());
        assert!(format_timestamp(u64::MAX).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let timestamps = [
            "1970-01-01T00:00:00.000Z",
            "2000-02-29T12:00:00.001Z", // leap year
            "2024-03-15T14:30:00.123Z",
            "2024-12-31T23:59:59.999Z",
        ];

        for ts in timestamps {
            let millis = parse_timestamp(ts).unwrap();
            assert_eq!(format_timestamp(millis).unwrap(), ts, "Roundtrip failed for {}", ts);
        }
    }

    #[test]
    fn test_offset() {
        let with_offset = parse_timestamp("2024-03-15T14:30:00+05:30").unwrap();
        let utc = parse_timestamp("2024-03-15T09:00:00Z").unwrap();
        assert_eq!(with_offset, utc);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_timestamp("2024-13-01T00:00:00Z").is_err()); // invalid month
        assert!(parse_timestamp("2023-02-29T00:00:00Z").is_err()); // not a leap year
        assert!(parse_timestamp("2024-03-15T24:00:00Z").is_err()); // invalid hour
        assert!(parse_timestamp("2024-03-15T14:30:00.Z").is_err()); // empty fraction
        assert!(parse_timestamp("2024-03-15T14:30:00+24:01").is_err());
        assert!(parse_timestamp("1969-12-31T23:59:59Z").is_err()); // before epoch
        assert!(parse_timestamp("not a timestamp at all").is_err());
    }
}

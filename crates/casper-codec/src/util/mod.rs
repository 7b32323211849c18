//! Utility modules: checksummed hex, timestamps and durations.

pub mod checksum;
pub mod datetime;
pub mod duration;

pub use checksum::{ChecksumStatus, Decoded};
pub use datetime::{
    format_timestamp, now_millis, parse_timestamp, DateTimeParseError, TimestampRangeError, MAX_TIMESTAMP_MILLIS,
};
pub use duration::{format_ttl, parse_ttl, DurationParseError};

use crate::error::{ErrorKind, Result};
use chrono::TimeZone;
use exn::{OptionExt, ResultExt};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] time [hour]-[minute]-[second]");

/// A time zone: the UTC offset in effect at any given instant.
///
/// Zones with daylight saving answer differently for summer and winter
/// timestamps, so the offset is looked up per photo.
pub trait Zone: Send + Sync {
    /// Offset in effect at `timestamp` (Unix epoch seconds).
    fn offset_at(&self, timestamp: i64) -> Result<UtcOffset>;
}

/// A fixed offset, the same all year round.
impl Zone for UtcOffset {
    fn offset_at(&self, _timestamp: i64) -> Result<UtcOffset> {
        Ok(*self)
    }
}

/// The machine's time zone, including its daylight saving rules.
impl Zone for chrono::Local {
    fn offset_at(&self, timestamp: i64) -> Result<UtcOffset> {
        let instant = chrono::DateTime::from_timestamp(timestamp, 0).ok_or_raise(|| out_of_range(timestamp))?;
        let seconds = self.offset_from_utc_datetime(&instant.naive_utc()).local_minus_utc();
        UtcOffset::from_whole_seconds(seconds).or_raise(|| out_of_range(timestamp))
    }
}

fn out_of_range(timestamp: i64) -> ErrorKind {
    ErrorKind::MalformedResponse(format!("timestamp out of range: {timestamp}"))
}

/// Formats a Unix timestamp as `YYYY-MM-DD time HH-MM-SS` in the offset
/// `zone` has at that instant.
pub fn format_timestamp(timestamp: i64, zone: &dyn Zone) -> Result<String> {
    let malformed = || out_of_range(timestamp);
    let offset = zone.offset_at(timestamp)?;
    OffsetDateTime::from_unix_timestamp(timestamp)
        .or_raise(malformed)?
        .checked_to_offset(offset)
        .ok_or_raise(malformed)?
        .format(FORMAT)
        .or_raise(malformed)
}

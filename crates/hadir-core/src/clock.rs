//! Fixed-offset WITA clock and daily time windows.
//!
//! All attendance decisions are made against WITA (Waktu Indonesia Tengah,
//! UTC+8). This is a fixed offset rather than an IANA timezone lookup, so it
//! never shifts with the host locale or daylight saving. The clock itself is
//! an injectable trait so window logic can be tested deterministically.

use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seconds east of UTC for WITA (UTC+8).
const WITA_OFFSET_SECONDS: i32 = 8 * 3600;

/// The fixed WITA offset.
#[must_use]
pub fn wita() -> FixedOffset {
    FixedOffset::east_opt(WITA_OFFSET_SECONDS).expect("UTC+8 is a valid offset")
}

/// Source of the current instant.
///
/// Production uses [`SystemClock`]; tests use [`FixedClock`] to pin the
/// moment a check-in or check-out is evaluated at.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// The current instant converted to WITA.
    fn now_wita(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&wita())
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Today's date in WITA as `YYYY-MM-DD`.
///
/// This is the natural key for the daily attendance record. It must come
/// from the fixed-offset clock, not the machine-local date, or records near
/// the UTC midnight boundary land on the wrong day.
#[must_use]
pub fn wita_date_string(clock: &dyn Clock) -> String {
    clock.now_wita().format("%Y-%m-%d").to_string()
}

/// A wall-clock time of day, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
}

impl ClockTime {
    /// Create a clock time, returning `None` when out of range.
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes_since_midnight(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Parse `"HH:MM"` (a trailing `:SS` is tolerated and ignored).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let hour: u8 = parts.next()?.parse().ok()?;
        let minute: u8 = parts.next()?.parse().ok()?;
        Self::new(hour, minute)
    }

    /// The wall-clock time of `instant`, truncated to the minute.
    #[must_use]
    pub fn from_instant(instant: DateTime<FixedOffset>) -> Self {
        Self {
            hour: instant.hour() as u8,
            minute: instant.minute() as u8,
        }
    }
}

// Serialized as a `"HH:MM"` string, so the OpenAPI schema is a string.
impl utoipa::PartialSchema for ClockTime {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::SchemaType::Type(
                utoipa::openapi::schema::Type::String,
            ))
            .examples(["07:30"])
            .into()
    }
}

impl ToSchema for ClockTime {}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid clock time: '{s}'")))
    }
}

/// An inclusive same-day window of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeWindow {
    /// Window opens at this time (inclusive).
    pub start: ClockTime,
    /// Window closes at this time (inclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Create a window. `None` when `end` precedes `start`; windows never
    /// wrap past midnight.
    #[must_use]
    pub fn new(start: ClockTime, end: ClockTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whether `time` falls inside the window, inclusive on both ends.
    #[must_use]
    pub fn contains(&self, time: ClockTime) -> bool {
        let t = time.minutes_since_midnight();
        (self.start.minutes_since_midnight()..=self.end.minutes_since_midnight()).contains(&t)
    }

    /// Whether the window is well-formed (`start <= end`).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

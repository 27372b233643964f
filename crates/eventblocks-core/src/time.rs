//! Time types for calendar events.
//!
//! This module provides [`EventTimestamp`] for event start/end times as they
//! arrive from the upstream calendar service, plus the two display helpers
//! used by block rendering: [`format_time`] and [`calculate_duration`].
//!
//! Upstream timestamps already carry the wall-clock hour the user expects to
//! see. They are kept with their written offset and never converted into the
//! timezone of the machine running the renderer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Formats with an explicit offset, besides RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
];

/// Formats without an offset; these are read as offset zero.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Error returned when a timestamp string matches none of the accepted forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp: {input:?}")]
pub struct TimestampError {
    input: String,
}

impl TimestampError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Clock style for displayed times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// 12-hour format with AM/PM (e.g., "2:30 PM").
    #[default]
    #[serde(rename = "12")]
    H12,
    /// 24-hour format (e.g., "14:30").
    #[serde(rename = "24")]
    H24,
}

impl TimeFormat {
    /// Returns the settings value for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H12 => "12",
            Self::H24 => "24",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "12" => Ok(Self::H12),
            "24" => Ok(Self::H24),
            other => Err(format!("invalid time format {other:?}, expected \"12\" or \"24\"")),
        }
    }
}

/// The start or end of a calendar event.
///
/// Ordering and equality compare the absolute instant; display reads the
/// wall clock in the offset the timestamp was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTimestamp(DateTime<FixedOffset>);

impl EventTimestamp {
    /// Wraps an already-parsed datetime.
    pub fn new(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }

    /// Parses any of the timestamp forms the upstream service is known to emit.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS+HH:MM`, and naive
    /// `YYYY-MM-DD[T ]HH:MM[:SS]` which is read as offset zero.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let s = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(naive.and_utc().fixed_offset()));
            }
        }

        Err(TimestampError {
            input: input.to_string(),
        })
    }

    /// Returns the underlying datetime.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Hour and minute as written, without any timezone conversion.
    pub fn wall_clock(&self) -> (u32, u32) {
        (self.0.hour(), self.0.minute())
    }

    /// Calendar date as written.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl FromStr for EventTimestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EventTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for EventTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Formats the wall-clock time of a timestamp.
///
/// `H24` gives `HH:MM`; `H12` gives `H:MM AM|PM` with midnight shown as 12.
pub fn format_time(timestamp: &EventTimestamp, format: TimeFormat) -> String {
    let (hour, minute) = timestamp.wall_clock();
    match format {
        TimeFormat::H24 => format!("{hour:02}:{minute:02}"),
        TimeFormat::H12 => {
            let meridiem = if hour >= 12 { "PM" } else { "AM" };
            let display_hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{display_hour}:{minute:02} {meridiem}")
        }
    }
}

/// Formats the elapsed time between two timestamps as `HH:MM:SS`.
///
/// Whole seconds are taken with floor division. An end before the start is
/// not clamped: the magnitude is shown with a leading `-`.
pub fn calculate_duration(start: &EventTimestamp, end: &EventTimestamp) -> String {
    let elapsed_ms = end.timestamp_millis() - start.timestamp_millis();
    let total_seconds = elapsed_ms.div_euclid(1000);
    let sign = if total_seconds < 0 { "-" } else { "" };
    let magnitude = total_seconds.unsigned_abs();

    format!(
        "{sign}{:02}:{:02}:{:02}",
        magnitude / 3600,
        (magnitude % 3600) / 60,
        magnitude % 60
    )
}

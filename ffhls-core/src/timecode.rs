//! Timecodes used for seeking and clip durations.
//!
//! A [`TimeCode`] is a non-negative point in time with centisecond precision.
//! It renders as `HH:MM:SS.cc`, the form ffmpeg accepts for `-ss` and `-t`.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// A non-negative time value stored in hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeCode {
    centis: u64,
}

impl TimeCode {
    /// Creates a timecode from hours, minutes, seconds and hundredths.
    ///
    /// Fails when the total does not fit in a `u64` count of hundredths.
    pub fn new(hours: u64, minutes: u64, seconds: u64, centis: u64) -> CoreResult<Self> {
        hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .and_then(|m| m.checked_mul(60))
            .and_then(|s| s.checked_add(seconds))
            .and_then(|s| s.checked_mul(100))
            .and_then(|c| c.checked_add(centis))
            .map(|centis| Self { centis })
            .ok_or_else(|| {
                CoreError::InvalidTimeCode(format!("{hours}:{minutes}:{seconds}.{centis}"))
            })
    }

    /// Creates a timecode from a number of seconds, rounded to the nearest hundredth.
    pub fn from_seconds(seconds: f64) -> CoreResult<Self> {
        if !seconds.is_finite() || seconds < 0.0 || seconds * 100.0 >= u64::MAX as f64 {
            return Err(CoreError::InvalidTimeCode(seconds.to_string()));
        }
        Ok(Self {
            centis: (seconds * 100.0).round() as u64,
        })
    }

    /// Returns the value in seconds.
    #[must_use]
    pub fn as_seconds(&self) -> f64 {
        self.centis as f64 / 100.0
    }

    #[must_use]
    pub fn hours(&self) -> u64 {
        self.centis / 360_000
    }

    #[must_use]
    pub fn minutes(&self) -> u64 {
        (self.centis / 6000) % 60
    }

    #[must_use]
    pub fn seconds(&self) -> u64 {
        (self.centis / 100) % 60
    }

    #[must_use]
    pub fn centis(&self) -> u64 {
        self.centis % 100
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.centis()
        )
    }
}

impl FromStr for TimeCode {
    type Err = CoreError;

    /// Accepts `HH:MM:SS`, `HH:MM:SS.cc`, `MM:SS(.cc)` or plain seconds (`90.5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidTimeCode(s.to_string());
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [secs] => (0, 0, *secs),
            [mins, secs] => (0, parse_unit(mins).ok_or_else(invalid)?, *secs),
            [hours, mins, secs] => (
                parse_unit(hours).ok_or_else(invalid)?,
                parse_unit(mins).ok_or_else(invalid)?,
                *secs,
            ),
            _ => return Err(invalid()),
        };

        if parts.len() > 1 && minutes >= 60 {
            return Err(invalid());
        }

        let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
        if !seconds.is_finite() || seconds < 0.0 || (parts.len() > 1 && seconds >= 60.0) {
            return Err(invalid());
        }

        let whole = hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60))
            .ok_or_else(invalid)?;
        Self::from_seconds(whole as f64 + seconds).map_err(|_| invalid())
    }
}

fn parse_unit(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

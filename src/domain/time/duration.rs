//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default clipboard poll interval (800 milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 800;

/// Default retention window for history entries (2 days)
pub const DEFAULT_RETENTION_DAYS: u64 = 2;

/// Default interval between retention sweeps while the daemon runs (1 hour)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

const MS_PER_SEC: u64 = 1000;
const MS_PER_MIN: u64 = 60 * MS_PER_SEC;
const MS_PER_HOUR: u64 = 60 * MS_PER_MIN;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * MS_PER_SEC,
        }
    }

    /// Create a Duration from whole days
    pub const fn from_days(days: u64) -> Self {
        Self {
            milliseconds: days * MS_PER_DAY,
        }
    }

    /// Default clipboard poll interval
    pub const fn default_poll_interval() -> Self {
        Self::from_millis(DEFAULT_POLL_INTERVAL_MS)
    }

    /// Default retention window
    pub const fn default_retention() -> Self {
        Self::from_days(DEFAULT_RETENTION_DAYS)
    }

    /// Default interval between periodic sweeps
    pub const fn default_sweep_interval() -> Self {
        Self::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / MS_PER_SEC
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Convert to a chrono delta for timestamp arithmetic
    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.milliseconds).unwrap_or(i64::MAX))
    }
}

fn unit_millis(unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(1),
        "s" => Some(MS_PER_SEC),
        "m" => Some(MS_PER_MIN),
        "h" => Some(MS_PER_HOUR),
        "d" => Some(MS_PER_DAY),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported units: ms, s, m, h, d. Units may be combined ("1h30m").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        let mut total_ms: u64 = 0;
        let mut current_num = String::new();
        let mut current_unit = String::new();
        let mut found_any = false;

        let mut flush = |num: &mut String, unit: &mut String| -> Result<(), DurationParseError> {
            let value: u64 = num.parse().map_err(|_| err())?;
            let scale = unit_millis(unit).ok_or_else(err)?;
            total_ms = value
                .checked_mul(scale)
                .and_then(|v| total_ms.checked_add(v))
                .ok_or_else(err)?;
            num.clear();
            unit.clear();
            Ok(())
        };

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                if !current_unit.is_empty() {
                    flush(&mut current_num, &mut current_unit)?;
                    found_any = true;
                }
                current_num.push(ch);
            } else if ch.is_ascii_alphabetic() && !current_num.is_empty() {
                current_unit.push(ch);
            } else {
                return Err(err());
            }
        }

        if !current_num.is_empty() {
            if current_unit.is_empty() {
                return Err(err());
            }
            flush(&mut current_num, &mut current_unit)?;
            found_any = true;
        }

        if !found_any || total_ms == 0 {
            return Err(err());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milliseconds == 0 {
            return write!(f, "0s");
        }

        let parts = [
            (MS_PER_DAY, "d"),
            (MS_PER_HOUR, "h"),
            (MS_PER_MIN, "m"),
            (MS_PER_SEC, "s"),
            (1, "ms"),
        ];

        let mut rest = self.milliseconds;
        for (scale, unit) in parts {
            let value = rest / scale;
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
                rest %= scale;
            }
        }
        Ok(())
    }
}

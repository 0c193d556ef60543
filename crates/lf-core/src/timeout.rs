//! Named timeouts.
//!
//! Job descriptions express durations either as a mapping of units
//! (`{minutes: 10}`, `{hours: 1, minutes: 30}`) or as a compact string
//! (`"90s"`, `"15m"`, `"1h30m"`, `"1d"`). A bare number is seconds.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};

const UNITS: [(&str, u64); 4] = [
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
    ("seconds", 1),
];

/// A duration with the name of what it bounds (e.g. `"job"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeout {
    name: String,
    duration: Duration,
}

impl Timeout {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Parse a duration from a unit mapping, a duration string or a number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeout`] for unknown units, negative or
    /// non-integer amounts, and durations that add up to zero.
    pub fn parse(value: &Value) -> Result<Duration> {
        let secs = match value {
            Value::Object(map) => {
                let mut total: u64 = 0;
                for (key, amount) in map {
                    let (_, scale) = UNITS
                        .iter()
                        .find(|(unit, _)| *unit == key.as_str())
                        .ok_or_else(|| Error::InvalidTimeout(format!("unknown unit '{key}'")))?;
                    let amount = amount.as_u64().ok_or_else(|| {
                        Error::InvalidTimeout(format!("'{key}' must be a non-negative integer"))
                    })?;
                    total = total.saturating_add(amount.saturating_mul(*scale));
                }
                total
            }
            Value::String(s) => parse_compact(s)?,
            Value::Number(n) => n.as_u64().ok_or_else(|| {
                Error::InvalidTimeout(format!("{n} is not a whole number of seconds"))
            })?,
            other => {
                return Err(Error::InvalidTimeout(format!(
                    "expected a mapping or duration string, got {other}"
                )))
            }
        };

        if secs == 0 {
            return Err(Error::InvalidTimeout("duration must be greater than zero".into()));
        }
        Ok(Duration::from_secs(secs))
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}s)", self.name, self.duration.as_secs())
    }
}

fn parse_compact(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidTimeout("empty duration".into()));
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(secs);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let scale = match c {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => {
                return Err(Error::InvalidTimeout(format!(
                    "unexpected '{c}' in duration '{input}'"
                )))
            }
        };
        let amount: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidTimeout(format!("missing amount before '{c}' in '{input}'")))?;
        total = total.saturating_add(amount.saturating_mul(scale));
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(Error::InvalidTimeout(format!(
            "trailing amount without unit in '{input}'"
        )));
    }
    Ok(total)
}

//! Compatibility gate between a job description and the assembled job.
//!
//! A description may declare the lowest dispatcher compatibility level it
//! was written for. The job is only handed back when its own level (the
//! parser baseline raised by its actions) is at least that high.

use lf_core::{Error, Result};
use serde_json::Value;

/// Parse a declared compatibility value.
///
/// Accepts any integer, or a string holding one.
pub fn parse_compatibility(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| Error::CompatibilityFormat(format!("{number} is not an integer"))),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::CompatibilityFormat(format!("'{text}' is not an integer"))),
        other => Err(Error::CompatibilityFormat(format!(
            "{other} is not an integer"
        ))),
    }
}

/// Check a declared compatibility against the job's level.
pub fn check(declared: Option<&Value>, supported: u32) -> Result<()> {
    let Some(declared) = declared else {
        return Ok(());
    };
    let required = parse_compatibility(declared)?;
    if required > i64::from(supported) {
        return Err(Error::CompatibilityVersion {
            required,
            supported,
        });
    }
    tracing::debug!(required, supported, "compatibility satisfied");
    Ok(())
}

//! Built-in strategy and protocol implementations.
//!
//! The concrete sub-pipelines these strategies stand for are expanded by the
//! runtime; here each strategy decides whether it fits the device and
//! parameters, and appends the steps that represent it.

pub mod boot;
pub mod deploy;
pub mod protocols;

// Shared by the keyed deploy and boot methods.
fn missing_parameter(params: &lf_core::Parameters, required: &[&str]) -> lf_strategy::Verdict {
    match required.iter().find(|key| !params.contains_key(**key)) {
        Some(key) => lf_strategy::Verdict::reject(format!("missing required parameter '{key}'")),
        None => lf_strategy::Verdict::Accept,
    }
}

//! The [`Action`] trait defines a single pipeline unit.
//!
//! Actions produced here are descriptions, not behaviour: the runtime that
//! drives the device consumes them read-only after the job is assembled.

use std::fmt;

use lf_core::Parameters;
use serde::Serialize;

/// A single unit of a job pipeline.
pub trait Action: fmt::Debug + Send + Sync {
    /// Short, stable name of this action (e.g. `"tftp-deploy"`).
    fn name(&self) -> &'static str;

    /// Human-readable description of what the action does.
    fn description(&self) -> &'static str;

    /// The parameter snapshot this action was built from.
    fn parameters(&self) -> &Parameters;

    /// Namespace this action belongs to.
    fn namespace(&self) -> &str {
        self.parameters().namespace()
    }

    /// Minimum dispatcher compatibility level the action needs.
    ///
    /// The pipeline raises the job's compatibility baseline to the highest
    /// value among its actions.
    fn compatibility(&self) -> u32 {
        1
    }
}

/// Serializable view of an action at its position in a pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ActionSummary {
    /// 1-based position in the pipeline.
    pub level: usize,
    pub name: &'static str,
    pub description: &'static str,
    pub namespace: String,
    pub parameters: Parameters,
}

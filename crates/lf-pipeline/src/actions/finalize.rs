//! Terminal action of every pipeline.

use lf_core::Parameters;

use crate::action::Action;

/// Powers the device down and closes connections once everything else ran.
///
/// Always the last action of a pipeline; built without parameters.
#[derive(Debug, Default)]
pub struct FinalizeAction {
    parameters: Parameters,
}

impl FinalizeAction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Action for FinalizeAction {
    fn name(&self) -> &'static str {
        "finalize"
    }

    fn description(&self) -> &'static str {
        "finish the process and cleanup"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

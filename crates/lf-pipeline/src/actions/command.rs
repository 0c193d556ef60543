//! Generic command action.

use lf_core::Parameters;

use crate::action::Action;

/// Runs a named command from the device dictionary at this point of the job.
///
/// Commands bypass strategy selection: the raw parameters from the job
/// description are wrapped as-is.
#[derive(Debug)]
pub struct CommandAction {
    parameters: Parameters,
}

impl CommandAction {
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl Action for CommandAction {
    fn name(&self) -> &'static str {
        "command"
    }

    fn description(&self) -> &'static str {
        "execute one of the commands listed by the admin"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

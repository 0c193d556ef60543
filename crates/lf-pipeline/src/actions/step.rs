//! Actions appended by selected strategies.

use lf_core::Parameters;

use crate::action::Action;

/// A named step produced by a deploy, boot or test strategy.
///
/// The step carries the parameter snapshot the strategy was invoked with;
/// how the runtime expands it into device operations is outside the parser.
#[derive(Debug, Clone)]
pub struct StepAction {
    name: &'static str,
    description: &'static str,
    parameters: Parameters,
    compatibility: u32,
}

impl StepAction {
    pub fn new(name: &'static str, description: &'static str, parameters: Parameters) -> Self {
        Self {
            name,
            description,
            parameters,
            compatibility: 1,
        }
    }

    /// Builder: require a minimum dispatcher compatibility level.
    #[must_use]
    pub fn with_compatibility(mut self, compatibility: u32) -> Self {
        self.compatibility = compatibility;
        self
    }
}

impl Action for StepAction {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn compatibility(&self) -> u32 {
        self.compatibility
    }
}

//! Phase-specific strategy traits.
//!
//! Each trait extends [`Capability`] with the flags the parser queries and
//! the `populate` hook that appends the strategy's actions once it has been
//! selected. Flags are plain methods so every implementation states them
//! explicitly or inherits the documented default.

use lf_core::{Parameters, Result};
use lf_strategy::Capability;

use crate::pipeline::Pipeline;

/// A way of getting software onto the device.
pub trait Deployment: Capability {
    /// Whether this deployment consumes OS-specific deployment data.
    fn uses_deployment_data(&self) -> bool {
        true
    }

    /// Append this deployment's actions to the pipeline.
    fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()>;
}

/// A way of booting the device into the deployed software.
pub trait Boot: Capability {
    fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()>;
}

/// A way of running tests once the device is up.
pub trait TestStrategy: Capability {
    /// Whether the deployment in the same namespace must carry OS-specific
    /// deployment data for this test to run.
    fn needs_deployment_data(&self) -> bool {
        false
    }

    /// Whether this test needs a supporting overlay, which consumes a stage
    /// of its namespace.
    fn needs_overlay(&self) -> bool {
        false
    }

    fn populate(&self, pipeline: &mut Pipeline, params: &Parameters) -> Result<()>;
}

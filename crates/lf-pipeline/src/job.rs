//! The assembled [`Job`].

use std::collections::BTreeMap;
use std::sync::Arc;

use lf_core::{Device, JobId, Parameters, Timeout};
use lf_strategy::Protocol;
use serde::Serialize;

use crate::action::ActionSummary;
use crate::namespace::TestRequirement;
use crate::pipeline::Pipeline;

/// A fully assembled job, ready for the runtime.
///
/// Jobs are only produced by [`JobParser::parse`](crate::JobParser::parse)
/// and are read-only once returned.
#[derive(Debug)]
pub struct Job {
    pub(crate) id: JobId,
    pub(crate) device: Arc<Device>,
    pub(crate) parameters: Parameters,
    pub(crate) pipeline: Pipeline,
    pub(crate) protocols: Vec<Box<dyn Protocol>>,
    pub(crate) test_info: BTreeMap<String, Vec<TestRequirement>>,
    pub(crate) timeout: Timeout,
    pub(crate) compatibility: u32,
}

impl Job {
    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Job-wide parameters: the description plus `dispatcher` and `env_dut`.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Active protocols, ascending by level.
    pub fn protocols(&self) -> &[Box<dyn Protocol>] {
        &self.protocols
    }

    /// Test requirements registered by the pre-scan, keyed by namespace.
    pub fn test_info(&self) -> &BTreeMap<String, Vec<TestRequirement>> {
        &self.test_info
    }

    pub fn timeout(&self) -> &Timeout {
        &self.timeout
    }

    pub fn compatibility(&self) -> u32 {
        self.compatibility
    }

    /// Serializable overview of the job.
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id.clone(),
            device: self.device.hostname().map(str::to_string),
            timeout_secs: self.timeout.duration().as_secs(),
            compatibility: self.compatibility,
            protocols: self
                .protocols
                .iter()
                .map(|p| ProtocolSummary {
                    name: p.name(),
                    level: p.level(),
                })
                .collect(),
            actions: self.pipeline.describe(),
            namespaces: self.test_info.keys().cloned().collect(),
        }
    }
}

/// What `labforge compile --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub device: Option<String>,
    pub timeout_secs: u64,
    pub compatibility: u32,
    pub protocols: Vec<ProtocolSummary>,
    pub actions: Vec<ActionSummary>,
    /// Namespaces holding test requirements.
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProtocolSummary {
    pub name: &'static str,
    pub level: u32,
}

//! Built-in protocol candidates.
//!
//! A protocol is requested by naming it in the job's top-level `protocols`
//! mapping; its block becomes the instance's parameters.

use lf_core::{JobId, Parameters};
use lf_strategy::{Protocol, ProtocolCandidate};

/// Key of the protocol mapping in the job parameters.
pub const PROTOCOLS_KEY: &str = "protocols";

/// A protocol requested by name, set up at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct NamedProtocol {
    pub name: &'static str,
    pub level: u32,
}

/// LXC companion containers; needed before anything talks to the device.
pub const LXC: NamedProtocol = NamedProtocol {
    name: "lava-lxc",
    level: 1,
};

/// Cross-device synchronisation for multinode jobs.
pub const MULTINODE: NamedProtocol = NamedProtocol {
    name: "lava-multinode",
    level: 2,
};

/// VLAN assignment; relies on the multinode group being formed.
pub const VLAND: NamedProtocol = NamedProtocol {
    name: "lava-vland",
    level: 5,
};

pub fn builtin() -> Vec<Box<dyn ProtocolCandidate>> {
    vec![Box::new(LXC), Box::new(MULTINODE), Box::new(VLAND)]
}

impl ProtocolCandidate for NamedProtocol {
    fn name(&self) -> &'static str {
        self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn accepts(&self, params: &Parameters) -> bool {
        params
            .get_params(PROTOCOLS_KEY)
            .is_some_and(|protocols| protocols.contains_key(self.name))
    }

    fn build(&self, params: &Parameters, job_id: &JobId) -> Box<dyn Protocol> {
        let parameters = params
            .get_params(PROTOCOLS_KEY)
            .and_then(|protocols| protocols.get_params(self.name))
            .unwrap_or_default();
        Box::new(ProtocolInstance {
            name: self.name,
            level: self.level,
            job_id: job_id.clone(),
            parameters,
        })
    }
}

/// A protocol bound to one job.
#[derive(Debug, Clone)]
pub struct ProtocolInstance {
    name: &'static str,
    level: u32,
    job_id: JobId,
    parameters: Parameters,
}

impl Protocol for ProtocolInstance {
    fn name(&self) -> &'static str {
        self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn job_id(&self) -> &JobId {
        &self.job_id
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

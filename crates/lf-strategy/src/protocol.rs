//! Protocols: job-wide communication facilities (multinode synchronisation,
//! VLAN management, LXC companions).
//!
//! Unlike phase strategies, any number of protocols may be active in one
//! job. Every candidate whose acceptance predicate holds is instantiated, and
//! the instances are ordered by level so foundational protocols come first.

use std::fmt;

use lf_core::{JobId, Parameters};

/// An instantiated protocol bound to one job.
pub trait Protocol: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Ordering level; lower levels are set up before higher ones.
    fn level(&self) -> u32;

    fn job_id(&self) -> &JobId;

    /// This protocol's own block from the job's `protocols` mapping.
    fn parameters(&self) -> &Parameters;
}

/// A registered protocol implementation.
pub trait ProtocolCandidate: Send + Sync {
    fn name(&self) -> &'static str;

    fn level(&self) -> u32;

    /// Whether the job parameters ask for this protocol.
    fn accepts(&self, params: &Parameters) -> bool;

    /// Instantiate the protocol for a job.
    fn build(&self, params: &Parameters, job_id: &JobId) -> Box<dyn Protocol>;
}

/// All registered protocol candidates, in registration order.
#[derive(Default)]
pub struct ProtocolRegistry {
    candidates: Vec<Box<dyn ProtocolCandidate>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, candidate: Box<dyn ProtocolCandidate>) -> &mut Self {
        self.candidates.push(candidate);
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Box<dyn ProtocolCandidate>] {
        &self.candidates
    }

    /// Instantiate every accepted protocol, ordered ascending by level.
    ///
    /// The sort is stable, so protocols sharing a level keep registration
    /// order.
    pub fn select_all(&self, params: &Parameters, job_id: &JobId) -> Vec<Box<dyn Protocol>> {
        let mut protocols: Vec<Box<dyn Protocol>> = self
            .candidates
            .iter()
            .filter(|candidate| candidate.accepts(params))
            .map(|candidate| {
                tracing::debug!(
                    protocol = candidate.name(),
                    level = candidate.level(),
                    "protocol accepted"
                );
                candidate.build(params, job_id)
            })
            .collect();
        protocols.sort_by_key(|protocol| protocol.level());
        protocols
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolRegistry")
            .field(
                "candidates",
                &self.candidates.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

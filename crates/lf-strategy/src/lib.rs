//! # lf-strategy
//!
//! Capability-priority strategy selection for job phases.
//!
//! Each job phase (deploy, boot, test) has several competing
//! implementations. Every implementation declares a priority and a
//! capability predicate over the device profile and the action parameters;
//! the registry picks the accepted candidate with the highest priority.
//!
//! ## Overview
//!
//! - [`Phase`] -- the closed set of phases resolved through a registry.
//! - [`Capability`] / [`Verdict`] -- what every candidate must expose.
//! - [`StrategyRegistry`] -- ordered candidates for one phase, plus selection.
//! - [`Protocol`] / [`ProtocolCandidate`] / [`ProtocolRegistry`] -- job-wide
//!   communication facilities, selected all-at-once and ordered by level.

pub mod capability;
pub mod phase;
pub mod protocol;
pub mod registry;

pub use capability::{Capability, Verdict};
pub use phase::Phase;
pub use protocol::{Protocol, ProtocolCandidate, ProtocolRegistry};
pub use registry::{CandidateScore, StrategyRegistry};

//! # lf-pipeline
//!
//! Compilation of job descriptions into ordered action pipelines.
//!
//! This crate provides:
//!
//! - **[`Action`]** trait -- a single pipeline unit, described by name and
//!   parameter snapshot, handed to the external runtime.
//! - **[`Pipeline`]** -- the append-only ordered action list of one job.
//! - **Built-in actions** ([`actions`]) -- command, finalize, and the steps
//!   strategies append.
//! - **Phase strategies** ([`strategy`], [`strategies`]) -- deployment, boot
//!   and test implementations selected by capability priority, plus the
//!   built-in protocol candidates.
//! - **[`NamespaceTracker`]** -- per-namespace stage counters and test
//!   requirements.
//! - **[`JobParser`]** -- turns a YAML job description and a device profile
//!   into a [`Job`].
//! - **[`registry`]** -- the process-wide strategy registries and their
//!   one-time bootstrap.

pub mod action;
pub mod actions;
pub mod compatibility;
pub mod deployment_data;
pub mod description;
pub mod job;
pub mod namespace;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod strategies;
pub mod strategy;

// Re-export key types at the crate root.
pub use action::{Action, ActionSummary};
pub use deployment_data::{BuiltinDeploymentData, DeploymentDataSource};
pub use description::{ActionKind, ActionSpec, JobDescription};
pub use job::{Job, JobSummary};
pub use namespace::{NamespaceTracker, TestRequirement};
pub use parser::{ActionScores, JobParser};
pub use pipeline::Pipeline;
pub use registry::Registries;
pub use strategy::{Boot, Deployment, TestStrategy};

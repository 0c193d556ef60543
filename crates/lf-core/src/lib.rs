//! lf-core: shared types, IDs, errors, parameters and configuration.
//!
//! This crate is the foundational dependency for all other lf-* crates,
//! providing the unified error type, the job identifier, the parameter
//! snapshot type threaded through strategy selection, the opaque device
//! profile, timeouts, and application configuration.

pub mod config;
pub mod device;
pub mod error;
pub mod ids;
pub mod params;
pub mod timeout;

// Re-export the most commonly used items at the crate root.
pub use device::Device;
pub use error::{Error, Result};
pub use ids::JobId;
pub use params::{Parameters, DEFAULT_NAMESPACE};
pub use timeout::Timeout;

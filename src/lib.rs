//! Labforge - test-lab job compiler
//!
//! This library crate exposes the file-level entry points used by the binary
//! and by integration tests.

pub mod compile;

pub use compile::{compile, explain, load_device, CompileOptions};

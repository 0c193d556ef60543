//! Built-in pipeline actions.
//!
//! [`CommandAction`] and [`FinalizeAction`] are created by the parser
//! directly; [`StepAction`] is what selected strategies append.

mod command;
mod finalize;
mod step;

pub use command::CommandAction;
pub use finalize::FinalizeAction;
pub use step::StepAction;

//! Workflow state module

mod feedback;
mod forms;
mod timer;

pub use feedback::*;
pub use forms::*;
pub use timer::*;

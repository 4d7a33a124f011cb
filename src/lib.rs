//! Visitor forms: submission workflow for visitor registration and visit booking
//!
//! The crate owns the part of the forms with real control flow: field values,
//! validation, the submit state machine, feedback messages and the redirect
//! that follows a successful submission. Rendering and transport stay outside;
//! the workflow talks to them through [`remote::RemoteBackend`] and
//! [`remote::Navigator`].

pub mod config;
pub mod remote;
pub mod state;
pub mod workflow;

pub use config::{ConfigError, WorkflowConfig};
pub use workflow::{
    start_booking, BookingStart, FormWorkflow, IgnoreReason, SubmissionState, SubmitOutcome,
};

//! Generation session module.
//!
//! `state` holds the session model and its transitions; `controller` drives
//! them against the backend and owns the polling task.

pub mod state;

#[cfg(feature = "client")]
pub mod controller;

// Re-exports for convenience
pub use state::{
    GenerationMode, GenerationSession, SessionState, SnapshotOutcome, SubmittedConfig, VideoResult,
};

#[cfg(feature = "client")]
pub use controller::SessionController;

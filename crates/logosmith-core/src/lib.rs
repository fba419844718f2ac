//! Logosmith Core — Transport-agnostic domain logic for the logo design
//! consultation backend.
//!
//! This crate contains the workflow state machine, step handlers, the
//! in-memory session store, and the provider clients (text and image
//! generation). It has **no HTTP framework dependency** by default, making
//! it suitable for use in:
//!
//! - HTTP servers (via `logosmith-server`)
//! - CLI tools
//! - Tests that drive the engine directly with fake providers
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod error;
pub mod providers;
pub mod state;
pub mod store;
pub mod workflow;

// Convenience re-exports
pub use error::ServerError;
pub use state::{AppState, AppStateInner};
pub use store::SessionStore;
pub use workflow::engine::WorkflowEngine;
pub use workflow::Step;

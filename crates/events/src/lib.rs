//! # Event Flags Messages
//!
//! This crate defines the event context structure handed to downstream consumers
//! (prompt builders, report renderers). It is the definitive output shape of the
//! flagging engine.
//!
//! As a Layer 0 crate, it depends only on `core-types`.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{EventContext, SourceMeta};

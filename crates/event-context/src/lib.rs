//! # Event Context Engine
//!
//! Computes which calendar-driven market events apply to a report date and to the
//! trailing lookback window, and attaches an explanation to each one.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure date arithmetic on top of `core-types`. The only I/O is the
//!   single read of the manual calendar, performed when a builder is constructed.
//! - **Degrade, don't fail:** A missing or corrupt calendar is logged and replaced by an
//!   empty one. Only an unparseable report date is an error.
//! - **Explicit tables:** Normalization and definition tables are plain values passed
//!   in by the caller, so tests and deployments can substitute their own.
//!
//! ## Public API
//!
//! - `EventContextBuilder`: evaluates flags for a date and builds `EventContext`s.
//! - `build_event_context`: one-shot convenience using the default tables.
//! - `EventCalendar`, `NormalizationTable`, `DefinitionTable`: the inputs.
//! - `rules`: the deterministic opex / month-end rules.

// Declare the modules that constitute this crate.
pub mod builder;
pub mod calendar;
pub mod error;
pub mod rules;
pub mod tables;

// Re-export the key components to create a clean, public-facing API.
pub use builder::{build_event_context, EventContextBuilder};
pub use calendar::EventCalendar;
pub use error::{CalendarError, TableError};
pub use tables::{DefinitionTable, NormalizationTable, FALLBACK_NOTE};

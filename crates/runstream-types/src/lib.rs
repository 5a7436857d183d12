//! Core types shared by every runstream crate.
//!
//! - [`Envelope`]: one telemetry message as delivered by the transport
//! - [`DiagnosticLine`]: the normalized, human-readable output record
//! - [`PhaseRecord`]: per-phase progress for build and run phases
//! - [`RunStreamStatus`] / [`RunStatus`]: the two lifecycle vocabularies
//! - [`ValidationSummary`]: validation issues plus scalar severity/digest/error

pub mod envelope;
pub mod error;
pub mod line;
pub mod phase;
pub mod status;
pub mod validation;

pub use envelope::*;
pub use error::{Error, Result};
pub use line::*;
pub use phase::*;
pub use status::*;
pub use validation::*;

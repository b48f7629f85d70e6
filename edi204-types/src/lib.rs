//! Shared DTOs for the edi204 workspace.
//!
//! # Design constraints
//! - Input types mirror the EDI-to-JSON translator's output and are read tolerantly: unknown
//!   fields are ignored, segments may be absent, unknown codes are carried through.
//! - Output types (`report`) are serialized to disk. Prefer adding optional fields over
//!   changing semantics.

pub mod codes;
pub mod event;
mod lenient;
pub mod report;
pub mod transaction;

/// Schema identifiers.
pub mod schema {
    pub const EDI204_REPORT_V1: &str = "edi204.report.v1";
}

//! Domain logic: turn loaded 204 documents into delivery dispositions and a deterministic report.
//!
//! This crate owns *what* a tender means. Reading files is `edi204-events`; writing artifacts is
//! the CLI's job.

mod classifier;
mod digest;
mod triage;

pub use classifier::{DISPOSITION_TABLE, DeliveryTypeClassifier, classify_delivery};
pub use digest::digest_transaction;
pub use triage::{Triage, TriageConfig};

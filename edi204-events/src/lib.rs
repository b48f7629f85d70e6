//! Document ingestion.
//!
//! Inputs are JSON files written by an upstream EDI-to-JSON translator, either the full
//! "transaction processed" event or the bare transaction. Loading is tolerant: a bad file is
//! recorded as an error on that document and never aborts a batch. Schema strictness belongs to
//! the translator.

mod load;

pub use load::{
    DocumentLoadError, LoadedDocument, load_document, load_documents, load_inbox, parse_document,
};

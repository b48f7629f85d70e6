use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use edi204_types::event::{Edi204Event, InboundDocument};
use edi204_types::transaction::ShipmentTransaction;
use fs_err as fs;
use glob::glob;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: Utf8PathBuf,
    /// Hex sha256 of the raw bytes, when the file could be read.
    pub sha256: Option<String>,
    pub document: Result<InboundDocument, DocumentLoadError>,
}

impl LoadedDocument {
    pub fn kind(&self) -> Option<&'static str> {
        match &self.document {
            Ok(InboundDocument::Event(_)) => Some("event"),
            Ok(InboundDocument::Transaction(_)) => Some("transaction"),
            Err(_) => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("unrecognized document shape: {message}")]
    Shape { message: String },
}

impl DocumentLoadError {
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentLoadError::Io { .. } => "io",
            DocumentLoadError::Json { .. } => "json",
            DocumentLoadError::Shape { .. } => "shape",
        }
    }
}

/// Decide whether a JSON document is a full event or a bare transaction and decode it.
pub fn parse_document(contents: &str) -> Result<InboundDocument, DocumentLoadError> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| DocumentLoadError::Json {
            message: e.to_string(),
        })?;

    let Some(obj) = value.as_object() else {
        return Err(DocumentLoadError::Shape {
            message: "top-level value is not an object".to_string(),
        });
    };

    if obj.contains_key("artifact") {
        let event = serde_json::from_value::<Edi204Event>(value).map_err(|e| {
            DocumentLoadError::Json {
                message: e.to_string(),
            }
        })?;
        return Ok(InboundDocument::Event(Box::new(event)));
    }

    if obj.contains_key("heading") || obj.contains_key("detail") {
        let tx = serde_json::from_value::<ShipmentTransaction>(value).map_err(|e| {
            DocumentLoadError::Json {
                message: e.to_string(),
            }
        })?;
        return Ok(InboundDocument::Transaction(Box::new(tx)));
    }

    Err(DocumentLoadError::Shape {
        message: "expected an `artifact` envelope or a `heading`/`detail` transaction"
            .to_string(),
    })
}

/// Load a single file. Never fails; problems are carried in `document`.
pub fn load_document(path: &Utf8Path) -> LoadedDocument {
    match fs::read(path) {
        Ok(bytes) => {
            let sha256 = Some(hex::encode(Sha256::digest(&bytes)));
            let document = match std::str::from_utf8(&bytes) {
                Ok(s) => parse_document(s),
                Err(e) => Err(DocumentLoadError::Json {
                    message: format!("invalid utf-8: {e}"),
                }),
            };
            LoadedDocument {
                path: path.to_path_buf(),
                sha256,
                document,
            }
        }
        Err(e) => LoadedDocument {
            path: path.to_path_buf(),
            sha256: None,
            document: Err(DocumentLoadError::Io {
                message: e.to_string(),
            }),
        },
    }
}

/// Load every `*.json` directly inside `inbox`. A missing inbox yields no documents.
pub fn load_inbox(inbox: &Utf8Path) -> anyhow::Result<Vec<LoadedDocument>> {
    let pattern = inbox.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning inbox for documents");

    let mut out = Vec::new();
    for entry in glob(pattern_str).context("glob inbox/*.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        let utf8_path = Utf8PathBuf::from(path);

        out.push(load_document(&utf8_path));
    }

    // Deterministic order matters.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Load explicit files plus an optional inbox, sorted by path with duplicate paths kept once.
pub fn load_documents(
    files: &[Utf8PathBuf],
    inbox: Option<&Utf8Path>,
) -> anyhow::Result<Vec<LoadedDocument>> {
    let mut out: Vec<LoadedDocument> = files.iter().map(|p| load_document(p)).collect();

    if let Some(inbox) = inbox {
        let found = load_inbox(inbox).with_context(|| format!("load inbox {}", inbox))?;
        out.extend(found);
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    out.dedup_by(|a, b| a.path == b.path);
    debug!(count = out.len(), "loaded documents");
    Ok(out)
}


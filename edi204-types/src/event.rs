use crate::transaction::ShipmentTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A "transaction processed" delivery: the cloud-event style envelope plus the translated
/// transaction attached as an output artifact.
///
/// Nothing in this workspace routes on the envelope; it is kept so reports can point back at the
/// upstream transaction and partnership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edi204Event {
    /// A malformed envelope reads as empty; only the artifact decides whether a delivery loads.
    #[serde(default, deserialize_with = "crate::lenient::or_default")]
    pub event: EventEnvelope,

    pub artifact: OutputArtifact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(
        rename = "detail-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Raw envelope timestamp; see [`EventEnvelope::timestamp`].
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    #[serde(default)]
    pub detail: EventDetail,
}

impl EventEnvelope {
    /// `time` as an RFC 3339 instant, when it is one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_rfc3339(self.time.as_deref()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_execution_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub processed_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragments: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactPointer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership: Option<Partnership>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x12: Option<X12Info>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

impl EventDetail {
    pub fn processed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_rfc3339(self.processed_at.as_deref()?)
    }
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Pointer to an input/output artifact held by the translator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPointer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<PartnerProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<PartnerProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X12Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_setting: Option<TransactionSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<X12Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_setting_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X12Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interchange: Option<InterchangeMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_group: Option<FunctionalGroupMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<ApplicationParty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ApplicationParty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterchangeMeta {
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub acknowledgment_requested_code: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalGroupMeta {
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_identifier_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_number: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_set_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationParty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isa: Option<IsaId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsaId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The translated transaction, attached inline when it fits the delivery size limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_reason: Option<String>,

    #[serde(default)]
    pub detail: ShipmentTransaction,
}

impl Edi204Event {
    pub fn transaction(&self) -> &ShipmentTransaction {
        &self.artifact.detail
    }

    pub fn metadata(&self) -> Option<&X12Metadata> {
        self.event
            .detail
            .x12
            .as_ref()
            .and_then(|x| x.metadata.as_ref())
    }

    pub fn partnership_id(&self) -> Option<&str> {
        self.event
            .detail
            .partnership
            .as_ref()
            .and_then(|p| p.partnership_id.as_deref())
    }
}

/// A document as found on disk: either a full event or a bare translated transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundDocument {
    Event(Box<Edi204Event>),
    Transaction(Box<ShipmentTransaction>),
}

impl InboundDocument {
    pub fn transaction(&self) -> &ShipmentTransaction {
        match self {
            InboundDocument::Event(ev) => ev.transaction(),
            InboundDocument::Transaction(tx) => tx,
        }
    }

    pub fn event(&self) -> Option<&Edi204Event> {
        match self {
            InboundDocument::Event(ev) => Some(ev),
            InboundDocument::Transaction(_) => None,
        }
    }

    /// Transaction set identifier, preferring envelope metadata over ST-01.
    pub fn transaction_set_id(&self) -> Option<&str> {
        self.event()
            .and_then(Edi204Event::metadata)
            .and_then(|m| m.transaction.as_ref())
            .and_then(|t| t.transaction_set_identifier.as_deref())
            .or_else(|| self.transaction().transaction_set_id())
    }

    /// Upstream transaction id, if the document came with an envelope.
    pub fn upstream_transaction_id(&self) -> Option<&str> {
        self.event()
            .and_then(|ev| ev.event.detail.transaction_id.as_deref())
    }
}

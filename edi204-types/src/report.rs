use crate::codes::DeliveryDisposition;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `report.json` written by a triage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReport {
    /// Always [`crate::schema::EDI204_REPORT_V1`] for reports written by this version.
    pub schema: String,

    pub tool: ToolInfo,

    pub run: RunInfo,

    #[serde(default)]
    pub policy: TriagePolicy,

    #[serde(default)]
    pub verdict: Verdict,

    #[serde(default)]
    pub summary: TriageSummary,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ReportInput>,

    #[serde(default)]
    pub shipments: Vec<ShipmentEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedInput>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<InputError>,
}

impl TriageReport {
    pub fn new(tool: ToolInfo, policy: TriagePolicy) -> Self {
        Self {
            schema: crate::schema::EDI204_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                run_id: Uuid::new_v4(),
                started_at: Utc::now(),
                ended_at: None,
            },
            policy,
            verdict: Verdict::default(),
            summary: TriageSummary::default(),
            inputs: Vec::new(),
            shipments: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Policy the run was evaluated under, echoed into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriagePolicy {
    pub fail_on_unknown: bool,
    pub fail_on_load_error: bool,
    pub transaction_sets: Vec<String>,
}

impl Default for TriagePolicy {
    fn default() -> Self {
        Self {
            fail_on_unknown: false,
            fail_on_load_error: true,
            transaction_sets: vec!["204".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub status: VerdictStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    #[default]
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSummary {
    pub documents: u64,
    pub shipments: u64,
    pub live_unload: u64,
    pub drop_and_hook: u64,
    pub unknown: u64,
    pub skipped: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// `event`, `transaction`, or absent when the document failed to load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedInput {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputError {
    pub path: String,
    /// `io`, `json`, or `shape`.
    pub kind: String,
    pub message: String,
}

/// One digested shipment, tied back to the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentEntry {
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership_id: Option<String>,

    #[serde(flatten)]
    pub digest: ShipmentDigest,
}

/// Business view of a single 204 tender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentDigest {
    pub disposition: DeliveryDisposition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_number: Option<String>,

    /// B2A-01 code, e.g. `04`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_of_payment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_of_lading: Option<String>,

    pub stop_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_stop: Option<StopDigest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stop: Option<StopDigest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceDigest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<EquipmentDigest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<TotalsDigest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDigest {
    pub sequence: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,

    /// N1-01 entity identifier code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDigest {
    pub qualifier: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentDigest {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsDigest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_qualifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lading_quantity: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<u64>,
}

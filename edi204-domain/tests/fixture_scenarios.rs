//! End-to-end triage over the recorded tender fixtures.
//!
//! Each test copies fixtures into a temporary inbox, loads it the way the CLI does and checks
//! the resulting report.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use edi204_domain::{DeliveryTypeClassifier, Triage, TriageConfig};
use edi204_events::load_inbox;
use edi204_types::codes::{DeliveryDisposition, StopReasonCode};
use edi204_types::report::{ToolInfo, TriageReport, VerdictStatus};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("tests/fixtures/tender_204")
}

fn tool() -> ToolInfo {
    ToolInfo {
        name: "edi204".to_string(),
        version: Some("test".to_string()),
        commit: None,
    }
}

struct Inbox {
    _temp: TempDir,
    dir: Utf8PathBuf,
}

impl Inbox {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("inbox")).expect("utf8 path");
        fs_err::create_dir_all(&dir).expect("create inbox");
        Self { _temp: temp, dir }
    }

    fn with_fixture(self, name: &str) -> Self {
        fs_err::copy(fixture_dir().join(name), self.dir.join(name)).expect("copy fixture");
        self
    }

    fn with_raw(self, name: &str, contents: &str) -> Self {
        fs_err::write(self.dir.join(name), contents).expect("write doc");
        self
    }

    fn triage(&self, config: &TriageConfig) -> TriageReport {
        self.triage_with(&Triage::new(), config)
    }

    fn triage_with(&self, triage: &Triage, config: &TriageConfig) -> TriageReport {
        let docs = load_inbox(&self.dir).expect("load inbox");
        triage.run(config, &docs, tool())
    }
}

fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, 19)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("valid timestamp")
}

#[test]
fn live_unload_fixture_digest() {
    let report = Inbox::new()
        .with_fixture("live_unload.json")
        .triage(&TriageConfig::default());

    assert_eq!(report.verdict.status, VerdictStatus::Pass);
    assert_eq!(report.shipments.len(), 1);

    let entry = &report.shipments[0];
    assert_eq!(
        entry.upstream_transaction_id.as_deref(),
        Some("af530c9a-9c54-4637-80ea-1f242a6672d2")
    );
    assert_eq!(entry.partnership_id.as_deref(), Some("ModalView_TDIS"));

    let digest = &entry.digest;
    assert_eq!(digest.disposition, DeliveryDisposition::LiveUnload);
    assert_eq!(digest.carrier.as_deref(), Some("TNQG"));
    assert_eq!(digest.shipment_id.as_deref(), Some("417167540303N"));
    assert_eq!(digest.control_number.as_deref(), Some("190001"));
    assert_eq!(digest.purpose.as_deref(), Some("04"));
    assert_eq!(digest.application_type.as_deref(), Some("LT"));
    assert_eq!(digest.bill_of_lading.as_deref(), Some("3208058883"));
    assert_eq!(digest.stop_count, 3);
    assert_eq!(digest.references.len(), 5);

    let pickup = digest.pickup_stop.as_ref().expect("pickup stop");
    assert_eq!(pickup.sequence, 1);
    assert_eq!(pickup.party.as_deref(), Some("NS HARRISBURG RAMP"));
    assert_eq!(pickup.window_start, Some(at(0, 1)));
    assert_eq!(pickup.window_end, Some(at(15, 36)));

    let delivery = digest.delivery_stop.as_ref().expect("delivery stop");
    assert_eq!(delivery.sequence, 2);
    assert_eq!(delivery.reason.as_deref(), Some("CU"));
    assert_eq!(delivery.party.as_deref(), Some("MECHANICSBURG-US-RENTAL-XPO"));
    assert_eq!(delivery.role.as_deref(), Some("CN"));
    assert_eq!(delivery.city.as_deref(), Some("MIDDLETOWN"));
    assert_eq!(delivery.postal_code.as_deref(), Some("17057"));
    assert_eq!(delivery.window_start, Some(at(16, 0)));
    assert_eq!(delivery.window_end, Some(at(16, 0)));

    assert_eq!(digest.equipment.len(), 1);
    assert_eq!(digest.equipment[0].id, "EMHU300850");
    assert_eq!(digest.equipment[0].length, Some(5300));

    let totals = digest.totals.as_ref().expect("totals");
    assert_eq!(totals.weight, Some(42247.0));
    assert_eq!(totals.charge, Some(43.48));
    assert_eq!(totals.lading_quantity, Some(1));
    assert_eq!(totals.segment_count, Some(30));
}

#[test]
fn drop_hook_fixture_is_drop_and_hook() {
    let report = Inbox::new()
        .with_fixture("drop_hook.json")
        .triage(&TriageConfig::default());

    let digest = &report.shipments[0].digest;
    assert_eq!(digest.disposition, DeliveryDisposition::DropAndHook);
    assert_eq!(
        digest.delivery_stop.as_ref().and_then(|s| s.reason.as_deref()),
        Some("SU")
    );
    assert_eq!(digest.references.len(), 6);
    assert_eq!(report.summary.drop_and_hook, 1);
}

#[test]
fn unordered_bare_transaction_is_still_drop_and_hook() {
    let report = Inbox::new()
        .with_fixture("bare_transaction_unordered.json")
        .triage(&TriageConfig::default());

    assert_eq!(report.inputs[0].kind.as_deref(), Some("transaction"));
    let entry = &report.shipments[0];
    assert!(entry.upstream_transaction_id.is_none());
    assert!(entry.partnership_id.is_none());
    assert_eq!(entry.digest.disposition, DeliveryDisposition::DropAndHook);
    assert_eq!(
        entry.digest.pickup_stop.as_ref().map(|s| s.sequence),
        Some(1)
    );
    assert_eq!(
        entry.digest.delivery_stop.as_ref().map(|s| s.sequence),
        Some(2)
    );
}

#[test]
fn mixed_inbox_summary_and_order() {
    let report = Inbox::new()
        .with_fixture("live_unload.json")
        .with_fixture("drop_hook.json")
        .with_fixture("bare_transaction_unordered.json")
        .triage(&TriageConfig::default());

    assert_eq!(report.summary.documents, 3);
    assert_eq!(report.summary.shipments, 3);
    assert_eq!(report.summary.live_unload, 1);
    assert_eq!(report.summary.drop_and_hook, 2);
    assert_eq!(report.summary.unknown, 0);
    assert_eq!(report.verdict.status, VerdictStatus::Pass);
    assert!(report.run.ended_at.is_some());

    let sources: Vec<&str> = report
        .shipments
        .iter()
        .map(|s| s.source.rsplit('/').next().unwrap_or_default())
        .collect();
    assert_eq!(
        sources,
        vec![
            "bare_transaction_unordered.json",
            "drop_hook.json",
            "live_unload.json"
        ]
    );
}

#[test]
fn unknown_route_warns_by_default_and_fails_when_strict() {
    let route_without_delivery = r#"{
        "detail": {
            "stop_off_details_S5_loop": [
                { "stop_off_details_S5": { "stop_sequence_number_01": 1, "stop_reason_code_02": "CL" } },
                { "stop_off_details_S5": { "stop_sequence_number_01": 2, "stop_reason_code_02": "DR" } }
            ]
        }
    }"#;
    let inbox = Inbox::new().with_raw("no_delivery.json", route_without_delivery);

    let report = inbox.triage(&TriageConfig::default());
    assert_eq!(report.shipments[0].digest.disposition, DeliveryDisposition::Unknown);
    assert_eq!(report.summary.unknown, 1);
    assert_eq!(report.verdict.status, VerdictStatus::Warn);

    let strict = TriageConfig {
        fail_on_unknown: true,
        ..Default::default()
    };
    let report = inbox.triage(&strict);
    assert_eq!(report.verdict.status, VerdictStatus::Fail);
    assert_eq!(
        report.verdict.reasons,
        vec!["1 shipment(s) have no recognized delivery stop".to_string()]
    );
}

#[test]
fn other_transaction_sets_are_skipped() {
    let status_message = r#"{
        "heading": {
            "transaction_set_header_ST": { "transaction_set_identifier_code_01": "214" }
        },
        "detail": {}
    }"#;
    let report = Inbox::new()
        .with_fixture("live_unload.json")
        .with_raw("status.json", status_message)
        .triage(&TriageConfig::default());

    assert_eq!(report.summary.documents, 2);
    assert_eq!(report.summary.shipments, 1);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("status.json"));
    assert!(report.skipped[0].reason.contains("214"));
    assert_eq!(report.verdict.status, VerdictStatus::Warn);

    let open = TriageConfig {
        transaction_sets: vec![],
        ..Default::default()
    };
    let report = Inbox::new()
        .with_raw("status.json", status_message)
        .triage(&open);
    assert_eq!(report.summary.shipments, 1);
    assert_eq!(report.shipments[0].digest.disposition, DeliveryDisposition::Unknown);
}

#[test]
fn corrupt_document_is_reported_not_fatal() {
    let inbox = Inbox::new()
        .with_fixture("drop_hook.json")
        .with_raw("broken.json", "{ \"artifact\": ");

    let report = inbox.triage(&TriageConfig::default());
    assert_eq!(report.summary.documents, 2);
    assert_eq!(report.summary.shipments, 1);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.errors[0].kind, "json");
    assert!(report.errors[0].path.ends_with("broken.json"));
    assert_eq!(report.verdict.status, VerdictStatus::Fail);

    let lenient = TriageConfig {
        fail_on_load_error: false,
        ..Default::default()
    };
    assert_eq!(inbox.triage(&lenient).verdict.status, VerdictStatus::Warn);
}

#[test]
fn report_json_carries_schema_and_flattened_digest() {
    let report = Inbox::new()
        .with_fixture("live_unload.json")
        .triage(&TriageConfig::default());

    let value = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(value["schema"], "edi204.report.v1");
    assert_eq!(value["verdict"]["status"], "pass");
    assert_eq!(value["shipments"][0]["disposition"], "LIVE_UNLOAD");
    assert_eq!(value["shipments"][0]["shipment_id"], "417167540303N");
    assert_eq!(value["policy"]["transaction_sets"][0], "204");
    assert!(value.get("errors").is_none());
}

#[test]
fn string_weight_on_delivery_stop_is_still_live_unload() {
    let mut doc: serde_json::Value = serde_json::from_str(
        &fs_err::read_to_string(fixture_dir().join("live_unload.json")).expect("read fixture"),
    )
    .expect("fixture is json");
    let cu_stop = &mut doc["artifact"]["detail"]["detail"]["stop_off_details_S5_loop"][1];
    cu_stop["stop_off_details_S5"]["weight_03"] = serde_json::json!("42000");

    let report = Inbox::new()
        .with_raw("live_unload.json", &doc.to_string())
        .triage(&TriageConfig::default());

    assert!(report.errors.is_empty());
    let digest = &report.shipments[0].digest;
    assert_eq!(digest.disposition, DeliveryDisposition::LiveUnload);
    assert_eq!(digest.delivery_stop.as_ref().map(|s| s.sequence), Some(2));
    assert_eq!(report.verdict.status, VerdictStatus::Pass);
}

const SPOT_ONLY: &[(StopReasonCode, DeliveryDisposition)] = &[(
    StopReasonCode::SpotUnload,
    DeliveryDisposition::DropAndHook,
)];

#[test]
fn custom_table_changes_which_codes_decide() {
    let inbox = Inbox::new()
        .with_fixture("live_unload.json")
        .with_fixture("drop_hook.json");
    let triage = Triage::with_classifier(DeliveryTypeClassifier::with_table(SPOT_ONLY));

    let report = inbox.triage_with(&triage, &TriageConfig::default());

    let dispositions: Vec<DeliveryDisposition> = report
        .shipments
        .iter()
        .map(|e| e.digest.disposition)
        .collect();
    assert_eq!(
        dispositions,
        vec![DeliveryDisposition::DropAndHook, DeliveryDisposition::Unknown]
    );
    assert_eq!(report.summary.unknown, 1);
    assert_eq!(report.verdict.status, VerdictStatus::Warn);
}

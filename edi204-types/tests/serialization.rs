use edi204_types::codes::{DeliveryDisposition, SetPurpose, StopReasonCode};
use edi204_types::event::{Edi204Event, InboundDocument};
use edi204_types::report::{
    ShipmentDigest, ShipmentEntry, ToolInfo, TriagePolicy, TriageReport, VerdictStatus,
};
use edi204_types::transaction::ShipmentTransaction;
use pretty_assertions::assert_eq;
use std::path::Path;

fn fixture(name: &str) -> String {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = manifest_dir
        .parent()
        .expect("workspace root")
        .join("tests")
        .join("fixtures")
        .join("tender_204")
        .join(name);
    std::fs::read_to_string(&path).expect("read fixture")
}

#[test]
fn live_unload_event_deserializes() {
    let event: Edi204Event =
        serde_json::from_str(&fixture("live_unload.json")).expect("deserialize event");

    assert_eq!(
        event.event.detail_type.as_deref(),
        Some("transaction.processed.v2")
    );
    assert_eq!(
        event.event.detail.transaction_id.as_deref(),
        Some("af530c9a-9c54-4637-80ea-1f242a6672d2")
    );
    assert_eq!(event.partnership_id(), Some("ModalView_TDIS"));
    assert_eq!(
        event.event.timestamp().map(|t| t.to_rfc3339()).as_deref(),
        Some("2024-03-19T14:43:06+00:00")
    );
    assert!(event.event.detail.processed_timestamp().is_some());

    let meta = event.metadata().expect("x12 metadata");
    assert_eq!(
        meta.transaction
            .as_ref()
            .and_then(|t| t.transaction_set_identifier.as_deref()),
        Some("204")
    );
    assert_eq!(
        meta.interchange
            .as_ref()
            .and_then(|i| i.control_number.as_deref()),
        Some("5810")
    );

    let tx = event.transaction();
    assert_eq!(tx.transaction_set_id(), Some("204"));
    assert_eq!(tx.carrier(), Some("TNQG"));
    assert_eq!(tx.shipment_id(), Some("417167540303N"));
    assert_eq!(tx.reference("BM"), Some("3208058883"));
    assert_eq!(
        tx.heading
            .set_purpose
            .as_ref()
            .and_then(|p| p.purpose.clone()),
        Some(SetPurpose::Change)
    );

    let codes: Vec<_> = tx.stops().iter().map(|s| s.reason().cloned()).collect();
    assert_eq!(
        codes,
        vec![
            Some(StopReasonCode::CompleteLoad),
            Some(StopReasonCode::CompleteUnload),
            Some(StopReasonCode::DriverReturn),
        ]
    );
    assert_eq!(tx.stops()[1].party_name(), Some("MECHANICSBURG-US-RENTAL-XPO"));
    assert_eq!(tx.stops()[1].entity_code(), Some("CN"));

    let totals = tx.summary.totals.as_ref().expect("L3");
    assert_eq!(totals.weight, Some(42247.0));
    assert_eq!(totals.charge, Some(43.48));
    assert_eq!(
        tx.summary.trailer.as_ref().and_then(|se| se.segment_count),
        Some(30)
    );
}

#[test]
fn drop_hook_event_carries_spot_unload_and_agent_reference() {
    let event: Edi204Event =
        serde_json::from_str(&fixture("drop_hook.json")).expect("deserialize event");
    let tx = event.transaction();

    assert_eq!(tx.stops()[1].reason(), Some(&StopReasonCode::SpotUnload));
    assert_eq!(tx.reference("AG"), Some("agRefNumber"));
    assert_eq!(tx.heading.references.len(), 6);
}

#[test]
fn bare_transaction_deserializes_without_envelope() {
    let tx: ShipmentTransaction =
        serde_json::from_str(&fixture("bare_transaction_unordered.json")).expect("deserialize");
    let seqs: Vec<u32> = tx.stops().iter().map(|s| s.sequence()).collect();
    assert_eq!(seqs, vec![3, 2, 1]);

    let doc = InboundDocument::Transaction(Box::new(tx));
    assert_eq!(doc.transaction_set_id(), Some("204"));
    assert!(doc.upstream_transaction_id().is_none());
}

#[test]
fn transaction_reserializes_with_translator_field_names() {
    let event: Edi204Event =
        serde_json::from_str(&fixture("live_unload.json")).expect("deserialize event");
    let value = serde_json::to_value(event.transaction()).expect("serialize");

    assert_eq!(
        value["detail"]["stop_off_details_S5_loop"][1]["stop_off_details_S5"]
            ["stop_reason_code_02"],
        serde_json::json!("CU")
    );
    assert_eq!(
        value["heading"]["beginning_segment_for_shipment_information_transaction_B2"]
            ["standard_carrier_alpha_code_02"],
        serde_json::json!("TNQG")
    );
}

#[test]
fn report_new_sets_schema_and_defaults() {
    let tool = ToolInfo {
        name: "edi204".to_string(),
        version: Some("0.1.0".to_string()),
        commit: None,
    };
    let report = TriageReport::new(tool, TriagePolicy::default());

    assert_eq!(report.schema, edi204_types::schema::EDI204_REPORT_V1);
    assert_eq!(report.verdict.status, VerdictStatus::Pass);
    assert!(report.shipments.is_empty());
    assert_eq!(report.policy.transaction_sets, vec!["204".to_string()]);
    assert!(report.policy.fail_on_load_error);
    assert!(!report.policy.fail_on_unknown);
}

#[test]
fn report_omits_empty_sections() {
    let tool = ToolInfo {
        name: "edi204".to_string(),
        version: None,
        commit: None,
    };
    let report = TriageReport::new(tool, TriagePolicy::default());
    let value = serde_json::to_value(&report).expect("serialize");

    assert!(value.get("errors").is_none());
    assert!(value.get("skipped").is_none());
    assert!(value.get("inputs").is_none());
    assert_eq!(value["verdict"]["status"], serde_json::json!("pass"));
    assert_eq!(value["shipments"], serde_json::json!([]));
}

#[test]
fn shipment_entry_flattens_digest() {
    let entry = ShipmentEntry {
        source: "inbox/a.json".to_string(),
        upstream_transaction_id: None,
        partnership_id: None,
        digest: ShipmentDigest {
            disposition: DeliveryDisposition::DropAndHook,
            carrier: Some("TNQG".to_string()),
            stop_count: 3,
            ..Default::default()
        },
    };

    let value = serde_json::to_value(&entry).expect("serialize");
    assert_eq!(value["source"], serde_json::json!("inbox/a.json"));
    assert_eq!(value["disposition"], serde_json::json!("DROP_AND_HOOK"));
    assert_eq!(value["carrier"], serde_json::json!("TNQG"));
    assert_eq!(value["stop_count"], serde_json::json!(3));

    let back: ShipmentEntry = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, entry);
}

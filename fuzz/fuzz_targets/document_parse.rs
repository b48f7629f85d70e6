#![no_main]

//! Fuzz target for inbound document parsing.
//!
//! Feeds arbitrary bytes through the same path the loader uses and digests whatever parses.
//! Nothing here may panic.

use edi204_domain::{DeliveryTypeClassifier, digest_transaction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(doc) = edi204_events::parse_document(s) else {
        return;
    };

    let digest = digest_transaction(doc.transaction(), &DeliveryTypeClassifier::new());
    let _ = doc.transaction_set_id();
    let _ = serde_json::to_string(&digest);

    // The raw transaction must also survive a re-serialization.
    if let Ok(json) = serde_json::to_string(doc.transaction()) {
        let _ = serde_json::from_str::<edi204_types::transaction::ShipmentTransaction>(&json);
    }
});

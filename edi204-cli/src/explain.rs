//! Stop reason code explanations for the `edi204 explain` command.
//!
//! Each entry describes what happens at a stop carrying the code and whether the code decides
//! the delivery disposition.

use edi204_domain::DeliveryTypeClassifier;
use edi204_types::codes::{DeliveryDisposition, StopReasonCode};

/// Information about a stop reason code.
#[derive(Debug, Clone)]
pub struct CodeExplanation {
    /// S5-02 code.
    pub code: StopReasonCode,
    /// Human-readable title.
    pub title: &'static str,
    /// What happens at a stop carrying this code.
    pub description: &'static str,
    /// What a planner or dispatcher should do with a tender carrying this code.
    pub guidance: &'static str,
}

impl CodeExplanation {
    /// Disposition this code implies when it is the earliest deciding stop.
    pub fn disposition(&self) -> Option<DeliveryDisposition> {
        DeliveryTypeClassifier::new().disposition_for(&self.code)
    }
}

pub static CODE_REGISTRY: &[CodeExplanation] = &[
    CodeExplanation {
        code: StopReasonCode::CompleteLoad,
        title: "Complete Load",
        description: r#"The driver picks up the full load at this stop.

On a rail-to-door move this is usually the ramp where the container is pulled
off the train."#,
        guidance: r#"Pickup stops never decide the delivery disposition. The appointment
window on this stop is reported as the pickup window."#,
    },
    CodeExplanation {
        code: StopReasonCode::CompleteUnload,
        title: "Complete Unload",
        description: r#"The consignee unloads the whole trailer while the driver waits.

The tractor stays attached, so the driver's time at the dock counts against
the appointment window."#,
        guidance: r#"Plan a live unload: book a dock appointment inside the window and
allow for detention if the consignee runs late."#,
    },
    CodeExplanation {
        code: StopReasonCode::SpotUnload,
        title: "Spot for Unload",
        description: r#"The loaded trailer is dropped at the consignee and unloaded later.

The driver leaves without waiting, usually hooking an empty on the way out."#,
        guidance: r#"Plan a drop and hook: confirm yard space at the consignee and arrange
an empty or a later pickup of the dropped trailer."#,
    },
    CodeExplanation {
        code: StopReasonCode::DriverReturn,
        title: "Driver Return",
        description: r#"The driver returns or repositions equipment after the delivery,
for example taking the empty container back to the ramp."#,
        guidance: "Return legs never decide the delivery disposition.",
    },
    CodeExplanation {
        code: StopReasonCode::PartLoad,
        title: "Part Load",
        description: "Part of the shipment is picked up at this stop.",
        guidance: "Treated as a pickup stop.",
    },
    CodeExplanation {
        code: StopReasonCode::PartUnload,
        title: "Part Unload",
        description: "Part of the shipment is delivered at this stop.",
        guidance: r#"Partial deliveries do not settle how the final delivery is worked.
A tender with only part unloads classifies as UNKNOWN."#,
    },
    CodeExplanation {
        code: StopReasonCode::Load,
        title: "Load",
        description: "Freight is loaded at this stop.",
        guidance: "Treated as a pickup stop.",
    },
    CodeExplanation {
        code: StopReasonCode::Unload,
        title: "Unload",
        description: "Freight is unloaded at this stop without saying how.",
        guidance: r#"The code does not say whether the driver waits. Confirm with the
shipper before planning."#,
    },
    CodeExplanation {
        code: StopReasonCode::SpotLoad,
        title: "Spot for Load",
        description: "An empty trailer is dropped here to be loaded later.",
        guidance: "Treated as a pickup stop.",
    },
];

/// Look up a code by its S5-02 value (`CU`) or its title (`complete-unload`).
pub fn lookup_code(query: &str) -> Option<&'static CodeExplanation> {
    let normalized = query.trim().to_lowercase().replace(['_', ' '], "-");

    CODE_REGISTRY.iter().find(|entry| {
        entry.code.as_code().eq_ignore_ascii_case(query.trim())
            || entry.title.to_lowercase().replace(' ', "-") == normalized
    })
}

pub fn list_codes() -> Vec<&'static str> {
    CODE_REGISTRY.iter().map(|e| e.code.as_code()).collect()
}

/// Get a description of what a disposition means.
pub fn disposition_meaning(disposition: DeliveryDisposition) -> &'static str {
    match disposition {
        DeliveryDisposition::LiveUnload => {
            "LIVE_UNLOAD: the driver waits at the consignee while the trailer is unloaded."
        }
        DeliveryDisposition::DropAndHook => {
            "DROP_AND_HOOK: the loaded trailer is dropped at the consignee and the driver leaves."
        }
        DeliveryDisposition::Unknown => {
            "UNKNOWN: the tender carries no stop that settles how the delivery is worked."
        }
    }
}

//! Code lists used by the 204 transaction set.
//!
//! The full code lists belong to the X12 standard. Only the codes this workspace
//! acts on are named; everything else is carried through as `Other(code)` so
//! reading never fails on a code we have not seen before.

use serde::{Deserialize, Serialize};
use std::fmt;

/// S5-02 stop reason code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StopReasonCode {
    /// `CL` complete load.
    CompleteLoad,
    /// `CU` complete unload. The trailer is unloaded while the driver waits.
    CompleteUnload,
    /// `SU` spot for unload. The loaded trailer is dropped at the stop.
    SpotUnload,
    /// `DR` driver return / repositioning.
    DriverReturn,
    /// `PL` part load.
    PartLoad,
    /// `PU` part unload.
    PartUnload,
    /// `LD` load.
    Load,
    /// `UL` unload.
    Unload,
    /// `SL` spot for load.
    SpotLoad,
    Other(String),
}

impl StopReasonCode {
    /// Codes with a known meaning, in display order.
    pub const KNOWN: &'static [StopReasonCode] = &[
        StopReasonCode::CompleteLoad,
        StopReasonCode::CompleteUnload,
        StopReasonCode::SpotUnload,
        StopReasonCode::DriverReturn,
        StopReasonCode::PartLoad,
        StopReasonCode::PartUnload,
        StopReasonCode::Load,
        StopReasonCode::Unload,
        StopReasonCode::SpotLoad,
    ];

    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "CL" => StopReasonCode::CompleteLoad,
            "CU" => StopReasonCode::CompleteUnload,
            "SU" => StopReasonCode::SpotUnload,
            "DR" => StopReasonCode::DriverReturn,
            "PL" => StopReasonCode::PartLoad,
            "PU" => StopReasonCode::PartUnload,
            "LD" => StopReasonCode::Load,
            "UL" => StopReasonCode::Unload,
            "SL" => StopReasonCode::SpotLoad,
            _ => StopReasonCode::Other(code.trim().to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            StopReasonCode::CompleteLoad => "CL",
            StopReasonCode::CompleteUnload => "CU",
            StopReasonCode::SpotUnload => "SU",
            StopReasonCode::DriverReturn => "DR",
            StopReasonCode::PartLoad => "PL",
            StopReasonCode::PartUnload => "PU",
            StopReasonCode::Load => "LD",
            StopReasonCode::Unload => "UL",
            StopReasonCode::SpotLoad => "SL",
            StopReasonCode::Other(code) => code,
        }
    }

    /// True for codes where freight is picked up at the stop.
    pub fn is_pickup(&self) -> bool {
        matches!(
            self,
            StopReasonCode::CompleteLoad
                | StopReasonCode::PartLoad
                | StopReasonCode::Load
                | StopReasonCode::SpotLoad
        )
    }
}

impl From<String> for StopReasonCode {
    fn from(value: String) -> Self {
        StopReasonCode::parse(&value)
    }
}

impl From<StopReasonCode> for String {
    fn from(value: StopReasonCode) -> Self {
        value.as_code().to_string()
    }
}

impl fmt::Display for StopReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// How the delivery leg of a tender is worked at the consignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryDisposition {
    LiveUnload,
    DropAndHook,
    #[default]
    Unknown,
}

impl DeliveryDisposition {
    pub fn label(self) -> &'static str {
        match self {
            DeliveryDisposition::LiveUnload => "LIVE_UNLOAD",
            DeliveryDisposition::DropAndHook => "DROP_AND_HOOK",
            DeliveryDisposition::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeliveryDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// G62-01 date qualifiers that bound a stop's appointment window.
pub mod date_qualifier {
    pub const SHIP_NOT_BEFORE: &str = "37";
    pub const SHIP_NOT_LATER_THAN: &str = "38";
    pub const DELIVER_NOT_BEFORE: &str = "53";
    pub const DELIVER_NOT_LATER_THAN: &str = "54";

    pub fn is_window_start(q: &str) -> bool {
        q == SHIP_NOT_BEFORE || q == DELIVER_NOT_BEFORE
    }

    pub fn is_window_end(q: &str) -> bool {
        q == SHIP_NOT_LATER_THAN || q == DELIVER_NOT_LATER_THAN
    }
}

/// N1-01 entity identifier codes.
pub mod entity {
    pub const SHIPPER: &str = "SH";
    pub const CONSIGNEE: &str = "CN";
    pub const RAMP: &str = "RD";
    pub const SHIP_FROM: &str = "SF";
    pub const SHIP_TO: &str = "ST";

    pub fn describe(code: &str) -> &'static str {
        match code {
            SHIPPER => "shipper",
            CONSIGNEE => "consignee",
            RAMP => "ramp",
            SHIP_FROM => "ship from",
            SHIP_TO => "ship to",
            _ => "party",
        }
    }
}

/// L11-02 reference identification qualifiers.
pub mod reference {
    pub const BILL_OF_LADING: &str = "BM";
    pub const BATCH: &str = "BT";
    pub const CUSTOMER_ORDER: &str = "CO";
    pub const NOTES: &str = "NO";
    pub const RELEASE: &str = "RE";
    pub const AGENT: &str = "AG";
}

/// B2A-01 transaction set purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SetPurpose {
    Original,
    Cancellation,
    Change,
    Replace,
    Other(String),
}

impl SetPurpose {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "00" => SetPurpose::Original,
            "01" => SetPurpose::Cancellation,
            "04" => SetPurpose::Change,
            "05" => SetPurpose::Replace,
            other => SetPurpose::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            SetPurpose::Original => "00",
            SetPurpose::Cancellation => "01",
            SetPurpose::Change => "04",
            SetPurpose::Replace => "05",
            SetPurpose::Other(code) => code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetPurpose::Original => "original",
            SetPurpose::Cancellation => "cancellation",
            SetPurpose::Change => "change",
            SetPurpose::Replace => "replace",
            SetPurpose::Other(_) => "other",
        }
    }
}

impl From<String> for SetPurpose {
    fn from(value: String) -> Self {
        SetPurpose::parse(&value)
    }
}

impl From<SetPurpose> for String {
    fn from(value: SetPurpose) -> Self {
        value.as_code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_reason_codes_parse_case_insensitively() {
        assert_eq!(StopReasonCode::parse("cu"), StopReasonCode::CompleteUnload);
        assert_eq!(StopReasonCode::parse(" SU "), StopReasonCode::SpotUnload);
        assert_eq!(
            StopReasonCode::parse("XX"),
            StopReasonCode::Other("XX".to_string())
        );
    }

    #[test]
    fn stop_reason_code_round_trips_through_json_string() {
        let code: StopReasonCode = serde_json::from_str("\"CU\"").expect("deserialize");
        assert_eq!(code, StopReasonCode::CompleteUnload);
        assert_eq!(serde_json::to_string(&code).expect("serialize"), "\"CU\"");

        let other: StopReasonCode = serde_json::from_str("\"ZZ\"").expect("deserialize");
        assert_eq!(serde_json::to_string(&other).expect("serialize"), "\"ZZ\"");
    }

    #[test]
    fn known_codes_all_have_two_letter_codes() {
        for code in StopReasonCode::KNOWN {
            assert_eq!(code.as_code().len(), 2, "{:?}", code);
            assert_eq!(&StopReasonCode::parse(code.as_code()), code);
        }
    }

    #[test]
    fn disposition_serializes_screaming_snake_case() {
        let live = serde_json::to_value(DeliveryDisposition::LiveUnload).expect("serialize");
        let drop = serde_json::to_value(DeliveryDisposition::DropAndHook).expect("serialize");
        let unknown = serde_json::to_value(DeliveryDisposition::Unknown).expect("serialize");

        assert_eq!(live, serde_json::json!("LIVE_UNLOAD"));
        assert_eq!(drop, serde_json::json!("DROP_AND_HOOK"));
        assert_eq!(unknown, serde_json::json!("UNKNOWN"));
        assert_eq!(DeliveryDisposition::DropAndHook.to_string(), "DROP_AND_HOOK");
    }

    #[test]
    fn set_purpose_keeps_unknown_codes() {
        assert_eq!(SetPurpose::parse("04"), SetPurpose::Change);
        let other = SetPurpose::parse("99");
        assert_eq!(other.as_code(), "99");
        assert_eq!(other.label(), "other");
    }
}

use crate::codes::{SetPurpose, StopReasonCode, date_qualifier};
use crate::lenient;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A translated 204 transaction set: `heading`, `detail`, `summary`.
///
/// Field names follow the translator's output (`<element_name>_<SEGMENT><position>`), renamed to
/// plain Rust names. Reading is tolerant: every segment is optional, loops default to empty, and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentTransaction {
    #[serde(default)]
    pub heading: Heading,

    #[serde(default)]
    pub detail: Detail,

    #[serde(default)]
    pub summary: Summary,
}

impl ShipmentTransaction {
    pub fn stops(&self) -> &[Stop] {
        &self.detail.stops
    }

    /// ST-01, e.g. "204".
    pub fn transaction_set_id(&self) -> Option<&str> {
        self.heading
            .transaction_set_header
            .as_ref()
            .and_then(|st| st.transaction_set_identifier_code.as_deref())
    }

    pub fn carrier(&self) -> Option<&str> {
        self.heading
            .beginning_segment
            .as_ref()
            .and_then(|b2| b2.standard_carrier_alpha_code.as_deref())
    }

    pub fn shipment_id(&self) -> Option<&str> {
        self.heading
            .beginning_segment
            .as_ref()
            .and_then(|b2| b2.shipment_identification_number.as_deref())
    }

    /// First L11 value carrying the given qualifier.
    pub fn reference(&self, qualifier: &str) -> Option<&str> {
        self.heading
            .references
            .iter()
            .find(|r| r.qualifier.as_deref() == Some(qualifier))
            .and_then(|r| r.value.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(
        rename = "transaction_set_header_ST",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_set_header: Option<TransactionSetHeader>,

    #[serde(
        rename = "beginning_segment_for_shipment_information_transaction_B2",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub beginning_segment: Option<BeginningSegment>,

    #[serde(
        rename = "set_purpose_B2A",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub set_purpose: Option<SetPurposeSegment>,

    #[serde(
        rename = "business_instructions_and_reference_number_L11",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub references: Vec<Reference>,

    #[serde(
        rename = "note_special_instruction_NTE",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub notes: Vec<Note>,

    #[serde(
        rename = "equipment_details_N7_loop",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub equipment: Vec<EquipmentLoop>,
}

/// ST segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSetHeader {
    #[serde(
        rename = "transaction_set_identifier_code_01",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_set_identifier_code: Option<String>,

    #[serde(
        rename = "transaction_set_control_number_02",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_number: Option<String>,
}

/// B2 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeginningSegment {
    #[serde(
        rename = "standard_carrier_alpha_code_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub standard_carrier_alpha_code: Option<String>,

    #[serde(
        rename = "shipment_identification_number_04",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipment_identification_number: Option<String>,

    #[serde(
        rename = "shipment_method_of_payment_06",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub method_of_payment: Option<String>,
}

/// B2A segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetPurposeSegment {
    #[serde(
        rename = "transaction_set_purpose_code_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub purpose: Option<SetPurpose>,

    #[serde(
        rename = "application_type_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_type: Option<String>,
}

/// L11 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(
        rename = "reference_identification_01",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,

    #[serde(
        rename = "reference_identification_qualifier_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub qualifier: Option<String>,
}

/// NTE segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(
        rename = "note_reference_code_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_code: Option<String>,

    #[serde(
        rename = "description_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentLoop {
    #[serde(
        rename = "equipment_details_N7",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<EquipmentDetails>,
}

/// N7 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDetails {
    #[serde(
        rename = "equipment_initial_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub initial: Option<String>,

    #[serde(
        rename = "equipment_number_02",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,

    #[serde(
        rename = "equipment_description_code_11",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description_code: Option<String>,

    #[serde(
        rename = "standard_carrier_alpha_code_12",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_scac: Option<String>,

    #[serde(
        rename = "equipment_length_15",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<u32>,
}

impl EquipmentDetails {
    /// Initial and number joined, e.g. `EMHU300850`.
    pub fn equipment_id(&self) -> Option<String> {
        match (self.initial.as_deref(), self.number.as_deref()) {
            (Some(i), Some(n)) => Some(format!("{}{}", i.trim(), n.trim())),
            (None, Some(n)) => Some(n.trim().to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(
        rename = "stop_off_details_S5_loop",
        default,
        deserialize_with = "lenient::stops",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub stops: Vec<Stop>,
}

/// One iteration of the S5 loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(rename = "stop_off_details_S5")]
    pub stop_off_details: StopOffDetails,

    #[serde(
        rename = "date_time_G62",
        default,
        deserialize_with = "lenient::vec_skip_invalid",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub date_times: Vec<StopDateTime>,

    #[serde(
        rename = "name_N1_loop",
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub party: Option<PartyLoop>,
}

impl Stop {
    /// Convenience constructor for a stop with only S5 filled in.
    pub fn new(sequence: u32, reason: StopReasonCode) -> Self {
        Self {
            stop_off_details: StopOffDetails {
                sequence,
                reason: Some(reason),
                weight: None,
                weight_unit: None,
            },
            date_times: Vec::new(),
            party: None,
        }
    }

    pub fn sequence(&self) -> u32 {
        self.stop_off_details.sequence
    }

    pub fn reason(&self) -> Option<&StopReasonCode> {
        self.stop_off_details.reason.as_ref()
    }

    pub fn party_name(&self) -> Option<&str> {
        self.party
            .as_ref()
            .and_then(|p| p.name.as_ref())
            .and_then(|n| n.name.as_deref())
    }

    pub fn entity_code(&self) -> Option<&str> {
        self.party
            .as_ref()
            .and_then(|p| p.name.as_ref())
            .and_then(|n| n.entity_identifier_code.as_deref())
    }

    pub fn location(&self) -> Option<&GeographicLocation> {
        self.party.as_ref().and_then(|p| p.location.as_ref())
    }

    /// Earliest "not before" and latest "not later than" G62 instants on this stop.
    pub fn window(&self) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        let start = self
            .date_times
            .iter()
            .filter(|g| g.qualifier.as_deref().is_some_and(date_qualifier::is_window_start))
            .filter_map(StopDateTime::date_time)
            .min();
        let end = self
            .date_times
            .iter()
            .filter(|g| g.qualifier.as_deref().is_some_and(date_qualifier::is_window_end))
            .filter_map(StopDateTime::date_time)
            .max();
        (start, end)
    }
}

/// S5 segment.
///
/// Only S5-01 is required. The other elements never drop the stop: a value of the wrong type
/// reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopOffDetails {
    #[serde(
        rename = "stop_sequence_number_01",
        deserialize_with = "lenient::stop_sequence"
    )]
    pub sequence: u32,

    #[serde(
        rename = "stop_reason_code_02",
        default,
        deserialize_with = "lenient::opt_stop_reason",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<StopReasonCode>,

    #[serde(
        rename = "weight_03",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,

    #[serde(
        rename = "weight_unit_code_04",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight_unit: Option<String>,
}

/// G62 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopDateTime {
    #[serde(
        rename = "date_qualifier_01",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub qualifier: Option<String>,

    #[serde(
        rename = "date_02",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    #[serde(
        rename = "time_qualifier_03",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_qualifier: Option<String>,

    #[serde(
        rename = "time_04",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,

    #[serde(
        rename = "time_code_05",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_code: Option<String>,
}

impl StopDateTime {
    /// `YYYY-MM-DD` as written by the translator (`CCYYMMDD` is accepted too).
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
            .ok()
    }

    /// `HH:MM` (or `HH:MM:SS`, or raw `HHMM`).
    pub fn parsed_time(&self) -> Option<NaiveTime> {
        let raw = self.time.as_deref()?.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H%M"))
            .ok()
    }

    /// Date plus time; a missing time means start of day.
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        let date = self.parsed_date()?;
        match self.parsed_time() {
            Some(time) => Some(date.and_time(time)),
            None => date.and_hms_opt(0, 0, 0),
        }
    }
}

/// N1 loop inside a stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyLoop {
    #[serde(
        rename = "name_N1",
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<PartyName>,

    #[serde(
        rename = "address_information_N3",
        default,
        deserialize_with = "lenient::vec_skip_invalid",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub addresses: Vec<AddressInformation>,

    #[serde(
        rename = "geographic_location_N4",
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<GeographicLocation>,
}

/// N1 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyName {
    #[serde(
        rename = "entity_identifier_code_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_identifier_code: Option<String>,

    #[serde(rename = "name_02", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// N3 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressInformation {
    #[serde(
        rename = "address_information_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub line1: Option<String>,

    #[serde(
        rename = "address_information_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub line2: Option<String>,
}

/// N4 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    #[serde(
        rename = "city_name_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,

    #[serde(
        rename = "state_or_province_code_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,

    #[serde(
        rename = "postal_code_03",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,

    #[serde(
        rename = "country_code_04",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(
        rename = "total_weight_and_charges_L3",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub totals: Option<TotalWeightAndCharges>,

    #[serde(
        rename = "transaction_set_trailer_SE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trailer: Option<TransactionSetTrailer>,
}

/// L3 segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalWeightAndCharges {
    #[serde(rename = "weight_01", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(
        rename = "weight_qualifier_02",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weight_qualifier: Option<String>,

    #[serde(
        rename = "freight_rate_03",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub freight_rate: Option<f64>,

    #[serde(
        rename = "rate_value_qualifier_04",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_value_qualifier: Option<String>,

    #[serde(rename = "charge_05", default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,

    #[serde(
        rename = "special_charge_or_allowance_code_08",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub special_charge_code: Option<String>,

    #[serde(
        rename = "lading_quantity_11",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lading_quantity: Option<u64>,
}

/// SE segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSetTrailer {
    #[serde(
        rename = "number_of_included_segments_01",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_count: Option<u64>,

    #[serde(
        rename = "transaction_set_control_number_02",
        default,
        deserialize_with = "lenient::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub control_number: Option<String>,
}

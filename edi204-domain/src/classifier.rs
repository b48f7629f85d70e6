use edi204_types::codes::{DeliveryDisposition, StopReasonCode};
use edi204_types::transaction::Stop;

/// Stop reason codes that settle how the delivery is worked.
///
/// Every entry has the same weight: the stop with the lowest sequence number that carries any
/// code in the table decides. Codes not listed here never influence the disposition.
pub const DISPOSITION_TABLE: &[(StopReasonCode, DeliveryDisposition)] = &[
    (StopReasonCode::CompleteUnload, DeliveryDisposition::LiveUnload),
    (StopReasonCode::SpotUnload, DeliveryDisposition::DropAndHook),
];

/// Maps a stop sequence to a [`DeliveryDisposition`].
///
/// Total and pure: any input, including an empty or unordered stop list, yields a value.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryTypeClassifier {
    table: &'static [(StopReasonCode, DeliveryDisposition)],
}

impl Default for DeliveryTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryTypeClassifier {
    pub fn new() -> Self {
        Self {
            table: DISPOSITION_TABLE,
        }
    }

    pub fn with_table(table: &'static [(StopReasonCode, DeliveryDisposition)]) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static [(StopReasonCode, DeliveryDisposition)] {
        self.table
    }

    /// Disposition implied by a single reason code, if it is in the table.
    pub fn disposition_for(&self, code: &StopReasonCode) -> Option<DeliveryDisposition> {
        self.table
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, d)| *d)
    }

    pub fn classify(&self, stops: &[Stop]) -> DeliveryDisposition {
        self.classify_with_stop(stops).0
    }

    /// Like [`classify`](Self::classify), also returning the stop that decided.
    ///
    /// Stops are ordered by sequence number first; the input order is not trusted. The sort is
    /// stable, so stops sharing a sequence number keep their input order.
    pub fn classify_with_stop<'a>(
        &self,
        stops: &'a [Stop],
    ) -> (DeliveryDisposition, Option<&'a Stop>) {
        let mut ordered: Vec<&Stop> = stops.iter().collect();
        ordered.sort_by_key(|s| s.sequence());

        ordered
            .into_iter()
            .find_map(|stop| {
                stop.reason()
                    .and_then(|code| self.disposition_for(code))
                    .map(|d| (d, Some(stop)))
            })
            .unwrap_or((DeliveryDisposition::Unknown, None))
    }
}

/// Classify with the default table.
pub fn classify_delivery(stops: &[Stop]) -> DeliveryDisposition {
    DeliveryTypeClassifier::new().classify(stops)
}

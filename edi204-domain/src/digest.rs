use crate::classifier::DeliveryTypeClassifier;
use edi204_types::codes::reference;
use edi204_types::report::{
    EquipmentDigest, ReferenceDigest, ShipmentDigest, StopDigest, TotalsDigest,
};
use edi204_types::transaction::{ShipmentTransaction, Stop};

/// Reduce a translated 204 to the fields downstream consumers act on.
pub fn digest_transaction(
    tx: &ShipmentTransaction,
    classifier: &DeliveryTypeClassifier,
) -> ShipmentDigest {
    let (disposition, delivery) = classifier.classify_with_stop(tx.stops());

    let b2 = tx.heading.beginning_segment.as_ref();
    let b2a = tx.heading.set_purpose.as_ref();

    ShipmentDigest {
        disposition,
        carrier: tx.carrier().map(str::to_string),
        shipment_id: tx.shipment_id().map(str::to_string),
        control_number: tx
            .heading
            .transaction_set_header
            .as_ref()
            .and_then(|st| st.control_number.clone()),
        purpose: b2a
            .and_then(|p| p.purpose.as_ref())
            .map(|p| p.as_code().to_string()),
        application_type: b2a.and_then(|p| p.application_type.clone()),
        method_of_payment: b2.and_then(|b| b.method_of_payment.clone()),
        bill_of_lading: tx.reference(reference::BILL_OF_LADING).map(str::to_string),
        stop_count: tx.stops().len() as u64,
        pickup_stop: pickup_stop(tx.stops()).map(stop_digest),
        delivery_stop: delivery.map(stop_digest),
        references: tx
            .heading
            .references
            .iter()
            .filter_map(|r| match (&r.qualifier, &r.value) {
                (Some(q), Some(v)) => Some(ReferenceDigest {
                    qualifier: q.clone(),
                    value: v.clone(),
                }),
                _ => None,
            })
            .collect(),
        equipment: tx
            .heading
            .equipment
            .iter()
            .filter_map(|n7| n7.details.as_ref())
            .filter_map(|d| {
                d.equipment_id().map(|id| EquipmentDigest {
                    id,
                    length: d.length,
                })
            })
            .collect(),
        totals: totals(tx),
        notes: tx
            .heading
            .notes
            .iter()
            .filter_map(|n| n.description.as_deref())
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
    }
}

/// First stop, in sequence order, where freight is picked up.
fn pickup_stop(stops: &[Stop]) -> Option<&Stop> {
    let mut ordered: Vec<&Stop> = stops.iter().collect();
    ordered.sort_by_key(|s| s.sequence());
    ordered
        .into_iter()
        .find(|s| s.reason().is_some_and(|r| r.is_pickup()))
}

fn stop_digest(stop: &Stop) -> StopDigest {
    let (window_start, window_end) = stop.window();
    let location = stop.location();
    StopDigest {
        sequence: stop.sequence(),
        reason: stop.reason().map(|r| r.as_code().to_string()),
        party: stop.party_name().map(str::to_string),
        role: stop.entity_code().map(str::to_string),
        city: location.and_then(|l| l.city.clone()),
        state: location.and_then(|l| l.state.clone()),
        postal_code: location.and_then(|l| l.postal_code.clone()),
        window_start,
        window_end,
    }
}

fn totals(tx: &ShipmentTransaction) -> Option<TotalsDigest> {
    let l3 = tx.summary.totals.as_ref();
    let segment_count = tx.summary.trailer.as_ref().and_then(|se| se.segment_count);
    if l3.is_none() && segment_count.is_none() {
        return None;
    }

    Some(TotalsDigest {
        weight: l3.and_then(|t| t.weight),
        weight_qualifier: l3.and_then(|t| t.weight_qualifier.clone()),
        charge: l3.and_then(|t| t.charge),
        lading_quantity: l3.and_then(|t| t.lading_quantity),
        segment_count,
    })
}

#![no_main]

//! Fuzz target for the classifier over structured stop lists.
//!
//! Checks that the result does not depend on input order.

use arbitrary::Arbitrary;
use edi204_domain::classify_delivery;
use edi204_types::codes::StopReasonCode;
use edi204_types::transaction::Stop;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Route {
    stops: Vec<(u8, u8)>,
}

const CODES: &[&str] = &["CL", "CU", "SU", "DR", "PL", "PU", "LD", "UL", "SL", "ZZ"];

fuzz_target!(|route: Route| {
    // Distinct sequence numbers, so reversal is a real reordering.
    let mut seen = std::collections::BTreeSet::new();
    let stops: Vec<Stop> = route
        .stops
        .iter()
        .filter(|(seq, _)| seen.insert(*seq))
        .map(|(seq, code)| {
            Stop::new(
                u32::from(*seq),
                StopReasonCode::parse(CODES[usize::from(*code) % CODES.len()]),
            )
        })
        .collect();

    let forward = classify_delivery(&stops);
    let mut reversed = stops.clone();
    reversed.reverse();
    assert_eq!(forward, classify_delivery(&reversed));
});

//! Rendering helpers (markdown) for human-readable artifacts.

use edi204_types::codes::{SetPurpose, entity};
use edi204_types::report::{ShipmentEntry, StopDigest, TriageReport, VerdictStatus};

pub fn render_report_md(report: &TriageReport) -> String {
    let mut out = String::new();
    out.push_str("# edi204 triage\n\n");
    out.push_str(&format!(
        "- Verdict: `{}`\n",
        status_label(report.verdict.status)
    ));
    for reason in &report.verdict.reasons {
        out.push_str(&format!("  - {}\n", reason));
    }
    let s = &report.summary;
    out.push_str(&format!(
        "- Documents: {} (skipped {}, errors {})\n",
        s.documents, s.skipped, s.errors
    ));
    out.push_str(&format!(
        "- Shipments: {} (live unload {}, drop and hook {}, unknown {})\n\n",
        s.shipments, s.live_unload, s.drop_and_hook, s.unknown
    ));

    out.push_str("## Shipments\n\n");
    if report.shipments.is_empty() {
        out.push_str("_No shipments classified._\n");
    } else {
        for (i, entry) in report.shipments.iter().enumerate() {
            render_shipment(&mut out, i + 1, entry);
        }
    }

    if !report.skipped.is_empty() {
        out.push_str("\n## Skipped\n\n");
        for skip in &report.skipped {
            out.push_str(&format!("- `{}`: {}\n", skip.path, skip.reason));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\n## Errors\n\n");
        for err in &report.errors {
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                err.path, err.kind, err.message
            ));
        }
    }

    out
}

fn render_shipment(out: &mut String, n: usize, entry: &ShipmentEntry) {
    let d = &entry.digest;
    out.push_str(&format!(
        "### {}. {}\n\n",
        n,
        d.shipment_id.as_deref().unwrap_or("(no shipment id)")
    ));
    out.push_str(&format!("- Disposition: `{}`\n", d.disposition));
    out.push_str(&format!("- Source: `{}`\n", entry.source));
    if let Some(carrier) = &d.carrier {
        out.push_str(&format!("- Carrier: {}\n", carrier));
    }
    if let Some(purpose) = &d.purpose {
        out.push_str(&format!(
            "- Purpose: {} ({})\n",
            SetPurpose::parse(purpose).label(),
            purpose
        ));
    }
    if let Some(bol) = &d.bill_of_lading {
        out.push_str(&format!("- Bill of lading: {}\n", bol));
    }
    out.push_str(&format!("- Stops: {}\n", d.stop_count));
    if let Some(stop) = &d.pickup_stop {
        out.push_str(&format!("- Pickup: {}\n", stop_line(stop)));
    }
    match &d.delivery_stop {
        Some(stop) => out.push_str(&format!("- Delivery: {}\n", stop_line(stop))),
        None => out.push_str("- Delivery: _no recognized delivery stop_\n"),
    }
    if !d.equipment.is_empty() {
        let ids: Vec<&str> = d.equipment.iter().map(|e| e.id.as_str()).collect();
        out.push_str(&format!("- Equipment: {}\n", ids.join(", ")));
    }
    if let Some(id) = &entry.upstream_transaction_id {
        out.push_str(&format!("- Transaction: `{}`\n", id));
    }
    out.push('\n');
}

fn stop_line(stop: &StopDigest) -> String {
    let mut line = format!(
        "#{} `{}`",
        stop.sequence,
        stop.reason.as_deref().unwrap_or("-")
    );
    if let Some(party) = &stop.party {
        line.push_str(&format!(" {}", party));
    }
    if let Some(role) = &stop.role {
        line.push_str(&format!(" ({})", entity::describe(role)));
    }
    match (&stop.city, &stop.state) {
        (Some(city), Some(state)) => line.push_str(&format!(", {} {}", city, state)),
        (Some(city), None) => line.push_str(&format!(", {}", city)),
        _ => {}
    }
    match (stop.window_start, stop.window_end) {
        (Some(start), Some(end)) if start == end => {
            line.push_str(&format!(" at {}", start.format("%Y-%m-%d %H:%M")))
        }
        (Some(start), Some(end)) => line.push_str(&format!(
            " between {} and {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        )),
        (Some(start), None) => {
            line.push_str(&format!(" from {}", start.format("%Y-%m-%d %H:%M")))
        }
        (None, Some(end)) => line.push_str(&format!(" by {}", end.format("%Y-%m-%d %H:%M"))),
        (None, None) => {}
    }
    line
}

fn status_label(s: VerdictStatus) -> &'static str {
    match s {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Warn => "warn",
        VerdictStatus::Fail => "fail",
    }
}

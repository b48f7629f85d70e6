use crate::classifier::DeliveryTypeClassifier;
use crate::digest::digest_transaction;
use chrono::Utc;
use edi204_events::LoadedDocument;
use edi204_types::codes::DeliveryDisposition;
use edi204_types::report::{
    InputError, ReportInput, ShipmentEntry, SkippedInput, ToolInfo, TriagePolicy, TriageReport,
    TriageSummary, Verdict, VerdictStatus,
};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Treat an `UNKNOWN` disposition as a failure instead of a warning.
    pub fail_on_unknown: bool,
    /// Treat a document that failed to load as a failure instead of a warning.
    pub fail_on_load_error: bool,
    /// Accepted transaction set identifiers. Empty accepts everything.
    pub transaction_sets: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        let policy = TriagePolicy::default();
        Self {
            fail_on_unknown: policy.fail_on_unknown,
            fail_on_load_error: policy.fail_on_load_error,
            transaction_sets: policy.transaction_sets,
        }
    }
}

impl TriageConfig {
    fn policy(&self) -> TriagePolicy {
        TriagePolicy {
            fail_on_unknown: self.fail_on_unknown,
            fail_on_load_error: self.fail_on_load_error,
            transaction_sets: self.transaction_sets.clone(),
        }
    }

    /// A document without any transaction set identifier is accepted.
    fn accepts(&self, transaction_set: Option<&str>) -> bool {
        match transaction_set {
            _ if self.transaction_sets.is_empty() => true,
            None => true,
            Some(id) => self.transaction_sets.iter().any(|s| s.trim() == id.trim()),
        }
    }
}

pub struct Triage {
    classifier: DeliveryTypeClassifier,
}

impl Default for Triage {
    fn default() -> Self {
        Self::new()
    }
}

impl Triage {
    pub fn new() -> Self {
        Self {
            classifier: DeliveryTypeClassifier::new(),
        }
    }

    pub fn with_classifier(classifier: DeliveryTypeClassifier) -> Self {
        Self { classifier }
    }

    pub fn run(
        &self,
        config: &TriageConfig,
        documents: &[LoadedDocument],
        tool: ToolInfo,
    ) -> TriageReport {
        let mut report = TriageReport::new(tool, config.policy());
        report.inputs = documents.iter().map(to_report_input).collect();

        let mut shipments = Vec::new();
        for loaded in documents {
            let path = loaded.path.to_string();

            let doc = match &loaded.document {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(path = %path, error = %e, "document failed to load");
                    report.errors.push(InputError {
                        path,
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let set_id = doc.transaction_set_id();
            if !config.accepts(set_id) {
                debug!(path = %path, transaction_set = ?set_id, "skipping transaction set");
                report.skipped.push(SkippedInput {
                    path,
                    reason: format!(
                        "transaction set {} is not one of [{}]",
                        set_id.unwrap_or("-"),
                        config.transaction_sets.join(", ")
                    ),
                });
                continue;
            }

            let digest = digest_transaction(doc.transaction(), &self.classifier);
            debug!(
                path = %path,
                shipment_id = ?digest.shipment_id,
                disposition = %digest.disposition,
                "classified shipment"
            );

            shipments.push(ShipmentEntry {
                source: path,
                upstream_transaction_id: doc.upstream_transaction_id().map(str::to_string),
                partnership_id: doc
                    .event()
                    .and_then(|ev| ev.partnership_id())
                    .map(str::to_string),
                digest,
            });
        }

        // Deterministic ordering.
        shipments.sort_by(|a, b| {
            (a.source.as_str(), a.digest.shipment_id.as_deref())
                .cmp(&(b.source.as_str(), b.digest.shipment_id.as_deref()))
        });
        report.errors.sort_by(|a, b| a.path.cmp(&b.path));
        report.skipped.sort_by(|a, b| a.path.cmp(&b.path));

        report.summary = summarize(
            documents.len(),
            &shipments,
            report.skipped.len(),
            report.errors.len(),
        );
        report.verdict = evaluate(config, &report.summary);
        report.shipments = shipments;
        report.run.ended_at = Some(Utc::now());
        report
    }
}

fn to_report_input(d: &LoadedDocument) -> ReportInput {
    ReportInput {
        path: d.path.to_string(),
        sha256: d.sha256.clone(),
        kind: d.kind().map(str::to_string),
    }
}

fn summarize(
    documents: usize,
    shipments: &[ShipmentEntry],
    skipped: usize,
    errors: usize,
) -> TriageSummary {
    let mut summary = TriageSummary {
        documents: documents as u64,
        shipments: shipments.len() as u64,
        skipped: skipped as u64,
        errors: errors as u64,
        ..Default::default()
    };

    for s in shipments {
        match s.digest.disposition {
            DeliveryDisposition::LiveUnload => summary.live_unload += 1,
            DeliveryDisposition::DropAndHook => summary.drop_and_hook += 1,
            DeliveryDisposition::Unknown => summary.unknown += 1,
        }
    }
    summary
}

fn evaluate(config: &TriageConfig, summary: &TriageSummary) -> Verdict {
    let mut status = VerdictStatus::Pass;
    let mut reasons = Vec::new();

    if summary.errors > 0 {
        status = escalate(
            status,
            if config.fail_on_load_error {
                VerdictStatus::Fail
            } else {
                VerdictStatus::Warn
            },
        );
        reasons.push(format!("{} document(s) failed to load", summary.errors));
    }

    if summary.unknown > 0 {
        status = escalate(
            status,
            if config.fail_on_unknown {
                VerdictStatus::Fail
            } else {
                VerdictStatus::Warn
            },
        );
        reasons.push(format!(
            "{} shipment(s) have no recognized delivery stop",
            summary.unknown
        ));
    }

    if summary.skipped > 0 {
        status = escalate(status, VerdictStatus::Warn);
        reasons.push(format!(
            "{} document(s) skipped by transaction set filter",
            summary.skipped
        ));
    }

    Verdict { status, reasons }
}

fn escalate(current: VerdictStatus, next: VerdictStatus) -> VerdictStatus {
    fn rank(s: VerdictStatus) -> u8 {
        match s {
            VerdictStatus::Pass => 0,
            VerdictStatus::Warn => 1,
            VerdictStatus::Fail => 2,
        }
    }
    if rank(next) > rank(current) {
        next
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matches_configured_sets() {
        let config = TriageConfig::default();
        assert!(config.accepts(Some("204")));
        assert!(config.accepts(Some(" 204 ")));
        assert!(!config.accepts(Some("214")));
        assert!(config.accepts(None));

        let open = TriageConfig {
            transaction_sets: vec![],
            ..Default::default()
        };
        assert!(open.accepts(Some("990")));
    }

    #[test]
    fn escalate_never_downgrades() {
        assert_eq!(
            escalate(VerdictStatus::Fail, VerdictStatus::Warn),
            VerdictStatus::Fail
        );
        assert_eq!(
            escalate(VerdictStatus::Pass, VerdictStatus::Warn),
            VerdictStatus::Warn
        );
    }

    #[test]
    fn evaluate_rules() {
        let clean = TriageSummary {
            documents: 2,
            shipments: 2,
            live_unload: 1,
            drop_and_hook: 1,
            ..Default::default()
        };
        let config = TriageConfig::default();
        assert_eq!(evaluate(&config, &clean).status, VerdictStatus::Pass);
        assert!(evaluate(&config, &clean).reasons.is_empty());

        let unknown = TriageSummary {
            unknown: 1,
            ..clean.clone()
        };
        assert_eq!(evaluate(&config, &unknown).status, VerdictStatus::Warn);

        let strict = TriageConfig {
            fail_on_unknown: true,
            ..Default::default()
        };
        assert_eq!(evaluate(&strict, &unknown).status, VerdictStatus::Fail);

        let errored = TriageSummary {
            errors: 1,
            ..clean.clone()
        };
        assert_eq!(evaluate(&config, &errored).status, VerdictStatus::Fail);

        let lenient = TriageConfig {
            fail_on_load_error: false,
            ..Default::default()
        };
        let verdict = evaluate(&lenient, &errored);
        assert_eq!(verdict.status, VerdictStatus::Warn);
        assert_eq!(verdict.reasons, vec!["1 document(s) failed to load".to_string()]);
    }
}

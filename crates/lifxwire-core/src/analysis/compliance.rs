use std::collections::BTreeMap;

use crate::{ComplianceSummary, Violation};

const MAX_EXAMPLES: usize = 3;

/// Protocol checks applied to every inspected datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Check {
    TooShort,
    UnknownType,
    TruncatedPayload,
    SizeMismatch,
    ProtocolNumber,
    NotAddressable,
}

impl Check {
    pub fn id(self) -> &'static str {
        match self {
            Check::TooShort => "LX-TOO-SHORT",
            Check::UnknownType => "LX-UNKNOWN-TYPE",
            Check::TruncatedPayload => "LX-TRUNCATED-PAYLOAD",
            Check::SizeMismatch => "LX-SIZE-MISMATCH",
            Check::ProtocolNumber => "LX-PROTOCOL-NUMBER",
            Check::NotAddressable => "LX-NOT-ADDRESSABLE",
        }
    }

    pub fn severity(self) -> &'static str {
        match self {
            Check::TooShort | Check::TruncatedPayload => "error",
            _ => "warning",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Check::TooShort => "Datagram shorter than the 36-byte header",
            Check::UnknownType => "Message type has no registered payload",
            Check::TruncatedPayload => "Datagram ends before the payload is complete",
            Check::SizeMismatch => "Frame size differs from the datagram length",
            Check::ProtocolNumber => "Protocol number is not 1024",
            Check::NotAddressable => "Addressable bit is not set",
        }
    }
}

#[derive(Debug, Default)]
struct Occurrences {
    count: u64,
    examples: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ComplianceTracker {
    inspected: u64,
    failing: u64,
    occurrences: BTreeMap<Check, Occurrences>,
}

impl ComplianceTracker {
    /// Record the checks one datagram failed; an empty slice is a pass.
    pub fn record(&mut self, failed: &[Check], context: &str) {
        self.inspected += 1;
        if failed.is_empty() {
            return;
        }
        self.failing += 1;
        for &check in failed {
            let entry = self.occurrences.entry(check).or_default();
            entry.count += 1;
            if entry.examples.len() < MAX_EXAMPLES {
                entry.examples.push(context.to_string());
            }
        }
    }

    /// `None` when no datagram was inspected.
    pub fn into_summary(self) -> Option<ComplianceSummary> {
        if self.inspected == 0 {
            return None;
        }
        let passing = self.inspected - self.failing;
        let mut violations: Vec<Violation> = self
            .occurrences
            .into_iter()
            .map(|(check, occurrences)| Violation {
                id: check.id().to_string(),
                severity: check.severity().to_string(),
                message: check.message().to_string(),
                count: occurrences.count,
                examples: occurrences.examples,
            })
            .collect();
        violations.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.id.cmp(&b.id)));

        Some(ComplianceSummary {
            protocol: "lifx".to_string(),
            compliance_percentage: passing as f64 * 100.0 / self.inspected as f64,
            violations,
        })
    }
}

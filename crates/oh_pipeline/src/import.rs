//! Volunteer bulk import: paste text in, records plus an operator summary out.
//! Problems never abort the batch; each one is logged and listed in the summary.

use serde::Serialize;
use tracing::{info, warn};

use oh_algo::import::{import_volunteers, MalformedInput, TransformedRecord, VolunteerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub kind: VolunteerKind,
    /// One per imported row, in paste order.
    pub records: Vec<TransformedRecord>,
    pub summary: ImportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub expected: usize,
    pub message: String,
    pub issues: Vec<IssueLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueLine {
    pub line: usize,
    pub message: String,
}

impl From<&MalformedInput> for IssueLine {
    fn from(issue: &MalformedInput) -> Self {
        Self { line: issue.line(), message: issue.to_string() }
    }
}

pub fn run_import(text: &str, kind: VolunteerKind) -> ImportReport {
    let outcome = import_volunteers(text, kind);
    for issue in &outcome.issues {
        warn!(%kind, line = issue.line(), "{issue}");
    }
    let message = outcome.summary();
    if outcome.is_clean() {
        info!(%kind, "{message}");
    } else {
        warn!(%kind, "{message}");
    }

    ImportReport {
        kind,
        summary: ImportSummary {
            imported: outcome.imported(),
            expected: outcome.expected_rows,
            message,
            issues: outcome.issues.iter().map(IssueLine::from).collect(),
        },
        records: outcome.records,
    }
}

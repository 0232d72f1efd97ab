// crates/oh_algo/src/import/paste.rs
//
// Bulk paste → records. First non-blank row is the header row; every later row
// becomes one record, in paste order. Order matters: operators reconcile the
// output against their sheet row by row.
//
// Never fails as a whole. Problems are collected as `MalformedInput` values next
// to whatever records were recovered, and the caller decides how loudly to warn.

use thiserror::Error;

use super::mapping::{RawRecord, RecordTransform, TransformedRecord};
use super::scan::{scan_rows, unquote_cell, DropReason, DroppedRow, RawRow};
use super::volunteers::VolunteerKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInput {
    #[error("line {line}: quoted field never closed; row skipped")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: stray quote runs into the following rows; row skipped")]
    StrayQuote { line: usize },

    #[error("line {line}: {found} fields but the header has {expected}; extra fields dropped")]
    ColumnMismatch { line: usize, expected: usize, found: usize },

    #[error("line {line}: header row unreadable (broken quoting); nothing imported")]
    HeaderUnreadable { line: usize },
}

impl MalformedInput {
    pub fn line(&self) -> usize {
        match self {
            MalformedInput::UnterminatedQuote { line }
            | MalformedInput::StrayQuote { line }
            | MalformedInput::ColumnMismatch { line, .. }
            | MalformedInput::HeaderUnreadable { line } => *line,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub records: Vec<TransformedRecord>,
    pub issues: Vec<MalformedInput>,
    /// Data rows seen, including ones that had to be skipped.
    pub expected_rows: usize,
}

impl ImportOutcome {
    pub fn imported(&self) -> usize {
        self.records.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// One-line summary for the operator, e.g. `"imported 4 of 5 rows (1 issue)"`.
    pub fn summary(&self) -> String {
        let mut s = format!("imported {} of {} rows", self.imported(), self.expected_rows);
        match self.issues.len() {
            0 => {}
            1 => s.push_str(" (1 issue)"),
            n => s.push_str(&format!(" ({n} issues)")),
        }
        s
    }
}

/// Parse pasted spreadsheet text with a pluggable row transform.
pub fn parse_bulk_paste<T>(text: &str, transform: &T) -> ImportOutcome
where
    T: RecordTransform + ?Sized,
{
    let scanned = scan_rows(text);
    let mut outcome = ImportOutcome::default();

    let mut rows = scanned.rows.into_iter();
    let Some(header_row) = rows.next() else {
        // Nothing readable at all; any broken quote took the header with it.
        if let Some(first) = scanned.dropped.first() {
            outcome.issues.push(MalformedInput::HeaderUnreadable { line: first.line });
        }
        return outcome;
    };

    if let Some(first) = scanned.dropped.first() {
        if first.line < header_row.line {
            outcome.issues.push(MalformedInput::HeaderUnreadable { line: first.line });
            return outcome;
        }
    }

    let headers: Vec<String> = header_row
        .fields
        .iter()
        .map(|h| unquote_cell(h).trim().to_string())
        .collect();

    let data: Vec<RawRow> = rows.collect();
    outcome.expected_rows = data.len() + scanned.dropped.len();

    // Merge skipped-row notices into line order alongside column issues.
    let mut skipped = scanned.dropped.into_iter().peekable();
    for row in data {
        while let Some(drop) = skipped.next_if(|d| d.line < row.line) {
            outcome.issues.push(skipped_row(drop));
        }
        let raw = zip_row(&headers, row, &mut outcome.issues);
        outcome.records.push(transform.transform(&raw));
    }
    outcome.issues.extend(skipped.map(skipped_row));

    outcome
}

/// Convenience entry: import mentors or judges with their static tables.
pub fn import_volunteers(text: &str, kind: VolunteerKind) -> ImportOutcome {
    parse_bulk_paste(text, kind.mapping())
}

fn skipped_row(drop: DroppedRow) -> MalformedInput {
    match drop.reason {
        DropReason::Unterminated => MalformedInput::UnterminatedQuote { line: drop.line },
        DropReason::StrayQuote => MalformedInput::StrayQuote { line: drop.line },
    }
}

/// Zip one row against the header names. Short rows leave trailing headers
/// absent; long rows drop their extras and record the mismatch.
fn zip_row(headers: &[String], row: RawRow, issues: &mut Vec<MalformedInput>) -> RawRecord {
    let found = row.fields.len();
    if found > headers.len() {
        issues.push(MalformedInput::ColumnMismatch { line: row.line, expected: headers.len(), found });
    }
    let mut raw = RawRecord::new();
    for (header, cell) in headers.iter().zip(row.fields) {
        // Duplicate headers: the right-most column wins.
        raw.insert(header.clone(), unquote_cell(&cell));
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::mapping::FieldValue;

    fn text(v: &FieldValue) -> &str {
        v.as_text().expect("text field")
    }

    #[test]
    fn judge_round_trip_applies_defaults() {
        let out = import_volunteers("Your Name\tYour title\nAda Lovelace\tEngineer", VolunteerKind::Judge);
        assert!(out.is_clean());
        assert_eq!(out.records.len(), 1);
        let rec = &out.records[0];
        assert_eq!(rec.len(), 4);
        assert_eq!(text(&rec["name"]), "Ada Lovelace");
        assert_eq!(text(&rec["title"]), "Engineer");
        assert_eq!(rec["isSelected"], FieldValue::Bool(false));
        assert_eq!(text(&rec["linkedinProfile"]), "");
    }

    #[test]
    fn quoted_multiline_cell_stays_one_record() {
        let out = import_volunteers("Your Name\tShort bio\nJane Doe\t\"Line1\nLine2\"", VolunteerKind::Judge);
        assert_eq!(out.records.len(), 1);
        assert_eq!(text(&out.records[0]["biography"]), "Line1\nLine2");
    }

    #[test]
    fn yes_text_becomes_boolean() {
        let paste = "Your Name\tAre you joining us in-person at ASU Tempe?\n\
                     A\tYes, in Tempe\n\
                     B\tNo";
        let out = import_volunteers(paste, VolunteerKind::Mentor);
        assert_eq!(out.records[0]["isInPerson"], FieldValue::Bool(true));
        assert_eq!(out.records[1]["isInPerson"], FieldValue::Bool(false));
    }

    #[test]
    fn doubled_quotes_unescape() {
        let out = import_volunteers("Your Name\tShort bio\nX\t\"She said \"\"hi\"\"\"", VolunteerKind::Judge);
        assert_eq!(text(&out.records[0]["biography"]), "She said \"hi\"");
    }

    #[test]
    fn row_order_is_preserved() {
        let names = ["Eve", "Bob", "Dan", "Ann", "Cid"];
        let mut paste = String::from("Your Name");
        for n in names {
            paste.push('\n');
            paste.push_str(n);
        }
        let out = import_volunteers(&paste, VolunteerKind::Mentor);
        let got: Vec<&str> = out.records.iter().map(|r| text(&r["name"])).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn headers_are_trimmed_but_cells_are_not() {
        let out = import_volunteers("  Your Name \t Your title\n Ada \tCTO", VolunteerKind::Judge);
        assert_eq!(text(&out.records[0]["name"]), " Ada ");
        assert_eq!(text(&out.records[0]["title"]), "CTO");
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let out = import_volunteers("Your Name\tYour title\tCompany\nAda", VolunteerKind::Judge);
        let rec = &out.records[0];
        assert!(!rec.contains_key("title"));
        assert!(!rec.contains_key("companyName"));
        assert!(out.is_clean());
    }

    #[test]
    fn long_rows_are_flagged_not_fatal() {
        let out = import_volunteers("Your Name\nAda\textra\nBob", VolunteerKind::Judge);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.issues, vec![MalformedInput::ColumnMismatch { line: 2, expected: 1, found: 2 }]);
    }

    #[test]
    fn unterminated_quote_is_reported_and_isolated() {
        let paste = "Your Name\tShort bio\nAnn\t\"never closed\nBob\tok\nCat\tfine";
        let out = import_volunteers(paste, VolunteerKind::Judge);
        let got: Vec<&str> = out.records.iter().map(|r| text(&r["name"])).collect();
        assert_eq!(got, vec!["Bob", "Cat"]);
        assert_eq!(out.issues, vec![MalformedInput::UnterminatedQuote { line: 2 }]);
        assert_eq!(out.expected_rows, 3);
        assert_eq!(out.summary(), "imported 2 of 3 rows (1 issue)");
    }

    #[test]
    fn stray_quote_never_merges_two_people() {
        // Ann's bio opens a quote that Bob's bio closes; both rows are skipped
        // rather than reported as one judge.
        let paste = "Your Name\tShort bio\nAnn\t\"never\nBob\t\"ok\nCat\tfine";
        let out = import_volunteers(paste, VolunteerKind::Judge);
        let got: Vec<&str> = out.records.iter().map(|r| text(&r["name"])).collect();
        assert_eq!(got, vec!["Cat"]);
        assert!(out.records.iter().all(|r| !text(&r["biography"]).contains("Bob")));
        assert_eq!(
            out.issues,
            vec![MalformedInput::StrayQuote { line: 2 }, MalformedInput::UnterminatedQuote { line: 3 }]
        );
        assert_eq!(out.summary(), "imported 1 of 3 rows (2 issues)");
    }

    #[test]
    fn rows_after_a_broken_quote_are_recovered() {
        let paste = "Your Name\tShort bio\nAnn\t\"x\nBob\t\"y\"\nCat\tz";
        let out = import_volunteers(paste, VolunteerKind::Judge);
        let got: Vec<&str> = out.records.iter().map(|r| text(&r["name"])).collect();
        assert_eq!(got, vec!["Bob", "Cat"]);
        assert_eq!(text(&out.records[0]["biography"]), "y");
        assert_eq!(out.issues, vec![MalformedInput::UnterminatedQuote { line: 2 }]);
        assert_eq!(out.expected_rows, 3);
    }

    #[test]
    fn broken_header_imports_nothing() {
        let out = import_volunteers("\"Your Name\tYour title", VolunteerKind::Judge);
        assert!(out.records.is_empty());
        assert_eq!(out.issues, vec![MalformedInput::HeaderUnreadable { line: 1 }]);
    }

    #[test]
    fn empty_paste_is_empty() {
        let out = import_volunteers("", VolunteerKind::Mentor);
        assert_eq!(out, ImportOutcome::default());
        assert_eq!(out.summary(), "imported 0 of 0 rows");
    }

    #[test]
    fn custom_transform_sees_raw_headers() {
        let count_cells = |raw: &RawRecord| -> TransformedRecord {
            let mut out = TransformedRecord::new();
            out.insert("cells".into(), FieldValue::Text(raw.len().to_string()));
            out
        };
        let out = parse_bulk_paste("a\tb\tc\n1\t2\n", &count_cells);
        assert_eq!(text(&out.records[0]["cells"]), "2");
    }
}

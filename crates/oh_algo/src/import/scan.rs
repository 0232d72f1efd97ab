// crates/oh_algo/src/import/scan.rs
//
// Row scanner for text pasted out of a spreadsheet (Google Sheets / Excel).
//
// This is not CSV. The clipboard format is: fields separated by TAB, rows by LF
// (CRLF from Excel), and any cell containing a tab, newline or quote is wrapped
// in double quotes with inner quotes doubled. So the scanner is a quote toggle:
// every `"` flips `in_quotes`, and TAB / LF only delimit while it is off.
//
// Raw fields keep their quotes; `unquote_cell` strips one layer afterwards.
//
// Recovery works one row at a time. A row is dropped and reported when
// - the text ends inside quotes (`Unterminated`), or
// - a field that crossed a line break is not one well-formed quoted cell
//   (`StrayQuote`): a bare `"` mid-cell opened a quote that some later row's
//   quote closed, gluing the two rows together.
// Either way scanning restarts on the physical line after the dropped row's
// first line, so the rows it swallowed are read again on their own.

/// One scanned row. `line` is the 1-based physical line the row starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Why a row was dropped by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The text ended while a quote opened in this row was still open.
    Unterminated,
    /// A quote opened mid-cell ran across a line break into later rows.
    StrayQuote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DroppedRow {
    pub line: usize,
    pub reason: DropReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub rows: Vec<RawRow>,
    /// Rows that could not be split safely, in line order.
    pub dropped: Vec<DroppedRow>,
}

enum RowScan {
    /// A complete row; `consumed` bytes and `lines` physical lines were read.
    Row {
        fields: Vec<String>,
        consumed: usize,
        lines: usize,
    },
    Broken(DropReason),
}

/// Split pasted text into rows of raw (still quoted) fields.
pub fn scan_rows(text: &str) -> ScanOutput {
    let mut out = ScanOutput::default();
    let mut offset = 0usize;
    let mut line = 1usize;
    while offset < text.len() {
        let rest = &text[offset..];
        match scan_row(rest) {
            RowScan::Row { fields, consumed, lines } => {
                push_row(&mut out.rows, line, fields);
                offset += consumed;
                line += lines;
            }
            RowScan::Broken(reason) => {
                out.dropped.push(DroppedRow { line, reason });
                match rest.find('\n') {
                    Some(nl) => {
                        offset += nl + 1;
                        line += 1;
                    }
                    None => break,
                }
            }
        }
    }
    out
}

/// Scan exactly one row from the start of `text`.
fn scan_row(text: &str) -> RowScan {
    let mut in_quotes = false;
    let mut field = String::new();
    let mut fields: Vec<String> = Vec::new();
    let mut lines = 1usize;

    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                field.push(c);
            }
            '\t' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && matches!(chars.peek(), Some((_, '\n'))) => {}
            '\n' if !in_quotes => {
                fields.push(field);
                return finish_row(fields, idx + 1, lines);
            }
            _ => {
                if c == '\n' {
                    lines += 1;
                }
                field.push(c);
            }
        }
    }

    if in_quotes {
        return RowScan::Broken(DropReason::Unterminated);
    }
    fields.push(field);
    finish_row(fields, text.len(), lines)
}

fn finish_row(fields: Vec<String>, consumed: usize, lines: usize) -> RowScan {
    if fields.iter().any(|f| f.contains('\n') && !is_quoted_cell(f)) {
        return RowScan::Broken(DropReason::StrayQuote);
    }
    RowScan::Row { fields, consumed, lines }
}

/// `"` + (anything but a quote, or `""`)* + `"`.
fn is_quoted_cell(raw: &str) -> bool {
    match raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => !inner.replace("\"\"", "").contains('"'),
        None => false,
    }
}

/// Spreadsheets pad selections with blank rows; those never become records.
fn push_row(rows: &mut Vec<RawRow>, line: usize, fields: Vec<String>) {
    if fields.iter().all(|f| f.trim().is_empty()) {
        return;
    }
    rows.push(RawRow { line, fields });
}

/// Strip one layer of surrounding quotes and turn `""` back into `"`.
///
/// Cells that are not wrapped in quotes are returned untouched.
pub fn unquote_cell(raw: &str) -> String {
    match raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(out: &ScanOutput) -> Vec<Vec<&str>> {
        out.rows
            .iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    fn dropped(out: &ScanOutput) -> Vec<(usize, DropReason)> {
        out.dropped.iter().map(|d| (d.line, d.reason)).collect()
    }

    #[test]
    fn tabs_and_newlines_delimit() {
        let out = scan_rows("a\tb\nc\td\n");
        assert_eq!(fields(&out), vec![vec!["a", "b"], vec!["c", "d"]]);
        assert_eq!(out.rows[1].line, 2);
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn quoted_field_keeps_newline_and_tab() {
        let out = scan_rows("Name\tBio\nJane Doe\t\"Line1\nLine2\tstill\"\nBob\tx");
        assert_eq!(
            fields(&out),
            vec![vec!["Name", "Bio"], vec!["Jane Doe", "\"Line1\nLine2\tstill\""], vec!["Bob", "x"]]
        );
        assert_eq!(out.rows[2].line, 4);
    }

    #[test]
    fn crlf_is_a_single_row_break() {
        let out = scan_rows("a\tb\r\nc\td\r\n");
        assert_eq!(fields(&out), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn carriage_return_inside_quotes_survives() {
        let out = scan_rows("h\n\"x\r\ny\"");
        assert_eq!(fields(&out)[1], vec!["\"x\r\ny\""]);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let out = scan_rows("h1\th2\n\n\t\nv1\tv2\n\n");
        assert_eq!(fields(&out), vec![vec!["h1", "h2"], vec!["v1", "v2"]]);
        assert_eq!(out.rows[1].line, 4);
    }

    #[test]
    fn unterminated_quote_drops_only_its_row() {
        let text = "Name\tBio\nAnn\t\"never closed\nBob\tok\nCat\tfine";
        let out = scan_rows(text);
        assert_eq!(dropped(&out), vec![(2, DropReason::Unterminated)]);
        assert_eq!(fields(&out), vec![vec!["Name", "Bio"], vec!["Bob", "ok"], vec!["Cat", "fine"]]);
        assert_eq!(out.rows[1].line, 3);
    }

    #[test]
    fn unterminated_quote_on_last_line() {
        let out = scan_rows("h\nv\n\"open");
        assert_eq!(dropped(&out), vec![(3, DropReason::Unterminated)]);
        assert_eq!(fields(&out), vec![vec!["h"], vec!["v"]]);
    }

    #[test]
    fn recovery_rescans_rows_a_broken_quote_swallowed() {
        // Ann's quote is closed by Bob's opening quote, and Bob's closing
        // quote then runs to the end of the text.
        let out = scan_rows("Name\tBio\nAnn\t\"x\nBob\t\"y\"\nCat\tz");
        assert_eq!(dropped(&out), vec![(2, DropReason::Unterminated)]);
        assert_eq!(fields(&out), vec![vec!["Name", "Bio"], vec!["Bob", "\"y\""], vec!["Cat", "z"]]);
        assert_eq!(out.rows[1].line, 3);
        assert_eq!(out.rows[2].line, 4);
    }

    #[test]
    fn quote_glued_across_rows_is_dropped_not_merged() {
        let out = scan_rows("Name\tBio\nAnn\t\"never\nBob\t\"ok\nCat\tfine");
        assert_eq!(
            dropped(&out),
            vec![(2, DropReason::StrayQuote), (3, DropReason::Unterminated)]
        );
        assert_eq!(fields(&out), vec![vec!["Name", "Bio"], vec!["Cat", "fine"]]);
        assert_eq!(out.rows[1].line, 4);
        assert!(out.rows.iter().all(|r| r.fields.iter().all(|f| !f.contains('\n'))));
    }

    #[test]
    fn multiline_cell_with_doubled_quotes_is_kept() {
        let out = scan_rows("h\n\"say \"\"hi\"\"\nbye\"\nnext");
        assert!(out.dropped.is_empty());
        assert_eq!(fields(&out), vec![vec!["h"], vec!["\"say \"\"hi\"\"\nbye\""], vec!["next"]]);
        assert_eq!(out.rows[2].line, 4);
    }

    #[test]
    fn quoted_cells_are_recognised() {
        assert!(is_quoted_cell("\"a\nb\""));
        assert!(is_quoted_cell("\"a\"\"\nb\""));
        assert!(!is_quoted_cell("\"a\nb\"c"));
        assert!(!is_quoted_cell("\"a\n\"b\""));
        assert!(!is_quoted_cell("\""));
    }

    #[test]
    fn unquote_strips_one_layer_and_unescapes() {
        assert_eq!(unquote_cell("\"She said \"\"hi\"\"\""), "She said \"hi\"");
        assert_eq!(unquote_cell("plain"), "plain");
        assert_eq!(unquote_cell("\""), "\"");
        assert_eq!(unquote_cell("\"\""), "");
        assert_eq!(unquote_cell("5\" tall"), "5\" tall");
    }

    proptest! {
        #[test]
        fn scanner_never_panics_and_lines_increase(text in "[a-c\"\t\n\r ]{0,64}") {
            let out = scan_rows(&text);
            let lines: Vec<usize> = out.rows.iter().map(|r| r.line).collect();
            let mut sorted = lines.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(lines, sorted);
        }
    }
}

//! Per-byte detection state machine.
//!
//! Mirrors how a lenient CSV reader (lazy quotes, `#` comments) splits the
//! input into records, but only keeps what is needed to decide whether the
//! records line up: the quote mode of the current field and the number of
//! fields of every data line.

use super::verdict::ScanSummary;
use super::window::{Cursor, Step};

const QUOTE: u8 = b'"';
const COMMENT: u8 = b'#';

/// Quoting of the field currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum QuoteMode {
    #[default]
    Unquoted,
    /// Unquoted field that may contain bare quotes (lazy quoting).
    Inferred,
    /// Field opened by a quote; delimiters and newlines are content.
    Explicit,
}

/// Neighbourhood of the byte being processed.
#[derive(Debug, Clone, Copy)]
struct Lookahead {
    next: Option<u8>,
    next_is_terminator: bool,
}

/// Scan state of a single detection run.
#[derive(Debug)]
pub struct DetectState {
    delimiter: u8,
    line_limit: Option<usize>,

    line_idx: usize,
    line_size: usize,
    quote_count: usize,
    quote: QuoteMode,
    in_comment: bool,
    saw_data: bool,
    /// Field count per data line. The current line has an entry iff it has data.
    record_fields: Vec<usize>,

    complete: bool,
    invalid: bool,
}

impl DetectState {
    /// Create a state for `delimiter`. With a line limit the scan completes
    /// once that many data lines have been finalized.
    pub fn new(delimiter: u8, line_limit: Option<usize>) -> Self {
        Self {
            delimiter,
            line_limit,
            line_idx: 0,
            line_size: 0,
            quote_count: 0,
            quote: QuoteMode::Unquoted,
            in_comment: false,
            saw_data: false,
            record_fields: Vec::new(),
            complete: false,
            invalid: false,
        }
    }

    /// Process the byte under `cursor`.
    pub fn read(&mut self, cursor: Cursor<'_>) -> Step {
        if self.complete {
            return Step::Stop;
        }

        let cur = cursor.current();
        let prev = cursor.prev();
        let next = cursor.peek(1);
        let next_next = cursor.peek(2);

        let next_is_terminator = next.is_none()
            || (next == Some(b'\n') && cur != b'\r')
            || (next == Some(b'\r') && next_next == Some(b'\n'))
            || next == Some(self.delimiter);

        let is_lf = cur == b'\n' && prev != Some(b'\r');
        let is_crlf = cur == b'\r' && next == Some(b'\n');

        // a reference reader drops a dangling final carriage return
        if cur == b'\r' && prev == Some(b'\n') && next.is_none() {
            return Step::Next;
        }

        if is_lf || is_crlf {
            self.end_line();
            return if is_crlf { Step::Skip(1) } else { Step::Next };
        }

        self.line_size += 1;
        let ahead = Lookahead {
            next,
            next_is_terminator,
        };
        if cur == QUOTE {
            return self.read_quote(ahead);
        }
        if !self.in_comment {
            self.read_data(cur, ahead);
        }
        Step::Next
    }

    /// Finalize the last line and hand the results to the evaluator.
    ///
    /// Input usually lacks a trailing newline, so the open line is counted
    /// like a terminated one, even when it ends inside a quoted field.
    pub fn finish(mut self) -> ScanSummary {
        self.reset_line();
        ScanSummary {
            invalid: self.invalid,
            record_fields: self.record_fields,
            lines: self.line_idx,
        }
    }

    fn read_quote(&mut self, ahead: Lookahead) -> Step {
        if self.in_comment {
            return Step::Next;
        }

        self.start_data_line();

        match self.quote {
            QuoteMode::Explicit => {
                if ahead.next == Some(QUOTE) {
                    // escaped quote, consume both
                    return Step::Skip(1);
                }
                if !ahead.next_is_terminator {
                    // not the end of the field, so this quote is content
                    return Step::Next;
                }
                self.quote = QuoteMode::Unquoted;
                self.quote_count += 1;
            }
            QuoteMode::Inferred => {
                if ahead.next == Some(self.delimiter) {
                    // counts as both the inferred opening quote and this one
                    self.quote = QuoteMode::Unquoted;
                    self.quote_count += 2;
                }
            }
            QuoteMode::Unquoted => {
                self.quote = QuoteMode::Explicit;
                self.quote_count += 1;
            }
        }

        if self.quote != QuoteMode::Unquoted {
            return Step::Next;
        }

        // a closed quote must end its field, e.g. `"a"b,` is malformed
        if !ahead.next_is_terminator {
            self.mark_invalid();
        }
        Step::Next
    }

    fn read_data(&mut self, cur: u8, ahead: Lookahead) {
        if cur == COMMENT && self.quote == QuoteMode::Unquoted {
            self.in_comment = true;
        } else if cur == self.delimiter {
            if self.quote != QuoteMode::Explicit {
                self.new_field(ahead);
            }
        } else if self.start_data_line() {
            self.quote = QuoteMode::Inferred;
        }
    }

    fn new_field(&mut self, ahead: Lookahead) {
        // 0 quotes: unquoted, 2: balanced, 1: a quote was never closed
        if self.quote_count == 1 {
            self.mark_invalid();
        }

        self.quote = QuoteMode::Unquoted;
        self.quote_count = 0;
        self.increment_fields();

        if ahead.next != Some(QUOTE) && !ahead.next_is_terminator {
            self.quote = QuoteMode::Inferred;
        }
    }

    fn increment_fields(&mut self) {
        self.start_data_line();
        if let Some(fields) = self.record_fields.last_mut() {
            // the first delimiter accounts for the fields on both of its sides
            *fields = (*fields).max(1) + 1;
        }
    }

    /// Mark the current line as data. Returns true if this is the first data
    /// byte of the line.
    fn start_data_line(&mut self) -> bool {
        self.saw_data = true;
        if self.line_has_data() {
            return false;
        }
        self.record_fields.push(0);
        true
    }

    fn line_has_data(&self) -> bool {
        self.record_fields.len() > self.line_idx
    }

    fn end_line(&mut self) {
        if self.quote == QuoteMode::Explicit {
            // newlines inside quotes are content
            return;
        }

        if let Some(limit) = self.line_limit
            && self.line_idx >= limit
        {
            tracing::trace!(lines = self.line_idx, "line limit reached");
            self.complete = true;
            return;
        }

        if !self.in_comment && self.line_size > 0 && !self.line_has_data() {
            self.mark_invalid();
            return;
        }

        self.reset_line();
    }

    fn reset_line(&mut self) {
        self.quote = QuoteMode::Unquoted;
        self.quote_count = 0;

        if self.saw_data {
            self.line_idx += 1;
        }

        self.saw_data = false;
        self.line_size = 0;
        self.in_comment = false;
    }

    fn mark_invalid(&mut self) {
        tracing::trace!(line = self.line_idx, "inconsistent record");
        self.complete = true;
        self.invalid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::window::SlidingWindow;

    fn scan(input: &str, line_limit: Option<usize>) -> ScanSummary {
        let mut state = DetectState::new(b',', line_limit);
        let mut window = SlidingWindow::with_sizes(input.as_bytes(), 0, 0, 0);
        window.iterate(|cursor| state.read(cursor)).unwrap();
        state.finish()
    }

    #[test]
    fn test_counts_fields_per_line() {
        let summary = scan("a,b,c\n1,2\n", None);
        assert!(!summary.invalid);
        assert_eq!(summary.record_fields, vec![3, 2]);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn test_comment_and_empty_lines_are_not_records() {
        let summary = scan("#x,y\n\na,b\n#\"\n1,2", None);
        assert!(!summary.invalid);
        assert_eq!(summary.record_fields, vec![2, 2]);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn test_line_without_delimiter_has_no_fields() {
        let summary = scan("abc\n1,2", None);
        assert_eq!(summary.record_fields, vec![0, 2]);
    }

    #[test]
    fn test_quoted_delimiters_and_newlines() {
        let summary = scan("\"a,\nb\",c\n1,2", None);
        assert!(!summary.invalid);
        assert_eq!(summary.record_fields, vec![2, 2]);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let summary = scan("a,b\r\n1,2\r\n", None);
        assert_eq!(summary.record_fields, vec![2, 2]);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn test_unclosed_quote_swallows_rest_of_input() {
        let summary = scan(",\",\n,,\n", None);
        assert!(!summary.invalid);
        assert_eq!(summary.record_fields, vec![2]);
        assert_eq!(summary.lines, 1);
    }

    #[test]
    fn test_quote_before_content_does_not_close() {
        let summary = scan("a,b\n\"x\"y,z", None);
        assert_eq!(summary.record_fields, vec![2, 0]);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn test_escaped_quotes_stay_in_field() {
        let summary = scan("0,\"a \"\"b\"\" c\",0\n0,0,0", None);
        assert!(!summary.invalid);
        assert_eq!(summary.record_fields, vec![3, 3]);
    }

    #[test]
    fn test_content_line_without_record_is_invalid() {
        let mut state = DetectState::new(b',', None);
        state.line_size = 3;
        state.end_line();
        assert!(state.invalid);
        assert!(state.complete);
    }

    #[test]
    fn test_line_limit_completes_scan() {
        let mut state = DetectState::new(b',', Some(2));
        let mut window = SlidingWindow::with_sizes(&b"a,b\n1,2\n3,4\n5\n"[..], 0, 0, 0);
        window.iterate(|cursor| state.read(cursor)).unwrap();
        assert!(state.complete);

        let summary = state.finish();
        assert!(!summary.invalid);
        // the line that hit the limit is still counted, the one after it is not
        assert_eq!(summary.record_fields, vec![2, 2, 2]);
    }

    #[test]
    fn test_stops_after_complete() {
        let mut state = DetectState::new(b',', Some(0));
        let mut window = SlidingWindow::with_sizes(&b"\nabc"[..], 0, 0, 0);
        let mut visits = 0;
        window
            .iterate(|cursor| {
                visits += 1;
                state.read(cursor)
            })
            .unwrap();
        // the newline completes, the next byte sees the flag and stops
        assert_eq!(visits, 2);
    }
}

//! Final decision over the per-line field counts of a scan.

/// What a finished scan observed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// A record broke the quoting or field rules.
    pub invalid: bool,
    /// Field count of every data line, in order. Comment and empty lines
    /// have no entry.
    pub record_fields: Vec<usize>,
    /// Number of finalized data lines.
    pub lines: usize,
}

impl ScanSummary {
    /// Field count shared by the data lines, or None if they disagree or
    /// no line has a delimiter.
    pub fn uniform_field_count(&self) -> Option<usize> {
        let reference = self.record_fields.iter().copied().find(|&f| f > 0)?;
        self.record_fields
            .iter()
            .all(|&f| f == reference)
            .then_some(reference)
    }

    /// Returns true if the scanned prefix looks like a delimiter-separated
    /// table: consistent records, at least two columns and at least two rows.
    pub fn is_delimited(&self) -> bool {
        if self.invalid {
            return false;
        }
        matches!(self.uniform_field_count(), Some(fields) if fields > 1) && self.lines > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(record_fields: Vec<usize>, lines: usize) -> ScanSummary {
        ScanSummary {
            invalid: false,
            record_fields,
            lines,
        }
    }

    #[test]
    fn test_uniform_rows() {
        assert!(summary(vec![3, 3, 3], 3).is_delimited());
        assert_eq!(summary(vec![3, 3, 3], 3).uniform_field_count(), Some(3));
    }

    #[test]
    fn test_mismatched_rows() {
        assert!(!summary(vec![3, 2], 2).is_delimited());
        assert_eq!(summary(vec![3, 2], 2).uniform_field_count(), None);
    }

    #[test]
    fn test_line_without_delimiter_breaks_uniformity() {
        assert!(!summary(vec![2, 0, 2], 3).is_delimited());
        assert!(!summary(vec![0, 0], 2).is_delimited());
    }

    #[test]
    fn test_needs_two_rows_and_two_columns() {
        assert!(!summary(vec![3], 1).is_delimited());
        assert!(!summary(vec![], 0).is_delimited());
    }

    #[test]
    fn test_invalid_wins() {
        let mut s = summary(vec![2, 2], 2);
        s.invalid = true;
        assert!(!s.is_delimited());
    }
}

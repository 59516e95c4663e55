//! Sample limits and preparation of the byte prefix handed to the scanner.

/// Number of data lines validated when no byte limit is set.
pub const DEFAULT_LINE_LIMIT: usize = 10;

/// How much of the input a detection run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLimit {
    /// No byte limit; validation stops after this many data lines.
    Lines(usize),
    /// Only the first N bytes are considered, minus any incomplete last line.
    /// No line cap applies since the byte limit already bounds the work.
    Bytes(usize),
}

impl Default for SampleLimit {
    fn default() -> Self {
        SampleLimit::Lines(DEFAULT_LINE_LIMIT)
    }
}

impl SampleLimit {
    /// Map a read limit (0 = unlimited) to a sample limit.
    pub fn from_read_limit(limit: usize) -> Self {
        if limit == 0 {
            SampleLimit::default()
        } else {
            SampleLimit::Bytes(limit)
        }
    }

    /// Returns the line cap, or None when the byte limit bounds the scan.
    pub fn line_limit(&self) -> Option<usize> {
        match self {
            SampleLimit::Lines(n) => Some(*n),
            SampleLimit::Bytes(_) => None,
        }
    }

    /// Returns the byte limit, or None when reading is unbounded.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            SampleLimit::Bytes(n) => Some(*n),
            SampleLimit::Lines(_) => None,
        }
    }
}

/// Drop the last, possibly incomplete, line from `data`.
///
/// Callers that read at most `limit` bytes usually cut a record in half.
/// When `data` is at least `limit` bytes long, everything from the last
/// line feed onwards is removed. A zero limit leaves `data` untouched.
pub fn drop_last_line(data: &[u8], limit: usize) -> &[u8] {
    if limit == 0 || data.len() < limit {
        return data;
    }
    // index 0 is never a cut point
    match data.iter().skip(1).rposition(|&b| b == b'\n') {
        Some(i) => &data[..=i],
        None => data,
    }
}

/// Prepare `data` for scanning: drop the incomplete last line, then cap the
/// result to `limit` bytes. A zero limit returns `data` unchanged.
pub fn prepare(data: &[u8], limit: usize) -> &[u8] {
    let trimmed = drop_last_line(data, limit);
    if limit > 0 && trimmed.len() > limit {
        &trimmed[..limit]
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_last_line() {
        let cases: &[(&str, usize, &str)] = &[
            ("", 0, ""),
            ("", 1, ""),
            ("å", 2, "å"),
            ("\n", 0, "\n"),
            ("\n", 1, "\n"),
            ("\n\n", 1, "\n"),
            ("\n\n", 3, "\n\n"),
            ("a\n\n", 3, "a\n"),
            ("\na\n", 3, "\na"),
            ("å\n\n", 5, "å\n\n"),
            ("\nå\n", 5, "\nå\n"),
        ];

        for (i, (raw, limit, want)) in cases.iter().enumerate() {
            let got = drop_last_line(raw.as_bytes(), *limit);
            assert_eq!(got, want.as_bytes(), "case {i}: {raw:?} limit {limit}");
        }
    }

    #[test]
    fn test_drop_last_line_without_newline() {
        assert_eq!(drop_last_line(b"a,b,c", 3), b"a,b,c");
    }

    #[test]
    fn test_prepare() {
        assert_eq!(prepare(b"a,b,c\n1,2,3", 0), b"a,b,c\n1,2,3");
        assert_eq!(prepare(b"a,b,c\n1,2,3", 5), b"a,b,c");
        assert_eq!(
            prepare(b"a,b,c\na,b,c\na,b,c\n1,2", 20),
            b"a,b,c\na,b,c\na,b,c"
        );
    }

    #[test]
    fn test_sample_limit() {
        assert_eq!(SampleLimit::default(), SampleLimit::Lines(DEFAULT_LINE_LIMIT));
        assert_eq!(SampleLimit::from_read_limit(0).line_limit(), Some(10));
        assert_eq!(SampleLimit::from_read_limit(0).bytes(), None);

        let limited = SampleLimit::from_read_limit(3072);
        assert_eq!(limited, SampleLimit::Bytes(3072));
        assert_eq!(limited.line_limit(), None);
        assert_eq!(limited.bytes(), Some(3072));
    }
}

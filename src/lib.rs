//! csv-probe: streaming CSV/TSV content sniffer
//!
//! Decides from a bounded prefix of raw bytes whether the data is
//! comma- or tab-separated text that a lenient CSV reader (lazy quotes,
//! `#` comments) would accept, without buffering the input or parsing
//! fields into values. Meant to sit next to other signature matchers in a
//! content-type detection pipeline.
//!
//! # Quick Start
//!
//! ```
//! use csv_probe::{detect_format, is_csv, is_tsv, Format};
//!
//! assert!(is_csv(b"a,b,c\n1,2,3", 0));
//! assert!(is_tsv(b"a\tb\tc\n1\t2\t3", 0));
//! assert_eq!(detect_format(b"a,b\n1,2\n", 0), Some(Format::Csv));
//! ```
//!
//! # Readers and files
//!
//! ```no_run
//! use csv_probe::Detector;
//!
//! let mut detector = Detector::tsv();
//! detector.read_limit(3072);
//!
//! let is_tsv = detector.detect_path("data.tsv").unwrap();
//! println!("TSV: {is_tsv}");
//! ```
//!
//! # Limits
//!
//! A `limit` of 0 means no byte limit, in which case only the first
//! [`DEFAULT_LINE_LIMIT`] data lines are validated. A positive limit caps the
//! input at that many bytes, drops the incomplete last line and validates
//! every remaining line.
//!
//! A prefix is accepted when every data line has the same number of fields,
//! there are at least two fields and at least two data lines. Lines starting
//! with `#` are comments and do not count.

mod detector;
mod error;
mod format;
mod sample;
mod scan;

pub use detector::{Detector, delimiter_from_char};
pub use error::{DetectError, Result};
pub use format::Format;
pub use sample::{DEFAULT_LINE_LIMIT, SampleLimit, drop_last_line};

/// Returns true if `data` looks like text separated by `delimiter`.
///
/// `limit` is the number of bytes the caller read (0 = unlimited); see the
/// crate docs.
pub fn detect(data: &[u8], delimiter: u8, limit: usize) -> bool {
    let mut detector = Detector::new(delimiter);
    detector.read_limit(limit);
    detector.detect_bytes(data)
}

/// Returns true if `data` looks like comma-separated values.
pub fn is_csv(data: &[u8], limit: usize) -> bool {
    detect(data, Format::Csv.delimiter(), limit)
}

/// Returns true if `data` looks like tab-separated values.
pub fn is_tsv(data: &[u8], limit: usize) -> bool {
    detect(data, Format::Tsv.delimiter(), limit)
}

/// Returns the first format `data` matches, trying CSV before TSV.
pub fn detect_format(data: &[u8], limit: usize) -> Option<Format> {
    Format::ALL
        .into_iter()
        .find(|format| detect(data, format.delimiter(), limit))
}

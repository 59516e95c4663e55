//! Detector builder and detection entry points.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DetectError, Result};
use crate::sample::{SampleLimit, prepare};
use crate::scan::state::DetectState;
use crate::scan::window::{
    DEFAULT_CHUNK_SIZE, DEFAULT_LOOK_AHEAD, DEFAULT_LOOK_BEHIND, SlidingWindow,
};

/// Streaming detector for delimiter-separated text.
///
/// # Example
///
/// ```
/// use csv_probe::Detector;
///
/// let mut detector = Detector::csv();
/// detector.read_limit(3072);
///
/// assert!(detector.detect_bytes(b"name,age\nAlice,30\nBob,25\n"));
/// assert!(!detector.detect_bytes(b"just some text\n"));
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    /// Field delimiter.
    delimiter: u8,
    /// Bytes of input considered, 0 for unlimited.
    read_limit: usize,
    /// Bytes requested from the source per read.
    chunk_size: usize,
}

impl Default for Detector {
    fn default() -> Self {
        Self::csv()
    }
}

impl Detector {
    /// Create a detector for the given delimiter.
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            read_limit: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a comma-separated values detector.
    pub fn csv() -> Self {
        Self::new(b',')
    }

    /// Create a tab-separated values detector.
    pub fn tsv() -> Self {
        Self::new(b'\t')
    }

    /// Only consider the first `limit` bytes of input (0 = unlimited).
    ///
    /// Without a limit only the first lines are validated; with one, the
    /// incomplete last line of the prefix is ignored and every complete line
    /// is validated.
    pub fn read_limit(&mut self, limit: usize) -> &mut Self {
        self.read_limit = limit;
        self
    }

    /// Set the number of bytes read from the source at a time.
    pub fn chunk_size(&mut self, chunk_size: usize) -> &mut Self {
        self.chunk_size = chunk_size;
        self
    }

    /// The configured delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Detect from an in-memory prefix. Never fails.
    pub fn detect_bytes(&self, data: &[u8]) -> bool {
        let limit = SampleLimit::from_read_limit(self.read_limit);
        let sample = prepare(data, self.read_limit);
        self.scan(sample, limit).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "detection failed");
            false
        })
    }

    /// Detect from a reader.
    ///
    /// With a read limit at most that many bytes are read before scanning.
    /// Without one the reader is streamed through the scanner and reading
    /// stops as soon as the verdict is known.
    pub fn detect_reader<R: Read>(&self, reader: R) -> Result<bool> {
        let limit = SampleLimit::from_read_limit(self.read_limit);
        match limit.bytes() {
            Some(n) => {
                // grows with what is actually read, the limit may be huge
                let mut buffer = Vec::new();
                reader.take(n as u64).read_to_end(&mut buffer)?;
                self.scan(prepare(&buffer, n), limit)
            }
            None => self.scan(reader, limit),
        }
    }

    /// Detect from the file at `path`.
    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let file = File::open(path.as_ref())?;
        self.detect_reader(file)
    }

    fn scan<R: Read>(&self, reader: R, limit: SampleLimit) -> Result<bool> {
        let mut state = DetectState::new(self.delimiter, limit.line_limit());
        let mut window = SlidingWindow::with_sizes(
            reader,
            self.chunk_size,
            DEFAULT_LOOK_AHEAD,
            DEFAULT_LOOK_BEHIND,
        );
        window.iterate(|cursor| state.read(cursor))?;

        let summary = state.finish();
        let detected = summary.is_delimited();
        tracing::debug!(
            delimiter = ?(self.delimiter as char),
            lines = summary.lines,
            invalid = summary.invalid,
            detected,
            "scan finished"
        );
        Ok(detected)
    }
}

/// Convert a user-supplied delimiter character into a byte.
///
/// Delimiters must be single ASCII characters other than the quote, the
/// comment marker and line endings.
pub fn delimiter_from_char(c: char) -> Result<u8> {
    if !c.is_ascii() {
        return Err(DetectError::InvalidConfig(format!(
            "delimiter must be a single ASCII character, got {c:?}"
        )));
    }
    match c {
        '"' | '#' | '\r' | '\n' => Err(DetectError::InvalidConfig(format!(
            "{c:?} cannot be used as a delimiter"
        ))),
        _ => Ok(c as u8),
    }
}

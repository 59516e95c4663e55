use std::fmt;

use crate::detector::Detector;

/// Delimiter-separated formats recognized by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl Format {
    /// All formats, in the order they are tried by [`crate::detect_format`].
    pub const ALL: [Format; 2] = [Format::Csv, Format::Tsv];

    /// Field delimiter of the format.
    pub const fn delimiter(self) -> u8 {
        match self {
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }

    /// MIME type of the format.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Format::Csv => "text/csv",
            Format::Tsv => "text/tab-separated-values",
        }
    }

    /// Conventional file extension, including the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Format::Csv => ".csv",
            Format::Tsv => ".tsv",
        }
    }

    /// A detector for this format.
    pub fn detector(self) -> Detector {
        Detector::new(self.delimiter())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Tsv => write!(f, "TSV"),
        }
    }
}

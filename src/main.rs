//! csv-probe CLI - CSV/TSV content sniffer

use clap::Parser;
use csv_probe::{Detector, Format, delimiter_from_char};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Streaming CSV/TSV content sniffer.
///
/// Reports whether each file looks like delimiter-separated text,
/// reading only a bounded prefix of it.
#[derive(Parser, Debug)]
#[command(name = "csv-probe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) to probe
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Format to look for
    #[arg(short = 'f', long, default_value = "auto")]
    format: FormatArg,

    /// Look for a custom delimiter (single character, overrides --format)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Number of bytes to consider. 0 reads without a byte bound and
    /// validates the first lines only
    #[arg(short = 'l', long, default_value = "3072")]
    limit: usize,

    /// Output format: text (default) or json
    #[arg(short = 'o', long, default_value = "text")]
    output: OutputFormat,

    /// Log scan details to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    Auto,
    Csv,
    Tsv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// What was found in a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Format(Format),
    Delimiter(u8),
    Unknown,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let custom = match args.delimiter.map(delimiter_from_char).transpose() {
        Ok(custom) => custom,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let results: Vec<_> = args
        .files
        .par_iter()
        .map(|file| probe_file(file, &args, custom))
        .collect();

    let mut exit_code = ExitCode::SUCCESS;

    for (file, result) in args.files.iter().zip(results) {
        match result {
            Ok(probe) => match args.output {
                OutputFormat::Text => print_text_output(file, probe),
                OutputFormat::Json => print_json_output(file, probe),
            },
            Err(e) => {
                tracing::warn!(file = %file.display(), "probe failed");
                eprintln!("Error processing {}: {}", file.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn probe_file(path: &Path, args: &Args, custom: Option<u8>) -> csv_probe::Result<Probe> {
    if let Some(delimiter) = custom {
        return probe_with(path, Detector::new(delimiter), args.limit)
            .map(|found| if found { Probe::Delimiter(delimiter) } else { Probe::Unknown });
    }

    let candidates: &[Format] = match args.format {
        FormatArg::Auto => &Format::ALL,
        FormatArg::Csv => &[Format::Csv],
        FormatArg::Tsv => &[Format::Tsv],
    };

    for &format in candidates {
        if probe_with(path, format.detector(), args.limit)? {
            return Ok(Probe::Format(format));
        }
    }
    Ok(Probe::Unknown)
}

fn probe_with(path: &Path, mut detector: Detector, limit: usize) -> csv_probe::Result<bool> {
    detector.read_limit(limit);
    detector.detect_path(path)
}

fn print_text_output(path: &Path, probe: Probe) {
    match probe {
        Probe::Format(format) => {
            println!("{}: {} ({})", path.display(), format, format.mime_type());
        }
        Probe::Delimiter(d) => {
            println!("{}: delimited by {:?}", path.display(), d as char);
        }
        Probe::Unknown => println!("{}: not delimited", path.display()),
    }
}

fn print_json_output(path: &Path, probe: Probe) {
    let file = json_escape(&path.display().to_string());
    match probe {
        Probe::Format(format) => println!(
            r#"{{"file":"{}","detected":true,"format":"{}","mime_type":"{}","delimiter":"{}"}}"#,
            file,
            format,
            format.mime_type(),
            json_escape(&(format.delimiter() as char).to_string()),
        ),
        Probe::Delimiter(d) => println!(
            r#"{{"file":"{}","detected":true,"format":null,"mime_type":null,"delimiter":"{}"}}"#,
            file,
            json_escape(&(d as char).to_string()),
        ),
        Probe::Unknown => println!(
            r#"{{"file":"{}","detected":false,"format":null,"mime_type":null,"delimiter":null}}"#,
            file
        ),
    }
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

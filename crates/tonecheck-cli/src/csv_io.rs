//! CSV ingestion and export
//!
//! Input is comma-separated with double-quote escaping and a mandatory header line.
//! Blank lines and whitespace-only records are skipped. Rows are numbered from 1 in file
//! order. Output repeats the original columns in input order followed by the analysis
//! columns, with every string field quoted.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tonecheck_classifiers::{is_numeric_column, BatchReport, BatchRow};
use tonecheck_core::{Error, InputError, Result};
use tracing::debug;

/// Read `path` into batch rows, refusing files larger than `max_bytes` (0 = no limit)
pub fn read_rows(path: &Path, max_bytes: u64) -> Result<Vec<BatchRow>> {
    let bytes = fs::metadata(path)?.len();
    if max_bytes > 0 && bytes > max_bytes {
        return Err(InputError::FileTooLarge {
            bytes,
            limit: max_bytes,
        }
        .into());
    }

    let rows = parse_rows(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), bytes, rows = rows.len(), "read csv");
    Ok(rows)
}

/// Parse CSV text from any reader
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<BatchRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(InputError::MissingHeader.into());
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let values: Vec<&str> = record.iter().collect();
        rows.push(BatchRow::from_record(rows.len() + 1, &headers, &values));
    }

    Ok(rows)
}

fn csv_error(e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::malformed(format!("{other:?}")),
        }
    } else {
        Error::malformed(e.to_string())
    }
}

/// Write the annotated rows of `report` as CSV.
///
/// Header names and string values are always quoted, even when they look numeric; the
/// integer analysis columns are written bare.
pub fn write_report<W: Write>(writer: W, report: &BatchReport) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let header = report.header();
    let numeric: Vec<bool> = header.iter().map(|name| is_numeric_column(name)).collect();
    csv_writer
        .write_record(header.iter().map(|name| quoted(name)))
        .map_err(csv_error)?;
    for record in report.records() {
        let fields = record.into_iter().zip(&numeric).map(|(value, numeric)| {
            if *numeric {
                value
            } else {
                quoted(&value)
            }
        });
        csv_writer.write_record(fields).map_err(csv_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn write_report_file(path: &Path, report: &BatchReport) -> Result<()> {
    let file = File::create(path)?;
    write_report(BufWriter::new(file), report)?;
    debug!(path = %path.display(), rows = report.rows.len(), "wrote csv");
    Ok(())
}

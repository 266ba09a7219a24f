//! Loading a [`Dataset`] from a headered CSV file (§4.G).

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::debug;

use crate::datasets::Dataset;
use crate::types::{Error, Result};

/// Reads a headered CSV file into a [`Dataset`].
///
/// The first record is taken as the variable names; every subsequent record
/// is a row of categorical values, taken verbatim (whitespace-trimmed, never
/// parsed as numbers or booleans).
///
/// # Errors
///
/// Returns [`Error::MissingHeader`] if the file has no header row,
/// [`Error::Csv`] if a record cannot be parsed, and otherwise propagates
/// [`Dataset::new`]'s errors (duplicate header names, ragged rows).
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    from_reader(reader)
}

fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let header: Vec<String> = reader
        .headers()
        .map_err(Error::from)?
        .iter()
        .map(str::to_owned)
        .collect();
    if header.is_empty() {
        return Err(Error::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.into_records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect::<Vec<String>>());
    }

    debug!(
        "Read {} columns and {} rows from CSV.",
        header.len(),
        rows.len()
    );
    Dataset::new(header, rows)
}

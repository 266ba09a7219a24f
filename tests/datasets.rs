//! Black-box coverage of the variable catalog and count oracle (§4.A),
//! including CSV round-trip fidelity against a fixture read from disk.

use std::io::Write;

use bayes_hub::{io, Dataset, Error};
use tempfile::NamedTempFile;

fn write_fixture(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn s1_marginal_counts_match_a_direct_scan() {
    let file = write_fixture(&["A", "y", "y", "y", "n", "n"]);
    let data = io::read_csv(file.path()).unwrap();
    assert_eq!(data.nrows(), 5);
    assert_eq!(data.domain("A").unwrap(), &["y", "n"]);
    assert_eq!(data.count(&["A"], &["y"]).unwrap(), 3);
    assert_eq!(data.count(&["A"], &["n"]).unwrap(), 2);
}

#[test]
fn csv_round_trip_preserves_first_seen_domain_order() {
    let file = write_fixture(&[
        "A,B",
        "n,y",
        "y,y",
        "y,n",
        "n,y",
    ]);
    let data = io::read_csv(file.path()).unwrap();
    // A's first row is "n", so the domain is first-seen ordered [n, y].
    assert_eq!(data.domain("A").unwrap(), &["n", "y"]);
    assert_eq!(data.domain("B").unwrap(), &["y", "n"]);
    assert_eq!(data.count(&["A", "B"], &["y", "y"]).unwrap(), 1);
    assert_eq!(data.count(&["A", "B"], &["n", "y"]).unwrap(), 2);
    assert_eq!(data.count(&[], &[]).unwrap(), 4);
}

#[test]
fn whitespace_around_fields_is_trimmed() {
    let file = write_fixture(&["A, B", " y , y ", "n,n"]);
    let data = io::read_csv(file.path()).unwrap();
    assert_eq!(data.labels().iter().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(data.count(&["A"], &["y"]).unwrap(), 1);
}

#[test]
fn missing_csv_header_is_an_error() {
    let file = NamedTempFile::new().unwrap();
    let err = io::read_csv(file.path()).unwrap_err();
    assert!(matches!(err, Error::MissingHeader));
}

#[test]
fn unreadable_path_is_an_io_error() {
    let err = io::read_csv("/nonexistent/path/does/not/exist.csv").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn ragged_csv_row_is_a_csv_error() {
    let file = write_fixture(&["A,B", "y"]);
    let err = io::read_csv(file.path()).unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
}

#[test]
fn duplicate_header_name_is_an_error() {
    let err = Dataset::new(
        vec!["A".to_string(), "A".to_string()],
        Vec::<Vec<String>>::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateVariable(name) if name == "A"));
}

#[test]
fn arity_mismatch_between_vars_and_vals_is_an_error() {
    let data = Dataset::new(
        vec!["A".to_string()],
        vec![vec!["y".to_string()]],
    )
    .unwrap();
    let err = data.count(&["A", "B"], &["y"]).unwrap_err();
    assert!(matches!(err, Error::ArityMismatch(2, 1)));
}

use std::sync::Arc;

use thiserror::Error;

/// The error type for this crate.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// An error related to I/O operations.
    #[error(transparent)]
    Io(Arc<std::io::Error>),
    /// An error related to CSV parsing.
    #[error(transparent)]
    Csv(Arc<csv::Error>),
    /// An error indicating that a CSV file is missing its header row.
    #[error("CSV file must have a header row")]
    MissingHeader,
    /// An error indicating that the CSV header has a duplicate variable name.
    #[error("CSV header contains duplicate variable `{0}`")]
    DuplicateVariable(String),
    /// An error indicating a row has a different field count than the header.
    #[error("row {0} has {1} fields, expected {2}")]
    RaggedRow(usize, usize, usize),
    /// An error indicating that `variables` and `values` have mismatched lengths.
    #[error("must provide the same number of variables and values: {0} != {1}")]
    ArityMismatch(usize, usize),
    /// An error indicating that a variable name is not a column of the dataset.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    /// An error indicating that a value does not belong to a variable's domain.
    #[error("value `{value}` is not in the domain of variable `{variable}`")]
    ValueNotInDomain {
        /// The offending variable.
        variable: String,
        /// The offending value.
        value: String,
    },
    /// An error indicating that the K2 metric was paired with a non-K2 algorithm.
    #[error("the K2 metric can only be used with the K2 algorithm")]
    K2MetricRequiresK2Algorithm,
    /// An error indicating that a node ordering is not a permutation of the
    /// dataset's columns.
    #[error("node ordering is not a permutation of the dataset's columns")]
    NotAPermutation,
    /// An error indicating that `max_parents` is out of range.
    #[error("invalid max_parents: {0}")]
    InvalidMaxParents(String),
    /// An error indicating that `visit_space` is out of range.
    #[error("invalid visit_space: {0}")]
    InvalidVisitSpace(String),
    /// An error indicating that an edge operation would create a cycle.
    #[error("adding edge `{0}` -> `{1}` would create a cycle")]
    WouldCreateCycle(String, String),
    /// An error indicating that the graph is not a DAG.
    #[error("graph must be a DAG")]
    NotADag,
    /// An error indicating that a factor lookup key does not match any row.
    #[error("no row in factor `{factor}` matches assignment {assignment:?}")]
    NoMatchingRow {
        /// The factor's variable set, for diagnostics.
        factor: String,
        /// The assignment that failed to match.
        assignment: Vec<String>,
    },
    /// An error indicating that variable elimination was asked to eliminate a
    /// variable that is not mentioned by any remaining factor.
    #[error("no factor mentions variable `{0}`")]
    NoFactorMentionsVariable(String),
    /// An error indicating that the "fraction of DAG space visited" progress
    /// indicator was asked for a node count beyond the tabulated Robinson
    /// sequence.
    #[error("the canonical Robinson sequence is not tabulated for {0} nodes")]
    RobinsonSequenceExhausted(usize),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(Arc::new(err))
    }
}

/// A specialized [`Result`] type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

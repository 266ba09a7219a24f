mod consts;
mod error;

pub use consts::{DEFAULT_ALPHA, EPSILON, robinson_dag_space};
pub use error::{Error, Result};

use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};

/// A type alias for a hash map with a fast, non-cryptographic hash function.
///
/// Iteration order follows insertion order, which keeps variable orderings
/// (e.g. `vars(F)` with `X` first) stable across runs.
pub type Map<K, V> = IndexMap<K, V, FxBuildHasher>;
/// A type alias for a hash set with a fast, non-cryptographic hash function.
pub type Set<T> = IndexSet<T, FxBuildHasher>;
/// A type alias for an ordered set of variable names.
pub type Labels = Set<String>;

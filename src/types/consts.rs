/// Epsilon value used for floating-point comparisons (factor normalisation,
/// joint/marginal consistency, score-monotonicity checks).
pub const EPSILON: f64 = 1e-8;

/// The default Laplace smoothing parameter applied to factors when none is
/// given explicitly.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// The canonical Robinson sequence: the number of labelled directed acyclic
/// graphs on `n` nodes, for `n` in `0..=14`.
///
/// Used as the denominator of the "fraction of DAG space visited" progress
/// indicator reported by the K2 search (§4.E).
const ROBINSON: [f64; 15] = [
    1.0,
    1.0,
    3.0,
    25.0,
    543.0,
    29281.0,
    3781503.0,
    1138779265.0,
    783702329343.0,
    1213442454842881.0,
    4175098976430598143.0,
    31603459396418917607425.0,
    521939651343829405020504063.0,
    18676600744432035186664816926721.0,
    1439428141044398334941790719839535103.0,
];

/// Returns the number of labelled directed acyclic graphs on `n` nodes,
/// looked up from the canonical Robinson sequence.
///
/// # Errors
///
/// Returns [`crate::types::Error::RobinsonSequenceExhausted`] if `n` exceeds
/// the tabulated range (14 nodes); the "fraction visited" indicator is a
/// diagnostic, not a correctness requirement, but a dataset with more than
/// 14 columns is ordinary valid input under §3's data model, so this must
/// not panic.
pub fn robinson_dag_space(n: usize) -> crate::types::Result<f64> {
    ROBINSON
        .get(n)
        .copied()
        .ok_or(crate::types::Error::RobinsonSequenceExhausted(n))
}

//! Scoring metrics for candidate DAGs, given one [`Factor`] per node,
//! parameterised by that node's parents under the DAG being scored (§4.D).

use itertools::Itertools;
use statrs::function::gamma::ln_gamma;

use crate::datasets::Dataset;
use crate::factors::Factor;
use crate::types::Result;

/// The entropy (log-likelihood) score: `-M * Σ_F Σ_a P_joint(a) * log2(P_cond(a))`.
///
/// Smaller is better.
pub fn entropy(dataset: &Dataset, factors: &[Factor], alpha: f64) -> Result<f64> {
    let m = dataset.nrows() as f64;
    let mut ll = 0.0;
    for f in factors {
        let cond = f.conditional_distribution(alpha)?;
        let joint = f.joint_distribution(alpha)?;
        // Both tables are built by iterating the same variables' domains in
        // the same order (§4.B), so they line up row-for-row.
        for ((_, p_cond), (_, p_joint)) in cond.iter().zip(joint.iter()) {
            ll += p_joint * p_cond.log2();
        }
    }
    Ok(-ll * m)
}

/// The model complexity term `k(G) = Σ_v (card(v) - 1) * Π_{y ∈ parents(v)} card(y)`.
pub fn complexity(dataset: &Dataset, factors: &[Factor]) -> Result<f64> {
    let mut k = 0.0;
    for f in factors {
        let card_x = dataset.card(f.x())? as f64;
        let mut qi = 1.0;
        for y in f.y() {
            qi *= dataset.card(y)? as f64;
        }
        k += (card_x - 1.0) * qi;
    }
    Ok(k)
}

/// `AIC = entropy + k`. Smaller is better.
pub fn aic(dataset: &Dataset, factors: &[Factor], alpha: f64) -> Result<f64> {
    Ok(entropy(dataset, factors, alpha)? + complexity(dataset, factors)?)
}

/// `MDL = entropy + (k / 2) * log2(M)`. Smaller is better.
pub fn mdl(dataset: &Dataset, factors: &[Factor], alpha: f64) -> Result<f64> {
    let m = dataset.nrows() as f64;
    Ok(entropy(dataset, factors, alpha)? + complexity(dataset, factors)? / 2.0 * m.log2())
}

/// The log-domain K2 score of a single node, given its parents:
///
/// `Σ_j [ lnΓ(card(v)) - lnΓ(N_{v,j} + card(v)) + Σ_k lnΓ(N_{v,j,k} + 1) ]`
///
/// where `j` ranges over parent configurations and `k` over `dom(v)`. Larger
/// is better. Computed in the log domain (§7.3/§9) since the direct
/// factorial-product form overflows `f64` for moderate datasets.
pub fn node_k2_log_score(dataset: &Dataset, var: &str, parents: &[String]) -> Result<f64> {
    let card_v = dataset.card(var)? as f64;
    let domain_v = dataset.domain(var)?.to_vec();
    let parent_domains: Vec<&[String]> = parents.iter().map(|p| dataset.domain(p)).collect::<Result<_>>()?;
    let parent_refs: Vec<&str> = parents.iter().map(String::as_str).collect();

    let mut total = 0.0;
    for combo in parent_domains.iter().map(|d| d.iter()).multi_cartesian_product() {
        let parent_vals: Vec<&str> = combo.iter().map(|s| s.as_str()).collect();

        let mut n_vj = 0.0;
        let mut sum_counts = 0.0;
        for val in &domain_v {
            let mut vars_q = vec![var];
            vars_q.extend(parent_refs.iter());
            let mut vals_q = vec![val.as_str()];
            vals_q.extend(parent_vals.iter());

            let count = dataset.count(&vars_q, &vals_q)? as f64;
            n_vj += count;
            sum_counts += ln_gamma(count + 1.0);
        }
        total += ln_gamma(card_v) - ln_gamma(n_vj + card_v) + sum_counts;
    }
    Ok(total)
}

/// The aggregate log-domain K2 score of a DAG: the sum of [`node_k2_log_score`]
/// over every factor. Larger is better.
pub fn k2_log_score(dataset: &Dataset, factors: &[Factor]) -> Result<f64> {
    let mut total = 0.0;
    for f in factors {
        total += node_k2_log_score(dataset, f.x(), f.y())?;
    }
    Ok(total)
}

use std::collections::BTreeSet;

use crate::datasets::Dataset;
use crate::factors::{Factor, Tensor};
use crate::graph::DiGraph;
use crate::types::{Error, Labels, Result};

/// Answers `P(target | evidence)` by variable elimination over `factors`
/// (one factor per dataset variable, parameterised by its parents under the
/// learned DAG), per §4.C.
///
/// `evidence_vars`/`evidence_vals` must have matching lengths, name columns
/// of `dataset`, and hold values within their respective domains.
///
/// # Errors
///
/// Returns [`Error::ArityMismatch`] if `evidence_vars` and `evidence_vals`
/// differ in length, [`Error::UnknownVariable`]/[`Error::ValueNotInDomain`]
/// for an invalid evidence entry or target, and propagates any error from
/// factor construction or the factor algebra.
pub fn predict(
    dataset: &Dataset,
    factors: &[Factor],
    target: &str,
    evidence_vars: &[&str],
    evidence_vals: &[&str],
    alpha: f64,
) -> Result<Tensor> {
    if evidence_vars.len() != evidence_vals.len() {
        return Err(Error::ArityMismatch(evidence_vars.len(), evidence_vals.len()));
    }
    dataset.card(target)?;
    for (&var, &val) in evidence_vars.iter().zip(evidence_vals.iter()) {
        let domain = dataset.domain(var)?;
        if !domain.iter().any(|v| v == val) {
            return Err(Error::ValueNotInDomain {
                variable: var.to_string(),
                value: val.to_string(),
            });
        }
    }

    // Build the DAG implied by the factor collection, to compute a
    // topological order of the hidden variables.
    let labels: Labels = dataset.labels().clone();
    let mut graph = DiGraph::empty(labels);
    for f in factors {
        let child = graph.label_to_index(f.x())?;
        for parent in f.y() {
            let parent = graph.label_to_index(parent)?;
            graph.add_edge(parent, child);
        }
    }

    let hidden_indices: Vec<usize> = dataset
        .labels()
        .iter()
        .filter(|v| v.as_str() != target && !evidence_vars.contains(&v.as_str()))
        .map(|v| graph.label_to_index(v))
        .collect::<Result<_>>()?;
    let order = graph.topological_order(&hidden_indices);
    let hidden_order: Vec<String> = order.iter().map(|&i| graph.index_to_label(i).to_string()).collect();

    // Deep-copy every factor (Factor::clone duplicates its memoised tables)
    // so elimination can mutate the working set without disturbing the
    // network's own CPTs.
    let cloned: Vec<Factor> = factors.to_vec();
    for f in &cloned {
        let vars = f.vars();
        let (sub_vars, sub_vals): (Vec<&str>, Vec<&str>) = evidence_vars
            .iter()
            .zip(evidence_vals.iter())
            .filter(|(v, _)| vars.iter().any(|w| w == *v))
            .map(|(&v, &val)| (v, val))
            .unzip();
        if !sub_vars.is_empty() {
            f.filter(&sub_vars, &sub_vals, alpha, true)?;
        }
    }

    let mut tensors: Vec<Tensor> = cloned.iter().map(|f| f.to_tensor(alpha)).collect::<Result<_>>()?;

    for hidden in &hidden_order {
        tensors = eliminate(tensors, hidden)?;
    }

    let mut iter = tensors.into_iter();
    let mut result = iter.next().ok_or_else(|| Error::NoFactorMentionsVariable(target.to_string()))?;
    for t in iter {
        result = result.product(&t);
    }

    // Any variable still present besides `target` is an evidence variable
    // fixed to a single value by the filter step above; projecting it out
    // is a no-op sum over that single value.
    for var in result.vars().to_vec() {
        if var != target {
            result = result.marginalization(&var)?;
        }
    }

    result.normalized()
}

/// Eliminates `hidden` from `tensors`, following §4.C step 4.
fn eliminate(tensors: Vec<Tensor>, hidden: &str) -> Result<Vec<Tensor>> {
    let (with_hidden, mut without_hidden): (Vec<Tensor>, Vec<Tensor>) =
        tensors.into_iter().partition(|t| t.mentions(hidden));

    if with_hidden.is_empty() {
        return Err(Error::NoFactorMentionsVariable(hidden.to_string()));
    }

    let mut iter = with_hidden.into_iter();
    let mut combined = iter.next().expect("with_hidden is non-empty");
    for t in iter {
        combined = combined.product(&t);
    }

    if combined.vars() == [hidden.to_string()] {
        // The combined tensor's only variable is the one being eliminated:
        // it is a scalar constant and contributes nothing to the argmax
        // over the target, so it is dropped rather than marginalised.
        return Ok(without_hidden);
    }

    let summed = combined.marginalization(hidden)?;
    let summed_vars: BTreeSet<&String> = summed.vars().iter().collect();
    if let Some(pos) = without_hidden
        .iter()
        .position(|t| t.vars().iter().collect::<BTreeSet<_>>() == summed_vars)
    {
        let existing = without_hidden.remove(pos);
        without_hidden.push(summed.product(&existing));
    } else {
        without_hidden.push(summed);
    }

    Ok(without_hidden)
}

//! The K2 ordered-parent-selection search (§4.E).

use log::info;

use crate::datasets::Dataset;
use crate::graph::DiGraph;
use crate::scoring::node_k2_log_score;
use crate::types::{robinson_dag_space, Error, Labels, Result};

/// Parameters for a K2 search run.
#[derive(Clone, Debug)]
pub struct K2Params {
    /// The maximum number of parents any node may be given.
    pub max_parents: usize,
    /// The node ordering π; candidate parents for `nodes_order[i]` are drawn
    /// only from `nodes_order[..i]`.
    pub nodes_order: Vec<String>,
}

/// The result of a K2 search run.
#[derive(Clone, Debug)]
pub struct K2Result {
    /// The learned DAG.
    pub dag: DiGraph,
    /// The aggregate log-domain K2 score of `dag`.
    pub score: f64,
    /// The fraction (0..=100) of the labelled-DAG space on `dag.len()` nodes
    /// that this run's steps represent, per the canonical Robinson sequence.
    pub percent_visited: f64,
}

/// Runs K2 ordered-parent selection over `dataset`, following `params.nodes_order`.
///
/// # Errors
///
/// Returns [`Error::NotAPermutation`] if `params.nodes_order` is not a
/// permutation of `dataset`'s columns, [`Error::InvalidMaxParents`] if
/// `params.max_parents` exceeds the number of variables (no node can ever
/// have more parents than there are other variables), or propagates a
/// scoring error.
pub fn k2_search(dataset: &Dataset, params: &K2Params) -> Result<K2Result> {
    let labels: Labels = dataset.labels().clone();
    if params.nodes_order.len() != labels.len()
        || !params.nodes_order.iter().all(|v| labels.contains(v))
    {
        return Err(Error::NotAPermutation);
    }
    let max_possible_parents = labels.len().saturating_sub(1);
    if params.max_parents > max_possible_parents {
        return Err(Error::InvalidMaxParents(format!(
            "max_parents ({}) exceeds the number of other variables ({max_possible_parents})",
            params.max_parents
        )));
    }

    let mut dag = DiGraph::empty(labels);
    let mut total_score = 0.0;
    let mut steps: u64 = 0;

    for (i, v) in params.nodes_order.iter().enumerate() {
        let pool = &params.nodes_order[..i];
        let mut parents: Vec<String> = Vec::new();
        let mut remaining: Vec<&String> = pool.iter().collect();

        // Mirrors `original_source/greedy.py`'s `K2_algorithm`: `steps` is
        // only incremented inside the candidate-trial loop, never for the
        // empty-parent baseline `Po`.
        let mut best_score = node_k2_log_score(dataset, v, &parents)?;

        loop {
            if parents.len() >= params.max_parents || remaining.is_empty() {
                break;
            }
            let mut best_candidate: Option<(usize, f64)> = None;
            for (idx, &z) in remaining.iter().enumerate() {
                let mut trial = parents.clone();
                trial.push(z.clone());
                let score = node_k2_log_score(dataset, v, &trial)?;
                steps += 1;
                if best_candidate.map(|(_, s)| score > s).unwrap_or(true) {
                    best_candidate = Some((idx, score));
                }
            }
            let (idx, score) = best_candidate.expect("remaining is non-empty");
            if score > best_score {
                let z = remaining.remove(idx).clone();
                parents.push(z);
                best_score = score;
            } else {
                break;
            }
        }

        for parent in &parents {
            let p = dag.label_to_index(parent)?;
            let c = dag.label_to_index(v)?;
            dag.add_edge(p, c);
        }
        info!(
            "K2 committed node `{v}` with parents {:?}, score={best_score}.",
            parents
        );
        total_score += best_score;
    }

    let space = robinson_dag_space(dag.len())?;
    let percent_visited = (steps as f64) * 100.0 / space;

    Ok(K2Result {
        dag,
        score: total_score,
        percent_visited,
    })
}

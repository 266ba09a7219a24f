//! The thin orchestrator tying structure search to scoring, and exposing
//! the top-level `learn_structure`/`predict` entry points (§4.F).

use std::sync::Arc;

use crate::datasets::Dataset;
use crate::factors::{Factor, Tensor};
use crate::graph::DiGraph;
use crate::inference::predict as eliminate;
use crate::scoring::{aic, entropy, k2_log_score, mdl};
use crate::search::{greedy_search_from, k2_search, GreedyParams, K2Params};
use crate::types::{Error, Result, DEFAULT_ALPHA};

/// A DAG-level scoring metric (§4.D).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Entropy (log-likelihood); smaller is better.
    Entropy,
    /// Akaike information criterion; smaller is better.
    Aic,
    /// Minimum description length; smaller is better.
    Mdl,
    /// The Dirichlet-based K2 score; larger is better. Only valid paired
    /// with [`Algorithm::K2`].
    K2,
}

/// The algorithm-specific parameters of a [`BayesianNetwork::learn_structure`] call.
#[derive(Clone, Debug)]
pub enum AlgorithmParams {
    /// Parameters for the K2 ordered-parent-selection search.
    K2 {
        /// The maximum number of parents any node may be given.
        max_parents: usize,
        /// The node ordering; must be a permutation of the dataset's columns.
        nodes_order: Vec<String>,
    },
    /// Parameters for greedy hill-climbing.
    Greedy {
        /// Whether to start the search from an edgeless graph.
        start_unconnected: bool,
        /// The visit-budget fraction of `2^(n(n-1))`, in `(0, 1]`; `None`
        /// means no early termination.
        visit_space: Option<f64>,
    },
}

/// A Bayesian network: a learned DAG over a dataset's variables, with one
/// factor per node parameterised by its parents, ready to answer
/// [`BayesianNetwork::predict`] queries.
#[derive(Clone, Debug)]
pub struct BayesianNetwork {
    dataset: Arc<Dataset>,
    dag: DiGraph,
    factors: Vec<Factor>,
    alpha: f64,
}

impl BayesianNetwork {
    /// Learns a DAG structure over `dataset` under `metric`, via the
    /// algorithm implied by `algorithm_params`.
    ///
    /// Returns the learned network, its aggregate score under `metric`, and
    /// a progress indicator: the percentage of the labelled-DAG space on
    /// `dataset`'s columns that the search's steps represent (K2), or the
    /// fraction of `2^(n(n-1))` ordered-pair operator attempts taken
    /// (greedy).
    ///
    /// # Errors
    ///
    /// Returns [`Error::K2MetricRequiresK2Algorithm`] if `metric` and
    /// `algorithm_params` disagree on which algorithm to run (the K2 metric
    /// requires the K2 algorithm and vice versa), or propagates any error
    /// from the underlying search.
    pub fn learn_structure(
        dataset: &Dataset,
        metric: Metric,
        alpha: f64,
        algorithm_params: AlgorithmParams,
    ) -> Result<(Self, f64, f64)> {
        match (&metric, &algorithm_params) {
            (Metric::K2, AlgorithmParams::Greedy { .. }) => {
                return Err(Error::K2MetricRequiresK2Algorithm)
            }
            (m, AlgorithmParams::K2 { .. }) if *m != Metric::K2 => {
                return Err(Error::K2MetricRequiresK2Algorithm)
            }
            _ => {}
        }

        let dataset = Arc::new(dataset.clone());

        let (dag, score, percent_visited) = match algorithm_params {
            AlgorithmParams::K2 {
                max_parents,
                nodes_order,
            } => {
                let params = K2Params {
                    max_parents,
                    nodes_order,
                };
                let result = k2_search(&dataset, &params)?;
                (result.dag, result.score, result.percent_visited)
            }
            AlgorithmParams::Greedy {
                start_unconnected,
                visit_space,
            } => {
                let search_metric = match metric {
                    Metric::Entropy => crate::search::Metric::Entropy,
                    Metric::Aic => crate::search::Metric::Aic,
                    Metric::Mdl => crate::search::Metric::Mdl,
                    Metric::K2 => unreachable!("rejected above"),
                };
                let seed = DiGraph::empty(dataset.labels().clone());
                let params = GreedyParams {
                    metric: search_metric,
                    alpha,
                    start_unconnected,
                    visit_space,
                };
                let result = greedy_search_from(&dataset, seed, &params)?;
                let n = result.dag.len();
                let space = 2f64.powi((n * n.saturating_sub(1)) as i32);
                let percent_visited = (result.seen_cases as f64) * 100.0 / space;
                (result.dag, result.score, percent_visited)
            }
        };

        let factors = factors_for(&dataset, &dag)?;
        Ok((
            Self {
                dataset,
                dag,
                factors,
                alpha,
            },
            score,
            percent_visited,
        ))
    }

    /// Builds a network directly from a caller-provided DAG, deriving one
    /// factor per node from the DAG's current parent sets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADag`] if `dag` contains a cycle.
    pub fn from_dag(dataset: &Dataset, dag: DiGraph, alpha: f64) -> Result<Self> {
        if dag.is_cyclic() {
            return Err(Error::NotADag);
        }
        let dataset = Arc::new(dataset.clone());
        let factors = factors_for(&dataset, &dag)?;
        Ok(Self {
            dataset,
            dag,
            factors,
            alpha,
        })
    }

    /// Returns the learned DAG.
    #[inline]
    pub fn dag(&self) -> &DiGraph {
        &self.dag
    }

    /// Returns this network's factors, one per node.
    #[inline]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Scores this network's current DAG under `metric`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying scoring computation.
    pub fn score(&self, metric: Metric) -> Result<f64> {
        match metric {
            Metric::Entropy => entropy(&self.dataset, &self.factors, self.alpha),
            Metric::Aic => aic(&self.dataset, &self.factors, self.alpha),
            Metric::Mdl => mdl(&self.dataset, &self.factors, self.alpha),
            Metric::K2 => k2_log_score(&self.dataset, &self.factors),
        }
    }

    /// Answers `P(target | evidence)` by variable elimination (§4.C).
    ///
    /// # Errors
    ///
    /// See [`crate::inference::predict`].
    pub fn predict(
        &self,
        target: &str,
        evidence_vars: &[&str],
        evidence_vals: &[&str],
    ) -> Result<Tensor> {
        eliminate(
            &self.dataset,
            &self.factors,
            target,
            evidence_vars,
            evidence_vals,
            self.alpha,
        )
    }
}

fn factors_for(dataset: &Arc<Dataset>, dag: &DiGraph) -> Result<Vec<Factor>> {
    dag.labels()
        .iter()
        .map(|v| {
            let idx = dag.label_to_index(v)?;
            let parents: Vec<String> = dag
                .parents(idx)
                .into_iter()
                .map(|p| dag.index_to_label(p).to_string())
                .collect();
            Factor::new(dataset.clone(), v.clone(), parents)
        })
        .collect()
}

impl Default for AlgorithmParams {
    /// Greedy search from an edgeless graph, with no visit-space budget.
    fn default() -> Self {
        AlgorithmParams::Greedy {
            start_unconnected: true,
            visit_space: None,
        }
    }
}

/// The smoothing parameter applied when a caller does not specify one.
pub const DEFAULT_SMOOTHING: f64 = DEFAULT_ALPHA;

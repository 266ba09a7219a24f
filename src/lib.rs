#![warn(missing_docs)]
//! # Bayes Hub
//!
//! Bayes Hub learns the structure of a discrete Bayesian network from a tabular
//! categorical dataset and answers probabilistic queries on the learned network.
//!
//! Given a dataset whose columns are discrete random variables, the crate:
//! - searches the space of directed acyclic graphs for one that best explains the
//!   data under a chosen scoring metric ([`search`]), and
//! - answers marginal/conditional queries `P(target | evidence)` by variable
//!   elimination over the induced conditional probability tables ([`inference`]).

/// Dataset and variable catalog: owns the observation table and count oracle.
pub mod datasets;
/// The factor algebra: conditional/joint probability tables and tensors.
pub mod factors;
/// The directed acyclic graph structure shared by search and inference.
pub mod graph;
/// Exact inference by variable elimination.
pub mod inference;
/// Input/output helpers, currently CSV dataset loading.
pub mod io;
/// Top-level orchestration: ties search to scoring and exposes `learn`/`predict`.
pub mod orchestrator;
/// Scoring metrics for candidate DAGs: entropy, AIC, MDL, K2.
pub mod scoring;
/// Structure search algorithms: K2 and greedy hill-climbing.
pub mod search;
/// Support types shared across the crate: errors, constants, collection aliases.
pub mod types;

pub use datasets::Dataset;
pub use factors::{Factor, Tensor};
pub use graph::DiGraph;
pub use orchestrator::BayesianNetwork;
pub use types::{Error, Result};

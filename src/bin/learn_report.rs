//! Demo driver: sweeps variable-order permutations through K2 under a
//! shared visit-space budget, reporting progress as it goes (§4.J).
//!
//! This binary sequences calls into [`bayes_hub::orchestrator`]; it carries
//! no algorithmic logic of its own.

use std::env;
use std::process::ExitCode;

use bayes_hub::orchestrator::{AlgorithmParams, BayesianNetwork, Metric};
use bayes_hub::{io, Dataset, Error};
use itertools::Itertools;
use log::error;

/// Runs the permutation sweep described in module docs, returning the best
/// `(nodes_order, score, percent_visited)` found and the cumulative
/// percentage of DAG space visited across every permutation tried.
///
/// Exposed as a library-level function (rather than folded into `main`) so
/// it can be exercised directly by tests.
///
/// # Errors
///
/// Propagates any [`Error`] raised while learning a candidate structure.
pub fn run_permutation_sweep(
    dataset: &Dataset,
    max_parents: usize,
    visit_space: f64,
) -> bayes_hub::Result<(Vec<String>, f64, f64)> {
    let columns: Vec<String> = dataset.labels().iter().cloned().collect();
    let budget = 100.0 * visit_space;

    let mut best: Option<(Vec<String>, f64)> = None;
    let mut cumulative_visited = 0.0;

    for (i, permutation) in columns.iter().cloned().permutations(columns.len()).enumerate() {
        println!("[{}] trying permutation: {:?}", i + 1, permutation);

        let (_network, score, percent_visited) = BayesianNetwork::learn_structure(
            dataset,
            Metric::K2,
            bayes_hub::types::DEFAULT_ALPHA,
            AlgorithmParams::K2 {
                max_parents,
                nodes_order: permutation.clone(),
            },
        )?;
        cumulative_visited += percent_visited;

        let improved = best.as_ref().map(|(_, s)| score > *s).unwrap_or(true);
        if improved {
            best = Some((permutation, score));
        }

        println!(
            "percentage of DAG space visited so far: {cumulative_visited:.4}%"
        );
        if let Some((order, score)) = &best {
            println!("current best ordering {order:?} with score {score}");
        }

        if cumulative_visited >= budget {
            break;
        }
    }

    let (order, score) = best.ok_or(Error::NotAPermutation)?;
    Ok((order, score, cumulative_visited))
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = match args.get(1) {
        Some(path) => path.clone(),
        None => {
            eprintln!("usage: learn-report <dataset.csv> [max_parents] [visit_space]");
            return ExitCode::FAILURE;
        }
    };
    let max_parents: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2);
    let visit_space: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.1);

    match run(&path, max_parents, visit_space) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, max_parents: usize, visit_space: f64) -> bayes_hub::Result<()> {
    let dataset = io::read_csv(path)?;
    let (order, score, percent_visited) = run_permutation_sweep(&dataset, max_parents, visit_space)?;

    println!("STRUCTURE FOUND");
    println!("score: {score}");
    println!("ordering: {order:?}");
    println!("visited: {percent_visited:.4}%");
    Ok(())
}

//! Row-table join/groupby primitives shared by [`crate::factors::Factor`] and
//! [`crate::factors::Tensor`].
//!
//! A table is a variable list plus a set of rows, each row an assignment
//! (aligned positionally with the variable list) and a probability.

use crate::types::Map;

/// A single (assignment, probability) row.
pub type Row = (Vec<String>, f64);

/// Joins or Cartesian-products two tables, following the product semantics
/// of §4.B:
/// - shared variables present: inner-join on the shared assignment, multiply
///   `P`;
/// - disjoint and one side has exactly one row: scale the other side's rows
///   by that scalar; the single-row side's own variable(s) never appear in
///   the result;
/// - disjoint and both sides have more than one row: full Cartesian product.
pub fn product(vars_a: &[String], rows_a: &[Row], vars_b: &[String], rows_b: &[Row]) -> (Vec<String>, Vec<Row>) {
    let shared: Vec<usize> = vars_a
        .iter()
        .enumerate()
        .filter_map(|(i, v)| vars_b.iter().any(|w| w == v).then_some(i))
        .collect();

    if !shared.is_empty() {
        return join_on_shared(vars_a, rows_a, vars_b, rows_b, &shared);
    }

    if rows_a.len() == 1 {
        let scalar = rows_a[0].1;
        let rows = rows_b.iter().map(|(a, p)| (a.clone(), p * scalar)).collect();
        return (vars_b.to_vec(), rows);
    }
    if rows_b.len() == 1 {
        let scalar = rows_b[0].1;
        let rows = rows_a.iter().map(|(a, p)| (a.clone(), p * scalar)).collect();
        return (vars_a.to_vec(), rows);
    }

    cartesian(vars_a, rows_a, vars_b, rows_b)
}

fn join_on_shared(
    vars_a: &[String],
    rows_a: &[Row],
    vars_b: &[String],
    rows_b: &[Row],
    shared_in_a: &[usize],
) -> (Vec<String>, Vec<Row>) {
    let only_b: Vec<usize> = vars_b
        .iter()
        .enumerate()
        .filter_map(|(j, v)| (!vars_a.iter().any(|w| w == v)).then_some(j))
        .collect();

    let mut result_vars = vars_a.to_vec();
    result_vars.extend(only_b.iter().map(|&j| vars_b[j].clone()));

    // Index rows_b by their shared-key projection for an O(1) lookup per
    // row_a instead of a nested scan.
    let shared_in_b: Vec<usize> = shared_in_a
        .iter()
        .map(|&i| vars_b.iter().position(|v| v == &vars_a[i]).expect("shared variable present in both"))
        .collect();
    let mut index: Map<Vec<String>, Vec<usize>> = Map::default();
    for (k, (assignment, _)) in rows_b.iter().enumerate() {
        let key: Vec<String> = shared_in_b.iter().map(|&j| assignment[j].clone()).collect();
        index.entry(key).or_default().push(k);
    }

    let mut rows = Vec::new();
    for (assignment_a, p_a) in rows_a {
        let key: Vec<String> = shared_in_a.iter().map(|&i| assignment_a[i].clone()).collect();
        if let Some(matches) = index.get(&key) {
            for &k in matches {
                let (assignment_b, p_b) = &rows_b[k];
                let mut new_assignment = assignment_a.clone();
                new_assignment.extend(only_b.iter().map(|&j| assignment_b[j].clone()));
                rows.push((new_assignment, p_a * p_b));
            }
        }
    }
    (result_vars, rows)
}

fn cartesian(vars_a: &[String], rows_a: &[Row], vars_b: &[String], rows_b: &[Row]) -> (Vec<String>, Vec<Row>) {
    let mut result_vars = vars_a.to_vec();
    result_vars.extend(vars_b.iter().cloned());

    let mut rows = Vec::with_capacity(rows_a.len() * rows_b.len());
    for (assignment_a, p_a) in rows_a {
        for (assignment_b, p_b) in rows_b {
            let mut new_assignment = assignment_a.clone();
            new_assignment.extend(assignment_b.iter().cloned());
            rows.push((new_assignment, p_a * p_b));
        }
    }
    (result_vars, rows)
}

/// Sums `P` over all values of `on`, returning the table over `vars \ {on}`.
///
/// Returns `None` if `on` is not a variable of the table.
pub fn marginalize(vars: &[String], rows: &[Row], on: &str) -> Option<(Vec<String>, Vec<Row>)> {
    let on_idx = vars.iter().position(|v| v == on)?;
    let result_vars: Vec<String> = vars
        .iter()
        .enumerate()
        .filter_map(|(i, v)| (i != on_idx).then(|| v.clone()))
        .collect();

    let mut groups: Map<Vec<String>, f64> = Map::default();
    for (assignment, p) in rows {
        let key: Vec<String> = assignment
            .iter()
            .enumerate()
            .filter_map(|(i, v)| (i != on_idx).then(|| v.clone()))
            .collect();
        *groups.entry(key).or_insert(0.0) += p;
    }

    let rows = groups.into_iter().collect();
    Some((result_vars, rows))
}

//! Black-box coverage of the factor algebra (§4.B): conditional/joint tables,
//! product, and marginalization through the public `Factor`/`Tensor` API.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use bayes_hub::{Dataset, Error, Factor};

const EPSILON: f64 = 1e-9;

fn s1_dataset() -> Arc<Dataset> {
    // S1: A in {y,n}, counts y:3, n:2.
    let rows = vec!["y", "y", "y", "n", "n"]
        .into_iter()
        .map(|v| vec![v.to_string()]);
    Arc::new(Dataset::new(vec!["A".to_string()], rows).unwrap())
}

fn s2_dataset() -> Arc<Dataset> {
    // A,B binary; counts AyBy=2, AyBn=1, AnBy=0, AnBn=2.
    let rows = vec![["y", "y"], ["y", "y"], ["y", "n"], ["n", "n"], ["n", "n"]]
        .into_iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    Arc::new(Dataset::new(vec!["A".to_string(), "B".to_string()], rows).unwrap())
}

#[test]
fn s1_marginal_probability() {
    let data = s1_dataset();
    let f = Factor::new(data, "A", vec![]).unwrap();
    let p = f.probability(&["A"], &["y"], 1.0).unwrap();
    assert_abs_diff_eq!(p, 4.0 / 7.0, epsilon = EPSILON);
}

#[test]
fn filter_replace_permanently_restricts_the_table() {
    let data = s2_dataset();
    let f = Factor::new(data, "B", vec!["A".to_string()]).unwrap();
    f.filter(&["A"], &["y"], 1.0, true).unwrap();
    let table = f.conditional_distribution(1.0).unwrap();
    assert!(table.iter().all(|(assignment, _)| assignment[1] == "y"));
}

#[test]
fn recomputes_when_alpha_changes() {
    let data = s1_dataset();
    let f = Factor::new(data, "A", vec![]).unwrap();
    let p1 = f.probability(&["A"], &["y"], 1.0).unwrap();
    let p2 = f.probability(&["A"], &["y"], 2.0).unwrap();
    assert!((p1 - p2).abs() > EPSILON);
}

#[test]
fn s2_conditional_probability_matches_the_closed_form() {
    let data = s2_dataset();
    let f = Factor::new(data, "B", vec!["A".to_string()]).unwrap();
    // P(B=y|A=y) = ((2+1)/(5+1*2)) / ((3+1)/(5+1*2)) ... restated via the
    // conditional formula directly: (count_AyBy + a) / (count_Ay + a*|B|).
    let p = f.probability(&["A", "B"], &["y", "y"], 1.0).unwrap();
    assert_abs_diff_eq!(p, 3.0 / 5.0, epsilon = EPSILON);
}

#[test]
fn product_of_a_factor_with_itself_shaped_marginal_is_consistent() {
    let data = s2_dataset();
    let marginal_a = Factor::new(data.clone(), "A", vec![]).unwrap();
    let conditional_b = Factor::new(data, "B", vec!["A".to_string()]).unwrap();

    let joint = marginal_a.product(&conditional_b, 1.0).unwrap();
    assert_eq!(joint.vars().len(), 2);
    let total: f64 = joint.rows().iter().map(|(_, p)| p).sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = EPSILON);
}

#[test]
fn marginalizing_out_every_variable_but_one_matches_the_original_marginal() {
    let data = s2_dataset();
    let marginal_a = Factor::new(data.clone(), "A", vec![]).unwrap();
    let conditional_b = Factor::new(data, "B", vec!["A".to_string()]).unwrap();

    let joint = marginal_a.product(&conditional_b, 1.0).unwrap();
    let recovered_a = joint.marginalization("B").unwrap();
    let direct_a = marginal_a.to_tensor(1.0).unwrap();

    let mut recovered: Vec<_> = recovered_a.rows().to_vec();
    let mut direct: Vec<_> = direct_a.rows().to_vec();
    recovered.sort_by(|x, y| x.0.cmp(&y.0));
    direct.sort_by(|x, y| x.0.cmp(&y.0));
    for ((a1, p1), (a2, p2)) in recovered.iter().zip(direct.iter()) {
        assert_eq!(a1, a2);
        assert_abs_diff_eq!(*p1, *p2, epsilon = EPSILON);
    }
}

#[test]
fn unknown_parent_variable_is_an_error() {
    let data = s2_dataset();
    let err = Factor::new(data, "B", vec!["Z".to_string()]).unwrap_err();
    assert!(matches!(err, Error::UnknownVariable(name) if name == "Z"));
}

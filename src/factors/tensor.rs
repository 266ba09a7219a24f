use crate::factors::table::{self, Row};
use crate::types::{Error, Result};

/// A generalised factor produced by [`crate::factors::Factor::product`] or
/// [`crate::factors::Factor::marginalization`] (and by further products and
/// marginalisations of tensors themselves).
///
/// Unlike a [`crate::factors::Factor`], a tensor holds only a distribution
/// table over a variable list — it has no head/parent (`X`/`Y`) distinction,
/// since that decomposition is not preserved by the factor algebra's
/// elementary operations. Variable elimination operates uniformly on this
/// type.
#[derive(Clone, Debug)]
pub struct Tensor {
    vars: Vec<String>,
    rows: Vec<Row>,
}

impl Tensor {
    /// Builds a tensor directly from a variable list and its rows.
    ///
    /// `rows` are not validated against `vars`; this is an internal
    /// constructor used by [`crate::factors::Factor`] and by this module's
    /// own operators.
    pub(crate) fn from_raw(vars: Vec<String>, rows: Vec<Row>) -> Self {
        Self { vars, rows }
    }

    /// Returns the variables of this tensor, in their construction order.
    #[inline]
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Returns the rows of this tensor's table: `(assignment, probability)`
    /// pairs, with `assignment` aligned to [`Tensor::vars`].
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns `true` if this tensor mentions `var`.
    pub fn mentions(&self, var: &str) -> bool {
        self.vars.iter().any(|v| v == var)
    }

    /// Sums the probability of every row.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|(_, p)| p).sum()
    }

    /// Returns a copy of this tensor with every probability divided by the
    /// total, so the probabilities sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFactorMentionsVariable`] if the total is zero
    /// (there is nothing to normalise against); the error name is reused
    /// here since a zero-mass tensor only ever arises from an evidence
    /// assignment no row in the dataset satisfies.
    pub fn normalized(&self) -> Result<Self> {
        let total = self.total();
        if total == 0.0 {
            return Err(Error::NoMatchingRow {
                factor: self.vars.join(","),
                assignment: Vec::new(),
            });
        }
        let rows = self.rows.iter().map(|(a, p)| (a.clone(), p / total)).collect();
        Ok(Self {
            vars: self.vars.clone(),
            rows,
        })
    }

    /// Restricts this tensor to the rows matching a partial assignment.
    pub fn filter(&self, vars: &[&str], vals: &[&str]) -> Self {
        let positions: Vec<Option<usize>> = vars
            .iter()
            .map(|v| self.vars.iter().position(|w| w == v))
            .collect();
        let rows = self
            .rows
            .iter()
            .filter(|(assignment, _)| {
                positions
                    .iter()
                    .zip(vals.iter())
                    .all(|(pos, val)| pos.map(|i| &assignment[i] == val).unwrap_or(true))
            })
            .cloned()
            .collect();
        Self {
            vars: self.vars.clone(),
            rows,
        }
    }

    /// Computes the product of `self` and `other`, per the semantics in
    /// §4.B: an inner join on shared variables, a scalar scaling when the
    /// tables are disjoint and one has a single row, or a full Cartesian
    /// product otherwise.
    pub fn product(&self, other: &Tensor) -> Tensor {
        let (vars, rows) = table::product(&self.vars, &self.rows, &other.vars, &other.rows);
        Tensor { vars, rows }
    }

    /// Sums out `on`, returning a tensor over `vars() \ {on}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if `on` is not one of this
    /// tensor's variables.
    pub fn marginalization(&self, on: &str) -> Result<Tensor> {
        table::marginalize(&self.vars, &self.rows, on)
            .map(|(vars, rows)| Tensor { vars, rows })
            .ok_or_else(|| Error::UnknownVariable(on.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn row(a: &[&str], p: f64) -> Row {
        (a.iter().map(|s| s.to_string()).collect(), p)
    }

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn product_joins_on_shared_variable() {
        // P(A) x P(B|A) over a shared variable A.
        let a = Tensor::from_raw(vars(&["A"]), vec![row(&["y"], 0.6), row(&["n"], 0.4)]);
        let b = Tensor::from_raw(
            vars(&["A", "B"]),
            vec![
                row(&["y", "y"], 0.9),
                row(&["y", "n"], 0.1),
                row(&["n", "y"], 0.2),
                row(&["n", "n"], 0.8),
            ],
        );
        let joined = a.product(&b);
        assert_eq!(joined.vars(), &["A".to_string(), "B".to_string()]);
        assert_eq!(joined.rows().len(), 4);
        let p = joined
            .rows()
            .iter()
            .find(|(assign, _)| assign == &["y".to_string(), "y".to_string()])
            .unwrap()
            .1;
        assert_abs_diff_eq!(p, 0.54, epsilon = 1e-9);
    }

    #[test]
    fn product_is_commutative_as_a_set_of_rows() {
        let a = Tensor::from_raw(vars(&["A"]), vec![row(&["y"], 0.6), row(&["n"], 0.4)]);
        let b = Tensor::from_raw(
            vars(&["A", "B"]),
            vec![row(&["y", "y"], 0.9), row(&["n", "y"], 0.2)],
        );
        let mut ab: Vec<_> = a.product(&b).rows().to_vec();
        let mut ba: Vec<_> = b.product(&a).rows().to_vec();
        ab.sort_by(|x, y| x.0.cmp(&y.0));
        ba.sort_by(|x, y| x.0.cmp(&y.0));
        for ((assign_ab, p_ab), (assign_ba, p_ba)) in ab.iter().zip(ba.iter()) {
            assert!(assign_ab.iter().collect::<std::collections::HashSet<_>>()
                == assign_ba.iter().collect::<std::collections::HashSet<_>>());
            assert_abs_diff_eq!(*p_ab, *p_ba, epsilon = 1e-12);
        }
    }

    #[test]
    fn marginalization_sums_out_a_variable() {
        let t = Tensor::from_raw(
            vars(&["A", "B"]),
            vec![
                row(&["y", "y"], 0.54),
                row(&["y", "n"], 0.06),
                row(&["n", "y"], 0.08),
                row(&["n", "n"], 0.32),
            ],
        );
        let marginal = t.marginalization("B").unwrap();
        assert_eq!(marginal.vars(), &["A".to_string()]);
        let p_y = marginal
            .rows()
            .iter()
            .find(|(a, _)| a == &["y".to_string()])
            .unwrap()
            .1;
        assert_abs_diff_eq!(p_y, 0.6, epsilon = 1e-9);
    }

    #[test]
    fn marginalization_commutes_across_two_variables() {
        let t = Tensor::from_raw(
            vars(&["A", "B", "C"]),
            vec![
                row(&["y", "y", "y"], 0.1),
                row(&["y", "y", "n"], 0.2),
                row(&["y", "n", "y"], 0.15),
                row(&["y", "n", "n"], 0.05),
                row(&["n", "y", "y"], 0.2),
                row(&["n", "y", "n"], 0.1),
                row(&["n", "n", "y"], 0.1),
                row(&["n", "n", "n"], 0.1),
            ],
        );
        let ab = t.marginalization("C").unwrap().marginalization("B").unwrap();
        let ba = t.marginalization("B").unwrap().marginalization("C").unwrap();
        let mut ab_rows = ab.rows().to_vec();
        let mut ba_rows = ba.rows().to_vec();
        ab_rows.sort_by(|x, y| x.0.cmp(&y.0));
        ba_rows.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(ab_rows.len(), ba_rows.len());
        for ((a1, p1), (a2, p2)) in ab_rows.iter().zip(ba_rows.iter()) {
            assert_eq!(a1, a2);
            assert_abs_diff_eq!(*p1, *p2, epsilon = 1e-9);
        }
    }
}

use std::cell::RefCell;
use std::sync::Arc;

use itertools::Itertools;
use log::debug;

use crate::datasets::Dataset;
use crate::factors::table::Row;
use crate::factors::Tensor;
use crate::types::{Error, Result};

#[derive(Clone, Debug)]
struct CachedTable {
    alpha: f64,
    rows: Vec<Row>,
}

/// A conditional probability table `P(X | Y)` (or marginal `P(X)` when `Y` is
/// empty), backed by counts over a shared, read-only [`Dataset`].
///
/// `vars(F) = [X] ++ Y`, `X` first then the parents in the given order. The
/// conditional and joint tables are memoised per Laplace smoothing parameter
/// `α`; they are recomputed only when `α` changes (parents never change
/// after construction — a new parent set means a new `Factor`).
#[derive(Clone, Debug)]
pub struct Factor {
    dataset: Arc<Dataset>,
    x: String,
    y: Vec<String>,
    cond_cache: RefCell<Option<CachedTable>>,
    joint_cache: RefCell<Option<CachedTable>>,
}

impl Factor {
    /// Creates a factor `P(x | y)` over the given dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if `x` or any member of `y` is not
    /// a column of `dataset`.
    pub fn new(dataset: Arc<Dataset>, x: impl Into<String>, y: Vec<String>) -> Result<Self> {
        let x = x.into();
        dataset.card(&x)?;
        for parent in &y {
            dataset.card(parent)?;
        }
        Ok(Self {
            dataset,
            x,
            y,
            cond_cache: RefCell::new(None),
            joint_cache: RefCell::new(None),
        })
    }

    /// Returns the head variable `X`.
    #[inline]
    pub fn x(&self) -> &str {
        &self.x
    }

    /// Returns the parent variables `Y`, in the order given at construction.
    #[inline]
    pub fn y(&self) -> &[String] {
        &self.y
    }

    /// Returns `vars(F) = [X] ++ Y`.
    pub fn vars(&self) -> Vec<String> {
        std::iter::once(self.x.clone()).chain(self.y.iter().cloned()).collect()
    }

    fn vars_cards(&self) -> Result<Vec<usize>> {
        self.vars().iter().map(|v| self.dataset.card(v)).collect()
    }

    fn recompute_conditional(&self, alpha: f64) -> Result<Vec<Row>> {
        let vars = self.vars();
        let vars_refs: Vec<&str> = vars.iter().map(String::as_str).collect();
        let domains: Vec<&[String]> = vars.iter().map(|v| self.dataset.domain(v)).collect::<Result<_>>()?;
        let card_x = self.dataset.card(&self.x)?;

        let mut rows = Vec::new();
        for combo in domains.iter().map(|d| d.iter()).multi_cartesian_product() {
            let assignment: Vec<String> = combo.iter().map(|s| (*s).clone()).collect();
            let vals: Vec<&str> = assignment.iter().map(String::as_str).collect();

            let count_xy = self.dataset.count(&vars_refs, &vals)?;
            let (y_vars, y_vals) = (&vars_refs[1..], &vals[1..]);
            let count_y = self.dataset.count(y_vars, y_vals)?;

            let p = (count_xy as f64 + alpha) / (count_y as f64 + alpha * card_x as f64);
            rows.push((assignment, p));
        }
        debug!(
            "Recomputed conditional table for P({} | {}) with alpha={alpha}.",
            self.x,
            self.y.join(",")
        );
        Ok(rows)
    }

    fn recompute_joint(&self, alpha: f64) -> Result<Vec<Row>> {
        let vars = self.vars();
        let vars_refs: Vec<&str> = vars.iter().map(String::as_str).collect();
        let domains: Vec<&[String]> = vars.iter().map(|v| self.dataset.domain(v)).collect::<Result<_>>()?;
        let cards = self.vars_cards()?;
        let prod_cards: f64 = cards.iter().map(|&c| c as f64).product();
        let m = self.dataset.nrows() as f64;

        let mut rows = Vec::new();
        for combo in domains.iter().map(|d| d.iter()).multi_cartesian_product() {
            let assignment: Vec<String> = combo.iter().map(|s| (*s).clone()).collect();
            let vals: Vec<&str> = assignment.iter().map(String::as_str).collect();

            let count = self.dataset.count(&vars_refs, &vals)?;
            let p = (count as f64 + alpha) / (m + alpha * prod_cards);
            rows.push((assignment, p));
        }
        Ok(rows)
    }

    /// Returns the conditional distribution table, normalised per `Y`
    /// assignment, recomputing it if `alpha` differs from the cached value.
    pub fn conditional_distribution(&self, alpha: f64) -> Result<Vec<Row>> {
        {
            let cache = self.cond_cache.borrow();
            if let Some(cached) = cache.as_ref() {
                if cached.alpha == alpha {
                    return Ok(cached.rows.clone());
                }
            }
        }
        let rows = self.recompute_conditional(alpha)?;
        *self.cond_cache.borrow_mut() = Some(CachedTable { alpha, rows: rows.clone() });
        Ok(rows)
    }

    /// Returns the joint distribution table over `vars(F)`, recomputing it
    /// if `alpha` differs from the cached value.
    pub fn joint_distribution(&self, alpha: f64) -> Result<Vec<Row>> {
        {
            let cache = self.joint_cache.borrow();
            if let Some(cached) = cache.as_ref() {
                if cached.alpha == alpha {
                    return Ok(cached.rows.clone());
                }
            }
        }
        let rows = self.recompute_joint(alpha)?;
        *self.joint_cache.borrow_mut() = Some(CachedTable { alpha, rows: rows.clone() });
        Ok(rows)
    }

    /// Looks up a single probability from the conditional table.
    ///
    /// `vars`/`vals` may be a partial assignment over `vars(F)`, as long as
    /// it narrows the table down to exactly one row (e.g. `vars = [X]` on a
    /// marginal factor, or the full `[X] ++ Y` assignment on a conditional
    /// one).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `vars` and `vals` differ in
    /// length, or [`Error::NoMatchingRow`] if zero or more than one row
    /// matches.
    pub fn probability(&self, vars: &[&str], vals: &[&str], alpha: f64) -> Result<f64> {
        let filtered = self.filter(vars, vals, alpha, false)?;
        match filtered.as_slice() {
            [(_, p)] => Ok(*p),
            _ => Err(Error::NoMatchingRow {
                factor: self.vars().join(","),
                assignment: vals.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Looks up a single probability from the joint table.
    ///
    /// `vals` must provide exactly one value per variable of `vars(F)`, in
    /// that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `vals` has the wrong length, or
    /// [`Error::NoMatchingRow`] if the assignment is not a row key (it always
    /// should be, for a full assignment over a materialised domain).
    pub fn joint_probability(&self, vals: &[&str], alpha: f64) -> Result<f64> {
        let vars = self.vars();
        if vals.len() != vars.len() {
            return Err(Error::ArityMismatch(vars.len(), vals.len()));
        }
        let table = self.joint_distribution(alpha)?;
        table
            .iter()
            .find(|(assignment, _)| assignment.iter().zip(vals.iter()).all(|(a, v)| a == v))
            .map(|(_, p)| *p)
            .ok_or_else(|| Error::NoMatchingRow {
                factor: vars.join(","),
                assignment: vals.iter().map(|s| s.to_string()).collect(),
            })
    }

    /// Restricts the conditional table to rows matching a partial
    /// assignment over `vars(F)`.
    ///
    /// When `replace` is `true`, the filtered table becomes this factor's
    /// memoised conditional table (at the given `alpha`) — used by variable
    /// elimination to permanently condition a cloned factor on evidence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `vars` and `vals` differ in
    /// length.
    pub fn filter(&self, vars: &[&str], vals: &[&str], alpha: f64, replace: bool) -> Result<Vec<Row>> {
        if vars.len() != vals.len() {
            return Err(Error::ArityMismatch(vars.len(), vals.len()));
        }
        let full_vars = self.vars();
        let positions: Vec<usize> = vars
            .iter()
            .map(|v| {
                full_vars
                    .iter()
                    .position(|w| w == v)
                    .ok_or_else(|| Error::UnknownVariable((*v).to_string()))
            })
            .collect::<Result<_>>()?;

        let table = self.conditional_distribution(alpha)?;
        let filtered: Vec<Row> = table
            .into_iter()
            .filter(|(assignment, _)| {
                positions.iter().zip(vals.iter()).all(|(&i, val)| &assignment[i] == val)
            })
            .collect();

        if replace {
            *self.cond_cache.borrow_mut() = Some(CachedTable {
                alpha,
                rows: filtered.clone(),
            });
        }
        Ok(filtered)
    }

    /// Converts this factor's conditional table (at `alpha`) into a
    /// [`Tensor`], the representation variable elimination operates on.
    pub fn to_tensor(&self, alpha: f64) -> Result<Tensor> {
        let rows = self.conditional_distribution(alpha)?;
        Ok(Tensor::from_raw(self.vars(), rows))
    }

    /// Computes the product of this factor and another, as a [`Tensor`].
    /// See [`Tensor::product`] for the exact join/scale/Cartesian semantics.
    pub fn product(&self, other: &Factor, alpha: f64) -> Result<Tensor> {
        Ok(self.to_tensor(alpha)?.product(&other.to_tensor(alpha)?))
    }

    /// Sums out `on`, returning a [`Tensor`] over `vars(F) \ {on}`.
    pub fn marginalization(&self, on: &str, alpha: f64) -> Result<Tensor> {
        self.to_tensor(alpha)?.marginalization(on)
    }
}

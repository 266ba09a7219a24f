use log::debug;

use crate::types::{Error, Labels, Map, Result};

/// A tabular categorical dataset: an ordered collection of rows, each row a
/// mapping from variable name to categorical value.
///
/// Variable names are unique and columns hold only owned `String`s — values
/// are never parsed as numbers, dates, or booleans, since every column is a
/// closed categorical domain (§3). Missing values are not supported.
#[derive(Clone, Debug)]
pub struct Dataset {
    labels: Labels,
    /// The observed domain of each variable, in first-seen order.
    domains: Map<String, Vec<String>>,
    /// For each variable, a map from value to the sorted row indices holding
    /// it. Precomputed so `count` runs in time proportional to the smallest
    /// matching column rather than a full table scan per query.
    index: Map<String, Map<String, Vec<usize>>>,
    nrows: usize,
}

impl Dataset {
    /// Builds a dataset from a header row and the subsequent data rows.
    ///
    /// # Arguments
    ///
    /// * `header` - The variable names, in column order.
    /// * `rows` - The data rows; each must have as many fields as `header`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateVariable`] if `header` has a repeated name,
    /// or [`Error::RaggedRow`] if a row's field count does not match the
    /// header's.
    pub fn new<H, R, F>(header: H, rows: R) -> Result<Self>
    where
        H: IntoIterator<Item = String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = String>,
    {
        let header: Vec<String> = header.into_iter().collect();
        let mut labels: Labels = Labels::default();
        for name in &header {
            if !labels.insert(name.clone()) {
                return Err(Error::DuplicateVariable(name.clone()));
            }
        }

        let mut domains: Map<String, Vec<String>> = header
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let mut index: Map<String, Map<String, Vec<usize>>> =
            header.iter().map(|name| (name.clone(), Map::default())).collect();

        let mut nrows = 0;
        for (i, row) in rows.into_iter().enumerate() {
            let row: Vec<String> = row.into_iter().collect();
            if row.len() != header.len() {
                return Err(Error::RaggedRow(i + 1, row.len(), header.len()));
            }
            for (name, value) in header.iter().zip(row.into_iter()) {
                let domain = domains.get_mut(name).expect("column was pre-populated");
                if !domain.contains(&value) {
                    domain.push(value.clone());
                }
                index
                    .get_mut(name)
                    .expect("column was pre-populated")
                    .entry(value)
                    .or_default()
                    .push(i);
            }
            nrows += 1;
        }

        debug!(
            "Built dataset with {} variables and {} rows.",
            labels.len(),
            nrows
        );

        Ok(Self {
            labels,
            domains,
            index,
            nrows,
        })
    }

    /// Returns the names of the variables, in column order.
    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Returns the number of rows `M = |D|`.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the observed domain of a variable, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if `var` is not a column.
    pub fn domain(&self, var: &str) -> Result<&[String]> {
        self.domains
            .get(var)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownVariable(var.to_string()))
    }

    /// Returns the cardinality `|dom(V)|` of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if `var` is not a column.
    pub fn card(&self, var: &str) -> Result<usize> {
        self.domain(var).map(<[String]>::len)
    }

    /// Returns the count `M[vars=vals]`: the number of rows satisfying the
    /// conjunction of `vars[i] == vals[i]` for every `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `vars` and `vals` have different
    /// lengths, or [`Error::UnknownVariable`] if any name in `vars` is not a
    /// column.
    pub fn count(&self, vars: &[&str], vals: &[&str]) -> Result<usize> {
        if vars.len() != vals.len() {
            return Err(Error::ArityMismatch(vars.len(), vals.len()));
        }
        if vars.is_empty() {
            return Ok(self.nrows);
        }

        // Gather the candidate row sets for each conjunct, smallest first, so
        // the intersection short-circuits on the tightest constraint.
        let mut candidates: Vec<&[usize]> = Vec::with_capacity(vars.len());
        for (&var, &val) in vars.iter().zip(vals.iter()) {
            let column = self
                .index
                .get(var)
                .ok_or_else(|| Error::UnknownVariable(var.to_string()))?;
            match column.get(val) {
                Some(rows) => candidates.push(rows.as_slice()),
                // The value never occurs for this variable: the count is 0.
                None => return Ok(0),
            }
        }
        candidates.sort_by_key(|rows| rows.len());

        let mut iter = candidates.into_iter();
        let mut acc: Vec<usize> = iter.next().expect("vars is non-empty").to_vec();
        for rows in iter {
            acc = intersect_sorted(&acc, rows);
            if acc.is_empty() {
                break;
            }
        }
        Ok(acc.len())
    }
}

/// Intersects two sorted slices of row indices.
fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

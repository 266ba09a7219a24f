use std::collections::VecDeque;

use ndarray::Array2;

use crate::types::{Error, Labels, Result};

/// A directed graph over named vertices, represented as an adjacency matrix.
///
/// `adjacency[[x, y]] == true` means there is an edge `x -> y`, i.e. `x` is a
/// parent of `y`. The graph does not enforce acyclicity itself — that is the
/// job of the edge operators in [`crate::search`] — but it exposes the DFS
/// reachability check ([`DiGraph::reachable`]) those operators build on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiGraph {
    labels: Labels,
    adjacency: Array2<bool>,
}

impl DiGraph {
    /// Creates an edgeless graph over the given labels.
    pub fn empty(labels: Labels) -> Self {
        let n = labels.len();
        Self {
            labels,
            adjacency: Array2::from_elem((n, n), false),
        }
    }

    /// Creates a graph over the given labels, with parent edges seeded from
    /// `parents_of` (a map from variable name to the set of its parent
    /// names).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if a name in `parents_of` is not in
    /// `labels`.
    pub fn from_parents<'a, I, J>(labels: Labels, parents_of: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, J)>,
        J: IntoIterator<Item = &'a str>,
    {
        let mut graph = Self::empty(labels);
        for (child, parents) in parents_of {
            let c = graph.label_to_index(child)?;
            for parent in parents {
                let p = graph.label_to_index(parent)?;
                graph.add_edge(p, c);
            }
        }
        Ok(graph)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the graph has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the vertex labels, in their original order.
    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Returns the vertex index of a label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVariable`] if `label` is not a vertex.
    pub fn label_to_index(&self, label: &str) -> Result<usize> {
        self.labels
            .get_index_of(label)
            .ok_or_else(|| Error::UnknownVariable(label.to_string()))
    }

    /// Returns the label of a vertex index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; callers only ever pass indices
    /// obtained from this same graph.
    pub fn index_to_label(&self, index: usize) -> &str {
        self.labels
            .get_index(index)
            .unwrap_or_else(|| panic!("vertex index {index} is out of bounds"))
    }

    /// Returns `true` if there is an edge `x -> y`.
    #[inline]
    pub fn has_edge(&self, x: usize, y: usize) -> bool {
        self.adjacency[[x, y]]
    }

    /// Adds the edge `x -> y`. Returns `true` if the edge was not already
    /// present (idempotent otherwise). Performs no cycle check; see
    /// [`crate::search::operators::add_edge`] for the cycle-safe operator.
    pub fn add_edge(&mut self, x: usize, y: usize) -> bool {
        if self.adjacency[[x, y]] {
            return false;
        }
        self.adjacency[[x, y]] = true;
        true
    }

    /// Removes the edge `x -> y`. Returns `true` if the edge existed.
    pub fn remove_edge(&mut self, x: usize, y: usize) -> bool {
        if !self.adjacency[[x, y]] {
            return false;
        }
        self.adjacency[[x, y]] = false;
        true
    }

    /// Returns the parents of `v`, as vertex indices in ascending order.
    pub fn parents(&self, v: usize) -> Vec<usize> {
        self.adjacency
            .column(v)
            .iter()
            .enumerate()
            .filter_map(|(x, &edge)| edge.then_some(x))
            .collect()
    }

    /// Returns the children of `v`, as vertex indices in ascending order.
    pub fn children(&self, v: usize) -> Vec<usize> {
        self.adjacency
            .row(v)
            .iter()
            .enumerate()
            .filter_map(|(y, &edge)| edge.then_some(y))
            .collect()
    }

    /// Returns every edge `(x, y)` currently in the graph.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .indexed_iter()
            .filter_map(|((x, y), &edge)| edge.then_some((x, y)))
            .collect()
    }

    /// Returns `true` if `target` is reachable from `start` by following
    /// directed edges, `target == start` included.
    ///
    /// This is the DFS reachability check the edge operators use to detect
    /// whether adding `u -> v` would close a cycle: a cycle is created iff
    /// `v` can already reach `u`.
    pub fn reachable(&self, start: usize, target: usize) -> bool {
        if start == target {
            return true;
        }
        let mut visited = vec![false; self.len()];
        let mut stack = VecDeque::new();
        stack.push_back(start);
        visited[start] = true;
        while let Some(x) = stack.pop_back() {
            for y in self.children(x) {
                if y == target {
                    return true;
                }
                if !visited[y] {
                    visited[y] = true;
                    stack.push_back(y);
                }
            }
        }
        false
    }

    /// Returns `true` if the graph currently contains a directed cycle.
    pub fn is_cyclic(&self) -> bool {
        self.edges().into_iter().any(|(x, y)| self.reachable(y, x))
    }

    /// Returns a topological order of the given subset of vertices,
    /// restricted to edges between members of the subset.
    ///
    /// Any order consistent with the restricted edges is valid; this uses a
    /// post-order DFS, so a vertex is emitted only after all vertices
    /// reachable from it within the subset.
    pub fn topological_order(&self, subset: &[usize]) -> Vec<usize> {
        let in_subset: std::collections::HashSet<usize> = subset.iter().copied().collect();
        let mut visited = vec![false; self.len()];
        let mut order = Vec::with_capacity(subset.len());

        fn visit(
            graph: &DiGraph,
            v: usize,
            in_subset: &std::collections::HashSet<usize>,
            visited: &mut [bool],
            order: &mut Vec<usize>,
        ) {
            visited[v] = true;
            for p in graph.parents(v) {
                if in_subset.contains(&p) && !visited[p] {
                    visit(graph, p, in_subset, visited, order);
                }
            }
            order.push(v);
        }

        for &v in subset {
            if !visited[v] {
                visit(self, v, &in_subset, &mut visited, &mut order);
            }
        }
        order
    }
}

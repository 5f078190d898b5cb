// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Directed social-trust graph.
use ndarray::{Array2, ArrayView2};

use crate::{data::ratings::check_index, errors::DataError};

/// Dense directed trust graph.
///
/// Entry `(v, u)` is the strength with which user `v` influences user `u`,
/// in `[0, 1]` so that it lies on the scale of the logistic edge estimate.
/// Zero means no edge.  The explicit `edges` mask covers the off-diagonal
/// positive entries; those are the entries the trust-reconstruction
/// regularizer is fit against.
#[derive(Debug, Clone)]
pub struct TrustGraph {
    weights: Array2<f64>,
    edges: Array2<bool>,
}

impl TrustGraph {
    pub fn from_dense(weights: ArrayView2<f64>) -> Result<TrustGraph, DataError> {
        let (nr, nc) = weights.dim();
        if nr != nc {
            return Err(DataError::Shape {
                what: "trust matrix",
                actual: (nr, nc),
                expected: (nr, nr),
            });
        }
        for ((v, u), w) in weights.indexed_iter() {
            if !(0.0..=1.0).contains(w) {
                return Err(DataError::BadWeight {
                    from: v,
                    to: u,
                    weight: *w,
                });
            }
        }
        let weights = weights.to_owned();
        let edges = Array2::from_shape_fn((nr, nr), |(v, u)| v != u && weights[[v, u]] > 0.0);
        Ok(TrustGraph { weights, edges })
    }

    /// Build from `(from, to, weight)` triples.  Later duplicates win.
    pub fn from_edges(n_users: usize, edges: &[(usize, usize, f64)]) -> Result<TrustGraph, DataError> {
        let mut weights = Array2::zeros((n_users, n_users));
        for &(from, to, weight) in edges {
            check_index("truster", from, n_users)?;
            check_index("trustee", to, n_users)?;
            weights[[from, to]] = weight;
        }
        TrustGraph::from_dense(weights.view())
    }

    /// An empty graph over `n_users` users.
    pub fn empty(n_users: usize) -> TrustGraph {
        TrustGraph {
            weights: Array2::zeros((n_users, n_users)),
            edges: Array2::from_elem((n_users, n_users), false),
        }
    }

    pub fn n_users(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn edge_mask(&self) -> &Array2<bool> {
        &self.edges
    }

    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[[from, to]]
    }

    pub fn n_edges(&self) -> usize {
        self.edges.iter().filter(|e| **e).count()
    }

    /// Users `v` with a positive edge `v -> user`, with their weights.
    pub fn influencers(&self, user: usize) -> Vec<(usize, f64)> {
        self.weights
            .column(user)
            .indexed_iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(v, w)| (v, *w))
            .collect()
    }

    /// Users `v` with a positive edge `user -> v`, with their weights.
    pub fn influencees(&self, user: usize) -> Vec<(usize, f64)> {
        self.weights
            .row(user)
            .indexed_iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(v, w)| (v, *w))
            .collect()
    }
}

#[test]
fn test_directed_neighbors() {
    let g = TrustGraph::from_edges(3, &[(0, 1, 0.5), (2, 1, 0.25)]).unwrap();
    assert_eq!(g.n_edges(), 2);
    assert_eq!(g.influencers(1), vec![(0, 0.5), (2, 0.25)]);
    assert_eq!(g.influencees(0), vec![(1, 0.5)]);
    assert!(g.influencees(1).is_empty());
    assert!(g.edge_mask()[[0, 1]]);
    assert!(!g.edge_mask()[[1, 0]]);
}

#[test]
fn test_self_loop_not_an_edge() {
    let g = TrustGraph::from_edges(2, &[(1, 1, 0.7)]).unwrap();
    assert_eq!(g.n_edges(), 0);
    assert_eq!(g.weight(1, 1), 0.7);
}

#[test]
fn test_reject_bad_weights() {
    assert!(TrustGraph::from_edges(2, &[(0, 1, -0.1)]).is_err());
    assert!(TrustGraph::from_edges(2, &[(0, 1, f64::NAN)]).is_err());
    assert!(TrustGraph::from_edges(2, &[(0, 1, 1.5)]).is_err());
    assert!(TrustGraph::from_edges(2, &[(0, 1, 1.0)]).is_ok());
    assert!(TrustGraph::from_edges(2, &[(0, 2, 0.5)]).is_err());
    let rect = Array2::<f64>::zeros((2, 3));
    assert!(TrustGraph::from_dense(rect.view()).is_err());
}

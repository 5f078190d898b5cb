// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Training data: observed ratings and the trust graph.
use log::*;
use ndarray::ArrayView2;

mod ratings;
mod trust;

pub use ratings::{RatingMatrix, RatingScale};
pub use trust::TrustGraph;

use crate::errors::DataError;

/// Immutable training data for one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    num_brand: usize,
    ratings: RatingMatrix,
    trust: TrustGraph,
}

impl Dataset {
    pub fn new(
        ratings: RatingMatrix,
        trust: TrustGraph,
        num_brand: usize,
    ) -> Result<Dataset, DataError> {
        let (nu, ni) = ratings.shape();
        if num_brand == 0 {
            return Err(DataError::EmptyDimension {
                what: "brand count",
            });
        }
        if trust.n_users() != nu {
            return Err(DataError::Shape {
                what: "trust matrix",
                actual: (trust.n_users(), trust.n_users()),
                expected: (nu, nu),
            });
        }
        ratings.check_finite()?;
        debug!(
            "dataset with {} users, {} items, {} brands, {} ratings, {} trust edges",
            nu,
            ni,
            num_brand,
            ratings.n_observed(),
            trust.n_edges()
        );
        Ok(Dataset {
            num_brand,
            ratings,
            trust,
        })
    }

    /// Build from dense matrices; `NaN` marks an unobserved rating.
    pub fn from_dense(
        ratings: ArrayView2<f64>,
        trust: ArrayView2<f64>,
        num_brand: usize,
        scale: RatingScale,
    ) -> Result<Dataset, DataError> {
        let ratings = RatingMatrix::from_dense(ratings, scale);
        let trust = TrustGraph::from_dense(trust)?;
        Dataset::new(ratings, trust, num_brand)
    }

    /// Build from `(user, item, rating)` and `(from, to, weight)` triples.
    pub fn from_triples(
        num_user: usize,
        num_item: usize,
        num_brand: usize,
        ratings: &[(usize, usize, f64)],
        edges: &[(usize, usize, f64)],
        scale: RatingScale,
    ) -> Result<Dataset, DataError> {
        let ratings = RatingMatrix::from_triples(num_user, num_item, ratings, scale)?;
        let trust = TrustGraph::from_edges(num_user, edges)?;
        Dataset::new(ratings, trust, num_brand)
    }

    pub fn num_user(&self) -> usize {
        self.ratings.shape().0
    }

    pub fn num_item(&self) -> usize {
        self.ratings.shape().1
    }

    pub fn num_brand(&self) -> usize {
        self.num_brand
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn trust(&self) -> &TrustGraph {
        &self.trust
    }
}

#[test]
fn test_trust_shape_must_match() {
    let ratings = RatingMatrix::from_triples(3, 2, &[], RatingScale::default()).unwrap();
    let trust = TrustGraph::empty(2);
    assert!(Dataset::new(ratings, trust, 1).is_err());
}

#[test]
fn test_dense_dataset() {
    let ratings = ndarray::array![[0.5, f64::NAN, 1.0], [f64::NAN, 0.0, f64::NAN]];
    let trust = ndarray::array![[0.0, 1.0], [0.0, 0.0]];
    let ds = Dataset::from_dense(ratings.view(), trust.view(), 2, RatingScale::default()).unwrap();
    assert_eq!(ds.num_user(), 2);
    assert_eq!(ds.num_item(), 3);
    assert_eq!(ds.num_brand(), 2);
    assert_eq!(ds.ratings().n_observed(), 3);
    assert_eq!(ds.trust().n_edges(), 1);
}

#[test]
fn test_zero_brands_rejected() {
    let ratings = RatingMatrix::from_triples(2, 2, &[], RatingScale::default()).unwrap();
    let trust = TrustGraph::empty(2);
    assert!(matches!(
        Dataset::new(ratings, trust, 0),
        Err(DataError::EmptyDimension { .. })
    ));
    let none = ndarray::Array2::from_elem((2, 2), f64::NAN);
    let zero = ndarray::Array2::zeros((2, 2));
    assert!(Dataset::from_dense(none.view(), zero.view(), 0, RatingScale::default()).is_err());
}

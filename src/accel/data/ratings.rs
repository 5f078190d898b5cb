// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Dense rating matrices with explicit observation masks.
use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::errors::DataError;

/// The scale ratings are expressed on.
///
/// Predictions come out of a logistic link, so observed ratings are mapped
/// into `[0, 1]` before training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        RatingScale { min: 0.0, max: 1.0 }
    }
}

impl RatingScale {
    pub fn new(min: f64, max: f64) -> Result<RatingScale, DataError> {
        if min.is_finite() && max.is_finite() && min < max {
            Ok(RatingScale { min, max })
        } else {
            Err(DataError::BadScale { min, max })
        }
    }

    pub fn normalize(&self, rating: f64) -> f64 {
        (rating - self.min) / (self.max - self.min)
    }

    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * (self.max - self.min)
    }
}

/// Normalized ratings plus the mask of observed entries.
///
/// Unobserved entries hold `0.0` in `values`; the mask, never the value,
/// decides whether an entry takes part in training.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    values: Array2<f64>,
    observed: Array2<bool>,
    scale: RatingScale,
}

impl RatingMatrix {
    /// Build from a dense matrix where `NaN` marks an unobserved rating.
    pub fn from_dense(ratings: ArrayView2<f64>, scale: RatingScale) -> RatingMatrix {
        let observed = ratings.mapv(|r| !r.is_nan());
        let values = ratings.mapv(|r| if r.is_nan() { 0.0 } else { scale.normalize(r) });
        RatingMatrix {
            values,
            observed,
            scale,
        }
    }

    /// Build from `(user, item, rating)` triples.  Later duplicates win.
    pub fn from_triples(
        n_users: usize,
        n_items: usize,
        triples: &[(usize, usize, f64)],
        scale: RatingScale,
    ) -> Result<RatingMatrix, DataError> {
        let mut values = Array2::zeros((n_users, n_items));
        let mut observed = Array2::from_elem((n_users, n_items), false);
        for &(user, item, rating) in triples {
            check_index("user", user, n_users)?;
            check_index("item", item, n_items)?;
            if !rating.is_finite() {
                return Err(DataError::BadRating { user, item });
            }
            values[[user, item]] = scale.normalize(rating);
            observed[[user, item]] = true;
        }
        Ok(RatingMatrix {
            values,
            observed,
            scale,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Normalized rating values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn observed(&self) -> &Array2<bool> {
        &self.observed
    }

    pub fn is_observed(&self, user: usize, item: usize) -> bool {
        self.observed[[user, item]]
    }

    /// Normalized rating, if observed.
    pub fn get(&self, user: usize, item: usize) -> Option<f64> {
        if self.observed[[user, item]] {
            Some(self.values[[user, item]])
        } else {
            None
        }
    }

    pub fn n_observed(&self) -> usize {
        self.observed.iter().filter(|o| **o).count()
    }

    /// Observed `(user, item)` pairs in row-major order.
    pub fn observed_pairs(&self) -> Vec<(usize, usize)> {
        self.observed
            .indexed_iter()
            .filter(|(_, o)| **o)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Check that a dense matrix holds finite values everywhere it is observed.
    pub(crate) fn check_finite(&self) -> Result<(), DataError> {
        let mut bad = None;
        Zip::indexed(&self.values)
            .and(&self.observed)
            .for_each(|(u, i), v, o| {
                if *o && !v.is_finite() && bad.is_none() {
                    bad = Some((u, i));
                }
            });
        match bad {
            Some((user, item)) => Err(DataError::BadRating { user, item }),
            None => Ok(()),
        }
    }
}

pub(crate) fn check_index(what: &'static str, index: usize, bound: usize) -> Result<(), DataError> {
    if index < bound {
        Ok(())
    } else {
        Err(DataError::OutOfRange { what, index, bound })
    }
}

#[test]
fn test_nan_marks_unobserved() {
    let dense = ndarray::array![[1.0, f64::NAN], [f64::NAN, 5.0]];
    let scale = RatingScale::new(1.0, 5.0).unwrap();
    let rm = RatingMatrix::from_dense(dense.view(), scale);
    assert_eq!(rm.n_observed(), 2);
    assert_eq!(rm.get(0, 0), Some(0.0));
    assert_eq!(rm.get(1, 1), Some(1.0));
    assert_eq!(rm.get(0, 1), None);
    assert!(!rm.is_observed(1, 0));
    assert_eq!(rm.values()[[0, 1]], 0.0);
    assert_eq!(rm.observed_pairs(), vec![(0, 0), (1, 1)]);
}

#[test]
fn test_triples_bounds() {
    let scale = RatingScale::default();
    assert!(RatingMatrix::from_triples(2, 2, &[(2, 0, 0.5)], scale).is_err());
    assert!(RatingMatrix::from_triples(2, 2, &[(0, 0, f64::INFINITY)], scale).is_err());
    let rm = RatingMatrix::from_triples(2, 3, &[(1, 2, 0.25)], scale).unwrap();
    assert_eq!(rm.shape(), (2, 3));
    assert_eq!(rm.get(1, 2), Some(0.25));
}

#[test]
fn test_scale_roundtrip() {
    let scale = RatingScale::new(1.0, 5.0).unwrap();
    assert_eq!(scale.normalize(3.0), 0.5);
    assert_eq!(scale.denormalize(0.5), 3.0);
    assert!(RatingScale::new(5.0, 1.0).is_err());
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Masked prediction errors.
use ndarray::{Array2, Zip};

use super::{
    link::{logistic, logistic_deriv},
    Link,
};

/// Errors of bounded predictions against observed values.
///
/// `errors` holds `g(bounded) - observed` at observed positions and exactly
/// zero elsewhere.  `scaled` multiplies each error by the link derivative at
/// the same bounded score, which is the factor every gradient term uses, so
/// an entry with zero error contributes nothing downstream.
#[derive(Debug, Clone)]
pub struct Residuals {
    pub errors: Array2<f64>,
    pub scaled: Array2<f64>,
}

impl Residuals {
    /// Compute residuals of raw `scores` against `observed` under `mask`.
    pub fn compute(
        link: Link,
        scores: &Array2<f64>,
        observed: &Array2<f64>,
        mask: &Array2<bool>,
    ) -> Residuals {
        let mut errors = Array2::zeros(scores.dim());
        let mut scaled = Array2::zeros(scores.dim());
        Zip::from(&mut errors)
            .and(&mut scaled)
            .and(scores)
            .and(observed)
            .and(mask)
            .for_each(|e, s, &score, &obs, &m| {
                if m {
                    let bounded = link.bound(score);
                    *e = logistic(bounded) - obs;
                    *s = *e * logistic_deriv(bounded);
                }
            });
        Residuals { errors, scaled }
    }

    /// Squared Frobenius norm of the errors.
    pub fn sq_norm(&self) -> f64 {
        self.errors.iter().map(|e| e * e).sum()
    }
}

#[test]
fn test_unobserved_is_zero() {
    let link = Link::new(30.0);
    let scores = ndarray::array![[0.0, 3.0], [-2.0, 0.0]];
    let obs = ndarray::array![[0.5, 0.9], [0.1, 0.25]];
    let mask = ndarray::array![[true, false], [false, true]];
    let r = Residuals::compute(link, &scores, &obs, &mask);
    assert_eq!(r.errors[[0, 0]], 0.0);
    assert_eq!(r.scaled[[0, 0]], 0.0);
    assert_eq!(r.errors[[0, 1]], 0.0);
    assert_eq!(r.errors[[1, 0]], 0.0);
    assert_eq!(r.errors[[1, 1]], 0.25);
    assert_eq!(r.scaled[[1, 1]], 0.25 * 0.25);
    assert_eq!(r.sq_norm(), 0.0625);
}

#[test]
fn test_cutoff_applies_before_link() {
    let link = Link::new(2.0);
    let scores = ndarray::array![[100.0]];
    let obs = ndarray::array![[0.0]];
    let mask = ndarray::array![[true]];
    let r = Residuals::compute(link, &scores, &obs, &mask);
    assert_eq!(r.errors[[0, 0]], logistic(2.0));
    assert_eq!(r.scaled[[0, 0]], logistic(2.0) * logistic_deriv(2.0));
    assert!(r.scaled[[0, 0]].is_finite());
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Logistic link between raw bilinear scores and normalized ratings.

/// Logistic link with a cutoff on raw scores.
///
/// Raw scores are clamped to `[-cutoff, cutoff]` before anything else sees
/// them, so the link and its derivative are always evaluated on the same
/// bounded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    cutoff: f64,
}

impl Link {
    pub fn new(cutoff: f64) -> Link {
        Link { cutoff }
    }

    pub fn bound(&self, score: f64) -> f64 {
        score.clamp(-self.cutoff, self.cutoff)
    }
}

#[inline]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of [logistic] at `x`.
#[inline]
pub fn logistic_deriv(x: f64) -> f64 {
    let g = logistic(x);
    g * (1.0 - g)
}

#[test]
fn test_logistic_values() {
    assert_eq!(logistic(0.0), 0.5);
    assert_eq!(logistic_deriv(0.0), 0.25);
    assert!(logistic(40.0) <= 1.0);
    assert!(logistic_deriv(-40.0) >= 0.0);
}

#[test]
fn test_logistic_deriv_matches_slope() {
    let h = 1e-6;
    for x in [-3.0, -0.5, 0.2, 1.7] {
        let slope = (logistic(x + h) - logistic(x - h)) / (2.0 * h);
        assert!((slope - logistic_deriv(x)).abs() < 1e-8);
    }
}

#[test]
fn test_bound_clamps() {
    let link = Link::new(5.0);
    assert_eq!(link.bound(7.0), 5.0);
    assert_eq!(link.bound(-9.0), -5.0);
    assert_eq!(link.bound(1.5), 1.5);
}

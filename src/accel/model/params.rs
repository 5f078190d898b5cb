// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Learnable parameter sets.
//!
//! Parameter sets are immutable snapshots: a descent step builds a new set
//! and leaves the one it started from untouched.  Gradients use the same
//! types, so every parameter matrix has a same-shaped gradient matrix.
use std::fmt;

use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng};

/// Operations the trainer needs from a parameter snapshot.
pub trait ParamSet: Clone {
    /// Take a step of size `step` against `grad`, producing a new snapshot.
    fn descend(&self, grad: &Self, step: f64) -> Self;

    /// Per-family squared distances to another snapshot of the same shape.
    fn distances(&self, other: &Self) -> ParamDistances;

    /// Total squared Euclidean distance to another snapshot.
    fn sq_distance(&self, other: &Self) -> f64 {
        self.distances(other).total()
    }
}

/// Topic factors, used by the STE model.
///
/// Column `u` of `topic_user` is user `u`'s topic vector; column `i` of
/// `topic_item` is item `i`'s.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicParams {
    pub topic_user: Array2<f64>,
    pub topic_item: Array2<f64>,
}

/// Topic and brand factors plus per-user decision preferences, used by SocBIT.
///
/// A decision preference above 0.5 leans towards topic-based adoption, below
/// 0.5 towards brand-based adoption.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandParams {
    pub topic_user: Array2<f64>,
    pub topic_item: Array2<f64>,
    pub brand_user: Array2<f64>,
    pub brand_item: Array2<f64>,
    pub decision_prefs: Array1<f64>,
}

/// Initial decision preference: neither topic- nor brand-leaning.
pub const NEUTRAL_PREF: f64 = 0.5;

/// Build a `dim × n` factor matrix whose columns are a scaled unit vector
/// plus uniform noise in `[-noise, noise]`.
pub(crate) fn init_factors(dim: usize, n: usize, scale: f64, noise: f64, rng: &mut StdRng) -> Array2<f64> {
    let base = scale / (dim as f64).sqrt();
    Array2::from_shape_fn((dim, n), |_| {
        if noise > 0.0 {
            base + rng.gen_range(-noise..=noise)
        } else {
            base
        }
    })
}

impl TopicParams {
    pub fn zeros(num_topic: usize, num_user: usize, num_item: usize) -> TopicParams {
        TopicParams {
            topic_user: Array2::zeros((num_topic, num_user)),
            topic_item: Array2::zeros((num_topic, num_item)),
        }
    }

    pub fn init(
        num_topic: usize,
        num_user: usize,
        num_item: usize,
        scale: f64,
        noise: f64,
        rng: &mut StdRng,
    ) -> TopicParams {
        TopicParams {
            topic_user: init_factors(num_topic, num_user, scale, noise, rng),
            topic_item: init_factors(num_topic, num_item, scale, noise, rng),
        }
    }

    pub fn num_topic(&self) -> usize {
        self.topic_user.nrows()
    }
}

impl BrandParams {
    pub fn zeros(num_topic: usize, num_brand: usize, num_user: usize, num_item: usize) -> BrandParams {
        BrandParams {
            topic_user: Array2::zeros((num_topic, num_user)),
            topic_item: Array2::zeros((num_topic, num_item)),
            brand_user: Array2::zeros((num_brand, num_user)),
            brand_item: Array2::zeros((num_brand, num_item)),
            decision_prefs: Array1::zeros(num_user),
        }
    }

    pub fn init(
        num_topic: usize,
        num_brand: usize,
        num_user: usize,
        num_item: usize,
        scale: f64,
        noise: f64,
        rng: &mut StdRng,
    ) -> BrandParams {
        BrandParams {
            topic_user: init_factors(num_topic, num_user, scale, noise, rng),
            topic_item: init_factors(num_topic, num_item, scale, noise, rng),
            brand_user: init_factors(num_brand, num_user, scale, noise, rng),
            brand_item: init_factors(num_brand, num_item, scale, noise, rng),
            decision_prefs: Array1::from_elem(num_user, NEUTRAL_PREF),
        }
    }

    pub fn num_topic(&self) -> usize {
        self.topic_user.nrows()
    }

    pub fn num_brand(&self) -> usize {
        self.brand_user.nrows()
    }
}

fn sq_dist2(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn sq_dist1(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl ParamSet for TopicParams {
    fn descend(&self, grad: &Self, step: f64) -> Self {
        TopicParams {
            topic_user: &self.topic_user - &(&grad.topic_user * step),
            topic_item: &self.topic_item - &(&grad.topic_item * step),
        }
    }

    fn distances(&self, other: &Self) -> ParamDistances {
        ParamDistances {
            topic_user: sq_dist2(&self.topic_user, &other.topic_user),
            topic_item: sq_dist2(&self.topic_item, &other.topic_item),
            brand_user: None,
            brand_item: None,
            decision_prefs: None,
        }
    }
}

impl ParamSet for BrandParams {
    fn descend(&self, grad: &Self, step: f64) -> Self {
        BrandParams {
            topic_user: &self.topic_user - &(&grad.topic_user * step),
            topic_item: &self.topic_item - &(&grad.topic_item * step),
            brand_user: &self.brand_user - &(&grad.brand_user * step),
            brand_item: &self.brand_item - &(&grad.brand_item * step),
            decision_prefs: &self.decision_prefs - &(&grad.decision_prefs * step),
        }
    }

    fn distances(&self, other: &Self) -> ParamDistances {
        ParamDistances {
            topic_user: sq_dist2(&self.topic_user, &other.topic_user),
            topic_item: sq_dist2(&self.topic_item, &other.topic_item),
            brand_user: Some(sq_dist2(&self.brand_user, &other.brand_user)),
            brand_item: Some(sq_dist2(&self.brand_item, &other.brand_item)),
            decision_prefs: Some(sq_dist1(&self.decision_prefs, &other.decision_prefs)),
        }
    }
}

/// Squared distances between two snapshots, per parameter family.
///
/// Brand and decision entries are only present for SocBIT snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDistances {
    pub topic_user: f64,
    pub topic_item: f64,
    pub brand_user: Option<f64>,
    pub brand_item: Option<f64>,
    pub decision_prefs: Option<f64>,
}

impl ParamDistances {
    pub fn total(&self) -> f64 {
        self.topic_user
            + self.topic_item
            + self.brand_user.unwrap_or(0.0)
            + self.brand_item.unwrap_or(0.0)
            + self.decision_prefs.unwrap_or(0.0)
    }
}

impl fmt::Display for ParamDistances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.6e}", v));
        write!(
            f,
            "{:.6e}, {:.6e}, {}, {}, {}",
            self.topic_user,
            self.topic_item,
            opt(self.brand_user),
            opt(self.brand_item),
            opt(self.decision_prefs)
        )
    }
}

#[test]
fn test_descend_leaves_source() {
    let p = TopicParams {
        topic_user: ndarray::array![[1.0, 2.0]],
        topic_item: ndarray::array![[3.0]],
    };
    let g = TopicParams {
        topic_user: ndarray::array![[1.0, -1.0]],
        topic_item: ndarray::array![[2.0]],
    };
    let n = p.descend(&g, 0.5);
    assert_eq!(n.topic_user, ndarray::array![[0.5, 2.5]]);
    assert_eq!(n.topic_item, ndarray::array![[2.0]]);
    assert_eq!(p.topic_user, ndarray::array![[1.0, 2.0]]);
    assert_eq!(n.sq_distance(&p), 0.25 + 0.25 + 1.0);
}

#[test]
fn test_brand_init_neutral() {
    use rand::SeedableRng;
    let mut rng = StdRng::seed_from_u64(7);
    let p = BrandParams::init(4, 2, 3, 5, 0.1, 0.0, &mut rng);
    assert_eq!(p.topic_user.dim(), (4, 3));
    assert_eq!(p.brand_item.dim(), (2, 5));
    assert!(p.decision_prefs.iter().all(|d| *d == NEUTRAL_PREF));
    // without noise, every column is the unit vector scaled to length 0.1
    let len: f64 = p.topic_user.column(0).iter().map(|x| x * x).sum::<f64>().sqrt();
    assert!((len - 0.1).abs() < 1e-12);
}

#[test]
fn test_distances_by_family() {
    let a = BrandParams::zeros(2, 1, 2, 2);
    let mut b = a.clone();
    b.decision_prefs[1] = 0.5;
    b.brand_item[[0, 0]] = 2.0;
    let d = a.distances(&b);
    assert_eq!(d.topic_user, 0.0);
    assert_eq!(d.brand_item, Some(4.0));
    assert_eq!(d.decision_prefs, Some(0.25));
    assert_eq!(d.total(), 4.25);
}

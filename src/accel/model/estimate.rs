// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Rating and trust-weight estimation from a parameter snapshot.
//!
//! Every estimate is a pure function of the snapshot and the dataset.  Point
//! estimates are plain bilinear forms; the trust blend computed by
//! [Estimator::combo] only enters the gradients.
use ndarray::{Array1, Array2, Axis};

use crate::data::Dataset;

use super::{link::logistic, BrandParams, Link, Params, TopicParams};

/// Raw SocBIT scores, split by latent family.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandScores {
    /// Topic scores `<topic_user[u], topic_item[i]>`.
    pub topic: Array2<f64>,
    /// Brand scores `<brand_user[u], brand_item[i]>`.
    pub brand: Array2<f64>,
    /// Decision-preference blend of the two.
    pub blended: Array2<f64>,
}

/// Computes raw scores and predictions for a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    ds: &'a Dataset,
    alpha: f64,
    link: Link,
}

impl<'a> Estimator<'a> {
    pub fn new(ds: &'a Dataset, alpha: f64, link: Link) -> Estimator<'a> {
        Estimator { ds, alpha, link }
    }

    pub fn link(&self) -> Link {
        self.link
    }

    /// Blend each user's factors with the trust-weighted factors of their
    /// influencers: column `u` is `alpha * f_u + (1 - alpha) * Σ_v w(v, u) f_v`.
    pub fn combo(&self, user_factors: &Array2<f64>) -> Array2<f64> {
        let social = user_factors.dot(self.ds.trust().weights());
        user_factors * self.alpha + social * (1.0 - self.alpha)
    }

    /// Scores of trust-blended user factors against item factors, i.e. the
    /// ensemble estimate `<combo(u), item(i)>` (users × items).
    pub fn social_scores(&self, user_factors: &Array2<f64>, item_factors: &Array2<f64>) -> Array2<f64> {
        self.combo(user_factors).t().dot(item_factors)
    }

    /// Raw STE scores (users × items).
    pub fn topic_scores(&self, params: &TopicParams) -> Array2<f64> {
        params.topic_user.t().dot(&params.topic_item)
    }

    /// Raw SocBIT scores (users × items).
    pub fn brand_scores(&self, params: &BrandParams) -> BrandScores {
        let topic = params.topic_user.t().dot(&params.topic_item);
        let brand = params.brand_user.t().dot(&params.brand_item);
        let blended = blend(&params.decision_prefs, &topic, &brand);
        BrandScores {
            topic,
            brand,
            blended,
        }
    }

    /// Raw scores for any parameter set.
    pub fn scores(&self, params: &Params) -> Array2<f64> {
        match params {
            Params::Topic(p) => self.topic_scores(p),
            Params::Brand(p) => self.brand_scores(p).blended,
        }
    }

    /// Raw trust-weight scores (users × users): the decision-preference blend
    /// of user-user topic and brand similarities.
    pub fn edge_scores(&self, params: &BrandParams) -> Array2<f64> {
        let topic = params.topic_user.t().dot(&params.topic_user);
        let brand = params.brand_user.t().dot(&params.brand_user);
        blend(&params.decision_prefs, &topic, &brand)
    }

    /// Predicted ratings on the dataset's rating scale.
    pub fn predict(&self, params: &Params) -> Array2<f64> {
        let scale = self.ds.ratings().scale();
        self.scores(params)
            .mapv(|s| scale.denormalize(logistic(self.link.bound(s))))
    }
}

/// Row-wise blend `D a + (I - D) b` with `D = diag(prefs)`.
fn blend(prefs: &Array1<f64>, a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let d = prefs.view().insert_axis(Axis(1));
    let nd = d.mapv(|x| 1.0 - x);
    &d * a + &nd * b
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::test_fixtures::{brand_params, small_dataset, topic_params};

    #[test]
    fn test_estimates_are_pure() {
        let ds = small_dataset();
        let est = Estimator::new(&ds, 0.6, Link::new(30.0));
        let p = brand_params();
        let first = est.brand_scores(&p);
        let second = est.brand_scores(&p);
        assert_eq!(first, second);
        assert_eq!(est.edge_scores(&p), est.edge_scores(&p));
        assert_eq!(p, brand_params());
    }

    #[test]
    fn test_scores_are_plain_dot() {
        let ds = small_dataset();
        let p = topic_params();
        for alpha in [1.0, 0.6, 0.0] {
            let est = Estimator::new(&ds, alpha, Link::new(30.0));
            let scores = est.topic_scores(&p);
            for u in 0..ds.num_user() {
                for i in 0..ds.num_item() {
                    let dot = p.topic_user.column(u).dot(&p.topic_item.column(i));
                    assert!((scores[[u, i]] - dot).abs() < 1e-15);
                }
            }
        }
    }

    #[test]
    fn test_lone_user_not_scaled_by_alpha() {
        let ds = Dataset::from_triples(1, 1, 1, &[], &[], Default::default()).unwrap();
        let est = Estimator::new(&ds, 0.5, Link::new(30.0));
        let p = TopicParams {
            topic_user: array![[2.0]],
            topic_item: array![[1.5]],
        };
        assert_eq!(est.topic_scores(&p)[[0, 0]], 3.0);
        assert_eq!(est.social_scores(&p.topic_user, &p.topic_item)[[0, 0]], 1.5);
    }

    #[test]
    fn test_social_scores_at_alpha_one() {
        let ds = small_dataset();
        let est = Estimator::new(&ds, 1.0, Link::new(30.0));
        let p = topic_params();
        assert_eq!(est.social_scores(&p.topic_user, &p.topic_item), est.topic_scores(&p));
    }

    #[test]
    fn test_combo_follows_edges() {
        let ds = small_dataset();
        let est = Estimator::new(&ds, 0.25, Link::new(30.0));
        let f = array![[1.0, 2.0, 4.0]];
        let combo = est.combo(&f);
        for u in 0..3 {
            let social: f64 = ds
                .trust()
                .influencers(u)
                .iter()
                .map(|(v, w)| w * f[[0, *v]])
                .sum();
            let expected = 0.25 * f[[0, u]] + 0.75 * social;
            assert!((combo[[0, u]] - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_brand_blend() {
        let ds = small_dataset();
        let est = Estimator::new(&ds, 0.5, Link::new(30.0));
        let mut p = brand_params();
        p.decision_prefs = array![1.0, 0.0, 0.25];
        let s = est.brand_scores(&p);
        for i in 0..ds.num_item() {
            assert_eq!(s.blended[[0, i]], s.topic[[0, i]]);
            assert_eq!(s.blended[[1, i]], s.brand[[1, i]]);
            let mixed = 0.25 * s.topic[[2, i]] + 0.75 * s.brand[[2, i]];
            assert!((s.blended[[2, i]] - mixed).abs() < 1e-15);
        }
        let w = est.edge_scores(&p);
        let expected = p.topic_user.column(0).dot(&p.topic_user.column(2));
        assert!((w[[0, 2]] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_predict_on_scale() {
        let ds = small_dataset();
        let est = Estimator::new(&ds, 0.5, Link::new(30.0));
        let pred = est.predict(&Params::Topic(TopicParams::zeros(2, 3, 2)));
        let scale = ds.ratings().scale();
        for v in pred.iter() {
            assert!((*v - scale.denormalize(0.5)).abs() < 1e-12);
        }
    }
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Regularized least-squares objective.
use std::fmt;

use ndarray::{Array1, Array2};

use crate::{
    config::Hypers,
    data::Dataset,
    model::{BrandParams, Estimator, Link, Params, Residuals, TopicParams, NEUTRAL_PREF},
};

/// The objective split into its terms, before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObjectiveTerms {
    /// Squared rating errors.
    pub rating: f64,
    /// Squared trust-weight reconstruction errors.
    pub weight: f64,
    /// Squared norms of the topic factors.
    pub topic: f64,
    /// Squared norms of the brand factors.
    pub brand: f64,
    /// Squared deviations of decision preferences from neutral.
    pub decision: f64,
}

impl ObjectiveTerms {
    /// Weighted total.
    pub fn total(&self, hypers: &Hypers) -> f64 {
        self.rating
            + hypers.weight_lambda * self.weight
            + hypers.topic_lambda * self.topic
            + hypers.brand_lambda * self.brand
            + hypers.decision_lambda * self.decision
    }
}

impl fmt::Display for ObjectiveTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating={:.6}, weight={:.6}, topic={:.6}, brand={:.6}, decision={:.6}",
            self.rating, self.weight, self.topic, self.brand, self.decision
        )
    }
}

/// Evaluates the objective for parameter snapshots on a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Objective<'a> {
    ds: &'a Dataset,
    hypers: Hypers,
    est: Estimator<'a>,
}

fn sq_norm(m: &Array2<f64>) -> f64 {
    m.iter().map(|x| x * x).sum()
}

fn sq_centered(prefs: &Array1<f64>) -> f64 {
    prefs
        .iter()
        .map(|d| (d - NEUTRAL_PREF) * (d - NEUTRAL_PREF))
        .sum()
}

impl<'a> Objective<'a> {
    pub fn new(ds: &'a Dataset, hypers: Hypers, link: Link) -> Objective<'a> {
        Objective {
            ds,
            hypers,
            est: Estimator::new(ds, hypers.alpha, link),
        }
    }

    pub fn hypers(&self) -> &Hypers {
        &self.hypers
    }

    pub fn topic_terms(&self, params: &TopicParams) -> ObjectiveTerms {
        let ratings = self.ds.ratings();
        let scores = self.est.topic_scores(params);
        let res = Residuals::compute(self.est.link(), &scores, ratings.values(), ratings.observed());
        ObjectiveTerms {
            rating: res.sq_norm(),
            topic: sq_norm(&params.topic_user) + sq_norm(&params.topic_item),
            ..ObjectiveTerms::default()
        }
    }

    pub fn brand_terms(&self, params: &BrandParams) -> ObjectiveTerms {
        let ratings = self.ds.ratings();
        let trust = self.ds.trust();
        let link = self.est.link();
        let scores = self.est.brand_scores(params);
        let res = Residuals::compute(link, &scores.blended, ratings.values(), ratings.observed());
        let weights = self.est.edge_scores(params);
        let wres = Residuals::compute(link, &weights, trust.weights(), trust.edge_mask());
        ObjectiveTerms {
            rating: res.sq_norm(),
            weight: wres.sq_norm(),
            topic: sq_norm(&params.topic_user) + sq_norm(&params.topic_item),
            brand: sq_norm(&params.brand_user) + sq_norm(&params.brand_item),
            decision: sq_centered(&params.decision_prefs),
        }
    }

    pub fn topic(&self, params: &TopicParams) -> f64 {
        self.topic_terms(params).total(&self.hypers)
    }

    pub fn brand(&self, params: &BrandParams) -> f64 {
        self.brand_terms(params).total(&self.hypers)
    }

    pub fn terms(&self, params: &Params) -> ObjectiveTerms {
        match params {
            Params::Topic(p) => self.topic_terms(p),
            Params::Brand(p) => self.brand_terms(p),
        }
    }

    pub fn value(&self, params: &Params) -> f64 {
        self.terms(params).total(&self.hypers)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{
        model::logistic,
        test_fixtures::{brand_params, hypers, small_dataset, topic_params},
    };

    #[test]
    fn test_objective_non_negative() {
        let ds = small_dataset();
        let obj = Objective::new(&ds, hypers(), Link::new(30.0));
        assert!(obj.topic(&topic_params()) >= 0.0);
        assert!(obj.brand(&brand_params()) >= 0.0);
        let mut p = brand_params();
        p.decision_prefs = array![-3.0, 2.0, 0.5];
        p.topic_user *= -4.0;
        assert!(obj.brand(&p) >= 0.0);
    }

    #[test]
    fn test_ste_ignores_brand_terms() {
        let ds = small_dataset();
        let obj = Objective::new(&ds, hypers(), Link::new(30.0));
        let terms = obj.topic_terms(&topic_params());
        assert_eq!(terms.weight, 0.0);
        assert_eq!(terms.brand, 0.0);
        assert_eq!(terms.decision, 0.0);
    }

    #[test]
    fn test_zero_params_objective() {
        // every prediction is g(0) = 0.5; the normalized ratings are 0.75, 0.25, 1.0
        let ds = small_dataset();
        let obj = Objective::new(&ds, hypers(), Link::new(30.0));
        let p = BrandParams::zeros(2, 2, 3, 2);
        let terms = obj.brand_terms(&p);
        assert!((terms.rating - (0.0625 + 0.0625 + 0.25)).abs() < 1e-15);
        // both edges are reconstructed as g(0)
        let we = (logistic(0.0) - 0.8).powi(2) + (logistic(0.0) - 0.5).powi(2);
        assert!((terms.weight - we).abs() < 1e-15);
        assert_eq!(terms.decision, 0.75);
        let total = terms.rating + 0.3 * we + 0.2 * 0.75;
        assert!((obj.brand(&p) - total).abs() < 1e-15);
    }

    #[test]
    fn test_unobserved_rating_ignored() {
        let scale = crate::data::RatingScale::new(1.0, 5.0).unwrap();
        let trust = Array2::zeros((2, 2));
        let dense = array![[4.0, f64::NAN], [f64::NAN, 2.0]];
        let ds = Dataset::from_dense(dense.view(), trust.view(), 1, scale).unwrap();
        let h = hypers();
        let p = TopicParams {
            topic_user: array![[0.2, -0.4]],
            topic_item: array![[0.5, 0.9]],
        };
        let e00 = logistic(0.2 * 0.5) - 0.75;
        let e11 = logistic(-0.4 * 0.9) - 0.25;
        let reg = 0.2 * 0.2 + 0.4 * 0.4 + 0.5 * 0.5 + 0.9 * 0.9;
        let expected = e00 * e00 + e11 * e11 + h.topic_lambda * reg;
        let value = Objective::new(&ds, h, Link::new(30.0)).topic(&p);
        assert!((value - expected).abs() < 1e-14);
    }
}

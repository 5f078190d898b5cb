// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Gradient of the SocBIT objective: topic and brand factors blended by
//! per-user decision preferences, plus trust-graph reconstruction.
//!
//! As for STE, item and decision terms use the trust-blended ensemble
//! estimates; the result is the exact objective gradient when `alpha = 1`.
use ndarray::{Array2, Axis};

use crate::{
    config::Hypers,
    data::Dataset,
    model::{BrandParams, Estimator, Link, Residuals, NEUTRAL_PREF},
    objective::Objective,
};

use super::{spread, Differentiable};

/// SocBIT gradient calculator.
#[derive(Debug, Clone, Copy)]
pub struct SocBitGradient<'a> {
    ds: &'a Dataset,
    hypers: Hypers,
    est: Estimator<'a>,
    objective: Objective<'a>,
}

impl<'a> SocBitGradient<'a> {
    pub fn new(ds: &'a Dataset, hypers: Hypers, link: Link) -> SocBitGradient<'a> {
        SocBitGradient {
            ds,
            hypers,
            est: Estimator::new(ds, hypers.alpha, link),
            objective: Objective::new(ds, hypers, link),
        }
    }

    pub fn calculate(&self, params: &BrandParams) -> BrandParams {
        let ratings = self.ds.ratings();
        let weights = self.ds.trust().weights();
        let hy = &self.hypers;

        let scores = self.est.brand_scores(params);
        let res = Residuals::compute(self.est.link(), &scores.blended, ratings.values(), ratings.observed());

        let topic_combo = self.est.combo(&params.topic_user);
        let brand_combo = self.est.combo(&params.brand_user);
        let (topic_pref, brand_pref) = pref_columns(params);

        // each user's scaled errors, weighted by how much that user leans on
        // topics or on brands
        let topic_scaled = &topic_pref * &res.scaled;
        let brand_scaled = &brand_pref * &res.scaled;

        let topic_item = &params.topic_item * hy.topic_lambda + topic_combo.dot(&topic_scaled);
        let brand_item = &params.brand_item * hy.brand_lambda + brand_combo.dot(&brand_scaled);

        // personal parts carry the user's own preference; influencee parts carry
        // the preference of the influenced user, since column v holds v's sums
        let topic_personal = params.topic_item.dot(&topic_scaled.t());
        let brand_personal = params.brand_item.dot(&brand_scaled.t());
        let mut topic_user =
            &params.topic_user * hy.topic_lambda + spread(&topic_personal, weights, hy.alpha);
        let mut brand_user =
            &params.brand_user * hy.brand_lambda + spread(&brand_personal, weights, hy.alpha);

        // moving a preference trades the brand ensemble estimate for the topic one
        let topic_social = topic_combo.t().dot(&params.topic_item);
        let brand_social = brand_combo.t().dot(&params.brand_item);
        let centered = params.decision_prefs.mapv(|d| d - NEUTRAL_PREF);
        let mut decision_prefs = centered * hy.decision_lambda
            + (&res.scaled * &(&topic_social - &brand_social)).sum_axis(Axis(1));

        if hy.weight_lambda > 0.0 {
            let trust = self.ds.trust();
            let topic_sim = params.topic_user.t().dot(&params.topic_user);
            let brand_sim = params.brand_user.t().dot(&params.brand_user);
            let est_weights = &topic_pref * &topic_sim + &brand_pref * &brand_sim;
            let wres = Residuals::compute(self.est.link(), &est_weights, trust.weights(), trust.edge_mask());
            let wscaled = wres.scaled * hy.weight_lambda;

            // both endpoints of an edge receive the similarity gradient
            let topic_w = &topic_pref * &wscaled;
            let brand_w = &brand_pref * &wscaled;
            topic_user += &params.topic_user.dot(&(&topic_w + &topic_w.t()));
            brand_user += &params.brand_user.dot(&(&brand_w + &brand_w.t()));
            decision_prefs += &(&wscaled * &(&topic_sim - &brand_sim)).sum_axis(Axis(1));
        }

        BrandParams {
            topic_user,
            topic_item,
            brand_user,
            brand_item,
            decision_prefs,
        }
    }
}

/// Decision preferences as a column, and their complements.
fn pref_columns(params: &BrandParams) -> (Array2<f64>, Array2<f64>) {
    let topic = params.decision_prefs.view().insert_axis(Axis(1)).to_owned();
    let brand = topic.mapv(|d| 1.0 - d);
    (topic, brand)
}

impl Differentiable for SocBitGradient<'_> {
    type Params = BrandParams;

    fn objective(&self, params: &BrandParams) -> f64 {
        self.objective.brand(params)
    }

    fn gradient(&self, params: &BrandParams) -> BrandParams {
        self.calculate(params)
    }
}

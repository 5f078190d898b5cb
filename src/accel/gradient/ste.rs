// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Gradient of the social trust ensemble (topic factors only).
use crate::{
    config::Hypers,
    data::Dataset,
    model::{Estimator, Link, Residuals, TopicParams},
    objective::Objective,
};

use super::{spread, Differentiable};

/// STE gradient calculator.
///
/// Each call computes scores and residuals once from the snapshot it is
/// given; nothing carries over between calls.  Item gradients weigh errors
/// by the trust-blended user features, so with `alpha < 1` the result is a
/// social descent direction rather than the exact objective gradient; with
/// `alpha = 1` the two coincide.
#[derive(Debug, Clone, Copy)]
pub struct SteGradient<'a> {
    ds: &'a Dataset,
    hypers: Hypers,
    est: Estimator<'a>,
    objective: Objective<'a>,
}

impl<'a> SteGradient<'a> {
    pub fn new(ds: &'a Dataset, hypers: Hypers, link: Link) -> SteGradient<'a> {
        SteGradient {
            ds,
            hypers,
            est: Estimator::new(ds, hypers.alpha, link),
            objective: Objective::new(ds, hypers, link),
        }
    }

    pub fn calculate(&self, params: &TopicParams) -> TopicParams {
        let ratings = self.ds.ratings();
        let lambda = self.hypers.topic_lambda;

        let scores = self.est.topic_scores(params);
        let res = Residuals::compute(self.est.link(), &scores, ratings.values(), ratings.observed());

        // item i: sum over users of scaled error times the user's combo feature
        let combo = self.est.combo(&params.topic_user);
        let topic_item = &params.topic_item * lambda + combo.dot(&res.scaled);

        // user u: own error-weighted item vectors, plus those of the users u influences
        let personal = params.topic_item.dot(&res.scaled.t());
        let topic_user =
            &params.topic_user * lambda + spread(&personal, self.ds.trust().weights(), self.hypers.alpha);

        TopicParams {
            topic_user,
            topic_item,
        }
    }
}

impl Differentiable for SteGradient<'_> {
    type Params = TopicParams;

    fn objective(&self, params: &TopicParams) -> f64 {
        self.objective.topic(params)
    }

    fn gradient(&self, params: &TopicParams) -> TopicParams {
        self.calculate(params)
    }
}

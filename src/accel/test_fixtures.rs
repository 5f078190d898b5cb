// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Small synthetic problem shared by the tests.
//!
//! Three users, two items, two topics, two brands; one rating per user on a
//! 1–5 scale; trust edges 0 -> 1 (0.8) and 1 -> 2 (0.5).
use ndarray::array;

use crate::{
    config::Hypers,
    data::{Dataset, RatingScale},
    model::{BrandParams, TopicParams},
};

pub(crate) fn small_dataset() -> Dataset {
    let scale = RatingScale::new(1.0, 5.0).expect("valid scale");
    Dataset::from_triples(
        3,
        2,
        2,
        &[(0, 0, 4.0), (1, 1, 2.0), (2, 0, 5.0)],
        &[(0, 1, 0.8), (1, 2, 0.5)],
        scale,
    )
    .expect("valid dataset")
}

pub(crate) fn hypers() -> Hypers {
    Hypers {
        alpha: 0.6,
        topic_lambda: 0.05,
        brand_lambda: 0.08,
        weight_lambda: 0.3,
        decision_lambda: 0.2,
    }
}

pub(crate) fn topic_params() -> TopicParams {
    TopicParams {
        topic_user: array![[0.3, -0.2, 0.5], [0.1, 0.4, -0.3]],
        topic_item: array![[0.6, -0.1], [0.2, 0.7]],
    }
}

pub(crate) fn brand_params() -> BrandParams {
    BrandParams {
        topic_user: array![[0.3, -0.2, 0.5], [0.1, 0.4, -0.3]],
        topic_item: array![[0.6, -0.1], [0.2, 0.7]],
        brand_user: array![[0.2, 0.5, -0.4], [-0.3, 0.1, 0.6]],
        brand_item: array![[0.4, 0.3], [-0.2, 0.5]],
        decision_prefs: array![0.6, 0.3, 0.5],
    }
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Gradient calculators for the STE and SocBIT objectives.
//!
//! Gradients are taken of one half of the objective, so a regularizer
//! `lambda * |x|^2` contributes `lambda * x` and a squared error `e^2`
//! contributes `e * g'(score) * d score`.
use ndarray::Array2;

mod socbit;
mod ste;

pub use socbit::SocBitGradient;
pub use ste::SteGradient;

use crate::model::ParamSet;

/// A model the trainer can descend on: an objective and its gradient over
/// one parameter type.
pub trait Differentiable {
    type Params: ParamSet;

    fn objective(&self, params: &Self::Params) -> f64;

    fn gradient(&self, params: &Self::Params) -> Self::Params;
}

/// Mix personal parts with influencee parts.
///
/// Column `u` of `personal` is user `u`'s own error-weighted sum; the
/// influencee part of `u` collects the personal sums of every user `v` that
/// `u` influences, weighted by `w(u, v)`.
pub(crate) fn spread(personal: &Array2<f64>, weights: &Array2<f64>, alpha: f64) -> Array2<f64> {
    let influencee = personal.dot(&weights.t());
    personal * alpha + influencee * (1.0 - alpha)
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Python bindings for the trainer.
use std::path::PathBuf;

use numpy::{PyArray1, PyArray2, PyArrayMethods, ToPyArray};
use pyo3::prelude::*;

use crate::{
    config::{Hypers, TrainerConfig},
    data::{Dataset, RatingScale},
    errors::Error,
    model::{Estimator, Link, ModelKind, Params},
    trainer::{ObjectiveTrace, Trainer},
};

/// Train STE and SocBIT models on dense rating and trust matrices.
///
/// Parameters and the line-search step size persist between calls to
/// `train`, so repeated calls continue the same descent.
#[pyclass]
pub struct SocialTrainer {
    data: Dataset,
    model: ModelKind,
    hypers: Hypers,
    config: TrainerConfig,
    step_size: f64,
    params: Params,
    trace: ObjectiveTrace,
}

#[pymethods]
impl SocialTrainer {
    /// Instantiate a trainer. `NaN` entries in `ratings` are unobserved.
    #[new]
    #[pyo3(signature = (ratings, trust, num_brand, model, hypers, config, rating_min=0.0, rating_max=1.0))]
    #[allow(clippy::too_many_arguments)]
    fn new<'py>(
        ratings: Bound<'py, PyArray2<f64>>,
        trust: Bound<'py, PyArray2<f64>>,
        num_brand: usize,
        model: &str,
        hypers: Bound<'py, PyAny>,
        config: Bound<'py, PyAny>,
        rating_min: f64,
        rating_max: f64,
    ) -> PyResult<Self> {
        let hypers = Hypers::extract_bound(&hypers)?;
        let config = TrainerConfig::extract_bound(&config)?;
        hypers.validate().map_err(Error::from)?;
        config.validate().map_err(Error::from)?;
        let model: ModelKind = model.parse().map_err(Error::from)?;

        let scale = RatingScale::new(rating_min, rating_max).map_err(Error::from)?;
        let r_py = ratings.readonly();
        let t_py = trust.readonly();
        let data = Dataset::from_dense(r_py.as_array(), t_py.as_array(), num_brand, scale)
            .map_err(Error::from)?;

        let params = Params::initial(model, &data, &config);
        Ok(SocialTrainer {
            step_size: config.initial_step(),
            data,
            model,
            hypers,
            config,
            params,
            trace: ObjectiveTrace::new(),
        })
    }

    /// Run gradient descent from the current parameters.  Returns the outcome
    /// and the number of iterations.
    fn train(&mut self, py: Python<'_>) -> PyResult<(String, usize)> {
        let data = &self.data;
        let (model, hypers, config, step) = (self.model, self.hypers, self.config.clone(), self.step_size);
        let init = self.params.clone();
        let (result, step) = py.allow_threads(|| -> crate::errors::Result<_> {
            let mut trainer = Trainer::for_kind(data, model, hypers, config)?.with_step_size(step);
            let result = trainer.train(init)?;
            Ok((result, trainer.step_size()))
        })?;

        self.step_size = step;
        self.params = result.params;
        self.trace = result.trace;
        Ok((result.outcome.to_string(), result.iterations))
    }

    /// Objective value of the current parameters.
    fn objective(&self) -> PyResult<f64> {
        let trainer = Trainer::for_kind(&self.data, self.model, self.hypers, self.config.clone())?;
        Ok(trainer.objective(&self.params)?)
    }

    /// Predicted ratings for every user and item, on the input rating scale.
    fn predict<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        let est = Estimator::new(&self.data, self.hypers.alpha, Link::new(self.config.score_cutoff));
        est.predict(&self.params).to_pyarray(py)
    }

    fn topic_user<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.params.topic_user().to_pyarray(py)
    }

    fn topic_item<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.params.topic_item().to_pyarray(py)
    }

    fn brand_user<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray2<f64>>> {
        match &self.params {
            Params::Brand(p) => Some(p.brand_user.to_pyarray(py)),
            Params::Topic(_) => None,
        }
    }

    fn brand_item<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray2<f64>>> {
        match &self.params {
            Params::Brand(p) => Some(p.brand_item.to_pyarray(py)),
            Params::Topic(_) => None,
        }
    }

    fn decision_prefs<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray1<f64>>> {
        match &self.params {
            Params::Brand(p) => Some(p.decision_prefs.to_pyarray(py)),
            Params::Topic(_) => None,
        }
    }

    /// `(iteration, objective)` rows of the last training run.
    fn objective_trace(&self) -> Vec<(usize, f64)> {
        self.trace.rows().to_vec()
    }

    /// Write the last run's objective trace as CSV.
    fn save_trace(&self, path: PathBuf) -> PyResult<()> {
        self.trace.save(path)?;
        Ok(())
    }
}

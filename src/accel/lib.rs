// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Social-trust recommender optimization: STE and SocBIT gradients, the
//! regularized objective, and a backtracking gradient-descent trainer.

pub mod config;
pub mod data;
pub mod errors;
pub mod gradient;
pub mod model;
pub mod objective;
pub mod trainer;

#[cfg(feature = "python")]
mod python;
#[cfg(test)]
mod test_fixtures;

pub use config::{Hypers, TrainerConfig};
pub use data::{Dataset, RatingScale};
pub use errors::{ConfigError, DataError, Error, Result};
pub use model::{ModelKind, Params};
pub use trainer::{Outcome, Trainer, TrainingResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Entry point for the accelerator module.
#[cfg(feature = "python")]
#[pymodule]
fn _accel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_class::<python::SocialTrainer>()?;
    Ok(())
}

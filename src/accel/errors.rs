// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Error types for dataset construction, configuration, and training.
use thiserror::Error;

use crate::model::ModelKind;

/// Problems with hyperparameters or trainer settings.
///
/// These are raised before any numeric work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown model {0:?}, expected STE or SocBIT")]
    UnknownModel(String),
    #[error("invalid hyperparameter {name}: {value}")]
    InvalidHyper { name: &'static str, value: f64 },
    #[error("invalid trainer setting {name}: {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str,
    },
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Problems with the rating matrix or trust graph.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{what} has shape {actual:?}, expected {expected:?}")]
    Shape {
        what: &'static str,
        actual: (usize, usize),
        expected: (usize, usize),
    },
    #[error("trust weight ({from}, {to}) is {weight}, weights must lie in [0, 1]")]
    BadWeight { from: usize, to: usize, weight: f64 },
    #[error("{what} must be positive")]
    EmptyDimension { what: &'static str },
    #[error("{what} index {index} out of range for {bound} entries")]
    OutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    #[error("invalid rating scale [{min}, {max}]")]
    BadScale { min: f64, max: f64 },
    #[error("rating ({user}, {item}) is not finite")]
    BadRating { user: usize, item: usize },
}

/// Umbrella error for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("parameter set is for {params}, but the trainer runs {model}")]
    ParamModelMismatch { model: ModelKind, params: ModelKind },
    #[error("cannot write objective trace: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> pyo3::PyErr {
        use pyo3::exceptions::{PyOSError, PyValueError};
        match err {
            Error::Io(_) => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Hyperparameters and trainer settings.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};

/// Model hyperparameters.
///
/// `alpha` blends a user's own latent profile with the trust-weighted profiles
/// of the users who influence them; the lambdas weight the regularizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "python", derive(pyo3::FromPyObject))]
pub struct Hypers {
    pub alpha: f64,
    pub topic_lambda: f64,
    pub brand_lambda: f64,
    pub weight_lambda: f64,
    pub decision_lambda: f64,
}

impl Default for Hypers {
    fn default() -> Self {
        Hypers {
            alpha: 0.5,
            topic_lambda: 0.1,
            brand_lambda: 0.1,
            weight_lambda: 0.001,
            decision_lambda: 0.1,
        }
    }
}

impl Hypers {
    pub fn from_json(json: &str) -> Result<Hypers> {
        let hypers: Hypers = serde_json::from_str(json).map_err(ConfigError::from)?;
        hypers.validate()?;
        Ok(hypers)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidHyper {
                name: "alpha",
                value: self.alpha,
            });
        }
        let lambdas = [
            ("topic_lambda", self.topic_lambda),
            ("brand_lambda", self.brand_lambda),
            ("weight_lambda", self.weight_lambda),
            ("decision_lambda", self.decision_lambda),
        ];
        for (name, value) in lambdas {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidHyper { name, value });
            }
        }
        Ok(())
    }
}

/// Settings for the gradient-descent trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "python", derive(pyo3::FromPyObject))]
pub struct TrainerConfig {
    /// Number of latent topics.
    pub num_topic: usize,
    pub max_iter: usize,
    /// Training stops once successive objective values differ by no more than this.
    pub convergence_epsilon: f64,
    /// Geometric shrink factor for the line search; the first trial step is 1.
    pub shrink: f64,
    /// Armijo sufficient-decrease constant.
    pub gamma: f64,
    /// The line search gives up once the step falls to this floor.
    pub min_step: f64,
    /// Raw scores are clamped to `[-score_cutoff, score_cutoff]` before the link.
    pub score_cutoff: f64,
    /// Length of the initial latent vectors.
    pub init_scale: f64,
    /// Half-width of the uniform noise added to initial latent vectors.
    pub init_noise: f64,
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_topic: 10,
            max_iter: 100,
            convergence_epsilon: 1.0,
            shrink: 0.5,
            gamma: 1e-4,
            min_step: 1e-10,
            score_cutoff: 30.0,
            init_scale: 0.1,
            init_noise: 0.01,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    pub fn from_json(json: &str) -> Result<TrainerConfig> {
        let config: TrainerConfig = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TrainerConfig> {
        let text = std::fs::read_to_string(path)?;
        TrainerConfig::from_json(&text)
    }

    /// Initial step size; the first line-search trial is `shrink` times this.
    pub fn initial_step(&self) -> f64 {
        1.0 / self.shrink
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let fail = |name, reason| Err(ConfigError::InvalidSetting { name, reason });
        if self.num_topic == 0 {
            return fail("num_topic", "must be positive");
        }
        if !(self.shrink > 0.0 && self.shrink < 1.0) {
            return fail("shrink", "must be in (0, 1)");
        }
        if !(self.gamma >= 0.0) {
            return fail("gamma", "must be non-negative");
        }
        if !(self.min_step > 0.0) {
            return fail("min_step", "must be positive");
        }
        if !(self.convergence_epsilon >= 0.0) {
            return fail("convergence_epsilon", "must be non-negative");
        }
        if !(self.score_cutoff > 0.0) {
            return fail("score_cutoff", "must be positive");
        }
        if !(self.init_scale.is_finite() && self.init_noise >= 0.0) {
            return fail("init_noise", "must be finite and non-negative");
        }
        Ok(())
    }
}

#[test]
fn test_default_step_ladder() {
    let cfg = TrainerConfig::default();
    assert_eq!(cfg.initial_step(), 2.0);
    assert_eq!(cfg.initial_step() * cfg.shrink, 1.0);
}

#[test]
fn test_hypers_json() {
    let hypers = Hypers::from_json(r#"{"alpha": 0.7, "topic_lambda": 0.01}"#).unwrap();
    assert_eq!(hypers.alpha, 0.7);
    assert_eq!(hypers.topic_lambda, 0.01);
    assert_eq!(hypers.brand_lambda, Hypers::default().brand_lambda);
}

#[test]
fn test_hypers_reject_alpha() {
    assert!(Hypers::from_json(r#"{"alpha": 1.5}"#).is_err());
    let hypers = Hypers {
        decision_lambda: -1.0,
        ..Hypers::default()
    };
    assert!(hypers.validate().is_err());
}

#[test]
fn test_trainer_config_json() {
    let cfg = TrainerConfig::from_json(r#"{"num_topic": 4, "max_iter": 3}"#).unwrap();
    assert_eq!(cfg.num_topic, 4);
    assert_eq!(cfg.max_iter, 3);
    assert_eq!(cfg.gamma, 1e-4);
    assert!(TrainerConfig::from_json(r#"{"shrink": 1.0}"#).is_err());
    assert!(TrainerConfig::from_json("not json").is_err());
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Model variants and their parameters.
use std::{fmt, str::FromStr};

use rand::{rngs::StdRng, SeedableRng};

mod estimate;
mod link;
mod params;
mod residuals;

pub use estimate::{BrandScores, Estimator};
pub use link::{logistic, logistic_deriv, Link};
pub use params::{BrandParams, ParamDistances, ParamSet, TopicParams, NEUTRAL_PREF};
pub use residuals::Residuals;

use crate::{config::TrainerConfig, data::Dataset, errors::ConfigError};

/// The two supported model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Social trust ensemble over topic factors only.
    Ste,
    /// Topic and brand factors blended by per-user decision preferences.
    SocBit,
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ste") {
            Ok(ModelKind::Ste)
        } else if s.eq_ignore_ascii_case("socbit") {
            Ok(ModelKind::SocBit)
        } else {
            Err(ConfigError::UnknownModel(s.to_string()))
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Ste => f.write_str("STE"),
            ModelKind::SocBit => f.write_str("SocBIT"),
        }
    }
}

/// A parameter snapshot for either model variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Topic(TopicParams),
    Brand(BrandParams),
}

impl Params {
    /// The model variant these parameters belong to.
    pub fn kind(&self) -> ModelKind {
        match self {
            Params::Topic(_) => ModelKind::Ste,
            Params::Brand(_) => ModelKind::SocBit,
        }
    }

    /// Seeded initial parameters for `kind` on `ds`.
    pub fn initial(kind: ModelKind, ds: &Dataset, config: &TrainerConfig) -> Params {
        let mut rng = StdRng::seed_from_u64(config.seed);
        match kind {
            ModelKind::Ste => Params::Topic(TopicParams::init(
                config.num_topic,
                ds.num_user(),
                ds.num_item(),
                config.init_scale,
                config.init_noise,
                &mut rng,
            )),
            ModelKind::SocBit => Params::Brand(BrandParams::init(
                config.num_topic,
                ds.num_brand(),
                ds.num_user(),
                ds.num_item(),
                config.init_scale,
                config.init_noise,
                &mut rng,
            )),
        }
    }

    pub fn topic_user(&self) -> &ndarray::Array2<f64> {
        match self {
            Params::Topic(p) => &p.topic_user,
            Params::Brand(p) => &p.topic_user,
        }
    }

    pub fn topic_item(&self) -> &ndarray::Array2<f64> {
        match self {
            Params::Topic(p) => &p.topic_item,
            Params::Brand(p) => &p.topic_item,
        }
    }
}

impl From<TopicParams> for Params {
    fn from(p: TopicParams) -> Params {
        Params::Topic(p)
    }
}

impl From<BrandParams> for Params {
    fn from(p: BrandParams) -> Params {
        Params::Brand(p)
    }
}

#[test]
fn test_model_names() {
    assert_eq!("STE".parse::<ModelKind>().unwrap(), ModelKind::Ste);
    assert_eq!("ste".parse::<ModelKind>().unwrap(), ModelKind::Ste);
    assert_eq!("socBIT".parse::<ModelKind>().unwrap(), ModelKind::SocBit);
    assert_eq!("SOCBIT".parse::<ModelKind>().unwrap(), ModelKind::SocBit);
    assert!("brand".parse::<ModelKind>().is_err());
    assert!("".parse::<ModelKind>().is_err());
    assert_eq!(ModelKind::SocBit.to_string(), "SocBIT");
}

#[test]
fn test_initial_is_seeded() {
    let ds = crate::test_fixtures::small_dataset();
    let cfg = TrainerConfig {
        num_topic: 2,
        ..TrainerConfig::default()
    };
    let a = Params::initial(ModelKind::SocBit, &ds, &cfg);
    let b = Params::initial(ModelKind::SocBit, &ds, &cfg);
    assert_eq!(a, b);
    assert_eq!(a.kind(), ModelKind::SocBit);
    let c = Params::initial(ModelKind::Ste, &ds, &cfg);
    assert_eq!(c.kind(), ModelKind::Ste);
    assert_eq!(c.topic_user().dim(), (2, 3));
}

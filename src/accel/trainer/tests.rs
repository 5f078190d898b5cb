// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::{atomic::AtomicBool, Arc};

use ndarray::array;

use super::*;
use crate::{
    errors::ConfigError,
    model::{BrandParams, TopicParams},
    test_fixtures::{brand_params, hypers, small_dataset, topic_params},
};

fn config(max_iter: usize, convergence_epsilon: f64) -> TrainerConfig {
    TrainerConfig {
        num_topic: 2,
        max_iter,
        convergence_epsilon,
        ..TrainerConfig::default()
    }
}

fn assert_monotone(trace: &ObjectiveTrace) {
    let values = trace.values();
    for (n, w) in values.windows(2).enumerate() {
        let last = n + 2 == values.len();
        assert!(
            w[1] < w[0] || (last && w[1] == w[0]),
            "objective rose at step {}: {} -> {}",
            n + 1,
            w[0],
            w[1]
        );
    }
}

#[test]
fn test_unknown_model_rejected() {
    let ds = small_dataset();
    let err = Trainer::new(&ds, "PMF", hypers(), config(5, 1.0)).err().unwrap();
    assert!(matches!(err, Error::Config(ConfigError::UnknownModel(_))));
}

#[test]
fn test_invalid_hypers_rejected() {
    let ds = small_dataset();
    let bad = Hypers {
        alpha: -0.1,
        ..hypers()
    };
    assert!(Trainer::new(&ds, "STE", bad, config(5, 1.0)).is_err());
}

#[test]
fn test_param_model_mismatch() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "socbit", hypers(), config(5, 1.0)).unwrap();
    let err = trainer.train(Params::Topic(topic_params())).err().unwrap();
    assert!(matches!(
        err,
        Error::ParamModelMismatch {
            model: ModelKind::SocBit,
            params: ModelKind::Ste
        }
    ));
    // nothing ran, so the step size is untouched
    assert_eq!(trainer.step_size(), 2.0);
}

#[test]
fn test_param_shape_mismatch() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(5, 1.0)).unwrap();
    let bad = TopicParams::zeros(2, 4, 2);
    assert!(matches!(
        trainer.train(Params::Topic(bad)),
        Err(Error::Data(DataError::Shape { .. }))
    ));
    let mut trainer = Trainer::new(&ds, "SocBIT", hypers(), config(5, 1.0)).unwrap();
    let bad = BrandParams::zeros(2, 3, 3, 2);
    assert!(trainer.train(Params::Brand(bad)).is_err());
}

/// One STE iteration from fixed parameters, against values computed
/// independently for this problem.
#[test]
fn test_ste_one_iteration_regression() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(1, 1.0)).unwrap();
    let result = trainer.train(Params::Topic(topic_params())).unwrap();

    assert_eq!(result.iterations, 1);
    assert_eq!(result.outcome, Outcome::Converged);
    assert_eq!(trainer.step_size(), 1.0);

    let values = result.trace.values();
    assert_eq!(values.len(), 2);
    assert!((values[0] - 0.41618144598859713).abs() < 1e-9);
    assert!((values[1] - 0.39600260324924746).abs() < 1e-9);

    let expected_user = array![
        [0.3053739905019286, -0.17222104182075332, 0.5140605939556546],
        [0.08317929029733151, 0.35102874463687345, -0.2719798020147818]
    ];
    let expected_item = array![
        [0.6071284215005295, -0.09309649592238861],
        [0.18212249918983706, 0.6434269537870708]
    ];
    let params = match result.params {
        Params::Topic(p) => p,
        Params::Brand(_) => panic!("STE training returned SocBIT parameters"),
    };
    for (a, b) in params.topic_user.iter().zip(expected_user.iter()) {
        assert!((a - b).abs() < 1e-9);
    }
    for (a, b) in params.topic_item.iter().zip(expected_item.iter()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_ste_objective_decreases() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(25, 0.0)).unwrap();
    let init = Params::Topic(topic_params());
    let start = trainer.objective(&init).unwrap();
    let result = trainer.train(init).unwrap();
    assert_eq!(result.outcome, Outcome::IterationLimitReached);
    assert_eq!(result.trace.values()[0], start);
    assert_monotone(&result.trace);
    assert!(result.trace.last().unwrap() < start);
}

#[test]
fn test_socbit_objective_decreases() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "SocBIT", hypers(), config(25, 0.0)).unwrap();
    let result = trainer.train(Params::Brand(brand_params())).unwrap();
    assert_eq!(result.params.kind(), ModelKind::SocBit);
    assert_monotone(&result.trace);
    assert_eq!(result.trace.len(), result.iterations + 1);
    let final_value = trainer.objective(&result.params).unwrap();
    assert_eq!(Some(final_value), result.trace.last());
}

#[test]
fn test_decision_prefs_stay_near_unit_interval() {
    // preferences are updated without projection; with a centering penalty
    // and normalized ratings they should not wander far from [0, 1]
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "SocBIT", hypers(), config(30, 0.0)).unwrap();
    let init = trainer.initial_params();
    let result = trainer.train(init).unwrap();
    let prefs = match &result.params {
        Params::Brand(p) => p.decision_prefs.clone(),
        Params::Topic(_) => panic!("SocBIT training returned STE parameters"),
    };
    for d in prefs.iter() {
        assert!(d.is_finite());
        assert!(*d > -0.5 && *d < 1.5, "decision preference {} diverged", d);
    }
}

#[test]
fn test_step_size_carries_over() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "SocBIT", hypers(), config(10, 0.0)).unwrap();
    let first = trainer.train(Params::Brand(brand_params())).unwrap();
    let after_first = trainer.step_size();
    assert!(after_first <= 1.0);
    trainer.train(first.params).unwrap();
    assert!(trainer.step_size() <= after_first);
}

#[test]
fn test_line_search_exhaustion() {
    // an enormous Armijo constant makes every trial step insufficient
    let ds = small_dataset();
    let cfg = TrainerConfig {
        gamma: 1e9,
        min_step: 1e-3,
        ..config(10, 0.0)
    };
    let mut trainer = Trainer::new(&ds, "STE", hypers(), cfg).unwrap();
    let init = Params::Topic(topic_params());
    let result = trainer.train(init.clone()).unwrap();
    assert_eq!(result.outcome, Outcome::LineSearchExhausted);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.params, init);
    let values = result.trace.values();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], values[1]);
    assert!(trainer.step_size() <= 1e-3);
}

#[test]
fn test_exact_minimum_converges() {
    // no ratings, no trust, zero factors: the gradient vanishes and the first
    // trial step leaves the objective exactly where it was
    let ds = Dataset::from_triples(3, 2, 2, &[], &[], Default::default()).unwrap();
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(10, 0.0)).unwrap();
    let result = trainer.train(Params::Topic(TopicParams::zeros(2, 3, 2))).unwrap();
    assert_eq!(result.outcome, Outcome::Converged);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.trace.values(), vec![0.0, 0.0]);
}

#[test]
fn test_iteration_limit() {
    let ds = small_dataset();
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(3, 0.0)).unwrap();
    let result = trainer.train(Params::Topic(topic_params())).unwrap();
    assert_eq!(result.outcome, Outcome::IterationLimitReached);
    assert_eq!(result.iterations, 3);
    assert_eq!(result.trace.len(), 4);
}

#[test]
fn test_cancelled_before_start() {
    let ds = small_dataset();
    let flag = Arc::new(AtomicBool::new(true));
    let mut trainer = Trainer::new(&ds, "STE", hypers(), config(10, 0.0))
        .unwrap()
        .with_cancel(flag);
    let result = trainer.train(Params::Topic(topic_params())).unwrap();
    assert_eq!(result.outcome, Outcome::Cancelled);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.params, Params::Topic(topic_params()));
}

// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Batch gradient descent with backtracking line search.
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use log::*;
use ndarray::{Array1, Array2};

mod trace;

pub use trace::ObjectiveTrace;

use crate::{
    config::{Hypers, TrainerConfig},
    data::Dataset,
    errors::{DataError, Error, Result},
    gradient::{Differentiable, SocBitGradient, SteGradient},
    model::{Link, ModelKind, ParamSet, Params},
    objective::Objective,
};

/// How a training run ended.  None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Successive objective values differ by no more than the tolerance.
    Converged,
    /// The iteration budget ran out first.
    IterationLimitReached,
    /// The step size fell to its floor without a sufficient decrease; the
    /// parameters are those of the last accepted step.
    LineSearchExhausted,
    /// The cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Converged => "converged",
            Outcome::IterationLimitReached => "iteration limit reached",
            Outcome::LineSearchExhausted => "line search exhausted",
            Outcome::Cancelled => "cancelled",
        })
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingResult {
    pub params: Params,
    pub outcome: Outcome,
    pub iterations: usize,
    pub trace: ObjectiveTrace,
}

/// Result of one line search.
enum Step<P> {
    Accepted { params: P, value: f64 },
    Exhausted,
}

/// Gradient-descent trainer for one dataset and model variant.
///
/// The step size is trainer state: it starts at `1 / shrink` and only ever
/// shrinks, both within a line search and across outer iterations (and
/// across calls to [Trainer::train]).
pub struct Trainer<'a> {
    ds: &'a Dataset,
    model: ModelKind,
    hypers: Hypers,
    config: TrainerConfig,
    step_size: f64,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Trainer<'a> {
    /// Create a trainer for the model named `model` (`STE` or `SocBIT`, any case).
    pub fn new(ds: &'a Dataset, model: &str, hypers: Hypers, config: TrainerConfig) -> Result<Trainer<'a>> {
        let kind = model.parse()?;
        Trainer::for_kind(ds, kind, hypers, config)
    }

    pub fn for_kind(
        ds: &'a Dataset,
        model: ModelKind,
        hypers: Hypers,
        config: TrainerConfig,
    ) -> Result<Trainer<'a>> {
        hypers.validate()?;
        config.validate()?;
        Ok(Trainer {
            ds,
            model,
            hypers,
            step_size: config.initial_step(),
            config,
            cancel: None,
        })
    }

    /// Stop training at the next iteration boundary once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Resume from a step size reached by an earlier trainer.
    pub fn with_step_size(mut self, step: f64) -> Self {
        self.step_size = step;
        self
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    fn link(&self) -> Link {
        Link::new(self.config.score_cutoff)
    }

    /// Seeded initial parameters for this trainer's model.
    pub fn initial_params(&self) -> Params {
        Params::initial(self.model, self.ds, &self.config)
    }

    /// Objective value of a snapshot under this trainer's model.
    pub fn objective(&self, params: &Params) -> Result<f64> {
        self.check_params(params)?;
        Ok(Objective::new(self.ds, self.hypers, self.link()).value(params))
    }

    /// Run gradient descent from `init` until convergence, exhaustion of the
    /// iteration budget, line-search failure, or cancellation.
    pub fn train(&mut self, init: Params) -> Result<TrainingResult> {
        self.check_params(&init)?;
        info!(
            "training {} on {} users, {} items for at most {} iterations",
            self.model,
            self.ds.num_user(),
            self.ds.num_item(),
            self.config.max_iter
        );
        let link = self.link();
        if log_enabled!(Level::Debug) {
            let terms = Objective::new(self.ds, self.hypers, link).terms(&init);
            debug!("initial objective terms: {}", terms);
        }
        match init {
            Params::Topic(p) => {
                let calc = SteGradient::new(self.ds, self.hypers, link);
                let (params, outcome, iterations, trace) = self.descend(&calc, p);
                Ok(TrainingResult {
                    params: Params::Topic(params),
                    outcome,
                    iterations,
                    trace,
                })
            }
            Params::Brand(p) => {
                let calc = SocBitGradient::new(self.ds, self.hypers, link);
                let (params, outcome, iterations, trace) = self.descend(&calc, p);
                Ok(TrainingResult {
                    params: Params::Brand(params),
                    outcome,
                    iterations,
                    trace,
                })
            }
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn descend<M: Differentiable>(
        &mut self,
        model: &M,
        init: M::Params,
    ) -> (M::Params, Outcome, usize, ObjectiveTrace) {
        let mut trace = ObjectiveTrace::new();
        let mut current = init;
        let mut value = model.objective(&current);
        trace.push(0, value);
        debug!("iteration 0: objective {}", value);

        let mut iter = 0;
        let mut difference = f64::INFINITY;
        let outcome = loop {
            if difference.abs() <= self.config.convergence_epsilon {
                info!("converged to a local minimum after {} iterations", iter);
                break Outcome::Converged;
            }
            if iter >= self.config.max_iter {
                warn!(
                    "not converged after {} iterations (last change {:.4e}), training stopped",
                    iter, difference
                );
                break Outcome::IterationLimitReached;
            }
            if self.cancelled() {
                info!("training cancelled after {} iterations", iter);
                break Outcome::Cancelled;
            }

            iter += 1;
            let grad = model.gradient(&current);
            match self.line_search(model, &current, &grad, value) {
                Step::Accepted {
                    params,
                    value: next_value,
                } => {
                    if log_enabled!(Level::Trace) {
                        trace!("parameter changes: {}", params.distances(&current));
                    }
                    difference = next_value - value;
                    current = params;
                    value = next_value;
                    trace.push(iter, value);
                    debug!(
                        "iteration {}: objective {} (step {:.3e})",
                        iter, value, self.step_size
                    );
                }
                Step::Exhausted => {
                    trace.push(iter, value);
                    warn!(
                        "no sufficient decrease before step size fell to {:.3e}, training stopped",
                        self.step_size
                    );
                    break Outcome::LineSearchExhausted;
                }
            }
        };

        (current, outcome, iter, trace)
    }

    /// Backtrack from the current step size until the Armijo condition
    /// `f(next) - f(cur) < -(gamma / step) * |next - cur|^2` holds.
    fn line_search<M: Differentiable>(
        &mut self,
        model: &M,
        current: &M::Params,
        grad: &M::Params,
        value: f64,
    ) -> Step<M::Params> {
        while self.step_size > self.config.min_step {
            self.step_size *= self.config.shrink;
            let next = current.descend(grad, self.step_size);
            let next_value = model.objective(&next);
            let func_diff = next_value - value;
            if func_diff == 0.0 {
                info!("reached an exact local minimum");
                return Step::Accepted {
                    params: next,
                    value: next_value,
                };
            }
            let reduction = -self.config.gamma / self.step_size * next.sq_distance(current);
            if func_diff < reduction {
                return Step::Accepted {
                    params: next,
                    value: next_value,
                };
            }
            if !next_value.is_finite() {
                debug!("objective not finite at step {:.3e}", self.step_size);
            }
        }
        Step::Exhausted
    }

    /// Check that a parameter set belongs to this trainer's model and fits the dataset.
    fn check_params(&self, params: &Params) -> Result<()> {
        if params.kind() != self.model {
            return Err(Error::ParamModelMismatch {
                model: self.model,
                params: params.kind(),
            });
        }
        let nu = self.ds.num_user();
        let ni = self.ds.num_item();
        match params {
            Params::Topic(p) => {
                let k = p.topic_user.nrows();
                check_shape("topic_user", &p.topic_user, (k, nu))?;
                check_shape("topic_item", &p.topic_item, (k, ni))?;
            }
            Params::Brand(p) => {
                let k = p.topic_user.nrows();
                let nb = self.ds.num_brand();
                check_shape("topic_user", &p.topic_user, (k, nu))?;
                check_shape("topic_item", &p.topic_item, (k, ni))?;
                check_shape("brand_user", &p.brand_user, (nb, nu))?;
                check_shape("brand_item", &p.brand_item, (nb, ni))?;
                check_len("decision_prefs", &p.decision_prefs, nu)?;
            }
        }
        Ok(())
    }
}

fn check_shape(what: &'static str, m: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    if m.dim() == expected {
        Ok(())
    } else {
        Err(DataError::Shape {
            what,
            actual: m.dim(),
            expected,
        }
        .into())
    }
}

fn check_len(what: &'static str, v: &Array1<f64>, expected: usize) -> Result<()> {
    if v.len() == expected {
        Ok(())
    } else {
        Err(DataError::Shape {
            what,
            actual: (v.len(), 1),
            expected: (expected, 1),
        }
        .into())
    }
}

#[cfg(test)]
mod tests;

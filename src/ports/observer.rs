//! Observer ports - step-by-step visibility into a running strategy
//!
//! Observers see every step a strategy takes but cannot influence it:
//! they receive only shared references and their results never reach the
//! strategy. [`SearchObserver`] is what the strategies call directly;
//! [`RunObserver`] is the state-agnostic sink the pipelines fan events out
//! to.

use std::fmt;

use crate::Result;

/// Snapshot handed to an observer after each strategy step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a, S> {
    /// Step counter within the current run (0-based)
    pub step: usize,
    /// Current state, belief state or assignment
    pub state: &'a S,
    /// Short textual status, e.g. `"expand"` or `"reheat"`
    pub status: &'static str,
    /// Strategy-specific score (heuristic, fitness, temperature, reward)
    pub score: Option<f64>,
}

impl<'a, S> StepContext<'a, S> {
    pub fn new(step: usize, state: &'a S, status: &'static str) -> Self {
        Self {
            step,
            state,
            status,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Observer trait for monitoring a strategy run
///
/// Injected at call time as `&mut dyn SearchObserver<S>`; strategies never
/// store it.
///
/// # Examples
///
/// ```
/// use eight_puzzle::{
///     ports::{SearchObserver, StepContext},
///     puzzle::PuzzleState,
/// };
///
/// struct Counter(usize);
///
/// impl SearchObserver<PuzzleState> for Counter {
///     fn on_step(&mut self, _ctx: &StepContext<'_, PuzzleState>) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SearchObserver<S> {
    /// Called after each step. Does nothing by default.
    fn on_step(&mut self, _ctx: &StepContext<'_, S>) {}
}

/// Observer that ignores every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<S> SearchObserver<S> for NoopObserver {}

/// A strategy step with the state type erased.
#[derive(Clone, Copy)]
pub struct StepEvent<'a> {
    pub step: usize,
    pub state: &'a dyn fmt::Display,
    pub status: &'static str,
    pub score: Option<f64>,
}

impl fmt::Debug for StepEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepEvent")
            .field("step", &self.step)
            .field("state", &self.state.to_string())
            .field("status", &self.status)
            .field("score", &self.score)
            .finish()
    }
}

impl<'a, S: fmt::Display> From<&StepContext<'a, S>> for StepEvent<'a> {
    fn from(ctx: &StepContext<'a, S>) -> Self {
        Self {
            step: ctx.step,
            state: ctx.state,
            status: ctx.status,
            score: ctx.score,
        }
    }
}

/// Observer trait for monitoring a whole pipeline run
///
/// Errors returned by an observer abort nothing mid-run; the pipeline
/// reports the first one once the strategy has finished.
pub trait RunObserver {
    /// Called once before the strategy starts. `expected_steps` is known
    /// only for runs with a fixed length, such as training.
    fn on_run_start(&mut self, _label: &str, _expected_steps: Option<usize>) -> Result<()> {
        Ok(())
    }

    /// Called after each strategy step
    fn on_step(&mut self, _event: &StepEvent<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once after the strategy returns
    fn on_run_end(&mut self, _success: bool, _summary: &str) -> Result<()> {
        Ok(())
    }
}

//! Observer implementations for the pipelines
//!
//! Observers allow composable data collection during a run without coupling
//! the strategies to specific output formats.

use std::{cell::RefCell, fmt, rc::Rc};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{RunObserver, SearchObserver, StepContext, StepEvent},
};

/// Forwards strategy steps of any displayable state type to a set of run
/// observers.
///
/// The first observer error is kept and later steps are dropped; the
/// pipeline surfaces the error once the strategy returns.
pub(crate) struct Fanout<'a> {
    observers: &'a mut [Box<dyn RunObserver>],
    error: Option<Error>,
}

impl<'a> Fanout<'a> {
    pub(crate) fn new(observers: &'a mut [Box<dyn RunObserver>]) -> Self {
        Self {
            observers,
            error: None,
        }
    }

    pub(crate) fn finish(self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

impl<S: fmt::Display> SearchObserver<S> for Fanout<'_> {
    fn on_step(&mut self, ctx: &StepContext<'_, S>) {
        if self.error.is_some() || self.observers.is_empty() {
            return;
        }
        let event = StepEvent::from(ctx);
        for observer in self.observers.iter_mut() {
            if let Err(err) = observer.on_step(&event) {
                warn!("observer failed at step {}: {err}", event.step);
                self.error = Some(err);
                return;
            }
        }
    }
}

/// Logging observer - writes a debug line every `interval` steps
pub struct LoggingObserver {
    label: String,
    interval: usize,
    steps: usize,
}

impl LoggingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            label: String::new(),
            interval: interval.max(1),
            steps: 0,
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl RunObserver for LoggingObserver {
    fn on_run_start(&mut self, label: &str, expected_steps: Option<usize>) -> Result<()> {
        self.label = label.to_string();
        self.steps = 0;
        match expected_steps {
            Some(total) => info!("{label}: starting, {total} steps expected"),
            None => info!("{label}: starting"),
        }
        Ok(())
    }

    fn on_step(&mut self, event: &StepEvent<'_>) -> Result<()> {
        self.steps += 1;
        if self.steps.is_multiple_of(self.interval) {
            let state = event.state.to_string().replace('\n', "/");
            match event.score {
                Some(score) => debug!(
                    "{}: step {} {} [{state}] score {score:.3}",
                    self.label, event.step, event.status
                ),
                None => debug!("{}: step {} {} [{state}]", self.label, event.step, event.status),
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self, _success: bool, summary: &str) -> Result<()> {
        info!("{summary} ({} observed steps)", self.steps);
        Ok(())
    }
}

/// Progress bar observer - shows run progress on the terminal
///
/// Runs with a known length get a bar; open-ended searches get a spinner
/// counting steps.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

fn template_error(e: impl fmt::Display) -> Error {
    Error::ProgressBarTemplate {
        message: e.to_string(),
    }
}

impl RunObserver for ProgressObserver {
    fn on_run_start(&mut self, label: &str, expected_steps: Option<usize>) -> Result<()> {
        self.successes = 0;
        let pb = match expected_steps {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {prefix} (S:{msg})",
                        )
                        .map_err(template_error)?
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner} [{elapsed_precise}] {prefix}: {pos} steps {msg}")
                        .map_err(template_error)?,
                );
                pb
            }
        };
        pb.set_prefix(label.to_string());
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(&mut self, event: &StepEvent<'_>) -> Result<()> {
        if event.status == "solved" {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            match pb.length() {
                Some(_) => {
                    pb.set_position(event.step as u64 + 1);
                    pb.set_message(self.successes.to_string());
                }
                None => pb.inc(1),
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self, _success: bool, summary: &str) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            match pb.length() {
                Some(_) => pb.finish_with_message(self.successes.to_string()),
                None => pb.finish_with_message(summary.to_string()),
            }
        }
        Ok(())
    }
}

/// One step as captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedStep {
    pub step: usize,
    pub state: String,
    pub status: String,
    pub score: Option<f64>,
}

/// Shared handle to the steps captured by a [`RecordingObserver`].
pub type RecordedSteps = Rc<RefCell<Vec<RecordedStep>>>;

/// Recording observer - keeps every step in memory
///
/// The pipeline takes ownership of its observers, so the recording is read
/// through the handle returned by [`RecordingObserver::events`].
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RecordedSteps,
    limit: Option<usize>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop recording after `limit` steps.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn events(&self) -> RecordedSteps {
        Rc::clone(&self.events)
    }
}

impl RunObserver for RecordingObserver {
    fn on_run_start(&mut self, _label: &str, _expected_steps: Option<usize>) -> Result<()> {
        self.events.borrow_mut().clear();
        Ok(())
    }

    fn on_step(&mut self, event: &StepEvent<'_>) -> Result<()> {
        let mut events = self.events.borrow_mut();
        if self.limit.is_none_or(|limit| events.len() < limit) {
            events.push(RecordedStep {
                step: event.step,
                state: event.state.to_string(),
                status: event.status.to_string(),
                score: event.score,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleState;

    struct Failing;

    impl RunObserver for Failing {
        fn on_step(&mut self, _event: &StepEvent<'_>) -> Result<()> {
            Err(Error::invalid_config("observer refused"))
        }
    }

    #[test]
    fn test_fanout_reaches_every_observer() {
        let first = RecordingObserver::new();
        let second = RecordingObserver::new().with_limit(1);
        let (a, b) = (first.events(), second.events());
        let mut observers: Vec<Box<dyn RunObserver>> = vec![Box::new(first), Box::new(second)];

        let mut fanout = Fanout::new(&mut observers);
        let state = PuzzleState::GOAL;
        fanout.on_step(&StepContext::new(0, &state, "expand"));
        fanout.on_step(&StepContext::new(1, &state, "expand").with_score(2.0));
        fanout.finish().unwrap();

        assert_eq!(a.borrow().len(), 2);
        assert_eq!(b.borrow().len(), 1);
        assert_eq!(a.borrow()[1].score, Some(2.0));
        assert_eq!(a.borrow()[0].state, "1 2 3\n4 5 6\n7 8 0");
    }

    #[test]
    fn test_fanout_keeps_first_error() {
        let recorder = RecordingObserver::new();
        let events = recorder.events();
        let mut observers: Vec<Box<dyn RunObserver>> = vec![Box::new(Failing), Box::new(recorder)];

        let mut fanout = Fanout::new(&mut observers);
        fanout.on_step(&StepContext::new(0, &1u8, "x"));
        fanout.on_step(&StepContext::new(1, &2u8, "x"));
        assert!(fanout.finish().is_err());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_progress_observer_lifecycle() {
        let mut progress = ProgressObserver::new();
        progress.on_run_start("training", Some(2)).unwrap();
        let state = PuzzleState::GOAL;
        let ctx = StepContext::new(0, &state, "solved");
        progress.on_step(&StepEvent::from(&ctx)).unwrap();
        progress.on_run_end(true, "done").unwrap();
        assert_eq!(progress.successes, 1);
        assert!(progress.progress_bar.is_none());
    }

    #[test_log::test]
    fn test_logging_observer_counts_steps() {
        let mut logging = LoggingObserver::new(1);
        logging.on_run_start("BFS", None).unwrap();
        let state = PuzzleState::GOAL;
        let ctx = StepContext::new(0, &state, "expand").with_score(1.0);
        logging.on_step(&StepEvent::from(&ctx)).unwrap();
        logging.on_run_end(true, "BFS: solved").unwrap();
        assert_eq!(logging.steps, 1);
    }
}

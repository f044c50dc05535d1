//! Ports (trait boundaries) between the search core and its drivers.
//!
//! Strategies report progress through these traits without knowing whether
//! the caller is a CLI, a test harness or a GUI.

pub mod observer;

pub use observer::{NoopObserver, RunObserver, SearchObserver, StepContext, StepEvent};

//! Export functionality for solve reports
//!
//! This module renders a [`SolveReport`](crate::pipeline::SolveReport) as a
//! plain-text trace listing the run statistics and every state visited.

mod trace;

pub use trace::TraceReport;

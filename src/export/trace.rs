//! Plain-text trace of a solve run

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    Error, Result,
    pipeline::{Solution, SolveReport},
};

/// Trace report for one [`SolveReport`]
///
/// ```text
/// Algorithm: A* Search
/// Time: 0.001s
/// Steps: 1
/// Nodes explored: 2
///
/// Path:
///
/// Step 0:
/// 1 2 3
/// 4 5 6
/// 7 0 8
/// ...
/// ```
///
/// AND-OR plans and belief-state action sequences are appended after the
/// path.
#[derive(Debug, Clone, Copy)]
pub struct TraceReport<'a> {
    report: &'a SolveReport,
}

impl<'a> TraceReport<'a> {
    pub fn new(report: &'a SolveReport) -> Self {
        Self { report }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the report to `path`, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| Error::Io {
            operation: format!("write trace to {}", path.display()),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        write!(writer, "{self}").map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }
}

impl fmt::Display for TraceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "Algorithm: {}", report.algorithm.name())?;
        writeln!(f, "Time: {:.3}s", report.elapsed.as_secs_f64())?;
        writeln!(f, "Steps: {}", report.steps())?;
        writeln!(f, "Nodes explored: {}", report.nodes_explored)?;
        if let Some(failure) = report.failure {
            writeln!(f, "Result: {failure}")?;
        }

        writeln!(f)?;
        writeln!(f, "Path:")?;
        for (i, state) in report.states.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Step {i}:")?;
            writeln!(f, "{state}")?;
        }

        match &report.solution {
            Some(Solution::Plan(plan)) => {
                writeln!(f)?;
                writeln!(f, "Plan:")?;
                write!(f, "{plan}")?;
            }
            Some(Solution::Actions(moves)) => {
                let names: Vec<&str> = moves.iter().map(|mv| mv.as_str()).collect();
                writeln!(f)?;
                writeln!(f, "Actions: {}", names.join(", "))?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        pipeline::Algorithm,
        puzzle::{Move, PuzzleState},
        search::Failure,
    };

    fn report(solution: Option<Solution>, states: Vec<PuzzleState>) -> SolveReport {
        SolveReport {
            algorithm: Algorithm::AStar,
            elapsed: Duration::from_millis(1500),
            failure: solution.is_none().then_some(Failure::Exhausted),
            solution,
            nodes_explored: 2,
            states,
            training: None,
        }
    }

    #[test]
    fn test_render_path() {
        let start: PuzzleState = "123456708".parse().unwrap();
        let path = vec![start, PuzzleState::GOAL];
        let report = report(Some(Solution::Path(path.clone())), path);
        let text = TraceReport::new(&report).render();
        let expected = "\
Algorithm: A* Search
Time: 1.500s
Steps: 1
Nodes explored: 2

Path:

Step 0:
1 2 3
4 5 6
7 0 8

Step 1:
1 2 3
4 5 6
7 8 0
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_failure_and_actions() {
        let failed = report(None, Vec::new());
        let text = TraceReport::new(&failed).render();
        assert!(text.contains("Result: search space exhausted"));
        assert!(text.contains("Steps: 0"));

        let actions = report(Some(Solution::Actions(vec![Move::Down, Move::Right])), Vec::new());
        let text = TraceReport::new(&actions).render();
        assert!(text.ends_with("Actions: DOWN, RIGHT\n"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.txt");
        let goal = PuzzleState::GOAL;
        let report = report(Some(Solution::Path(vec![goal])), vec![goal]);
        TraceReport::new(&report).write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, TraceReport::new(&report).render());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trace.txt");
        let report = report(None, Vec::new());
        let err = TraceReport::new(&report).write_to(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}

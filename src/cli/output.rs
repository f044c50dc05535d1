//! Plain-text panels for command output

use std::fmt;

use crate::puzzle::Move;

/// A titled block of label/value fields followed by free-form sections.
///
/// Labels are padded to the longest one in the panel. Section bodies are
/// indented line by line, so multi-line values such as grids and plans keep
/// their shape.
#[derive(Debug, Clone)]
pub struct Panel {
    title: String,
    rule: char,
    fields: Vec<(String, String)>,
    sections: Vec<(String, String)>,
}

impl Panel {
    /// Top-level panel, underlined with `=`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rule: '=',
            fields: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Panel nested under another one, underlined with `-`.
    pub fn nested(title: impl Into<String>) -> Self {
        Self {
            rule: '-',
            ..Self::new(title)
        }
    }

    pub fn field(mut self, label: &str, value: impl fmt::Display) -> Self {
        self.fields.push((label.to_string(), value.to_string()));
        self
    }

    pub fn count(self, label: &str, n: usize) -> Self {
        self.field(label, group_digits(n))
    }

    pub fn flag(self, label: &str, on: bool) -> Self {
        self.field(label, if on { "yes" } else { "no" })
    }

    pub fn percent(self, label: &str, ratio: f64) -> Self {
        self.field(label, format!("{:.1}%", ratio * 100.0))
    }

    pub fn section(mut self, heading: &str, body: impl fmt::Display) -> Self {
        self.sections.push((heading.to_string(), body.to_string()));
        self
    }

    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.title)?;
        let rule_len = self.title.chars().count().max(20);
        writeln!(f, "{}", self.rule.to_string().repeat(rule_len))?;

        let width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count() + 1)
            .max()
            .unwrap_or(0);
        for (label, value) in &self.fields {
            writeln!(f, "  {:width$} {value}", format!("{label}:"))?;
        }

        for (heading, body) in &self.sections {
            writeln!(f)?;
            writeln!(f, "{heading}:")?;
            for line in body.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

/// Decimal digits in groups of three: `181440` renders as `181,440`.
pub fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let head = match digits.len() % 3 {
        0 => 3,
        r => r,
    };
    let mut grouped = digits[..head].to_string();
    for start in (head..digits.len()).step_by(3) {
        grouped.push(',');
        grouped.push_str(&digits[start..start + 3]);
    }
    grouped
}

/// Space-separated move names, or `(none)` for an empty sequence.
pub fn move_line(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "(none)".to_string();
    }
    moves.iter().map(|mv| mv.as_str()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleState;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(181_440), "181,440");
        assert_eq!(group_digits(1_234_567), "1,234,567");
    }

    #[test]
    fn test_move_line() {
        assert_eq!(move_line(&[Move::Up, Move::Left]), "UP LEFT");
        assert_eq!(move_line(&[]), "(none)");
    }

    #[test]
    fn test_panel_aligns_labels_and_indents_sections() {
        let rendered = Panel::new("A*")
            .field("Outcome", "solved")
            .count("Nodes explored", 12_345)
            .flag("Solvable", true)
            .section("Path", PuzzleState::GOAL)
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "A*");
        assert_eq!(lines[2], "=".repeat(20));
        assert_eq!(lines[3], "  Outcome:        solved");
        assert_eq!(lines[4], "  Nodes explored: 12,345");
        assert_eq!(lines[5], "  Solvable:       yes");
        assert_eq!(lines[7], "Path:");
        assert_eq!(&lines[8..], ["  1 2 3", "  4 5 6", "  7 8 0"]);
    }

    #[test]
    fn test_nested_panel_rule() {
        let rendered = Panel::nested("Training").percent("Success rate", 0.25).to_string();
        assert!(rendered.contains(&"-".repeat(20)));
        assert!(rendered.contains("Success rate: 25.0%"));
    }
}

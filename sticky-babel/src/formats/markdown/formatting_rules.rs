use serde::{Deserialize, Serialize};

/// Canonicalization knobs shared by the markdown parser and serializer.
///
/// Both directions read the same rules object, so a line the parser reads as
/// list depth 1 is exactly what the serializer writes back with
/// `indent_width` leading spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingRules {
    /// Columns of indentation per nesting level
    pub indent_width: usize,

    /// Columns a tab character counts for when measuring indentation
    pub tab_width: usize,

    /// The character written for bullet and task list markers
    pub bullet_marker: char,

    /// Maximum number of consecutive blank lines kept between blocks
    pub max_blank_lines: usize,
}

impl FormattingRules {
    /// Indentation width, never zero.
    pub fn indent_unit(&self) -> usize {
        self.indent_width.max(1)
    }

    /// Bullet marker, falling back to `-` for anything markdown would not read as a bullet.
    pub fn marker(&self) -> char {
        if matches!(self.bullet_marker, '-' | '*' | '+') {
            self.bullet_marker
        } else {
            '-'
        }
    }

    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_unit() * depth)
    }

    /// Measures the leading whitespace of `line` and converts it to a depth tier.
    ///
    /// Odd column counts round down, so three spaces with the default width is
    /// depth 1. A tab is worth `tab_width` columns.
    pub fn depth_of(&self, line: &str) -> usize {
        let columns: usize = line
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(|c| if c == '\t' { self.tab_width } else { 1 })
            .sum();
        columns / self.indent_unit()
    }
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self {
            indent_width: 2,
            tab_width: 2,
            bullet_marker: '-',
            max_blank_lines: 1,
        }
    }
}

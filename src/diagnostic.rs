//! Diagnostics shared by the tokenizer and the parser, and the renderer that
//! turns them into caret-annotated source excerpts.

use std::fmt;

/// ANSI color codes for terminal output.
mod colors {
    pub const NAME: &str = "\x1b[93m"; // Yellow
    pub const ERROR: &str = "\x1b[91m"; // Red
    pub const LINE: &str = "\x1b[96m"; // Cyan
    pub const CARET: &str = "\x1b[95m"; // Magenta
    pub const RESET: &str = "\x1b[0m";
}

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Malformed token: unclosed string, malformed number, bad character, unbalanced nesting
    Syntax,
    /// Malformed structure: duplicate declaration, misplaced symbol, missing type
    Parse,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Syntax => write!(f, "Syntax"),
            Category::Parse => write!(f, "Parse"),
        }
    }
}

/// A fatal problem at a source position. Columns are 1-indexed and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category} error at {line}:{column}: {message}")]
pub struct Diagnostic {
    pub category: Category,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
}

impl Diagnostic {
    /// Diagnostic pointing at a single column
    pub fn at(category: Category, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            category,
            message: message.into(),
            line,
            column,
            end_column: column,
        }
    }

    pub fn spanning(mut self, end_column: usize) -> Self {
        self.end_column = end_column.max(self.column);
        self
    }
}

/// Non-fatal internal warning; parsing continues with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Failed compilation of one unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_name}: {}", first_message(.diagnostics))]
pub struct CompileError {
    pub source_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    pub fn new(source_name: &str, diagnostic: Diagnostic) -> Self {
        Self {
            source_name: source_name.to_string(),
            diagnostics: vec![diagnostic],
        }
    }

    /// The diagnostic that stopped compilation
    pub fn primary(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "compilation failed".to_string())
}

/// Color output mode for the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Formats diagnostics against the text of one compilation unit.
///
/// Source lines are split once at construction; every render reuses them.
#[derive(Debug, Clone)]
pub struct Renderer {
    source_name: String,
    lines: Vec<String>,
    colors: bool,
}

impl Renderer {
    pub fn new(text: &str, source_name: &str) -> Self {
        let mut lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        // A final newline ends the last line, it does not start another
        if text.ends_with('\n') {
            lines.pop();
        }

        Self {
            source_name: source_name.to_string(),
            lines,
            colors: false,
        }
    }

    pub fn with_color_mode(mut self, mode: ColorMode, is_tty: bool) -> Self {
        self.colors = mode.should_use_colors(is_tty);
        self
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Render a diagnostic as a header, the offending line with its
    /// neighbours elided, and a caret run under the reported columns.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let line_num = diagnostic.line.max(1);
        let line_text = self
            .lines
            .get(line_num - 1)
            .map(String::as_str)
            .unwrap_or("");

        let mut out = format!(
            "PyToASM: {} {}\n",
            self.paint(colors::NAME, &self.source_name),
            self.paint(colors::ERROR, &format!("{} Error!", diagnostic.category)),
        );

        if line_num > 1 {
            out.push_str(&format!("{} | ...\n", line_num - 1));
        }

        let gutter = format!("{line_num} ");
        out.push_str(&format!("{}| {}\n", self.paint(colors::LINE, &gutter), line_text));

        // "N | " prefix, then one space per column before the caret
        let pad = gutter.len() + 2 + diagnostic.column.saturating_sub(1);
        let carets = "^".repeat(diagnostic.end_column.saturating_sub(diagnostic.column) + 1);
        out.push_str(&" ".repeat(pad));
        out.push_str(&self.paint(colors::CARET, &format!("{carets} {}", diagnostic.message)));
        out.push('\n');

        if line_num < self.lines.len() {
            out.push_str(&format!("{} | ...\n", line_num + 1));
        }

        out
    }

    pub fn render_warning(&self, warning: &Warning) -> String {
        self.paint(
            colors::NAME,
            &format!(
                "PyToASM: Internal warning in {}; {}",
                self.source_name, warning
            ),
        )
    }
}

//! Runs one compilation unit through the front end and reports the outcome
//! the way the command line shows it: listings on `out`, diagnostics and
//! warnings on `err`.

use std::io::{self, Write};

use crate::compile_text;
use crate::diagnostic::{ColorMode, Renderer};
use crate::limits::CompilerLimits;

/// Listing printed for a unit that compiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    Tokens,
    #[default]
    Ast,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub output: Output,
    pub color: ColorMode,
    pub is_tty: bool, // whether `err` is a terminal
}

/// Compile `text` and write the report. Returns whether the unit compiled.
pub fn run_unit<O: Write, E: Write>(
    text: &str,
    source_name: &str,
    limits: &CompilerLimits,
    options: RunOptions,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool> {
    let renderer = Renderer::new(text, source_name).with_color_mode(options.color, options.is_tty);

    match compile_text(text, source_name, limits) {
        Ok(unit) => {
            for warning in &unit.warnings {
                writeln!(err, "{}", renderer.render_warning(warning))?;
            }
            let listing = match options.output {
                Output::Tokens => unit.tokens.render(),
                Output::Ast => unit.ast.render(),
            };
            out.write_all(listing.as_bytes())?;
            Ok(true)
        }
        Err(error) => {
            for diagnostic in &error.diagnostics {
                err.write_all(renderer.render(diagnostic).as_bytes())?;
            }
            Ok(false)
        }
    }
}

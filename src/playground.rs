//! Interactive read-eval loop.
//!
//! Lines accumulate until a line reading exactly `RUN`, which compiles the
//! accumulated text as one unit and starts over. `EXIT` or end of input leaves.

use std::io::{self, BufRead, Write};

use crate::driver::{self, RunOptions};
use crate::limits::CompilerLimits;

pub const BANNER: &str = "PyToASM CLI mode.\nType RUN to run code or EXIT.\n";
pub const PROMPT: &str = ">>> ";

/// Name diagnostics use for playground input
pub const SOURCE_NAME: &str = "CLI";

pub struct Playground<'a> {
    limits: &'a CompilerLimits,
    options: RunOptions,
    pending: String,
}

impl<'a> Playground<'a> {
    pub fn new(limits: &'a CompilerLimits, options: RunOptions) -> Self {
        Self {
            limits,
            options,
            pending: String::new(),
        }
    }

    pub fn run<R: BufRead, O: Write, E: Write>(
        &mut self,
        input: R,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()> {
        out.write_all(BANNER.as_bytes())?;
        let mut lines = input.lines();

        loop {
            out.write_all(PROMPT.as_bytes())?;
            out.flush()?;

            let Some(line) = lines.next() else {
                // Leave the terminal on a fresh line
                writeln!(out)?;
                break;
            };
            let line = line?;

            match line.trim_end_matches('\r') {
                "EXIT" => break,
                "RUN" => self.run_pending(out, err)?,
                code => {
                    self.pending.push_str(code);
                    self.pending.push('\n');
                }
            }
        }

        tracing::debug!("playground closed");
        Ok(())
    }

    fn run_pending<O: Write, E: Write>(&mut self, out: &mut O, err: &mut E) -> io::Result<()> {
        if self.pending.trim().is_empty() {
            writeln!(out, "PyToASM: No code to process.")?;
        } else {
            let ok = driver::run_unit(&self.pending, SOURCE_NAME, self.limits, self.options, out, err)?;
            tracing::debug!(ok, bytes = self.pending.len(), "playground unit");
        }
        self.pending.clear();
        Ok(())
    }
}

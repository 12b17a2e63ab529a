//! PyToASM front end: source text to classified tokens to an AST, with
//! scope-aware name analysis and caret-annotated diagnostics.

pub mod ast;
pub mod buffer;
pub mod cli;
pub mod diagnostic;
pub mod driver;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod playground;

use ast::Ast;
use diagnostic::{CompileError, Diagnostic, Warning};
use lexer::Tokens;
use limits::CompilerLimits;

/// Everything produced for one unit that compiled
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Tokens,
    pub ast: Ast,
    pub warnings: Vec<Warning>,
}

/// Tokenize, classify and parse `text`. `source_name` labels diagnostics.
pub fn compile_text(
    text: &str,
    source_name: &str,
    limits: &CompilerLimits,
) -> Result<Compilation, CompileError> {
    let _span = tracing::debug_span!("compile", source = source_name).entered();
    let fail = |diagnostic: Diagnostic| CompileError::new(source_name, diagnostic);

    let tokens = lexer::lex(text, limits).map_err(fail)?;
    let parsed = parser::parse(&tokens, limits).map_err(fail)?;

    Ok(Compilation {
        tokens,
        ast: parsed.ast,
        warnings: parsed.warnings,
    })
}

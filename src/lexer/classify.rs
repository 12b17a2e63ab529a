use super::error::LexErrorKind;
use super::token::{TokenKind, Tokens};
use crate::diagnostic::Diagnostic;

pub const KEYWORDS: &[&str] = &[
    "class", "and", "as", "async", "await", "break", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "end",
];

pub const TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "string", "boolean",
];

/// Final kind of an identifier spelling, in priority order:
/// keyword, type name, boolean, none. `None` keeps it an identifier.
pub fn promote(text: &str) -> Option<TokenKind> {
    if KEYWORDS.contains(&text) {
        Some(TokenKind::Keyword)
    } else if TYPES.contains(&text) {
        Some(TokenKind::Type)
    } else if text == "True" || text == "False" {
        Some(TokenKind::Boolean)
    } else if text == "None" {
        Some(TokenKind::None)
    } else {
        None
    }
}

/// One pass over a finished sequence: upgrade identifier kinds and check that
/// every opened parenthesis is closed.
pub fn classify(tokens: &mut Tokens) -> Result<(), Diagnostic> {
    let mut balance: i64 = 0;

    for token in tokens.iter_mut() {
        match token.kind {
            TokenKind::Identifier => {
                if let Some(kind) = promote(&token.text) {
                    tracing::trace!(text = %token.text, ?kind, "reclassified");
                    token.kind = kind;
                }
            }
            TokenKind::OpenParen => balance += 1,
            TokenKind::CloseParen => balance -= 1,
            _ => {}
        }
    }

    if balance != 0 {
        tracing::debug!(balance, "unbalanced parentheses");
        // Non-zero balance implies at least one token
        let (line, column) = tokens
            .last()
            .map_or((1, 1), |last| (last.line, last.end_column + 1));
        return Err(LexErrorKind::UnclosedScope.at(line, column));
    }

    Ok(())
}

use crate::buffer::BufferError;
use crate::diagnostic::{Category, Diagnostic};

/// Everything the tokenizer and the classifier can reject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("Unclosed string literal.")]
    UnclosedString,
    #[error("Invalid escape character.")]
    InvalidEscape,
    #[error("Malformed number.")]
    MalformedNumber,
    #[error("Bad character.")]
    BadCharacter,
    #[error("Unclosed scope.")]
    UnclosedScope,
    #[error("Unclosed comment.")]
    UnclosedComment,
    #[error("Input too large: {size} bytes (max: {max} bytes).")]
    InputTooLarge { size: usize, max: usize },
    #[error("Token limit exceeded (max: {max}).")]
    TooManyTokens { max: usize },
    #[error("Identifier too long (max: {max} bytes).")]
    IdentifierTooLong { max: usize },
    #[error("String literal too long (max: {max} bytes).")]
    StringTooLong { max: usize },
    #[error("Comment too long (max: {max} bytes).")]
    CommentTooLong { max: usize },
    #[error("Internal scratch buffer error: {0}")]
    Buffer(#[from] BufferError),
}

impl LexErrorKind {
    pub fn at(self, line: usize, column: usize) -> Diagnostic {
        Diagnostic::at(Category::Syntax, self.to_string(), line, column)
    }
}

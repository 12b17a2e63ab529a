// Lexer module - splits tokenizing into logical components
mod classify;
mod error;
mod token;

pub use classify::{KEYWORDS, TYPES, classify, promote};
pub use error::LexErrorKind;
pub use token::{Token, TokenKind, Tokens};

use std::str::Chars;

use bitflags::bitflags;

use crate::buffer::ScratchBuffer;
use crate::diagnostic::Diagnostic;
use crate::limits::CompilerLimits;

const SCRATCH_CAPACITY: usize = 64;

bitflags! {
    /// Comment state carried between scanner calls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct CommentFlags: u8 {
        /// Characters are being suppressed.
        const ACTIVE = 1 << 0;
        /// Opened by a triple quote; a newline does not close it.
        const MULTILINE = 1 << 1;
        /// The triple quote was `"""` rather than `'''`.
        const DOUBLE_QUOTED = 1 << 2;
    }
}

/// Source position captured when a token starts
#[derive(Debug, Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
    offset: usize,
}

// Lexer

pub struct Lexer<'a> {
    chars: Chars<'a>,
    line: usize,
    column: usize,
    traversed: usize, // monotonic, reset only on construction
    comment: CommentFlags,
    comment_start: Mark,
    comment_len: usize,
    scratch: ScratchBuffer,
    pending: Option<Mark>, // start of the identifier run held in `scratch`
    tokens: Tokens,
    limits: &'a CompilerLimits,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, limits: &'a CompilerLimits) -> Result<Self, Diagnostic> {
        if source.len() > limits.max_input_size {
            return Err(LexErrorKind::InputTooLarge {
                size: source.len(),
                max: limits.max_input_size,
            }
            .at(1, 1));
        }

        let start = Mark {
            line: 1,
            column: 1,
            offset: 0,
        };

        Ok(Self {
            chars: source.chars(),
            line: 1,
            column: 1,
            traversed: 0,
            comment: CommentFlags::empty(),
            comment_start: start,
            comment_len: 0,
            scratch: ScratchBuffer::with_capacity(SCRATCH_CAPACITY),
            pending: None,
            tokens: Tokens::new(),
            limits,
        })
    }

    // Character navigation methods

    fn peek_char(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    fn consume_char(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.traversed += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.traversed,
        }
    }

    fn error_here(&self, kind: LexErrorKind) -> Diagnostic {
        kind.at(self.line, self.column)
    }

    fn at_triple_quote(&self, quote: char) -> bool {
        self.peek_nth(1) == Some(quote) && self.peek_nth(2) == Some(quote)
    }

    fn buffer_char(&mut self, ch: char) -> Result<(), Diagnostic> {
        let (line, column) = (self.line, self.column);
        self.scratch
            .push(ch)
            .map_err(|e| LexErrorKind::from(e).at(line, column))
    }

    // Token output

    fn emit(
        &mut self,
        kind: TokenKind,
        text: String,
        start: Mark,
        source_len: usize,
    ) -> Result<(), Diagnostic> {
        if self.tokens.len() >= self.limits.max_token_count {
            return Err(LexErrorKind::TooManyTokens {
                max: self.limits.max_token_count,
            }
            .at(start.line, start.column));
        }

        tracing::trace!(?kind, text = %text.escape_debug(), line = start.line, column = start.column, "token");
        self.tokens.push(Token::new(
            kind,
            text,
            start.line,
            start.column,
            start.offset,
            source_len,
        ));
        Ok(())
    }

    /// Emit the pending identifier run, if any
    fn flush_identifier(&mut self) -> Result<(), Diagnostic> {
        if let Some(start) = self.pending.take() {
            let text = self.scratch.take();
            let len = text.chars().count();
            self.emit(TokenKind::Identifier, text, start, len)?;
        }
        Ok(())
    }

    // Main tokenization loop

    pub fn tokenize(mut self) -> Result<Tokens, Diagnostic> {
        while let Some(c) = self.peek_char() {
            if self.comment.contains(CommentFlags::ACTIVE) {
                self.skip_comment_char(c)?;
                continue;
            }

            match c {
                c if is_whitespace(c) => {
                    self.flush_identifier()?;
                    self.consume_char();
                }
                '\'' | '"' if self.at_triple_quote(c) => self.open_multiline_comment(c)?,
                '\'' | '"' => self.scan_string(c)?,
                '0'..='9' if self.pending.is_none() => self.scan_numeric()?,
                c if is_ident_char(c) => self.push_identifier_char(c)?,
                c if is_symbol_start(c) => self.scan_symbol(c)?,
                _ => return Err(self.error_here(LexErrorKind::BadCharacter)),
            }
        }

        if self.comment.contains(CommentFlags::MULTILINE) {
            return Err(
                LexErrorKind::UnclosedComment.at(self.comment_start.line, self.comment_start.column)
            );
        }

        self.flush_identifier()?;
        tracing::debug!(count = self.tokens.len(), lines = self.line, "tokenized");
        Ok(self.tokens)
    }

    // Identifier scan

    fn push_identifier_char(&mut self, c: char) -> Result<(), Diagnostic> {
        let start = match self.pending {
            Some(start) => start,
            None => {
                let start = self.mark();
                self.pending = Some(start);
                start
            }
        };

        self.buffer_char(c)?;
        if self.scratch.len() > self.limits.max_identifier_length {
            return Err(LexErrorKind::IdentifierTooLong {
                max: self.limits.max_identifier_length,
            }
            .at(start.line, start.column));
        }

        self.consume_char();
        Ok(())
    }

    // Comment handling

    fn open_multiline_comment(&mut self, quote: char) -> Result<(), Diagnostic> {
        self.flush_identifier()?;
        self.comment_start = self.mark();
        self.comment_len = 0;
        self.comment = CommentFlags::ACTIVE | CommentFlags::MULTILINE;
        if quote == '"' {
            self.comment.insert(CommentFlags::DOUBLE_QUOTED);
        }

        for _ in 0..3 {
            self.consume_char();
        }
        Ok(())
    }

    fn skip_comment_char(&mut self, c: char) -> Result<(), Diagnostic> {
        if self.comment.contains(CommentFlags::MULTILINE) {
            let quote = if self.comment.contains(CommentFlags::DOUBLE_QUOTED) {
                '"'
            } else {
                '\''
            };

            if c == quote && self.at_triple_quote(c) {
                for _ in 0..3 {
                    self.consume_char();
                }
                self.comment = CommentFlags::empty();
                return Ok(());
            }
        } else if c == '\n' {
            // Leave the newline for the main loop
            self.comment = CommentFlags::empty();
            return Ok(());
        }

        self.consume_char();
        self.comment_len += c.len_utf8();
        if self.comment_len > self.limits.max_comment_length {
            return Err(LexErrorKind::CommentTooLong {
                max: self.limits.max_comment_length,
            }
            .at(self.comment_start.line, self.comment_start.column));
        }
        Ok(())
    }

    // String scan

    fn scan_string(&mut self, quote: char) -> Result<(), Diagnostic> {
        self.flush_identifier()?;

        let open = self.mark();
        self.consume_char();
        self.emit(TokenKind::Quote, quote.to_string(), open, 1)?;

        let body = self.mark();
        let mut source_len = 0;

        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    return Err(LexErrorKind::UnclosedString.at(open.line, open.column));
                }
                Some('\\') => {
                    let cooked = match self.peek_nth(1) {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        None => {
                            return Err(LexErrorKind::UnclosedString.at(open.line, open.column));
                        }
                        Some(_) => {
                            return Err(self
                                .error_here(LexErrorKind::InvalidEscape)
                                .spanning(self.column + 1));
                        }
                    };
                    self.buffer_char(cooked)?;
                    self.consume_char();
                    self.consume_char();
                    source_len += 2;
                }
                Some(c) if c == quote => {
                    let text = self.scratch.take();
                    self.emit(TokenKind::String, text, body, source_len)?;

                    let close = self.mark();
                    self.consume_char();
                    return self.emit(TokenKind::Quote, quote.to_string(), close, 1);
                }
                Some(c) => {
                    self.buffer_char(c)?;
                    self.consume_char();
                    source_len += 1;
                }
            }

            if self.scratch.len() > self.limits.max_string_length {
                return Err(LexErrorKind::StringTooLong {
                    max: self.limits.max_string_length,
                }
                .at(open.line, open.column));
            }
        }
    }

    // Number scan

    fn scan_numeric(&mut self) -> Result<(), Diagnostic> {
        let start = self.mark();
        let mut hex = false;

        while let Some(c) = self.peek_char() {
            match c {
                c if is_whitespace(c) => break,
                'x' if !hex && self.scratch.as_str() == "0" => hex = true,
                '0'..='9' => {}
                c if hex && c.is_ascii_hexdigit() => {}
                _ => return Err(self.error_here(LexErrorKind::MalformedNumber)),
            }
            self.buffer_char(c)?;
            self.consume_char();
        }

        // "0x" with no digits
        if hex && self.scratch.len() == 2 {
            return Err(self.error_here(LexErrorKind::MalformedNumber));
        }

        let text = self.scratch.take();
        let len = text.len();
        self.emit(TokenKind::Numeric, text, start, len)
    }

    // Symbol scan

    fn scan_symbol(&mut self, c: char) -> Result<(), Diagnostic> {
        self.flush_identifier()?;
        let start = self.mark();

        if c == '#' {
            self.consume_char();
            self.comment = CommentFlags::ACTIVE;
            self.comment_start = start;
            self.comment_len = 0;
            return Ok(());
        }

        // Two-character operators win over their one-character prefix
        let (kind, text) = match (c, self.peek_nth(1)) {
            ('+', Some('=')) => (TokenKind::Increment, "+="),
            ('-', Some('>')) => (TokenKind::Arrow, "->"),
            ('-', Some('=')) => (TokenKind::Decrement, "-="),
            ('*', Some('=')) => (TokenKind::MulAssign, "*="),
            ('/', Some('=')) => (TokenKind::DivAssign, "/="),
            ('=', Some('=')) => (TokenKind::EqualsEquals, "=="),
            ('(', _) => (TokenKind::OpenParen, "("),
            (')', _) => (TokenKind::CloseParen, ")"),
            ('{', _) => (TokenKind::OpenBrace, "{"),
            ('}', _) => (TokenKind::CloseBrace, "}"),
            (':', _) => (TokenKind::Colon, ":"),
            (',', _) => (TokenKind::Comma, ","),
            ('+', _) => (TokenKind::Add, "+"),
            ('-', _) => (TokenKind::Sub, "-"),
            ('*', _) => (TokenKind::Mul, "*"),
            ('/', _) => (TokenKind::Div, "/"),
            ('=', _) => (TokenKind::Equals, "="),
            _ => return Err(self.error_here(LexErrorKind::BadCharacter)),
        };

        for _ in 0..text.len() {
            self.consume_char();
        }
        self.emit(kind, text.to_string(), start, text.len())
    }
}

// Helper functions

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{b}' | '\u{c}')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_symbol_start(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '{' | '}' | ':' | '-' | '+' | '*' | '/' | '#' | '=' | ','
    )
}

// Public API

/// Scan source text into tokens; identifiers are not yet classified.
pub fn tokenize(source: &str, limits: &CompilerLimits) -> Result<Tokens, Diagnostic> {
    Lexer::new(source, limits)?.tokenize()
}

/// Scan and classify source text, checking parenthesis balance.
pub fn lex(source: &str, limits: &CompilerLimits) -> Result<Tokens, Diagnostic> {
    let mut tokens = tokenize(source, limits)?;
    classify(&mut tokens)?;
    Ok(tokens)
}

// Tests

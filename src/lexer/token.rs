use std::fmt::Write as _;

// Token types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Words and literals
    Identifier,
    String,
    Numeric,
    Boolean, // True / False
    Keyword,
    Type, // i8 .. u64, string, boolean
    Global,
    None,

    // Delimiters
    OpenParen,  // (
    CloseParen, // )
    OpenBrace,  // {
    CloseBrace, // }
    Quote,      // ' or "
    Colon,      // :
    Arrow,      // ->
    Comma,      // ,

    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /

    // Compound assignment
    Increment, // +=
    Decrement, // -=
    MulAssign, // *=
    DivAssign, // /=

    // Comparison
    Equals,       // =
    EqualsEquals, // ==
}

/// One lexical unit. `prev`/`next` link the token to its neighbours inside
/// the owning [`Tokens`] sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,       // 1-indexed
    pub column: usize,     // 1-indexed, first column of the token
    pub end_column: usize, // last column of the token's spelling
    pub offset: usize,     // characters traversed before the token
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl Token {
    /// `source_len` is the length of the token's spelling in the source, which
    /// differs from `text` only for string bodies containing escapes.
    pub fn new(
        kind: TokenKind,
        text: String,
        line: usize,
        column: usize,
        offset: usize,
        source_len: usize,
    ) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            end_column: (column + source_len).saturating_sub(1),
            offset,
            prev: None,
            next: None,
        }
    }
}

/// Ordered, doubly-linked token sequence. Owns every token of a unit.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    list: Vec<Token>,
}

impl Tokens {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Append a token, linking it after the current last one
    pub fn push(&mut self, mut token: Token) -> usize {
        let idx = self.list.len();
        token.prev = idx.checked_sub(1);
        token.next = None;
        if let Some(last) = self.list.last_mut() {
            last.next = Some(idx);
        }
        self.list.push(token);
        idx
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.list.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.list.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.list.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Token> {
        self.list.iter_mut()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.list.iter().map(|token| token.kind).collect()
    }

    /// Debug listing, one token per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for token in &self.list {
            let _ = writeln!(
                out,
                "kind: {:?}. value: {}. :{}:{}:",
                token.kind,
                token.text.escape_debug(),
                token.line,
                token.column
            );
        }
        out
    }

    /// Spell the sequence back out as source text that tokenizes to the same
    /// kinds and texts. String bodies are re-escaped and glued to their quotes.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        let mut delimiter = '"';

        for (idx, token) in self.list.iter().enumerate() {
            let prev_kind = idx.checked_sub(1).map(|p| self.list[p].kind);
            let glued = matches!(
                (prev_kind, token.kind),
                (Some(TokenKind::Quote), TokenKind::String) | (Some(TokenKind::String), TokenKind::Quote)
            );
            if idx > 0 && !glued {
                out.push(' ');
            }

            match token.kind {
                TokenKind::Quote => {
                    delimiter = token.text.chars().next().unwrap_or('"');
                    out.push_str(&token.text);
                }
                TokenKind::String => escape_into(&mut out, &token.text, delimiter),
                _ => out.push_str(&token.text),
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

fn escape_into(out: &mut String, body: &str, delimiter: char) {
    for ch in body.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\\' => out.push_str("\\\\"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

//! The parser's transition table.
//!
//! [`transition`] is a pure function from the parser's composite state and the
//! current token to the [`Action`] the main loop executes. Keeping it free of
//! side effects means every rule can be checked without building a tree.

use super::error::ParseErrorKind;
use super::state::{OpenExpression, OpenStatement, ScopeKind};
use crate::ast::NodeKind;
use crate::lexer::TokenKind;

/// Keywords the parser gives meaning to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Def,
    End,
    Other,
}

impl Keyword {
    pub fn from_text(text: &str) -> Self {
        match text {
            "def" => Keyword::Def,
            "end" => Keyword::End,
            _ => Keyword::Other,
        }
    }
}

/// Everything a transition may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub token: TokenKind,
    pub keyword: Option<Keyword>, // set for Keyword tokens only
    pub previous: Option<TokenKind>,
    pub attachment: NodeKind,
    pub statement: Option<OpenStatement>,
    pub expression: Option<OpenExpression>,
    pub scope: ScopeKind,
    pub scope_node: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Identifiers
    ExplicitArgument, // parameter `name: type` inside a definition header
    AssignIdentifier, // right-hand side of `=`, closes the statement
    Identifier,       // plain identifier expression, becomes the attachment

    // Keywords
    FunctionDef,
    EndClause,

    // Symbols
    Assign,
    OpenArgumentList,
    CloseArgumentList,
    NextArgument,
    Separate, // `a, b` chain
    ReturnType,
    CloseHeader,
    ReturnToScope,

    Literal(NodeKind),

    Skip,
    Ignore(&'static str), // skip with a developer warning
    Fallback,             // generic identifier node with a developer warning
    Reject(ParseErrorKind),
}

pub fn transition(ctx: &Context) -> Action {
    match ctx.token {
        TokenKind::Identifier => identifier(ctx),
        TokenKind::Keyword => keyword(ctx),
        TokenKind::Equals => equals(ctx),
        TokenKind::OpenParen => open_paren(ctx),
        TokenKind::CloseParen => {
            if ctx.scope_node == NodeKind::ArgumentListExpression {
                Action::CloseArgumentList
            } else {
                Action::Ignore("parenthesis outside an argument list")
            }
        }
        TokenKind::Comma => comma(ctx),
        TokenKind::Numeric => literal(ctx, NodeKind::NumberLiteral),
        TokenKind::String => literal(ctx, NodeKind::StringLiteral),
        TokenKind::Boolean => literal(ctx, NodeKind::BooleanLiteral),
        TokenKind::Arrow => {
            let after_arguments = ctx.previous == Some(TokenKind::CloseParen);
            if ctx.statement == Some(OpenStatement::FunctionDef) && after_arguments {
                Action::ReturnType
            } else {
                Action::Reject(ParseErrorKind::InvalidArrowUse)
            }
        }
        TokenKind::Colon => colon(ctx),
        // Only ever consumed as look-ahead by the arrow and parameter rules
        TokenKind::Type | TokenKind::None => Action::Reject(ParseErrorKind::InvalidExpression),
        // String delimiters carry no structure of their own
        TokenKind::Quote => Action::Skip,
        TokenKind::Global
        | TokenKind::OpenBrace
        | TokenKind::CloseBrace
        | TokenKind::Add
        | TokenKind::Sub
        | TokenKind::Mul
        | TokenKind::Div
        | TokenKind::Increment
        | TokenKind::Decrement
        | TokenKind::MulAssign
        | TokenKind::DivAssign
        | TokenKind::EqualsEquals => Action::Fallback,
    }
}

fn identifier(ctx: &Context) -> Action {
    let assigning = matches!(
        ctx.statement,
        Some(OpenStatement::Declaration | OpenStatement::Reassignment)
    );

    match ctx.attachment {
        NodeKind::ArgumentListExpression if ctx.statement == Some(OpenStatement::FunctionDef) => {
            Action::ExplicitArgument
        }
        NodeKind::ArgumentListExpression => Action::Ignore("identifier in a foreign argument list"),
        // Two parameters with no comma between them
        _ if ctx.scope == ScopeKind::TemporaryExpression => {
            Action::Reject(ParseErrorKind::InvalidExpression)
        }
        // A header takes nothing between its name, arguments, return type and colon
        _ if ctx.statement == Some(OpenStatement::FunctionDef) => {
            Action::Reject(ParseErrorKind::IncompleteFunctionDefinition)
        }
        NodeKind::EqualsExpression if assigning => Action::AssignIdentifier,
        _ => Action::Identifier,
    }
}

fn keyword(ctx: &Context) -> Action {
    match ctx.keyword {
        Some(Keyword::Def) => {
            if ctx.expression.is_some() {
                Action::Reject(ParseErrorKind::InvalidExpression)
            } else if ctx.statement.is_some() {
                Action::Reject(ParseErrorKind::InvalidStatement)
            } else {
                Action::FunctionDef
            }
        }
        Some(Keyword::End) => {
            let header_open = ctx.statement == Some(OpenStatement::FunctionDef);
            let assigning = ctx.expression == Some(OpenExpression::Equals);
            if ctx.expression == Some(OpenExpression::VarSeparation) {
                Action::Reject(ParseErrorKind::IncompleteExpression)
            } else if ctx.scope == ScopeKind::Clause && !header_open && !assigning {
                Action::EndClause
            } else {
                Action::Reject(ParseErrorKind::InvalidStatement)
            }
        }
        _ => Action::Ignore("unsupported keyword"),
    }
}

fn equals(ctx: &Context) -> Action {
    if ctx.statement == Some(OpenStatement::FunctionDef) {
        return Action::Reject(ParseErrorKind::InvalidSymbol);
    }

    match ctx.attachment {
        NodeKind::VarSeparationExpression | NodeKind::IdentifierExpression => Action::Assign,
        _ => Action::Reject(ParseErrorKind::InvalidSymbol),
    }
}

fn open_paren(ctx: &Context) -> Action {
    let in_header = ctx.statement == Some(OpenStatement::FunctionDef)
        && ctx.attachment == NodeKind::FunctionDefStatement
        && ctx.scope_node == NodeKind::FunctionDefStatement;

    if !in_header {
        return Action::Ignore("parenthesis outside a function header");
    }

    // The argument list follows the name directly, and only once
    if ctx.previous == Some(TokenKind::Identifier) {
        Action::OpenArgumentList
    } else {
        Action::Reject(ParseErrorKind::InvalidSymbol)
    }
}

fn comma(ctx: &Context) -> Action {
    if ctx.scope == ScopeKind::TemporaryExpression {
        // `(,` has no parameter to finish
        if ctx.attachment == NodeKind::ArgumentListExpression {
            Action::Reject(ParseErrorKind::InvalidSymbol)
        } else {
            Action::NextArgument
        }
    } else if ctx.attachment == NodeKind::IdentifierExpression {
        Action::Separate
    } else {
        Action::Reject(ParseErrorKind::InvalidSymbol)
    }
}

fn literal(ctx: &Context, kind: NodeKind) -> Action {
    if ctx.expression == Some(OpenExpression::Equals) {
        Action::Literal(kind)
    } else {
        Action::Reject(ParseErrorKind::InvalidExpression)
    }
}

fn colon(ctx: &Context) -> Action {
    if ctx.scope != ScopeKind::Clause {
        return Action::Reject(ParseErrorKind::InvalidSymbol);
    }

    if ctx.statement == Some(OpenStatement::FunctionDef) {
        if ctx.attachment == NodeKind::TypeResolveExpression {
            Action::CloseHeader
        } else {
            Action::Reject(ParseErrorKind::NoReturnType)
        }
    } else {
        Action::ReturnToScope
    }
}

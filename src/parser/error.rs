use crate::ast::Node;
use crate::diagnostic::{Category, Diagnostic};
use crate::lexer::Token;

/// Structural violations found while building the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Invalid argument definition (No colon).")]
    ArgumentWithoutColon,
    #[error("Invalid argument definition (No type).")]
    ArgumentWithoutType,
    #[error("Variable defined twice.")]
    DuplicateVariable,
    #[error("Invalid symbol.")]
    InvalidSymbol,
    #[error("Invalid expression.")]
    InvalidExpression,
    #[error("Invalid statement.")]
    InvalidStatement,
    #[error("Invalid arrow use.")]
    InvalidArrowUse,
    #[error("Invalid type.")]
    InvalidType,
    #[error("No return type!")]
    NoReturnType,
    #[error("Invalid function name.")]
    InvalidFunctionName,
    #[error("Incomplete expression.")]
    IncompleteExpression,
    #[error("Incomplete function definition.")]
    IncompleteFunctionDefinition,
    #[error("Unclosed argument list.")]
    UnclosedArgumentList,
    #[error("Scope nesting too deep (max: {max}).")]
    ScopeTooDeep { max: usize },
    #[error("AST node limit exceeded (max: {max}).")]
    NodeLimit { max: usize },
}

impl ParseErrorKind {
    /// Diagnostic underlining the whole spelling of `token`
    pub fn at(self, token: &Token) -> Diagnostic {
        Diagnostic::at(Category::Parse, self.to_string(), token.line, token.column)
            .spanning(token.end_column)
    }

    pub fn at_node(self, node: &Node) -> Diagnostic {
        Diagnostic::at(Category::Parse, self.to_string(), node.line, node.column)
            .spanning(node.end_column)
    }
}

// Parser module - splits the state machine into logical components
mod error;
mod expressions;
mod helpers;
mod state;
mod statements;
mod transition;

// Public exports
pub use error::ParseErrorKind;
pub use state::{
    Binding, Cursor, OpenExpression, OpenStatement, Scope, ScopeKind, ScopeStack, VariableTray,
};
pub use transition::{Action, Context, Keyword, transition};

use crate::ast::Ast;
use crate::diagnostic::{Diagnostic, Warning};
use crate::lexer::{Token, TokenKind, Tokens};
use crate::limits::CompilerLimits;

/// Tree built from one token sequence, plus the warnings raised on the way
#[derive(Debug, Clone)]
pub struct Parsed {
    pub ast: Ast,
    pub warnings: Vec<Warning>,
}

// Parser structure
pub struct Parser<'a> {
    tokens: &'a Tokens,
    limits: &'a CompilerLimits,
    ast: Ast,
    scopes: ScopeStack,
    tray: VariableTray,
    cursor: Cursor,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a Tokens, limits: &'a CompilerLimits) -> Self {
        let ast = Ast::new(limits.max_ast_nodes);
        let root = ast.root();

        Self {
            tokens,
            limits,
            ast,
            scopes: ScopeStack::new(root),
            tray: VariableTray::new(),
            cursor: Cursor::new(root),
            warnings: Vec::new(),
        }
    }

    // Main parsing entry point: one transition per token, then the end-of-input checks
    pub fn parse(mut self) -> Result<Parsed, Diagnostic> {
        while let Some(token) = self.current_token() {
            let ctx = self.context(token);
            let action = transition(&ctx);
            tracing::trace!(
                position = self.cursor.position,
                token = ?ctx.token,
                attachment = ?ctx.attachment,
                ?action,
                "transition"
            );

            self.execute(action, token)?;
            self.advance();
        }

        self.finish()?;
        tracing::debug!(
            nodes = self.ast.len(),
            warnings = self.warnings.len(),
            "parsed"
        );

        Ok(Parsed {
            ast: self.ast,
            warnings: self.warnings,
        })
    }

    /// Snapshot of the composite state the transition table reads
    fn context(&self, token: &Token) -> Context {
        let top = self.scopes.top();
        Context {
            token: token.kind,
            keyword: (token.kind == TokenKind::Keyword).then(|| Keyword::from_text(&token.text)),
            previous: self.previous_token(token).map(|prev| prev.kind),
            attachment: self.ast.kind(self.cursor.attachment),
            statement: self.cursor.statement,
            expression: self.cursor.expression,
            scope: top.kind,
            scope_node: self.ast.kind(top.node),
        }
    }

    fn execute(&mut self, action: Action, token: &'a Token) -> Result<(), Diagnostic> {
        match action {
            Action::ExplicitArgument => self.explicit_argument(token),
            Action::AssignIdentifier => self.assign_identifier(token),
            Action::Identifier => self.identifier(token),
            Action::FunctionDef => self.function_def(token),
            Action::EndClause => {
                self.end_clause();
                Ok(())
            }
            Action::Assign => self.assign(token),
            Action::OpenArgumentList => self.open_argument_list(token),
            Action::CloseArgumentList => {
                self.close_argument_list();
                Ok(())
            }
            Action::NextArgument => {
                self.next_argument();
                Ok(())
            }
            Action::Separate => self.separate(token),
            Action::ReturnType => self.return_type(token),
            Action::CloseHeader | Action::ReturnToScope => {
                self.return_to_scope();
                Ok(())
            }
            Action::Literal(kind) => self.literal(kind, token),
            Action::Skip => Ok(()),
            Action::Ignore(reason) => {
                self.warn(token, format!("Skipped '{}': {}.", token.text, reason));
                Ok(())
            }
            Action::Fallback => self.fallback(token),
            // Reported where the unfinished construct starts, as at end of input
            Action::Reject(kind @ ParseErrorKind::IncompleteExpression) => {
                Err(kind.at_node(self.ast.node(self.cursor.attachment)))
            }
            Action::Reject(kind) => Err(kind.at(token)),
        }
    }

    /// End of input: reject dangling constructs, close remaining clauses
    fn finish(&mut self) -> Result<(), Diagnostic> {
        match self.cursor.expression {
            Some(OpenExpression::Equals | OpenExpression::VarSeparation) => {
                let node = self.ast.node(self.cursor.attachment);
                return Err(ParseErrorKind::IncompleteExpression.at_node(node));
            }
            _ => {}
        }

        if self.cursor.statement == Some(OpenStatement::FunctionDef) {
            let top = self.scopes.top();
            if top.kind == ScopeKind::TemporaryExpression {
                return Err(ParseErrorKind::UnclosedArgumentList.at_node(self.ast.node(top.node)));
            }
            let clause = self.scopes.innermost(ScopeKind::Clause).unwrap_or(top);
            return Err(
                ParseErrorKind::IncompleteFunctionDefinition.at_node(self.ast.node(clause.node))
            );
        }

        while let Some(scope) = self.pop_scope() {
            tracing::debug!(kind = ?scope.kind, node = scope.node, "scope closed at end of input");
        }
        self.cursor.attachment = self.scopes.top().node;
        Ok(())
    }
}

// Public API function
pub fn parse(tokens: &Tokens, limits: &CompilerLimits) -> Result<Parsed, Diagnostic> {
    Parser::new(tokens, limits).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Category;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> Result<Parsed, Diagnostic> {
        let limits = CompilerLimits::default();
        let tokens = lex(source, &limits).unwrap();
        parse(&tokens, &limits)
    }

    fn to_ast_string(source: &str) -> Result<String, Diagnostic> {
        Ok(parse_source(source)?.ast.outline())
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_source("").unwrap();
        assert_eq!(parsed.ast.outline(), "Unknown\n");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_declaration() {
        let ast = to_ast_string("x = 5").unwrap();

        let expected = "\
Unknown
  VarDeclStatement 'x'
    EqualsExpression
      NumberLiteral '5'
";
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_function_header() {
        let ast = to_ast_string("def foo(a: i32) -> i32:").unwrap();

        let expected = "\
Unknown
  FunctionDefStatement 'foo'
    ArgumentListExpression
      ExplicitArgumentExpression 'a'
        TypeResolveExpression 'i32'
    TypeResolveExpression 'i32'
";
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_incomplete_expression_at_end() {
        let diagnostic = parse_source("x = ").unwrap_err();
        assert_eq!(diagnostic.category, Category::Parse);
        assert_eq!(diagnostic.message, "Incomplete expression.");
        assert_eq!((diagnostic.line, diagnostic.column), (1, 3));
    }

    #[test]
    fn test_dangling_separator() {
        let diagnostic = parse_source("a,").unwrap_err();
        assert_eq!(diagnostic.message, "Incomplete expression.");
        assert_eq!(diagnostic.column, 2);
    }

    #[test]
    fn test_incomplete_function_definition() {
        let diagnostic = parse_source("def foo(a: i32) -> i32").unwrap_err();
        assert_eq!(diagnostic.message, "Incomplete function definition.");
        assert_eq!((diagnostic.column, diagnostic.end_column), (5, 7));

        let diagnostic = parse_source("def foo").unwrap_err();
        assert_eq!(diagnostic.message, "Incomplete function definition.");
    }

    #[test]
    fn test_clause_closed_implicitly() {
        let parsed = parse_source("def f() -> None:\n  y = 1").unwrap();
        let expected = "\
Unknown
  FunctionDefStatement 'f'
    ArgumentListExpression
    TypeResolveExpression 'None'
    VarDeclStatement 'y'
      EqualsExpression
        NumberLiteral '1'
";
        assert_eq!(parsed.ast.outline(), expected);
    }

    #[test]
    fn test_unsupported_tokens_warn() {
        let parsed = parse_source("x = 1\nwhile\n+").unwrap();
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].line, 2);
        assert!(parsed.warnings[0].message.contains("while"));
        assert_eq!(parsed.warnings[1].line, 3);

        let expected = "\
Unknown
  VarDeclStatement 'x'
    EqualsExpression
      NumberLiteral '1'
  IdentifierExpression '+'
";
        assert_eq!(parsed.ast.outline(), expected);
    }

    #[test]
    fn test_string_literal_skips_quotes() {
        let ast = to_ast_string("s = 'hi'").unwrap();
        let expected = "\
Unknown
  VarDeclStatement 's'
    EqualsExpression
      StringLiteral 'hi'
";
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_scope_depth_limit() {
        let limits = CompilerLimits {
            max_scope_depth: 2,
            ..CompilerLimits::default()
        };
        let tokens = lex("def f(a: i32) -> i32:", &limits).unwrap();
        let diagnostic = parse(&tokens, &limits).unwrap_err();
        assert_eq!(diagnostic.message, "Scope nesting too deep (max: 2).");
        assert_eq!(diagnostic.column, 6);
    }

    #[test]
    fn test_node_limit() {
        let limits = CompilerLimits {
            max_ast_nodes: 3,
            ..CompilerLimits::default()
        };
        let tokens = lex("x = 5", &limits).unwrap();
        let diagnostic = parse(&tokens, &limits).unwrap_err();
        assert_eq!(diagnostic.message, "AST node limit exceeded (max: 3).");
        assert_eq!(diagnostic.column, 5);
    }

    #[test]
    fn test_context_reflects_cursor() {
        let limits = CompilerLimits::default();
        let tokens = lex("def", &limits).unwrap();
        let parser = Parser::new(&tokens, &limits);
        let ctx = parser.context(tokens.get(0).unwrap());

        assert_eq!(ctx.keyword, Some(Keyword::Def));
        assert_eq!(ctx.previous, None);
        assert_eq!(ctx.scope, ScopeKind::Root);
        assert_eq!(ctx.attachment, crate::ast::NodeKind::Unknown);
        assert_eq!(ctx.statement, None);
    }
}

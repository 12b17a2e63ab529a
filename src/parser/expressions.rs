use super::Parser;
use super::error::ParseErrorKind;
use super::state::{OpenExpression, ScopeKind};
use crate::ast::NodeKind;
use crate::diagnostic::Diagnostic;
use crate::lexer::{Token, TokenKind};

// Expression actions
impl<'a> Parser<'a> {
    pub(super) fn identifier(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let node = self.attach(NodeKind::IdentifierExpression, token, &token.text)?;
        self.descend(node, OpenExpression::Identifier);
        Ok(())
    }

    /// Identifier on the right of `=`; completes the assignment
    pub(super) fn assign_identifier(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        self.attach(NodeKind::IdentifierExpression, token, &token.text)?;
        self.return_to_scope();
        Ok(())
    }

    pub(super) fn literal(&mut self, kind: NodeKind, token: &'a Token) -> Result<(), Diagnostic> {
        self.attach(kind, token, &token.text)?;
        self.return_to_scope();
        Ok(())
    }

    /// Parameter `name: type`. The colon and the type are consumed here.
    pub(super) fn explicit_argument(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let colon = match self.peek_token(1) {
            Some(colon) if colon.kind == TokenKind::Colon => colon,
            _ => return Err(ParseErrorKind::ArgumentWithoutColon.at(token)),
        };
        let type_name = match self.peek_token(2) {
            Some(ty) if ty.kind == TokenKind::Type => ty,
            Some(other) => return Err(ParseErrorKind::ArgumentWithoutType.at(other)),
            None => return Err(ParseErrorKind::ArgumentWithoutType.at(colon)),
        };

        let node = self.attach(NodeKind::ExplicitArgumentExpression, token, &token.text)?;
        // Parameters belong to the function body, not to the argument list
        let clause = self
            .scopes
            .innermost(ScopeKind::Clause)
            .unwrap_or_else(|| self.scopes.top());
        self.declare(&token.text, node, clause.node)?;

        self.cursor.attachment = node;
        self.type_resolve(type_name)?;

        self.advance();
        self.advance();
        Ok(())
    }

    /// `-> type` after the closing parenthesis of a definition header
    pub(super) fn return_type(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let type_name = match self.peek_token(1) {
            Some(ty) if matches!(ty.kind, TokenKind::Type | TokenKind::None) => ty,
            Some(other) => return Err(ParseErrorKind::InvalidType.at(other)),
            None => return Err(ParseErrorKind::InvalidType.at(token)),
        };

        self.type_resolve(type_name)?;
        self.advance();
        Ok(())
    }

    fn type_resolve(&mut self, type_name: &'a Token) -> Result<(), Diagnostic> {
        let node = self.attach(NodeKind::TypeResolveExpression, type_name, &type_name.text)?;
        self.descend(node, OpenExpression::TypeResolve);
        Ok(())
    }

    // Argument lists

    pub(super) fn open_argument_list(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let node = self.attach(NodeKind::ArgumentListExpression, token, "")?;
        self.push_scope(ScopeKind::TemporaryExpression, node, token)?;
        self.descend(node, OpenExpression::ArgumentList);
        Ok(())
    }

    pub(super) fn close_argument_list(&mut self) {
        self.pop_scope();
        self.cursor.attachment = self.scopes.top().node;
        self.cursor.expression = None;
    }

    /// `,` between parameters
    pub(super) fn next_argument(&mut self) {
        self.cursor.attachment = self.scopes.top().node;
        self.cursor.expression = Some(OpenExpression::ArgumentList);
    }

    /// `,` after an identifier starts a chained name
    pub(super) fn separate(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let node = self.attach(NodeKind::VarSeparationExpression, token, "")?;
        self.descend(node, OpenExpression::VarSeparation);
        Ok(())
    }

    /// Tokens with no rule become identifier nodes so parsing can go on
    pub(super) fn fallback(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        self.warn(
            token,
            format!(
                "Unsupported token {:?} '{}', kept as an identifier.",
                token.kind, token.text
            ),
        );
        self.attach(NodeKind::IdentifierExpression, token, &token.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    fn to_ast_string(source: &str) -> Result<String, Diagnostic> {
        let limits = CompilerLimits::default();
        let tokens = lex(source, &limits).unwrap();
        Ok(parse(&tokens, &limits)?.ast.outline())
    }

    fn parse_error(source: &str) -> Diagnostic {
        to_ast_string(source).unwrap_err()
    }

    // Parameter tests
    #[test]
    fn test_parameter_without_colon() {
        let diagnostic = parse_error("def f(a i32) -> None:");
        assert_eq!(diagnostic.message, "Invalid argument definition (No colon).");
        assert_eq!(diagnostic.column, 7);
    }

    #[test]
    fn test_parameter_without_type() {
        let diagnostic = parse_error("def f(a: b) -> None:");
        assert_eq!(diagnostic.message, "Invalid argument definition (No type).");
        assert_eq!(diagnostic.column, 10);
    }

    #[test]
    fn test_parameters_need_comma() {
        let diagnostic = parse_error("def f(a: i32 b: i32) -> None:");
        assert_eq!(diagnostic.message, "Invalid expression.");
        assert_eq!(diagnostic.column, 14);
    }

    #[test]
    fn test_leading_comma_in_parameters() {
        assert_eq!(parse_error("def f(, a: i32) -> None:").message, "Invalid symbol.");
    }

    #[test]
    fn test_literal_in_parameters() {
        assert_eq!(parse_error("def f( 1 ) -> None:").message, "Invalid expression.");
    }

    // Return type tests
    #[test]
    fn test_arrow_outside_definition() {
        let diagnostic = parse_error("x -> i32");
        assert_eq!(diagnostic.message, "Invalid arrow use.");
        assert_eq!((diagnostic.column, diagnostic.end_column), (3, 4));
    }

    #[test]
    fn test_arrow_before_parameters() {
        assert_eq!(parse_error("def f -> i32:").message, "Invalid arrow use.");
        assert_eq!(parse_error("def f() -> i32 -> i32:").message, "Invalid arrow use.");
    }

    #[test]
    fn test_invalid_return_type() {
        let diagnostic = parse_error("def f() -> x:");
        assert_eq!(diagnostic.message, "Invalid type.");
        assert_eq!(diagnostic.column, 12);

        assert_eq!(parse_error("def f() ->").message, "Invalid type.");
    }

    #[test]
    fn test_none_return_type() {
        let ast = to_ast_string("def f() -> None:").unwrap();
        assert!(ast.ends_with("    TypeResolveExpression 'None'\n"));
    }

    // Literal tests
    #[test]
    fn test_literal_kinds() {
        let ast = to_ast_string("n = 0x1F\ns = \"a b\"\nb = False").unwrap();

        let expected = "\
Unknown
  VarDeclStatement 'n'
    EqualsExpression
      NumberLiteral '0x1F'
  VarDeclStatement 's'
    EqualsExpression
      StringLiteral 'a b'
  VarDeclStatement 'b'
    EqualsExpression
      BooleanLiteral 'False'
";
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_bare_type_and_none() {
        assert_eq!(parse_error("i32").message, "Invalid expression.");
        assert_eq!(parse_error("x = None").message, "Invalid expression.");
    }

    #[test]
    fn test_colon_outside_clause() {
        let diagnostic = parse_error("x: i32");
        assert_eq!(diagnostic.message, "Invalid symbol.");
        assert_eq!(diagnostic.column, 2);
    }

    // Fallback tests
    #[test]
    fn test_parenthesis_in_body_is_skipped() {
        let limits = CompilerLimits::default();
        let tokens = lex("def f() -> None:\n  g()\nend", &limits).unwrap();
        let parsed = parse(&tokens, &limits).unwrap();

        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.ast.outline().contains("    IdentifierExpression 'g'"));
    }

    #[test]
    fn test_comparison_operator_falls_back() {
        let limits = CompilerLimits::default();
        let tokens = lex("a == b", &limits).unwrap();
        let parsed = parse(&tokens, &limits).unwrap();

        let expected = "\
Unknown
  IdentifierExpression 'a'
    IdentifierExpression '=='
    IdentifierExpression 'b'
";
        assert_eq!(parsed.ast.outline(), expected);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].message.contains("EqualsEquals"));
    }
}

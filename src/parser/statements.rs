use super::Parser;
use super::error::ParseErrorKind;
use super::state::{OpenExpression, OpenStatement, ScopeKind};
use crate::ast::{NodeId, NodeKind};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Token, TokenKind};

// Statement actions: definitions, clause boundaries and assignment
impl<'a> Parser<'a> {
    /// `def name` opens a definition node and its clause, consuming the name
    pub(super) fn function_def(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let name = match self.peek_token(1) {
            Some(name) if name.kind == TokenKind::Identifier => name,
            Some(other) => return Err(ParseErrorKind::InvalidFunctionName.at(other)),
            None => return Err(ParseErrorKind::InvalidFunctionName.at(token)),
        };

        let node = self.attach(NodeKind::FunctionDefStatement, name, &name.text)?;
        self.push_scope(ScopeKind::Clause, node, name)?;

        self.cursor.attachment = node;
        self.cursor.statement = Some(OpenStatement::FunctionDef);
        self.cursor.expression = None;
        self.advance();
        Ok(())
    }

    /// `end` closes the innermost clause
    pub(super) fn end_clause(&mut self) {
        if let Some(scope) = self.pop_scope() {
            tracing::debug!(node = scope.node, "clause ended");
        }
        self.return_to_scope();
    }

    /// `=` after an identifier or a comma chain.
    ///
    /// Every identifier of the chain becomes a declaration when its name is not
    /// yet visible, and a reassignment otherwise. The rightmost one decides
    /// which statement is open while the right-hand side is parsed.
    pub(super) fn assign(&mut self, token: &'a Token) -> Result<(), Diagnostic> {
        let chain = self.assignment_chain();
        let scope = self.scopes.top().node;

        for (i, &node) in chain.iter().enumerate() {
            let name = self.ast.text(node).to_string();
            if chain[..i].iter().any(|&seen| self.ast.text(seen) == name) {
                return Err(ParseErrorKind::DuplicateVariable.at_node(self.ast.node(node)));
            }

            let kind = if self.tray.contains(&name) {
                NodeKind::VarReassignStatement
            } else {
                self.declare(&name, node, scope)?;
                NodeKind::VarDeclStatement
            };
            self.ast.set_kind(node, kind);
        }

        let statement = match chain.first().map(|&node| self.ast.kind(node)) {
            Some(NodeKind::VarReassignStatement) => OpenStatement::Reassignment,
            _ => OpenStatement::Declaration,
        };

        let equals = self.attach(NodeKind::EqualsExpression, token, "")?;
        self.cursor.statement = Some(statement);
        self.descend(equals, OpenExpression::Equals);
        Ok(())
    }

    /// Identifier nodes of `a, b, c` ending at the attachment, rightmost first
    fn assignment_chain(&self) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(self.cursor.attachment);

        // `a, = ...` starts at the separator itself
        if self.ast.kind(self.cursor.attachment) == NodeKind::VarSeparationExpression {
            current = self.ast.parent(self.cursor.attachment);
        }

        while let Some(node) = current {
            if self.ast.kind(node) != NodeKind::IdentifierExpression {
                break;
            }
            chain.push(node);

            current = self
                .ast
                .parent(node)
                .filter(|&parent| self.ast.kind(parent) == NodeKind::VarSeparationExpression)
                .and_then(|separator| self.ast.parent(separator));
        }
        chain
    }
}

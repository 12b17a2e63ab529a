use super::error::ParseErrorKind;
use super::state::{OpenExpression, Scope, ScopeKind};
use crate::ast::{Node, NodeId, NodeKind};
use crate::diagnostic::{Diagnostic, Warning};
use crate::lexer::Token;

// Parser helper methods
impl<'a> super::Parser<'a> {
    // Token navigation

    /// Helper: Get current token
    pub(super) fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor.position)
    }

    /// Helper: Token `n` places after the current one
    pub(super) fn peek_token(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.cursor.position + n)
    }

    /// Helper: Token linked before `token`
    pub(super) fn previous_token(&self, token: &Token) -> Option<&'a Token> {
        token.prev.and_then(|idx| self.tokens.get(idx))
    }

    /// Helper: Advance to the next token
    pub(super) fn advance(&mut self) {
        self.cursor.position = (self.cursor.position + 1).min(self.tokens.len());
    }

    // Tree building

    /// Helper: Create a node at `token` under the current attachment point
    pub(super) fn attach(
        &mut self,
        kind: NodeKind,
        token: &Token,
        text: &str,
    ) -> Result<NodeId, Diagnostic> {
        self.attach_under(self.cursor.attachment, kind, token, text)
    }

    pub(super) fn attach_under(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        token: &Token,
        text: &str,
    ) -> Result<NodeId, Diagnostic> {
        self.ast
            .attach(parent, Node::at_token(kind, token, text))
            .map_err(|e| ParseErrorKind::NodeLimit { max: e.max }.at(token))
    }

    /// Helper: Make `node` the attachment point with `expression` open
    pub(super) fn descend(&mut self, node: NodeId, expression: OpenExpression) {
        self.cursor.attachment = node;
        self.cursor.expression = Some(expression);
    }

    /// Helper: Move back to the innermost scope and forget open state
    pub(super) fn return_to_scope(&mut self) {
        self.cursor.attachment = self.scopes.top().node;
        self.cursor.clear();
    }

    // Scope handling

    pub(super) fn push_scope(
        &mut self,
        kind: ScopeKind,
        node: NodeId,
        token: &Token,
    ) -> Result<(), Diagnostic> {
        if self.scopes.depth() >= self.limits.max_scope_depth {
            return Err(ParseErrorKind::ScopeTooDeep {
                max: self.limits.max_scope_depth,
            }
            .at(token));
        }

        self.scopes.push(kind, node);
        tracing::debug!(?kind, node, depth = self.scopes.depth(), "scope opened");
        Ok(())
    }

    /// Helper: Pop the top scope and drop the bindings it owns
    pub(super) fn pop_scope(&mut self) -> Option<Scope> {
        let scope = self.scopes.pop()?;
        let released = self.tray.release_scope(scope.node);
        tracing::debug!(kind = ?scope.kind, node = scope.node, released, "scope closed");
        Some(scope)
    }

    /// Helper: Register `name` as declared by `node`, owned by the scope at `scope`
    pub(super) fn declare(
        &mut self,
        name: &str,
        node: NodeId,
        scope: NodeId,
    ) -> Result<(), Diagnostic> {
        let binding = super::Binding {
            name: name.to_string(),
            node,
            scope,
        };

        match self.tray.declare(binding) {
            Ok(()) => {
                tracing::trace!(name, node, scope, "declared");
                Ok(())
            }
            Err(existing) => {
                tracing::debug!(name, first = existing.node, "duplicate declaration");
                Err(ParseErrorKind::DuplicateVariable.at_node(self.ast.node(node)))
            }
        }
    }

    // Diagnostics

    /// Helper: Record a non-fatal developer warning
    pub(super) fn warn(&mut self, token: &Token, message: String) {
        tracing::warn!(line = token.line, column = token.column, "{message}");
        self.warnings.push(Warning {
            line: token.line,
            message,
        });
    }
}

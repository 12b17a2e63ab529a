use std::collections::HashMap;

use crate::ast::NodeId;

/// Lexical region kinds, innermost on top of the [`ScopeStack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,                // Pushed once, never popped
    Clause,              // Function body
    TemporaryExpression, // Argument list, popped on ')'
}

/// An open scope and the node that anchors it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub node: NodeId,
}

/// Stack of open scopes. The root scope is always at the bottom.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    stack: Vec<Scope>,
}

impl ScopeStack {
    pub fn new(root: NodeId) -> Self {
        Self {
            stack: vec![Scope {
                kind: ScopeKind::Root,
                node: root,
            }],
        }
    }

    pub fn top(&self) -> Scope {
        // The root scope is never popped
        self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, kind: ScopeKind, node: NodeId) {
        self.stack.push(Scope { kind, node });
    }

    /// Pop the top scope; the root scope stays and `None` is returned
    pub fn pop(&mut self) -> Option<Scope> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Nearest open scope of `kind`, searching from the top
    pub fn innermost(&self, kind: ScopeKind) -> Option<Scope> {
        self.stack.iter().rev().find(|scope| scope.kind == kind).copied()
    }
}

/// A visible name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub node: NodeId,  // declaring node
    pub scope: NodeId, // anchor of the scope that owns the binding
}

/// Names visible across every open scope
#[derive(Debug, Clone, Default)]
pub struct VariableTray {
    bindings: HashMap<String, Binding>,
}

impl VariableTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Register a binding; the existing one is returned if the name is taken
    pub fn declare(&mut self, binding: Binding) -> Result<(), &Binding> {
        if self.bindings.contains_key(&binding.name) {
            return Err(&self.bindings[&binding.name]);
        }
        self.bindings.insert(binding.name.clone(), binding);
        Ok(())
    }

    /// Drop every binding owned by the scope anchored at `anchor`
    pub fn release_scope(&mut self, anchor: NodeId) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, binding| binding.scope != anchor);
        before - self.bindings.len()
    }
}

/// Statement waiting for its closing token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatement {
    Declaration,
    Reassignment,
    FunctionDef,
}

/// Expression waiting for its closing token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenExpression {
    Identifier,
    Equals,
    ArgumentList,
    TypeResolve,
    VarSeparation,
}

/// Where the parser is and what it is in the middle of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub attachment: NodeId,
    pub statement: Option<OpenStatement>,
    pub expression: Option<OpenExpression>,
    pub position: usize,
}

impl Cursor {
    pub fn new(root: NodeId) -> Self {
        Self {
            attachment: root,
            statement: None,
            expression: None,
            position: 0,
        }
    }

    /// Forget any open statement or expression
    pub fn clear(&mut self) {
        self.statement = None;
        self.expression = None;
    }
}

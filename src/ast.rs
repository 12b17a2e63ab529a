use std::fmt::Write as _;

use crate::lexer::Token;

/// Index of a node inside its [`Ast`]
pub type NodeId = usize;

// AST with single vector storage; children are ordered index lists
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    max_nodes: usize,
}

// Node types in the parse tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Unknown,   // Root, or completely unknown
    Undefined, // Not yet given meaning

    // Literals
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,

    GenericKeyword,

    // Statements
    VarDeclStatement,
    VarReassignStatement,
    FunctionDefStatement,
    ReturnStatement,
    IfStatement,
    PassStatement,

    // Expressions
    EqualsExpression,
    IdentifierExpression,
    StringCastExpression,
    ArithmeticExpression,
    ArgumentListExpression,
    ExplicitArgumentExpression, // a: type, with a TypeResolveExpression underneath
    ArgumentExpression,
    TypeResolveExpression,
    ConditionalExpression,
    VarSeparationExpression, // ,

    // Expression statements
    CallExpressionStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String, // Empty for structural nodes
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            line: 0,
            column: 0,
            end_column: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node positioned at `token`, carrying `text`
    pub fn at_token(kind: NodeKind, token: &Token, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: token.line,
            column: token.column,
            end_column: token.end_column,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("AST node limit exceeded (max: {max}).")]
pub struct NodeLimitError {
    pub max: usize,
}

impl Ast {
    /// Arena holding only the synthetic root
    pub fn new(max_nodes: usize) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Unknown)],
            root: 0,
            max_nodes,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id].text
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id].children.get(index).copied()
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id].kind = kind;
    }

    // Add node and return its index
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, NodeLimitError> {
        if self.nodes.len() >= self.max_nodes {
            return Err(NodeLimitError {
                max: self.max_nodes,
            });
        }

        let idx = self.nodes.len();
        self.nodes.push(node);
        Ok(idx)
    }

    // Link child to parent (adds as last child)
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Register `node` in the arena and link it under `parent` in one step
    pub fn attach(&mut self, parent: NodeId, node: Node) -> Result<NodeId, NodeLimitError> {
        let idx = self.add_node(node)?;
        self.add_child(parent, idx);
        Ok(idx)
    }

    /// Follow child indices from the root; `None` if any index is missing
    pub fn find_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |id, &index| self.child(id, index))
    }

    /// Indented dump, two spaces per depth level
    pub fn render(&self) -> String {
        self.walk(|out, node| {
            let _ = write!(
                out,
                "kind: {:?}. value: {}.",
                node.kind,
                node.text.escape_debug()
            );
        })
    }

    /// Compact form of [`Ast::render`]: `Kind 'text'`, text omitted when empty
    pub fn outline(&self) -> String {
        self.walk(|out, node| {
            let _ = write!(out, "{:?}", node.kind);
            if !node.text.is_empty() {
                let _ = write!(out, " '{}'", node.text.escape_debug());
            }
        })
    }

    // Pre-order traversal with an explicit stack, one line per node
    fn walk(&self, mut line: impl FnMut(&mut String, &Node)) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            out.push_str(&"  ".repeat(depth));
            line(&mut out, node);
            out.push('\n');
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

// AST (Abstract Syntax Tree) definitions for the scripting language

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Node kinds together with the data that only makes sense for that kind.
///
/// Sub-trees that are *not* part of the generic child list (a function's
/// parameter list, a loop's bounds, a return value) are owned here.
/// Everything a tree walker should visit in order lives in
/// [`AstNode::children`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program,
    Main,
    Function {
        name: String,
        /// Always a [`NodeKind::ParamList`] node.
        params: Box<AstNode>,
    },
    /// Children are always [`NodeKind::Identifier`] nodes.
    ParamList,
    /// `{ ... }` used as a statement
    CompoundStatement,
    /// `name = value;` at program level. The value is `children[0]`.
    VarDecl {
        name: String,
    },
    /// Children: `[target, value]`, the target being an identifier or an
    /// array access.
    Assignment,
    /// Children: `[condition, then_branch]` plus an optional trailing
    /// [`NodeKind::ElseStatement`].
    IfStatement,
    /// Single child: the else branch.
    ElseStatement,
    ForLoop {
        var_name: String,
        start: Box<AstNode>,
        end: Box<AstNode>,
    },
    ReturnStatement {
        value: Option<Box<AstNode>>,
    },
    /// Children: `[callee identifier]` or `[callee identifier, argument list]`.
    FunctionCall,
    /// Array aggregate. Named at program level, anonymous when nested.
    /// Single child: an [`NodeKind::ExpressionList`].
    ArrayDecl {
        name: Option<String>,
    },
    /// Key/value aggregate. Named at program level, anonymous when nested.
    /// Children are always [`NodeKind::KeyValuePair`] nodes.
    KeyValueDecl {
        name: Option<String>,
    },
    /// Children are expressions, array aggregates or key/value aggregates.
    ExpressionList,
    ArgumentList,
    /// Exactly two children: key and value.
    KeyValuePair,
    /// Binary expression. Children: `[left, operator, right]`.
    Expression,
    /// Children: `[array identifier, index expression]`.
    ArrayAccess,
    Literal {
        value: String,
    },
    Operator {
        op: String,
    },
    Identifier {
        name: String,
    },
}

impl NodeKind {
    /// Short, stable name of the kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "program",
            NodeKind::Main => "main",
            NodeKind::Function { .. } => "function",
            NodeKind::ParamList => "param_list",
            NodeKind::CompoundStatement => "statement",
            NodeKind::VarDecl { .. } => "var_decl",
            NodeKind::Assignment => "assignment",
            NodeKind::IfStatement => "if",
            NodeKind::ElseStatement => "else",
            NodeKind::ForLoop { .. } => "for_loop",
            NodeKind::ReturnStatement { .. } => "return",
            NodeKind::FunctionCall => "function_call",
            NodeKind::ArrayDecl { .. } => "array",
            NodeKind::KeyValueDecl { .. } => "key_value",
            NodeKind::ExpressionList => "expression_list",
            NodeKind::ArgumentList => "arg_list",
            NodeKind::KeyValuePair => "key_value_pair",
            NodeKind::Expression => "expression",
            NodeKind::ArrayAccess => "array_access",
            NodeKind::Literal { .. } => "literal",
            NodeKind::Operator { .. } => "operator",
            NodeKind::Identifier { .. } => "identifier",
        }
    }
}

/// A node of the syntax tree.
///
/// A node exclusively owns its children and every sub-tree stored in its
/// [`NodeKind`]; dropping the root releases the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub children: Vec<AstNode>,
    pub location: SourceLocation,
}

impl AstNode {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            children: Vec::new(),
            location,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<AstNode>, location: SourceLocation) -> Self {
        Self {
            kind,
            children,
            location,
        }
    }

    pub fn identifier(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() }, location)
    }

    pub fn add_child(&mut self, child: AstNode) {
        self.children.push(child);
    }

    /// Take the generic child list, leaving the node childless.
    pub fn into_children(mut self) -> Vec<AstNode> {
        std::mem::take(&mut self.children)
    }

    /// Name carried by identifier nodes
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Total number of nodes in this sub-tree, including kind-owned sub-trees.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            count += 1;
            match &node.kind {
                NodeKind::Function { params, .. } => pending.push(&**params),
                NodeKind::ForLoop { start, end, .. } => {
                    pending.push(&**start);
                    pending.push(&**end);
                }
                NodeKind::ReturnStatement { value: Some(value) } => pending.push(&**value),
                _ => {}
            }
            pending.extend(node.children.iter());
        }

        count
    }
}

impl Drop for AstNode {
    /// Operator chains nest one level per operator, so children are torn down
    /// from a work list instead of recursively.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

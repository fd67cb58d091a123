// IR emission for the scripting language

use crate::ir::constants::*;
use crate::ir::errors::EmitError;
use crate::ir::instruction::{Instruction, Opcode};
use crate::parser::ast::{AstNode, NodeKind};
use log::debug;

/// Emitter configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// After a node's own lowering, walk its children again. This
    /// reproduces the legacy generic post-pass, which emits the children of
    /// every explicitly lowered kind twice. A call's own lowering then
    /// visits its arguments without `arg` lines, as the legacy walk did.
    /// Off by default.
    pub revisit_children: bool,
}

/// Lower `root` with default options.
pub fn emit(root: &AstNode) -> Result<Vec<Instruction>, EmitError> {
    Emitter::new(EmitOptions::default()).emit_program(root)
}

/// Depth-first tree walker producing a linear instruction log
pub struct Emitter {
    options: EmitOptions,
    instructions: Vec<Instruction>,
}

impl Emitter {
    pub fn new(options: EmitOptions) -> Self {
        Emitter {
            options,
            instructions: Vec::new(),
        }
    }

    /// Lower a whole tree and hand back the instructions
    pub fn emit_program(mut self, root: &AstNode) -> Result<Vec<Instruction>, EmitError> {
        self.emit_node(root)?;
        debug!(
            "emitted {} instructions from {} nodes",
            self.instructions.len(),
            root.node_count()
        );
        Ok(self.instructions)
    }

    fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn label(&mut self, name: &str) {
        self.push(Instruction::new(Opcode::Label).with_arg1(name));
    }

    fn goto(&mut self, name: &str) {
        self.push(Instruction::new(Opcode::Goto).with_arg1(name));
    }

    fn if_false(&mut self, target: &str) {
        self.push(
            Instruction::new(Opcode::IfFalse)
                .with_arg1(TEMP_CONDITION)
                .with_arg2(target),
        );
    }

    fn emit_children(&mut self, node: &AstNode) -> Result<(), EmitError> {
        for child in &node.children {
            self.emit_node(child)?;
        }
        Ok(())
    }

    /// Lower one node. Kinds without a lowering of their own just have their
    /// children visited.
    fn emit_node(&mut self, node: &AstNode) -> Result<(), EmitError> {
        if node.kind == NodeKind::Expression {
            return self.emit_expression(node);
        }

        let children_done = match &node.kind {
            NodeKind::Function { name, .. } => {
                self.push(Instruction::function_header(name.as_str()));
                self.emit_children(node)?;
                true
            }

            NodeKind::Main => {
                self.push(Instruction::function_header("main"));
                self.emit_children(node)?;
                self.push(Instruction::new(Opcode::EndMain));
                true
            }

            NodeKind::VarDecl { name } => {
                self.push(Instruction::new(Opcode::Alloc).with_arg1(name.as_str()));
                if let Some(value) = node.children.first() {
                    self.emit_node(value)?;
                    self.store(name, None);
                }
                true
            }

            NodeKind::Assignment => {
                self.emit_assignment(node)?;
                true
            }

            NodeKind::IfStatement => {
                self.emit_if(node)?;
                true
            }

            NodeKind::ForLoop {
                var_name,
                start,
                end,
            } => {
                self.emit_node(start)?;
                self.label(LOOP_START);
                self.emit_node(end)?;
                self.if_false(LOOP_END);
                self.emit_children(node)?;
                self.push(Instruction::new(Opcode::Add).with_arg1(var_name.as_str()));
                self.goto(LOOP_START);
                self.label(LOOP_END);
                true
            }

            NodeKind::ReturnStatement { value } => {
                if let Some(value) = value {
                    self.emit_node(value)?;
                }
                self.push(Instruction::new(Opcode::Return));
                true
            }

            NodeKind::FunctionCall => {
                self.emit_call(node)?;
                true
            }

            NodeKind::ArgumentList => {
                for arg in &node.children {
                    self.emit_node(arg)?;
                    self.push(Instruction::new(Opcode::Arg).with_arg1(TEMP_PARAM));
                }
                true
            }

            NodeKind::KeyValuePair => {
                let [key, value] = Self::expect_two(node, "key and value")?;
                self.emit_node(key)?;
                self.emit_node(value)?;
                self.push(
                    Instruction::new(Opcode::KeyValuePair)
                        .with_arg1(TEMP_KEY)
                        .with_arg2(TEMP_VALUE)
                        .with_result(TEMP_PAIR),
                );
                true
            }

            NodeKind::ArrayAccess => {
                let [array, index] = Self::expect_two(node, "array and index")?;
                self.emit_node(array)?;
                self.emit_node(index)?;
                self.push(
                    Instruction::new(Opcode::ArrayAccess)
                        .with_arg1(TEMP_ARRAY)
                        .with_arg2(TEMP_INDEX)
                        .with_result(TEMP_ELEMENT),
                );
                true
            }

            NodeKind::Literal { value } => {
                self.push(
                    Instruction::new(Opcode::LoadConst)
                        .with_arg1(value.as_str())
                        .with_result(TEMP_LITERAL),
                );
                true
            }

            NodeKind::Identifier { name } => {
                self.load(name);
                true
            }

            NodeKind::Operator { op } => {
                self.push(Instruction::new(Opcode::Operator).with_arg1(op.as_str()));
                true
            }

            // A named aggregate loads its name before its elements
            NodeKind::ArrayDecl { name: Some(name) } | NodeKind::KeyValueDecl { name: Some(name) } => {
                self.load(name);
                false
            }

            NodeKind::Program
            | NodeKind::ParamList
            | NodeKind::CompoundStatement
            | NodeKind::ElseStatement
            | NodeKind::ArrayDecl { name: None }
            | NodeKind::KeyValueDecl { name: None }
            | NodeKind::ExpressionList
            | NodeKind::Expression => false,
        };

        if !children_done || self.options.revisit_children {
            self.emit_children(node)?;
        }

        Ok(())
    }

    /// Operator chains are right nested, so the spine is followed in a loop
    /// and only the left operands recurse.
    fn emit_expression(&mut self, node: &AstNode) -> Result<(), EmitError> {
        let mut current = node;
        loop {
            match current.children.split_last() {
                Some((last, rest)) => {
                    for child in rest {
                        self.emit_node(child)?;
                    }
                    if last.kind == NodeKind::Expression {
                        current = last;
                    } else {
                        return self.emit_node(last);
                    }
                }
                None => return Ok(()),
            }
        }
    }

    fn load(&mut self, name: &str) {
        self.push(
            Instruction::new(Opcode::Load)
                .with_arg1(name)
                .with_result(TEMP_VAR),
        );
    }

    fn store(&mut self, name: &str, index: Option<&str>) {
        let mut store = Instruction::new(Opcode::Store).with_arg1(TEMP_VAR);
        if let Some(index) = index {
            store = store.with_arg2(index);
        }
        self.push(store.with_result(name));
    }

    /// `x = v` allocates and stores like a declaration; `a[i] = v` lowers the
    /// index and stores through it.
    fn emit_assignment(&mut self, node: &AstNode) -> Result<(), EmitError> {
        let [target, value] = Self::expect_two(node, "target and value")?;

        match &target.kind {
            NodeKind::Identifier { name } => {
                self.push(Instruction::new(Opcode::Alloc).with_arg1(name.as_str()));
                self.emit_node(value)?;
                self.store(name, None);
            }
            NodeKind::ArrayAccess => {
                let [array, index] = Self::expect_two(target, "array and index")?;
                let name = array.identifier_name().ok_or_else(|| EmitError::MalformedNode {
                    kind: target.kind.name(),
                    message: "indexed target is not an identifier".to_string(),
                    location: array.location,
                })?;
                self.emit_node(index)?;
                self.emit_node(value)?;
                self.store(name, Some(TEMP_INDEX));
            }
            other => {
                return Err(EmitError::MalformedNode {
                    kind: node.kind.name(),
                    message: format!("cannot assign to {}", other.name()),
                    location: target.location,
                });
            }
        }

        Ok(())
    }

    fn emit_if(&mut self, node: &AstNode) -> Result<(), EmitError> {
        let (condition, then_branch) = match node.children.as_slice() {
            [condition, then_branch, ..] => (condition, then_branch),
            _ => {
                return Err(EmitError::MalformedNode {
                    kind: node.kind.name(),
                    message: "expected a condition and a branch".to_string(),
                    location: node.location,
                });
            }
        };

        self.emit_node(condition)?;
        self.if_false(LABEL_ELSE);
        self.emit_node(then_branch)?;

        match node.children.get(2) {
            Some(else_node) if else_node.kind == NodeKind::ElseStatement => {
                let branch = else_node.children.first().ok_or_else(|| EmitError::MalformedNode {
                    kind: else_node.kind.name(),
                    message: "else without a branch".to_string(),
                    location: else_node.location,
                })?;
                self.goto(LABEL_END_IF);
                self.label(LABEL_ELSE);
                self.emit_node(branch)?;
            }
            _ => self.label(LABEL_ELSE),
        }

        self.label(LABEL_END_IF);
        Ok(())
    }

    /// Callee load, arguments, then the call. The second operand lists one
    /// parameter placeholder per argument.
    fn emit_call(&mut self, node: &AstNode) -> Result<(), EmitError> {
        let callee = node.children.first().ok_or_else(|| EmitError::MalformedNode {
            kind: node.kind.name(),
            message: "function call without a callee".to_string(),
            location: node.location,
        })?;
        self.emit_node(callee)?;

        let mut call = Instruction::new(Opcode::CallFunction).with_arg1(TEMP_FUNC_NAME);
        if let Some(args) = node.children.get(1) {
            if self.options.revisit_children {
                self.emit_children(args)?;
            } else {
                self.emit_node(args)?;
            }
            if !args.children.is_empty() {
                let params = vec![TEMP_PARAM; args.children.len()];
                call = call.with_arg2(params.join(PARAM_SEPARATOR));
            }
        }

        self.push(call.with_result(TEMP_RESULT));
        Ok(())
    }

    fn expect_two<'a>(node: &'a AstNode, what: &str) -> Result<[&'a AstNode; 2], EmitError> {
        match node.children.as_slice() {
            [first, second, ..] => Ok([first, second]),
            _ => Err(EmitError::MalformedNode {
                kind: node.kind.name(),
                message: format!("expected {what}, found {} children", node.children.len()),
                location: node.location,
            }),
        }
    }
}

//! Three-address style instructions
//!
//! An instruction is an opcode with up to two operands and a result. The
//! sequence is a flat log: instructions never refer to each other except
//! through the textual names they share.

use std::fmt;

/// The fixed opcode vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Header marker opening a function or `main`
    Function,
    Alloc,
    Store,
    Load,
    LoadConst,
    CallFunction,
    Arg,
    IfFalse,
    Goto,
    Label,
    Return,
    Add,
    Operator,
    ArrayAccess,
    KeyValuePair,
    EndMain,
}

impl Opcode {
    pub const ALL: [Opcode; 16] = [
        Opcode::Function,
        Opcode::Alloc,
        Opcode::Store,
        Opcode::Load,
        Opcode::LoadConst,
        Opcode::CallFunction,
        Opcode::Arg,
        Opcode::IfFalse,
        Opcode::Goto,
        Opcode::Label,
        Opcode::Return,
        Opcode::Add,
        Opcode::Operator,
        Opcode::ArrayAccess,
        Opcode::KeyValuePair,
        Opcode::EndMain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::Function => "function",
            Opcode::Alloc => "alloc",
            Opcode::Store => "store",
            Opcode::Load => "load",
            Opcode::LoadConst => "load_const",
            Opcode::CallFunction => "call_function",
            Opcode::Arg => "arg",
            Opcode::IfFalse => "if_false",
            Opcode::Goto => "goto",
            Opcode::Label => "label",
            Opcode::Return => "return",
            Opcode::Add => "add",
            Opcode::Operator => "operator",
            Opcode::ArrayAccess => "array_access",
            Opcode::KeyValuePair => "key_value_pair",
            Opcode::EndMain => "end_main",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub arg1: Option<String>,
    pub arg2: Option<String>,
    pub result: Option<String>,
}

impl Instruction {
    pub fn new(op: Opcode) -> Self {
        Self {
            op,
            arg1: None,
            arg2: None,
            result: None,
        }
    }

    pub fn with_arg1(mut self, arg: impl Into<String>) -> Self {
        self.arg1 = Some(arg.into());
        self
    }

    pub fn with_arg2(mut self, arg: impl Into<String>) -> Self {
        self.arg2 = Some(arg.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Header marker for a function body
    pub fn function_header(name: impl Into<String>) -> Self {
        Self::new(Opcode::Function).with_arg1(name)
    }
}

impl fmt::Display for Instruction {
    /// `op arg1 arg2 result`, absent operands left as empty fields. The
    /// function header renders as `Function: name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg1 = self.arg1.as_deref().unwrap_or("");

        if self.op == Opcode::Function {
            return write!(f, "Function: {}", arg1);
        }

        write!(
            f,
            "{} {} {} {}",
            self.op,
            arg1,
            self.arg2.as_deref().unwrap_or(""),
            self.result.as_deref().unwrap_or("")
        )
    }
}

/// Render a whole sequence, one instruction per line.
pub fn render(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in instructions {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format_keeps_empty_fields() {
        let load = Instruction::new(Opcode::Load)
            .with_arg1("x")
            .with_result("temp_var");
        assert_eq!(load.to_string(), "load x  temp_var");

        assert_eq!(Instruction::new(Opcode::Return).to_string(), "return   ");
        assert_eq!(
            Instruction::new(Opcode::Label).with_arg1("loop_end").to_string(),
            "label loop_end  "
        );
    }

    #[test]
    fn test_function_header_format() {
        assert_eq!(Instruction::function_header("main").to_string(), "Function: main");
    }

    #[test]
    fn test_render_lines() {
        let text = render(&[
            Instruction::function_header("f"),
            Instruction::new(Opcode::EndMain),
        ]);
        assert_eq!(text, "Function: f\nend_main   \n");
    }
}

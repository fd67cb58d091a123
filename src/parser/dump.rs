//! Indented debug rendering of a syntax tree
//!
//! One node per line, four spaces per depth level, using a fixed tag per
//! node kind. Name-bearing kinds print their name or value after the tag.
//! Only the generic child list is walked, so sub-trees owned by a kind
//! (parameter lists, loop bounds, return values) do not appear. The dump is
//! lossy and is not meant to be parsed back.

use crate::parser::ast::{AstNode, NodeKind};
use std::fmt::{self, Write};

/// Render `root` and all of its children.
pub fn dump_tree(root: &AstNode) -> String {
    let mut out = String::new();
    write_tree(&mut out, root, 0).expect("writing to a String cannot fail");
    out
}

/// Render `node` at `depth` into any formatter sink.
///
/// A named aggregate prints a bare tag followed by its name as an
/// `<identifier>` line one level deeper, ahead of its elements.
pub fn write_tree<W: Write>(out: &mut W, node: &AstNode, depth: usize) -> fmt::Result {
    let mut pending = vec![(node, depth)];

    while let Some((node, depth)) = pending.pop() {
        indent(out, depth)?;
        match &node.kind {
            NodeKind::Function { name, .. } => writeln!(out, "<function>: {}", name)?,
            NodeKind::VarDecl { name } => writeln!(out, "<var_decl>: {}", name)?,
            NodeKind::ForLoop { var_name, .. } => writeln!(out, "<for_loop>: {}", var_name)?,
            NodeKind::ArrayDecl { name: Some(name) } | NodeKind::KeyValueDecl { name: Some(name) } => {
                writeln!(out, "<{}>", node.kind.name())?;
                indent(out, depth + 1)?;
                writeln!(out, "<identifier>: {}", name)?;
            }
            NodeKind::Literal { value } => writeln!(out, "<literal>: {}", value)?,
            NodeKind::Operator { op } => writeln!(out, "<operator>: {}", op)?,
            NodeKind::Identifier { name } => writeln!(out, "<identifier>: {}", name)?,
            kind => writeln!(out, "<{}>", kind.name())?,
        }

        pending.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    Ok(())
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("    ")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    #[test]
    fn test_dump_layout() {
        let program = parse(tokenize("main() { x = a + 1; }")).unwrap();
        let expected = "\
<program>
    <main>
        <assignment>
            <identifier>: x
            <expression>
                <identifier>: a
                <operator>: +
                <literal>: 1
";
        assert_eq!(dump_tree(&program), expected);
    }

    #[test]
    fn test_dump_named_kinds() {
        let program = parse(tokenize(
            "function f(p) { for (i : 0, p) { } return; } v = 1; a = [2]; m = {};",
        ))
        .unwrap();
        let dump = dump_tree(&program);

        assert!(dump.contains("    <function>: f\n"));
        assert!(dump.contains("        <for_loop>: i\n"));
        assert!(dump.contains("        <return>\n"));
        assert!(dump.contains("    <var_decl>: v\n"));
        assert!(dump.contains("    <array>\n        <identifier>: a\n        <expression_list>\n"));
        assert!(dump.contains("    <key_value>\n        <identifier>: m\n"));
        assert!(!dump.contains("<array>: "));
        assert!(!dump.contains("<key_value>: "));
        // parameter list is owned by the function, not a child
        assert!(!dump.contains("<param_list>"));
    }

    #[test]
    fn test_dump_long_operator_chain() {
        let terms = 10_000;
        let source = format!("x = {};", vec!["1"; terms].join(" + "));
        let program = parse(tokenize(&source)).unwrap();
        let dump = dump_tree(&program);

        // program, var_decl, then per operator an expression line plus
        // operand and operator lines, and the final operand
        assert_eq!(dump.lines().count(), 2 + 3 * (terms - 1) + 1);
        let deepest = dump.lines().map(|line| line.len() - line.trim_start().len()).max();
        assert_eq!(deepest, Some(4 * (terms + 1)));
    }

    #[test]
    fn test_dump_control_flow_tags() {
        let program =
            parse(tokenize("main() { if (x) { f(1); } else g(); }")).unwrap();
        let dump = dump_tree(&program);

        for tag in [
            "<if>",
            "<statement>",
            "<function_call>",
            "<arg_list>",
            "<else>",
        ] {
            assert!(dump.contains(tag), "missing {tag} in\n{dump}");
        }
    }
}

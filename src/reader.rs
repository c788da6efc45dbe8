use crate::{parser::Node, value::Value};

fn read_number(node: &Node) -> Value {
    match node.contents.parse::<i64>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::error(format!("Invalid number: '{}'", node.contents)),
    }
}

fn is_punctuation(node: &Node) -> bool {
    matches!(node.contents.as_str(), "(" | ")" | "{" | "}") || node.tag == "regex"
}

fn read_children(node: &Node) -> Vec<Value> {
    node.children.iter()
        .filter(|child| !is_punctuation(child))
        .map(read)
        .collect()
}

/// Converts a parse tree node into a value tree.
///
/// The root node (`>`) becomes an implicit S-expression around every
/// top-level expression of the line.
pub fn read(node: &Node) -> Value {
    if node.has_tag("number") { return read_number(node); }
    if node.has_tag("symbol") { return Value::symbol(node.contents.as_str()); }
    if node.has_tag("qexpr") { return Value::QExpr(read_children(node)); }

    // Root and parenthesised groups
    Value::SExpr(read_children(node))
}

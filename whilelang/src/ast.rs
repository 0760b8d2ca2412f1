
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Program,
    StatementList,
    WhileLoop,
    Condition,
    RelOp,
    Assignment,
    LValue,
    Identifier,
    RomanNumeral,
    // A shifted terminal, waiting to be reduced.
    // Never part of a finished tree.
    Token,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::StatementList => "StatementList",
            NodeKind::WhileLoop => "WhileLoop",
            NodeKind::Condition => "Condition",
            NodeKind::RelOp => "RelOp",
            NodeKind::Assignment => "Assignment",
            NodeKind::LValue => "LValue",
            NodeKind::Identifier => "Identifier",
            NodeKind::RomanNumeral => "RomanNumeral",
            NodeKind::Token => "Token",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/*
 * Leaves carry a text (an identifier, a literal, an operator),
 * internal nodes carry their children. Parents own their children.
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Node {
        Node {
            kind,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn internal(kind: NodeKind, children: Vec<Node>) -> Node {
        Node {
            kind,
            text: None,
            children,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn into_text(self) -> String {
        self.text.unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /*
     * Depth-first, pre-order, children in their original order.
     */
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![(0, self)] }
    }

    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = 2 * depth)?;
        if !self.text().is_empty() {
            write!(f, " ({})", self.text())?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/*
 * Renders the tree one node per line, two spaces of indentation
 * per level: `Kind` or `Kind (text)`.
 */
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

// Yields `(depth, node)`.
pub struct Preorder<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::internal(NodeKind::Assignment, vec![
            Node::leaf(NodeKind::LValue, "y"),
            Node::leaf(NodeKind::RomanNumeral, "I"),
        ])
    }

    #[test]
    fn renders_indented() {
        let program = Node::internal(NodeKind::Program, vec![sample()]);
        assert_eq!(
            program.to_string(),
            "Program\n  Assignment\n    LValue (y)\n    RomanNumeral (I)\n"
        );
    }

    #[test]
    fn preorder_keeps_child_order() {
        let kinds: Vec<(usize, NodeKind)> = sample().preorder().map(|(d, n)| (d, n.kind)).collect();
        assert_eq!(kinds, vec![
            (0, NodeKind::Assignment),
            (1, NodeKind::LValue),
            (1, NodeKind::RomanNumeral),
        ]);
    }

    #[test]
    fn empty_text_is_not_printed() {
        assert_eq!(Node::leaf(NodeKind::Token, "").to_string(), "Token\n");
        assert!(Node::leaf(NodeKind::Token, "").is_leaf());
    }
}

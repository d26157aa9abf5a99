use std::fmt::Display;

use crate::grammar::Symbol;

/// A binary derivation tree over a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    Leaf { symbol: Symbol, word: String },
    Node { symbol: Symbol, left: Box<ParseTree>, right: Box<ParseTree> },
}

impl ParseTree {
    pub fn symbol(&self) -> &str {
        match self {
            ParseTree::Leaf { symbol, .. } | ParseTree::Node { symbol, .. } => symbol,
        }
    }

    /// The words under this node, left to right.
    pub fn words(&self) -> Vec<&str> {
        match self {
            ParseTree::Leaf { word, .. } => vec![word.as_str()],
            ParseTree::Node { left, right, .. } => {
                let mut words = left.words();
                words.extend(right.words());
                words
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            ParseTree::Leaf { .. } => 1,
            ParseTree::Node { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Single-line form, e.g. `(S (NP (Det the) (N cat)) (VP sleeps))`.
    pub fn to_bracketed(&self) -> String {
        match self {
            ParseTree::Leaf { symbol, word } => format!("({} {})", symbol, word),
            ParseTree::Node { symbol, left, right } => {
                format!("({} {} {})", symbol, left.to_bracketed(), right.to_bracketed())
            }
        }
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            ParseTree::Leaf { symbol, word } => writeln!(f, "{}{} -> '{}'", indent, symbol, word),
            ParseTree::Node { symbol, left, right } => {
                writeln!(f, "{}{}", indent, symbol)?;
                left.fmt_indented(f, depth + 1)?;
                right.fmt_indented(f, depth + 1)
            }
        }
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn leaf(symbol: &str, word: &str) -> ParseTree {
        ParseTree::Leaf { symbol: symbol.to_string(), word: word.to_string() }
    }

    fn node(symbol: &str, left: ParseTree, right: ParseTree) -> ParseTree {
        ParseTree::Node { symbol: symbol.to_string(), left: Box::new(left), right: Box::new(right) }
    }

    fn sleeping_cat() -> ParseTree {
        node("S", node("NP", leaf("Det", "the"), leaf("N", "cat")), leaf("VP", "sleeps"))
    }

    #[test]
    fn inspect_tree() {
        let tree = sleeping_cat();

        assert_eq!(tree.symbol(), "S");
        assert_eq!(tree.words(), vec!["the", "cat", "sleeps"]);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.to_bracketed(), "(S (NP (Det the) (N cat)) (VP sleeps))");
    }

    #[test]
    fn display_indented() {
        expect![[r#"
            S
              NP
                Det -> 'the'
                N -> 'cat'
              VP -> 'sleeps'
        "#]]
        .assert_eq(&sleeping_cat().to_string());
    }
}

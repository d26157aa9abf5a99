/*
    This module decides membership of sentences with the CYK algorithm
*/

mod chart;
mod tree;

use std::fmt::Display;
use std::time::{Duration, Instant};

use itertools::Itertools;

pub use chart::{Cell, Chart, Derivation};
pub use tree::ParseTree;

use crate::error_handling::ErrorType;
use crate::grammar::*;

/// Why a grammar cannot be handed to the CYK parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    // A production that is neither `A -> a` nor `A -> B C`
    InvalidGrammarShape { head: Symbol, alternative: Alternative },
    // The grammar has rules but its start symbol is unset or has none
    MissingStartSymbol(Option<Symbol>),
}

impl ErrorType for ShapeError {}

impl Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::InvalidGrammarShape { head, alternative } => write!(
                f,
                "Production `{} -> {}` is not in Chomsky Normal Form",
                head,
                alternative.join(" ")
            ),
            ShapeError::MissingStartSymbol(Some(symbol)) => {
                write!(f, "Start symbol `{}` has no productions", symbol)
            }
            ShapeError::MissingStartSymbol(None) => write!(f, "Grammar has no start symbol"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Lower-cases a sentence and splits it on whitespace.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence.to_lowercase().split_whitespace().map(str::to_string).collect()
}

// A -> word, with the word already lower-cased
#[derive(Debug)]
struct LexicalRule {
    head: Symbol,
    word: String,
}

// A -> left right
#[derive(Debug)]
struct BinaryRule {
    head: Symbol,
    left: Symbol,
    right: Symbol,
}

/// The result of parsing one sentence.
#[derive(Debug, Clone)]
pub struct Parse {
    pub accepted: bool,
    pub elapsed: Duration,
    // Only present for accepted sentences
    pub tree: Option<ParseTree>,
    pub chart: Chart,
}

/// A CYK recogniser over a grammar in Chomsky Normal Form.
///
/// The parser owns its grammar and never changes it; every call to
/// [`CykParser::parse`] builds its own chart, so one parser can serve many
/// threads at once.
///
/// When a span has several derivations for the same nonterminal the tree uses
/// the first one found. The chart is filled by increasing split point, then
/// by grammar order (heads in insertion order, alternatives in insertion
/// order), so the choice is deterministic but not meaningful.
#[derive(Debug)]
pub struct CykParser {
    grammar: Grammar,
    lexical: Vec<LexicalRule>,
    binary: Vec<BinaryRule>,
}

impl CykParser {
    pub fn new(grammar: Grammar) -> Result<Self, ShapeError> {
        if !grammar.is_empty() {
            match grammar.start_symbol() {
                Some(start) if grammar.is_non_terminal(start) => {}
                start => return Err(ShapeError::MissingStartSymbol(start.map(str::to_string))),
            }
        }

        let mut lexical = Vec::new();
        let mut binary = Vec::new();
        for (head, alternative) in grammar.productions() {
            match alternative.as_slice() {
                [word] if grammar.is_terminal(word) => {
                    lexical.push(LexicalRule { head: head.clone(), word: word.to_lowercase() })
                }
                [left, right] if grammar.is_non_terminal(left) && grammar.is_non_terminal(right) => {
                    binary.push(BinaryRule { head: head.clone(), left: left.clone(), right: right.clone() })
                }
                _ => {
                    return Err(ShapeError::InvalidGrammarShape {
                        head: head.clone(),
                        alternative: alternative.clone(),
                    })
                }
            }
        }

        Ok(CykParser { grammar, lexical, binary })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn parse(&self, sentence: &str) -> Parse {
        self.parse_tokens(&tokenize(sentence))
    }

    pub fn accepts(&self, sentence: &str) -> bool {
        self.parse(sentence).accepted
    }

    pub fn parse_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Parse {
        let started = Instant::now();
        let tokens = tokens.iter().map(|token| token.as_ref().to_lowercase()).collect_vec();
        let mut chart = Chart::new(tokens);

        let start = match self.grammar.start_symbol() {
            Some(start) if !chart.is_empty() => start,
            _ => {
                return Parse { accepted: false, elapsed: started.elapsed(), tree: None, chart };
            }
        };

        self.fill_diagonal(&mut chart);
        self.fill_spans(&mut chart);

        let last = chart.len() - 1;
        let accepted = chart.contains(0, last, start);
        let elapsed = started.elapsed();
        let tree = if accepted { build_tree(&chart, 0, last, start) } else { None };

        Parse { accepted, elapsed, tree, chart }
    }

    fn fill_diagonal(&self, chart: &mut Chart) {
        for j in 0..chart.len() {
            let token = chart.tokens()[j].clone();
            for rule in self.lexical.iter().filter(|rule| rule.word == token) {
                chart
                    .cell_mut(j, j)
                    .entry(rule.head.clone())
                    .or_default()
                    .push(Derivation::Terminal(token.clone()));
            }
        }
    }

    fn fill_spans(&self, chart: &mut Chart) {
        let n = chart.len();
        for length in 2..=n {
            for i in 0..=n - length {
                let j = i + length - 1;
                let mut cell = Cell::new();

                for split in i..j {
                    let (Some(left), Some(right)) = (chart.cell(i, split), chart.cell(split + 1, j)) else {
                        continue;
                    };
                    for rule in &self.binary {
                        if left.contains_key(&rule.left) && right.contains_key(&rule.right) {
                            cell.entry(rule.head.clone()).or_default().push(Derivation::Binary {
                                left: rule.left.clone(),
                                right: rule.right.clone(),
                                split,
                            });
                        }
                    }
                }

                chart.set_cell(i, j, cell);
            }
        }
    }
}

// Follows the first derivation of `symbol` over tokens i..=j. Returns None if
// the chart does not back the claim up
fn build_tree(chart: &Chart, i: usize, j: usize, symbol: &str) -> Option<ParseTree> {
    if i == j {
        return Some(ParseTree::Leaf { symbol: symbol.to_string(), word: chart.tokens().get(i)?.clone() });
    }

    match chart.derivations(i, j, symbol).first()? {
        Derivation::Binary { left, right, split } if (i..j).contains(split) => Some(ParseTree::Node {
            symbol: symbol.to_string(),
            left: Box::new(build_tree(chart, i, *split, left)?),
            right: Box::new(build_tree(chart, split + 1, j, right)?),
        }),
        _ => None,
    }
}

/*
    This module is for storing and inspecting context-free grammars
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;

// A grammar symbol. Whether it is a terminal or a nonterminal is decided by
// the grammar it lives in, not by the symbol itself
pub type Symbol = String;

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule, in insertion order
pub type Rewrite = Vec<Alternative>;

/// A context-free grammar.
///
/// Rules keep the order in which they were added: left-hand sides in order of
/// first appearance and alternatives in order of insertion. The CYK parser
/// breaks ties between derivations by that order.
///
/// A symbol is a nonterminal iff it has rules; every other symbol used on a
/// right-hand side is a terminal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grammar {
    start_symbol: Option<Symbol>,
    rules: IndexMap<Symbol, Rewrite>,
    terminals: BTreeSet<Symbol>,
    non_terminals: BTreeSet<Symbol>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::default()
    }

    pub fn add_production(&mut self, left: impl Into<Symbol>, right: Alternative) {
        let left = left.into();

        self.terminals.remove(&left);
        self.non_terminals.insert(left.clone());

        for symbol in &right {
            if !self.non_terminals.contains(symbol) {
                self.terminals.insert(symbol.clone());
            }
        }

        self.rules.entry(left).or_default().push(right);
    }

    pub fn set_start_symbol(&mut self, symbol: impl Into<Symbol>) {
        self.start_symbol = Some(symbol.into());
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    pub fn rules(&self) -> &IndexMap<Symbol, Rewrite> {
        &self.rules
    }

    /// The alternatives of `symbol`, empty if it has none.
    pub fn alternatives(&self, symbol: &str) -> &[Alternative] {
        self.rules.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<Symbol> {
        &self.non_terminals
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn production_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Iterates over every production as `(head, alternative)` in rule order.
    pub fn productions(&self) -> impl Iterator<Item = (&Symbol, &Alternative)> {
        self.rules
            .iter()
            .flat_map(|(head, rewrite)| rewrite.iter().map(move |alternative| (head, alternative)))
    }

    /// Whether every production is `A -> a` or `A -> B C`.
    pub fn is_cnf(&self) -> bool {
        self.productions().all(|(_, alternative)| self.is_cnf_alternative(alternative))
    }

    pub(crate) fn is_cnf_alternative(&self, alternative: &[Symbol]) -> bool {
        match alternative {
            [single] => self.is_terminal(single),
            [left, right] => self.is_non_terminal(left) && self.is_non_terminal(right),
            _ => false,
        }
    }

    /// Swaps in a whole new rule map and reclassifies every symbol.
    pub(crate) fn replace_rules(&mut self, rules: IndexMap<Symbol, Rewrite>) {
        self.non_terminals = rules.keys().cloned().collect();
        self.terminals = rules
            .values()
            .flatten()
            .flatten()
            .filter(|symbol| !rules.contains_key(*symbol))
            .cloned()
            .collect();
        self.rules = rules;
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Start symbol: {}", self.start_symbol().unwrap_or("(none)"))?;
        writeln!(f, "Productions:")?;
        for head in self.rules.keys().sorted() {
            for alternative in &self.rules[head] {
                writeln!(f, "  {} -> {}", head, alternative.join(" "))?;
            }
        }
        writeln!(f, "Terminals: {}", self.terminals.iter().join(", "))?;
        writeln!(f, "Nonterminals: {}", self.non_terminals.iter().join(", "))
    }
}

// Builds a grammar from `(head, "space separated body")` pairs, first head
// being the start symbol
#[cfg(test)]
pub(crate) fn grammar_from(rules: &[(&str, &str)]) -> Grammar {
    let mut grammar = Grammar::new();
    for (head, body) in rules {
        grammar.add_production(*head, body.split_whitespace().map(str::to_string).collect());
    }
    if let Some((head, _)) = rules.first() {
        grammar.set_start_symbol(*head);
    }
    grammar
}

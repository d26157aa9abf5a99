/*
    This module converts arbitrary grammars into Chomsky Normal Form
*/

mod arity;
mod left_recursion;
mod unit;
mod useless;

use std::collections::HashSet;
use std::fmt::Display;

use itertools::Itertools;

use crate::grammar::*;

/// What a single pass did to the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum PassReport {
    // (left recursive symbol, helper introduced for it). Empty means no-op
    LeftRecursion { rewritten: Vec<(Symbol, Symbol)> },
    UselessSymbols { kept: usize, removed: Vec<Symbol> },
    // Epsilon productions are seen but left alone
    EpsilonProductions { found: usize },
    UnitProductions { pairs: usize, stripped: usize },
    Arity { terminal_proxies: usize, binarized: usize },
}

impl Display for PassReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassReport::LeftRecursion { rewritten } if rewritten.is_empty() => {
                write!(f, "Left recursion: none found")
            }
            PassReport::LeftRecursion { rewritten } => write!(
                f,
                "Left recursion: rewrote {}",
                rewritten.iter().map(|(symbol, helper)| format!("{} (helper {})", symbol, helper)).join(", ")
            ),
            PassReport::UselessSymbols { kept, removed } if removed.is_empty() => {
                write!(f, "Useless symbols: kept {} symbols, removed none", kept)
            }
            PassReport::UselessSymbols { kept, removed } => {
                write!(f, "Useless symbols: kept {} symbols, removed {}", kept, removed.join(", "))
            }
            PassReport::EpsilonProductions { found } => {
                write!(f, "Epsilon productions: {} found, not eliminated", found)
            }
            PassReport::UnitProductions { pairs, stripped } => {
                write!(f, "Unit productions: {} closure pairs, {} stripped", pairs, stripped)
            }
            PassReport::Arity { terminal_proxies, binarized } => write!(
                f,
                "Arity: {} terminal proxies, {} productions binarized",
                terminal_proxies, binarized
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizationReport {
    pub passes: Vec<PassReport>,
}

impl Display for NormalizationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (number, pass) in self.passes.iter().enumerate() {
            writeln!(f, "Pass {}: {}", number + 1, pass)?;
        }
        Ok(())
    }
}

/// Allocates nonterminal names `X0`, `X1`, ... that collide with nothing in
/// the grammar being normalized or handed out before.
#[derive(Debug, Default)]
pub(crate) struct FreshSymbols {
    counter: usize,
    issued: HashSet<Symbol>,
}

impl FreshSymbols {
    pub(crate) fn next(&mut self, grammar: &Grammar) -> Symbol {
        loop {
            let candidate = format!("X{}", self.counter);
            self.counter += 1;

            let taken = grammar.is_non_terminal(&candidate)
                || grammar.is_terminal(&candidate)
                || grammar.start_symbol() == Some(candidate.as_str())
                || self.issued.contains(&candidate);
            if !taken {
                self.issued.insert(candidate.clone());
                return candidate;
            }
        }
    }
}

/// The output of a full normalization run.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub grammar: Grammar,
    pub report: NormalizationReport,
}

/// Runs the CNF passes over a private copy of a grammar.
///
/// The passes can be driven one at a time for inspection; [`Normalizer::run`]
/// applies all of them in order.
#[derive(Debug)]
pub struct Normalizer {
    grammar: Grammar,
    fresh: FreshSymbols,
    report: NormalizationReport,
}

impl Normalizer {
    pub fn new(grammar: &Grammar) -> Self {
        Normalizer {
            grammar: grammar.clone(),
            fresh: FreshSymbols::default(),
            report: NormalizationReport::default(),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn eliminate_left_recursion(&mut self) -> &PassReport {
        let report = left_recursion::eliminate(&mut self.grammar, &mut self.fresh);
        self.record(report)
    }

    pub fn eliminate_useless_symbols(&mut self) -> &PassReport {
        let report = useless::eliminate(&mut self.grammar);
        self.record(report)
    }

    /// Counts empty alternatives without touching them. Grammars that need
    /// them come out of normalization outside CNF.
    pub fn eliminate_epsilon_productions(&mut self) -> &PassReport {
        let found = self.grammar.productions().filter(|(_, alternative)| alternative.is_empty()).count();
        self.record(PassReport::EpsilonProductions { found })
    }

    pub fn eliminate_unit_productions(&mut self) -> &PassReport {
        let report = unit::eliminate(&mut self.grammar);
        self.record(report)
    }

    pub fn normalize_arity(&mut self) -> &PassReport {
        let report = arity::normalize(&mut self.grammar, &mut self.fresh);
        self.record(report)
    }

    pub fn run(mut self) -> Normalized {
        self.eliminate_left_recursion();
        self.eliminate_useless_symbols();
        self.eliminate_epsilon_productions();
        self.eliminate_unit_productions();
        self.normalize_arity();

        Normalized {
            grammar: self.grammar,
            report: self.report,
        }
    }

    fn record(&mut self, report: PassReport) -> &PassReport {
        self.report.passes.push(report);
        &self.report.passes[self.report.passes.len() - 1]
    }
}

/// Returns a CNF grammar generating the same language as `grammar`.
pub fn normalize(grammar: &Grammar) -> Grammar {
    Normalizer::new(grammar).run().grammar
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn english() -> Grammar {
        crate::loader::load_file(&"example_data/english.cfg".into()).unwrap()
    }

    #[test]
    fn fresh_symbols_skip_taken_names() {
        let grammar = grammar_from(&[("S", "X0 X2"), ("X1", "a")]);
        let mut fresh = FreshSymbols::default();

        let issued = (0..3).map(|_| fresh.next(&grammar)).collect_vec();
        assert_eq!(issued, vec!["X3", "X4", "X5"]);
    }

    #[test]
    fn normalize_to_cnf() {
        let grammars = vec![
            english(),
            grammar_from(&[("S", "a S b"), ("S", "a b")]),
            grammar_from(&[("E", "E + T"), ("E", "T"), ("T", "( E )"), ("T", "id")]),
            grammar_from(&[("S", "A"), ("A", "B"), ("B", "C"), ("C", "c d e f")]),
        ];

        for grammar in grammars {
            let normalized = normalize(&grammar);
            assert!(normalized.is_cnf(), "{}", normalized);
        }
    }

    #[test]
    fn normalization_leaves_input_alone() {
        let grammar = english();
        let before = grammar.clone();
        normalize(&grammar);
        assert_eq!(grammar, before);
    }

    #[test]
    fn drive_passes_individually() {
        let grammar = grammar_from(&[("S", "S a"), ("S", "b"), ("U", "u")]);
        let mut normalizer = Normalizer::new(&grammar);

        assert_eq!(
            normalizer.eliminate_left_recursion(),
            &PassReport::LeftRecursion { rewritten: vec![("S".to_string(), "X0".to_string())] }
        );
        assert_eq!(
            normalizer.eliminate_useless_symbols(),
            &PassReport::UselessSymbols { kept: 4, removed: vec!["U".to_string(), "u".to_string()] }
        );
        assert_eq!(normalizer.eliminate_epsilon_productions(), &PassReport::EpsilonProductions { found: 0 });
        assert!(!normalizer.grammar().is_non_terminal("U"));
    }

    #[test]
    fn epsilon_productions_pass_through() {
        let mut grammar = grammar_from(&[("S", "A b"), ("A", "a")]);
        grammar.add_production("A", vec![]);

        let normalized = Normalizer::new(&grammar).run();

        assert_eq!(normalized.report.passes[2], PassReport::EpsilonProductions { found: 1 });
        assert!(normalized.grammar.alternatives("A").iter().any(Vec::is_empty));
        assert!(!normalized.grammar.is_cnf());
    }

    #[test]
    fn report_english_normalization() {
        let report = Normalizer::new(&english()).run().report;

        expect![[r#"
            Pass 1: Left recursion: rewrote VP (helper X0)
            Pass 2: Useless symbols: kept 31 symbols, removed none
            Pass 3: Epsilon productions: 0 found, not eliminated
            Pass 4: Unit productions: 3 closure pairs, 3 stripped
            Pass 5: Arity: 0 terminal proxies, 1 productions binarized
        "#]]
        .assert_eq(&report.to_string());
    }
}

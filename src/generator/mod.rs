/*
    This module generates random sentences of a grammar
*/

use rand::prelude::*;
use std::collections::HashMap;
use std::fmt::Display;

use crate::error_handling::*;
use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // The start symbol is unset or has no rules
    UndefinedNonterminal(String),
    // The symbol never derives a string of terminals
    NonGenerating(String),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateErrorType::NonGenerating(nonterminal) => write!(f, "Nonterminal `{}` derives no sentence", nonterminal),
        }
    }
}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<Vec<String>, GenerateError>;

// Past this many nested expansions only the shallowest alternatives are used
pub const DEFAULT_DEPTH: usize = 12;

// Height of the shallowest derivation tree for every generating nonterminal.
// Terminals have height 0
fn derivation_heights(grammar: &Grammar) -> HashMap<&str, usize> {
    let mut heights: HashMap<&str, usize> = HashMap::new();

    let height_of = |heights: &HashMap<&str, usize>, alternative: &Alternative| {
        alternative.iter().try_fold(0, |height, symbol| {
            if grammar.is_terminal(symbol) {
                Some(height)
            } else {
                heights.get(symbol.as_str()).map(|h| height.max(*h))
            }
        })
    };

    let mut changed = true;
    while changed {
        changed = false;
        for (head, rewrite) in grammar.rules() {
            let best = rewrite.iter().filter_map(|alternative| height_of(&heights, alternative)).min();
            if let Some(best) = best {
                if heights.get(head.as_str()).map_or(true, |current| best + 1 < *current) {
                    heights.insert(head.as_str(), best + 1);
                    changed = true;
                }
            }
        }
    }

    heights
}

/// Random sentence generator that always terminates.
///
/// Alternatives are picked uniformly until the expansion is `depth` levels
/// deep; below that only alternatives of minimal height are eligible, so every
/// further step gets closer to the terminals.
pub struct Generator<'a> {
    grammar: &'a Grammar,
    heights: HashMap<&'a str, usize>,
    depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        Generator { grammar, heights: derivation_heights(grammar), depth: DEFAULT_DEPTH }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn generate(&self, rng: &mut impl Rng, location: &Location) -> GenResult {
        let start = self.grammar.start_symbol().ok_or_else(|| GenerateError {
            location: location.clone(),
            error: GenerateErrorType::UndefinedNonterminal(String::new()),
        })?;
        self.generate_with_override(start, rng, location)
    }

    // Generates a sentence in the grammar starting with the given symbol
    pub fn generate_with_override(&self, start: &str, rng: &mut impl Rng, location: &Location) -> GenResult {
        if !self.grammar.is_non_terminal(start) {
            return Err(GenerateError {
                location: location.clone(),
                error: GenerateErrorType::UndefinedNonterminal(start.to_string()),
            });
        }
        if !self.heights.contains_key(start) {
            return Err(GenerateError {
                location: location.clone(),
                error: GenerateErrorType::NonGenerating(start.to_string()),
            });
        }

        let mut words = Vec::new();
        self.generate_nonterminal(start, 0, rng, &mut words);
        Ok(words)
    }

    fn generate_nonterminal(&self, nonterminal: &str, depth: usize, rng: &mut impl Rng, words: &mut Vec<String>) {
        let Some(alternative) = self.choose(nonterminal, depth, rng) else {
            return;
        };

        for symbol in alternative {
            if self.grammar.is_terminal(symbol) {
                words.push(symbol.clone());
            } else {
                self.generate_nonterminal(symbol, depth + 1, rng, words);
            }
        }
    }

    fn choose(&self, nonterminal: &str, depth: usize, rng: &mut impl Rng) -> Option<&'a Alternative> {
        let candidates: Vec<(&Alternative, usize)> = self
            .grammar
            .alternatives(nonterminal)
            .iter()
            .filter_map(|alternative| self.height(alternative).map(|height| (alternative, height)))
            .collect();

        if depth < self.depth {
            return candidates.choose(rng).map(|(alternative, _)| *alternative);
        }

        let lowest = candidates.iter().map(|(_, height)| *height).min()?;
        let shallow: Vec<&Alternative> = candidates
            .into_iter()
            .filter(|(_, height)| *height == lowest)
            .map(|(alternative, _)| alternative)
            .collect();
        shallow.choose(rng).copied()
    }

    // None if some symbol of the alternative never finishes deriving
    fn height(&self, alternative: &Alternative) -> Option<usize> {
        alternative.iter().try_fold(0, |height, symbol| {
            if self.grammar.is_terminal(symbol) {
                Some(height)
            } else {
                self.heights.get(symbol.as_str()).map(|h| height.max(*h))
            }
        })
    }
}

/// Generates one sentence of `grammar` from its start symbol.
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, location: &Location) -> GenResult {
    Generator::new(grammar).generate(rng, location)
}

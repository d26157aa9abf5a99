use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;

use super::PassReport;
use crate::grammar::*;

// Least fixed point of "some alternative consists of generating symbols",
// seeded with the terminals
fn generating_symbols(grammar: &Grammar) -> HashSet<&Symbol> {
    let mut generating: HashSet<&Symbol> = grammar.terminals().iter().collect();

    let mut changed = true;
    while changed {
        changed = false;
        for (head, rewrite) in grammar.rules() {
            if generating.contains(head) {
                continue;
            }
            if rewrite.iter().any(|alternative| alternative.iter().all(|symbol| generating.contains(symbol))) {
                generating.insert(head);
                changed = true;
            }
        }
    }

    generating
}

// Everything reachable from the start symbol through `rules`
fn reachable_symbols<'a>(start: Option<&'a str>, rules: &'a IndexMap<Symbol, Rewrite>) -> HashSet<&'a str> {
    let mut reachable = HashSet::new();
    let mut pending = start.into_iter().collect_vec();

    while let Some(symbol) = pending.pop() {
        if !reachable.insert(symbol) {
            continue;
        }
        for alternative in rules.get(symbol).into_iter().flatten() {
            pending.extend(alternative.iter().map(String::as_str).filter(|s| !reachable.contains(s)));
        }
    }

    reachable
}

/// Drops every symbol that derives no terminal string or cannot be reached
/// from the start symbol, together with every production using one.
///
/// Reachability is computed over the generating productions only, so running
/// the pass twice changes nothing the second time.
pub(super) fn eliminate(grammar: &mut Grammar) -> PassReport {
    let generating = generating_symbols(grammar);

    let productive: IndexMap<Symbol, Rewrite> = grammar
        .rules()
        .iter()
        .filter(|(head, _)| generating.contains(head))
        .map(|(head, rewrite)| {
            let alternatives = rewrite
                .iter()
                .filter(|alternative| alternative.iter().all(|symbol| generating.contains(symbol)))
                .cloned()
                .collect_vec();
            (head.clone(), alternatives)
        })
        .collect();

    let reachable = reachable_symbols(grammar.start_symbol(), &productive);

    let useful: IndexMap<Symbol, Rewrite> = productive
        .iter()
        .filter(|(head, alternatives)| reachable.contains(head.as_str()) && !alternatives.is_empty())
        .map(|(head, alternatives)| (head.clone(), alternatives.clone()))
        .collect();

    let before: HashSet<Symbol> = grammar.terminals().union(grammar.non_terminals()).cloned().collect();
    grammar.replace_rules(useful);

    let removed = before
        .into_iter()
        .filter(|symbol| !grammar.is_terminal(symbol) && !grammar.is_non_terminal(symbol))
        .sorted()
        .collect_vec();
    let kept = grammar.terminals().len() + grammar.non_terminals().len();

    PassReport::UselessSymbols { kept, removed }
}

use indexmap::{IndexMap, IndexSet};

use super::PassReport;
use crate::grammar::*;

fn is_unit(grammar: &Grammar, alternative: &Alternative) -> bool {
    alternative.len() == 1 && grammar.is_non_terminal(&alternative[0])
}

// For every nonterminal A, each B with A =>* B through unit productions only.
// Pairs are ordered by discovery so the copied alternatives come out stable
fn unit_closure(grammar: &Grammar) -> IndexMap<&Symbol, IndexSet<&Symbol>> {
    let mut closure: IndexMap<&Symbol, IndexSet<&Symbol>> = grammar
        .rules()
        .iter()
        .map(|(head, rewrite)| {
            let targets = rewrite
                .iter()
                .filter(|alternative| is_unit(grammar, alternative))
                .map(|alternative| &alternative[0])
                .collect();
            (head, targets)
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for index in 0..closure.len() {
            let implied: Vec<&Symbol> = closure[index]
                .iter()
                .filter_map(|target| closure.get(*target))
                .flatten()
                .copied()
                .filter(|symbol| !closure[index].contains(*symbol))
                .collect();

            if !implied.is_empty() {
                closure[index].extend(implied);
                changed = true;
            }
        }
    }

    closure
}

/// Gives every nonterminal the non-unit alternatives of each nonterminal it
/// reaches through unit productions, then strips the unit productions.
pub(super) fn eliminate(grammar: &mut Grammar) -> PassReport {
    let closure = unit_closure(grammar);
    let pairs = closure.values().map(IndexSet::len).sum();

    let mut stripped = 0;
    let mut rules: IndexMap<Symbol, Rewrite> = IndexMap::with_capacity(grammar.rules().len());

    for (head, rewrite) in grammar.rules() {
        let mut alternatives = Rewrite::with_capacity(rewrite.len());
        for alternative in rewrite {
            if is_unit(grammar, alternative) {
                stripped += 1;
            } else {
                alternatives.push(alternative.clone());
            }
        }

        for target in &closure[head] {
            for alternative in grammar.alternatives(target) {
                if !is_unit(grammar, alternative) && !alternatives.contains(alternative) {
                    alternatives.push(alternative.clone());
                }
            }
        }

        rules.insert(head.clone(), alternatives);
    }

    grammar.replace_rules(rules);
    PassReport::UnitProductions { pairs, stripped }
}

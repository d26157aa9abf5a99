use itertools::Itertools;

use super::{FreshSymbols, PassReport};
use crate::grammar::*;

// An alternative is left recursive when it starts with its own head
fn is_left_recursive(head: &str, alternative: &Alternative) -> bool {
    alternative.first().is_some_and(|first| first == head)
}

// Each alternative once followed by `helper`, once without it
fn with_optional_helper(alternatives: Vec<Alternative>, helper: &Symbol) -> Rewrite {
    alternatives
        .into_iter()
        .flat_map(|alternative| {
            let mut extended = alternative.clone();
            extended.push(helper.clone());
            [extended, alternative]
        })
        .collect()
}

/// Rewrites every directly left recursive nonterminal `X -> X a | b` into
/// `X -> b H | b` and `H -> a H | a` with a fresh helper `H`.
pub(super) fn eliminate(grammar: &mut Grammar, fresh: &mut FreshSymbols) -> PassReport {
    let recursive_heads = grammar
        .rules()
        .iter()
        .filter(|(head, rewrite)| rewrite.iter().any(|alternative| is_left_recursive(head, alternative)))
        .map(|(head, _)| head.clone())
        .collect_vec();

    if recursive_heads.is_empty() {
        return PassReport::LeftRecursion { rewritten: Vec::new() };
    }

    let mut rules = grammar.rules().clone();
    let mut rewritten = Vec::with_capacity(recursive_heads.len());

    for head in recursive_heads {
        let (recursive, base): (Vec<_>, Vec<_>) = rules[&head]
            .iter()
            .cloned()
            .partition(|alternative| is_left_recursive(&head, alternative));

        // `X -> X` adds nothing to the language
        let tails = recursive
            .into_iter()
            .filter(|alternative| alternative.len() > 1)
            .map(|alternative| alternative[1..].to_vec())
            .collect_vec();

        if tails.is_empty() {
            rules[&head] = base;
            continue;
        }

        let helper = fresh.next(grammar);
        rules[&head] = with_optional_helper(base, &helper);
        rules.insert(helper.clone(), with_optional_helper(tails, &helper));
        rewritten.push((head, helper));
    }

    grammar.replace_rules(rules);
    PassReport::LeftRecursion { rewritten }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(grammar: &mut Grammar) -> PassReport {
        eliminate(grammar, &mut FreshSymbols::default())
    }

    fn strings(symbols: &[&str]) -> Alternative {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_verb_phrase() {
        let mut grammar = grammar_from(&[
            ("S", "NP VP"),
            ("VP", "VP PP"),
            ("VP", "V NP"),
            ("PP", "P NP"),
            ("NP", "she"),
            ("V", "eats"),
            ("P", "with"),
        ]);

        let report = run(&mut grammar);

        assert_eq!(report, PassReport::LeftRecursion { rewritten: vec![("VP".to_string(), "X0".to_string())] });
        assert_eq!(grammar.alternatives("VP"), &[strings(&["V", "NP", "X0"]), strings(&["V", "NP"])]);
        assert_eq!(grammar.alternatives("X0"), &[strings(&["PP", "X0"]), strings(&["PP"])]);
        for (head, alternative) in grammar.productions() {
            assert_ne!(alternative.first(), Some(head), "{} -> {:?}", head, alternative);
        }
    }

    #[test]
    fn rewrite_every_recursive_symbol() {
        let mut grammar = grammar_from(&[
            ("E", "E + T"),
            ("E", "T"),
            ("T", "T * F"),
            ("T", "F"),
            ("F", "id"),
        ]);

        let report = run(&mut grammar);

        assert_eq!(
            report,
            PassReport::LeftRecursion {
                rewritten: vec![("E".to_string(), "X0".to_string()), ("T".to_string(), "X1".to_string())]
            }
        );
        assert_eq!(grammar.alternatives("X1"), &[strings(&["*", "F", "X1"]), strings(&["*", "F"])]);
        for (head, alternative) in grammar.productions() {
            assert_ne!(alternative.first(), Some(head));
        }
    }

    #[test]
    fn drop_trivial_self_production() {
        let mut grammar = grammar_from(&[("S", "S"), ("S", "a")]);

        assert_eq!(run(&mut grammar), PassReport::LeftRecursion { rewritten: Vec::new() });
        assert_eq!(grammar.alternatives("S"), &[strings(&["a"])]);
    }

    #[test]
    fn no_recursion_is_a_no_op() {
        let mut grammar = grammar_from(&[("S", "A B"), ("A", "a"), ("B", "b")]);
        let before = grammar.clone();

        assert_eq!(run(&mut grammar), PassReport::LeftRecursion { rewritten: Vec::new() });
        assert_eq!(grammar, before);
    }
}

use indexmap::IndexMap;

use super::{FreshSymbols, PassReport};
use crate::grammar::*;

// Replaces terminals inside multi-symbol alternatives with proxy
// nonterminals `T -> t`, one per distinct terminal
fn substitute_terminals(grammar: &mut Grammar, fresh: &mut FreshSymbols) -> usize {
    let mut proxies: IndexMap<Symbol, Symbol> = IndexMap::new();
    let mut rules: IndexMap<Symbol, Rewrite> = IndexMap::with_capacity(grammar.rules().len());

    for (head, rewrite) in grammar.rules() {
        rules.entry(head.clone()).or_default();

        for alternative in rewrite {
            if alternative.len() < 2 {
                rules[head].push(alternative.clone());
                continue;
            }

            let mut substituted = Alternative::with_capacity(alternative.len());
            for symbol in alternative {
                if !grammar.is_terminal(symbol) {
                    substituted.push(symbol.clone());
                    continue;
                }
                let proxy = match proxies.get(symbol) {
                    Some(proxy) => proxy.clone(),
                    None => {
                        let proxy = fresh.next(grammar);
                        proxies.insert(symbol.clone(), proxy.clone());
                        rules.insert(proxy.clone(), vec![vec![symbol.clone()]]);
                        proxy
                    }
                };
                substituted.push(proxy);
            }
            rules[head].push(substituted);
        }
    }

    grammar.replace_rules(rules);
    proxies.len()
}

// Splits `A -> s1 s2 ... sn` into `A -> s1 X1`, `X1 -> s2 X2`, ...,
// `Xn-2 -> sn-1 sn`
fn binarize(grammar: &mut Grammar, fresh: &mut FreshSymbols) -> usize {
    let mut binarized = 0;
    let mut rules: IndexMap<Symbol, Rewrite> = IndexMap::with_capacity(grammar.rules().len());

    for (head, rewrite) in grammar.rules() {
        rules.entry(head.clone()).or_default();

        for alternative in rewrite {
            if alternative.len() <= 2 {
                rules[head].push(alternative.clone());
                continue;
            }

            binarized += 1;
            let (prefix, last_two) = alternative.split_at(alternative.len() - 2);
            let mut current = head.clone();
            for symbol in prefix {
                let next = fresh.next(grammar);
                rules.entry(current).or_default().push(vec![symbol.clone(), next.clone()]);
                current = next;
            }
            rules.entry(current).or_default().push(last_two.to_vec());
        }
    }

    grammar.replace_rules(rules);
    binarized
}

/// Brings every alternative down to a single terminal or two nonterminals.
pub(super) fn normalize(grammar: &mut Grammar, fresh: &mut FreshSymbols) -> PassReport {
    let terminal_proxies = substitute_terminals(grammar, fresh);
    let binarized = binarize(grammar, fresh);

    PassReport::Arity { terminal_proxies, binarized }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn productions(grammar: &Grammar) -> Vec<String> {
        grammar
            .productions()
            .map(|(head, alternative)| format!("{} -> {}", head, alternative.join(" ")))
            .collect_vec()
    }

    #[test]
    fn share_terminal_proxies() {
        let mut grammar = grammar_from(&[("S", "a S b"), ("S", "a b")]);

        let report = normalize(&mut grammar, &mut FreshSymbols::default());

        assert_eq!(report, PassReport::Arity { terminal_proxies: 2, binarized: 1 });
        assert_eq!(
            productions(&grammar),
            vec!["S -> X0 X2", "S -> X0 X1", "X2 -> S X1", "X0 -> a", "X1 -> b"]
        );
        assert!(grammar.is_cnf());
    }

    #[test]
    fn binarize_left_to_right() {
        let mut grammar = grammar_from(&[("A", "B C D E"), ("B", "b"), ("C", "c"), ("D", "d"), ("E", "e")]);

        normalize(&mut grammar, &mut FreshSymbols::default());

        assert_eq!(
            productions(&grammar)[..3],
            ["A -> B X0", "X0 -> C X1", "X1 -> D E"]
        );
    }

    #[test]
    fn single_symbol_alternatives_stay() {
        let mut grammar = grammar_from(&[("S", "A B"), ("A", "a"), ("B", "b")]);
        let before = grammar.clone();

        let report = normalize(&mut grammar, &mut FreshSymbols::default());

        assert_eq!(report, PassReport::Arity { terminal_proxies: 0, binarized: 0 });
        assert_eq!(grammar, before);
    }
}

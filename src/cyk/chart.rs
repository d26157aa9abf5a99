use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::grammar::Symbol;

// Column width used when rendering the chart
const CELL_WIDTH: usize = 20;

/// How a nonterminal came to cover a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    // A -> word, only on the diagonal
    Terminal(String),
    // A -> left right with left covering i..=split and right split+1..=j
    Binary { left: Symbol, right: Symbol, split: usize },
}

// Nonterminals deriving one span, each with its derivations in discovery order
pub type Cell = IndexMap<Symbol, Vec<Derivation>>;

/// The recognition and backpointer tables of one parse.
///
/// Cell `(i, j)` with `i <= j` holds every nonterminal deriving tokens
/// `i..=j`. Cells below the diagonal do not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    tokens: Vec<String>,
    // Row i stores cells (i, i) ..= (i, n - 1)
    rows: Vec<Vec<Cell>>,
}

impl Chart {
    pub(crate) fn new(tokens: Vec<String>) -> Self {
        let n = tokens.len();
        let rows = (0..n).map(|i| vec![Cell::new(); n - i]).collect();
        Chart { tokens, rows }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The cell for tokens `i..=j`, `None` outside the triangle.
    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        if j < i {
            return None;
        }
        self.rows.get(i)?.get(j - i)
    }

    pub(crate) fn cell_mut(&mut self, i: usize, j: usize) -> &mut Cell {
        &mut self.rows[i][j - i]
    }

    pub(crate) fn set_cell(&mut self, i: usize, j: usize, cell: Cell) {
        self.rows[i][j - i] = cell;
    }

    /// Nonterminals deriving tokens `i..=j`, in the order they were found.
    pub fn symbols(&self, i: usize, j: usize) -> impl Iterator<Item = &Symbol> {
        self.cell(i, j).into_iter().flat_map(IndexMap::keys)
    }

    pub fn contains(&self, i: usize, j: usize, symbol: &str) -> bool {
        self.cell(i, j).is_some_and(|cell| cell.contains_key(symbol))
    }

    pub fn derivations(&self, i: usize, j: usize, symbol: &str) -> &[Derivation] {
        self.cell(i, j)
            .and_then(|cell| cell.get(symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(empty chart)");
        }

        writeln!(f, "Words: {}", self.tokens.join(" "))?;
        for i in (0..self.len()).rev() {
            let cells = (0..self.len())
                .map(|j| {
                    let content = match self.cell(i, j) {
                        Some(cell) => format!("{{{}}}", cell.keys().sorted().join(", ")),
                        None => String::new(),
                    };
                    let shown: String = content.chars().take(CELL_WIDTH).collect();
                    format!("{:<width$}", shown, width = CELL_WIDTH)
                })
                .join(" ");
            writeln!(f, "Row {}: {}", i, cells.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Chart {
        let mut chart = Chart::new(vec!["the".to_string(), "cat".to_string()]);
        chart.cell_mut(0, 0).insert("Det".to_string(), vec![Derivation::Terminal("the".to_string())]);
        chart.cell_mut(1, 1).insert("N".to_string(), vec![Derivation::Terminal("cat".to_string())]);
        chart.cell_mut(0, 1).insert(
            "NP".to_string(),
            vec![Derivation::Binary { left: "Det".to_string(), right: "N".to_string(), split: 0 }],
        );
        chart
    }

    #[test]
    fn read_triangle() {
        let chart = chart();

        assert_eq!(chart.len(), 2);
        assert!(chart.contains(0, 1, "NP"));
        assert!(!chart.contains(0, 1, "Det"));
        assert!(chart.cell(1, 0).is_none());
        assert!(chart.cell(0, 2).is_none());
        assert!(!chart.contains(5, 7, "NP"));
        assert_eq!(chart.symbols(0, 0).collect::<Vec<_>>(), vec!["Det"]);
        assert_eq!(chart.derivations(1, 1, "N"), &[Derivation::Terminal("cat".to_string())]);
        assert!(chart.derivations(1, 1, "NP").is_empty());
    }

    #[test]
    fn render_rows_longest_span_first() {
        let rendered = chart().to_string();

        assert_eq!(
            rendered.lines().collect::<Vec<_>>(),
            vec![
                "Words: the cat",
                "Row 1:                      {N}",
                "Row 0: {Det}                {NP}",
            ]
        );
    }
}

use std::iter::Peekable;
use std::str::CharIndices;

use itertools::{Itertools, PeekingNext};

pub const ARROW: &str = "->";

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Symbol(String)
}

// A symbol runs until whitespace, `|` or the start of an arrow
pub fn lex_symbol(line: &str, chars: &mut impl PeekingNext<Item = (usize, char)>) -> Token {
    let text = chars
        .peeking_take_while(|&(index, c)| !c.is_whitespace() && c != '|' && !line[index..].starts_with(ARROW))
        .map(|(_, c)| c)
        .collect();

    Token::Symbol(text)
}

pub fn lex_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut line_chars: Peekable<CharIndices> = line.char_indices().peekable();

    while let Some(&(index, c)) = line_chars.peek() {
        if line[index..].starts_with(ARROW) {
            line_chars.nth(ARROW.len() - 1);
            tokens.push(Token::Arrow);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if !c.is_whitespace() {
            tokens.push(lex_symbol(line, &mut line_chars));
        } else {
            line_chars.next();
        }
    }

    tokens
}

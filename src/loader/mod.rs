/*
    This module loads grammars written as `LHS -> RHS | RHS` lines
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use verifier::verify_rules;

#[derive(Debug)]
pub enum LoadErrorType {
    // A rule line has no `->`
    MissingArrow,
    // A `->` shows up inside the right-hand side
    UnexpectedArrow,
    // The rule does not start with exactly one symbol before `->`
    MissingNonterminal,
    // An alternative with no symbols, i.e. an epsilon production
    EmptyAlternative,
    // The requested start symbol has no rule
    UndefinedStartSymbol(String),
    // The source contains no rules at all
    NoRules,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for LoadErrorType {}

impl PartialEq for LoadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadErrorType::FileError(a), LoadErrorType::FileError(b)) => a.kind() == b.kind(),
            (LoadErrorType::UndefinedStartSymbol(a), LoadErrorType::UndefinedStartSymbol(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for LoadErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadErrorType::MissingArrow => write!(f, "Expected `{}` after nonterminal", ARROW),
            LoadErrorType::UnexpectedArrow => write!(f, "Unexpected `{}` encountered", ARROW),
            LoadErrorType::MissingNonterminal => write!(f, "Expected a single nonterminal before `{}`", ARROW),
            LoadErrorType::EmptyAlternative => write!(f, "Empty alternatives (epsilon productions) are not supported"),
            LoadErrorType::UndefinedStartSymbol(symbol) => write!(f, "Start symbol `{}` has no rule", symbol),
            LoadErrorType::NoRules => write!(f, "No rules found"),
            LoadErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type LoadError = Error<LoadErrorType>;
pub type LoadErrors = Errors<LoadErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> LoadError {
    LoadError {
        location: Location::whole(file),
        error: LoadErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, LoadErrorType>;
pub type LineResult<T> = std::result::Result<T, LoadError>;
pub type FileResult<T> = std::result::Result<T, LoadErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: Symbol,
    rewrite: Rewrite,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    if tokens.is_empty() {
        return Err(LoadErrorType::EmptyAlternative);
    }

    tokens.iter().map(|t| match t {
        Token::Arrow => Err(LoadErrorType::UnexpectedArrow),
        Token::Or => Err(LoadErrorType::EmptyAlternative),
        Token::Symbol(s) => Ok(s.clone())
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let symbol = match tokens.first() {
        Some(Token::Symbol(s)) => s.clone(),
        _ => return Err(LoadErrorType::MissingNonterminal),
    };

    if tokens.get(1) != Some(&Token::Arrow) {
        // `A B -> c` has an arrow, just too late
        return if tokens.contains(&Token::Arrow) {
            Err(LoadErrorType::MissingNonterminal)
        } else {
            Err(LoadErrorType::MissingArrow)
        };
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    Ok(Rule {
        symbol,
        rewrite,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    parse_line(&lexer::lex_line(line), location.clone())
        .map_err(|error| LoadError { location, error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

// Numbers the lines of a source and keeps those that may hold a rule.
// Read errors are kept so they get reported
fn rule_lines<'a>(
    lines: impl Iterator<Item = LineResult<String>> + 'a
) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    lines
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn load_lines(
    lines: impl Iterator<Item = LineResult<String>>,
    file: &PathBuf,
    start: Option<&str>
) -> FileResult<Grammar> {
    let parsed_lines = rule_lines(lines).map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: file.clone(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    grammar_from_rules(rules, file, start)
}

fn grammar_from_rules(rules: Vec<Rule>, file: &PathBuf, start: Option<&str>) -> FileResult<Grammar> {
    verify_rules(&rules, file, start)?;

    let mut grammar = Grammar::new();
    // The first rule's symbol starts the grammar unless told otherwise
    let start_symbol = start.map_or_else(|| rules[0].symbol.clone(), str::to_string);

    for rule in rules {
        for alternative in rule.rewrite {
            grammar.add_production(rule.symbol.clone(), alternative);
        }
    }
    grammar.set_start_symbol(start_symbol);

    Ok(grammar)
}

/// Loads a grammar from text, one rule per line.
pub fn load_str(text: &str) -> FileResult<Grammar> {
    load_lines(text.lines().map(|line| Ok(line.to_string())), &PathBuf::from("<input>"), None)
}

pub fn load_file(path: &PathBuf) -> FileResult<Grammar> {
    load_file_with_start(path, None)
}

pub fn load_file_with_start(path: &PathBuf, start: Option<&str>) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.clone())])?;
    let lines = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| io_error(e, path.clone())));

    load_lines(lines, path, start)
}

use std::path::PathBuf;

use super::LoadErrorType::{NoRules, UndefinedStartSymbol};
use super::{FileResult, LoadError, LoadErrors, Location, Rule};

fn get_missing_rules(rules: &[Rule], file: &PathBuf) -> LoadErrors {
    if rules.is_empty() {
        vec![LoadError { location: Location::whole(file.clone()), error: NoRules }]
    } else {
        Vec::new()
    }
}

fn get_undefined_start(rules: &[Rule], file: &PathBuf, start: Option<&str>) -> LoadErrors {
    // Only an explicitly requested start symbol can be missing; the default
    // is the first rule's own symbol
    start
        .filter(|start| !rules.iter().any(|rule| rule.symbol == *start))
        .map(|start| LoadError {
            location: Location::whole(file.clone()),
            error: UndefinedStartSymbol(start.to_string())
        })
        .into_iter()
        .collect()
}

pub fn verify_rules(rules: &[Rule], file: &PathBuf, start: Option<&str>) -> FileResult<()> {
    let mut errors = Vec::new();

    errors.extend(get_missing_rules(rules, file));
    if !rules.is_empty() {
        errors.extend(get_undefined_start(rules, file, start));
    }

    if !errors.is_empty() {
        Err(errors)
    } else {
        Ok(())
    }
}

//! Dependency name extraction from a factory's declared parameter.

use std::collections::HashSet;

use crate::definition::{DependencyParam, Factory, NO_DEPENDENCIES};
use crate::error::{DiError, DiResult};
use crate::token::Token;

/// Lists the tokens a factory needs, without invoking it.
///
/// An absent parameter, an empty list and the lone `"_"` placeholder all mean
/// "no dependencies". Blank names, duplicates, and the placeholder mixed
/// with real names are definition errors reported against `token`.
pub fn extract_dependency_names(token: &Token, factory: &Factory) -> DiResult<Vec<Token>> {
    let names = match factory.param() {
        DependencyParam::Absent => return Ok(Vec::new()),
        DependencyParam::Declared(names) => names,
    };

    if names.len() == 1 && names[0] == NO_DEPENDENCIES {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let reason = if name.trim().is_empty() {
            Some("dependency names must not be blank".to_string())
        } else if name == NO_DEPENDENCIES {
            Some(format!(
                "placeholder {:?} cannot be combined with other dependency names",
                NO_DEPENDENCIES
            ))
        } else if !seen.insert(name.as_str()) {
            Some(format!("dependency {:?} is declared more than once", name))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(DiError::InvalidDefinition {
                token: token.clone(),
                reason,
            });
        }
        out.push(Token::from(name.as_str()));
    }
    Ok(out)
}

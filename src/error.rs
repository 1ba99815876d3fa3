//! Error types for the dependency resolution container.

use thiserror::Error;

use crate::token::Token;
use crate::validation::ValidationIssue;

/// Dependency resolution errors
///
/// Represents the error conditions that can occur while defining, resolving
/// or validating dependencies in a container.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, DefinitionMap, DiError};
///
/// let container = Container::from_definitions(DefinitionMap::new());
/// match container.resolve("missing") {
///     Err(DiError::Unresolvable(token)) => assert_eq!(token.as_str(), "missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use config_injector::DiError;
///
/// let circular = DiError::Circular(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(circular.to_string(), "Circular dependency: a -> b -> a");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Requested token has no definition
    #[error("Unresolvable dependency: {0}")]
    Unresolvable(Token),
    /// Token transitively depends on itself (includes the full path)
    #[error("Circular dependency: {}", join_path(.0))]
    Circular(Vec<Token>),
    /// Definition cannot be used as declared
    #[error("Invalid dependency definition for {token}: {reason}")]
    InvalidDefinition { token: Token, reason: String },
    /// Resolved instance is not of the requested type
    #[error("Type mismatch for {token}: expected {expected}, received {actual}")]
    TypeMismatch {
        token: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// Factory read an argument it never declared
    #[error("Dependency not declared by factory: {0}")]
    UndeclaredDependency(String),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Factory reported a failure of its own
    #[error("Factory for {token} failed: {message}")]
    Factory { token: String, message: String },
    /// Context value could not be read as the requested type
    #[error("Invalid context value for {key}: {message}")]
    Context { key: String, message: String },
    /// Container options could not be loaded
    #[error("Invalid container configuration: {0}")]
    Config(String),
    /// One or more singletons failed validation
    #[error("{}", render_report(.name, .issues))]
    Validation {
        name: String,
        issues: Vec<ValidationIssue>,
    },
}

impl DiError {
    /// Failure raised from inside a factory body.
    ///
    /// The token is filled in by the container when the error leaves the
    /// factory, so factories don't need to know their own name.
    pub fn factory(message: impl Into<String>) -> Self {
        DiError::Factory {
            token: String::new(),
            message: message.into(),
        }
    }

    pub(crate) fn with_factory_token(self, token: &Token) -> Self {
        match self {
            DiError::Factory { token: t, message } if t.is_empty() => DiError::Factory {
                token: token.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Validation issues carried by this error, empty for every other variant.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            DiError::Validation { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn join_path(path: &[Token]) -> String {
    path.iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn render_report(name: &str, issues: &[ValidationIssue]) -> String {
    let mut report = format!(
        "Invalid singleton configuration in {} ({} issue{}):",
        name,
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    );
    for issue in issues {
        report.push_str("\n  - ");
        report.push_str(&issue.to_string());
    }
    report
}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;

//! Resolution path used for circular dependency detection.

use crate::token::Token;

/// Tokens currently being resolved on this call stack, outermost first.
///
/// The path is threaded explicitly through every recursive resolution
/// instead of living in thread-local state, so scopes on different threads
/// never observe each other's stacks.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolutionPath {
    stack: Vec<Token>,
}

impl ResolutionPath {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, token: &Token) -> bool {
        self.stack.iter().any(|t| t == token)
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Path one level deeper, with `token` as the innermost entry.
    pub(crate) fn extended(&self, token: &Token) -> Self {
        let mut stack = Vec::with_capacity(self.stack.len() + 1);
        stack.extend(self.stack.iter().cloned());
        stack.push(token.clone());
        Self { stack }
    }

    /// The full cycle closed by requesting `token` again.
    pub(crate) fn cycle_with(&self, token: &Token) -> Vec<Token> {
        let mut cycle = self.stack.clone();
        cycle.push(token.clone());
        cycle
    }

    pub(crate) fn as_slice(&self) -> &[Token] {
        &self.stack
    }
}

//! Dependency tokens and the token introspection map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique name of a dependency inside one definition map.
///
/// Tokens are cheap to clone (`Arc<str>`) and compare by their text, so a
/// `Token` and a `&str` with the same contents address the same definition.
///
/// # Examples
///
/// ```rust
/// use config_injector::Token;
///
/// let token = Token::new("database");
/// assert_eq!(token.as_str(), "database");
/// assert_eq!(token, Token::from("database"));
/// assert_eq!(token.to_string(), "database");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(Arc<str>);

impl Token {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Token(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Token(Arc::from(name))
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token(Arc::from(name))
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Token::from)
    }
}

/// Declared tokens of a container, keyed by their own name.
///
/// Lets callers refer to tokens symbolically (`tokens["logger"]`) instead of
/// repeating string literals everywhere. Iteration follows declaration order.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, DefinitionMap};
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("host", "localhost".to_string());
/// defs.add_value("port", 8080u16);
///
/// let tokens = Container::from_definitions(defs).tokens();
/// assert_eq!(tokens["port"].as_str(), "port");
/// assert_eq!(tokens.names().collect::<Vec<_>>(), vec!["host", "port"]);
/// assert!(tokens.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    ordered: Vec<Token>,
    by_name: HashMap<Token, usize>,
}

impl Tokens {
    pub(crate) fn from_ordered(ordered: Vec<Token>) -> Self {
        let by_name = ordered
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { ordered, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.by_name.get(name).map(|&i| &self.ordered[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.ordered.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(Token::as_str)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Index<&str> for Tokens {
    type Output = Token;

    fn index(&self, name: &str) -> &Token {
        match self.get(name) {
            Some(token) => token,
            None => panic!("no token named {:?} is declared", name),
        }
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}

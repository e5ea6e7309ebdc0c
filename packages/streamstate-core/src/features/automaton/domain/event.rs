/*
 * Dispatch Events
 *
 * A dispatch event maps call-site signatures to automaton input symbols
 * via a regular expression. Two declared events never both match the
 * same signature; that exclusivity is a builder-time contract.
 */

use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Automaton input symbol: a named event with its call-site pattern.
#[derive(Debug, Clone)]
pub struct DispatchEvent {
    name: String,
    pattern: Regex,
}

impl DispatchEvent {
    pub fn new(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }

    /// Compile the pattern and construct the event.
    pub fn parse(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(name, Regex::new(pattern)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True if the call-site signature dispatches this event.
    pub fn matches(&self, signature: &str) -> bool {
        self.pattern.is_match(signature)
    }
}

// Event identity is the name; the pattern is an attribute.
impl PartialEq for DispatchEvent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DispatchEvent {}

impl Hash for DispatchEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

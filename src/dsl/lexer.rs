//! Raw tokenization of a single instruction line.
//!
//! The composed grammar pattern is run repeatedly across the line. Every
//! match contributes the groups it captured; when a key shows up more than
//! once on a line the last occurrence wins.

use super::grammar::{ParameterSpec, GRAMMAR, GRAMMAR_LEN, PATTERN};

/// The raw substring captured for each grammar entry on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTokens<'a> {
    values: [Option<&'a str>; GRAMMAR_LEN],
}

impl<'a> RawTokens<'a> {
    /// Tokenize one instruction line.
    pub fn new(line: &'a str) -> Self {
        let mut values = [None; GRAMMAR_LEN];

        for caps in PATTERN.captures_iter(line) {
            for (i, slot) in values.iter_mut().enumerate() {
                if let Some(m) = caps.get(i + 1) {
                    if !m.as_str().is_empty() {
                        *slot = Some(m.as_str());
                    }
                }
            }
        }

        Self { values }
    }

    /// The raw token captured for a grammar entry, if any.
    pub fn get(&self, spec: &ParameterSpec) -> Option<&'a str> {
        self.values[spec.param as usize]
    }

    /// Iterate over every grammar entry alongside its raw token.
    pub fn iter(&self) -> impl Iterator<Item = (&'static ParameterSpec, Option<&'a str>)> + '_ {
        GRAMMAR.iter().zip(self.values.iter().copied())
    }

    /// True when no key was recognized on the line.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// The value part of a raw token: the key removed, then one leading `=`.
pub fn value_of<'a>(spec: &ParameterSpec, raw: &'a str) -> &'a str {
    let rest = raw.strip_prefix(spec.key).unwrap_or(raw);
    rest.strip_prefix('=').unwrap_or(rest)
}

/// Remove one pair of enclosing backticks.
pub fn strip_backticks(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(text)
}

/// Parse a floating point value.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

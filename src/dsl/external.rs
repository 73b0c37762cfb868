//! Caller-supplied parameter table.
//!
//! A raw instruction token such as `pH90` or `sp0` is looked up verbatim in
//! this table before it is parsed as a literal. A hit replaces the token's
//! value, so one table entry can stand in for a number, a flag, a label or a
//! shape function across many instructions.

use std::collections::HashMap;

use super::lexer::parse_number;
use crate::shapes::ShapeFn;

/// A value stored in the external parameter table.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalValue {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Amplitude function, only meaningful for the shape key
    Shape(ShapeFn),
}

impl ExternalValue {
    /// Wrap an amplitude function.
    pub fn shape(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Shape(ShapeFn::new(f))
    }

    /// Infer a value from command line text: numbers, then booleans, then text.
    pub fn infer(text: &str) -> Self {
        if let Some(v) = parse_number(text) {
            return Self::Number(v);
        }
        match text {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(text.to_string()),
        }
    }
}

impl From<f64> for ExternalValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for ExternalValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<bool> for ExternalValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ExternalValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ExternalValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<ShapeFn> for ExternalValue {
    fn from(v: ShapeFn) -> Self {
        Self::Shape(v)
    }
}

/// Token-to-value lookup table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalParams {
    values: HashMap<String, ExternalValue>,
}

impl ExternalParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<ExternalValue>) {
        self.values.insert(token.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<ExternalValue>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&ExternalValue> {
        self.values.get(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExternalValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ExternalValue>> FromIterator<(K, V)> for ExternalParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

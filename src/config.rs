//! Diagram configuration files.
//!
//! ```toml
//! [layout]
//! spacing = 0.1
//! center_align = false
//! fontsize = 12
//!
//! [params]
//! pH90 = 1.0
//! plH90 = 0.8
//! phX = "_x"
//! spG = "gauss_0.5_0.2"
//! ```
//!
//! The `[params]` table becomes the external parameter table used while
//! parsing the sequence.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsl::{ExternalParams, ExternalValue};
use crate::error::{PulseplotError, Result};
use crate::layout::LayoutConfig;

/// One external parameter value as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&ParamValue> for ExternalValue {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Bool(b) => Self::Bool(*b),
            ParamValue::Number(v) => Self::Number(*v),
            ParamValue::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// Layout options plus external parameters for one diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
    pub layout: LayoutConfig,
    pub params: BTreeMap<String, ParamValue>,
}

impl DiagramConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PulseplotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "<inline>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PulseplotError::ConfigError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// The `[params]` table as an external parameter table.
    pub fn external_params(&self) -> ExternalParams {
        self.params
            .iter()
            .map(|(token, value)| (token.clone(), ExternalValue::from(value)))
            .collect()
    }
}

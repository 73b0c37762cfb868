//! Error types for the pulse sequence parser and layout engine.
//!
//! This module provides a unified error type [`PulseplotError`] that covers
//! all error conditions that can occur while parsing instructions, building
//! and editing sequences, and loading diagram configuration.
//!
//! Tokens that match no grammar key are not errors: they are skipped so
//! free-form words can sit inline. Unknown shape names are not errors
//! either; they are reported through `tracing` and drawn as squares.

use thiserror::Error;

use crate::dsl::ValueKind;

/// Result type alias using [`PulseplotError`].
pub type Result<T> = std::result::Result<T, PulseplotError>;

/// Unified error type for all Pulseplot operations.
#[derive(Error, Debug)]
pub enum PulseplotError {
    // ============ Instruction Parsing Errors ============
    /// A token value could not be converted to its parameter's type
    #[error("Cannot cast '{token}' for parameter '{key}' to {expected}")]
    TypeCoercion {
        key: String,
        token: String,
        expected: ValueKind,
    },

    /// The instruction carries both a pulse length and a delay duration
    #[error("Pulse and delay attributes cannot combine in '{instruction}'")]
    ClassificationConflict { instruction: String },

    /// The instruction carries neither a pulse length nor a delay duration
    #[error("Instruction '{instruction}' has neither a pulse length (p) nor a delay duration (d)")]
    UnclassifiedInstruction { instruction: String },

    /// An embedded keyword literal is not a valid map
    #[error("The input {literal} for parameter '{key}' is not understood")]
    LiteralSyntax { key: String, literal: String },

    /// A shape descriptor has a non-numeric parameter
    #[error("Did not understand the shape '{descriptor}'")]
    InvalidShape { descriptor: String },

    /// A parameter value is well-typed but unusable
    #[error("Invalid value for parameter '{key}': {message}")]
    InvalidParameter { key: String, message: String },

    /// Wraps any parse failure with the line it came from
    #[error("Line {line} ('{instruction}'): {source}")]
    InvalidLine {
        line: usize,
        instruction: String,
        #[source]
        source: Box<PulseplotError>,
    },

    // ============ Sequence Errors ============
    /// Two elements declare the same name
    #[error("Duplicate element name '{name}'")]
    DuplicateName { name: String },

    /// No element with this name exists (or it has not been placed yet)
    #[error("Cannot find the element named '{name}'")]
    UnknownName { name: String },

    /// Element index past the end of the sequence
    #[error("Element index {index} is out of range for a sequence of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// An edit names a field the element variant does not have
    #[error("Cannot set '{field}' on a {element}")]
    InvalidEdit {
        field: &'static str,
        element: &'static str,
    },

    // ============ I/O Errors ============
    /// Error reading a sequence or configuration file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid diagram configuration
    #[error("Invalid configuration in '{path}': {message}")]
    ConfigError { path: String, message: String },

    /// Error writing layout output
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl PulseplotError {
    /// Create a type coercion error
    pub fn coercion(key: impl Into<String>, token: impl Into<String>, expected: ValueKind) -> Self {
        Self::TypeCoercion {
            key: key.into(),
            token: token.into(),
            expected,
        }
    }

    /// Create a keyword literal error
    pub fn literal(key: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::LiteralSyntax {
            key: key.into(),
            literal: literal.into(),
        }
    }

    /// Create an unknown name error
    pub fn unknown_name(name: impl Into<String>) -> Self {
        Self::UnknownName { name: name.into() }
    }

    /// Attach a 1-based line number and the instruction text
    pub fn at_line(self, line: usize, instruction: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            instruction: instruction.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`PulseplotError::InvalidLine`]
    pub fn root(&self) -> &PulseplotError {
        match self {
            Self::InvalidLine { source, .. } => source.root(),
            other => other,
        }
    }
}

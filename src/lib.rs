//! # Pulseplot Core
//!
//! Parser and layout engine for pulse sequence timing diagrams.
//!
//! This library provides:
//! - A compact line-oriented language for pulses and delays on channels
//! - A static parameter grammar with typed, validated element records
//! - Named pulse shapes (gaussian, ramps, free induction decay, ...)
//! - A layout engine that places elements on a shared timeline and frames
//!   the drawing
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parameter grammar and instruction parser
//! - [`shapes`] - Shape descriptors and amplitude generators
//! - [`sequence`] - Ordered, name-indexed element collections and edits
//! - [`layout`] - Timeline placement, bounding region and renderer boundary
//! - [`config`] - TOML diagram configuration
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use pulseplot_core::{layout, ExternalParams, PulseSequence};
//!
//! let text = "
//!     p1 pl1 ph1 f1 w
//!     p1 pl1 ph2 f2 nH
//! ";
//! let sequence = PulseSequence::from_text(text, &ExternalParams::new()).unwrap();
//! let diagram = layout(&sequence, 0.0);
//! assert_eq!(diagram.time_of("H").unwrap(), 0.0);
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! pulseplot echo.pp --spacing 0.1 > echo.json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmPulseDiagram } from 'pulseplot_core';
//!
//! const diagram = new WasmPulseDiagram(sequenceText, 0.1);
//! const layout = JSON.parse(diagram.to_json());
//! ```
//!
//! ## Layout Method
//!
//! Elements are processed once, in textual order. Elements without an
//! explicit start time are placed at a running cursor:
//!
//! 1. Resolve the start time (cursor plus spacing for pulses)
//! 2. Compute the end time from the centering and wait flags
//! 3. Advance the cursor, sample the outline and grow the bounding region
//!
//! Named elements can then be queried for their start time.

pub mod config;
pub mod dsl;
pub mod error;
pub mod layout;
pub mod sequence;
pub mod shapes;

// Re-export main types for convenience
pub use dsl::{parse_instruction, parse_parameters, Element, ExternalParams, ExternalValue};
pub use error::{PulseplotError, Result};
pub use layout::{layout, Layout, LayoutConfig, LayoutEngine, Renderer};
pub use sequence::{ElementEdit, PulseSequence};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmPulseDiagram;

//! Pulse sequences.
//!
//! A [`PulseSequence`] is the ordered list of elements parsed from
//! multi-line instruction text, indexed by element name. It can be edited
//! in place until it is handed to the layout engine.

mod builder;
mod edit;
mod transform;

pub use builder::{ElementRef, PulseSequence};
pub use edit::ElementEdit;
pub use transform::{amplified, scaled, shifted};

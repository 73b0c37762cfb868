//! Sequence layout.
//!
//! The [`LayoutEngine`] walks a [`PulseSequence`] once, in order, and
//! gives every element a place on the shared timeline:
//!
//! 1. A deferred pulse starts one spacing after the cursor, a deferred
//!    delay starts at the cursor.
//! 2. The element's end time follows from its centering and wait flags
//!    (see [`pulse_end`]); deferred elements that do not wait move the
//!    cursor there.
//! 3. The pulse outline is sampled and the bounding region grows to hold
//!    it and every text anchor.
//!
//! Explicitly timed elements are placed where they say and leave the
//! cursor alone.

mod engine;
mod envelope;
mod region;
mod render;

pub use engine::{pulse_end, Layout, LayoutConfig, LayoutEngine, PositionedElement};
pub use envelope::{phase_text, Annotation, AnnotationKind, Envelope};
pub use region::{BoundingRegion, ChannelSet};
pub use render::{JsonRenderer, NullRenderer, Renderer};

use crate::sequence::PulseSequence;

/// Region margins are this fraction of the region size.
pub const MARGIN_DIVISOR: f64 = 50.0;

/// Margin used for the first expansion of an empty region.
pub const INITIAL_MARGIN: f64 = 0.1;

/// Gap between a pulse top and its phase label.
pub const PHASE_LABEL_OFFSET: f64 = 0.15;

/// Height of delay labels above their channel.
pub const DELAY_LABEL_OFFSET: f64 = 0.5;

/// Lay out `sequence` with the given pulse spacing and no renderer.
pub fn layout(sequence: &PulseSequence, spacing: f64) -> Layout {
    let mut engine = LayoutEngine::new(LayoutConfig::new().with_spacing(spacing));
    engine.run(sequence, &mut NullRenderer)
}

//! Sequence layout engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::{delay_annotation, pulse_annotations, Annotation, Envelope, TextOffsets};
use super::region::{BoundingRegion, ChannelSet};
use super::render::Renderer;
use crate::dsl::{Element, Pulse};
use crate::error::{PulseplotError, Result};
use crate::sequence::PulseSequence;

/// Configuration for the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap inserted before every deferred pulse.
    pub spacing: f64,
    /// Center each pulse outline vertically on its channel.
    pub center_align: bool,
    /// Extra vertical offset for pulse labels.
    pub text_dy: f64,
    /// Extra vertical offset for phase labels.
    pub phase_dy: f64,
    /// Font size used where an element's style map does not set one.
    pub fontsize: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            center_align: false,
            text_dy: 0.0,
            phase_dy: 0.0,
            fontsize: None,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap before deferred pulses.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Center outlines on their channel.
    pub fn with_center_align(mut self, center_align: bool) -> Self {
        self.center_align = center_align;
        self
    }

    /// Shift every pulse label vertically.
    pub fn with_text_dy(mut self, text_dy: f64) -> Self {
        self.text_dy = text_dy;
        self
    }

    /// Shift every phase label vertically.
    pub fn with_phase_dy(mut self, phase_dy: f64) -> Self {
        self.phase_dy = phase_dy;
        self
    }

    /// Set the fallback font size for labels.
    pub fn with_fontsize(mut self, fontsize: f64) -> Self {
        self.fontsize = Some(fontsize);
        self
    }

    fn offsets(&self) -> TextOffsets {
        TextOffsets {
            text_dy: self.text_dy,
            phase_dy: self.phase_dy,
            fontsize: self.fontsize,
        }
    }
}

/// An element with its resolved timing and geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedElement {
    /// Position in processing order
    pub index: usize,
    pub element: Element,
    /// Resolved start time
    pub start: f64,
    /// Time the element hands the timeline on at
    pub end: f64,
    /// Outline, pulses only
    pub envelope: Option<Envelope>,
    pub annotations: Vec<Annotation>,
}

/// Time a pulse hands the timeline on at.
///
/// | centered | keep_centered | wait | end |
/// |----------|---------------|------|-----|
/// | no | - | no | start + length |
/// | no | - | yes | start |
/// | yes | yes | - | start |
/// | yes | no | no | start + length/2 |
/// | yes | no | yes | start - length/2 |
pub fn pulse_end(pulse: &Pulse, start: f64) -> f64 {
    match (pulse.centered, pulse.keep_centered, pulse.wait) {
        (false, _, false) => start + pulse.length,
        (false, _, true) => start,
        (true, true, _) => start,
        (true, false, false) => start + pulse.length / 2.0,
        (true, false, true) => start - pulse.length / 2.0,
    }
}

/// Completed layout of a sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub elements: Vec<PositionedElement>,
    pub channels: ChannelSet,
    pub region: BoundingRegion,
    /// Cursor after the last element
    pub cursor: f64,
    #[serde(skip)]
    times: HashMap<String, f64>,
}

impl Layout {
    /// Start time of the element called `name`.
    pub fn time_of(&self, name: &str) -> Result<f64> {
        self.times
            .get(name)
            .copied()
            .ok_or_else(|| PulseplotError::unknown_name(name))
    }

    /// Start time of the `index`-th element.
    pub fn time_at(&self, index: usize) -> Result<f64> {
        self.elements
            .get(index)
            .map(|e| e.start)
            .ok_or(PulseplotError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            })
    }

    /// Total time covered, from the earliest start to the latest end.
    pub fn duration(&self) -> f64 {
        let (lo, hi) = self.elements.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.start), hi.max(e.end.max(e.start)))
        });
        if hi >= lo {
            hi - lo
        } else {
            0.0
        }
    }
}

/// Incremental layout of elements along a shared timeline.
///
/// One engine lays out one diagram; use [`LayoutEngine::reset`] or a new
/// engine for the next.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    cursor: f64,
    channels: ChannelSet,
    region: BoundingRegion,
    times: HashMap<String, f64>,
    placed: Vec<PositionedElement>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Current timeline cursor.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn region(&self) -> &BoundingRegion {
        &self.region
    }

    /// Number of elements placed so far.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Forget everything placed, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Place the next element.
    pub fn place(&mut self, element: &Element) -> PositionedElement {
        let index = self.placed.len();
        let deferred = element.is_deferred();
        let offsets = self.config.offsets();

        let positioned = match element {
            Element::Pulse(pulse) => {
                let start = element.start_time().unwrap_or(self.cursor + self.config.spacing);
                let end = pulse_end(pulse, start);
                if deferred && !pulse.wait {
                    self.cursor = end;
                }

                let mut envelope = Envelope::for_pulse(pulse, start);
                if self.config.center_align {
                    if let Some((_, _, y_low, y_high)) = envelope.bounds() {
                        envelope.shift_y(y_low - (y_low + y_high) / 2.0);
                    }
                }
                if let Some((x_low, x_high, y_low, y_high)) = envelope.bounds() {
                    self.region.expand(x_low, x_high, y_low, y_high);
                }

                let annotations = pulse_annotations(pulse, &envelope, offsets);
                PositionedElement {
                    index,
                    element: element.clone(),
                    start,
                    end,
                    envelope: Some(envelope),
                    annotations,
                }
            }
            Element::Delay(delay) => {
                let start = element.start_time().unwrap_or(self.cursor);
                let end = start + delay.duration;
                self.cursor += delay.duration;

                PositionedElement {
                    index,
                    element: element.clone(),
                    start,
                    end,
                    envelope: None,
                    annotations: delay_annotation(delay, start, offsets).into_iter().collect(),
                }
            }
        };

        for note in &positioned.annotations {
            self.region.include_point(note.x, note.y);
        }
        self.channels.insert(element.channel());
        if let Some(name) = element.name() {
            self.times.insert(name.to_string(), positioned.start);
        }

        debug!(
            index,
            kind = element.kind().name(),
            start = positioned.start,
            end = positioned.end,
            cursor = self.cursor,
            "Placed element"
        );

        self.placed.push(positioned.clone());
        positioned
    }

    /// Place every element of `sequence` and draw through `renderer`.
    pub fn run(&mut self, sequence: &PulseSequence, renderer: &mut dyn Renderer) -> Layout {
        for element in sequence {
            let positioned = self.place(element);
            renderer.draw_element(&positioned);
        }
        renderer.draw_channels(&self.channels, &self.region);
        self.finish()
    }

    /// Snapshot of everything placed so far.
    pub fn finish(&self) -> Layout {
        Layout {
            elements: self.placed.clone(),
            channels: self.channels.clone(),
            region: self.region,
            cursor: self.cursor,
            times: self.times.clone(),
        }
    }

    /// Start time of an already placed element.
    pub fn time_of(&self, name: &str) -> Result<f64> {
        self.times
            .get(name)
            .copied()
            .ok_or_else(|| PulseplotError::unknown_name(name))
    }

    /// Start time of the `index`-th placed element.
    pub fn time_at(&self, index: usize) -> Result<f64> {
        self.placed
            .get(index)
            .map(|e| e.start)
            .ok_or(PulseplotError::IndexOutOfRange {
                index,
                len: self.placed.len(),
            })
    }
}

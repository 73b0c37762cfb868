//! Renderer boundary.
//!
//! The layout engine never draws anything itself. It hands every placed
//! element, and finally the channel lines with their extent, to a
//! [`Renderer`].

use serde::Serialize;
use serde_json::Value;

use super::engine::PositionedElement;
use super::region::{BoundingRegion, ChannelSet};
use crate::error::{PulseplotError, Result};

/// Receiver of layout output.
pub trait Renderer {
    /// Called once per element, in sequence order.
    fn draw_element(&mut self, element: &PositionedElement);

    /// Called once after the last element.
    fn draw_channels(&mut self, _channels: &ChannelSet, _region: &BoundingRegion) {}
}

/// Renderer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_element(&mut self, _element: &PositionedElement) {}
}

/// Renderer that records a JSON document of the drawing.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    elements: Vec<Value>,
    channels: Option<Value>,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct ChannelLines<'a> {
    channels: &'a ChannelSet,
    region: &'a BoundingRegion,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements recorded so far.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The recorded document.
    pub fn into_json(self) -> Result<Value> {
        if let Some(message) = self.errors.into_iter().next() {
            return Err(PulseplotError::OutputError { message });
        }
        Ok(serde_json::json!({
            "elements": self.elements,
            "channels": self.channels.unwrap_or(Value::Null),
        }))
    }

    fn record<T: Serialize>(&mut self, value: &T) -> Option<Value> {
        match serde_json::to_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(e.to_string());
                None
            }
        }
    }
}

impl Renderer for JsonRenderer {
    fn draw_element(&mut self, element: &PositionedElement) {
        if let Some(value) = self.record(element) {
            self.elements.push(value);
        }
    }

    fn draw_channels(&mut self, channels: &ChannelSet, region: &BoundingRegion) {
        self.channels = self.record(&ChannelLines { channels, region });
    }
}

//! Pulse outlines and text anchors.

use serde::Serialize;

use super::{DELAY_LABEL_OFFSET, PHASE_LABEL_OFFSET};
use crate::dsl::{Delay, Pulse, StyleMap};
use crate::shapes::linspace;

/// Sampled outline of one pulse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Sample times
    pub times: Vec<f64>,
    /// Shape times power at each sample
    pub amplitudes: Vec<f64>,
    /// Outline points `[time, height]`, offset by the channel
    pub vertices: Vec<[f64; 2]>,
    /// Whether the outline is drawn closed
    pub closed: bool,
}

impl Envelope {
    /// Sample `pulse` starting at `start`.
    pub fn for_pulse(pulse: &Pulse, start: f64) -> Self {
        let left = if pulse.centered {
            start - pulse.length / 2.0
        } else {
            start
        };
        let times = linspace(left, left + pulse.length, pulse.npoints);
        let amplitudes: Vec<f64> = match &pulse.shape {
            Some(shape) => shape.samples(pulse.npoints),
            None => vec![1.0; pulse.npoints],
        }
        .into_iter()
        .map(|a| a * pulse.power)
        .collect();

        let channel = pulse.common.channel;
        let mut vertices = Vec::with_capacity(times.len() + 2);
        let baseline = !pulse.truncate_off;

        if baseline {
            if let Some(&first) = times.first() {
                vertices.push([first, channel]);
            }
        }
        vertices.extend(times.iter().zip(&amplitudes).map(|(&t, &a)| [t, a + channel]));
        if baseline {
            if let Some(&last) = times.last() {
                vertices.push([last, channel]);
            }
        }

        Self {
            times,
            amplitudes,
            vertices,
            closed: !pulse.open,
        }
    }

    /// `(x_low, x_high, y_low, y_high)` of the outline, `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.vertices.is_empty() {
            return None;
        }
        let init = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        Some(self.vertices.iter().fold(init, |(xl, xh, yl, yh), &[x, y]| {
            (xl.min(x), xh.max(x), yl.min(y), yh.max(y))
        }))
    }

    /// The vertex used to anchor annotations.
    pub(crate) fn midpoint(&self, npoints: usize) -> Option<[f64; 2]> {
        let last = self.vertices.len().checked_sub(1)?;
        Some(self.vertices[(npoints / 2).min(last)])
    }

    /// Move the outline vertically.
    pub fn shift_y(&mut self, delta: f64) {
        for vertex in &mut self.vertices {
            vertex[1] += delta;
        }
    }
}

/// What an annotation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Label,
    Phase,
}

/// A positioned piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub fontsize: f64,
    /// Renderer style entries, alignment defaults first
    pub style: StyleMap,
}

/// Layout-wide annotation adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TextOffsets {
    pub text_dy: f64,
    pub phase_dy: f64,
    pub fontsize: Option<f64>,
}

/// Merge alignment defaults, the element's style map and the font size.
fn text_style(kw: &StyleMap, fontsize: f64, fallback: Option<f64>) -> (f64, StyleMap) {
    let mut style = StyleMap::new();
    style.insert("ha".into(), "center".into());
    style.insert("va".into(), "center".into());
    style.extend(kw.iter().map(|(k, v)| (k.clone(), v.clone())));

    if !style.contains_key("fontsize") {
        if let Some(size) = fallback {
            style.insert("fontsize".into(), size.into());
        }
    }
    let fontsize = style
        .get("fontsize")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(fontsize);
    (fontsize, style)
}

/// Rendered phase text: `_x` is written as is, anything else as `φ_x`.
pub fn phase_text(phase: &str) -> String {
    match phase.strip_prefix('_') {
        Some(literal) => literal.to_string(),
        None => format!(r"$\phi_{{{phase}}}$"),
    }
}

/// Label and phase anchors of a pulse, from its final outline.
pub(crate) fn pulse_annotations(pulse: &Pulse, envelope: &Envelope, offsets: TextOffsets) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let (Some([x_mid, y_mid]), Some((_, _, y_min, _))) = (envelope.midpoint(pulse.npoints), envelope.bounds()) else {
        return annotations;
    };
    let common = &pulse.common;

    if let Some(text) = &common.text {
        let (fontsize, style) = text_style(&common.text_kw, common.text_fontsize, offsets.fontsize);
        annotations.push(Annotation {
            kind: AnnotationKind::Label,
            x: x_mid + common.text_dx,
            y: (y_mid + y_min) / 2.0 + common.text_dy + offsets.text_dy,
            text: text.clone(),
            fontsize,
            style,
        });
    }

    if let Some(phase) = &pulse.phase {
        let (fontsize, style) = text_style(&pulse.phase_kw, pulse.phase_fontsize, offsets.fontsize);
        annotations.push(Annotation {
            kind: AnnotationKind::Phase,
            x: x_mid + pulse.phase_dx,
            y: y_mid + pulse.phase_dy + PHASE_LABEL_OFFSET + offsets.phase_dy,
            text: phase_text(phase),
            fontsize,
            style,
        });
    }

    annotations
}

/// Label anchor of a delay: centered over its span, half a channel up.
pub(crate) fn delay_annotation(delay: &Delay, start: f64, offsets: TextOffsets) -> Option<Annotation> {
    let common = &delay.common;
    let text = common.text.as_ref()?;
    let (fontsize, style) = text_style(&common.text_kw, common.text_fontsize, offsets.fontsize);
    Some(Annotation {
        kind: AnnotationKind::Label,
        x: start + delay.duration / 2.0 + common.text_dx,
        y: common.channel + DELAY_LABEL_OFFSET + common.text_dy,
        text: text.clone(),
        fontsize,
        style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{parse_instruction, Element, ExternalParams};
    use approx::assert_abs_diff_eq;

    fn pulse(line: &str) -> Pulse {
        match parse_instruction(line, &ExternalParams::new()).unwrap() {
            Element::Pulse(p) => p,
            Element::Delay(_) => panic!("expected a pulse"),
        }
    }

    #[test]
    fn test_square_outline() {
        let p = pulse("p2 pl0.5 f1 np5");
        let env = Envelope::for_pulse(&p, 1.0);
        assert_eq!(env.times, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert!(env.amplitudes.iter().all(|&a| a == 0.5));
        assert_eq!(env.vertices.len(), 7);
        assert_eq!(env.vertices[0], [1.0, 1.0]);
        assert_eq!(env.vertices[1], [1.0, 1.5]);
        assert_eq!(env.vertices[6], [3.0, 1.0]);
        assert!(env.closed);
        assert_eq!(env.bounds(), Some((1.0, 3.0, 1.0, 1.5)));
    }

    #[test]
    fn test_centered_and_truncated() {
        let p = pulse("p2 c troff o np3");
        let env = Envelope::for_pulse(&p, 5.0);
        assert_eq!(env.times, vec![4.0, 5.0, 6.0]);
        assert_eq!(env.vertices.len(), 3);
        assert!(!env.closed);
    }

    #[test]
    fn test_phase_text() {
        assert_eq!(phase_text("_x"), "x");
        assert_eq!(phase_text("1"), r"$\phi_{1}$");
    }

    #[test]
    fn test_pulse_annotation_anchors() {
        let p = pulse("p2 pl1 f0 np5 phx tx=A tdx0.1 pdy0.2");
        let env = Envelope::for_pulse(&p, 0.0);
        let notes = pulse_annotations(&p, &env, TextOffsets::default());
        assert_eq!(notes.len(), 2);

        // Vertex 2 is the second sample: (0.5, 1.0); the baseline sits at 0.
        let label = &notes[0];
        assert_eq!(label.kind, AnnotationKind::Label);
        assert_abs_diff_eq!(label.x, 0.6);
        assert_abs_diff_eq!(label.y, 0.5);
        assert_abs_diff_eq!(label.fontsize, 15.0);
        assert_eq!(label.style.get("ha"), Some(&serde_json::json!("center")));

        let phase = &notes[1];
        assert_eq!(phase.text, r"$\phi_{x}$");
        assert_abs_diff_eq!(phase.x, 0.5);
        assert_abs_diff_eq!(phase.y, 1.0 + 0.2 + 0.15);
    }

    #[test]
    fn test_fontsize_fallback_only_fills_gaps() {
        let p = pulse("p1 tx=A tkw={'fontsize':8} phy");
        let env = Envelope::for_pulse(&p, 0.0);
        let offsets = TextOffsets {
            fontsize: Some(20.0),
            ..TextOffsets::default()
        };
        let notes = pulse_annotations(&p, &env, offsets);
        assert_abs_diff_eq!(notes[0].fontsize, 8.0);
        assert_abs_diff_eq!(notes[1].fontsize, 20.0);
    }

    #[test]
    fn test_delay_annotation() {
        let delay = match parse_instruction("d2 f1 tx=tau tdy0.1", &ExternalParams::new()).unwrap() {
            Element::Delay(d) => d,
            Element::Pulse(_) => panic!("expected a delay"),
        };
        let note = delay_annotation(&delay, 3.0, TextOffsets::default()).unwrap();
        assert_abs_diff_eq!(note.x, 4.0);
        assert_abs_diff_eq!(note.y, 1.6);
    }
}

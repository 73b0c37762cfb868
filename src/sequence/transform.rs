//! Pure element transforms.
//!
//! Each transform returns a new record and leaves its input untouched.

use crate::dsl::Element;

/// Multiply the pulse length or delay duration by `factor`.
pub fn scaled(element: &Element, factor: f64) -> Element {
    let mut out = element.clone();
    match &mut out {
        Element::Pulse(p) => p.length *= factor,
        Element::Delay(d) => d.duration *= factor,
    }
    out
}

/// Add `delta` to the pulse length or delay duration.
pub fn shifted(element: &Element, delta: f64) -> Element {
    let mut out = element.clone();
    match &mut out {
        Element::Pulse(p) => p.length += delta,
        Element::Delay(d) => d.duration += delta,
    }
    out
}

/// Multiply a pulse's power by `factor`. Delays come back unchanged.
pub fn amplified(element: &Element, factor: f64) -> Element {
    let mut out = element.clone();
    if let Element::Pulse(p) = &mut out {
        p.power *= factor;
    }
    out
}

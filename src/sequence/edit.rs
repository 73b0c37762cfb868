//! Field edits applied to elements before layout.

use crate::dsl::{Element, Param, Value};
use crate::error::{PulseplotError, Result};
use crate::shapes::ShapeSpec;

/// An ordered list of field assignments.
///
/// ```
/// use pulseplot_core::sequence::ElementEdit;
///
/// let edit = ElementEdit::new().power(0.5).phase("y").wait(true);
/// assert_eq!(edit.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementEdit {
    changes: Vec<(Param, Value)>,
}

impl ElementEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign any grammar field.
    pub fn set(mut self, param: Param, value: impl Into<Value>) -> Self {
        self.changes.push((param, value.into()));
        self
    }

    pub fn length(self, length: f64) -> Self {
        self.set(Param::Length, length)
    }

    pub fn duration(self, duration: f64) -> Self {
        self.set(Param::Duration, duration)
    }

    pub fn power(self, power: f64) -> Self {
        self.set(Param::Power, power)
    }

    pub fn phase(self, phase: impl Into<String>) -> Self {
        self.set(Param::Phase, Value::Text(phase.into()))
    }

    pub fn shape(self, shape: ShapeSpec) -> Self {
        self.set(Param::Shape, shape)
    }

    pub fn channel(self, channel: f64) -> Self {
        self.set(Param::Channel, channel)
    }

    pub fn start_time(self, start: f64) -> Self {
        self.set(Param::StartTime, start)
    }

    /// Return the element to deferred placement.
    pub fn defer(self) -> Self {
        self.set(Param::StartTime, Value::Unset)
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.set(Param::Text, Value::Text(text.into()))
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.set(Param::Name, Value::Text(name.into()))
    }

    pub fn wait(self, wait: bool) -> Self {
        self.set(Param::Wait, wait)
    }

    pub fn centered(self, centered: bool) -> Self {
        self.set(Param::Centered, centered)
    }

    pub fn open(self, open: bool) -> Self {
        self.set(Param::Open, open)
    }

    pub fn truncate_off(self, truncate_off: bool) -> Self {
        self.set(Param::TruncateOff, truncate_off)
    }

    pub fn facecolor(self, color: impl Into<String>) -> Self {
        self.set(Param::Facecolor, Value::Text(color.into()))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Produce the edited copy of `element`.
    ///
    /// Assignments run in order, so a later one wins. The variant never
    /// changes: assigning a field the variant does not carry is rejected.
    pub fn apply_to(&self, element: &Element) -> Result<Element> {
        let kind = element.kind();
        let mut params = element.to_parameters();

        for (param, value) in &self.changes {
            let spec = param.spec();
            if !spec.applies_to.includes(kind) {
                return Err(PulseplotError::InvalidEdit {
                    field: spec.name,
                    element: kind.name(),
                });
            }
            params.apply(*param, value.clone())?;
        }

        params.into_element(&self.describe())
    }

    fn describe(&self) -> String {
        self.changes
            .iter()
            .map(|(param, value)| format!("{}={value:?}", param.spec().key))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{parse_instruction, ExternalParams};
    use crate::shapes::Shape;

    fn pulse(line: &str) -> Element {
        parse_instruction(line, &ExternalParams::new()).unwrap()
    }

    #[test]
    fn test_later_assignment_wins() {
        let edited = ElementEdit::new()
            .power(0.2)
            .power(0.7)
            .apply_to(&pulse("p1 f1"))
            .unwrap();
        assert_eq!(edited.as_pulse().unwrap().power, 0.7);
    }

    #[test]
    fn test_edit_overrides_decay_defaults() {
        let original = pulse("p1 sp=fid");
        assert!(original.as_pulse().unwrap().open);
        let edited = ElementEdit::new().open(false).apply_to(&original).unwrap();
        let edited = edited.as_pulse().unwrap();
        assert!(!edited.open);
        assert!(edited.truncate_off);
    }

    #[test]
    fn test_duration_on_pulse_is_rejected() {
        let err = ElementEdit::new().duration(1.0).apply_to(&pulse("p1")).unwrap_err();
        assert!(matches!(err, PulseplotError::InvalidEdit { field: "duration", .. }));
    }

    #[test]
    fn test_defer_and_shape() {
        let original = pulse("p1 st3");
        let edited = ElementEdit::new()
            .defer()
            .shape(ShapeSpec::Named(Shape::parse("gauss").unwrap()))
            .apply_to(&original)
            .unwrap();
        assert!(edited.is_deferred());
        assert_eq!(
            edited.as_pulse().unwrap().shape.as_ref().and_then(ShapeSpec::descriptor),
            Some("gauss")
        );
    }

    #[test]
    fn test_wrong_value_kind() {
        let err = ElementEdit::new()
            .set(Param::Wait, 1.0)
            .apply_to(&pulse("p1"))
            .unwrap_err();
        assert!(matches!(err, PulseplotError::TypeCoercion { .. }));
    }
}

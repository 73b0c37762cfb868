//! Ordered, name-indexed element collection.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::edit::ElementEdit;
use crate::dsl::{instruction_text, parse_instruction, Element, ExternalParams};
use crate::error::{PulseplotError, Result};

/// Reference to one element of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRef {
    /// Position in textual order
    Index(usize),
    /// Unique element name
    Name(String),
}

impl From<usize> for ElementRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ElementRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A pulse sequence ready for layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseSequence {
    /// Elements in textual order
    elements: Vec<Element>,
    /// Element name to position in `elements`
    names: HashMap<String, usize>,
}

impl PulseSequence {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from multi-line instruction text.
    ///
    /// Comments (`#` to end of line) and blank lines are skipped. The first
    /// failing line aborts the build.
    pub fn from_text(text: &str, params: &ExternalParams) -> Result<Self> {
        let mut sequence = Self::new();

        for (idx, line) in text.lines().enumerate() {
            let Some(instruction) = instruction_text(line) else {
                continue;
            };
            let element = parse_instruction(instruction, params).map_err(|e| e.at_line(idx + 1, instruction))?;
            sequence
                .push(element)
                .map_err(|e| e.at_line(idx + 1, instruction))?;
        }

        debug!(
            elements = sequence.len(),
            named = sequence.names.len(),
            "Built pulse sequence"
        );
        Ok(sequence)
    }

    /// Read and build a sequence from a file.
    pub fn from_file(path: &Path, params: &ExternalParams) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PulseplotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_text(&content, params)
    }

    /// Build a sequence from already-parsed elements.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let mut sequence = Self::new();
        for element in elements {
            sequence.push(element)?;
        }
        Ok(sequence)
    }

    /// Append an element, returning its index.
    pub fn push(&mut self, element: Element) -> Result<usize> {
        let index = self.elements.len();
        if let Some(name) = element.name() {
            self.claim_name(name, index)?;
        }
        self.elements.push(element);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Resolve a reference to an index.
    pub fn index_of(&self, target: &ElementRef) -> Result<usize> {
        match target {
            ElementRef::Index(index) if *index < self.elements.len() => Ok(*index),
            ElementRef::Index(index) => Err(PulseplotError::IndexOutOfRange {
                index: *index,
                len: self.elements.len(),
            }),
            ElementRef::Name(name) => self
                .names
                .get(name)
                .copied()
                .ok_or_else(|| PulseplotError::unknown_name(name.as_str())),
        }
    }

    /// Look up an element by index or name.
    pub fn get(&self, target: impl Into<ElementRef>) -> Result<&Element> {
        let index = self.index_of(&target.into())?;
        Ok(&self.elements[index])
    }

    /// Change fields of one element in place.
    ///
    /// The element keeps its position. Renaming re-indexes it; a name
    /// already taken by another element is rejected and nothing changes.
    pub fn edit(&mut self, target: impl Into<ElementRef>, edit: ElementEdit) -> Result<()> {
        let index = self.index_of(&target.into())?;
        let current = &self.elements[index];
        let updated = edit.apply_to(current)?;

        let old_name = current.name().map(str::to_string);
        let new_name = updated.name().map(str::to_string);
        if old_name != new_name {
            if let Some(name) = &new_name {
                self.claim_name(name, index)?;
            }
            if let Some(name) = &old_name {
                self.names.remove(name);
            }
        }

        debug!(index, "Edited element");
        self.elements[index] = updated;
        Ok(())
    }

    fn claim_name(&mut self, name: &str, index: usize) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(PulseplotError::DuplicateName { name: name.to_string() });
        }
        self.names.insert(name.to_string(), index);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PulseSequence {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ElementKind;

    const ECHO: &str = "
        # spin echo
        p1 pl1 ph1 f1 c nP90
        d2 tx=tau f1      # first delay
        p2 pl1 ph2 f1 c nP180

        d2 f1
    ";

    fn echo() -> PulseSequence {
        PulseSequence::from_text(ECHO, &ExternalParams::new()).unwrap()
    }

    #[test]
    fn test_from_text_skips_comments_and_blank_lines() {
        let seq = echo();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.get(1usize).unwrap().kind(), ElementKind::Delay);
        assert_eq!(seq.get("P180").unwrap().extent(), 2.0);
    }

    #[test]
    fn test_failing_line_reports_position() {
        let err = PulseSequence::from_text("p1 f1\n\np1 plx f1", &ExternalParams::new()).unwrap_err();
        match &err {
            PulseplotError::InvalidLine { line, instruction, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(instruction, "p1 plx f1");
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(matches!(err.root(), PulseplotError::TypeCoercion { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = PulseSequence::from_text("p1 nA\np2 nA", &ExternalParams::new()).unwrap_err();
        assert!(matches!(err.root(), PulseplotError::DuplicateName { .. }));
    }

    #[test]
    fn test_lookup_errors() {
        let seq = echo();
        assert!(matches!(seq.get(9usize), Err(PulseplotError::IndexOutOfRange { index: 9, len: 4 })));
        assert!(matches!(seq.get("nope"), Err(PulseplotError::UnknownName { .. })));
    }

    #[test]
    fn test_edit_by_name_and_index() {
        let mut seq = echo();
        seq.edit("P90", ElementEdit::new().power(0.5)).unwrap();
        assert_eq!(seq.get(0usize).unwrap().as_pulse().unwrap().power, 0.5);

        seq.edit(3usize, ElementEdit::new().duration(4.0)).unwrap();
        assert_eq!(seq.get(3usize).unwrap().extent(), 4.0);
    }

    #[test]
    fn test_rename_keeps_index_consistent() {
        let mut seq = echo();
        seq.edit("P90", ElementEdit::new().name("excite")).unwrap();
        assert!(seq.get("P90").is_err());
        assert_eq!(seq.index_of(&"excite".into()).unwrap(), 0);

        let err = seq.edit(0usize, ElementEdit::new().name("P180")).unwrap_err();
        assert!(matches!(err, PulseplotError::DuplicateName { .. }));
        assert_eq!(seq.get(0usize).unwrap().name(), Some("excite"));
    }

    #[test]
    fn test_edit_rejects_fields_of_the_other_variant() {
        let mut seq = echo();
        let err = seq.edit(1usize, ElementEdit::new().power(2.0)).unwrap_err();
        assert!(matches!(
            err,
            PulseplotError::InvalidEdit {
                field: "power",
                element: "delay"
            }
        ));
    }

    #[test]
    fn test_edit_unknown_name() {
        let mut seq = echo();
        let err = seq.edit("missing", ElementEdit::new().power(0.5)).unwrap_err();
        assert!(matches!(err, PulseplotError::UnknownName { ref name } if name == "missing"));
        assert_eq!(seq, echo());
    }

    #[test]
    fn test_push_and_from_elements_reject_duplicate_names() {
        let params = ExternalParams::new();
        let mut seq = PulseSequence::new();
        seq.push(parse_instruction("p1 nA", &params).unwrap()).unwrap();
        let err = seq.push(parse_instruction("d1 nA", &params).unwrap()).unwrap_err();
        assert!(matches!(err, PulseplotError::DuplicateName { .. }));
        assert_eq!(seq.len(), 1);

        let elements = vec![
            parse_instruction("p1 nB", &params).unwrap(),
            parse_instruction("p2 nB", &params).unwrap(),
        ];
        let err = PulseSequence::from_elements(elements).unwrap_err();
        assert!(matches!(err, PulseplotError::DuplicateName { .. }));
    }

    #[test]
    fn test_from_elements() {
        let seq = echo();
        let copy = PulseSequence::from_elements(seq.iter().cloned()).unwrap();
        assert_eq!(copy, seq);
    }
}

//! Instruction parser: raw tokens to typed element records.

use tracing::trace;

use super::ast::{Element, Parameters, StyleMap, Value};
use super::external::{ExternalParams, ExternalValue};
use super::grammar::{ParameterSpec, ValueKind};
use super::lexer::{parse_number, strip_backticks, value_of, RawTokens};
use crate::error::{PulseplotError, Result};
use crate::shapes::{Shape, ShapeSpec};

/// Parser for a single instruction line.
pub struct Parser<'a> {
    line: &'a str,
    params: &'a ExternalParams,
}

impl<'a> Parser<'a> {
    /// Create a parser for `line`, resolving aliases through `params`.
    pub fn new(line: &'a str, params: &'a ExternalParams) -> Self {
        Self { line, params }
    }

    /// Build the full parameter record without classifying it.
    pub fn parameters(&self) -> Result<Parameters> {
        let tokens = RawTokens::new(self.line);
        let mut record = Parameters::default();

        for (spec, raw) in tokens.iter() {
            let Some(raw) = raw else {
                continue;
            };
            let value = match self.params.get(raw) {
                Some(external) => {
                    trace!(token = raw, key = spec.key, "Resolved external parameter");
                    coerce_external(spec, raw, external)?
                }
                None => coerce_literal(spec, raw)?,
            };
            record.apply(spec.param, value)?;
        }

        if record.shape.as_ref().is_some_and(ShapeSpec::is_decay) {
            record.truncate_off = true;
            record.open = true;
            record.facecolor = "none".to_string();
        }

        Ok(record)
    }

    /// Parse and classify the line into a pulse or a delay.
    pub fn parse(&self) -> Result<Element> {
        self.parameters()?.into_element(self.line.trim())
    }
}

fn coerce_literal(spec: &ParameterSpec, raw: &str) -> Result<Value> {
    let text = value_of(spec, raw);
    let fail = || PulseplotError::coercion(spec.key, raw, spec.kind);

    match spec.kind {
        ValueKind::Float => parse_number(text).map(Value::Float).ok_or_else(fail),
        ValueKind::Int => text.trim().parse::<usize>().map(Value::Int).map_err(|_| fail()),
        // Presence alone sets a flag.
        ValueKind::Bool => Ok(Value::Bool(true)),
        ValueKind::Text => Ok(Value::Text(strip_backticks(text).to_string())),
        ValueKind::Literal => decode_literal(spec, text).map(Value::Literal),
        ValueKind::Raw => Ok(Value::Shape(ShapeSpec::Named(Shape::parse(text)?))),
    }
}

fn coerce_external(spec: &ParameterSpec, raw: &str, value: &ExternalValue) -> Result<Value> {
    let fail = || PulseplotError::coercion(spec.key, raw, spec.kind);

    let coerced = match (spec.kind, value) {
        (ValueKind::Float, ExternalValue::Number(v)) => Value::Float(*v),
        (ValueKind::Float, ExternalValue::Bool(b)) => Value::Float(if *b { 1.0 } else { 0.0 }),
        (ValueKind::Float, ExternalValue::Text(s)) => Value::Float(parse_number(s).ok_or_else(fail)?),

        (ValueKind::Int, ExternalValue::Number(v)) if *v >= 0.0 && v.fract() == 0.0 => Value::Int(*v as usize),
        (ValueKind::Int, ExternalValue::Text(s)) => Value::Int(s.trim().parse().map_err(|_| fail())?),

        (ValueKind::Bool, ExternalValue::Bool(b)) => Value::Bool(*b),
        (ValueKind::Bool, ExternalValue::Number(v)) => Value::Bool(*v != 0.0),
        (ValueKind::Bool, ExternalValue::Text(s)) => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(fail()),
        },

        (ValueKind::Text, ExternalValue::Text(s)) => Value::Text(strip_backticks(s).to_string()),
        (ValueKind::Text, ExternalValue::Number(v)) => Value::Text(v.to_string()),
        (ValueKind::Text, ExternalValue::Bool(b)) => Value::Text(b.to_string()),

        (ValueKind::Literal, ExternalValue::Text(s)) => Value::Literal(decode_literal(spec, s)?),

        (ValueKind::Raw, ExternalValue::Shape(f)) => Value::Shape(ShapeSpec::Custom(f.clone())),
        (ValueKind::Raw, ExternalValue::Text(s)) => Value::Shape(ShapeSpec::Named(Shape::parse(s)?)),

        _ => return Err(fail()),
    };

    Ok(coerced)
}

/// Decode a keyword literal such as `{'fontsize': 10}`.
///
/// The text is tried as JSON first, then again with single quotes swapped
/// for double quotes.
fn decode_literal(spec: &ParameterSpec, text: &str) -> Result<StyleMap> {
    serde_json::from_str::<StyleMap>(text)
        .or_else(|_| serde_json::from_str::<StyleMap>(&text.replace('\'', "\"")))
        .map_err(|_| PulseplotError::literal(spec.key, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{ElementKind, Param, GRAMMAR, MAX_NPOINTS};
    use approx::assert_abs_diff_eq;

    fn grammar_defaults() -> Parameters {
        let mut record = Parameters::default();
        for spec in &GRAMMAR {
            record.apply(spec.param, spec.default.into()).unwrap();
        }
        record
    }

    fn parse(line: &str) -> Result<Element> {
        Parser::new(line, &ExternalParams::new()).parse()
    }

    fn parameters(line: &str) -> Result<Parameters> {
        Parser::new(line, &ExternalParams::new()).parameters()
    }

    #[test]
    fn test_pulse_line() {
        let element = parse("p1 pl1 ph1 f2").unwrap();
        let pulse = element.as_pulse().unwrap();
        assert_abs_diff_eq!(pulse.length, 1.0);
        assert_abs_diff_eq!(pulse.power, 1.0);
        assert_eq!(pulse.phase.as_deref(), Some("1"));
        assert_abs_diff_eq!(pulse.common.channel, 2.0);
        assert!(element.is_deferred());
    }

    #[test]
    fn test_delay_line() {
        let params = parameters("d1 f1 tx=TEST tdx0.1 tdy0.3").unwrap();
        assert_eq!(params.duration, Some(1.0));
        assert_eq!(params.length, None);
        assert_abs_diff_eq!(params.channel, 1.0);
        assert_eq!(params.text.as_deref(), Some("TEST"));
        assert_abs_diff_eq!(params.text_dx, 0.1);
        assert_abs_diff_eq!(params.text_dy, 0.3);

        let element = parse("d1 f1 tx=TEST tdx0.1 tdy0.3").unwrap();
        assert_eq!(element.kind(), ElementKind::Delay);
    }

    #[test]
    fn test_no_tokens_gives_defaults() {
        assert_eq!(parameters("").unwrap(), grammar_defaults());
        assert_eq!(parameters("just some words").unwrap(), Parameters::default());
    }

    #[test]
    fn test_pulse_and_delay_conflict() {
        let err = parse("p1 d1").unwrap_err();
        assert!(matches!(err, PulseplotError::ClassificationConflict { .. }));
    }

    #[test]
    fn test_unclassified() {
        let err = parse("pl1 f2").unwrap_err();
        assert!(matches!(err, PulseplotError::UnclassifiedInstruction { .. }));
    }

    #[test]
    fn test_external_params() {
        let params = ExternalParams::new()
            .with("pH90", 1.0)
            .with("plH90", 2.0)
            .with("sp0", ExternalValue::shape(|x| x + 1.0))
            .with("fH", 0.0);
        let record = Parser::new("pH90 plH90 ph1 sp0 fH", &params).parameters().unwrap();
        assert_eq!(record.length, Some(1.0));
        assert_abs_diff_eq!(record.power, 2.0);
        assert_abs_diff_eq!(record.channel, 0.0);
        match record.shape {
            Some(ShapeSpec::Custom(f)) => assert_abs_diff_eq!(f.eval(100.0), 101.0),
            other => panic!("expected a custom shape, got {other:?}"),
        }
    }

    #[test]
    fn test_external_text_coercion() {
        let params = ExternalParams::new().with("plX", "0.5");
        let record = Parser::new("p1 plX", &params).parameters().unwrap();
        assert_abs_diff_eq!(record.power, 0.5);

        let bad = ExternalParams::new().with("spS", 3.0);
        let err = Parser::new("p1 spS", &bad).parameters().unwrap_err();
        assert!(matches!(err, PulseplotError::TypeCoercion { .. }));
    }

    #[test]
    fn test_keyword_literals() {
        let record = parameters("p1 tkw={'fontsize':10} skw={\"lw\": 2}").unwrap();
        assert_eq!(record.text_kw.get("fontsize"), Some(&serde_json::json!(10)));
        assert_eq!(record.style_kw.get("lw"), Some(&serde_json::json!(2)));
        assert!(record.phase_kw.is_empty());
    }

    #[test]
    fn test_bad_literal() {
        let err = parameters("p1 pkw={fontsize:}").unwrap_err();
        assert!(matches!(err, PulseplotError::LiteralSyntax { .. }));
    }

    #[test]
    fn test_bad_cast() {
        let err = parameters("p1 plx").unwrap_err();
        match err {
            PulseplotError::TypeCoercion { key, token, expected } => {
                assert_eq!(key, "pl");
                assert_eq!(token, "plx");
                assert_eq!(expected, ValueKind::Float);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_flags_and_backticks() {
        let element = parse("p2 w c kc ph=`_x` tx=`a b` f1").unwrap();
        let pulse = element.as_pulse().unwrap();
        assert!(pulse.wait && pulse.centered && pulse.keep_centered);
        assert!(!pulse.open);
        assert_eq!(pulse.phase.as_deref(), Some("_x"));
        assert_eq!(pulse.common.text.as_deref(), Some("a b"));
    }

    #[test]
    fn test_decay_shape_forces_open_outline() {
        let pulse = parse("p2 pl0.5 f1 sp=fid_20").unwrap();
        let pulse = pulse.as_pulse().unwrap();
        assert!(pulse.open);
        assert!(pulse.truncate_off);
        assert_eq!(pulse.facecolor, "none");

        let plain = parse("p2 pl0.5 f1 sp=gauss").unwrap();
        assert_eq!(plain.as_pulse().unwrap().facecolor, "white");
    }

    #[test]
    fn test_delay_drops_pulse_fields() {
        let element = parse("d2 pl0.3 fcred f1").unwrap();
        assert_eq!(element.kind(), ElementKind::Delay);
        assert!(element.as_pulse().is_none());
        assert_eq!(element.to_parameters().get(Param::Power), Value::Float(1.0));
    }

    #[test]
    fn test_point_count_bounds() {
        let err = parameters("p1 np0").unwrap_err();
        assert!(matches!(err, PulseplotError::InvalidParameter { .. }));
        assert_eq!(parameters("p1 np=250").unwrap().npoints, 250);

        let err = parameters("p1 np=100000000000").unwrap_err();
        assert!(matches!(err, PulseplotError::InvalidParameter { .. }));
        assert_eq!(parameters(&format!("p1 np={MAX_NPOINTS}")).unwrap().npoints, MAX_NPOINTS);
    }

    #[test]
    fn test_explicit_start_time() {
        let element = parse("p1 st2.5 nA").unwrap();
        assert_eq!(element.start_time(), Some(2.5));
        assert_eq!(element.name(), Some("A"));
    }
}

//! Typed records produced by the instruction parser.

use serde::Serialize;

use super::grammar::{DefaultValue, Param};
use crate::error::{PulseplotError, Result};
use crate::shapes::ShapeSpec;

/// Keyword literal map (text, phase and style overrides).
pub type StyleMap = serde_json::Map<String, serde_json::Value>;

/// Upper bound on outline samples for a single pulse.
pub const MAX_NPOINTS: usize = 100_000;

/// The two element variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Pulse,
    Delay,
}

impl ElementKind {
    /// Lowercase name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Delay => "delay",
        }
    }
}

/// Fields shared by pulses and delays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Common {
    /// Channel (vertical lane) of the element
    pub channel: f64,
    /// Explicit start time; `None` defers placement to the layout pass
    pub start_time: Option<f64>,
    /// Annotation text
    pub text: Option<String>,
    /// Annotation horizontal offset
    pub text_dx: f64,
    /// Annotation vertical offset
    pub text_dy: f64,
    /// Annotation font size
    pub text_fontsize: f64,
    /// Annotation style overrides
    pub text_kw: StyleMap,
    /// Outline style overrides
    pub style_kw: StyleMap,
    /// Unique name used for lookups
    pub name: Option<String>,
}

/// A timed event with shape, power and phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pulse {
    #[serde(flatten)]
    pub common: Common,
    /// Pulse length
    pub length: f64,
    /// Amplitude multiplier
    pub power: f64,
    /// Phase label
    pub phase: Option<String>,
    /// Amplitude shape (`None` draws a square)
    pub shape: Option<ShapeSpec>,
    /// Number of amplitude samples
    pub npoints: usize,
    /// Hold the timeline cursor at this pulse
    pub wait: bool,
    /// Draw symmetric about the start time
    pub centered: bool,
    /// Keep the cursor at the center of a centered pulse
    pub keep_centered: bool,
    /// Leave the outline unclosed
    pub open: bool,
    /// Skip the baseline return at both ends
    pub truncate_off: bool,
    pub facecolor: String,
    pub edgecolor: String,
    pub alpha: f64,
    pub hatch: String,
    /// Phase label horizontal offset
    pub phase_dx: f64,
    /// Phase label vertical offset
    pub phase_dy: f64,
    /// Phase label font size
    pub phase_fontsize: f64,
    /// Phase label style overrides
    pub phase_kw: StyleMap,
}

/// A pure time advance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delay {
    #[serde(flatten)]
    pub common: Common,
    /// Delay duration
    pub duration: f64,
}

/// One element of a pulse sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Pulse(Pulse),
    Delay(Delay),
}

impl Element {
    /// Which variant this is.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Pulse(_) => ElementKind::Pulse,
            Self::Delay(_) => ElementKind::Delay,
        }
    }

    /// Shared fields.
    pub fn common(&self) -> &Common {
        match self {
            Self::Pulse(p) => &p.common,
            Self::Delay(d) => &d.common,
        }
    }

    /// Shared fields, mutably.
    pub fn common_mut(&mut self) -> &mut Common {
        match self {
            Self::Pulse(p) => &mut p.common,
            Self::Delay(d) => &mut d.common,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.common().name.as_deref()
    }

    pub fn channel(&self) -> f64 {
        self.common().channel
    }

    pub fn start_time(&self) -> Option<f64> {
        self.common().start_time
    }

    /// True when the layout pass assigns the start time.
    pub fn is_deferred(&self) -> bool {
        self.common().start_time.is_none()
    }

    /// Pulse length or delay duration.
    pub fn extent(&self) -> f64 {
        match self {
            Self::Pulse(p) => p.length,
            Self::Delay(d) => d.duration,
        }
    }

    pub fn as_pulse(&self) -> Option<&Pulse> {
        match self {
            Self::Pulse(p) => Some(p),
            Self::Delay(_) => None,
        }
    }

    pub fn as_delay(&self) -> Option<&Delay> {
        match self {
            Self::Delay(d) => Some(d),
            Self::Pulse(_) => None,
        }
    }

    /// Flatten back into the full parameter record.
    ///
    /// Fields the variant does not carry take their grammar defaults.
    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::default();
        let common = self.common().clone();
        params.channel = common.channel;
        params.start_time = common.start_time;
        params.text = common.text;
        params.text_dx = common.text_dx;
        params.text_dy = common.text_dy;
        params.text_fontsize = common.text_fontsize;
        params.text_kw = common.text_kw;
        params.style_kw = common.style_kw;
        params.name = common.name;

        match self {
            Self::Pulse(p) => {
                params.length = Some(p.length);
                params.power = p.power;
                params.phase = p.phase.clone();
                params.shape = p.shape.clone();
                params.npoints = p.npoints;
                params.wait = p.wait;
                params.centered = p.centered;
                params.keep_centered = p.keep_centered;
                params.open = p.open;
                params.truncate_off = p.truncate_off;
                params.facecolor = p.facecolor.clone();
                params.edgecolor = p.edgecolor.clone();
                params.alpha = p.alpha;
                params.hatch = p.hatch.clone();
                params.phase_dx = p.phase_dx;
                params.phase_dy = p.phase_dy;
                params.phase_fontsize = p.phase_fontsize;
                params.phase_kw = p.phase_kw.clone();
            }
            Self::Delay(d) => {
                params.duration = Some(d.duration);
            }
        }

        params
    }
}

/// A typed parameter value on its way into a [`Parameters`] record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unset,
    Float(f64),
    Int(usize),
    Bool(bool),
    Text(String),
    Literal(StyleMap),
    Shape(ShapeSpec),
}

impl From<DefaultValue> for Value {
    fn from(default: DefaultValue) -> Self {
        match default {
            DefaultValue::Unset => Self::Unset,
            DefaultValue::Float(v) => Self::Float(v),
            DefaultValue::Int(v) => Self::Int(v),
            DefaultValue::Bool(v) => Self::Bool(v),
            DefaultValue::Text(v) => Self::Text(v.to_string()),
            DefaultValue::EmptyLiteral => Self::Literal(StyleMap::new()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<ShapeSpec> for Value {
    fn from(v: ShapeSpec) -> Self {
        Self::Shape(v)
    }
}

impl Value {
    fn mismatch(&self, param: Param) -> PulseplotError {
        let spec = param.spec();
        PulseplotError::coercion(spec.key, format!("{self:?}"), spec.kind)
    }

    fn float(self, param: Param) -> Result<f64> {
        match self {
            Self::Float(v) => Ok(v),
            other => Err(other.mismatch(param)),
        }
    }

    fn optional_float(self, param: Param) -> Result<Option<f64>> {
        match self {
            Self::Unset => Ok(None),
            other => other.float(param).map(Some),
        }
    }

    fn flag(self, param: Param) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            other => Err(other.mismatch(param)),
        }
    }

    fn text(self, param: Param) -> Result<String> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(other.mismatch(param)),
        }
    }

    fn optional_text(self, param: Param) -> Result<Option<String>> {
        match self {
            Self::Unset => Ok(None),
            other => other.text(param).map(Some),
        }
    }

    fn literal(self, param: Param) -> Result<StyleMap> {
        match self {
            Self::Literal(v) => Ok(v),
            other => Err(other.mismatch(param)),
        }
    }
}

/// Every grammar field of one instruction, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub length: Option<f64>,
    pub power: f64,
    pub phase: Option<String>,
    pub shape: Option<ShapeSpec>,
    pub wait: bool,
    pub centered: bool,
    pub keep_centered: bool,
    pub facecolor: String,
    pub edgecolor: String,
    pub alpha: f64,
    pub hatch: String,
    pub truncate_off: bool,
    pub npoints: usize,
    pub phase_dx: f64,
    pub phase_dy: f64,
    pub phase_fontsize: f64,
    pub phase_kw: StyleMap,
    pub open: bool,
    pub duration: Option<f64>,
    pub start_time: Option<f64>,
    pub channel: f64,
    pub text: Option<String>,
    pub text_dx: f64,
    pub text_dy: f64,
    pub text_kw: StyleMap,
    pub text_fontsize: f64,
    pub name: Option<String>,
    pub style_kw: StyleMap,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            length: None,
            power: 1.0,
            phase: None,
            shape: None,
            wait: false,
            centered: false,
            keep_centered: false,
            facecolor: "white".to_string(),
            edgecolor: "black".to_string(),
            alpha: 1.0,
            hatch: String::new(),
            truncate_off: false,
            npoints: 100,
            phase_dx: 0.0,
            phase_dy: 0.0,
            phase_fontsize: 15.0,
            phase_kw: StyleMap::new(),
            open: false,
            duration: None,
            start_time: None,
            channel: 0.0,
            text: None,
            text_dx: 0.0,
            text_dy: 0.0,
            text_kw: StyleMap::new(),
            text_fontsize: 15.0,
            name: None,
            style_kw: StyleMap::new(),
        }
    }
}

impl Parameters {
    /// Store a value in the field for `param`.
    ///
    /// The value must already have the parameter's kind.
    pub fn apply(&mut self, param: Param, value: Value) -> Result<()> {
        match param {
            Param::Length => self.length = value.optional_float(param)?,
            Param::Power => self.power = value.float(param)?,
            Param::Phase => self.phase = value.optional_text(param)?,
            Param::Shape => {
                self.shape = match value {
                    Value::Unset => None,
                    Value::Shape(shape) => Some(shape),
                    other => return Err(other.mismatch(param)),
                }
            }
            Param::Wait => self.wait = value.flag(param)?,
            Param::Centered => self.centered = value.flag(param)?,
            Param::KeepCentered => self.keep_centered = value.flag(param)?,
            Param::Facecolor => self.facecolor = value.text(param)?,
            Param::Edgecolor => self.edgecolor = value.text(param)?,
            Param::Alpha => self.alpha = value.float(param)?,
            Param::Hatch => self.hatch = value.text(param)?,
            Param::TruncateOff => self.truncate_off = value.flag(param)?,
            Param::Npoints => {
                self.npoints = match value {
                    Value::Int(0) => {
                        return Err(PulseplotError::InvalidParameter {
                            key: param.spec().key.to_string(),
                            message: "a pulse needs at least one point".to_string(),
                        })
                    }
                    Value::Int(n) if n > MAX_NPOINTS => {
                        return Err(PulseplotError::InvalidParameter {
                            key: param.spec().key.to_string(),
                            message: format!("at most {MAX_NPOINTS} points per pulse, got {n}"),
                        })
                    }
                    Value::Int(n) => n,
                    other => return Err(other.mismatch(param)),
                }
            }
            Param::PhaseDx => self.phase_dx = value.float(param)?,
            Param::PhaseDy => self.phase_dy = value.float(param)?,
            Param::PhaseFontsize => self.phase_fontsize = value.float(param)?,
            Param::PhaseKw => self.phase_kw = value.literal(param)?,
            Param::Open => self.open = value.flag(param)?,
            Param::Duration => self.duration = value.optional_float(param)?,
            Param::StartTime => self.start_time = value.optional_float(param)?,
            Param::Channel => self.channel = value.float(param)?,
            Param::Text => self.text = value.optional_text(param)?,
            Param::TextDx => self.text_dx = value.float(param)?,
            Param::TextDy => self.text_dy = value.float(param)?,
            Param::TextKw => self.text_kw = value.literal(param)?,
            Param::TextFontsize => self.text_fontsize = value.float(param)?,
            Param::Name => self.name = value.optional_text(param)?,
            Param::StyleKw => self.style_kw = value.literal(param)?,
        }
        Ok(())
    }

    /// Read the field for `param` back as a [`Value`].
    pub fn get(&self, param: Param) -> Value {
        fn opt_float(v: Option<f64>) -> Value {
            v.map_or(Value::Unset, Value::Float)
        }
        fn opt_text(v: &Option<String>) -> Value {
            v.clone().map_or(Value::Unset, Value::Text)
        }

        match param {
            Param::Length => opt_float(self.length),
            Param::Power => Value::Float(self.power),
            Param::Phase => opt_text(&self.phase),
            Param::Shape => self.shape.clone().map_or(Value::Unset, Value::Shape),
            Param::Wait => Value::Bool(self.wait),
            Param::Centered => Value::Bool(self.centered),
            Param::KeepCentered => Value::Bool(self.keep_centered),
            Param::Facecolor => Value::Text(self.facecolor.clone()),
            Param::Edgecolor => Value::Text(self.edgecolor.clone()),
            Param::Alpha => Value::Float(self.alpha),
            Param::Hatch => Value::Text(self.hatch.clone()),
            Param::TruncateOff => Value::Bool(self.truncate_off),
            Param::Npoints => Value::Int(self.npoints),
            Param::PhaseDx => Value::Float(self.phase_dx),
            Param::PhaseDy => Value::Float(self.phase_dy),
            Param::PhaseFontsize => Value::Float(self.phase_fontsize),
            Param::PhaseKw => Value::Literal(self.phase_kw.clone()),
            Param::Open => Value::Bool(self.open),
            Param::Duration => opt_float(self.duration),
            Param::StartTime => opt_float(self.start_time),
            Param::Channel => Value::Float(self.channel),
            Param::Text => opt_text(&self.text),
            Param::TextDx => Value::Float(self.text_dx),
            Param::TextDy => Value::Float(self.text_dy),
            Param::TextKw => Value::Literal(self.text_kw.clone()),
            Param::TextFontsize => Value::Float(self.text_fontsize),
            Param::Name => opt_text(&self.name),
            Param::StyleKw => Value::Literal(self.style_kw.clone()),
        }
    }

    /// Build the element record, dropping fields the variant does not carry.
    ///
    /// A length makes a pulse and a duration makes a delay; both, or
    /// neither, is an error.
    pub fn into_element(self, instruction: &str) -> Result<Element> {
        let common = Common {
            channel: self.channel,
            start_time: self.start_time,
            text: self.text,
            text_dx: self.text_dx,
            text_dy: self.text_dy,
            text_fontsize: self.text_fontsize,
            text_kw: self.text_kw,
            style_kw: self.style_kw,
            name: self.name,
        };

        match (self.length, self.duration) {
            (Some(_), Some(_)) => Err(PulseplotError::ClassificationConflict {
                instruction: instruction.to_string(),
            }),
            (Some(length), None) => Ok(Element::Pulse(Pulse {
                common,
                length,
                power: self.power,
                phase: self.phase,
                shape: self.shape,
                npoints: self.npoints,
                wait: self.wait,
                centered: self.centered,
                keep_centered: self.keep_centered,
                open: self.open,
                truncate_off: self.truncate_off,
                facecolor: self.facecolor,
                edgecolor: self.edgecolor,
                alpha: self.alpha,
                hatch: self.hatch,
                phase_dx: self.phase_dx,
                phase_dy: self.phase_dy,
                phase_fontsize: self.phase_fontsize,
                phase_kw: self.phase_kw,
            })),
            (None, Some(duration)) => Ok(Element::Delay(Delay { common, duration })),
            (None, None) => Err(PulseplotError::UnclassifiedInstruction {
                instruction: instruction.to_string(),
            }),
        }
    }
}

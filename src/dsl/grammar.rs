//! Parameter grammar for pulse sequence instructions.
//!
//! The grammar is a static table of [`ParameterSpec`] entries. Each entry
//! carries its own token rule; the rules are concatenated, in table order,
//! into one pattern with exactly one capture group per entry.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Every parameter the instruction language understands, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Length,
    Power,
    Phase,
    Shape,
    Wait,
    Centered,
    KeepCentered,
    Facecolor,
    Edgecolor,
    Alpha,
    Hatch,
    TruncateOff,
    Npoints,
    PhaseDx,
    PhaseDy,
    PhaseFontsize,
    PhaseKw,
    Open,
    Duration,
    StartTime,
    Channel,
    Text,
    TextDx,
    TextDy,
    TextKw,
    TextFontsize,
    Name,
    StyleKw,
}

impl Param {
    /// The grammar entry for this parameter.
    pub fn spec(self) -> &'static ParameterSpec {
        &GRAMMAR[self as usize]
    }
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Floating point number
    Float,
    /// Non-negative integer
    Int,
    /// Presence flag
    Bool,
    /// Free text
    Text,
    /// Keyword literal map (`{'key': value}`)
    Literal,
    /// Passed through untyped (shape descriptors or shape functions)
    Raw,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Literal => "literal map",
            Self::Raw => "raw value",
        };
        f.write_str(name)
    }
}

/// Which element variants a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    Pulse,
    Delay,
    Both,
}

impl Applicability {
    /// Whether elements of `kind` carry this parameter.
    pub fn includes(self, kind: super::ElementKind) -> bool {
        use super::ElementKind;
        matches!(
            (self, kind),
            (Self::Both, _) | (Self::Pulse, ElementKind::Pulse) | (Self::Delay, ElementKind::Delay)
        )
    }
}

/// Declared default of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// No value; the field stays empty
    Unset,
    Float(f64),
    Int(usize),
    Bool(bool),
    Text(&'static str),
    /// An empty keyword literal
    EmptyLiteral,
}

/// One entry of the instruction grammar.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    /// Which field this entry fills
    pub param: Param,
    /// Key token as written in instructions (`pl`, `ph`, `tx`, ...)
    pub key: &'static str,
    /// Semantic field name
    pub name: &'static str,
    /// Declared value type
    pub kind: ValueKind,
    /// Value installed when the key is absent
    pub default: DefaultValue,
    /// Element variants carrying this parameter
    pub applies_to: Applicability,
    /// Token rule (regex body of this entry's capture group)
    pub pattern: &'static str,
}

macro_rules! spec {
    ($param:ident, $key:literal, $name:literal, $kind:ident, $default:expr, $applies:ident, $pattern:literal) => {
        ParameterSpec {
            param: Param::$param,
            key: $key,
            name: $name,
            kind: ValueKind::$kind,
            default: $default,
            applies_to: Applicability::$applies,
            pattern: $pattern,
        }
    };
}

use DefaultValue::{Bool, EmptyLiteral, Float, Int, Text, Unset};

/// Number of grammar entries.
pub const GRAMMAR_LEN: usize = 28;

/// The full grammar, in matching order. Index `i` holds `Param` number `i`.
///
/// Order matters: at any position the first entry whose rule matches wins,
/// so longer keys sharing a prefix (`pl`, `ph`, `pdx`) are kept out of
/// shorter rules by their excluded value characters.
#[rustfmt::skip]
pub static GRAMMAR: [ParameterSpec; GRAMMAR_LEN] = [
    spec!(Length,        "p",   "length",         Float,   Unset,         Pulse, r"\bp=?[^lhdkf ]+"),
    spec!(Power,         "pl",  "power",          Float,   Float(1.0),    Pulse, r"\bpl=?[^ ]+"),
    spec!(Phase,         "ph",  "phase",          Text,    Unset,         Pulse, r"\bph=?`[^`]*`|\bph=?[^ ]+"),
    spec!(Shape,         "sp",  "shape",          Raw,     Unset,         Pulse, r"\bsp=?[^ ]+"),
    spec!(Wait,          "w",   "wait",           Bool,    Bool(false),   Pulse, r"\bw\b"),
    spec!(Centered,      "c",   "centered",       Bool,    Bool(false),   Pulse, r"\bc\b"),
    spec!(KeepCentered,  "kc",  "keep_centered",  Bool,    Bool(false),   Pulse, r"\bkc\b"),
    spec!(Facecolor,     "fc",  "facecolor",      Text,    Text("white"), Pulse, r"\bfc=?[^ ]+"),
    spec!(Edgecolor,     "ec",  "edgecolor",      Text,    Text("black"), Pulse, r"\bec=?[^ ]+"),
    spec!(Alpha,         "al",  "alpha",          Float,   Float(1.0),    Pulse, r"\bal=?[^ ]+"),
    spec!(Hatch,         "h",   "hatch",          Text,    Text(""),      Pulse, r"\bh=?[^ ]+"),
    spec!(TruncateOff,   "tr",  "truncate_off",   Bool,    Bool(false),   Pulse, r"\btroff\b"),
    spec!(Npoints,       "np",  "npoints",        Int,     Int(100),      Pulse, r"\bnp=?[0-9]+"),
    spec!(PhaseDx,       "pdx", "phase_dx",       Float,   Float(0.0),    Pulse, r"\bpdx=?[^ ]+"),
    spec!(PhaseDy,       "pdy", "phase_dy",       Float,   Float(0.0),    Pulse, r"\bpdy=?[^ ]+"),
    spec!(PhaseFontsize, "pfs", "phase_fontsize", Float,   Float(15.0),   Pulse, r"\bpfs=?[^ ]+"),
    spec!(PhaseKw,       "pkw", "phase_kw",       Literal, EmptyLiteral,  Pulse, r"\bpkw=?\{.*?\}"),
    spec!(Open,          "o",   "open",           Bool,    Bool(false),   Pulse, r"\bo\b"),
    spec!(Duration,      "d",   "duration",       Float,   Unset,         Delay, r"\bd=?[^ ]+"),
    spec!(StartTime,     "st",  "start_time",     Float,   Unset,         Both,  r"\bst=?[^ ]+"),
    spec!(Channel,       "f",   "channel",        Float,   Float(0.0),    Both,  r"\bf=?[^c ]+"),
    spec!(Text,          "tx",  "text",           Text,    Unset,         Both,  r"\btx=?`[^`]*`|\btx=?[^ ]+"),
    spec!(TextDx,        "tdx", "text_dx",        Float,   Float(0.0),    Both,  r"\btdx=?[^ ]+"),
    spec!(TextDy,        "tdy", "text_dy",        Float,   Float(0.0),    Both,  r"\btdy=?[^ ]+"),
    spec!(TextKw,        "tkw", "text_kw",        Literal, EmptyLiteral,  Both,  r"\btkw=?\{.*?\}"),
    spec!(TextFontsize,  "tfs", "text_fontsize",  Float,   Float(15.0),   Both,  r"\btfs=?[^ ]+"),
    spec!(Name,          "n",   "name",           Text,    Unset,         Both,  r"\bn=?[^p ]+"),
    spec!(StyleKw,       "skw", "style_kw",       Literal, EmptyLiteral,  Both,  r"\bskw=?\{.*?\}"),
];

/// Concatenation of every entry's rule as an optional capture group.
pub fn composed_pattern() -> String {
    GRAMMAR
        .iter()
        .map(|spec| format!("({})?", spec.pattern))
        .collect()
}

/// The compiled composed pattern.
pub static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&composed_pattern()).expect("instruction grammar is a valid regex")
});

/// Look up a grammar entry by its key token.
pub fn find_key(key: &str) -> Option<&'static ParameterSpec> {
    GRAMMAR.iter().find(|spec| spec.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_param_index() {
        for (i, spec) in GRAMMAR.iter().enumerate() {
            assert_eq!(spec.param as usize, i, "entry '{}' is out of place", spec.key);
        }
    }

    #[test]
    fn test_group_count_equals_table_size() {
        // Group 0 is the whole match.
        assert_eq!(PATTERN.captures_len(), GRAMMAR.len() + 1);
    }

    #[test]
    fn test_keys_are_unique() {
        for spec in &GRAMMAR {
            assert_eq!(find_key(spec.key).map(|s| s.param), Some(spec.param));
        }
    }

    #[test]
    fn test_applicability() {
        use crate::dsl::ElementKind;
        assert!(Param::Length.spec().applies_to.includes(ElementKind::Pulse));
        assert!(!Param::Length.spec().applies_to.includes(ElementKind::Delay));
        assert!(Param::Duration.spec().applies_to.includes(ElementKind::Delay));
        assert!(Param::Channel.spec().applies_to.includes(ElementKind::Pulse));
        assert!(Param::Channel.spec().applies_to.includes(ElementKind::Delay));
    }
}

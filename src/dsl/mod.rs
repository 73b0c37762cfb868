//! Instruction language for pulse sequences.
//!
//! Each line of a sequence describes one element. A line is a run of
//! space-separated tokens; every token that starts with a known key sets
//! that key's parameter and everything else is ignored.
//!
//! # Grammar Overview
//!
//! ```text
//! sequence    = { line }
//! line        = { token | word } [comment]
//! comment     = '#' { any_char }
//! token       = key ['='] value | key ['='] '`' { any_char } '`' | flag
//! flag        = "w" | "c" | "kc" | "o" | "troff"
//! literal     = '{' { any_char } '}'
//! ```
//!
//! A line with a pulse length (`p`) is a pulse, a line with a duration
//! (`d`) is a delay. A token written verbatim in the external parameter
//! table (`pH90`, `sp0`) takes its value from the table.
//!
//! # Common Keys
//!
//! | Key | Parameter | Example |
//! |-----|-----------|---------|
//! | p | pulse length | `p1`, `p=0.5` |
//! | d | delay duration | `d2` |
//! | pl | power | `pl0.5` |
//! | ph | phase label | `phx`, ``ph=`_y` `` |
//! | sp | shape | `sp=gauss`, `sp=ramp_-40` |
//! | f | channel | `f1` |
//! | st | start time | `st3.5` |
//! | tx | annotation | `tx=TEST`, ``tx=`two words` `` |
//! | n | name | `nH90` |
//! | w, c, kc, o, troff | wait, centered, keep centered, open, no baseline | `w` |
//! | tkw, pkw, skw | style literals | `tkw={'fontsize': 10}` |
//!
//! The full table lives in [`GRAMMAR`].
//!
//! # Example
//!
//! ```text
//! # Spin echo
//! p1 pl1 ph1 f1 c
//! d2 tx=$\tau$ f1
//! p2 pl1 ph2 f1 c nrefocus
//! d2 tx=$\tau$ f1
//! p3 pl0.5 f1 sp=fid troff o phrec
//! ```

mod ast;
mod external;
mod grammar;
mod lexer;
mod parser;

pub use ast::*;
pub use external::{ExternalParams, ExternalValue};
pub use grammar::{
    composed_pattern, find_key, Applicability, DefaultValue, Param, ParameterSpec, ValueKind, GRAMMAR,
    GRAMMAR_LEN,
};
pub use lexer::RawTokens;
pub use parser::Parser;

use crate::error::Result;

/// Parse one instruction line into a pulse or a delay.
pub fn parse_instruction(line: &str, params: &ExternalParams) -> Result<Element> {
    Parser::new(line, params).parse()
}

/// Parse one instruction line into its full parameter record.
pub fn parse_parameters(line: &str, params: &ExternalParams) -> Result<Parameters> {
    Parser::new(line, params).parameters()
}

/// The instruction part of a sequence line, or `None` for blank and
/// comment-only lines.
pub fn instruction_text(line: &str) -> Option<&str> {
    let code = line.split_once('#').map_or(line, |(code, _)| code).trim();
    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_text() {
        assert_eq!(instruction_text("p1 f1 # first pulse"), Some("p1 f1"));
        assert_eq!(instruction_text("   # note"), None);
        assert_eq!(instruction_text(""), None);
        assert_eq!(instruction_text("  d2  "), Some("d2"));
    }

    #[test]
    fn test_parse_instruction() {
        let element = parse_instruction("p1 pl0.5 ph_x f2", &ExternalParams::new()).unwrap();
        assert_eq!(element.kind(), ElementKind::Pulse);
        assert_eq!(element.channel(), 2.0);
    }
}

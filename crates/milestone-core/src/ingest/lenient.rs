//! Lenient JSON parsing for model output.
//!
//! A small recursive-descent parser that accepts the usual ways a
//! generative model mangles JSON and records each recovery it applies as a
//! [`Repair`]. Well-formed JSON parses with no repairs.
//!
//! Accepted deviations:
//!
//! - prose before the first `{` or after the matching `}`
//! - single-quoted strings and keys
//! - stray backticks outside strings
//! - unquoted object keys
//! - trailing commas before `}` or `]`
//! - unquoted word-like values (`Moderate`, `45 minutes`)
//! - repeated commas, and commas directly after `{` or `[`
//! - input truncated before its closing brackets, or closed with the
//!   wrong bracket

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

const MAX_DEPTH: usize = 64;

/// One kind of recovery applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repair {
    Preamble,
    Trailer,
    SingleQuotes,
    Backtick,
    BareKey,
    TrailingComma,
    BareValue,
    DuplicateComma,
    LeadingComma,
    Unterminated,
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preamble => "preamble",
            Self::Trailer => "trailer",
            Self::SingleQuotes => "single_quotes",
            Self::Backtick => "backtick",
            Self::BareKey => "bare_key",
            Self::TrailingComma => "trailing_comma",
            Self::BareValue => "bare_value",
            Self::DuplicateComma => "duplicate_comma",
            Self::LeadingComma => "leading_comma",
            Self::Unterminated => "unterminated",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LenientError {
    #[error("no JSON object found")]
    NoObject,

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("nesting too deep")]
    TooDeep,
}

/// A parsed value plus the repairs needed to get it, in first-applied order.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub value: Value,
    pub repairs: Vec<Repair>,
}

/// Parse the first JSON object in `text`, repairing as needed.
pub fn parse(text: &str) -> Result<Parsed, LenientError> {
    let start = text.find('{').ok_or(LenientError::NoObject)?;
    let mut repairs = Vec::new();
    if !text[..start].trim().is_empty() {
        repairs.push(Repair::Preamble);
    }

    let body = match text.rfind('}') {
        Some(end) if end > start => {
            if !text[end + 1..].trim().is_empty() {
                repairs.push(Repair::Trailer);
            }
            &text[start..=end]
        }
        _ => &text[start..],
    };

    let mut parser = Parser {
        chars: body.chars().collect(),
        pos: 0,
        depth: 0,
        repairs,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.peek().is_some() {
        parser.note(Repair::Trailer);
    }
    Ok(Parsed {
        value,
        repairs: parser.repairs,
    })
}

/// Parse leniently and re-serialize as compact, valid JSON.
pub fn repair(text: &str) -> Result<String, LenientError> {
    parse(text).map(|parsed| parsed.value.to_string())
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    repairs: Vec<Repair>,
}

impl Parser {
    fn note(&mut self, repair: Repair) {
        if !self.repairs.contains(&repair) {
            self.repairs.push(repair);
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn unexpected(&self, found: char) -> LenientError {
        LenientError::Unexpected {
            found,
            offset: self.pos,
        }
    }

    /// Skip whitespace and stray backticks.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c == '`' {
                self.note(Repair::Backtick);
            } else if !c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<Value, LenientError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LenientError::UnexpectedEnd),
            Some('{') => self.nested(Self::object),
            Some('[') => self.nested(Self::array),
            Some('"') => self.string('"').map(Value::String),
            Some('\'') => {
                self.note(Repair::SingleQuotes);
                self.string('\'').map(Value::String)
            }
            Some(_) => self.scalar(),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, LenientError>,
    ) -> Result<Value, LenientError> {
        if self.depth >= MAX_DEPTH {
            return Err(LenientError::TooDeep);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    /// Consume commas between members. Returns whether any were seen.
    fn separator(&mut self) -> bool {
        self.skip_ws();
        if self.peek() != Some(',') {
            return false;
        }
        self.pos += 1;
        self.skip_ws();
        while self.peek() == Some(',') {
            self.note(Repair::DuplicateComma);
            self.pos += 1;
            self.skip_ws();
        }
        true
    }

    fn leading_commas(&mut self) {
        self.skip_ws();
        while self.peek() == Some(',') {
            self.note(Repair::LeadingComma);
            self.pos += 1;
            self.skip_ws();
        }
    }

    /// Before the first member: true when the container is already finished.
    fn empty(&mut self, closer: char) -> bool {
        match self.peek() {
            Some(c) if c == closer => {
                self.pos += 1;
                true
            }
            None | Some('}' | ']') => {
                self.note(Repair::Unterminated);
                true
            }
            Some(_) => false,
        }
    }

    /// After a member: true when the container is finished.
    fn close(&mut self, closer: char, comma: bool) -> Result<bool, LenientError> {
        match self.peek() {
            Some(c) if c == closer => {
                self.pos += 1;
                if comma {
                    self.note(Repair::TrailingComma);
                }
                Ok(true)
            }
            // EOF, or the enclosing container's closer: this one was never closed.
            None | Some('}' | ']') => {
                self.note(Repair::Unterminated);
                Ok(true)
            }
            Some(c) if !comma => Err(self.unexpected(c)),
            Some(_) => Ok(false),
        }
    }

    fn object(&mut self) -> Result<Value, LenientError> {
        self.pos += 1;
        let mut map = Map::new();
        self.leading_commas();
        if self.empty('}') {
            return Ok(Value::Object(map));
        }
        loop {
            let key = self.key()?;
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.unexpected(c));
                }
                None => {
                    self.note(Repair::Unterminated);
                    return Ok(Value::Object(map));
                }
            }
            let value = self.value()?;
            map.insert(key, value);
            let comma = self.separator();
            if self.close('}', comma)? {
                return Ok(Value::Object(map));
            }
        }
    }

    fn array(&mut self) -> Result<Value, LenientError> {
        self.pos += 1;
        let mut items = Vec::new();
        self.leading_commas();
        if self.empty(']') {
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.value()?);
            let comma = self.separator();
            if self.close(']', comma)? {
                return Ok(Value::Array(items));
            }
        }
    }

    fn key(&mut self) -> Result<String, LenientError> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.string('"'),
            Some('\'') => {
                self.note(Repair::SingleQuotes);
                self.string('\'')
            }
            Some(c) if is_bare_key_char(c) => {
                self.note(Repair::BareKey);
                let start = self.pos;
                while self.peek().is_some_and(is_bare_key_char) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(LenientError::UnexpectedEnd),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LenientError> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                self.note(Repair::Unterminated);
                return Ok(out);
            };
            match c {
                '\\' => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('u') => out.push(self.unicode_escape()),
                    Some(other) => out.push(other),
                    None => {
                        self.note(Repair::Unterminated);
                        return Ok(out);
                    }
                },
                c if c == quote => {
                    if quote == '\'' && !self.closes_single_quote() {
                        out.push(c);
                    } else {
                        return Ok(out);
                    }
                }
                c => out.push(c),
            }
        }
    }

    /// A `'` only ends a single-quoted string when structure follows it,
    /// so apostrophes in words survive.
    fn closes_single_quote(&self) -> bool {
        self.chars[self.pos..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_none_or(|c| matches!(c, ',' | '}' | ']' | ':'))
    }

    /// Decode the body of a `\u` escape. A high surrogate followed by a
    /// `\u` low surrogate decodes as one char; anything unpaired or short
    /// becomes U+FFFD with its hex digits consumed.
    fn unicode_escape(&mut self) -> char {
        let Some(code) = self.hex4() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !(0xD800..0xDC00).contains(&code) {
            return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        }

        let resume = self.pos;
        let paired = self.chars.get(self.pos..self.pos + 2) == Some(&['\\', 'u'][..]);
        if paired {
            self.pos += 2;
            if let Some(low) = self.hex4().filter(|low| (0xDC00..0xE000).contains(low)) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
            self.pos = resume;
        }
        char::REPLACEMENT_CHARACTER
    }

    /// Up to four hex digits. Returns the code only when all four are present.
    fn hex4(&mut self) -> Option<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self.peek().and_then(|c| c.to_digit(16))?;
            code = code * 16 + digit;
            self.pos += 1;
        }
        Some(code)
    }

    /// Numbers, literals, and unquoted text up to the next delimiter.
    fn scalar(&mut self) -> Result<Value, LenientError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !matches!(c, ',' | '}' | ']' | '"'))
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let mut token = raw.trim().to_string();
        if token.contains('`') {
            self.note(Repair::Backtick);
            token = token.replace('`', "").trim().to_string();
        }

        match token.as_str() {
            "" => Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => LenientError::UnexpectedEnd,
            }),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => match token.parse::<Number>() {
                Ok(n) => Ok(Value::Number(n)),
                Err(_) => {
                    self.note(Repair::BareValue);
                    Ok(Value::String(token))
                }
            },
        }
    }
}

fn is_bare_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(text: &str) -> (Value, Vec<Repair>) {
        let Parsed { value, repairs } = parse(text).unwrap();
        (value, repairs)
    }

    #[test]
    fn valid_json_needs_no_repairs() {
        let text = r#"{"a": [1, 2.5, true, null], "b": {"c": "d \"q\" é"}}"#;
        let (value, repairs) = parsed(text);
        assert!(repairs.is_empty(), "{repairs:?}");
        assert_eq!(value, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn unicode_escapes_match_serde() {
        for text in [
            r#"{"tip": "Smile \ud83d\ude00"}"#,
            r#"{"tip": "caf\u00e9 \u2615"}"#,
            r#"{"tip": "\uD83C\uDF4E and \ud83e\udd66"}"#,
        ] {
            let (value, repairs) = parsed(text);
            assert!(repairs.is_empty(), "{text}: {repairs:?}");
            assert_eq!(value, serde_json::from_str::<Value>(text).unwrap(), "{text}");
        }
        let once = repair(r#"{"tip":"Smile \ud83d\ude00"}"#).unwrap();
        assert_eq!(once, "{\"tip\":\"Smile \u{1F600}\"}");
        assert_eq!(repair(&once).unwrap(), once);
    }

    #[test]
    fn broken_unicode_escapes_consume_their_digits() {
        let (value, _) = parsed(r#"{"a": "x\ud83dy", "b": "\u12", "c": "\ud83dA"}"#);
        assert_eq!(value, json!({"a": "x\u{FFFD}y", "b": "\u{FFFD}", "c": "\u{FFFD}A"}));
    }

    #[test]
    fn repair_is_idempotent_on_valid_json() {
        let text = r#"{"meals":{"breakfast":["Oats"]},"notes":[""]}"#;
        let once = repair(text).unwrap();
        assert_eq!(once, text);
        assert_eq!(repair(&once).unwrap(), once);
    }

    #[test]
    fn strips_preamble_and_trailer() {
        let (value, repairs) = parsed(r#"Here you go: {"a": 1} Hope that helps!"#);
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(repairs, vec![Repair::Preamble, Repair::Trailer]);
    }

    #[test]
    fn content_after_first_object_is_trailer() {
        let (value, repairs) = parsed(r#"{"a": 1} {"b": 2}"#);
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(repairs, vec![Repair::Trailer]);
    }

    #[test]
    fn single_quotes_become_strings() {
        let (value, repairs) = parsed("{'tip': 'Drink water'}");
        assert_eq!(value, json!({"tip": "Drink water"}));
        assert_eq!(repairs, vec![Repair::SingleQuotes]);
    }

    #[test]
    fn apostrophes_survive_in_either_quote_style() {
        let (value, _) = parsed("{'tip': 'Don't skip meals'}");
        assert_eq!(value, json!({"tip": "Don't skip meals"}));
        let (value, repairs) = parsed(r#"{"tip": "Today's focus"}"#);
        assert_eq!(value, json!({"tip": "Today's focus"}));
        assert!(repairs.is_empty());
    }

    #[test]
    fn backticks_are_dropped() {
        let (value, repairs) = parsed(r#"{"a": `1`, `"b"`: 2}"#);
        assert_eq!(value, json!({"a": 1, "b": 2}));
        assert_eq!(repairs, vec![Repair::Backtick]);
    }

    #[test]
    fn bare_keys_are_quoted() {
        let (value, repairs) = parsed(r#"{protein_target: "160g", total-calories: 2100}"#);
        assert_eq!(value, json!({"protein_target": "160g", "total-calories": 2100}));
        assert_eq!(repairs, vec![Repair::BareKey]);
    }

    #[test]
    fn trailing_commas_are_removed() {
        let (value, repairs) = parsed(r#"{"a": [1, 2,], "b": 3,}"#);
        assert_eq!(value, json!({"a": [1, 2], "b": 3}));
        assert_eq!(repairs, vec![Repair::TrailingComma]);
    }

    #[test]
    fn bare_values_become_strings() {
        let (value, repairs) = parsed(r#"{"intensity": Moderate, "duration": 45 minutes}"#);
        assert_eq!(value, json!({"intensity": "Moderate", "duration": "45 minutes"}));
        assert_eq!(repairs, vec![Repair::BareValue]);
    }

    #[test]
    fn duplicate_and_leading_commas_collapse() {
        let (value, repairs) = parsed(r#"{, "a": [, 1,, 2], "b": 3}"#);
        assert_eq!(value, json!({"a": [1, 2], "b": 3}));
        assert_eq!(repairs, vec![Repair::LeadingComma, Repair::DuplicateComma]);
    }

    #[test]
    fn truncated_input_is_closed() {
        let (value, repairs) = parsed(r#"{"a": ["x", "y"#);
        assert_eq!(value, json!({"a": ["x", "y"]}));
        assert_eq!(repairs, vec![Repair::Unterminated]);
    }

    #[test]
    fn mismatched_closer_ends_inner_container() {
        let (value, repairs) = parsed(r#"{"a": ["x", "y"}"#);
        assert_eq!(value, json!({"a": ["x", "y"]}));
        assert_eq!(repairs, vec![Repair::Unterminated]);
    }

    #[test]
    fn missing_comma_is_an_error() {
        let err = parse(r#"{"a": 1 "b": 2}"#).unwrap_err();
        assert!(matches!(err, LenientError::Unexpected { found: '"', .. }));
    }

    #[test]
    fn text_without_braces_is_rejected() {
        assert_eq!(parse("no json here").unwrap_err(), LenientError::NoObject);
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(parse(r#"{"a": }"#).is_err());
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let text = format!("{{\"a\": {}1{}}}", "[".repeat(100), "]".repeat(100));
        assert_eq!(parse(&text).unwrap_err(), LenientError::TooDeep);
    }
}

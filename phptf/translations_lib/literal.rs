//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Compact PHP literal serializer and parser
//!
//! Values are written in a minified form of PHP's own literal syntax: short
//! array syntax, no whitespace and no trailing separators. The output can be
//! included directly by PHP, and [`deserialize`] reads it back without a PHP
//! interpreter.
//!
//! Grammar accepted by the parser (and produced by the serializer):
//!
//! ```text
//! value := string | integer | float | "true" | "false" | "null" | array
//! array := '[' (entry (',' entry)*)? ']'
//! entry := value | key '=>' value
//! key   := string | integer
//! ```
//!
//! An array whose keys are exactly `0..n-1` in order is written as a bare
//! list of values. The check is applied separately at every nesting level.

use std::collections::{HashMap, HashSet};

/// Nesting limit for [`deserialize`]
const MAX_DEPTH: usize = 512;

/// Array key: PHP arrays are keyed by integers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl From<i64> for Key {
    fn from(k: i64) -> Self {
        Key::Int(k)
    }
}

impl From<&str> for Key {
    fn from(k: &str) -> Self {
        Key::Str(k.to_string())
    }
}

impl From<String> for Key {
    fn from(k: String) -> Self {
        Key::Str(k)
    }
}

/// A value that can be written as a PHP literal
///
/// `Array` is an ordered list of `(key, value)` pairs and models both
/// sequences and associative mappings, the way PHP arrays do. Keys within
/// one array must be unique; [`serialize`] rejects repeated keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(Key, Value)>),
}

impl Value {
    /// Build a dense sequence (keys `0..n-1`)
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as i64), v.into()))
                .collect(),
        )
    }

    /// Build an array from key/value pairs, in the given order
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Array(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[(Key, Value)]> {
        match self {
            Value::Array(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a string key in an array value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_array()?
            .iter()
            .find(|(k, _)| matches!(k, Key::Str(s) if s == key))
            .map(|(_, v)| v)
    }

    /// PHP truthiness for scalars; arrays are truthy when non-empty
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty() && s != "0",
            Value::Array(entries) => !entries.is_empty(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Error type for literal serialization and parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    /// Value has no literal representation
    #[error("unsupported value: {0}")]
    UnsupportedType(String),
    /// Malformed input; `position` is a byte offset
    #[error("parse error at offset {position}: {message}")]
    ParseError { position: usize, message: String },
}

/// True if the keys are exactly `0..n-1` in order (PHP's `array_is_list`)
pub fn is_list(entries: &[(Key, Value)]) -> bool {
    entries
        .iter()
        .enumerate()
        .all(|(i, (k, _))| *k == Key::Int(i as i64))
}

/// Serialize a value to its minified literal form
pub fn serialize(value: &Value) -> Result<String, LiteralError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), LiteralError> {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => write_float(out, *f)?,
        Value::Str(s) => write_string(out, s),
        Value::Array(entries) => {
            let list = is_list(entries);
            if !list {
                check_unique_keys(entries)?;
            }
            out.push('[');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if !list {
                    write_key(out, key);
                    out.push_str("=>");
                }
                write_value(out, val)?;
            }
            out.push(']');
        }
    }
    Ok(())
}

fn check_unique_keys(entries: &[(Key, Value)]) -> Result<(), LiteralError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (key, _) in entries {
        if !seen.insert(key) {
            return Err(LiteralError::UnsupportedType(format!(
                "duplicate array key {:?}",
                key
            )));
        }
    }
    Ok(())
}

fn write_key(out: &mut String, key: &Key) {
    match key {
        Key::Int(i) => out.push_str(&i.to_string()),
        Key::Str(s) => write_string(out, s),
    }
}

fn write_float(out: &mut String, f: f64) -> Result<(), LiteralError> {
    if !f.is_finite() {
        return Err(LiteralError::UnsupportedType(format!(
            "non-finite float {}",
            f
        )));
    }
    // Debug formatting is the shortest round-trip form and always keeps
    // a '.' or an exponent, so the value reads back as a float.
    out.push_str(&format!("{:?}", f));
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

/// Parse a literal previously produced by [`serialize`]
pub fn deserialize(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { input, pos: 0 };
    let value = parser.parse_value(0)?;
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Recursive-descent parser over the literal grammar
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn error(&self, message: &str) -> LiteralError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, position: usize, message: &str) -> LiteralError {
        LiteralError::ParseError {
            position,
            message: message.to_string(),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'[') => self.parse_array(depth),
            Some(b'\'') => self.parse_string().map(Value::Str),
            Some(b'-') | Some(b'0'..=b'9') => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.pos += 1; // '['

        let mut entries: Vec<(Key, Value)> = Vec::new();
        let mut index: HashMap<Key, usize> = HashMap::new();
        let mut next_index: i64 = 0;

        if self.eat("]") {
            return Ok(Value::Array(entries));
        }

        loop {
            let start = self.pos;
            let first = self.parse_value(depth + 1)?;

            let (key, value) = if self.eat("=>") {
                let key = match first {
                    Value::Int(i) => Key::Int(i),
                    Value::Str(s) => Key::Str(s),
                    _ => return Err(self.error_at(start, "invalid array key")),
                };
                (key, self.parse_value(depth + 1)?)
            } else {
                (Key::Int(next_index), first)
            };

            if let Key::Int(i) = key {
                if i >= next_index {
                    next_index = i.saturating_add(1);
                }
            }

            match index.get(&key) {
                Some(&slot) => entries[slot].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }

            if self.eat(",") {
                continue;
            }
            if self.eat("]") {
                return Ok(Value::Array(entries));
            }
            return Err(match self.peek() {
                None => self.error("unterminated array"),
                Some(_) => self.error("expected ',' or ']'"),
            });
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.pos += 1; // opening quote

        let input = self.input;
        let mut result = String::new();
        let mut chars = input[self.pos..].char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '\'' => {
                    self.pos += offset + 1;
                    return Ok(result);
                }
                '\\' => match chars.peek() {
                    Some(&(_, next)) if next == '\\' || next == '\'' => {
                        result.push(next);
                        chars.next();
                    }
                    // Other sequences are literal in single-quoted strings
                    _ => result.push('\\'),
                },
                _ => result.push(c),
            }
        }

        Err(self.error_at(start, "unterminated string"))
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut end = self.pos;
        let mut is_float = false;

        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return Err(self.error_at(start, "expected digits"));
        }
        if bytes.get(end) == Some(&b'.') {
            is_float = true;
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            is_float = true;
            end += 1;
            if matches!(bytes.get(end), Some(b'+') | Some(b'-')) {
                end += 1;
            }
            let exp_start = end;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end == exp_start {
                return Err(self.error_at(end, "expected exponent digits"));
            }
        }

        let text = &self.input[start..end];
        self.pos = end;

        if is_float {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.error_at(start, "invalid float"))
        } else {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.error_at(start, "integer out of range"))
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut end = self.pos;
        while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
            end += 1;
        }

        let word = self.input[start..end].to_ascii_lowercase();
        let value = match word.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            _ => return Err(self.error_at(start, "unknown identifier")),
        };
        self.pos = end;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::integer(Value::Int(1234), "1234")]
    #[case::negative(Value::Int(-42), "-42")]
    #[case::float(Value::Float(12.34), "12.34")]
    #[case::whole_float(Value::Float(1.0), "1.0")]
    #[case::boolean(Value::Bool(true), "true")]
    #[case::null(Value::Null, "NULL")]
    #[case::string(Value::from("text"), "'text'")]
    #[case::empty_array(Value::Array(vec![]), "[]")]
    fn test_serialize_scalars(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(serialize(&input).unwrap(), expected);
    }

    #[test]
    fn test_serialize_complex_array() {
        let value = Value::map([
            ("Foo", Value::map([("Bar", "Baz")])),
            (
                "Foobar",
                Value::map([("Lorem", Value::map([("ipsum", "dolor")]))]),
            ),
            ("Barbaz", Value::Int(1234)),
        ]);
        assert_eq!(
            serialize(&value).unwrap(),
            "['Foo'=>['Bar'=>'Baz'],'Foobar'=>['Lorem'=>['ipsum'=>'dolor']],'Barbaz'=>1234]"
        );
    }

    #[test]
    fn test_serialize_list_array() {
        let value = Value::map([
            ("Foo", Value::list(["Bar", "Baz"])),
            ("Foobar", Value::list(["Lorem", "ipsum", "dolor"])),
            ("Barbaz", Value::Int(1234)),
        ]);
        assert_eq!(
            serialize(&value).unwrap(),
            "['Foo'=>['Bar','Baz'],'Foobar'=>['Lorem','ipsum','dolor'],'Barbaz'=>1234]"
        );
    }

    #[test]
    fn test_dense_keys_use_list_form() {
        let keyed = Value::map([(0i64, "a"), (1, "b"), (2, "c")]);
        let list = Value::list(["a", "b", "c"]);
        assert_eq!(serialize(&keyed).unwrap(), serialize(&list).unwrap());
        assert_eq!(serialize(&list).unwrap(), "['a','b','c']");
    }

    #[test]
    fn test_out_of_order_keys_are_written() {
        let value = Value::map([(0i64, "a"), (2, "b"), (1, "c")]);
        assert_eq!(serialize(&value).unwrap(), "[0=>'a',2=>'b',1=>'c']");
    }

    #[test]
    fn test_list_check_is_per_level() {
        // Inner lists stay lists even though the outer array is sparse.
        let value = Value::map([
            (1i64, Value::list(["x", "y"])),
            (0, Value::map([(1i64, "z")])),
        ]);
        let text = serialize(&value).unwrap();
        assert_eq!(text, "[1=>['x','y'],0=>[1=>'z']]");
        assert_eq!(deserialize(&text).unwrap(), value);
    }

    #[test]
    fn test_string_escaping() {
        let value = Value::from("it's a \\ path");
        let text = serialize(&value).unwrap();
        assert_eq!(text, r"'it\'s a \\ path'");
        assert_eq!(deserialize(&text).unwrap(), value);
    }

    #[test]
    fn test_control_characters_are_kept() {
        let value = Value::from("ctx\u{4}Hello\nworld");
        let text = serialize(&value).unwrap();
        assert_eq!(deserialize(&text).unwrap(), value);
    }

    #[test]
    fn test_non_finite_float_is_unsupported() {
        assert!(matches!(
            serialize(&Value::Float(f64::NAN)),
            Err(LiteralError::UnsupportedType(_))
        ));
        let nested = Value::list([Value::Float(f64::INFINITY)]);
        assert!(matches!(
            serialize(&nested),
            Err(LiteralError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_duplicate_keys_are_unsupported() {
        let value = Value::map([("a", 1i64), ("b", 2), ("a", 3)]);
        assert!(matches!(
            serialize(&value),
            Err(LiteralError::UnsupportedType(_))
        ));

        let nested = Value::list([Value::map([(0i64, "x"), (0, "y")])]);
        assert!(matches!(
            serialize(&nested),
            Err(LiteralError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_deserialize_keywords_case_insensitive() {
        assert_eq!(deserialize("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(deserialize("False").unwrap(), Value::Bool(false));
        assert_eq!(deserialize("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_deserialize_floats() {
        assert_eq!(deserialize("1e100").unwrap(), Value::Float(1e100));
        assert_eq!(deserialize("1.0E+25").unwrap(), Value::Float(1.0e25));
        assert_eq!(deserialize("-0.5").unwrap(), Value::Float(-0.5));
    }

    #[test]
    fn test_deserialize_implicit_keys() {
        let value = deserialize("['a'=>1,2,5=>3,4]").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                (Key::from("a"), Value::Int(1)),
                (Key::Int(0), Value::Int(2)),
                (Key::Int(5), Value::Int(3)),
                (Key::Int(6), Value::Int(4)),
            ])
        );
    }

    #[test]
    fn test_deserialize_duplicate_key_overwrites_in_place() {
        let value = deserialize("['a'=>1,'b'=>2,'a'=>3]").unwrap();
        assert_eq!(value, Value::map([("a", 3i64), ("b", 2)]));
    }

    #[rstest]
    #[case::empty("", 0)]
    #[case::unterminated_string("['abc", 1)]
    #[case::missing_bracket("[1,2", 4)]
    #[case::trailing_comma("[1,]", 3)]
    #[case::whitespace("[1, 2]", 3)]
    #[case::unknown_word("[foo]", 1)]
    #[case::bad_key("[true=>1]", 1)]
    #[case::trailing_input("1234;", 4)]
    #[case::bare_minus("-", 0)]
    fn test_deserialize_errors(#[case] input: &str, #[case] position: usize) {
        match deserialize(input) {
            Err(LiteralError::ParseError { position: p, .. }) => assert_eq!(p, position),
            other => panic!("expected parse error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_deserialize_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            deserialize(&deep),
            Err(LiteralError::ParseError { .. })
        ));
    }

    #[test]
    fn test_value_get() {
        let value = Value::map([("messages", Value::list(["x"]))]);
        assert_eq!(value.get("messages"), Some(&Value::list(["x"])));
        assert_eq!(value.get("language"), None);
        assert_eq!(Value::Int(3).get("messages"), None);
    }

    fn arb_key() -> impl Strategy<Value = Key> {
        prop_oneof![
            (-5i64..20).prop_map(Key::Int),
            "[a-z\u{4}'\\\\]{0,6}".prop_map(Key::Str),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            prop::num::f64::NORMAL.prop_map(Value::Float),
            any::<String>().prop_map(Value::Str),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::list),
                prop::collection::btree_map(arb_key(), inner, 0..6)
                    .prop_map(|m| Value::Array(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip(value in arb_value()) {
            let text = serialize(&value).unwrap();
            prop_assert_eq!(deserialize(&text).unwrap(), value);
        }
    }
}

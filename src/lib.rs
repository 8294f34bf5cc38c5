//! A small parser for a relaxed JSON dialect.
//!
//! Alongside the usual objects, arrays, strings and (integral) numbers, the dialect accepts
//! bare identifiers such as `{name: value, $ref: other}` both as object keys and as values.
//! Parsing happens in two stages: a [lexer::Lexer] turns the source into tokens on demand, and
//! a recursive descent [parser::Parser] pulls those tokens to build a [JsonValue] tree.
//!
//! ```
//! let value = lax_json::parse(r#"{name: "lax", tags: [a, b], size: 3}"#).unwrap();
//! assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("lax"));
//! assert_eq!(value.get("size").and_then(|v| v.as_f64()), Some(3.0));
//! ```
use std::borrow::Cow;
use std::collections::HashMap;

use tracing::debug;

use crate::decoders::{DecoderSelector, Encoding};
use crate::errors::ParserResult;
use crate::parser::Parser;

pub mod coords;
pub mod decoders;
pub mod errors;
pub mod lexer;
pub mod parser;

/// Basic enumeration of the different values within a parsed tree. Identifiers and strings
/// without escapes borrow from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue<'a> {
    /// Map of values
    Object(HashMap<Cow<'a, str>, JsonValue<'a>>),
    /// Array of values
    Array(Vec<JsonValue<'a>>),
    /// Decoded string value
    String(Cow<'a, str>),
    /// Floating point numeric value
    Number(f64),
    /// Raw text of a bare identifier
    Identifier(Cow<'a, str>),
}

impl<'a> JsonValue<'a> {
    /// Detach the value from the source it was parsed from
    pub fn into_owned(self) -> JsonValue<'static> {
        match self {
            JsonValue::Object(members) => JsonValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                    .collect(),
            ),
            JsonValue::Array(values) => {
                JsonValue::Array(values.into_iter().map(JsonValue::into_owned).collect())
            }
            JsonValue::String(str) => JsonValue::String(Cow::Owned(str.into_owned())),
            JsonValue::Number(value) => JsonValue::Number(value),
            JsonValue::Identifier(id) => JsonValue::Identifier(Cow::Owned(id.into_owned())),
        }
    }

    /// Look up a member of an object. Always [None] for anything other than an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue<'a>> {
        match self {
            JsonValue::Object(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(str) => Some(str.as_ref()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            JsonValue::Identifier(id) => Some(id.as_ref()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<Cow<'a, str>, JsonValue<'a>>> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue<'a>]> {
        match self {
            JsonValue::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }
}

/// Parse a complete document from a string slice. The returned tree borrows from `source`.
pub fn parse(source: &str) -> ParserResult<JsonValue<'_>> {
    Parser::new(source)
        .and_then(Parser::parse)
        .map_err(|err| {
            debug!(%err, "parse failed");
            err
        })
}

/// Decode a byte buffer using the given [Encoding] and parse the result. Since the decoded text
/// only lives for the duration of the call, the returned tree owns all of its contents.
pub fn parse_bytes(bytes: &[u8], encoding: Encoding) -> ParserResult<JsonValue<'static>> {
    let source = DecoderSelector::default().decode(bytes, encoding)?;
    let value = parse(&source)?;
    Ok(value.into_owned())
}

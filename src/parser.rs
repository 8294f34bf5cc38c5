//! Recursive descent over the token stream produced by a [Lexer].
//!
//! The [Parser] keeps exactly one token of lookahead. Both [Parser::parse_object] and
//! [Parser::parse_array] are entered with the lookahead positioned on the first token *inside*
//! the container and return with the lookahead positioned on the closing delimiter, which is
//! left for the caller to step over. Nested containers are parsed through the same parser
//! instance, so the enclosing container always resumes from the right place in the stream.
use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

use crate::coords::Span;
use crate::errors::{Details, ParserResult};
use crate::lexer::{Lexer, PackedToken, Token};
use crate::parser_error;
use crate::JsonValue;

/// Default limit on how deeply objects and arrays may be nested
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Main parser struct
pub struct Parser<'a> {
    /// Source of tokens
    lexer: Lexer<'a>,
    /// The current, as of yet unconsumed, token
    lookahead: PackedToken<'a>,
    /// Number of containers currently open
    depth: usize,
    /// Maximum number of containers which may be open at once
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the supplied source, priming the lookahead with the first token
    pub fn new(source: &'a str) -> ParserResult<Self> {
        let mut lexer = Lexer::new(source);
        let lookahead = lexer.consume()?;
        Ok(Parser {
            lexer,
            lookahead,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Replace the default nesting limit of [DEFAULT_MAX_DEPTH]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The current lookahead token
    pub fn lookahead(&self) -> &Token<'a> {
        &self.lookahead.0
    }

    /// Parse a complete document. The root must be an object or an array, and must be followed
    /// by nothing but whitespace.
    pub fn parse(mut self) -> ParserResult<JsonValue<'a>> {
        let root = match self.lookahead.0 {
            Token::StartObject => {
                self.advance()?;
                self.parse_object()?
            }
            Token::StartArray => {
                self.advance()?;
                self.parse_array()?
            }
            _ => {
                return parser_error!(
                    Details::InvalidRootObject(self.lookahead.0.to_string()),
                    self.lookahead.1.start
                )
            }
        };
        // step over the closing delimiter of the root
        self.advance()?;
        match self.lookahead {
            (Token::EndOfInput, _) => Ok(root),
            (ref token, span) => parser_error!(Details::TrailingInput(token.to_string()), span.start),
        }
    }

    /// An object is a list of `key : value` pairs, optionally separated by commas. Keys may be
    /// identifiers or strings. A repeated key replaces the earlier value.
    pub fn parse_object(&mut self) -> ParserResult<JsonValue<'a>> {
        self.descend()?;
        let object = self.parse_members();
        self.depth -= 1;
        object
    }

    fn parse_members(&mut self) -> ParserResult<JsonValue<'a>> {
        trace!(depth = self.depth, "start of object");
        let mut members: HashMap<Cow<'a, str>, JsonValue<'a>> = HashMap::new();
        loop {
            if self.lookahead.0 == Token::EndObject {
                break;
            }
            self.expect_more(Details::UnterminatedObject)?;
            let key = match self.take() {
                (Token::Identifier(id), _) => Cow::Borrowed(id),
                (Token::Str(str), _) => str,
                (token, span) => {
                    return parser_error!(Details::UnexpectedToken(token.to_string()), span.start)
                }
            };
            self.advance()?;
            if self.lookahead.0 != Token::Colon {
                self.expect_more(Details::UnterminatedObject)?;
                return parser_error!(
                    Details::PairExpected(self.lookahead.0.to_string()),
                    self.lookahead.1.start
                );
            }
            self.advance()?;
            self.expect_more(Details::UnterminatedObject)?;
            let value = self.parse_value()?;
            members.insert(key, value);
            if self.lookahead.0 == Token::Comma {
                self.advance()?;
            }
        }
        trace!(members = members.len(), "end of object");
        Ok(JsonValue::Object(members))
    }

    /// An array is a list of values. Commas are treated purely as separators, so runs of
    /// commas (and leading or trailing ones) contribute nothing to the result.
    pub fn parse_array(&mut self) -> ParserResult<JsonValue<'a>> {
        self.descend()?;
        let array = self.parse_elements();
        self.depth -= 1;
        array
    }

    fn parse_elements(&mut self) -> ParserResult<JsonValue<'a>> {
        trace!(depth = self.depth, "start of array");
        let mut values: Vec<JsonValue<'a>> = vec![];
        loop {
            match self.lookahead.0 {
                Token::EndArray => break,
                Token::Comma => self.advance()?,
                _ => {
                    self.expect_more(Details::UnterminatedArray)?;
                    values.push(self.parse_value()?);
                }
            }
        }
        trace!(values = values.len(), "end of array");
        Ok(JsonValue::Array(values))
    }

    /// Parse the value starting at the lookahead, leaving the lookahead on the token which
    /// follows it
    fn parse_value(&mut self) -> ParserResult<JsonValue<'a>> {
        let value = match self.lookahead.0 {
            Token::StartObject => {
                self.advance()?;
                self.parse_object()?
            }
            Token::StartArray => {
                self.advance()?;
                self.parse_array()?
            }
            _ => match self.take() {
                (Token::Identifier(id), _) => JsonValue::Identifier(Cow::Borrowed(id)),
                (Token::Str(str), _) => JsonValue::String(str),
                (Token::Num(value), _) => JsonValue::Number(value),
                (token, span) => {
                    return parser_error!(Details::UnexpectedToken(token.to_string()), span.start)
                }
            },
        };
        // step over the scalar, or the closing delimiter of the nested container
        self.advance()?;
        Ok(value)
    }

    /// Replace the lookahead with the next token from the lexer
    fn advance(&mut self) -> ParserResult<()> {
        self.lookahead = self.lexer.consume()?;
        Ok(())
    }

    /// Move the current lookahead out of the parser without lexing any further. The lookahead
    /// is left as a placeholder until the next call to [Parser::advance].
    fn take(&mut self) -> PackedToken<'a> {
        let placeholder = (Token::EndOfInput, self.lookahead.1);
        std::mem::replace(&mut self.lookahead, placeholder)
    }

    /// Open a new container, failing if that would exceed the nesting limit
    fn descend(&mut self) -> ParserResult<()> {
        if self.depth >= self.max_depth {
            return parser_error!(
                Details::MaxDepthExceeded(self.max_depth),
                self.lookahead.1.start
            );
        }
        self.depth += 1;
        Ok(())
    }

    /// Fail with the supplied details if the input ran out inside a container
    fn expect_more(&self, unterminated: Details) -> ParserResult<()> {
        match self.lookahead {
            (Token::EndOfInput, Span { start, .. }) => parser_error!(unterminated, start),
            _ => Ok(()),
        }
    }
}

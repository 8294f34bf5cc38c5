//! Character level scanning.  The [Lexer] walks a borrowed source string with a single
//! character of lookahead and classifies runs of characters into [Token]s on demand.
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use tracing::trace;

use crate::coords::{Coords, Span};
use crate::errors::{Details, ParserResult};
use crate::lexer_error;

/// Enumeration of valid tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    /// A bare identifier, borrowed straight from the source
    Identifier(&'a str),
    /// A string with all escapes decoded
    Str(Cow<'a, str>),
    Num(f64),
    EndOfInput,
}

impl<'a> Display for Token<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartObject => write!(f, "{{"),
            Token::EndObject => write!(f, "}}"),
            Token::StartArray => write!(f, "["),
            Token::EndArray => write!(f, "]"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Identifier(id) => write!(f, "{}", id),
            Token::Str(str) => write!(f, "\"{}\"", str),
            Token::Num(value) => write!(f, "{}", value),
            Token::EndOfInput => write!(f, "<EOF>"),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken<'a> = (Token<'a>, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span { start: $s, end: $s })
    };
}

/// Check whether a character may start an identifier
#[inline]
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$'
}

/// Check whether a character may continue an identifier
#[inline]
fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$'
}

#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Decode the character following a backslash within a string
#[inline]
fn unescape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{0008}'),
        'f' => Some('\u{000c}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        _ => None,
    }
}

pub struct Lexer<'a> {
    /// The source being scanned
    source: &'a str,
    /// Byte offset of the current character, equal to the source length at the end of input
    position: usize,
    /// The character at `position`, or [None] once the end of input has been reached
    current: Option<char>,
    /// Coordinates of the current character
    coords: Coords,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
            current: source.chars().next(),
            coords: Coords::default(),
        }
    }

    /// The character currently under the cursor, [None] at the end of input
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// The [Coords] of the character currently under the cursor
    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Move the cursor forward a single character. Once the end of input has been reached,
    /// further calls leave the cursor where it is.
    pub fn advance(&mut self) {
        if let Some(c) = self.current {
            self.position += c.len_utf8();
            self.coords.step(c);
            self.current = self.source[self.position..].chars().next();
        }
    }

    /// Consume the next token from the input, skipping any leading whitespace. Once the end of
    /// input is reached every subsequent call produces [Token::EndOfInput].
    pub fn consume(&mut self) -> ParserResult<PackedToken<'a>> {
        loop {
            let start = self.coords;
            let packed = match self.current {
                None => packed_token!(Token::EndOfInput, start),
                Some(c) if c.is_ascii_digit() || c == '-' => self.match_number()?,
                Some('"') => self.match_string()?,
                Some('[') => self.match_single(Token::StartArray),
                Some(']') => self.match_single(Token::EndArray),
                Some('{') => self.match_single(Token::StartObject),
                Some('}') => self.match_single(Token::EndObject),
                Some(',') => self.match_single(Token::Comma),
                Some(':') => self.match_single(Token::Colon),
                Some(c) if is_whitespace(c) => {
                    self.advance();
                    continue;
                }
                Some(c) if is_identifier_start(c) => self.match_identifier(),
                Some(c) => return lexer_error!(Details::InvalidCharacter(c), start),
            };
            trace!(token = %packed.0, start = packed.1.start.absolute, "lexed token");
            return Ok(packed);
        }
    }

    /// Turn the lexer into an iterator over all the tokens up to, but not including, the end
    /// of input. Iteration stops after the first error.
    pub fn tokens(self) -> Tokens<'a> {
        Tokens {
            lexer: self,
            finished: false,
        }
    }

    /// Consume a single character token
    fn match_single(&mut self, token: Token<'a>) -> PackedToken<'a> {
        let start = self.coords;
        self.advance();
        packed_token!(token, start, self.coords)
    }

    /// Byte offset of the cursor alongside its coordinates, marking the start of a run
    fn mark(&self) -> (usize, Coords) {
        (self.position, self.coords)
    }

    /// Consume a run of identifier characters. Only called when the current character is a
    /// valid identifier start.
    fn match_identifier(&mut self) -> PackedToken<'a> {
        let (offset, start) = self.mark();
        while self.current.map_or(false, is_identifier_part) {
            self.advance();
        }
        packed_token!(
            Token::Identifier(&self.source[offset..self.position]),
            start,
            self.coords
        )
    }

    /// Consume an optional leading minus followed by a run of digits. Fractions and exponents
    /// are not part of the grammar, so a '.' terminates the number and is left for the next
    /// call to reject.
    fn match_number(&mut self) -> ParserResult<PackedToken<'a>> {
        let (offset, start) = self.mark();
        if self.current == Some('-') {
            self.advance();
        }
        while self.current.map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.source[offset..self.position];
        match fast_float::parse::<f64, _>(text) {
            Ok(n) => Ok(packed_token!(Token::Num(n), start, self.coords)),
            Err(_) => lexer_error!(
                Details::InvalidNumericRepresentation(text.to_string()),
                start
            ),
        }
    }

    /// Consume a double quoted string, decoding escape sequences. Strings without escapes are
    /// borrowed from the source, anything else is copied into an owned buffer.
    fn match_string(&mut self) -> ParserResult<PackedToken<'a>> {
        let start = self.coords;
        self.advance();
        let offset = self.position;
        let mut owned: Option<String> = None;
        loop {
            match self.current {
                None => return lexer_error!(Details::UnterminatedString, start),
                Some('"') => break,
                Some('\\') => {
                    let buffer =
                        owned.get_or_insert_with(|| self.source[offset..self.position].to_string());
                    self.advance();
                    match self.current {
                        None => return lexer_error!(Details::UnterminatedString, start),
                        Some(c) => match unescape(c) {
                            Some(decoded) => buffer.push(decoded),
                            None => {
                                return lexer_error!(
                                    Details::InvalidEscapeSequence(c),
                                    self.coords
                                )
                            }
                        },
                    }
                }
                Some(c) => {
                    if let Some(buffer) = owned.as_mut() {
                        buffer.push(c);
                    }
                }
            }
            self.advance();
        }
        let value = match owned {
            Some(buffer) => Cow::Owned(buffer),
            None => Cow::Borrowed(&self.source[offset..self.position]),
        };
        // closing quote
        self.advance();
        Ok(packed_token!(Token::Str(value), start, self.coords))
    }
}

/// Iterator adapter produced by [Lexer::tokens]
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    finished: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = ParserResult<PackedToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.lexer.consume() {
            Ok((Token::EndOfInput, _)) => {
                self.finished = true;
                None
            }
            Ok(packed) => Some(Ok(packed)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

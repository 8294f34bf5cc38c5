//! Byte oriented input is decoded into text prior to lexing. The [DecoderSelector] implemented
//! within this module is used to instantiate new `char` iterators, based on different
//! encodings. (Currently only ASCII and UTF-8 are supported).
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::{BufRead, BufReader};

use crate::decoder_error;
use crate::errors::{Details, ParserResult};

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Utf8
    }
}

/// A struct that is essentially a factory for creating new instances of [char] iterators,
/// based on a specified encoding type
#[derive(Default)]
pub(crate) struct DecoderSelector {}

impl DecoderSelector {
    /// Create and return an instance of a given byte decoder / char iterator based on a specific
    /// encoding
    pub fn new_decoder<'a, Buffer: BufRead>(
        &'a self,
        buffer: &'a mut Buffer,
        encoding: Encoding,
    ) -> Box<dyn Iterator<Item = char> + 'a> {
        match encoding {
            Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
            Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
        }
    }

    /// Decode a complete byte buffer into a [String]. The decoders stop at the first byte
    /// sequence they cannot handle, so anything short of a full decode is reported as an error.
    pub fn decode(&self, bytes: &[u8], encoding: Encoding) -> ParserResult<String> {
        let mut reader = BufReader::new(bytes);
        let decoded: String = self.new_decoder(&mut reader, encoding).collect();
        if decoded.len() != bytes.len() {
            return decoder_error!(Details::InvalidEncodedInput);
        }
        Ok(decoded)
    }
}

//! Low-level byte-by-byte tokenizer.
//!
//! This module provides [ByteParser], an explicit position-indexed state
//! machine with support for peeking, consuming, and quote-aware label
//! parsing. It is the foundation of the Newick parser and knows nothing
//! about trees.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::{ParseError, ParseErrorKind};

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte tokenizer over a [ByteSource].
///
/// # Features
/// - Whitespace skipping
/// - Quote-aware label parsing (single quotes, `''` escapes a quote)
/// - Raw token parsing for numbers
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylograph::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  'Swamp hen'_NZ:0.5");
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_label(b":").unwrap(), "Swamp hen_NZ");
/// assert!(parser.consume_if(b':'));
/// assert_eq!(parser.parse_token(b",);"), "0.5");
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    ///
    /// # Arguments
    /// * `input` - The byte slice to parse
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive ASCII whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Sets the position in the byte stream.
    pub fn set_position(&mut self, pos: usize) {
        self.source.set_position(pos);
    }

    /// Returns up to `k` bytes from the current position as a string, for
    /// error context. Invalid UTF-8 is replaced.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(&self.source.get_context(k)).into_owned()
    }

    /// Parses a label made of unquoted and single-quoted segments.
    ///
    /// Segments are concatenated, so `'Swamp hen'_NZ` yields `Swamp hen_NZ`.
    /// Unquoted segments end at any of `delimiters` or at EOF; leading and
    /// trailing whitespace outside of quotes is dropped.
    ///
    /// # Arguments
    /// * `delimiters` - Bytes that end the label outside of quotes
    ///
    /// # Returns
    /// The parsed label, empty if no label is present
    ///
    /// # Errors
    /// [ParseErrorKind::UnterminatedQuote] if a quoted segment is not closed
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParseError> {
        self.skip_whitespace();

        let mut bytes = Vec::new();
        // Whitespace in front of this length was quoted and must stay
        let mut keep = 0;
        while let Some(b) = self.peek() {
            if b == b'\'' {
                self.parse_quoted_segment(&mut bytes)?;
                keep = bytes.len();
            } else if delimiters.contains(&b) {
                break;
            } else {
                bytes.push(b);
                self.next_byte();
            }
        }

        while bytes.len() > keep && bytes.last().is_some_and(u8::is_ascii_whitespace) {
            bytes.pop();
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parses a single-quoted segment and appends its content to `bytes`.
    /// Expects the parser at the opening quote.
    fn parse_quoted_segment(&mut self, bytes: &mut Vec<u8>) -> Result<(), ParseError> {
        let start = self.position();
        self.next_byte(); // opening '

        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    if self.consume_if(b'\'') {
                        bytes.push(b'\'');
                    } else {
                        return Ok(());
                    }
                }
                Some(b) => bytes.push(b),
                None => {
                    return Err(ParseError::at(ParseErrorKind::UnterminatedQuote, start, self));
                }
            }
        }
    }

    /// Parses a raw token up to any of `delimiters`, whitespace or EOF.
    /// No quoting is recognized.
    pub fn parse_token(&mut self, delimiters: &[u8]) -> String {
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Specifies whether to consume or leave the target when using `consume_until`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_label_stops_at_delimiter() {
        let mut parser = ByteParser::for_str("Pukeko ,Kea");
        assert_eq!(parser.parse_label(b",").unwrap(), "Pukeko");
        assert_eq!(parser.peek(), Some(b','));
    }

    #[test]
    fn test_quoted_label_keeps_delimiters_and_whitespace() {
        let mut parser = ByteParser::for_str("' Baillon''s (crake), ':1");
        assert_eq!(parser.parse_label(b":").unwrap(), " Baillon's (crake), ");
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn test_unterminated_quote() {
        let mut parser = ByteParser::for_str("(A,'B");
        parser.set_position(3);
        let err = parser.parse_label(b",)").unwrap_err();
        assert_eq!(err.kind(), &ParseErrorKind::UnterminatedQuote);
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn test_token_and_consume_until() {
        let mut parser = ByteParser::for_str("1.5e-3 [x]");
        assert_eq!(parser.parse_token(b",)"), "1.5e-3");
        parser.skip_whitespace();
        assert!(parser.consume_until(b']', ConsumeMode::Exclusive));
        assert_eq!(parser.position(), 9);
        assert!(parser.consume_until(b']', ConsumeMode::Inclusive));
        assert!(parser.is_eof());
        assert!(!parser.consume_until(b']', ConsumeMode::Inclusive));
    }
}

//! Error types for Newick parsing.
//!
//! This module provides [ParseError] and [ParseErrorKind] for representing
//! and reporting errors that occur while parsing Newick text.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSE ERROR KIND
// =#========================================================================$=
/// Error types that can occur during Newick parsing.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParseErrorKind {
    #[error("IO error - {0}")]
    Io(String),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Closing parenthesis without matching opening one")]
    UnmatchedClose,
    #[error("Missing label")]
    MissingLabel,
    #[error("Invalid edge weight '{0}'")]
    InvalidWeight(String),
    #[error("Unterminated edge label, expected ']'")]
    UnterminatedEdgeLabel,
    #[error("Unterminated quoted label")]
    UnterminatedQuote,
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unexpected text after final ';'")]
    TrailingGarbage,
}

// =#========================================================================#=
// PARSE ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and following bytes).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", context_suffix(.context))]
pub struct ParseError {
    kind: ParseErrorKind,
    position: usize,
    context: String,
}

impl ParseError {
    /// Create a ParseError from an error kind and parser state
    pub fn from_parser<S: ByteSource>(kind: ParseErrorKind, parser: &ByteParser<S>) -> Self {
        Self::at(kind, parser.position(), parser)
    }

    /// Create a ParseError for an earlier position of the parser
    pub fn at<S: ByteSource>(kind: ParseErrorKind, position: usize, parser: &ByteParser<S>) -> Self {
        Self {
            kind,
            position,
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEof
    pub fn unexpected_eof<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParseErrorKind::UnexpectedEof, parser)
    }

    /// Convenience constructor for UnexpectedCharacter at the current byte
    pub fn unexpected_character<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        match parser.peek() {
            Some(b) => Self::from_parser(ParseErrorKind::UnexpectedCharacter(b as char), parser),
            None => Self::unexpected_eof(parser),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Get the byte offset where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get up to 50 bytes of input following the error position
    pub fn context(&self) -> &str {
        &self.context
    }
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError {
            kind: ParseErrorKind::Io(err.to_string()),
            position: 0, // No position for IO errors
            context: String::new(),
        }
    }
}

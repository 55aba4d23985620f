//! Low-level parsing infrastructure.
//!
//! This module provides the byte tokenizer the Newick parser is built on,
//! the [ParseError] type, and label quoting helpers.

pub mod byte_parser;
pub mod byte_source;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::{ByteParser, ConsumeMode};
pub use byte_source::{ByteSource, InMemoryByteSource};
pub use parsing_error::{ParseError, ParseErrorKind};

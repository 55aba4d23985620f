use phylograph::parser::byte_parser::ConsumeMode::{Exclusive, Inclusive};
use phylograph::parser::byte_parser::ByteParser;
use phylograph::parser::byte_source::{ByteSource, InMemoryByteSource};
use phylograph::parser::ParseErrorKind;

#[test]
fn test_skip_whitespace() {
    let mut parser = ByteParser::for_str(" \r  \t\n \t x y");
    parser.skip_whitespace();
    assert_eq!(parser.peek(), Some(b'x'));

    parser.next_byte(); // skip x
    parser.skip_whitespace();
    assert_eq!(parser.peek(), Some(b'y'));
}

#[test]
fn test_consume_until_inclusive() {
    let mut parser = ByteParser::for_str("consume a CAN of beans");
    assert!(parser.consume_until(b'C', Inclusive));
    assert_eq!(parser.peek(), Some(b'A'));
    assert_eq!(parser.position(), 11);
}

#[test]
fn test_consume_until_exclusive() {
    let mut parser = ByteParser::for_str("consume a CAN of beans");
    assert!(parser.consume_until(b'C', Exclusive));
    assert_eq!(parser.peek(), Some(b'C'));
    assert_eq!(parser.position(), 10);

    assert!(!parser.consume_until(b'@', Exclusive));
    assert!(parser.is_eof());
}

#[test]
fn test_consume_if() {
    let mut parser = ByteParser::for_str("(A");
    assert!(!parser.consume_if(b'A'));
    assert!(parser.consume_if(b'('));
    assert!(parser.consume_if(b'A'));
    assert!(!parser.consume_if(b'A'));
}

// --- TESTS LABELS ---
#[test]
fn test_parse_unquoted_label() {
    let mut parser = ByteParser::for_str("  Porphyrio melanotus  :0.5");
    assert_eq!(parser.parse_label(b":").unwrap(), "Porphyrio melanotus");
    assert_eq!(parser.peek(), Some(b':'));
}

#[test]
fn test_parse_quoted_label() {
    let mut parser = ByteParser::for_str("'Porphyrio (Notornis) hochstetteri',");
    assert_eq!(parser.parse_label(b",").unwrap(), "Porphyrio (Notornis) hochstetteri");
    assert_eq!(parser.next_byte(), Some(b','));

    let mut parser = ByteParser::for_str("'It''s a takahe'");
    assert_eq!(parser.parse_label(b",").unwrap(), "It's a takahe");
    assert!(parser.is_eof());
}

#[test]
fn test_parse_concatenated_label() {
    let mut parser = ByteParser::for_str("'Swamp hen'_NZ'#2'#H1)");
    assert_eq!(parser.parse_label(b")").unwrap(), "Swamp hen_NZ#2#H1");
    assert_eq!(parser.peek(), Some(b')'));
}

#[test]
fn test_parse_empty_label() {
    let mut parser = ByteParser::for_str(",B");
    assert_eq!(parser.parse_label(b",").unwrap(), "");
    assert_eq!(parser.position(), 0);
}

#[test]
fn test_parse_unterminated_quote() {
    let mut parser = ByteParser::for_str("  'Kea,Kaka);");
    let err = parser.parse_label(b",);").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::UnterminatedQuote);
    assert_eq!(err.position(), 2);
}

#[test]
fn test_parse_token() {
    let mut parser = ByteParser::for_str("-2.5e-3,");
    assert_eq!(parser.parse_token(b",)"), "-2.5e-3");
    assert_eq!(parser.peek(), Some(b','));

    let mut parser = ByteParser::for_str("'1' 2");
    assert_eq!(parser.parse_token(b","), "'1'");
    assert_eq!(parser.peek(), Some(b' '));
}

// --- TESTS SOURCE & CONTEXT ---
#[test]
fn test_context_and_position() {
    let mut parser = ByteParser::for_str("((A,B),C);");
    parser.set_position(4);
    assert_eq!(parser.peek(), Some(b'B'));
    assert_eq!(parser.get_context_as_string(3), "B),");
    assert_eq!(parser.get_context_as_string(100), "B),C);");
}

#[test]
fn test_in_memory_source() {
    let mut source = InMemoryByteSource::from_vec(b"ab".to_vec());
    assert_eq!(source.peek_slice(5), b"ab");
    assert_eq!(source.next_byte(), Some(b'a'));
    assert_eq!(source.position(), 1);
    assert_eq!(source.next_byte(), Some(b'b'));
    assert!(source.is_eof());
    assert_eq!(source.next_byte(), None);
    assert_eq!(source.get_context(3), Vec::<u8>::new());
}

use std::io::{self, BufReader, Read};

use crate::source::*;

#[test]
fn read_chars() {
    let source = source_from_text("ab\ncd");
    let chars: String = source.collect();
    assert_eq!(chars, "ab\ncd");
}

#[test]
fn normalize_crlf() {
    let source = source_from_text("a\r\nb\rc");
    let chars: String = source.collect();
    assert_eq!(chars, "a\nb\rc");
}

#[test]
fn peek_does_not_consume() {
    let mut source = source_from_text("xy");
    assert_eq!(source.peek(), Some(&'x'));
    assert_eq!(source.peek(), Some(&'x'));
    assert_eq!(source.next(), Some('x'));
    assert_eq!(source.next_if(|c| *c == 'z'), None);
    assert_eq!(source.next_if(|c| *c == 'y'), Some('y'));
    assert_eq!(source.peek(), None);
    assert_eq!(source.next(), None);
}

#[test]
fn track_location() {
    let mut source = source_from_text("ab\ncd\n");
    source.next();
    assert_eq!(source.location(), Location::new(1, 1));
    source.next();
    source.next();
    assert_eq!(source.location(), Location::new(1, 3));
    source.next();
    assert_eq!(source.location(), Location::new(2, 1));
    assert_eq!(source.get_line(1), Some("ab\n"));
    assert_eq!(source.get_line(2), Some("cd\n"));
    assert_eq!(source.get_line(3), None);
}

#[test]
fn next_location_of_empty_source() {
    let mut source = source_from_text("");
    assert_eq!(source.next(), None);
    assert_eq!(source.next_location(), Location::new(1, 1));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

#[test]
fn read_error_ends_stream() {
    let reader: BufReader<FailingReader> = BufReader::new(FailingReader);
    let mut source = Source::new(reader);
    assert_eq!(source.next(), None);
    let err = source.take_error();
    assert!(err.is_some());
    assert_eq!(err.unwrap().to_string(), "disk on fire");
    assert!(source.take_error().is_none());
}

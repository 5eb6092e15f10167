use std::io::{self, Read};

use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorClass;

/// Helper: tokenize bytes to completion, returning pairs and the error (if any).
fn run(source: &[u8]) -> (Vec<Pair>, Option<ScanError>) {
    run_with(source, ScanConfig::default())
}

fn run_with(source: &[u8], config: ScanConfig) -> (Vec<Pair>, Option<ScanError>) {
    let mut tok = Tokenizer::with_config(InputSource::buffer(source), config);
    let mut pairs = Vec::new();
    loop {
        match tok.next_pair() {
            Ok(Some(pair)) => pairs.push(pair),
            Ok(None) => return (pairs, None),
            Err(e) => return (pairs, Some(e)),
        }
    }
}

/// Helper: tokenize and require success.
fn pairs(source: &str) -> Vec<(String, String)> {
    let (pairs, err) = run(source.as_bytes());
    assert!(err.is_none(), "unexpected error for {source:?}: {err:?}");
    pairs
        .into_iter()
        .map(|p| {
            let value = p.value_lossy().into_owned();
            (p.name, value)
        })
        .collect()
}

fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_owned(), value.to_owned())
}

/// Helper: tokenize and require an error, returning it.
fn error(source: &str) -> ScanError {
    run(source.as_bytes())
        .1
        .unwrap_or_else(|| panic!("expected an error for {source:?}"))
}

// === Basic Assignments ===

#[test]
fn single_assignment() {
    assert_eq!(pairs("NAME=VALUE\n"), vec![pair("NAME", "VALUE")]);
}

#[test]
fn several_assignments() {
    assert_eq!(
        pairs("A=1\nB=2\nC=3\n"),
        vec![pair("A", "1"), pair("B", "2"), pair("C", "3")]
    );
}

#[test]
fn assignments_separated_by_spaces_on_one_line() {
    assert_eq!(pairs("A=1 B=2\tC=3\n"), vec![pair("A", "1"), pair("B", "2"), pair("C", "3")]);
}

#[test]
fn alphanumeric_names() {
    assert_eq!(pairs("abc123=x\n"), vec![pair("abc123", "x")]);
}

#[test]
fn empty_value() {
    assert_eq!(pairs("EMPTY=\n"), vec![pair("EMPTY", "")]);
}

#[test]
fn value_keeps_equals_and_hash() {
    assert_eq!(pairs("URL=a=b#c\n"), vec![pair("URL", "a=b#c")]);
}

#[test]
fn crlf_line_endings_terminate_values() {
    assert_eq!(pairs("A=1\r\nB=2\r\n"), vec![pair("A", "1"), pair("B", "2")]);
}

// === Whitespace & Comments ===

#[test]
fn empty_input_is_done() {
    assert_eq!(pairs(""), vec![]);
}

#[test]
fn blank_and_whitespace_lines_produce_nothing() {
    assert_eq!(pairs("\n\n   \n\t\n"), vec![]);
    assert_eq!(pairs("\n  \nX=1\n\n \t\nY=2\n\n"), vec![pair("X", "1"), pair("Y", "2")]);
}

#[test]
fn comment_line_is_discarded() {
    assert_eq!(pairs("# comment\nX=1\n"), vec![pair("X", "1")]);
}

#[test]
fn comment_content_is_ignored() {
    assert_eq!(
        pairs("# A=1 \"unclosed 'quote \\ # again\nX=1\n"),
        vec![pair("X", "1")]
    );
}

#[test]
fn comment_after_assignment() {
    assert_eq!(pairs("X=1 # trailing\nY=2\n"), vec![pair("X", "1"), pair("Y", "2")]);
}

#[test]
fn comment_at_end_without_newline_is_done() {
    assert_eq!(pairs("X=1\n# last"), vec![pair("X", "1")]);
}

#[test]
fn hash_inside_name_position_after_space_starts_comment() {
    assert_eq!(pairs("  #x\n"), vec![]);
}

// === Quoting ===

#[test]
fn double_quotes_preserve_spaces() {
    assert_eq!(pairs("X=\"a b\"\n"), vec![pair("X", "a b")]);
}

#[test]
fn single_quote_literal_inside_double_quotes() {
    assert_eq!(pairs("X=\"a'b\"\n"), vec![pair("X", "a'b")]);
}

#[test]
fn double_quote_literal_inside_single_quotes() {
    assert_eq!(pairs("X='a\"b'\n"), vec![pair("X", "a\"b")]);
}

#[test]
fn quoted_spans_keep_everything_literal() {
    assert_eq!(
        pairs("X='# = \\ \t'\n"),
        vec![pair("X", "# = \\ \t")]
    );
}

#[test]
fn quoted_span_may_contain_newlines() {
    assert_eq!(pairs("X=\"line1\nline2\"\n"), vec![pair("X", "line1\nline2")]);
}

#[test]
fn quoted_and_unquoted_segments_concatenate() {
    assert_eq!(pairs("X=pre\"mid dle\"'post'fix\n"), vec![pair("X", "premid dlepostfix")]);
}

#[test]
fn empty_quotes_give_empty_value() {
    assert_eq!(pairs("X=\"\"\nY=''\n"), vec![pair("X", ""), pair("Y", "")]);
}

// === Escapes ===

#[test]
fn escaped_space_is_literal() {
    assert_eq!(pairs("X=a\\ b\n"), vec![pair("X", "a b")]);
}

#[test]
fn escaped_quote_is_literal() {
    assert_eq!(pairs("X=\\\"q\n"), vec![pair("X", "\"q")]);
}

#[test]
fn escaped_backslash() {
    assert_eq!(pairs("X=a\\\\b\n"), vec![pair("X", "a\\b")]);
}

#[test]
fn backslash_newline_is_line_continuation() {
    assert_eq!(pairs("X=a\\\nb\n"), vec![pair("X", "ab")]);
}

#[test]
fn line_continuation_alone() {
    assert_eq!(pairs("X=a\\\n\n"), vec![pair("X", "a")]);
}

#[test]
fn escape_is_not_special_inside_quotes() {
    assert_eq!(pairs("X=\"a\\\"\n"), vec![pair("X", "a\\")]);
}

// === Syntax Errors ===

#[test]
fn digit_at_name_start_is_syntax_error() {
    let err = error("1X=2\n");
    assert_eq!(err.class(), ErrorClass::Syntax);
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedByte { byte: b'1' }));
    assert_eq!(err.state(), ScanState::Divider);
}

#[test]
fn symbol_at_name_start_is_syntax_error() {
    for source in ["=x\n", "_X=1\n", "-X=1\n", "\"X\"=1\n"] {
        assert_eq!(error(source).class(), ErrorClass::Syntax, "{source:?}");
    }
}

#[test]
fn non_alnum_in_name_is_syntax_error() {
    let err = error("MY_VAR=1\n");
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedByte { byte: b'_' }));
    assert_eq!(err.state(), ScanState::VarName);
}

#[test]
fn name_without_equals_is_syntax_error() {
    let err = error("FOO\n");
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedByte { byte: b'\n' }));
}

#[test]
fn whitespace_around_equals_is_rejected() {
    let (pairs, err) = run(b"# demo\nFOO=bar\nBAZ = 'hi there'\n");
    assert_eq!(pairs, vec![Pair::new("FOO", "bar")]);
    let err = err.expect("syntax error");
    assert_eq!(err.class(), ErrorClass::Syntax);
    assert_eq!(
        err.position(),
        Position {
            offset: 18,
            line: 3,
            column: 4,
        }
    );
}

#[test]
fn non_ascii_at_name_start_is_rejected() {
    let err = error("é=1\n");
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedByte { byte: 0xC3 }));
}

#[test]
fn non_ascii_bytes_are_kept_in_values() {
    assert_eq!(pairs("X=héllo\n"), vec![pair("X", "héllo")]);
}

#[test]
fn pairs_before_error_are_kept() {
    let (pairs, err) = run(b"A=1\nB=2\n3=C\n");
    assert_eq!(pairs, vec![Pair::new("A", "1"), Pair::new("B", "2")]);
    assert!(err.is_some());
}

#[test]
fn tokenizer_is_finished_after_error() {
    let mut tok = Tokenizer::from_bytes(b"!\nA=1\n");
    assert!(tok.next_pair().is_err());
    assert!(tok.is_finished());
    assert!(matches!(tok.next_pair(), Ok(None)));
}

// === End of Input ===

#[test]
fn trailing_value_without_newline_is_emitted_by_default() {
    assert_eq!(pairs("A=1\nB=2"), vec![pair("A", "1"), pair("B", "2")]);
}

#[test]
fn trailing_value_is_rejected_with_strict_policy() {
    let config = ScanConfig::default().with_eof_policy(EofPolicy::Reject);
    let (pairs, err) = run_with(b"A=1\nB=2", config);
    assert_eq!(pairs, vec![Pair::new("A", "1")]);
    let err = err.expect("eof error");
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedEof));
    assert_eq!(err.class(), ErrorClass::Stream);
    assert_eq!(err.state(), ScanState::ValueBase);
}

#[test]
fn strict_policy_accepts_terminated_input() {
    let config = ScanConfig::default().with_eof_policy(EofPolicy::Reject);
    let (pairs, err) = run_with(b"A=1\n# done", config);
    assert_eq!(pairs, vec![Pair::new("A", "1")]);
    assert!(err.is_none());
}

#[test]
fn trailing_empty_value_is_emitted() {
    assert_eq!(pairs("A="), vec![pair("A", "")]);
}

#[test]
fn eof_inside_name_is_stream_error() {
    let err = error("ABC");
    assert!(matches!(err.kind(), ScanErrorKind::UnexpectedEof));
    assert_eq!(err.state(), ScanState::VarName);
}

#[test]
fn eof_inside_quotes_is_stream_error() {
    let err = error("A=\"open");
    assert_eq!(err.state(), ScanState::ValueQuoted1);
    let err = error("A='open");
    assert_eq!(err.state(), ScanState::ValueQuoted2);
    assert_eq!(err.class(), ErrorClass::Stream);
}

#[test]
fn eof_after_backslash_is_stream_error() {
    let err = error("A=x\\");
    assert_eq!(err.state(), ScanState::ValueEscape);
    assert_eq!(
        err.position(),
        Position {
            offset: 4,
            line: 1,
            column: 5,
        }
    );
}

// === Token Length Limit ===

#[test]
fn oversized_value_is_out_of_memory() {
    let config = ScanConfig::default().with_max_token_len(4);
    let (pairs, err) = run_with(b"A=1234\nB=12345\n", config);
    assert_eq!(pairs, vec![Pair::new("A", "1234")]);
    let err = err.expect("limit error");
    assert_eq!(err.class(), ErrorClass::OutOfMemory);
    assert!(matches!(
        err.kind(),
        ScanErrorKind::OutOfMemory {
            requested: 5,
            limit: Some(4),
        }
    ));
    assert_eq!(err.position().column, 7);
}

#[test]
fn oversized_name_is_out_of_memory() {
    let config = ScanConfig::default().with_max_token_len(3);
    let (_, err) = run_with(b"ABCD=1\n", config);
    let err = err.expect("limit error");
    assert_eq!(err.class(), ErrorClass::OutOfMemory);
    assert_eq!(err.state(), ScanState::VarName);
}

#[test]
fn oversized_quoted_run_reports_exact_byte() {
    let config = ScanConfig::default().with_max_token_len(3);
    let (_, err) = run_with(b"A=\"abcdef\"\n", config);
    let err = err.expect("limit error");
    assert_eq!(err.state(), ScanState::ValueQuoted1);
    // `d` is the fourth value byte, at column 7.
    assert_eq!(err.position().column, 7);
}

#[test]
fn long_quoted_span_over_limit_stops_at_limit() {
    const LIMIT: usize = 1 << 20;
    let mut source = b"X=\"".to_vec();
    source.resize(source.len() + 4 * LIMIT, b'a');
    source.extend_from_slice(b"\"\n");

    let mut machine = Machine::new(&ScanConfig::default().with_max_token_len(LIMIT));
    let (consumed, feed) = machine.feed(&source);

    // One bulk copy fills the buffer to the limit; the next byte is refused.
    assert_eq!(machine.value.len(), LIMIT);
    assert_eq!(consumed, 3 + LIMIT);
    let Feed::Fail(kind, position) = feed else {
        panic!("expected the limit to be hit");
    };
    assert!(matches!(
        kind,
        ScanErrorKind::OutOfMemory {
            requested,
            limit: Some(LIMIT),
        } if requested == LIMIT + 1
    ));
    assert_eq!(position.offset, (3 + LIMIT) as u64);
    assert_eq!(position.column as usize, 4 + LIMIT);
}

#[test]
fn quoted_span_partly_filled_before_limit() {
    let config = ScanConfig::default().with_max_token_len(5);
    let (_, err) = run_with(b"A=ab\"cdefgh\"\n", config);
    let err = err.expect("limit error");
    assert_eq!(err.state(), ScanState::ValueQuoted1);
    // `f` would be the sixth value byte, at column 9.
    assert_eq!(err.position().column, 9);
}

#[test]
fn buffers_reset_between_pairs_under_limit() {
    let config = ScanConfig::default().with_max_token_len(3);
    let (pairs, err) = run_with(b"A=abc\nB=def\nC=ghi\n", config);
    assert!(err.is_none());
    assert_eq!(pairs.len(), 3);
}

// === Streaming ===

/// Reader that hands out one byte per `read` call.
struct OneByte<'a>(&'a [u8]);

impl Read for OneByte<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&b, rest)), Some(slot)) => {
                *slot = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn stream_source_matches_buffer_source() {
    let source = b"# hdr\nA=1 B=\"x y\"\nC='q\"q' D=a\\\nb E=z\\ w\nF=end";
    let buffered: Vec<_> = Tokenizer::from_bytes(source)
        .collect::<Result<_, _>>()
        .unwrap();
    let streamed: Vec<_> = Tokenizer::from_reader(OneByte(source))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(buffered, streamed);
    assert_eq!(buffered.len(), 6);
}

#[test]
fn chunk_boundary_inside_quoted_span() {
    let source = b"X=\"abc def\"\n";
    for cap in 1..source.len() {
        let mut tok = Tokenizer::new(InputSource::stream_with_capacity(&source[..], cap));
        assert_eq!(
            tok.next_pair().unwrap(),
            Some(Pair::new("X", "abc def")),
            "chunk size {cap}"
        );
    }
}

/// Reader that yields some bytes, then fails.
struct FailAfter<'a>(&'a [u8]);

impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::other("link down"));
        }
        let n = self.0.read(buf)?;
        Ok(n)
    }
}

#[test]
fn read_failure_between_pairs_is_stream_error_at_boundary() {
    let mut tok = Tokenizer::from_reader(FailAfter(b"A=1\n"));
    assert_eq!(tok.next_pair().unwrap(), Some(Pair::new("A", "1")));
    let err = tok.next_pair().unwrap_err();
    assert!(matches!(err.kind(), ScanErrorKind::Io(_)));
    assert_eq!(err.class(), ErrorClass::Stream);
    assert!(err.state().is_boundary());
}

#[test]
fn read_failure_mid_value_is_not_at_boundary() {
    let mut tok = Tokenizer::from_reader(FailAfter(b"A=1"));
    let err = tok.next_pair().unwrap_err();
    assert_eq!(err.state(), ScanState::ValueBase);
}

// === Driver Behaviour ===

/// Reader that yields its bytes, reports end of input once, then fails.
struct EofOnce<'a> {
    bytes: &'a [u8],
    eof_seen: bool,
}

impl Read for EofOnce<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.eof_seen {
            return Err(io::Error::other("read after end of input"));
        }
        let n = self.bytes.read(buf)?;
        if n == 0 {
            self.eof_seen = true;
        }
        Ok(n)
    }
}

#[test]
fn trailing_pair_at_end_of_input_does_not_read_again() {
    let mut tok = Tokenizer::from_reader(EofOnce {
        bytes: b"A=1\nB=2",
        eof_seen: false,
    });
    assert_eq!(tok.next_pair().unwrap(), Some(Pair::new("A", "1")));
    assert_eq!(tok.next_pair().unwrap(), Some(Pair::new("B", "2")));
    assert!(tok.is_finished());
    assert_eq!(tok.next_pair().unwrap(), None);
}

#[test]
fn iterator_is_fused_after_done() {
    let mut tok = Tokenizer::from_bytes(b"A=1\n");
    assert!(tok.next().is_some());
    assert!(tok.next().is_none());
    assert!(tok.next().is_none());
    assert!(tok.is_finished());
}

#[test]
fn idempotent_over_identical_input() {
    let source = b"A=1\nB='two'\n# c\nC=\"3 3\"\n";
    let first: Vec<_> = Tokenizer::from_bytes(source).map(Result::unwrap).collect();
    let second: Vec<_> = Tokenizer::from_bytes(source).map(Result::unwrap).collect();
    assert_eq!(first, second);
}

#[test]
fn state_and_position_are_observable_between_calls() {
    let mut tok = Tokenizer::from_bytes(b"A=1\nB=2\n");
    assert_eq!(tok.state(), ScanState::Divider);
    tok.next_pair().unwrap();
    assert_eq!(tok.state(), ScanState::Divider);
    assert_eq!(
        tok.position(),
        Position {
            offset: 4,
            line: 2,
            column: 1,
        }
    );
}

#[test]
fn pair_value_accessors() {
    let utf8 = Pair::new("A", "héllo");
    assert_eq!(utf8.value_str(), Some("héllo"));
    let raw = Pair::new("B", vec![0xFF, b'x']);
    assert_eq!(raw.value_str(), None);
    assert_eq!(raw.value_lossy(), "\u{FFFD}x");
}

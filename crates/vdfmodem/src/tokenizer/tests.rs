use alloc::{string::String, vec, vec::Vec};

use rstest::rstest;

use super::*;
use crate::tokenize_str;

fn key(s: &str) -> Token {
    Token::Key(s.into())
}

fn val(s: &str) -> Token {
    Token::Value(s.into())
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParserError> {
    tokenize_str(input, ParserOptions::default())
}

fn tokenize_err(input: &str) -> ParserError {
    tokenize(input).expect_err("input should be rejected")
}

fn char_by_char(input: &str, options: ParserOptions) -> Result<Vec<Token>, ParserError> {
    let mut tokenizer = Tokenizer::new(options);
    let mut tokens = Vec::new();
    for c in input.chars() {
        tokens.extend(tokenizer.ingest_char(c)?);
    }
    tokens.extend(tokenizer.flush()?);
    Ok(tokens)
}

#[test]
fn quoted_and_unquoted_pairs_agree() {
    let expected = vec![key("a"), val("b")];
    assert_eq!(tokenize(r#""a" "b""#).unwrap(), expected);
    assert_eq!(tokenize("a b").unwrap(), expected);
}

#[rstest]
#[case(r#""a"   "b""#)]
#[case("\"a\"\t\"b\"")]
#[case("\n\n  \"a\"\n\t\"b\"\n  ")]
#[case("a\n b \n")]
fn whitespace_is_insignificant(#[case] input: &str) {
    assert_eq!(tokenize(input).unwrap(), vec![key("a"), val("b")]);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize(" \n\t// only a comment").unwrap().is_empty());
}

#[test]
fn nested_blocks() {
    let tokens = tokenize(r#""root" { "k" "v" sub { } key{ a b} }"#).unwrap();
    assert_eq!(
        tokens,
        vec![
            key("root"),
            Token::NestStart,
            key("k"),
            val("v"),
            key("sub"),
            Token::NestStart,
            Token::NestEnd,
            key("key"),
            Token::NestStart,
            key("a"),
            val("b"),
            Token::NestEnd,
            Token::NestEnd,
        ]
    );
}

#[test]
fn structural_characters_are_literal_inside_quotes() {
    let tokens = tokenize("\"{k}\" \"a b\n// c\"").unwrap();
    assert_eq!(tokens, vec![key("{k}"), val("a b\n// c")]);
}

#[test]
fn quote_ends_unquoted_token() {
    assert_eq!(
        tokenize(r#"key"value""#).unwrap(),
        vec![key("key"), val("value")]
    );
}

#[test]
fn escape_law() {
    let tokens = tokenize(r#""k" "a\\b\"c\nd\te""#).unwrap();
    assert_eq!(tokens, vec![key("k"), val(r#"a\b"c\nd\te"#)]);
}

#[test]
fn escaped_quote_in_key() {
    let tokens = tokenize(r#""say \"hi\"" "ok""#).unwrap();
    assert_eq!(tokens, vec![key(r#"say "hi""#), val("ok")]);
}

#[test]
fn unknown_escape_is_an_error_by_default() {
    let err = tokenize_err(r#""k" "\q""#);
    assert_eq!(err.kind(), &SyntaxError::UnsupportedEscapeSequence('q'));
    assert_eq!(err.position(), Some(Position { line: 0, column: 6 }));
}

#[test]
fn unknown_escape_passthrough() {
    let options = ParserOptions {
        unknown_escapes: UnknownEscapeMode::Passthrough,
        ..Default::default()
    };
    let tokens = tokenize_str(r#""k" "\q\\""#, options).unwrap();
    assert_eq!(tokens, vec![key("k"), val(r"\q\")]);
}

#[test]
fn disabled_escapes_are_ordinary_characters() {
    let options = ParserOptions {
        disable_escape: true,
        ..Default::default()
    };
    let tokens = tokenize_str(r#""k" "a\" b c\d"#, options).unwrap();
    assert_eq!(tokens, vec![key("k"), val(r"a\"), key("b"), val(r"c\d")]);
}

#[rstest]
#[case::after_key(r"a \b")]
#[case::unquoted_value(r"a b\c")]
#[case::unquoted_key(r"a\b c")]
#[case::after_value_at_end(r#""a" "b" \"#)]
fn escape_outside_quote(#[case] input: &str) {
    assert_eq!(tokenize_err(input).kind(), &SyntaxError::EscapeOutsideQuote);
}

#[rstest]
#[case::in_value(r#""a" "b\"#)]
#[case::in_key(r#""a\"#)]
fn escape_at_end_of_input(#[case] input: &str) {
    assert_eq!(tokenize_err(input).kind(), &SyntaxError::NoCharacterToEscape);
}

#[test]
fn comment_hides_structural_characters() {
    assert_eq!(
        tokenize(r#"key value // trailing {} "x""#).unwrap(),
        vec![key("key"), val("value")]
    );
}

#[test]
fn comments_between_tokens() {
    let input = "// header { }\n\"a\" \"b\" // trailing\n\"c\" // between key and value\n\"d\"\n";
    assert_eq!(
        tokenize(input).unwrap(),
        vec![key("a"), val("b"), key("c"), val("d")]
    );
}

#[test]
fn slashes_inside_unquoted_tokens_are_literal() {
    assert_eq!(
        tokenize("url http://example.com/x\n/a b").unwrap(),
        vec![key("url"), val("http://example.com/x"), key("/a"), val("b")]
    );
}

#[test]
fn comment_after_key_still_needs_a_value() {
    let err = tokenize_err("\"a\" // c\n}");
    assert_eq!(err.kind(), &SyntaxError::CloseBracketAfterKey);
    assert_eq!(err.position(), Some(Position { line: 1, column: 0 }));
}

#[rstest]
#[case::extra_close("key {}}", SyntaxError::TooManyBrackets)]
#[case::close_at_top(r#""k" "v"}"#, SyntaxError::TooManyBrackets)]
#[case::open_after_value(r#""key" value{"#, SyntaxError::OpenBracketAfterValue)]
#[case::open_after_quoted_value(r#""key" "value" {"#, SyntaxError::OpenBracketAfterValue)]
#[case::close_after_key(r#""key" }"#, SyntaxError::CloseBracketAfterKey)]
#[case::close_after_unquoted_key("a { key}", SyntaxError::CloseBracketAfterKey)]
#[case::dangling_key(r#""a""#, SyntaxError::UnexpectedEndOfInput)]
#[case::dangling_unquoted_key("a", SyntaxError::UnexpectedEndOfInput)]
#[case::open_block(r#""a" {"#, SyntaxError::UnexpectedEndOfInput)]
#[case::open_quote(r#""a" "b"#, SyntaxError::UnexpectedEndOfInput)]
fn rejected_inputs(#[case] input: &str, #[case] expected: SyntaxError) {
    assert_eq!(tokenize_err(input).kind(), &expected);
    assert_eq!(
        char_by_char(input, ParserOptions::default()).unwrap_err().kind(),
        &expected
    );
}

#[test]
fn error_position_is_zero_based() {
    let err = tokenize_err(r#""key" value{"#);
    assert_eq!(err.position(), Some(Position { line: 0, column: 11 }));

    let err = tokenize_err("\"a\" \"b\"\n\"c\" {\n}}");
    assert_eq!(err.kind(), &SyntaxError::TooManyBrackets);
    assert_eq!(err.position(), Some(Position { line: 2, column: 1 }));
}

#[test]
fn carriage_returns_do_not_move_the_position() {
    let err = tokenize_err("\u{FEFF}\"a\" \"b\"\r\n\"c\" {\r\n}}");
    assert_eq!(err.position(), Some(Position { line: 2, column: 1 }));
}

#[test]
fn error_context_is_the_trailing_window() {
    let options = ParserOptions {
        debug_buffer_size: 4,
        ..Default::default()
    };
    let err = tokenize_str(r#""key" value{"#, options).unwrap_err();
    let location = err.location().unwrap();
    assert_eq!(location.context, "lue{");
}

#[test]
fn untracked_errors_have_no_location() {
    let options = ParserOptions {
        track_position: false,
        ..Default::default()
    };
    let err = tokenize_str("key {}}", options).unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::TooManyBrackets);
    assert!(err.location().is_none());
}

#[test]
fn bom_and_carriage_returns_are_ignored() {
    assert_eq!(
        tokenize("\u{FEFF}\"a\"\r\n\"b\"\r\n").unwrap(),
        vec![key("a"), val("b")]
    );
    // A dropped character never separates the halves of a comment marker.
    assert_eq!(tokenize("a b /\r/ c").unwrap(), vec![key("a"), val("b")]);
}

#[test]
fn first_character_is_only_buffered() {
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    assert!(tokenizer.ingest_char('"').unwrap().is_empty());
    assert!(tokenizer.ingest_char('a').unwrap().is_empty());
    assert!(tokenizer.ingest_char('"').unwrap().is_empty());
    // The closing quote resolves once the next character arrives.
    assert_eq!(tokenizer.ingest_char(' ').unwrap().as_slice(), &[key("a")]);
    for c in "\"b\"".chars() {
        assert!(tokenizer.ingest_char(c).unwrap().is_empty());
    }
    assert_eq!(tokenizer.flush().unwrap().as_slice(), &[val("b")]);
}

#[test]
fn depth_tracks_open_blocks() {
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    let tokens: Vec<_> = tokenizer
        .feed("a { b { c d } ")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tokens.len(), 7);
    let structural = tokens.iter().filter(|t| t.is_structural()).count();
    assert_eq!(structural, 3);
    assert_eq!(tokenizer.depth(), 1);
    tokenizer.feed("}").for_each(drop);
    tokenizer.flush().unwrap();
    assert_eq!(tokenizer.depth(), 0);
    assert!(tokenizer.is_flushed());
}

#[test]
fn ingestion_after_flush_is_malformed() {
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    tokenizer.feed("a b").for_each(drop);
    tokenizer.flush().unwrap();
    let err = tokenizer.ingest_char('c').unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::MalformedIngestion);
    let err = tokenizer.flush().unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::MalformedIngestion);
}

#[test]
fn errors_are_sticky_until_reset() {
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    let first = tokenizer
        .feed(r#""k" "\q" "x" "y""#)
        .find_map(Result::err)
        .unwrap();
    assert_eq!(tokenizer.ingest_char(' ').unwrap_err(), first);
    assert_eq!(tokenizer.flush().unwrap_err(), first);
    assert_eq!(tokenizer.feed("a").next(), Some(Err(first)));

    tokenizer.reset();
    assert_eq!(tokenizer.state(), TokenizerState::AfterValue);
    assert_eq!(tokenizer.position(), Position::default());
    tokenizer.feed("a b").for_each(drop);
    assert!(tokenizer.flush().is_ok());
}

#[test]
fn dropped_feed_resumes_where_it_stopped() {
    let input = r#""a" "b" "c" { "d" "e" }"#;
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    let mut tokens = Vec::new();

    let mut feed = tokenizer.feed(input);
    tokens.push(feed.next().unwrap().unwrap());
    drop(feed);
    assert_eq!(tokens, vec![key("a")]);

    let mut feed = tokenizer.feed("");
    tokens.push(feed.next().unwrap().unwrap());
    drop(feed);

    tokens.extend(tokenizer.feed(" \"f\" ").map(Result::unwrap));
    tokens.extend(tokenizer.feed("\"g\"").map(Result::unwrap));
    tokens.extend(tokenizer.flush().unwrap());

    let mut whole = tokenize(input).unwrap();
    whole.extend([key("f"), val("g")]);
    assert_eq!(tokens, whole);
}

#[test]
fn chunks_split_anywhere_give_the_same_tokens() {
    let input = "\u{FEFF}\"root\"\r\n{\n\t\"k\\\\\" \"v\\\"\" // c\n\tsub { x y }\n}\n";
    let whole = tokenize(input).unwrap();
    assert_eq!(char_by_char(input, ParserOptions::default()).unwrap(), whole);

    let chars: Vec<char> = input.chars().collect();
    for split in 0..=chars.len() {
        let (head, tail): (String, String) = (
            chars[..split].iter().collect(),
            chars[split..].iter().collect(),
        );
        let mut tokenizer = Tokenizer::new(ParserOptions::default());
        let mut tokens: Vec<Token> = tokenizer.feed(&head).map(Result::unwrap).collect();
        tokens.extend(tokenizer.feed(&tail).map(Result::unwrap));
        tokens.extend(tokenizer.flush().unwrap());
        assert_eq!(tokens, whole, "split at {split}");
    }
}

#[test]
#[should_panic(expected = "closing bracket without a matching open block")]
fn panic_on_error_panics() {
    let options = ParserOptions {
        panic_on_error: true,
        ..Default::default()
    };
    let _ = tokenize_str("}", options);
}

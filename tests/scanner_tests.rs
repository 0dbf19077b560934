// tests/scanner_tests.rs

use rstest::rstest;
use vally::ast::TokenKind;
use vally::scanner::Scanner;

/// Scans `input` up to, but excluding, the end-of-input token.
fn scan_all(input: &str) -> Vec<(TokenKind, String)> {
    Scanner::new(input)
        .take_while(|t| !t.is_eof())
        .map(|t| (t.kind, t.literal))
        .collect()
}

// ============================================================================
// Single Tokens
// ============================================================================

#[rstest]
#[case::lparen("(", TokenKind::LParen, "(")]
#[case::rparen(")", TokenKind::RParen, ")")]
#[case::comma(",", TokenKind::Comma, ",")]
#[case::not("!", TokenKind::Not, "!")]
#[case::and("&&", TokenKind::And, "&&")]
#[case::or("||", TokenKind::Or, "||")]
#[case::string("'GB'", TokenKind::String, "GB")]
#[case::empty_string("''", TokenKind::String, "")]
#[case::string_with_spaces("'New York'", TokenKind::String, "New York")]
#[case::field_ref(".Country", TokenKind::FieldRef, ".Country")]
#[case::nested_field_ref(".Address.City", TokenKind::FieldRef, ".Address.City")]
#[case::snake_field_ref(".address_line1", TokenKind::FieldRef, ".address_line1")]
#[case::underscore_field_ref("._id", TokenKind::FieldRef, "._id")]
#[case::ident("required", TokenKind::Ident, "required")]
#[case::ident_with_digits("isbn10", TokenKind::Ident, "isbn10")]
#[case::ident_with_underscore("one_of", TokenKind::Ident, "one_of")]
#[case::integer("1234", TokenKind::Integer, "1234")]
#[case::zero("0", TokenKind::Integer, "0")]
#[case::negative_integer("-12", TokenKind::Integer, "-12")]
#[case::positive_integer("+7", TokenKind::Integer, "+7")]
#[case::float("1.5", TokenKind::Float, "1.5")]
#[case::zero_float("0.25", TokenKind::Float, "0.25")]
#[case::negative_float("-0.5", TokenKind::Float, "-0.5")]
fn test_single_token(#[case] input: &str, #[case] kind: TokenKind, #[case] literal: &str) {
    assert_eq!(scan_all(input), vec![(kind, literal.to_string())]);
}

// ============================================================================
// Illegal Input
// ============================================================================

#[rstest]
#[case::lone_ampersand("&")]
#[case::mixed_and("&|")]
#[case::lone_pipe("| ")]
#[case::unterminated_string("'abc")]
#[case::tab_in_string("'a\tb'")]
#[case::newline_in_string("'a\nb'")]
#[case::line_feed("\n")]
#[case::carriage_return("\r")]
#[case::multiple_decimal_points("1.2.3")]
#[case::leading_zero("012")]
#[case::signed_leading_zero("-012")]
#[case::sign_not_first("1-2")]
#[case::double_sign("--1")]
#[case::letter_in_number("12a")]
#[case::unknown_character("$")]
#[case::uppercase_ident("Required()")]
#[case::bad_field_ref(".Na-me")]
#[case::digit_field_ref(".5")]
#[case::bare_dot(".")]
#[case::dot_before_comma(".,")]
#[case::bad_ident("fo-o()")]
fn test_illegal(#[case] input: &str) {
    let tokens = scan_all(input);
    let (kind, message) = tokens.last().expect("at least one token");
    assert_eq!(*kind, TokenKind::Illegal, "input {:?} gave {:?}", input, tokens);
    assert!(!message.is_empty());
}

#[test]
fn test_illegal_messages() {
    assert_eq!(scan_all("\n")[0].1, "illegal multiple lines");
    assert_eq!(scan_all("012")[0].1, "integer numbers cannot begin with 0");
    assert_eq!(scan_all("1.2.3")[0].1, "numbers cannot have multiple decimal separators");
    assert_eq!(scan_all("&x")[0].1, "illegal operator \"&x\"");
    assert_eq!(scan_all(".5")[0].1, "illegal field reference start '5'");
    assert_eq!(scan_all(".")[0].1, "empty field reference");
}

#[test]
fn test_eof_after_illegal() {
    let mut scanner = Scanner::new("eq(1.2.3) && required()");
    let kinds: Vec<_> = (0..6).map(|_| scanner.next_token().kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Illegal,
            TokenKind::Eof,
            TokenKind::Eof,
            TokenKind::Eof,
        ]
    );
}

#[rstest]
#[case::trailing_newline("required()\n", 10)]
#[case::between_calls("a() &&\nb()", 6)]
#[case::crlf("a()\r\n", 3)]
#[case::inside_string("eq('a\nb')", 5)]
fn test_line_breaks_reject_whole_input(#[case] input: &str, #[case] position: usize) {
    let tokens: Vec<_> = Scanner::new(input).collect();
    assert_eq!(tokens.len(), 2, "{tokens:?}");
    assert_eq!(tokens[0].kind, TokenKind::Illegal);
    assert_eq!(tokens[0].literal, "illegal multiple lines");
    assert_eq!(tokens[0].start, position);
    assert!(tokens[1].is_eof());
}

#[rstest]
#[case::empty("")]
#[case::spaces("    ")]
#[case::tabs("\t \t")]
fn test_blank_input_is_only_eof(#[case] input: &str) {
    let tokens: Vec<_> = Scanner::new(input).collect();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
}

#[test]
fn test_eof_is_repeated() {
    let mut scanner = Scanner::new("");
    assert!(scanner.next_token().is_eof());
    assert!(scanner.next_token().is_eof());
}

#[test]
fn test_iterator_ends_with_eof() {
    let tokens: Vec<_> = Scanner::new("true()").collect();
    assert_eq!(tokens.len(), 4);
    assert!(tokens[3].is_eof());
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_whitespace_is_skipped() {
    let kinds: Vec<_> = scan_all("  required ( \t) ").into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::LParen, TokenKind::RParen]);
}

#[test]
fn test_full_expression() {
    let tokens = scan_all("!(eq(.Value,.Country,'GB',-1,2.5) || false()) && true()");
    let expected = vec![
        (TokenKind::Not, "!"),
        (TokenKind::LParen, "("),
        (TokenKind::Ident, "eq"),
        (TokenKind::LParen, "("),
        (TokenKind::FieldRef, ".Value"),
        (TokenKind::Comma, ","),
        (TokenKind::FieldRef, ".Country"),
        (TokenKind::Comma, ","),
        (TokenKind::String, "GB"),
        (TokenKind::Comma, ","),
        (TokenKind::Integer, "-1"),
        (TokenKind::Comma, ","),
        (TokenKind::Float, "2.5"),
        (TokenKind::RParen, ")"),
        (TokenKind::Or, "||"),
        (TokenKind::Ident, "false"),
        (TokenKind::LParen, "("),
        (TokenKind::RParen, ")"),
        (TokenKind::RParen, ")"),
        (TokenKind::And, "&&"),
        (TokenKind::Ident, "true"),
        (TokenKind::LParen, "("),
        (TokenKind::RParen, ")"),
    ];
    let expected: Vec<_> = expected.into_iter().map(|(k, l)| (k, l.to_string())).collect();
    assert_eq!(tokens, expected);
}

#[test]
fn test_token_display() {
    let token = Scanner::new("  'GB'").next_token();
    let rendered = token.to_string();
    assert_eq!(rendered.split_whitespace().collect::<Vec<_>>(), vec!["2-6", "STRING", "GB"]);
}

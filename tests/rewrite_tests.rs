// tests/rewrite_tests.rs

use rstest::rstest;
use vally::error::RewriteError;
use vally::parser::parse;
use vally::rewrite::rewrite;

// ============================================================================
// Reference injection
// ============================================================================

#[rstest]
#[case::no_arguments("required()", "required(.Value,.Value)")]
#[case::blank_arguments("required(    )", "required(.Value,.Value)")]
#[case::explicit_target("email(.Other)", "email(.Value,.Other)")]
#[case::string_literal("eq('GB')", "eq(.Value,.Value,'GB')")]
#[case::integer_literal("eq(1234)", "eq(.Value,.Value,1234)")]
#[case::signed_literal("eq(-5)", "eq(.Value,.Value,-5)")]
#[case::positive_literal("eq(+5)", "eq(.Value,.Value,+5)")]
#[case::target_and_literal("eq(.Other, 'GB')", "eq(.Value,.Other, 'GB')")]
#[case::several_literals("one_of('GB','IT','US')", "one_of(.Value,.Value,'GB','IT','US')")]
#[case::negation("!required()", "!required(.Value,.Value)")]
#[case::negated_group("!(eq('a') || eq('b'))", "!(eq(.Value,.Value,'a') || eq(.Value,.Value,'b'))")]
#[case::quoted_parenthesis("eq(')') && true()", "eq(.Value,.Value,')') && true(.Value,.Value)")]
#[case::digits_in_name("isbn10() || isbn13()", "isbn10(.Value,.Value) || isbn13(.Value,.Value)")]
fn test_rewrite(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(rewrite(input, ".Value").unwrap(), expected);
}

#[test]
fn test_rewrite_mixed_expression() {
    let input = "(eq(.OtherField, 'GB') && required(    )) || true(    ) || eq('GB') && eq(1234)";
    let expected = "(eq(.ReplacedRef,.OtherField, 'GB') && required(.ReplacedRef,.ReplacedRef)) \
                    || true(.ReplacedRef,.ReplacedRef) \
                    || eq(.ReplacedRef,.ReplacedRef,'GB') && eq(.ReplacedRef,.ReplacedRef,1234)";
    assert_eq!(rewrite(input, ".ReplacedRef").unwrap(), expected);
}

#[test]
fn test_rewrite_nested_field_ref() {
    assert_eq!(
        rewrite("required() && eq(.Address.Country, 'GB')", ".Address.City").unwrap(),
        "required(.Address.City,.Address.City) && eq(.Address.City,.Address.Country, 'GB')"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case::identifier_only("required", 8)]
#[case::open_arguments("required(", 9)]
#[case::open_arguments_with_spaces("required(  ", 11)]
#[case::unclosed_arguments("eq('GB'", 7)]
#[case::unclosed_string("eq('GB)", 7)]
fn test_unexpected_end(#[case] input: &str, #[case] position: usize) {
    assert_eq!(
        rewrite(input, ".Value"),
        Err(RewriteError::UnexpectedEnd { position })
    );
}

// ============================================================================
// Round trip
// ============================================================================

#[rstest]
#[case::plain("required() && email()")]
#[case::groups("(eq(.Other, 'GB') && required()) || true() || eq('GB') && eq(1234)")]
#[case::negation("!(eq('a') || one_of(1, 2.5, -3))")]
#[case::spaces("  required (  ) ")]
fn test_rewritten_text_parses(#[case] input: &str) {
    parse(input).unwrap();
    let rewritten = rewrite(input, ".Field").unwrap();
    parse(&rewritten).unwrap_or_else(|e| panic!("{rewritten:?}: {e}"));
}

//! Tests for format string tokenization.

use alto_dsl::ParseError;
use alto_dsl::parser::{Token, TokenKind, tokenize};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn empty_input_produces_no_tokens() {
    assert_eq!(tokenize("").unwrap(), vec![]);
}

#[test]
fn plain_text_is_one_literal() {
    let tokens = tokenize("Artist - Title.flac").unwrap();
    assert_eq!(
        tokens,
        vec![Token {
            kind: TokenKind::StringLiteral,
            text: "Artist - Title.flac".into(),
            offset: 0,
        }]
    );
}

#[test]
fn rendering_reserved_free_text_is_identity() {
    for input in ["", "a", "Some Album/01 Track.mp3", "ünïcødé ✓", "tab\there"] {
        assert_eq!(render(&tokenize(input).unwrap()), input);
    }
}

#[test]
fn reserved_characters_become_single_tokens() {
    let tokens = tokenize("{%a%|b}").unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::LGroup,
            TokenKind::VarDelimiter,
            TokenKind::StringLiteral,
            TokenKind::VarDelimiter,
            TokenKind::GroupSeparator,
            TokenKind::StringLiteral,
            TokenKind::RGroup,
        ]
    );
    let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn call_tokens() {
    let tokens = tokenize("<trim(x)>").unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::LCall,
            TokenKind::StringLiteral,
            TokenKind::LArgs,
            TokenKind::StringLiteral,
            TokenKind::RArgs,
            TokenKind::RCall,
        ]
    );
    assert_eq!(tokens[1].text, "trim");
}

#[test]
fn escapes_merge_into_surrounding_literal() {
    let tokens = tokenize(r"a\{b\\c\%").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].text, r"a{b\c%");
    assert_eq!(tokens[0].offset, 0);
}

#[test]
fn escaped_plain_character_is_itself() {
    let tokens = tokenize(r"\n").unwrap();
    assert_eq!(tokens[0].text, "n");
}

#[test]
fn trailing_backslash_is_unterminated_escape() {
    assert_eq!(
        tokenize(r"abc\"),
        Err(ParseError::UnterminatedEscape { offset: 3 })
    );
}

#[test]
fn offsets_are_byte_offsets() {
    let tokens = tokenize("é{").unwrap();
    assert_eq!(tokens[0].text, "é");
    assert_eq!(tokens[1].kind, TokenKind::LGroup);
    assert_eq!(tokens[1].offset, 2);
}

#[test]
fn literal_after_reserved_starts_new_token() {
    let tokens = tokenize("a%b").unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::StringLiteral,
            TokenKind::VarDelimiter,
            TokenKind::StringLiteral,
        ]
    );
    assert_eq!(tokens[2].offset, 2);
}

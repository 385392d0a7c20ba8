//! Integration tests for format string parsing.

use alto_dsl::parser::{Call, Field, Group, Node, TokenKind, parse_str};
use alto_dsl::{ParseError, SyntaxErrorKind};

fn lit(s: &str) -> Node {
    Node::Literal(s.into())
}

fn var(s: &str) -> Node {
    Node::Variable(s.into())
}

fn field(nodes: Vec<Node>) -> Field {
    Field::new(nodes)
}

fn syntax_error(input: &str) -> (usize, SyntaxErrorKind) {
    match parse_str(input) {
        Err(ParseError::Syntax { offset, kind }) => (offset, kind),
        other => panic!("expected syntax error for {input:?}, got {other:?}"),
    }
}

// =============================================================================
// Literals and top level
// =============================================================================

#[test]
fn empty_format_has_no_nodes() {
    assert_eq!(parse_str("").unwrap(), vec![]);
}

#[test]
fn plain_text_is_literal() {
    assert_eq!(parse_str("Music/file.mp3").unwrap(), vec![lit("Music/file.mp3")]);
}

#[test]
fn percent_outside_group_is_literal() {
    assert_eq!(parse_str("%a%").unwrap(), vec![lit("%a%")]);
    assert_eq!(parse_str("100% pure").unwrap(), vec![lit("100% pure")]);
}

#[test]
fn escaped_separator_inside_group_is_literal() {
    let nodes = parse_str(r"{a\|b}").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Group(Group {
            fields: vec![field(vec![lit("a|b")])]
        })]
    );
}

// =============================================================================
// Groups
// =============================================================================

#[test]
fn group_with_fallback_fields() {
    let nodes = parse_str("{%artist% - %title%|%filename%}.mp3").unwrap();
    assert_eq!(
        nodes,
        vec![
            Node::Group(Group {
                fields: vec![
                    field(vec![var("artist"), lit(" - "), var("title")]),
                    field(vec![var("filename")]),
                ]
            }),
            lit(".mp3"),
        ]
    );
}

#[test]
fn empty_group_has_one_empty_field() {
    assert_eq!(
        parse_str("{}").unwrap(),
        vec![Node::Group(Group {
            fields: vec![Field::default()]
        })]
    );
}

#[test]
fn trailing_separator_adds_empty_field() {
    assert_eq!(
        parse_str("{a|}").unwrap(),
        vec![Node::Group(Group {
            fields: vec![field(vec![lit("a")]), Field::default()]
        })]
    );
}

#[test]
fn nested_groups() {
    let nodes = parse_str(r"{%album%{ \(%year%\)}|Unknown}").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Group(Group {
            fields: vec![
                field(vec![
                    var("album"),
                    Node::Group(Group {
                        fields: vec![field(vec![lit(" ("), var("year"), lit(")")])]
                    }),
                ]),
                field(vec![lit("Unknown")]),
            ]
        })]
    );
}

#[test]
fn unicode_variable_names_are_words() {
    let nodes = parse_str("{%título%}").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Group(Group {
            fields: vec![field(vec![var("título")])]
        })]
    );
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn call_with_arguments() {
    let nodes = parse_str("<eq(%disctotal%|1|single)>").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Call(Call {
            name: "eq".into(),
            args: vec![
                field(vec![var("disctotal")]),
                field(vec![lit("1")]),
                field(vec![lit("single")]),
            ],
        })]
    );
}

#[test]
fn call_name_is_trimmed() {
    let nodes = parse_str("< trim (x)>").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Call(Call {
            name: "trim".into(),
            args: vec![field(vec![lit("x")])],
        })]
    );
}

#[test]
fn empty_argument_list_has_no_arguments() {
    assert_eq!(
        parse_str("<exit()>").unwrap(),
        vec![Node::Call(Call {
            name: "exit".into(),
            args: vec![],
        })]
    );
}

#[test]
fn separator_only_argument_list_has_two_empty_arguments() {
    assert_eq!(
        parse_str("<f(|)>").unwrap(),
        vec![Node::Call(Call {
            name: "f".into(),
            args: vec![Field::default(), Field::default()],
        })]
    );
}

#[test]
fn calls_and_groups_nest() {
    let nodes = parse_str("{<trim(%a%)>|<must({%b%|%c%})>}").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Group(Group {
            fields: vec![
                field(vec![Node::Call(Call {
                    name: "trim".into(),
                    args: vec![field(vec![var("a")])],
                })]),
                field(vec![Node::Call(Call {
                    name: "must".into(),
                    args: vec![field(vec![Node::Group(Group {
                        fields: vec![field(vec![var("b")]), field(vec![var("c")])]
                    })])],
                })]),
            ]
        })]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unterminated_group() {
    assert_eq!(syntax_error("{a"), (0, SyntaxErrorKind::UnterminatedGroup));
    assert_eq!(syntax_error("x{a|b"), (1, SyntaxErrorKind::UnterminatedGroup));
}

#[test]
fn unterminated_variable() {
    assert_eq!(syntax_error("{%a}"), (1, SyntaxErrorKind::UnterminatedVariable));
    assert_eq!(syntax_error("{%a"), (1, SyntaxErrorKind::UnterminatedVariable));
    assert_eq!(syntax_error("{%%}"), (1, SyntaxErrorKind::UnterminatedVariable));
    assert_eq!(
        syntax_error("<trim(%a)>"),
        (6, SyntaxErrorKind::UnterminatedVariable)
    );
}

#[test]
fn invalid_variable_name() {
    assert_eq!(
        syntax_error("{%a b%}"),
        (2, SyntaxErrorKind::InvalidVariableName("a b".into()))
    );
    assert_eq!(
        syntax_error("{%a-b%}"),
        (2, SyntaxErrorKind::InvalidVariableName("a-b".into()))
    );
}

#[test]
fn unterminated_call() {
    assert_eq!(
        syntax_error("<trim"),
        (0, SyntaxErrorKind::UnterminatedCall { expected: "'('" })
    );
    assert_eq!(
        syntax_error("<trim(a"),
        (0, SyntaxErrorKind::UnterminatedCall { expected: "')'" })
    );
    assert_eq!(
        syntax_error("<trim(a)"),
        (0, SyntaxErrorKind::UnterminatedCall { expected: "'>'" })
    );
    assert_eq!(
        syntax_error("<(a)>"),
        (
            0,
            SyntaxErrorKind::UnterminatedCall {
                expected: "a function name"
            }
        )
    );
    assert_eq!(
        syntax_error("<trim>"),
        (0, SyntaxErrorKind::UnterminatedCall { expected: "'('" })
    );
}

#[test]
fn invalid_function_name() {
    assert_eq!(
        syntax_error("<my-fn()>"),
        (1, SyntaxErrorKind::InvalidFunctionName("my-fn".into()))
    );
    assert_eq!(
        syntax_error("<trim x>"),
        (1, SyntaxErrorKind::InvalidFunctionName("trim x".into()))
    );
}

#[test]
fn parentheses_outside_calls_must_be_escaped() {
    assert_eq!(
        syntax_error("Album (Deluxe)"),
        (6, SyntaxErrorKind::UnexpectedToken(TokenKind::LArgs))
    );
    assert_eq!(
        parse_str(r"Album \(Deluxe\)").unwrap(),
        vec![lit("Album (Deluxe)")]
    );
}

#[test]
fn stray_tokens_are_unexpected() {
    assert_eq!(
        syntax_error("}"),
        (0, SyntaxErrorKind::UnexpectedToken(TokenKind::RGroup))
    );
    assert_eq!(
        syntax_error("a|b"),
        (1, SyntaxErrorKind::UnexpectedToken(TokenKind::GroupSeparator))
    );
    assert_eq!(
        syntax_error("x)"),
        (1, SyntaxErrorKind::UnexpectedToken(TokenKind::RArgs))
    );
    assert_eq!(
        syntax_error("a>"),
        (1, SyntaxErrorKind::UnexpectedToken(TokenKind::RCall))
    );
    assert_eq!(
        syntax_error("{a)}"),
        (2, SyntaxErrorKind::UnexpectedToken(TokenKind::RArgs))
    );
}

#[test]
fn tokenize_errors_surface_from_parse() {
    assert_eq!(
        parse_str(r"{a}\"),
        Err(ParseError::UnterminatedEscape { offset: 3 })
    );
}

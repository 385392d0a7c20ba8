//! Recursive-descent parser from tokens to AST nodes.
//!
//! Grammar, by leading token:
//! - text: literal
//! - `%`: literal at the top level; `%name%` inside a group or call
//! - `{`: group of fields separated by `|`, closed by `}`
//! - `<`: call `<name(field|field)>`

use super::ast::{Call, Field, Group, Node, is_word};
use super::error::{ParseError, SyntaxErrorKind};
use super::lexer::{Token, TokenKind};

/// Parse a token sequence into root nodes.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] positioned at the offending token, or at
/// the opening token of a construct that the input never closes.
pub fn parse(tokens: &[Token]) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::new(tokens);
    let mut nodes = Vec::new();
    while let Some(token) = parser.next() {
        nodes.push(parser.node(token)?);
    }
    Ok(merge_literals(nodes))
}

/// Cursor over the token slice plus nesting state.
struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    /// Number of enclosing calls.
    call_depth: usize,
    /// Number of enclosing groups.
    group_depth: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            call_depth: 0,
            group_depth: 0,
        }
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Variables are only recognized inside a group or call argument.
    fn in_context(&self) -> bool {
        self.call_depth > 0 || self.group_depth > 0
    }

    /// Parse the node starting with `token`.
    fn node(&mut self, token: &'t Token) -> Result<Node, ParseError> {
        match token.kind {
            TokenKind::StringLiteral => Ok(Node::Literal(token.text.clone())),
            TokenKind::VarDelimiter if self.in_context() => self.variable(token),
            TokenKind::VarDelimiter => Ok(Node::Literal(token.text.clone())),
            TokenKind::LGroup => self.group(token),
            TokenKind::LCall => self.call(token),
            kind @ (TokenKind::RGroup
            | TokenKind::GroupSeparator
            | TokenKind::RCall
            | TokenKind::LArgs
            | TokenKind::RArgs) => Err(syntax(token.offset, SyntaxErrorKind::UnexpectedToken(kind))),
        }
    }

    /// Parse `%name%`; `open` is the first `%`.
    fn variable(&mut self, open: &'t Token) -> Result<Node, ParseError> {
        let unterminated = || syntax(open.offset, SyntaxErrorKind::UnterminatedVariable);

        let name = self
            .next()
            .filter(|t| t.kind == TokenKind::StringLiteral)
            .ok_or_else(unterminated)?;
        self.next()
            .filter(|t| t.kind == TokenKind::VarDelimiter)
            .ok_or_else(unterminated)?;

        if !is_word(&name.text) {
            return Err(syntax(
                name.offset,
                SyntaxErrorKind::InvalidVariableName(name.text.clone()),
            ));
        }
        Ok(Node::Variable(name.text.clone()))
    }

    /// Parse `{field|field}`; `open` is the `{`.
    fn group(&mut self, open: &'t Token) -> Result<Node, ParseError> {
        self.group_depth += 1;
        let fields = self.fields(TokenKind::RGroup).ok_or_else(|| {
            syntax(open.offset, SyntaxErrorKind::UnterminatedGroup)
        })??;
        self.group_depth -= 1;
        Ok(Node::Group(Group { fields }))
    }

    /// Parse `<name(field|field)>`; `open` is the `<`.
    fn call(&mut self, open: &'t Token) -> Result<Node, ParseError> {
        self.call_depth += 1;

        let name_token = self
            .next()
            .filter(|t| t.kind == TokenKind::StringLiteral)
            .ok_or_else(|| unterminated_call(open, "a function name"))?;
        let name = name_token.text.trim();
        if !is_word(name) {
            return Err(syntax(
                name_token.offset,
                SyntaxErrorKind::InvalidFunctionName(name.to_string()),
            ));
        }

        self.next()
            .filter(|t| t.kind == TokenKind::LArgs)
            .ok_or_else(|| unterminated_call(open, "'('"))?;
        let mut args = self
            .fields(TokenKind::RArgs)
            .ok_or_else(|| unterminated_call(open, "')'"))??;
        self.next()
            .filter(|t| t.kind == TokenKind::RCall)
            .ok_or_else(|| unterminated_call(open, "'>'"))?;

        // `<f()>` takes no arguments, unlike `{}` which has one empty field.
        if args.len() == 1 && args[0].is_empty() {
            args.clear();
        }

        self.call_depth -= 1;
        Ok(Node::Call(Call {
            name: name.to_string(),
            args,
        }))
    }

    /// Parse fields separated by `|` up to and including `close`.
    ///
    /// Returns `None` if the input ends before `close`. Always produces at
    /// least one field, which may be empty.
    fn fields(&mut self, close: TokenKind) -> Option<Result<Vec<Field>, ParseError>> {
        let mut fields = Vec::new();
        let mut nodes = Vec::new();
        loop {
            let token = self.next()?;
            if token.kind == close {
                fields.push(Field::new(merge_literals(nodes)));
                return Some(Ok(fields));
            }
            if token.kind == TokenKind::GroupSeparator {
                fields.push(Field::new(merge_literals(nodes)));
                nodes = Vec::new();
                continue;
            }
            match self.node(token) {
                Ok(node) => nodes.push(node),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn syntax(offset: usize, kind: SyntaxErrorKind) -> ParseError {
    ParseError::Syntax { offset, kind }
}

fn unterminated_call(open: &Token, expected: &'static str) -> ParseError {
    syntax(open.offset, SyntaxErrorKind::UnterminatedCall { expected })
}

/// Merge adjacent Literal nodes into single nodes.
fn merge_literals(nodes: Vec<Node>) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Literal(text) => {
                if let Some(Node::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Node::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

use logos::Logos;

use crate::error::LispyError;


#[derive(Debug, Clone, Copy, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token<'a> {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[regex(r"-?[0-9]+", |lex| lex.slice(), priority = 3)]
    Number(&'a str),

    #[regex(r"[a-zA-Z0-9_+\-*/\\=<>!&]+", |lex| lex.slice())]
    Symbol(&'a str),
}

impl<'a> Token<'a> {
    fn text(self) -> &'a str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Number(text) | Self::Symbol(text) => text,
        }
    }
}

// A token together with the byte offset it starts at. The lexer always
// terminates the stream with a `None` token marking the end of input.
#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    token: Option<Token<'a>>,
    offset: usize,
}

/// A node of the generic parse tree handed to the reader.
///
/// The tag describes what the node is (`expr|number|regex`,
/// `expr|symbol|regex`, `expr|sexpr|>`, `expr|qexpr|>`, `char`, `regex`, or
/// `>` for the root), the contents hold the literal token text, and the
/// children keep the order of the input. Punctuation and the start/end
/// anchors of the root are kept as nodes so the tree mirrors the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub contents: String,
    pub offset: usize,
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(tag: &str, contents: &str, offset: usize) -> Self {
        Self { tag: tag.to_owned(), contents: contents.to_owned(), offset, children: Vec::new() }
    }

    fn branch(tag: &str, offset: usize, children: Vec<Node>) -> Self {
        Self { tag: tag.to_owned(), contents: String::new(), offset, children }
    }

    /// Whether any component of the tag names `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.split('|').any(|part| part == tag)
    }
}

type Tokens<'a, 'b> = &'a [Lexeme<'b>];
type ParseResult<O> = Result<O, LispyError>;


fn lexer(input: &str) -> ParseResult<Vec<Lexeme<'_>>> {
    let mut tokens = vec![];
    let mut tokenizer = Token::lexer(input);

    while let Some(result) = tokenizer.next() {
        let offset = tokenizer.span().start;
        match result {
            Ok(token) => tokens.push(Lexeme { token: Some(token), offset }),
            Err(_) => return Err(LispyError::UnexpectedCharacter {
                offset,
                found: tokenizer.slice().to_owned(),
            })
        }
    }

    tokens.push(Lexeme { token: None, offset: input.len() });
    Ok(tokens)
}

fn unexpected(lexeme: &Lexeme<'_>, expected: &'static str) -> LispyError {
    match lexeme.token {
        Some(token) => LispyError::UnexpectedToken { offset: lexeme.offset, found: token.text().to_owned(), expected },
        None => LispyError::UnexpectedEnd { offset: lexeme.offset, expected },
    }
}

fn parse_token<'a, 'b: 'a>(
    expected: &'static str,
    token_recognizer: impl Fn(&Token<'b>) -> bool,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, &'a Lexeme<'b>)> {
    move |tokens| {
        let Some(lexeme) = tokens.first() else {
            return Err(LispyError::UnexpectedEnd { offset: 0, expected });
        };

        match &lexeme.token {
            Some(token) if token_recognizer(token) => Ok((&tokens[1..], lexeme)),
            _ => Err(unexpected(lexeme, expected)),
        }
    }
}

fn parse_surrounds<'a, 'b: 'a, O>(
    start_parser: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, &'a Lexeme<'b>)>,
    internal_parser: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)>,
    end_parser: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, &'a Lexeme<'b>)>,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, (&'a Lexeme<'b>, O, &'a Lexeme<'b>))> {
    move |tokens| {
        let (tokens, start) = start_parser(tokens)?;
        let (tokens, internal) = internal_parser(tokens)?;
        let (tokens, end) = end_parser(tokens)?;

        Ok((tokens, (start, internal, end)))
    }
}

// Repeats `parser` for as long as the next token can start an expression.
// Closers and the end of input stop the repetition and are left for the
// caller to deal with.
fn parse_list<'a, 'b: 'a, O>(
    parser: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)>,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Vec<O>)> {
    move |mut tokens| {
        let mut result = vec![];

        while starts_expression(tokens) {
            let (new_tokens, value) = parser(tokens)?;
            result.push(value);
            tokens = new_tokens;
        }

        Ok((tokens, result))
    }
}

fn starts_expression(tokens: Tokens<'_, '_>) -> bool {
    matches!(
        tokens.first().and_then(|lexeme| lexeme.token),
        Some(Token::LeftParen | Token::LeftBrace | Token::Number(_) | Token::Symbol(_))
    )
}

fn parse_atom<'a, 'b: 'a>(tokens: Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node)> {
    let (tokens, lexeme) = parse_token("number or symbol", |token| matches!(token, Token::Number(_) | Token::Symbol(_)))(tokens)?;
    let node = match lexeme.token {
        Some(Token::Number(text)) => Node::leaf("expr|number|regex", text, lexeme.offset),
        Some(Token::Symbol(text)) => Node::leaf("expr|symbol|regex", text, lexeme.offset),
        _ => unreachable!("parse_token only accepts numbers and symbols here")
    };
    Ok((tokens, node))
}

// Groups nested deeper than this are rejected before they are read or
// evaluated, both of which recurse once per level.
const MAX_DEPTH: usize = 256;

fn parse_group<'a, 'b: 'a>(
    tag: &'static str,
    open: Token<'static>,
    close: Token<'static>,
    expected_close: &'static str,
    depth: usize,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node)> {
    move |tokens| {
        if depth >= MAX_DEPTH {
            let offset = tokens.first().map_or(0, |lexeme| lexeme.offset);
            return Err(LispyError::TooDeep { offset, limit: MAX_DEPTH });
        }

        let (tokens, (start, children, end)) = parse_surrounds(
            parse_token("'(' or '{'", move |token| *token == open),
            parse_list(move |tokens| parse_expression(tokens, depth + 1)),
            parse_token(expected_close, move |token| *token == close),
        )(tokens)?;

        let mut nodes = Vec::with_capacity(children.len() + 2);
        nodes.push(Node::leaf("char", open.text(), start.offset));
        nodes.extend(children);
        nodes.push(Node::leaf("char", close.text(), end.offset));
        Ok((tokens, Node::branch(tag, start.offset, nodes)))
    }
}

fn parse_expression<'a, 'b: 'a>(tokens: Tokens<'a, 'b>, depth: usize) -> ParseResult<(Tokens<'a, 'b>, Node)> {
    match tokens.first().and_then(|lexeme| lexeme.token) {
        Some(Token::LeftParen) => parse_group("expr|sexpr|>", Token::LeftParen, Token::RightParen, "')'", depth)(tokens),
        Some(Token::LeftBrace) => parse_group("expr|qexpr|>", Token::LeftBrace, Token::RightBrace, "'}'", depth)(tokens),
        _ => parse_atom(tokens)
    }
}

/// Parses a full line of input into a tree rooted at a `>` node.
///
/// The root holds a start anchor, every top-level expression in order and
/// an end anchor. Anything left over after the last expression is an error.
pub fn parse(input: &str) -> ParseResult<Node> {
    let tokens = lexer(input)?;

    let (rest, expressions) = parse_list(|tokens| parse_expression(tokens, 0))(tokens.as_slice())?;
    if let Some(Lexeme { token: Some(token), offset }) = rest.first() {
        return Err(LispyError::TrailingInput { offset: *offset, found: token.text().to_owned() });
    }

    let mut children = Vec::with_capacity(expressions.len() + 2);
    children.push(Node::leaf("regex", "", 0));
    children.extend(expressions);
    children.push(Node::leaf("regex", "", input.len()));
    Ok(Node::branch(">", 0, children))
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use crate::test_utils::{all_testcases, load_test_pair, TestOutput};

    use super::*;

    fn assert_can_parse(testcase: (usize, usize), input: &str, expected: &Result<TestOutput, String>) -> anyhow::Result<()> {
        match (parse(input), expected) {
            (Ok(result), Err(expected)) => bail!("Testcase {}:{} - Expected {} but got {:?}", testcase.0, testcase.1, expected, result),
            (Err(result), Ok(expected)) => bail!("Testcase {}:{} - Expected {:?} but got {}", testcase.0, testcase.1, expected, result),
            (Err(result), Err(expected)) if result.kind() != expected.as_str()
                => bail!("Testcase {}:{} - Expected {} but got {}", testcase.0, testcase.1, expected, result.kind()),
            _ => Ok(())
        }
    }

    #[test]
    fn parse_testcases() -> anyhow::Result<()> {
        for testcase in all_testcases() {
            println!("Running testcase {}", testcase);
            let entries = load_test_pair(testcase)?;

            for (lineno, (input, expected)) in entries.into_iter().enumerate() {
                assert_can_parse((testcase, lineno), &input, &expected.into())?;
            }
        }

        Ok(())
    }

    #[test]
    fn root_is_anchored() {
        let root = parse("+ 1 2").unwrap();
        assert_eq!(root.tag, ">");
        assert_eq!(root.children.len(), 5);
        assert!(root.children[0].has_tag("regex"));
        assert!(root.children[1].has_tag("symbol"));
        assert!(root.children[2].has_tag("number"));
        assert!(root.children[4].has_tag("regex"));
    }

    #[test]
    fn groups_keep_punctuation() {
        let root = parse("{1 (x)}").unwrap();
        let qexpr = &root.children[1];
        assert!(qexpr.has_tag("qexpr"));

        let contents: Vec<_> = qexpr.children.iter().map(|node| node.contents.as_str()).collect();
        assert_eq!(contents, vec!["{", "1", "", "}"]);
        assert!(qexpr.children[2].has_tag("sexpr"));
        assert_eq!(qexpr.children[2].offset, 3);
    }

    #[test]
    fn negative_numbers_and_dash_symbols() {
        let root = parse("- -5 -x").unwrap();
        assert!(root.children[1].has_tag("symbol"));
        assert!(root.children[2].has_tag("number"));
        assert_eq!(root.children[2].contents, "-5");
        assert!(root.children[3].has_tag("symbol"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse("(+ 1 2").unwrap_err(), LispyError::UnexpectedEnd { offset: 6, expected: "')'" });
        assert_eq!(parse("(+ 1 2}").unwrap_err().kind(), "UnexpectedToken");
        assert_eq!(parse("1 2)").unwrap_err(), LispyError::TrailingInput { offset: 3, found: ")".to_owned() });
        assert_eq!(parse("(+ 1 #)").unwrap_err().kind(), "UnexpectedCharacter");
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            parse(&nested(MAX_DEPTH + 1)).unwrap_err(),
            LispyError::TooDeep { offset: MAX_DEPTH, limit: MAX_DEPTH }
        );

        let flood = "{".repeat(200_000);
        assert_eq!(parse(&flood).unwrap_err().kind(), "TooDeep");
    }
}

/*!
Tokens, and a lexer splitting source text into them
*/
use crate::prettyprinter::tokens::*;
use crate::{debug_from_display, quick_display};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{anychar, multispace0},
    combinator::{map, not, recognize},
    multi::many1,
    sequence::terminated,
    IResult,
};

/// The kind of a token
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// The end of the input
    Eof,
    /// `let`
    Let,
    /// `in`
    In,
    /// `fn`
    Fn,
    /// `case`
    Case,
    /// `then`
    Then,
    /// `const`
    Const,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// An identifier
    Ident,
    /// `=`
    Equal,
    /// `->`
    Arrow,
    /// `.`
    Dot,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `|`
    Pipe,
    /// `,`
    Comma,
    /// A character which cannot start any token
    Invalid,
}

impl TokenKind {
    /// How this kind of token is named in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Let => KEYWORD_LET,
            TokenKind::In => KEYWORD_IN,
            TokenKind::Fn => KEYWORD_FN,
            TokenKind::Case => KEYWORD_CASE,
            TokenKind::Then => KEYWORD_THEN,
            TokenKind::Const => KEYWORD_CONST,
            TokenKind::Semicolon => STATEMENT_DELIM,
            TokenKind::Colon => JUDGE_TYPE,
            TokenKind::Ident => "variable name",
            TokenKind::Equal => ASSIGN,
            TokenKind::Arrow => ARROW,
            TokenKind::Dot => LAMBDA_DOT,
            TokenKind::OpenParen => SEXPR_OPEN,
            TokenKind::CloseParen => SEXPR_CLOSE,
            TokenKind::Pipe => PIPE,
            TokenKind::Comma => COMMA,
            TokenKind::Invalid => "unknown token",
        }
    }
    /// Whether a token of this kind ends an application
    pub fn stops_application(self) -> bool {
        match self {
            TokenKind::Arrow
            | TokenKind::Equal
            | TokenKind::Dot
            | TokenKind::Semicolon
            | TokenKind::In
            | TokenKind::Eof
            | TokenKind::CloseParen
            | TokenKind::Pipe
            | TokenKind::Comma
            | TokenKind::Then => true,
            _ => false,
        }
    }
}

quick_display!(TokenKind, kind, fmt => write!(fmt, "{}", kind.as_str()));
debug_from_display!(TokenKind);

/// A token, together with where it was found
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Token<'a> {
    /// The kind of this token
    pub kind: TokenKind,
    /// The text of this token. Empty at the end of the input
    pub text: &'a str,
    /// The byte offset of this token in the source
    pub offset: usize,
    /// The line this token starts on, starting from 1
    pub line: u32,
    /// The column this token starts at, starting from 1
    pub column: u32,
}

/**
Parse a punctuation token

# Example
```rust
use alpha_tag::parser::lexer::{parse_punctuation, TokenKind};
assert_eq!(parse_punctuation("->x"), Ok(("x", TokenKind::Arrow)));
assert_eq!(parse_punctuation(". x"), Ok((" x", TokenKind::Dot)));
assert!(parse_punctuation("-x").is_err());
assert!(parse_punctuation("x").is_err());
```
*/
pub fn parse_punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map(tag(ARROW), |_| TokenKind::Arrow),
        map(tag(LAMBDA_DOT), |_| TokenKind::Dot),
        map(tag(JUDGE_TYPE), |_| TokenKind::Colon),
        map(tag(STATEMENT_DELIM), |_| TokenKind::Semicolon),
        map(tag(ASSIGN), |_| TokenKind::Equal),
        map(tag(SEXPR_OPEN), |_| TokenKind::OpenParen),
        map(tag(SEXPR_CLOSE), |_| TokenKind::CloseParen),
        map(tag(PIPE), |_| TokenKind::Pipe),
        map(tag(COMMA), |_| TokenKind::Comma),
    ))(input)
}

/**
Parse a word, i.e. a run of non-special characters not containing an arrow

# Example
```rust
use alpha_tag::parser::lexer::parse_word;
assert_eq!(parse_word("hello world"), Ok((" world", "hello")));
assert_eq!(parse_word("x:T"), Ok((":T", "x")));
assert_eq!(parse_word("a->b"), Ok(("->b", "a")));
assert_eq!(parse_word("a-b c"), Ok((" c", "a-b")));
assert_eq!(parse_word("C++;"), Ok((";", "C++")));
assert!(parse_word("->").is_err());
assert!(parse_word(" x").is_err());
assert!(parse_word("").is_err());
```
*/
pub fn parse_word(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((
        is_not(WORD_BREAKS),
        terminated(tag("-"), not(tag(">"))),
    ))))(input)
}

/// Get the keyword a word spells, if any
pub fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        KEYWORD_LET => Some(TokenKind::Let),
        KEYWORD_IN => Some(TokenKind::In),
        KEYWORD_FN => Some(TokenKind::Fn),
        KEYWORD_CASE => Some(TokenKind::Case),
        KEYWORD_THEN => Some(TokenKind::Then),
        KEYWORD_CONST => Some(TokenKind::Const),
        _ => None,
    }
}

/**
Parse a single token, which must not be preceded by whitespace. Returns the kind of the token
and its text.

# Example
```rust
use alpha_tag::parser::lexer::{parse_token, TokenKind};
assert_eq!(parse_token("let x"), Ok((" x", (TokenKind::Let, "let"))));
assert_eq!(parse_token("letter"), Ok(("", (TokenKind::Ident, "letter"))));
assert_eq!(parse_token("in."), Ok((".", (TokenKind::In, "in"))));
assert_eq!(parse_token("{x}"), Ok(("x}", (TokenKind::Invalid, "{"))));
```
*/
pub fn parse_token(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, kind) = alt((
        parse_punctuation,
        map(parse_word, |word| keyword(word).unwrap_or(TokenKind::Ident)),
        map(anychar, |_| TokenKind::Invalid),
    ))(input)?;
    Ok((rest, (kind, &input[..input.len() - rest.len()])))
}

/**
Parse whitespace, which may be empty

# Example
```rust
use alpha_tag::parser::lexer::parse_ws;
assert_eq!(parse_ws(" \t\r\n x "), Ok(("x ", " \t\r\n ")));
assert_eq!(parse_ws("x"), Ok(("x", "")));
```
*/
pub fn parse_ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// A lexer over a source string, tracking lines and columns
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    rest: &'a str,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer at the start of `src`
    pub fn new(src: &'a str) -> Lexer<'a> {
        Lexer {
            src,
            rest: src,
            line: 1,
            column: 1,
        }
    }
    /// Get the source this lexer reads
    #[inline]
    pub fn src(&self) -> &'a str {
        self.src
    }
    /// Get the byte offset of the next unread character
    #[inline]
    pub fn offset(&self) -> usize {
        self.src.len() - self.rest.len()
    }
    /// Advance over `len` bytes of the remaining input, updating the line and column
    fn advance(&mut self, len: usize) {
        let (consumed, rest) = self.rest.split_at(len);
        for c in consumed.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.rest = rest;
    }
    /// Lex the next token. Once the input is exhausted, every call returns `Eof`
    pub fn next_token(&mut self) -> Token<'a> {
        let skipped = parse_ws(self.rest).map(|(_, ws)| ws.len()).unwrap_or(0);
        self.advance(skipped);
        let offset = self.offset();
        let (line, column) = (self.line, self.column);
        let (kind, text) = if self.rest.is_empty() {
            (TokenKind::Eof, self.rest)
        } else {
            match parse_token(self.rest) {
                Ok((_, token)) => token,
                // Every non-empty input starts with at least one character
                Err(_) => (TokenKind::Invalid, &self.rest[..0]),
            }
        };
        self.advance(text.len());
        Token {
            kind,
            text,
            offset,
            line,
            column,
        }
    }
}

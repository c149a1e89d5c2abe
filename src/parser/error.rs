/*!
Parse errors, and the source snippets pointing at them
*/
use super::lexer::{Token, TokenKind};
use thiserror::Error;

/// The number of bytes of source shown around an offending token
pub const SNIPPET_WIDTH: usize = 32;

/// The number of bytes of source shown before an offending token
pub const SNIPPET_LEAD: usize = 16;

/// An error parsing a program: the parser wanted one kind of token but found another
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("expecting '{expected}', found '{found}' at line {line}, column {column}\n{snippet}")]
pub struct ParseError {
    /// The kind of token the parser expected
    pub expected: TokenKind,
    /// The kind of token actually found
    pub found: TokenKind,
    /// The line of the offending token, starting from 1
    pub line: u32,
    /// The column of the offending token, starting from 1
    pub column: u32,
    /// The source around the offending token, with a line of carets underneath it
    pub snippet: String,
}

impl ParseError {
    /// Create a new parse error for finding `found` in `src` while expecting `expected`
    pub fn new(src: &str, expected: TokenKind, found: &Token) -> ParseError {
        ParseError {
            expected,
            found: found.kind,
            line: found.line,
            column: found.column,
            snippet: snippet(src, found),
        }
    }
}

/**
Render the window of `src` around a token, and mark the token's bytes with carets.

The window is cut on character boundaries and each character gets exactly one marker, so the
carets stay aligned under multibyte characters. Control characters are shown as spaces. At least
one caret is always drawn, so the end of the input can be pointed at.

# Example
```rust
use alpha_tag::parser::{error::snippet, lexer::Lexer};
let mut lexer = Lexer::new("let x = y z");
let token = lexer.next_token();
assert_eq!(snippet("let x = y z", &token), "'...let x = y z...'\n ---^^^-------- ");
```
*/
pub fn snippet(src: &str, token: &Token) -> String {
    let mut start = token.offset.saturating_sub(SNIPPET_LEAD).min(src.len());
    while !src.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + SNIPPET_WIDTH).min(src.len());
    while !src.is_char_boundary(end) {
        end += 1;
    }
    let marked = token.offset..token.offset + token.text.len().max(1);
    // One marker per rendered character, however many bytes it takes
    let mut window = String::with_capacity(end - start);
    let mut markers = String::with_capacity(end - start);
    for (at, c) in src[start..end].char_indices() {
        window.push(if c.is_control() { ' ' } else { c });
        markers.push(if marked.contains(&(start + at)) { '^' } else { '-' });
    }
    for at in end..marked.end.min(start + SNIPPET_WIDTH) {
        markers.push(if marked.contains(&at) { '^' } else { '-' });
    }
    format!("'...{}...'\n ---{}--- ", window, markers)
}

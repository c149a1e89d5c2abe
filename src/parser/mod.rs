/*!
A recursive-descent parser for programs, producing terms in an `Ast`.

The grammar, in EBNF:
```ebnf
Program ::= "let" Bind ("=" App)? ("in" Program | ";") | App
Bind ::= Ident (":" Type)?
Type ::= "const"? App ("->" Type)?
App ::= Primary Primary*
Primary ::= "(" App ")" | "fn" Bind "." App | Ident (":" Type)?
```

Applications group in pairs: `a b c d` parses as `((a b) (c d))` and `a b c` as `((a b) c)`.
Only one token of lookahead is ever needed.
*/
use crate::name::Name;
use crate::term::{Ast, TermId};
use crate::util::stack::ensure_sufficient_stack;
use smallvec::SmallVec;

pub mod error;
pub mod lexer;
pub use error::ParseError;
use lexer::{Lexer, Token, TokenKind};

/// The maximum identifier length, in bytes, under legacy options
pub const LEGACY_IDENT_LEN: usize = 7;

/// Options for the parser
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ParserOptions {
    /// If set, identifiers longer than this many bytes are truncated to it
    pub max_ident_len: Option<usize>,
}

impl ParserOptions {
    /// Legacy options: only the first `LEGACY_IDENT_LEN` bytes of each identifier are kept, the
    /// rest of the word is dropped
    pub fn legacy() -> ParserOptions {
        ParserOptions {
            max_ident_len: Some(LEGACY_IDENT_LEN),
        }
    }
}

/// A parser for programs
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    /// Create a parser with the default options
    pub fn new() -> Parser {
        Parser::default()
    }
    /// Create a parser with the given options
    pub fn with_options(options: ParserOptions) -> Parser {
        Parser { options }
    }
    /// Get the options of this parser
    #[inline]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
    /// Parse a program into a fresh arena, returning the arena and the program's root
    pub fn parse(&self, src: &str) -> Result<(Ast, TermId), ParseError> {
        let mut ast = Ast::new();
        let root = self.parse_into(&mut ast, src)?;
        Ok((ast, root))
    }
    /**
    Parse a program into an existing arena, returning the program's root. On failure, every
    term allocated by the parse is removed from the arena again.

    # Example
    ```rust
    use alpha_tag::parser::Parser;
    use alpha_tag::term::{Ast, Kind};
    let mut ast = Ast::new();
    let parser = Parser::new();
    let root = parser.parse_into(&mut ast, "let f : t = fn x:a. x;").unwrap();
    assert_eq!(ast[root].kind(), Kind::Statement);
    let len = ast.len();
    assert!(parser.parse_into(&mut ast, "let f : t = fn x:a. x").is_err());
    assert_eq!(ast.len(), len);
    ```
    */
    pub fn parse_into(&self, ast: &mut Ast, src: &str) -> Result<TermId, ParseError> {
        let len = ast.len();
        let result = ProgramParser::new(src, ast, &self.options).program();
        if let Err(err) = &result {
            tracing::debug!(
                expected = %err.expected,
                found = %err.found,
                line = err.line,
                column = err.column,
                "parse failed"
            );
            ast.truncate(len);
        }
        result
    }
}

/// Parse a program with the default options
pub fn parse(src: &str) -> Result<(Ast, TermId), ParseError> {
    Parser::new().parse(src)
}

/// Parse a program into an existing arena with the default options
pub fn parse_into(ast: &mut Ast, src: &str) -> Result<TermId, ParseError> {
    Parser::new().parse_into(ast, src)
}

/// The state of a single parse
struct ProgramParser<'s, 'a> {
    lexer: Lexer<'s>,
    next: Token<'s>,
    ast: &'a mut Ast,
    options: &'a ParserOptions,
}

impl<'s, 'a> ProgramParser<'s, 'a> {
    fn new(src: &'s str, ast: &'a mut Ast, options: &'a ParserOptions) -> ProgramParser<'s, 'a> {
        let mut lexer = Lexer::new(src);
        let next = lexer.next_token();
        ProgramParser {
            lexer,
            next,
            ast,
            options,
        }
    }
    #[inline]
    fn peek(&self) -> TokenKind {
        self.next.kind
    }
    fn eat(&mut self) -> Token<'s> {
        std::mem::replace(&mut self.next, self.lexer.next_token())
    }
    /// Consume the next token, which must be of kind `kind`
    fn expect(&mut self, kind: TokenKind) -> Result<Token<'s>, ParseError> {
        if self.peek() == kind {
            Ok(self.eat())
        } else {
            Err(ParseError::new(self.lexer.src(), kind, &self.next))
        }
    }
    /// Parse a whole program, up to the end of the input
    fn program(&mut self) -> Result<TermId, ParseError> {
        if self.peek() != TokenKind::Let {
            let app = self.app()?;
            self.expect(TokenKind::Eof)?;
            return Ok(app);
        }
        // Statements are built back to front once the whole chain is known
        let mut bindings = SmallVec::<[TermId; 8]>::new();
        loop {
            self.expect(TokenKind::Let)?;
            let bind = self.binder()?;
            let binding = if self.peek() == TokenKind::Equal {
                self.eat();
                let value = self.app()?;
                self.ast.assign(bind, value)
            } else {
                self.ast.declaration(bind)
            };
            bindings.push(binding);
            if self.peek() == TokenKind::Semicolon {
                self.eat();
                self.expect(TokenKind::Eof)?;
                break;
            }
            self.expect(TokenKind::In)?;
        }
        let mut rest = None;
        for binding in bindings.into_iter().rev() {
            rest = Some(self.ast.statement(binding, rest));
        }
        Ok(rest.expect("a let-chain has at least one binding"))
    }
    /// Parse a variable
    fn variable(&mut self) -> Result<TermId, ParseError> {
        let token = self.expect(TokenKind::Ident)?;
        let mut name = token.text.as_bytes();
        if let Some(max) = self.options.max_ident_len {
            name = &name[..name.len().min(max)];
        }
        Ok(self.ast.var(Name::new(name)))
    }
    /// Parse a binder, whose type annotation may be omitted
    fn binder(&mut self) -> Result<TermId, ParseError> {
        let var = self.variable()?;
        let ty = if self.peek() == TokenKind::Colon {
            self.eat();
            Some(self.ty()?)
        } else {
            None
        };
        Ok(self.ast.bind(var, ty))
    }
    /// Parse a type. Arrows associate to the right
    fn ty(&mut self) -> Result<TermId, ParseError> {
        let mut domains = SmallVec::<[TermId; 4]>::new();
        loop {
            if self.peek() == TokenKind::Const {
                self.eat();
            }
            domains.push(self.app()?);
            if self.peek() != TokenKind::Arrow {
                break;
            }
            self.eat();
        }
        let mut ty = domains.pop().expect("a type has at least one component");
        while let Some(domain) = domains.pop() {
            ty = self.ast.arrow(domain, ty);
        }
        Ok(ty)
    }
    /// Parse an application, grouping its primaries in pairs
    fn app(&mut self) -> Result<TermId, ParseError> {
        ensure_sufficient_stack(|| {
            let mut primaries = SmallVec::<[TermId; 8]>::new();
            primaries.push(self.primary()?);
            while !self.peek().stops_application() {
                primaries.push(self.primary()?);
            }
            // The last pair (or lone primary) is the innermost application
            let tail = if primaries.len() % 2 == 0 { 2 } else { 1 };
            let mut app = if tail == 2 {
                let (lhs, rhs) = (primaries[primaries.len() - 2], primaries[primaries.len() - 1]);
                self.ast.app(lhs, rhs)
            } else {
                primaries[primaries.len() - 1]
            };
            for pair in primaries[..primaries.len() - tail].chunks(2).rev() {
                let head = self.ast.app(pair[0], pair[1]);
                app = self.ast.app(head, app);
            }
            Ok(app)
        })
    }
    /// Parse a primary: a parenthesized application, a lambda, a variable or an annotated
    /// variable
    fn primary(&mut self) -> Result<TermId, ParseError> {
        match self.peek() {
            TokenKind::OpenParen => {
                self.eat();
                let app = self.app()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(app)
            }
            TokenKind::Fn => {
                self.eat();
                let bind = self.binder()?;
                self.expect(TokenKind::Dot)?;
                let body = self.app()?;
                Ok(self.ast.lambda(bind, body))
            }
            _ => {
                let var = self.variable()?;
                if self.peek() != TokenKind::Colon {
                    return Ok(var);
                }
                self.eat();
                let ty = self.ty()?;
                Ok(self.ast.bind(var, Some(ty)))
            }
        }
    }
}

/*
The actual, conditionally compiled prettyprinter implementation
*/

use super::tokens::*;
use crate::term::{Ast, Kind, NameMap, Term, TermId};
use crate::util::stack::ensure_sufficient_stack;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// A prettyprinter for terms, producing text the parser accepts
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct PrettyPrinter {
    tagged: bool,
}

impl PrettyPrinter {
    /// Create a new prettyprinter
    pub fn new() -> PrettyPrinter {
        PrettyPrinter::default()
    }
    /// Set whether the root of each printed term is prefixed with its tag
    pub fn tagged(mut self, tagged: bool) -> PrettyPrinter {
        self.tagged = tagged;
        self
    }
    /// Whether the root of each printed term is prefixed with its tag
    #[inline]
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }
    /// Prettyprint the tree rooted at `root`
    pub fn print(&self, fmt: &mut Formatter, ast: &Ast, root: TermId) -> Result<(), fmt::Error> {
        if self.tagged {
            write!(fmt, "{} = hash of ", ast[root].tag())?;
        }
        self.print_term(fmt, ast, root)
    }
    /// Prettyprint a subterm, growing the stack if need be
    fn print_nested(&self, fmt: &mut Formatter, ast: &Ast, id: TermId) -> Result<(), fmt::Error> {
        ensure_sufficient_stack(|| self.print_term(fmt, ast, id))
    }
    fn print_term(&self, fmt: &mut Formatter, ast: &Ast, id: TermId) -> Result<(), fmt::Error> {
        let term = &ast[id];
        match term.kind() {
            Kind::Var => write!(fmt, "{}", term.name().expect("variables have a name")),
            Kind::App => {
                let (function, argument) = children(term);
                fmt.write_str(SEXPR_OPEN)?;
                // Otherwise the binder's type or the lambda's body would swallow the argument
                let wrap = match ast[function].kind() {
                    Kind::Lambda | Kind::Bind => true,
                    _ => false,
                };
                if wrap {
                    fmt.write_str(SEXPR_OPEN)?;
                }
                self.print_nested(fmt, ast, function)?;
                if wrap {
                    fmt.write_str(SEXPR_CLOSE)?;
                }
                fmt.write_str(" ")?;
                self.print_nested(fmt, ast, argument)?;
                fmt.write_str(SEXPR_CLOSE)
            }
            Kind::Lambda => {
                let (bind, body) = children(term);
                write!(fmt, "{} ", KEYWORD_FN)?;
                self.print_nested(fmt, ast, bind)?;
                write!(fmt, "{} ", LAMBDA_DOT)?;
                self.print_nested(fmt, ast, body)
            }
            Kind::Bind => {
                self.print_nested(fmt, ast, term.lhs().expect("binders have a variable"))?;
                if let Some(ty) = term.rhs() {
                    write!(fmt, "{} ", JUDGE_TYPE)?;
                    self.print_nested(fmt, ast, ty)?;
                }
                Ok(())
            }
            Kind::Assignment => {
                let (bind, value) = children(term);
                self.print_nested(fmt, ast, bind)?;
                write!(fmt, " {} ", ASSIGN)?;
                self.print_nested(fmt, ast, value)
            }
            Kind::Declaration => {
                self.print_nested(fmt, ast, term.lhs().expect("declarations have a binder"))
            }
            Kind::ArrowType => {
                let (domain, codomain) = children(term);
                self.print_nested(fmt, ast, domain)?;
                write!(fmt, " {} ", ARROW)?;
                self.print_nested(fmt, ast, codomain)
            }
            Kind::Statement => {
                let mut statement = term;
                loop {
                    write!(fmt, "{} ", KEYWORD_LET)?;
                    let binding = statement.lhs().expect("statements have a binding");
                    self.print_nested(fmt, ast, binding)?;
                    match statement.rhs() {
                        Some(rest) => {
                            writeln!(fmt, " {}", KEYWORD_IN)?;
                            statement = &ast[rest];
                        }
                        None => return fmt.write_str(STATEMENT_DELIM),
                    }
                }
            }
        }
    }
}

/// Get both children of a binary term
fn children(term: &Term) -> (TermId, TermId) {
    match (term.lhs(), term.rhs()) {
        (Some(lhs), Some(rhs)) => (lhs, rhs),
        _ => panic!("{} term is missing a child", term.kind()),
    }
}

/// A tree, displayed with a given prettyprinter
#[derive(Debug, Copy, Clone)]
pub struct TermDisplay<'a> {
    ast: &'a Ast,
    root: TermId,
    printer: PrettyPrinter,
}

impl<'a> TermDisplay<'a> {
    /// Display with a different prettyprinter
    pub fn with_printer(self, printer: PrettyPrinter) -> TermDisplay<'a> {
        TermDisplay { printer, ..self }
    }
}

impl Display for TermDisplay<'_> {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        self.printer.print(fmt, self.ast, self.root)
    }
}

impl Ast {
    /**
    Display the tree rooted at `root` as source text

    # Example
    ```rust
    use alpha_tag::term::Ast;
    let mut ast = Ast::new();
    let f = ast.var("f");
    let x = ast.var("x");
    let fx = ast.app(f, x);
    assert_eq!(ast.display(fx).to_string(), "(f x)");
    ```
    */
    pub fn display(&self, root: TermId) -> TermDisplay {
        TermDisplay {
            ast: self,
            root,
            printer: PrettyPrinter::new(),
        }
    }
}

/// Print the tree rooted at `root` as source text
pub fn print_term(ast: &Ast, root: TermId) -> String {
    ast.display(root).to_string()
}

/// Print the tree rooted at `root` as source text, prefixed with its tag
pub fn print_tagged(ast: &Ast, root: TermId) -> String {
    ast.display(root)
        .with_printer(PrettyPrinter::new().tagged(true))
        .to_string()
}

/// Print a free variable map, with each encoded position in hexadecimal, sorted by name
pub fn print_free_vars(free_vars: &NameMap) -> String {
    let entries = free_vars
        .iter()
        .sorted_by(|(left, _), (right, _)| left.as_bytes().cmp(right.as_bytes()))
        .map(|(name, position)| {
            let hex = position
                .as_bytes()
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .join("");
            format!("{}={}", name, hex)
        })
        .join(", ");
    format!("{{{}}}", entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use pretty_assertions::assert_eq;

    #[test]
    fn statements_print_as_lets() {
        let mut ast = Ast::new();
        let f = ast.var("f");
        let t = ast.var("t");
        let u = ast.var("u");
        let ty = ast.arrow(t, u);
        let f_bind = ast.bind(f, Some(ty));
        let x = ast.var("x");
        let x_bind = ast.bind(x, None);
        let body = ast.var("x");
        let lambda = ast.lambda(x_bind, body);
        let assign = ast.assign(f_bind, lambda);
        let g = ast.var("g");
        let g_bind = ast.bind(g, None);
        let decl = ast.declaration(g_bind);
        let last = ast.statement(decl, None);
        let first = ast.statement(assign, Some(last));
        assert_eq!(
            print_term(&ast, first),
            "let f: t -> u = fn x. x in\nlet g;"
        );
    }

    #[test]
    fn applied_lambdas_are_parenthesized() {
        let mut ast = Ast::new();
        let x = ast.var("x");
        let x_bind = ast.bind(x, None);
        let body = ast.var("x");
        let lambda = ast.lambda(x_bind, body);
        let y = ast.var("y");
        let app = ast.app(lambda, y);
        assert_eq!(print_term(&ast, app), "((fn x. x) y)");

        let z = ast.var("z");
        let a = ast.var("a");
        let z_bind = ast.bind(z, Some(a));
        let w = ast.var("w");
        let app = ast.app(z_bind, w);
        assert_eq!(print_term(&ast, app), "((z: a) w)");
    }

    #[test]
    fn tagged_terms_lead_with_their_tag() {
        let mut ast = Ast::new();
        let x = ast.var("x");
        crate::hashing::hash_term(&mut ast, x);
        assert_eq!(print_tagged(&ast, x), format!("{} = hash of x", ast[x].tag()));
    }

    #[test]
    fn free_variables_print_sorted() {
        let map: NameMap = vec![
            (Name::from("y"), Name::new(&[0x16])),
            (Name::from("x"), Name::new(&[0x01])),
        ]
        .into_iter()
        .collect();
        assert_eq!(print_free_vars(&map), "{x=01, y=16}");
        assert_eq!(print_free_vars(&NameMap::new()), "{}");
    }
}

use clap::{App, Arg};
use rustyline::error::ReadlineError;
use rustyline::Editor;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::{map, opt};
use nom::sequence::{delimited, preceded, separated_pair};
use nom::IResult;

use alpha_tag::hashing::{alpha_classes, hash_term_with, HashConfig};
use alpha_tag::parser::Parser;
use alpha_tag::prettyprinter::{print_free_vars, print_tagged};
use alpha_tag::term::{Ast, Kind, TermId};
use tracing_subscriber::EnvFilter;

use std::fs;

/// A repl command
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Include(String),
    IgnoreBinderTypes(bool),
    BindingPositions(bool),
    ShowFreeVars(bool),
    ShowClasses(bool),
}

/// Parse a boolean flag
pub fn parse_bool(input: &str) -> IResult<&str, bool> {
    alt((map(tag("true"), |_| true), map(tag("false"), |_| false)))(input)
}

/// Parse a flag command, which defaults to `true`
fn flag<'a>(
    name: &'static str,
    command: fn(bool) -> Command,
) -> impl Fn(&'a str) -> IResult<&'a str, Command> {
    map(
        separated_pair(tag(name), multispace0, opt(parse_bool)),
        move |(_, b)| command(b.unwrap_or(true)),
    )
}

/// Parse a repl command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    delimited(
        delimited(multispace0, tag("#"), multispace0),
        alt((
            flag("ignore_binder_types", Command::IgnoreBinderTypes),
            flag("binding_positions", Command::BindingPositions),
            flag("free_vars", Command::ShowFreeVars),
            flag("classes", Command::ShowClasses),
            map(
                separated_pair(
                    tag("include"),
                    multispace1,
                    delimited(tag("<"), take_until(">"), tag(">")),
                ),
                |(_, f): (&str, &str)| Command::Include(String::from(f)),
            ),
        )),
        preceded(multispace0, tag(";")),
    )(input)
}

/// A very simple repl which parses, hashes and prints programs
#[derive(Debug)]
pub struct Repl {
    parser: Parser,
    config: HashConfig,
    show_free_vars: bool,
    show_classes: bool,
    prompt: &'static str,
}

const DEFAULT_PROMPT: &str = ">>> ";

impl Repl {
    pub fn new() -> Repl {
        Repl {
            parser: Parser::new(),
            config: HashConfig::default(),
            show_free_vars: false,
            show_classes: false,
            prompt: DEFAULT_PROMPT,
        }
    }
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::IgnoreBinderTypes(b) => {
                self.config = if b {
                    self.config.ignore_binder_types()
                } else {
                    HashConfig {
                        binder_types: Default::default(),
                        ..self.config
                    }
                };
            }
            Command::BindingPositions(b) => {
                self.config = self.config.with_binding_positions(b);
            }
            Command::ShowFreeVars(b) => {
                self.show_free_vars = b;
            }
            Command::ShowClasses(b) => {
                self.show_classes = b;
            }
            Command::Include(f) => match fs::read_to_string(&f) {
                Ok(src) => self.handle_program(&src),
                Err(err) => eprintln!("Error opening file {:?}: {}", f, err),
            },
        }
    }
    /// Print a hashed term, and its free variables if enabled
    fn show(&self, ast: &Ast, id: TermId) {
        println!("{}", print_tagged(ast, id));
        if self.show_free_vars {
            println!("    free: {}", print_free_vars(ast[id].free_vars()));
        }
    }
    pub fn handle_program(&mut self, src: &str) {
        let (mut ast, root) = match self.parser.parse(src) {
            Ok(program) => program,
            Err(err) => {
                eprintln!("{}", err);
                return;
            }
        };
        hash_term_with(&mut ast, root, &self.config);
        // Show each definition of a let-chain on its own
        let mut statement = Some(root).filter(|&root| ast[root].kind() == Kind::Statement);
        if statement.is_none() {
            self.show(&ast, root);
        }
        while let Some(id) = statement {
            let binding = ast[id].lhs().expect("statements have a binding");
            self.show(&ast, binding);
            statement = ast[id].rhs();
        }
        if self.show_classes {
            for (tag, class) in alpha_classes(&ast, root) {
                if class.len() > 1 {
                    println!("{}: {} alpha-equivalent terms", tag, class.len());
                }
            }
        }
    }
    pub fn handle_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        match parse_command(input) {
            Ok((_, command)) => self.handle_command(command),
            Err(_) => self.handle_program(input),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let matches = App::new("alpha-tag repl")
        .version("0.0")
        .about("repl for parsing and hashing programs")
        .arg(
            Arg::with_name("history")
                .short("h")
                .long("history")
                .value_name("FILE")
                .help("Sets a file to save/load history")
                .takes_value(true),
        )
        .get_matches();
    let history = matches.value_of("history");
    let mut rl = Editor::<()>::new();
    let mut repl = Repl::new();
    if let Some(history) = history {
        if rl.load_history(history).is_err() {
            println!("No previous history loaded from {:?}.", history);
        } else {
            println!("Loaded history from {:?}.", history)
        }
    } else {
        println!("No previous history loaded.")
    }
    loop {
        let line = rl.readline(repl.prompt);
        match line {
            Ok(line) => {
                repl.handle_input(line.as_str());
                rl.add_history_entry(line.as_str());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    if let Some(history) = history {
        if let Err(err) = rl.save_history(history) {
            eprintln!("Error saving history to {:?}: {:?}", history, err);
        }
    }
}

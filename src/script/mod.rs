//! Command scripts for driving a layout session
//!
//! One command per line:
//!
//! ```text
//! insert BELL 2 0 as bell   # drop a gate, optionally naming it
//! move g2 5 1               # drag a gate by id or name
//! expand bell               # expand, collapse or toggle the inspected view
//! collapse bell
//! toggle bell
//! show                      # print the grid
//! check                     # verify the layout invariants
//! ```

mod interpreter;
pub mod lexer;

pub use interpreter::{Interpreter, Outcome};
pub use lexer::{Span, Token};

use crate::error::ScriptError;
use crate::layout::GateId;

/// A node with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// How a command refers to a placed gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRef {
    /// `g<n>`, the id the store assigned
    Id(GateId),
    /// A name bound with `as`
    Name(String),
}

impl GateRef {
    fn from_ident(ident: &str) -> Self {
        ident
            .strip_prefix('g')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(|n| GateRef::Id(GateId(n)))
            .unwrap_or_else(|| GateRef::Name(ident.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert {
        gate_type: Spanned<String>,
        x: u32,
        y: u32,
        name: Option<Spanned<String>>,
    },
    Move {
        gate: Spanned<GateRef>,
        x: u32,
        y: u32,
    },
    Expand(Spanned<GateRef>),
    Collapse(Spanned<GateRef>),
    Toggle(Spanned<GateRef>),
    Show,
    Check,
}

/// Parse a whole script
///
/// Every line is parsed even after an error so that all problems are
/// reported at once.
pub fn parse(source: &str) -> Result<Vec<Spanned<Command>>, Vec<ScriptError>> {
    let mut commands = Vec::new();
    let mut errors = Vec::new();
    let mut line: Vec<(Token, Span)> = Vec::new();

    // A line with a lexer error is reported once and not parsed further
    let mut poisoned = false;
    for (token, span) in lexer::lex(source) {
        match token {
            Ok(Token::Newline) => {
                if !poisoned {
                    parse_line(&line, span.start, &mut commands, &mut errors);
                }
                line.clear();
                poisoned = false;
            }
            Ok(token) => line.push((token, span)),
            Err(()) => {
                if !poisoned {
                    errors.push(lex_error(&source[span.clone()], span));
                }
                poisoned = true;
            }
        }
    }
    if !poisoned {
        parse_line(&line, source.len(), &mut commands, &mut errors);
    }

    if errors.is_empty() {
        Ok(commands)
    } else {
        Err(errors)
    }
}

fn lex_error(text: &str, span: Span) -> ScriptError {
    // Digits only fail to lex when they do not fit in a u32
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return ScriptError::Syntax {
            span,
            message: format!("Number {} is out of range", text),
            expected: vec![format!("a number up to {}", u32::MAX)],
        };
    }
    ScriptError::Syntax {
        message: format!("Unexpected character '{}'", text),
        span,
        expected: vec![],
    }
}

fn parse_line(
    line: &[(Token, Span)],
    end: usize,
    commands: &mut Vec<Spanned<Command>>,
    errors: &mut Vec<ScriptError>,
) {
    if line.is_empty() {
        return;
    }
    match LineParser::new(line, end).command() {
        Ok(cmd) => commands.push(cmd),
        Err(err) => errors.push(err),
    }
}

/// Recursive-descent parser over the tokens of one line
struct LineParser<'a> {
    tokens: &'a [(Token, Span)],
    pos: usize,
    /// Offset used for "end of line" errors
    end: usize,
}

impl<'a> LineParser<'a> {
    fn new(tokens: &'a [(Token, Span)], end: usize) -> Self {
        Self { tokens, pos: 0, end }
    }

    fn command(mut self) -> Result<Spanned<Command>, ScriptError> {
        let (keyword, start) = match self.tokens.first() {
            Some((token, span)) => (token.clone(), span.start),
            None => return Err(self.unexpected(&["a command"])),
        };
        self.pos = 1;

        let command = match keyword {
            Token::Insert => {
                let gate_type = self.ident("a gate type")?;
                let x = self.number("a column")?;
                let y = self.number("a row")?;
                let name = if self.eat(&Token::As) {
                    Some(self.ident("a name")?)
                } else {
                    None
                };
                Command::Insert {
                    gate_type,
                    x,
                    y,
                    name,
                }
            }
            Token::Move => {
                let gate = self.gate_ref()?;
                let x = self.number("a column")?;
                let y = self.number("a row")?;
                Command::Move { gate, x, y }
            }
            Token::Expand => Command::Expand(self.gate_ref()?),
            Token::Collapse => Command::Collapse(self.gate_ref()?),
            Token::Toggle => Command::Toggle(self.gate_ref()?),
            Token::Show => Command::Show,
            Token::Check => Command::Check,
            _ => {
                self.pos = 0;
                return Err(self.unexpected(&[
                    "insert", "move", "expand", "collapse", "toggle", "show", "check",
                ]));
            }
        };

        if self.pos < self.tokens.len() {
            return Err(self.unexpected(&["end of line"]));
        }
        let end = self.tokens.last().map(|(_, span)| span.end).unwrap_or(start);
        Ok(Spanned::new(command, start..end))
    }

    fn eat(&mut self, expected: &Token) -> bool {
        match self.tokens.get(self.pos) {
            Some((token, _)) if token == expected => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn ident(&mut self, what: &str) -> Result<Spanned<String>, ScriptError> {
        match self.tokens.get(self.pos) {
            Some((Token::Ident(name), span)) => {
                self.pos += 1;
                Ok(Spanned::new(name.clone(), span.clone()))
            }
            _ => Err(self.unexpected(&[what])),
        }
    }

    fn gate_ref(&mut self) -> Result<Spanned<GateRef>, ScriptError> {
        let ident = self.ident("a gate id or name")?;
        Ok(Spanned::new(GateRef::from_ident(&ident.node), ident.span))
    }

    fn number(&mut self, what: &str) -> Result<u32, ScriptError> {
        match self.tokens.get(self.pos) {
            Some((Token::Number(n), _)) => {
                self.pos += 1;
                Ok(*n)
            }
            _ => Err(self.unexpected(&[what])),
        }
    }

    fn unexpected(&self, expected: &[&str]) -> ScriptError {
        let (found, span) = match self.tokens.get(self.pos) {
            Some((token, span)) => (token.describe(), span.clone()),
            None => ("end of line".to_string(), self.end..self.end),
        };
        ScriptError::Syntax {
            span,
            message: format!("Unexpected {}", found),
            expected: expected.iter().map(|e| e.to_string()).collect(),
        }
    }
}

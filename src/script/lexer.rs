//! Lexer for layout command scripts using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Placement commands
    #[token("insert")]
    #[token("drop")]
    Insert,
    #[token("move")]
    #[token("drag")]
    Move,

    // Expansion commands
    #[token("expand")]
    Expand,
    #[token("collapse")]
    Collapse,
    #[token("toggle")]
    Toggle,

    // Inspection
    #[token("show")]
    Show,
    #[token("check")]
    Check,

    // Binds a name to the gate an insert creates
    #[token("as")]
    As,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),

    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("\n")]
    Newline,
}

impl Token {
    /// Human-readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Insert => "keyword 'insert'".to_string(),
            Token::Move => "keyword 'move'".to_string(),
            Token::Expand => "keyword 'expand'".to_string(),
            Token::Collapse => "keyword 'collapse'".to_string(),
            Token::Toggle => "keyword 'toggle'".to_string(),
            Token::Show => "keyword 'show'".to_string(),
            Token::Check => "keyword 'check'".to_string(),
            Token::As => "keyword 'as'".to_string(),
            Token::Number(n) => format!("number {}", n),
            Token::Ident(s) => format!("identifier '{}'", s),
            Token::Newline => "end of line".to_string(),
        }
    }
}

/// Tokenize a script; `Err` carries the span of unrecognized input
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    // keywords
    If,
    Else,
    While,
    Input,
    Print,
    Return,
    Break,
    Continue,
    // types
    Int,
    Char,
    Void,
    // compound operators
    Eq,
    Neq,
    Leq,
    Geq,
    LAnd,
    LOr,
    // single operators
    Add,
    Sub,
    Star,
    Div,
    Mod,
    Assign,
    Bang,
    Amp,
    Less,
    Great,
    Pipe,
    Comma,
    LParens,
    RParens,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    // literals
    Integer,
    Character,
    String,
    Identifier,
    /// Only synthesized by the parser to tag a call node.
    FuncCall,
}

impl TokenKind {
    pub fn is_type(self) -> bool {
        TYPES.contains(&self)
    }

    pub fn is_arithmetic(self) -> bool {
        ARITHMETIC_OPERATORS.contains(&self)
    }
}

pub const TYPES: [TokenKind; 3] = [TokenKind::Int, TokenKind::Char, TokenKind::Void];

/// Binary operators folded by `Parser::parse_arithmetic`, all on one tier.
pub const ARITHMETIC_OPERATORS: [TokenKind; 15] = [
    TokenKind::LOr,
    TokenKind::LAnd,
    TokenKind::Less,
    TokenKind::Great,
    TokenKind::Leq,
    TokenKind::Geq,
    TokenKind::Eq,
    TokenKind::Neq,
    TokenKind::Add,
    TokenKind::Sub,
    TokenKind::Star,
    TokenKind::Div,
    TokenKind::Mod,
    TokenKind::Pipe,
    TokenKind::Amp,
];

pub const LINE_COMMENT: &str = "//";
pub const STRING_DELIMITER: char = '"';
pub const CHAR_DELIMITER: char = '\'';

lazy_static! {
    pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = [
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("input", TokenKind::Input),
        ("while", TokenKind::While),
        ("print", TokenKind::Print),
        ("return", TokenKind::Return),
        ("break", TokenKind::Break),
        ("continue", TokenKind::Continue),
        ("int", TokenKind::Int),
        ("char", TokenKind::Char),
        ("void", TokenKind::Void),
    ]
    .iter()
    .cloned()
    .collect();
    pub static ref COMPOUND_OPERATORS: HashMap<&'static str, TokenKind> = [
        ("==", TokenKind::Eq),
        ("!=", TokenKind::Neq),
        ("<=", TokenKind::Leq),
        (">=", TokenKind::Geq),
        ("&&", TokenKind::LAnd),
        ("||", TokenKind::LOr),
    ]
    .iter()
    .cloned()
    .collect();
    // `/` is only reached after the line comment check fails at the same spot
    pub static ref SINGLE_OPERATORS: HashMap<&'static str, TokenKind> = [
        ("+", TokenKind::Add),
        ("-", TokenKind::Sub),
        ("*", TokenKind::Star),
        ("/", TokenKind::Div),
        ("%", TokenKind::Mod),
        ("=", TokenKind::Assign),
        ("!", TokenKind::Bang),
        ("&", TokenKind::Amp),
        ("<", TokenKind::Less),
        (">", TokenKind::Great),
        ("|", TokenKind::Pipe),
        (",", TokenKind::Comma),
        ("(", TokenKind::LParens),
        (")", TokenKind::RParens),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        ("{", TokenKind::LBrace),
        ("}", TokenKind::RBrace),
        (";", TokenKind::Semicolon),
    ]
    .iter()
    .cloned()
    .collect();
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Literal {
    Integer(i32),
    Text(String),
    Character(char),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Text(text) => write!(f, "{}", text),
            Literal::Character(c) => write!(f, "{}", c),
        }
    }
}

/// 1-based line and column of the first character of a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Literal,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: Literal) -> Self {
        Self {
            kind,
            value,
            position: Position::default(),
        }
    }

    pub fn text(kind: TokenKind, text: &str) -> Self {
        Self::new(kind, Literal::Text(text.to_string()))
    }

    pub fn integer(value: i32) -> Self {
        Self::new(TokenKind::Integer, Literal::Integer(value))
    }

    pub fn character(value: char) -> Self {
        Self::new(TokenKind::Character, Literal::Character(value))
    }

    pub fn identifier(name: &str) -> Self {
        Self::text(TokenKind::Identifier, name)
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

// where a token was found does not make it a different token
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

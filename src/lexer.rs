use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SyntaxError;
use crate::token::{
    Position, Token, TokenKind, CHAR_DELIMITER, COMPOUND_OPERATORS, KEYWORDS, LINE_COMMENT,
    SINGLE_OPERATORS, STRING_DELIMITER,
};

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"^\s+").unwrap();
    static ref INTEGER_RE: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*").unwrap();
}

const COMPOUND_OPERATOR_SIZE: usize = 2;
const SINGLE_OPERATOR_SIZE: usize = 1;

pub type LexResult<T> = Result<T, SyntaxError>;

/// Scans source text one line at a time into a flat token list.
#[derive(Debug, Default)]
pub struct Lexer {
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lex(mut self, input: &str) -> LexResult<Vec<Token>> {
        // only the newline is stripped, a `\r` before it stays part of the line
        for (index, line) in input.split_terminator('\n').enumerate() {
            self.lex_line(line, index + 1)?;
        }
        Ok(self.tokens)
    }

    fn lex_line(&mut self, line: &str, line_number: usize) -> LexResult<()> {
        let mut offset = 0;
        let mut column = 1;

        while offset < line.len() {
            let rest = &line[offset..];
            let position = Position::new(line_number, column);

            if rest.starts_with(LINE_COMMENT) {
                return Ok(());
            }

            let mut stride = self.scan_compound_operator(rest, position);
            if stride == 0 {
                stride = self.scan_single_operator(rest, position);
            }
            if stride == 0 {
                stride = scan_whitespace(rest);
            }
            if stride == 0 {
                stride = self.scan_literal_string(rest, position)?;
            }
            if stride == 0 {
                stride = self.scan_literal_char(rest, position)?;
            }
            if stride == 0 {
                stride = self.scan_literal_int(rest, position)?;
            }
            if stride == 0 {
                stride = self.scan_keyword_identifier(rest, position);
            }
            if stride == 0 {
                // nothing recognized, drop the character
                stride = rest.chars().next().map_or(1, char::len_utf8);
            }

            column += rest[..stride].chars().count();
            offset += stride;
        }

        Ok(())
    }

    fn scan_table(
        &mut self,
        rest: &str,
        size: usize,
        table: &HashMap<&'static str, TokenKind>,
        position: Position,
    ) -> usize {
        let candidate = match rest.get(..size) {
            Some(candidate) => candidate,
            None => return 0,
        };
        match table.get(candidate) {
            Some(&kind) => {
                self.tokens.push(Token::text(kind, candidate).at(position));
                size
            }
            None => 0,
        }
    }

    fn scan_compound_operator(&mut self, rest: &str, position: Position) -> usize {
        self.scan_table(rest, COMPOUND_OPERATOR_SIZE, &COMPOUND_OPERATORS, position)
    }

    fn scan_single_operator(&mut self, rest: &str, position: Position) -> usize {
        self.scan_table(rest, SINGLE_OPERATOR_SIZE, &SINGLE_OPERATORS, position)
    }

    fn scan_literal_string(&mut self, rest: &str, position: Position) -> LexResult<usize> {
        if !rest.starts_with(STRING_DELIMITER) {
            return Ok(0);
        }
        let body = &rest[STRING_DELIMITER.len_utf8()..];
        let end = body
            .find(STRING_DELIMITER)
            .ok_or(SyntaxError::UnclosedString)?;

        self.tokens
            .push(Token::text(TokenKind::String, &body[..end]).at(position));
        Ok(end + 2 * STRING_DELIMITER.len_utf8())
    }

    /// Only the exact `'<char>'` form is a character literal.
    fn scan_literal_char(&mut self, rest: &str, position: Position) -> LexResult<usize> {
        let mut chars = rest.chars();
        if chars.next() != Some(CHAR_DELIMITER) {
            return Ok(0);
        }
        match (chars.next(), chars.next()) {
            (Some(value), Some(CHAR_DELIMITER)) => {
                self.tokens.push(Token::character(value).at(position));
                Ok(2 * CHAR_DELIMITER.len_utf8() + value.len_utf8())
            }
            _ => Err(SyntaxError::UnclosedChar),
        }
    }

    // A run touching the end of the line has no terminator and is not emitted.
    fn scan_literal_int(&mut self, rest: &str, position: Position) -> LexResult<usize> {
        let digits = match INTEGER_RE.find(rest) {
            Some(m) if m.end() < rest.len() => m.as_str(),
            _ => return Ok(0),
        };
        let value = digits
            .parse::<i32>()
            .map_err(|_| SyntaxError::IntegerOutOfRange(digits.to_string()))?;

        self.tokens.push(Token::integer(value).at(position));
        Ok(digits.len())
    }

    // Same end of line behaviour as integers.
    fn scan_keyword_identifier(&mut self, rest: &str, position: Position) -> usize {
        let word = match WORD_RE.find(rest) {
            Some(m) if m.end() < rest.len() => m.as_str(),
            _ => return 0,
        };
        let kind = KEYWORDS
            .get(word)
            .copied()
            .unwrap_or(TokenKind::Identifier);

        self.tokens.push(Token::text(kind, word).at(position));
        word.len()
    }
}

fn scan_whitespace(rest: &str) -> usize {
    WHITESPACE_RE.find(rest).map_or(0, |m| m.end())
}

/// Lex a whole source text into tokens.
pub fn lex(input: &str) -> LexResult<Vec<Token>> {
    Lexer::new().lex(input)
}

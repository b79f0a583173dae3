//! FILENAME: expr/src/lexer.rs
//! PURPOSE: Scans a raw expression string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It handles
//! whitespace skipping, number parsing, single- and double-quoted string
//! literals with backslash escapes, and identifiers.
//!
//! SUPPORTED DELIMITERS: . ( ) [ ] ,
//! KEYWORDS: true false null (case-sensitive)

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('.') => Token::Dot,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('[') => Token::LBracket,
            Some(']') => Token::RBracket,
            Some(',') => Token::Comma,

            Some(quote @ ('"' | '\'')) => self.read_string(quote),

            Some(ch) if ch.is_ascii_digit() => self.read_number(ch),

            Some(ch) if is_letter(ch) => self.read_identifier(ch),

            // End of input
            None => Token::EOF,

            // Unknown character
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Reads up to the matching quote. An unterminated string is illegal.
    fn read_string(&mut self, quote: char) -> Token {
        let mut result = String::new();
        while let Some(ch) = self.input.next() {
            match ch {
                '\\' => match self.input.next() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(other) => result.push(other),
                    None => break,
                },
                c if c == quote => return Token::String(result),
                c => result.push(c),
            }
        }
        Token::Illegal(quote)
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut is_float = false;

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !is_float && self.digit_follows_dot() {
                is_float = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        if is_float {
            number_str
                .parse::<f64>()
                .map(Token::Float)
                .unwrap_or(Token::Illegal(first_char))
        } else {
            match number_str.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                // Too large for an integer
                Err(_) => number_str
                    .parse::<f64>()
                    .map(Token::Float)
                    .unwrap_or(Token::Illegal(first_char)),
            }
        }
    }

    /// A '.' only continues a number when a digit comes right after it,
    /// so `1.toString()` still lexes as a method call.
    fn digit_follows_dot(&self) -> bool {
        let mut ahead = self.input.clone();
        ahead.next();
        matches!(ahead.peek(), Some(c) if c.is_ascii_digit())
    }

    fn read_identifier(&mut self, first_char: char) -> Token {
        let mut ident = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if is_letter(ch) || ch.is_ascii_digit() {
                ident.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }
}

/// Returns true if `ch` can start an identifier.
fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// True when `name` can be written after a '.' without quoting.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_letter(first) => {}
        _ => return false,
    }
    chars.all(|c| is_letter(c) || c.is_ascii_digit())
        && !matches!(name, "true" | "false" | "null")
}

//! FILENAME: expr/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into an AST.
//! CONTEXT: This is the second stage of the parsing pipeline. It takes tokens
//! from the Lexer and builds an Expression tree that can be evaluated.
//!
//! GRAMMAR:
//!   expression    --> postfix
//!   postfix       --> primary ( "." IDENTIFIER [ "(" arguments? ")" ] | "[" expression "]" )*
//!   primary       --> NUMBER | STRING | BOOLEAN | NULL | IDENTIFIER [ "(" arguments? ")" ]
//!                   | "(" expression ")"
//!   arguments     --> expression ("," expression)*
//!
//! `x["name"]` with a string literal is a field access; any other bracket
//! index becomes `get(x, index)`.

use crate::ast::Expression;
use crate::lexer::Lexer;
use crate::token::Token;
use model::Value;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The Parser struct holds the lexer and current token state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from an input string.
    /// Automatically advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    /// Parses the entire input and returns the AST.
    pub fn parse(&mut self) -> ParseResult<Expression> {
        if self.current_token == Token::EOF {
            return Err(ParseError::new("Empty expression"));
        }

        let expr = self.parse_expression()?;

        // Ensure we consumed all tokens
        if self.current_token != Token::EOF {
            return Err(ParseError::new(format!(
                "Unexpected token after expression: {}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Checks if the current token matches the expected token.
    /// If it matches, advances and returns Ok. Otherwise returns an error.
    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.current_token == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "Expected {}, found {}",
                expected, self.current_token
            )))
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_postfix()
    }

    /// Parses field accesses, bracket indexing and method calls.
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_token {
                Token::Dot => {
                    self.advance();
                    let name = match &self.current_token {
                        Token::Identifier(name) => name.clone(),
                        other => {
                            return Err(ParseError::new(format!(
                                "Expected field name after '.', found {}",
                                other
                            )))
                        }
                    };
                    self.advance();

                    if self.current_token == Token::LParen {
                        let mut args = vec![expr];
                        args.extend(self.parse_arguments()?);
                        expr = Expression::call(name, args);
                    } else {
                        expr = Expression::field(expr, name);
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(Token::RBracket)?;

                    expr = match index {
                        Expression::Literal(Value::Text(name)) => Expression::field(expr, name),
                        other => Expression::call("get", vec![expr, other]),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.current_token.clone();
        match token {
            Token::Integer(n) => {
                self.advance();
                Ok(Expression::literal(n))
            }
            Token::Float(n) => {
                self.advance();
                Ok(Expression::literal(n))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expression::literal(s))
            }
            Token::Boolean(b) => {
                self.advance();
                Ok(Expression::literal(b))
            }
            Token::Null => {
                self.advance();
                Ok(Expression::Literal(Value::Null))
            }
            Token::Identifier(name) => {
                self.advance();
                if self.current_token == Token::LParen {
                    let args = self.parse_arguments()?;
                    Ok(Expression::call(name, args))
                } else {
                    Ok(Expression::Variable(name))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Illegal(ch) => Err(ParseError::new(format!("Illegal character '{}'", ch))),
            other => Err(ParseError::new(format!("Unexpected token: {}", other))),
        }
    }

    /// Parses "(" arguments? ")". The current token must be "(".
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();

        if self.current_token == Token::RParen {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            match self.current_token {
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => {
                    return Err(ParseError::new(format!(
                        "Expected ',' or ')' in argument list, found {}",
                        self.current_token
                    )))
                }
            }
        }
    }
}

/// Convenience function to parse an expression string.
pub fn parse(input: &str) -> ParseResult<Expression> {
    let mut parser = Parser::new(input);
    parser.parse()
}

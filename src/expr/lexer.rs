use std::str::Chars;

use log::trace;

use crate::error::{BayesNetError, Result};

use super::token::{Position, Token, TokenKind};

/// Splits a query string such as `P(W|S,~R)` into tokens.
pub struct Lexer<'a> {
    chars: Chars<'a>,
    /// Last character read but not yet consumed. `None` means end of input.
    peek: Option<char>,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            peek: Some(' '),
            position: Position::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next_token(&mut self) -> Result<Token> {
        // skip whitespace
        while let Some(c @ (' ' | '\t' | '\n' | '\r')) = self.peek {
            if c == '\n' {
                self.position.advance_line();
            }
            self.read_char();
        }

        let kind = match self.peek {
            None => return Ok(Token::new(TokenKind::Eof, self.position)),
            Some('(') => TokenKind::LeftParen,
            Some(')') => TokenKind::RightParen,
            Some(',') => TokenKind::Comma,
            Some('|') => TokenKind::Pipe,
            Some('~') => TokenKind::Not,
            Some(c) if c.is_alphabetic() => return Ok(self.word()),
            Some(c) => {
                return Err(BayesNetError::Lexical {
                    message: format!("Unexpected character '{}'", c),
                    position: self.position,
                });
            }
        };

        let token = Token::new(kind, self.position);
        // operators are consumed whole, so pretend the next read follows whitespace
        self.peek = Some(' ');
        Ok(token)
    }

    /// Scans the whole input, including the trailing end-of-input token
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn word(&mut self) -> Token {
        let start = self.position;
        let mut buf = String::new();
        while let Some(c) = self.peek.filter(|c| c.is_alphanumeric()) {
            buf.push(c);
            self.read_char();
        }
        trace!("scanned word '{}' at {}", buf, start);
        Token::new(TokenKind::Word(buf), start)
    }

    fn read_char(&mut self) {
        self.peek = self.chars.next();
        self.position.advance_character();
    }
}

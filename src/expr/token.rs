use std::fmt;

/// Location of a token inside a query string.
///
/// Lines are 1-based. The character counter starts one position before the
/// first character and is clamped to zero when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    line: usize,
    character: isize,
}

impl Position {
    pub fn new() -> Self {
        Self {
            line: 1,
            character: -1,
        }
    }

    pub(crate) fn advance_character(&mut self) {
        self.character += 1;
    }

    pub(crate) fn advance_line(&mut self) {
        self.line += 1;
        self.character = -1;
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn character(&self) -> usize {
        self.character.max(0) as usize
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, character {}", self.line, self.character())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Comma,
    Pipe,
    Not,
    Word(String),
    Eof,
}

impl TokenKind {
    /// True when both kinds are the same variant, ignoring any word payload
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Not => write!(f, "'~'"),
            TokenKind::Word(_) => write!(f, "a word"),
            TokenKind::Eof => write!(f, "end of input string"),
        }
    }
}

/// A lexical unit together with where it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// The word payload, if this is a word token
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(value) => Some(value),
            _ => None,
        }
    }
}

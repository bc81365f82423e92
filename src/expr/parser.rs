use crate::error::{BayesNetError, Result};
use crate::graph::network::Network;

use super::expression::{Assignment, ParsedQuery, ProbabilityExpression};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Recursive-descent parser for the probability expression language:
///
/// ```text
/// expr      ::= "P" "(" hyp-list ("|" hyp-list)? ")"
/// hyp-list  ::= term ("," term)*
/// term      ::= "~"? word
/// ```
///
/// When bound to a network every referenced word must name one of its
/// variables.
pub struct Parser<'n> {
    network: Option<&'n Network>,
}

impl<'n> Parser<'n> {
    pub fn bound(network: &'n Network) -> Self {
        Self {
            network: Some(network),
        }
    }

    pub fn unbound() -> Self {
        Self { network: None }
    }

    /// Parses a strict expression, rejecting a variable used on both sides
    pub fn parse(&self, text: &str) -> Result<ProbabilityExpression> {
        ProbabilityExpression::try_from(self.parse_query(text)?)
    }

    /// Parses the raw terms of a query without the exclusivity check
    pub fn parse_query(&self, text: &str) -> Result<ParsedQuery> {
        let mut state = ParseState {
            lexer: Lexer::new(text),
            token: Token::new(TokenKind::Eof, Default::default()),
            network: self.network,
        };
        state.advance()?;
        let query = state.expression()?;
        state.expect(&TokenKind::Eof)?;
        Ok(query)
    }
}

struct ParseState<'a, 'n> {
    lexer: Lexer<'a>,
    token: Token,
    network: Option<&'n Network>,
}

impl ParseState<'_, '_> {
    fn expression(&mut self) -> Result<ParsedQuery> {
        let is_p = self
            .token
            .word()
            .is_some_and(|word| word.eq_ignore_ascii_case("p"));
        if !is_p {
            return Err(BayesNetError::Syntax(format!(
                "Syntax error at {}: found {} when expecting P",
                self.token.position, self.token.kind
            )));
        }
        self.advance()?;
        self.expect(&TokenKind::LeftParen)?;
        self.advance()?;

        let mut query = ParsedQuery {
            hypotheses: self.term_list()?,
            evidence: Vec::new(),
        };
        if self.token.kind == TokenKind::Pipe {
            self.advance()?;
            query.evidence = self.term_list()?;
        }

        self.expect(&TokenKind::RightParen)?;
        self.advance()?;
        Ok(query)
    }

    fn term_list(&mut self) -> Result<Vec<Assignment>> {
        let mut terms = vec![self.term()?];
        while self.token.kind == TokenKind::Comma {
            self.advance()?;
            terms.push(self.term()?);
        }
        Ok(terms)
    }

    fn term(&mut self) -> Result<Assignment> {
        let mut value = true;
        if self.token.kind == TokenKind::Not {
            value = false;
            self.advance()?;
        }
        let id = match self.token.word() {
            Some(word) => word.to_string(),
            None => {
                return Err(BayesNetError::Syntax(format!(
                    "Syntax error at {}: found {} when expecting a word",
                    self.token.position, self.token.kind
                )));
            }
        };
        if let Some(network) = self.network {
            if !network.contains(&id) {
                return Err(BayesNetError::Syntax(format!(
                    "The referenced variable {} is not defined",
                    id
                )));
            }
        }
        self.advance()?;
        Ok(Assignment::new(id, value))
    }

    fn advance(&mut self) -> Result<()> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&self, kind: &TokenKind) -> Result<()> {
        if !self.token.kind.same_kind(kind) {
            return Err(BayesNetError::Syntax(format!(
                "Syntax error at {}: found {} when expecting {}",
                self.token.position, self.token.kind, kind
            )));
        }
        Ok(())
    }
}

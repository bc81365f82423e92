use thiserror::Error;

use crate::expr::token::Position;

/// Errors raised while building, populating or querying a network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BayesNetError {
    /// A query string contains a character the lexer cannot scan
    #[error("Lexical error at {position}: {message}")]
    Lexical { message: String, position: Position },

    /// The token stream does not match the query grammar, or names an undefined variable
    #[error("{0}")]
    Syntax(String),

    /// The requested edge would close a cycle
    #[error("The creation of an edge from node '{parent}' to node '{child}' introduces a cycle")]
    Cycle { parent: String, child: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A query was issued before every CPT was fully populated
    #[error("Network not ready: {0}")]
    NotReady(String),

    /// The conditioning event of a query has probability zero
    #[error("Evidence has zero probability: {0}")]
    UndefinedEvidence(String),
}

pub type Result<T> = std::result::Result<T, BayesNetError>;

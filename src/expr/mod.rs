pub mod expression;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use expression::{Assignment, ParsedQuery, ProbabilityExpression};
pub use filter::ProbabilityExpressionFilter;
pub use parser::Parser;

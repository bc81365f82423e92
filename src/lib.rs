#[macro_use]
pub mod common;
pub mod error;
pub mod expr;
pub mod graph;
pub mod inference;
pub mod scenarios;

pub use common::interface::{NetworkListener, ScenarioMaker};
pub use error::{BayesNetError, Result};
pub use expr::{Assignment, ParsedQuery, Parser, ProbabilityExpression, ProbabilityExpressionFilter};
pub use graph::{ConditionalProbabilityTable, Edge, ListenerId, MarginalTable, Network};
pub use inference::{Inferencer, Probability};

pub mod cpt;
pub mod events;
pub mod models;
pub mod network;

pub use cpt::ConditionalProbabilityTable;
pub use events::ListenerId;
pub use models::{Direction, Edge, Marginal, MarginalTable, RandomVariable};
pub use network::Network;

pub mod disease;
pub mod factory;
pub mod sprinkler;

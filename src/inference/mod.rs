pub mod enumeration;
pub mod probability;

pub use enumeration::Inferencer;
pub use probability::Probability;

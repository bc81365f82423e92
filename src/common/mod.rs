pub mod interface;
#[macro_use]
pub mod logging;
pub mod setup;

pub mod config;
pub mod games;
pub mod identifiers;
pub mod logger;
pub mod protocol;
pub mod reporting;

pub use identifiers::*;

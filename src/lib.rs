pub mod cyk;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod loader;
pub mod normalizer;

pub mod config;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod sample;
pub mod stats;

pub use error::{Error, Result};

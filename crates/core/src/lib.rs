pub mod browser;
pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod input;
pub mod logging;
pub mod model;
pub mod query;
pub mod storage;
pub mod symbol;

pub use error::{Result, RstError};

pub mod compiled;
pub mod error;
pub mod manager;
pub mod raw;
pub mod resolved;
pub mod resolver;

pub use error::ConfigError;

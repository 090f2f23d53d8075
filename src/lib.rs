pub mod error;
pub mod logger;
pub mod parser;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RutideError};

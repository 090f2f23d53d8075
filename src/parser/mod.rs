pub mod directive;
pub mod types;

// Re-export commonly used types
pub use directive::{DIRECTIVE_MARKER, parse_content, parse_file};
pub use types::{ExpectedOutcome, ParseError, ParseResult, TestCase};

pub mod recovery_parser;
pub mod sanitizer;
pub mod scoring;

pub use recovery_parser::{parse, ParseError, ParsedFields};
pub use sanitizer::sanitize;
pub use scoring::score;

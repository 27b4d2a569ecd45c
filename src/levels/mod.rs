//! Level data: the text-grid parser and the built-in level set

pub mod builtin;
pub mod parser;

pub use builtin::{builtin_levels, try_builtin_levels};
pub use parser::{LevelParseError, LevelSource, parse_level};

//! confparse Core Library
//!
//! Table-driven parser for INI-style configuration files.
//! Provides the line/section scanner, directory iteration and the built-in
//! value converters (int, bool, string, byte size, percent, string list, float).

pub mod convert;
pub mod error;
pub mod parser;
pub mod strings;

pub use error::{Error, Result};
pub use parser::{
    config_parse, config_parse_dir, ConfigLine, ConfigParser, ConfigParserCallback, ConfigSink,
    ConfigTableItem, ConfigTarget, MAX_SECTIONS,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

//! Upstream Go parsing via tree-sitter.
//!
//! The grammar-level work is delegated to the battle-tested tree-sitter Go
//! grammar; this module only wraps parser construction and syntax-defect
//! detection. The declaration walk itself lives in [`crate::builder`].

pub mod errors;
pub mod parser;

pub use errors::GoParserError;
pub use parser::{DefectNode, GoParser, ParsedSource};

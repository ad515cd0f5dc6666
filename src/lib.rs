//! Semgo: Go declaration-tree parsing for semantic diff/merge tools
//!
//! Turns a Go source buffer into a structural declaration tree with
//! byte-exact, line/column-exact location information, built on the
//! tree-sitter Go grammar.
//!
//! # Architecture
//!
//! Grammar-level parsing is delegated to tree-sitter; the intelligence lives
//! in three passes over its output:
//!
//! 1. the tree builder walks top-level declarations (never descending into
//!    bodies) and produces Container/Terminal nodes;
//! 2. free-floating comments (comments not attached to any declaration)
//!    are classified into adjacent headers, footers, and standalone Comment
//!    terminals via a consume-once comment pool;
//! 3. the span fixer closes every gap between consecutive blocks so that the
//!    union of all spans reconstructs the source byte for byte.
//!
//! A syntax error does not fail the call: the result is a degraded file node
//! carrying the error, so a merge tool can still render something for
//! invalid-but-in-progress source.
//!
//! # Example
//!
//! ```no_run
//! let file = semgo::parse(b"package main\n\nfunc main() {\n}\n", "UTF-8")?;
//! for child in &file.children {
//!     println!("{} {:?}", child.name(), child.kind());
//! }
//! # Ok::<(), semgo::ParseError>(())
//! ```

mod blocks;
mod builder;

pub mod comments;
pub mod encoding;
pub mod export;
pub mod go;
pub mod parse;
pub mod pool;
pub mod position;
pub mod shell;
pub mod tree;

// Re-exports
pub use encoding::DecodeError;
pub use export::to_export;
pub use parse::{parse, ParseError};
pub use tree::{
    ByteSpan, Container, File, Location, LocationSpan, Node, NodeKind, ParsingError, Terminal,
};

//! Thread-local parser pooling.
//!
//! Eliminates redundant parser creation by maintaining a thread-local pool
//! of reusable parsers. Creates a new parser on first use per thread, reuses
//! it for subsequent parses. The pool never affects output: parsing the same
//! buffer twice yields structurally equal trees.

use crate::go::{GoParser, GoParserError};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute a function with the pooled parser instance.
///
/// On first call per thread, creates a new parser. Subsequent calls reuse
/// the same parser instance, avoiding allocation and initialization overhead.
pub fn with_parser<F, R>(f: F) -> Result<R, GoParserError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut opt = cell.borrow_mut();
        if opt.is_none() {
            *opt = Some(GoParser::new()?);
        }
        Ok(f(opt.as_mut().expect("parser was just initialized above")))
    })
}

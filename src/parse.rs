//! The parse entry point and the degraded-output error path.

use log::debug;
use thiserror::Error;

use crate::blocks;
use crate::builder::TreeBuilder;
use crate::comments::CommentPool;
use crate::encoding::{self, DecodeError};
use crate::go::ParsedSource;
use crate::pool;
use crate::position::LineIndex;
use crate::tree::{ByteSpan, File, Location, LocationSpan, ParsingError};

/// Caller errors. Syntax errors are not here: they are embedded inside a
/// successful [`File`] so downstream tooling can still render a node for
/// invalid-but-in-progress source.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

/// Parse a Go source buffer into a declaration tree.
///
/// `encoding` is case-insensitive; `UTF-8` and `WINDOWS-1252` are supported.
/// The call is synchronous and touches no shared mutable state: independent
/// calls may run concurrently on independent threads.
pub fn parse(src: &[u8], encoding: &str) -> Result<File, ParseError> {
    let text = match encoding::decode(src, encoding) {
        Ok(text) => text,
        Err(DecodeError::Unsupported(name)) => {
            return Err(ParseError::UnsupportedEncoding(name));
        }
        Err(err @ DecodeError::InvalidUtf8 { .. }) => {
            return Ok(error_file(err.to_string()));
        }
    };

    let file = pool::with_parser(|parser| match parser.parse_with_source(&text) {
        Ok(parsed) => build_tree(&parsed),
        Err(err) => error_file(err.to_string()),
    })
    .expect("tree-sitter Go grammar failed to initialize");

    Ok(file)
}

fn build_tree(parsed: &ParsedSource<'_>) -> File {
    if let Some(defect) = parsed.first_defect() {
        let line = defect.start_point.row + 1;
        let column = defect.start_point.column + 1;
        let message = if defect.missing {
            format!("{}:{}: missing syntax", line, column)
        } else {
            format!("{}:{}: syntax error", line, column)
        };
        debug!("degrading to error file: {}", message);
        return error_file(message);
    }
    if !parsed.has_package_clause() {
        let message = if parsed.source.trim().is_empty() {
            "1:1: expected 'package', found 'EOF'".to_string()
        } else {
            "1:1: expected 'package' clause".to_string()
        };
        debug!("degrading to error file: {}", message);
        return error_file(message);
    }

    let index = LineIndex::new(parsed.source);
    let comments = CommentPool::collect(parsed.root_node(), parsed.source, &index);
    let mut file = TreeBuilder::build(parsed.root_node(), parsed.source, &index, comments);
    blocks::fix_spans(&mut file, parsed.source.as_bytes(), &index);
    file
}

/// The degraded single-error tree: a renderable file node with no children
/// and exactly one error. Producing it is a successful call.
fn error_file(message: String) -> File {
    let origin = Location::new(1, 0);
    File {
        location_span: LocationSpan::new(origin, origin),
        footer_span: ByteSpan::EMPTY,
        children: Vec::new(),
        parsing_errors: vec![ParsingError {
            location: origin,
            message,
        }],
    }
}

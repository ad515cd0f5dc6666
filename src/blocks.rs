//! Block sequencing and span normalization.
//!
//! The upstream parser spans declarations at token boundaries, leaving
//! inter-token whitespace and trailing newlines unaccounted for. This pass
//! flattens the finished tree into blocks (one per terminal, plus a header
//! and footer block per container) and walks them left to right, closing
//! every gap: each block's start becomes the current cursor offset, so every
//! byte of the source belongs to exactly one node's span and consecutive
//! blocks satisfy `start = previous end + 1`. Start positions (and container
//! end positions) are recomputed from the adjusted offsets through a forward
//! position cursor.

use log::trace;

use crate::position::{LineCursor, LineIndex};
use crate::tree::{ByteSpan, Container, File, Node, Terminal};

/// Normalize all spans of `file` in place. Bytes left over after the last
/// block become the file footer.
pub(crate) fn fix_spans(file: &mut File, src: &[u8], index: &LineIndex) {
    let mut state = FixState {
        offset: 0,
        src,
        cursor: index.cursor(),
    };
    for child in &mut file.children {
        fix_node(child, &mut state);
    }
    if (state.offset as usize) < src.len() {
        file.footer_span = ByteSpan::new(state.offset, src.len() as i64 - 1);
        trace!(
            "file footer block [{}, {}]",
            file.footer_span.start,
            file.footer_span.end
        );
    }
}

struct FixState<'a> {
    offset: i64,
    src: &'a [u8],
    cursor: LineCursor<'a>,
}

fn fix_node(node: &mut Node, state: &mut FixState<'_>) {
    match node {
        Node::Terminal(t) => fix_terminal(t, state),
        Node::Container(c) => fix_container(c, state),
    }
}

fn fix_terminal(t: &mut Terminal, state: &mut FixState<'_>) {
    t.span.start = state.offset;
    t.location_span.start = state.cursor.locate(t.span.start as usize);
    trace!("node block {:?} [{}, {}]", t.name, t.span.start, t.span.end);
    state.offset = t.span.end + 1;
}

fn fix_container(c: &mut Container, state: &mut FixState<'_>) {
    // header block
    c.header_span.start = state.offset;
    c.location_span.start = state.cursor.locate(c.header_span.start as usize);
    if byte_is(state.src, c.header_span.end, |b| b == b'(' || b == b'{')
        && byte_is(state.src, c.header_span.end + 1, |b| b == b'\n')
    {
        c.header_span.end += 1;
    }
    trace!(
        "header block {:?} [{}, {}]",
        c.name,
        c.header_span.start,
        c.header_span.end
    );
    state.offset = c.header_span.end + 1;

    for child in &mut c.children {
        fix_node(child, state);
    }

    // footer block
    c.footer_span.start = state.offset;
    if byte_is(state.src, c.footer_span.end, |b| b == b')' || b == b'}')
        && byte_is(state.src, c.footer_span.end + 1, |b| b == b'\n')
    {
        c.footer_span.end += 1;
    }
    c.location_span.end = state.cursor.locate(c.footer_span.end as usize);
    trace!(
        "footer block {:?} [{}, {}]",
        c.name,
        c.footer_span.start,
        c.footer_span.end
    );
    state.offset = c.footer_span.end + 1;
}

fn byte_is(src: &[u8], offset: i64, pred: impl Fn(u8) -> bool) -> bool {
    offset >= 0 && (offset as usize) < src.len() && pred(src[offset as usize])
}

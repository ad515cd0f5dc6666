//! Comment discovery, grouping, and consume-on-read claiming.
//!
//! tree-sitter reports each comment as an individual node; the Go toolchain's
//! parser merges adjacent comments into groups and attaches doc and trailing
//! comments to declarations. This module reconstructs both behaviors: comment
//! nodes are grouped at pool construction, and every group carries a stable
//! integer id. Claiming removes the id from an index set, so each comment is
//! placed exactly once: folded into a declaration span, folded into a
//! header/footer, or emitted as a standalone Comment terminal.

use std::collections::BTreeSet;

use crate::position::LineIndex;
use crate::tree::{ByteSpan, Location, LocationSpan, NodeKind, Terminal};

/// Comment-name truncation threshold.
const NAME_LIMIT: usize = 10;

/// One comment group: adjacent comments the upstream Go parser would merge.
#[derive(Debug, Clone)]
pub struct CommentGroup {
    /// Byte offset of the first comment's first byte.
    pub start: usize,
    /// Exclusive end offset of the last comment.
    pub end: usize,
    pub start_loc: Location,
    pub end_loc: Location,
    /// Whether the group starts as the only content on its line. Trailing
    /// groups (code before them) never serve as doc comments.
    pub alone: bool,
    /// Marker-stripped text, lines joined with newlines.
    pub text: String,
}

/// The set of all comment groups in a parse, consumable at most once each.
#[derive(Debug)]
pub struct CommentPool {
    groups: Vec<CommentGroup>,
    unclaimed: BTreeSet<usize>,
}

impl CommentPool {
    /// Collect every comment node under `root` and group adjacent ones.
    ///
    /// Grouping: a comment on the same line as the current group always
    /// joins it; a comment on the immediately following line joins only when
    /// both it and the group are alone on their lines.
    pub fn collect(root: tree_sitter::Node<'_>, text: &str, index: &LineIndex) -> CommentPool {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "comment" {
                spans.push((node.start_byte(), node.end_byte()));
                continue;
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }
        spans.sort_unstable();

        let mut groups: Vec<CommentGroup> = Vec::new();
        for (start, end) in spans {
            let start_loc = index.locate(start);
            let end_loc = index.locate(end);
            let alone = alone_on_line(text, start, start_loc.column);
            let piece = strip_markers(&text[start..end]);
            if let Some(group) = groups.last_mut() {
                let joins = start_loc.line == group.end_loc.line
                    || (group.alone && alone && start_loc.line == group.end_loc.line + 1);
                if joins {
                    group.end = end;
                    group.end_loc = end_loc;
                    group.text.push('\n');
                    group.text.push_str(&piece);
                    continue;
                }
            }
            groups.push(CommentGroup {
                start,
                end,
                start_loc,
                end_loc,
                alone,
                text: piece,
            });
        }

        let unclaimed = (0..groups.len()).collect();
        CommentPool { groups, unclaimed }
    }

    /// All unclaimed groups ending strictly before `offset`, in source order,
    /// converted to Comment terminals and claimed in the same step.
    pub fn take_before(&mut self, offset: usize) -> Vec<Terminal> {
        let ids: Vec<usize> = self
            .unclaimed
            .iter()
            .copied()
            .filter(|&id| self.groups[id].end < offset)
            .collect();
        ids.iter().for_each(|id| {
            self.unclaimed.remove(id);
        });
        ids.into_iter().map(|id| self.to_terminal(id)).collect()
    }

    /// Claim the doc comment of a declaration starting on `decl_line`: the
    /// alone-on-line group ending on the line immediately above. Returns the
    /// group's start offset.
    pub fn take_doc(&mut self, decl_line: usize) -> Option<usize> {
        let id = self.unclaimed.iter().copied().find(|&id| {
            let g = &self.groups[id];
            g.alone && g.end_loc.line + 1 == decl_line
        })?;
        self.unclaimed.remove(&id);
        Some(self.groups[id].start)
    }

    /// Claim the trailing comment of a declaration ending on `line`: the
    /// group starting on that line at or after `min_offset`. Returns the
    /// group's exclusive end offset.
    pub fn take_trailing(&mut self, line: usize, min_offset: usize) -> Option<usize> {
        let id = self.unclaimed.iter().copied().find(|&id| {
            let g = &self.groups[id];
            g.start_loc.line == line && g.start >= min_offset
        })?;
        self.unclaimed.remove(&id);
        Some(self.groups[id].end)
    }

    /// Claim every group lying fully inside `[start, end)`. Used to fold
    /// comments inside function bodies and composite values into the
    /// covering terminal's span.
    pub fn claim_within(&mut self, start: usize, end: usize) {
        let ids: Vec<usize> = self
            .unclaimed
            .iter()
            .copied()
            .filter(|&id| self.groups[id].start >= start && self.groups[id].end <= end)
            .collect();
        for id in ids {
            self.unclaimed.remove(&id);
        }
    }

    /// Everything still unclaimed, in source order, as claimed terminals.
    /// The end-of-walk sweep; unlike [`take_before`](Self::take_before) it
    /// also picks up a comment ending exactly at end of buffer.
    pub fn drain_remaining(&mut self) -> Vec<Terminal> {
        let ids: Vec<usize> = std::mem::take(&mut self.unclaimed).into_iter().collect();
        ids.into_iter().map(|id| self.to_terminal(id)).collect()
    }

    /// Number of groups not yet claimed.
    pub fn remaining(&self) -> usize {
        self.unclaimed.len()
    }

    fn to_terminal(&self, id: usize) -> Terminal {
        let g = &self.groups[id];
        Terminal {
            kind: NodeKind::Comment,
            name: ellipsize(g.text.trim()),
            location_span: LocationSpan::new(g.start_loc, g.end_loc),
            span: ByteSpan::new(g.start as i64, g.end as i64),
        }
    }
}

fn alone_on_line(text: &str, start: usize, column: usize) -> bool {
    text[start - column..start]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
}

/// Strip `//` and `/* */` markers the way the Go toolchain's
/// `CommentGroup.Text` does, keeping inner lines.
fn strip_markers(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("//") {
        rest.strip_prefix(' ').unwrap_or(rest).to_string()
    } else if let Some(rest) = raw.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest).trim().to_string()
    } else {
        raw.to_string()
    }
}

fn ellipsize(s: &str) -> String {
    let mut chars = s.chars();
    let prefix: String = chars.by_ref().take(NAME_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", prefix)
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::GoParser;

    fn pool_for(source: &str) -> (CommentPool, LineIndex) {
        let index = LineIndex::new(source);
        let mut parser = GoParser::new().unwrap();
        let parsed = parser.parse_with_source(source).unwrap();
        let pool = CommentPool::collect(parsed.root_node(), source, &index);
        (pool, index)
    }

    #[test]
    fn consecutive_line_comments_group() {
        let src = "// first line\n// second line\n\npackage main\n";
        let (mut pool, _) = pool_for(src);
        assert_eq!(pool.remaining(), 1);

        let terminals = pool.take_before(30);
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].name, "first line...");
        assert_eq!(terminals[0].span, ByteSpan::new(0, 28));
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn blank_line_splits_groups() {
        let src = "// first\n\n// second\npackage main\n";
        let (pool, _) = pool_for(src);
        assert_eq!(pool.remaining(), 2);
    }

    #[test]
    fn trailing_comment_does_not_group_with_next_line() {
        let src = "package main\n\nvar x = 1 // trailing\n// next doc\nvar y = 2\n";
        let (mut pool, index) = pool_for(src);
        assert_eq!(pool.remaining(), 2);

        // the trailing group covers only its own line
        let line = index.locate(23).line;
        let end = pool.take_trailing(line, 23).unwrap();
        assert_eq!(end, 35);
        assert_eq!(&src[24..end], "// trailing");
    }

    #[test]
    fn doc_claim_requires_adjacent_alone_group() {
        let src = "package main\n\n// doc for f\nfunc f() {\n}\n";
        let (mut pool, index) = pool_for(src);
        let func_line = index.locate(27).line;
        let start = pool.take_doc(func_line).unwrap();
        assert_eq!(start, 14);
        assert!(pool.take_doc(func_line).is_none());
    }

    #[test]
    fn claim_within_consumes_body_comments() {
        let src = "package main\n\nfunc f() {\n\t// inside\n}\n";
        let (mut pool, _) = pool_for(src);
        assert_eq!(pool.remaining(), 1);
        pool.claim_within(14, src.len());
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn drain_picks_up_comment_at_eof() {
        let src = "package main\n// the very end";
        let (mut pool, _) = pool_for(src);
        // strict before-EOF query misses it, drain does not
        assert!(pool.take_before(src.len()).is_empty());
        let rest = pool.drain_remaining();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "the very e...");
    }

    #[test]
    fn short_names_are_not_ellipsized() {
        assert_eq!(ellipsize("short"), "short");
        assert_eq!(ellipsize("exactly 10"), "exactly 10");
        assert_eq!(ellipsize("longer than ten"), "longer tha...");
    }

    #[test]
    fn block_comment_markers_stripped() {
        assert_eq!(strip_markers("/* inner */"), "inner");
        assert_eq!(strip_markers("// spaced"), "spaced");
        assert_eq!(strip_markers("//bare"), "bare");
    }
}

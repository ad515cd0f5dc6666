//! Declaration-tree construction.
//!
//! Walks the top-level declarations of a parsed Go file in source order,
//! creating Container and Terminal nodes. An explicit frame stack tracks the
//! container under construction for grouped declarations and struct/interface
//! bodies; function bodies and expressions are never descended into.
//!
//! Free-floating comments preceding each node are classified into the current
//! parent before the node is appended: merge into a previous container's
//! footer, merge into the current container's header, fold into the parent's
//! footer, or stand alone as Comment terminals. The order of those attempts
//! is what lets closing-brace trailing comments and pre-opening-brace
//! comments disappear into adjacent spans instead of becoming visible nodes.

use tree_sitter::Node as TsNode;

use crate::comments::CommentPool;
use crate::position::LineIndex;
use crate::tree::{ByteSpan, Container, File, LocationSpan, Node, NodeKind, Terminal};

pub struct TreeBuilder<'a> {
    text: &'a str,
    index: &'a LineIndex,
    pool: CommentPool,
    file: File,
    frames: Vec<Frame>,
}

/// A container being filled, plus the offset of its closing delimiter where
/// inner free-floating comments are collected on leave.
struct Frame {
    container: Container,
    close_offset: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Build the declaration tree for `root`. Spans are still the upstream
    /// token spans; the block fixer normalizes them afterwards.
    pub fn build(
        root: TsNode<'_>,
        text: &'a str,
        index: &'a LineIndex,
        pool: CommentPool,
    ) -> File {
        let file = File {
            location_span: LocationSpan::new(index.locate(0), index.locate(index.len() - 1)),
            footer_span: ByteSpan::EMPTY,
            children: Vec::new(),
            parsing_errors: Vec::new(),
        };
        let mut builder = TreeBuilder {
            text,
            index,
            pool,
            file,
            frames: Vec::new(),
        };

        let mut cursor = root.walk();
        let decls: Vec<TsNode<'_>> = root
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();
        for decl in decls {
            builder.walk_decl(decl);
        }

        let rest = builder.pool.drain_remaining();
        builder.classify_ffc(rest);
        builder.file
    }

    fn walk_decl(&mut self, decl: TsNode<'_>) {
        match decl.kind() {
            "package_clause" => self.add_package(decl),
            "function_declaration" | "method_declaration" => self.add_function(decl),
            "import_declaration" => self.add_import_decl(decl),
            "const_declaration" => self.add_value_decl(decl, NodeKind::Const, "const"),
            "var_declaration" => self.add_value_decl(decl, NodeKind::Var, "var"),
            "type_declaration" => self.add_type_decl(decl),
            other => panic!("unexpected top-level declaration: {}", other),
        }
    }

    // package foo: one Package terminal, first declaration child of File.
    // Comments before the clause (and before its doc comment) become leading
    // Comment terminals.
    fn add_package(&mut self, clause: TsNode<'_>) {
        let name_node = clause
            .named_children(&mut clause.walk())
            .find(|n| n.kind() == "package_identifier")
            .expect("package clause without identifier");
        let name = self.node_text(name_node).to_string();

        let mut pos = clause.start_byte();
        if let Some(doc_start) = self.pool.take_doc(self.index.locate(pos).line) {
            pos = doc_start;
        }
        let leading = self.pool.take_before(pos);
        for comment in leading {
            self.file.children.push(Node::Terminal(comment));
        }
        let terminal = self.terminal(NodeKind::Package, name, pos, name_node.end_byte());
        self.file.children.push(Node::Terminal(terminal));
    }

    fn add_function(&mut self, decl: TsNode<'_>) {
        let name = self.field_text(decl, "name");
        let start = decl.start_byte();
        let end = decl.end_byte();
        self.pool.take_doc(self.index.locate(start).line);
        self.pool.claim_within(start, end);

        let terminal = self.terminal(NodeKind::Function, name, start, end);
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.add_node(Node::Terminal(terminal));
    }

    fn add_import_decl(&mut self, decl: TsNode<'_>) {
        let mut cursor = decl.walk();
        let list = decl
            .named_children(&mut cursor)
            .find(|n| n.kind() == "import_spec_list");
        match list {
            Some(list) => {
                let (lparen, rparen) = paren_offsets(list);
                self.enter_group(decl, NodeKind::Import, "import", lparen, rparen);
                let mut specs = list.walk();
                let members: Vec<TsNode<'_>> = list
                    .named_children(&mut specs)
                    .filter(|n| n.kind() == "import_spec")
                    .collect();
                for spec in members {
                    self.add_import_spec(spec);
                }
                self.leave_group();
            }
            None => {
                let spec = decl
                    .named_children(&mut decl.walk())
                    .find(|n| n.kind() == "import_spec")
                    .expect("import declaration without spec");
                self.add_import_spec(spec);
            }
        }
    }

    // Import spans start at the spec (after the keyword for single imports);
    // names are the unquoted path.
    fn add_import_spec(&mut self, spec: TsNode<'_>) {
        let path = spec
            .child_by_field_name("path")
            .expect("import spec without path");
        let raw = self.node_text(path);
        let name = raw[1..raw.len() - 1].to_string();

        let start = spec.start_byte();
        let mut end = spec.end_byte();
        self.pool.take_doc(self.index.locate(start).line);
        if let Some(comment_end) = self
            .pool
            .take_trailing(self.index.locate(end).line, end)
        {
            end = comment_end;
        }

        let terminal = self.terminal(NodeKind::Import, name, start, end);
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.add_node(Node::Terminal(terminal));
    }

    fn add_value_decl(&mut self, decl: TsNode<'_>, kind: NodeKind, keyword: &str) {
        let spec_kind = match kind {
            NodeKind::Const => "const_spec",
            NodeKind::Var => "var_spec",
            _ => unreachable!(),
        };
        if has_token(decl, "(") {
            let (lparen, rparen) = paren_offsets(decl);
            self.enter_group(decl, kind, keyword, lparen, rparen);
            let mut cursor = decl.walk();
            let members: Vec<TsNode<'_>> = decl
                .named_children(&mut cursor)
                .filter(|n| n.kind() == spec_kind)
                .collect();
            for spec in members {
                self.add_value_spec(spec, kind, spec.start_byte(), spec.end_byte());
            }
            self.leave_group();
        } else {
            let spec = decl
                .named_children(&mut decl.walk())
                .find(|n| n.kind() == spec_kind)
                .expect("value declaration without spec");
            // single declarations span from the keyword
            self.add_value_spec(spec, kind, decl.start_byte(), decl.end_byte());
        }
    }

    fn add_value_spec(&mut self, spec: TsNode<'_>, kind: NodeKind, start: usize, mut end: usize) {
        let name = self.field_text(spec, "name");
        self.pool.take_doc(self.index.locate(start).line);
        if let Some(comment_end) = self
            .pool
            .take_trailing(self.index.locate(end).line, end)
        {
            end = comment_end;
        }
        self.pool.claim_within(start, end);

        let terminal = self.terminal(kind, name, start, end);
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.add_node(Node::Terminal(terminal));
    }

    fn add_type_decl(&mut self, decl: TsNode<'_>) {
        let is_spec = |n: &TsNode<'_>| n.kind() == "type_spec" || n.kind() == "type_alias";
        if has_token(decl, "(") {
            let (lparen, rparen) = paren_offsets(decl);
            self.enter_group(decl, NodeKind::Type, "type", lparen, rparen);
            let mut cursor = decl.walk();
            let members: Vec<TsNode<'_>> =
                decl.named_children(&mut cursor).filter(is_spec).collect();
            for spec in members {
                self.add_type_spec(spec, None);
            }
            self.leave_group();
        } else {
            let spec = decl
                .named_children(&mut decl.walk())
                .find(is_spec)
                .expect("type declaration without spec");
            self.add_type_spec(spec, Some(decl));
        }
    }

    // A type spec is a Struct/Interface container when its right-hand side is
    // a struct or interface type, a plain Type terminal otherwise. For specs
    // nested in a `type (...)` group the span starts at the spec itself and
    // ends at the closing brace.
    fn add_type_spec(&mut self, spec: TsNode<'_>, decl: Option<TsNode<'_>>) {
        let name = self.field_text(spec, "name");
        let ty = spec
            .child_by_field_name("type")
            .expect("type spec without type");

        let (kind, braces) = match ty.kind() {
            "struct_type" => {
                let list = ty
                    .named_children(&mut ty.walk())
                    .find(|n| n.kind() == "field_declaration_list")
                    .expect("struct type without field list");
                (NodeKind::Struct, Some(brace_offsets(list)))
            }
            "interface_type" => (NodeKind::Interface, Some(brace_offsets(ty))),
            _ => (NodeKind::Type, None),
        };

        let Some((open, close)) = braces else {
            // plain named type
            let (start, mut end) = match decl {
                Some(decl) => (decl.start_byte(), decl.end_byte()),
                None => (spec.start_byte(), spec.end_byte()),
            };
            self.pool.take_doc(self.index.locate(start).line);
            if let Some(comment_end) = self
                .pool
                .take_trailing(self.index.locate(end).line, end)
            {
                end = comment_end;
            }
            self.pool.claim_within(start, end);

            let terminal = self.terminal(NodeKind::Type, name, start, end);
            let ffc = self.pool.take_before(start);
            self.classify_ffc(ffc);
            self.add_node(Node::Terminal(terminal));
            return;
        };

        let (start, mut end) = match decl {
            Some(decl) => (decl.start_byte(), decl.end_byte()),
            None => (spec.start_byte(), close),
        };
        self.pool.take_doc(self.index.locate(start).line);
        if let Some(comment_end) = self
            .pool
            .take_trailing(self.index.locate(close).line, close + 1)
        {
            end = comment_end;
        }

        let container = Container {
            kind,
            name,
            location_span: LocationSpan::new(self.index.locate(start), self.index.locate(end)),
            header_span: ByteSpan::new(start as i64, open as i64),
            footer_span: ByteSpan::new(close as i64, end as i64),
            children: Vec::new(),
        };
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.frames.push(Frame {
            container,
            close_offset: close,
        });

        match kind {
            NodeKind::Struct => {
                let list = ty
                    .named_children(&mut ty.walk())
                    .find(|n| n.kind() == "field_declaration_list")
                    .expect("struct type without field list");
                let mut cursor = list.walk();
                let fields: Vec<TsNode<'_>> = list
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "field_declaration")
                    .collect();
                for field in fields {
                    self.add_member(field);
                }
            }
            NodeKind::Interface => {
                let mut cursor = ty.walk();
                let members: Vec<TsNode<'_>> = ty
                    .named_children(&mut cursor)
                    .filter(|n| {
                        matches!(n.kind(), "method_elem" | "method_spec" | "type_elem")
                    })
                    .collect();
                for member in members {
                    self.add_member(member);
                }
            }
            _ => unreachable!(),
        }

        self.leave_frame();
    }

    // Struct fields and interface methods/embeds become Field terminals.
    // Anonymous members are named by their type text.
    fn add_member(&mut self, member: TsNode<'_>) {
        let name = match member.child_by_field_name("name") {
            Some(name) => self.node_text(name).to_string(),
            None => match member.child_by_field_name("type") {
                Some(ty) => self.node_text(ty).to_string(),
                None => self.node_text(member).trim().to_string(),
            },
        };

        let start = member.start_byte();
        let mut end = member.end_byte();
        self.pool.take_doc(self.index.locate(start).line);
        if let Some(comment_end) = self
            .pool
            .take_trailing(self.index.locate(end).line, end)
        {
            end = comment_end;
        }
        self.pool.claim_within(start, end);

        let terminal = self.terminal(NodeKind::Field, name, start, end);
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.add_node(Node::Terminal(terminal));
    }

    /// Open a grouped declaration container: header through the opening
    /// paren, footer from the closing paren through declaration end.
    fn enter_group(
        &mut self,
        decl: TsNode<'_>,
        kind: NodeKind,
        keyword: &str,
        lparen: usize,
        rparen: usize,
    ) {
        let start = decl.start_byte();
        let end = decl.end_byte();
        self.pool.take_doc(self.index.locate(start).line);

        let container = Container {
            kind,
            name: keyword.to_string(),
            location_span: LocationSpan::new(self.index.locate(start), self.index.locate(end)),
            header_span: ByteSpan::new(start as i64, lparen as i64),
            footer_span: ByteSpan::new(rparen as i64, end as i64),
            children: Vec::new(),
        };
        let ffc = self.pool.take_before(start);
        self.classify_ffc(ffc);
        self.frames.push(Frame {
            container,
            close_offset: rparen,
        });
    }

    fn leave_group(&mut self) {
        self.leave_frame();
    }

    /// Collect comments still floating before the closing delimiter into the
    /// open container, then append it to its parent.
    fn leave_frame(&mut self) {
        let close = self
            .frames
            .last()
            .expect("leave without open container")
            .close_offset;
        let ffc = self.pool.take_before(close);
        self.classify_ffc(ffc);

        let frame = self.frames.pop().expect("leave without open container");
        self.add_node(Node::Container(frame.container));
    }

    fn add_node(&mut self, node: Node) {
        match self.frames.last_mut() {
            Some(frame) => frame.container.children.push(node),
            None => self.file.children.push(node),
        }
    }

    /// Fold a list of pending free-floating comments into the current
    /// parent. The attempt order is load-bearing:
    /// previous-sibling merge, header merge, footer merge, standalone.
    fn classify_ffc(&mut self, mut ffc: Vec<Terminal>) {
        if ffc.is_empty() {
            return;
        }
        match self.frames.last_mut() {
            Some(frame) => {
                let pc = &mut frame.container;
                if pc.children.is_empty() {
                    // cover cases like: type ( // comment...
                    if ffc[0].location_span.start.line == pc.location_span.start.line {
                        pc.header_span.end = ffc[0].span.end;
                        ffc.remove(0);
                    }
                } else if merge_into_prev_container(
                    pc.children.last_mut().expect("children checked non-empty"),
                    &ffc[0],
                ) {
                    ffc.remove(0);
                }
                if ffc.is_empty() {
                    return;
                }
                // a comment ending just above the closing delimiter belongs
                // to the footer, not the child list
                let last = ffc.last().expect("ffc checked non-empty");
                if last.location_span.end.line + 1 == pc.location_span.end.line {
                    pc.footer_span.start = last.span.start;
                    ffc.pop();
                }
                for comment in ffc {
                    pc.children.push(Node::Terminal(comment));
                }
            }
            None => {
                let file = &mut self.file;
                if let Some(last_child) = file.children.last_mut() {
                    if merge_into_prev_container(last_child, &ffc[0]) {
                        ffc.remove(0);
                        if ffc.is_empty() {
                            return;
                        }
                    }
                }
                // a comment running to the last line of the file becomes the
                // file footer
                let last = ffc.last().expect("ffc checked non-empty");
                if last.location_span.end.line == file.location_span.end.line {
                    file.footer_span.start = last.span.start;
                    ffc.pop();
                }
                for comment in ffc {
                    file.children.push(Node::Terminal(comment));
                }
            }
        }
    }

    fn terminal(&self, kind: NodeKind, name: String, start: usize, end: usize) -> Terminal {
        Terminal {
            kind,
            name,
            location_span: LocationSpan::new(self.index.locate(start), self.index.locate(end)),
            span: ByteSpan::new(start as i64, end as i64),
        }
    }

    fn node_text(&self, node: TsNode<'_>) -> &'a str {
        &self.text[node.byte_range()]
    }

    fn field_text(&self, node: TsNode<'_>, field: &str) -> String {
        match node.child_by_field_name(field) {
            Some(child) => self.node_text(child).to_string(),
            None => String::new(),
        }
    }
}

/// Merge a free-floating comment into the previous sibling when that sibling
/// is a brace/paren-closing container and the comment sits on its closing
/// line, covering:
///
/// ```text
/// ) // free-floating comment...
/// } // free-floating comment...
/// ```
fn merge_into_prev_container(last_child: &mut Node, ffc: &Terminal) -> bool {
    let Node::Container(container) = last_child else {
        return false;
    };
    match container.kind {
        NodeKind::Struct
        | NodeKind::Interface
        | NodeKind::Const
        | NodeKind::Import
        | NodeKind::Type
        | NodeKind::Var => {
            if ffc.location_span.start.line == container.location_span.end.line {
                container.location_span.end.column = ffc.location_span.end.column;
                container.footer_span.end = ffc.span.end;
                return true;
            }
            false
        }
        _ => false,
    }
}

/// Byte offsets of the opening and closing parens among a node's children.
fn paren_offsets(node: TsNode<'_>) -> (usize, usize) {
    (
        token_offset(node, "("),
        token_offset(node, ")"),
    )
}

/// Byte offsets of the opening and closing braces among a node's children.
fn brace_offsets(node: TsNode<'_>) -> (usize, usize) {
    (
        token_offset(node, "{"),
        token_offset(node, "}"),
    )
}

fn token_offset(node: TsNode<'_>, token: &str) -> usize {
    let mut cursor = node.walk();
    let offset = node.children(&mut cursor)
        .find(|n| n.kind() == token)
        .unwrap_or_else(|| panic!("expected '{}' in {}", token, node.kind()))
        .start_byte();
    offset
}

fn has_token(node: TsNode<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|n| n.kind() == token);
    found
}

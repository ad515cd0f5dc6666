use crate::go::errors::GoParserError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for Go source code.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, GoParserError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = SupportLang::Go.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| GoParserError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, GoParserError> {
        self.parser
            .parse(source, None)
            .ok_or(GoParserError::ParseFailed)
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, GoParserError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new().expect("failed to create default GoParser")
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_defects(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// The first ERROR or MISSING node in the tree, in source order.
    pub fn first_defect(&self) -> Option<DefectNode> {
        first_defect_node(self.tree.root_node())
    }

    /// Whether the file opens with a package clause.
    pub fn has_package_clause(&self) -> bool {
        let root = self.root_node();
        let mut cursor = root.walk();
        let found = root.named_children(&mut cursor)
            .any(|n| n.kind() == "package_clause");
        found
    }

    /// Extract text for a node's byte range.
    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct DefectNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub missing: bool,
}

fn first_defect_node(node: tree_sitter::Node<'_>) -> Option<DefectNode> {
    if node.is_error() || node.is_missing() {
        return Some(DefectNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            missing: node.is_missing(),
        });
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(defect) = first_defect_node(child) {
            return Some(defect);
        }
    }

    None
}

//! Export DTOs with the field names downstream consumers expect.
//!
//! The tree itself stays format-agnostic; these types pin the external
//! vocabulary (`type` discriminant, camelCase span names, `children` and
//! `parsingErrors` omitted when empty, derived `parsingErrorsDetected` flag)
//! and serialize to YAML or any other serde format.

use serde::Serialize;

use crate::tree::{ByteSpan, File, LocationSpan, Node, ParsingError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExport {
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub name: String,
    pub location_span: LocationSpanExport,
    pub footer_span: [i64; 2],
    pub parsing_errors_detected: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeExport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parsing_errors: Vec<ParsingErrorExport>,
}

#[derive(Debug, Serialize)]
pub struct LocationSpanExport {
    pub start: [usize; 2],
    pub end: [usize; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NodeExport {
    Container(ContainerExport),
    Terminal(TerminalExport),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerExport {
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub name: String,
    pub location_span: LocationSpanExport,
    pub header_span: [i64; 2],
    pub footer_span: [i64; 2],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeExport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalExport {
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub name: String,
    pub location_span: LocationSpanExport,
    pub span: [i64; 2],
}

#[derive(Debug, Serialize)]
pub struct ParsingErrorExport {
    pub location: [usize; 2],
    pub message: String,
}

/// Map a parsed [`File`] to its external form. `name` is the path the
/// driving layer associates with the buffer.
pub fn to_export(file: &File, name: &str) -> FileExport {
    FileExport {
        node_type: "file",
        name: name.to_string(),
        location_span: location_span(file.location_span),
        footer_span: byte_span(file.footer_span),
        parsing_errors_detected: file.has_errors(),
        children: file.children.iter().map(node).collect(),
        parsing_errors: file.parsing_errors.iter().map(parsing_error).collect(),
    }
}

fn node(node: &Node) -> NodeExport {
    match node {
        Node::Container(c) => NodeExport::Container(ContainerExport {
            node_type: c.kind.as_str(),
            name: c.name.clone(),
            location_span: location_span(c.location_span),
            header_span: byte_span(c.header_span),
            footer_span: byte_span(c.footer_span),
            children: c.children.iter().map(self::node).collect(),
        }),
        Node::Terminal(t) => NodeExport::Terminal(TerminalExport {
            node_type: t.kind.as_str(),
            name: t.name.clone(),
            location_span: location_span(t.location_span),
            span: byte_span(t.span),
        }),
    }
}

fn parsing_error(err: &ParsingError) -> ParsingErrorExport {
    ParsingErrorExport {
        location: [err.location.line, err.location.column],
        message: err.message.clone(),
    }
}

fn location_span(span: LocationSpan) -> LocationSpanExport {
    LocationSpanExport {
        start: [span.start.line, span.start.column],
        end: [span.end.line, span.end.column],
    }
}

fn byte_span(span: ByteSpan) -> [i64; 2] {
    [span.start, span.end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn file_export_shape() {
        let file = parse(b"package main\n\nfunc main() {\n}\n", "UTF-8").unwrap();
        let export = to_export(&file, "main.go");
        let yaml = serde_yaml::to_string(&export).unwrap();

        assert!(yaml.contains("type: file"));
        assert!(yaml.contains("name: main.go"));
        assert!(yaml.contains("parsingErrorsDetected: false"));
        assert!(yaml.contains("type: Package"));
        assert!(yaml.contains("type: Function"));
        assert!(yaml.contains("locationSpan"));
        assert!(yaml.contains("footerSpan"));
        assert!(!yaml.contains("parsingErrors:"));
    }

    #[test]
    fn error_export_shape() {
        let file = parse(b"", "UTF-8").unwrap();
        let export = to_export(&file, "broken.go");
        let yaml = serde_yaml::to_string(&export).unwrap();

        assert!(yaml.contains("parsingErrorsDetected: true"));
        assert!(yaml.contains("parsingErrors:"));
        assert!(yaml.contains("1:1"));
        assert!(!yaml.contains("children:"));
    }

    #[test]
    fn external_kind_vocabulary() {
        let file = parse(
            b"package main\n\nconst n = 1\nvar x = 2\n",
            "UTF-8",
        )
        .unwrap();
        let yaml = serde_yaml::to_string(&to_export(&file, "kinds.go")).unwrap();
        assert!(yaml.contains("type: Constant"));
        assert!(yaml.contains("type: Variable"));
    }
}

//! Whole-tree expectations for grouped `( ... )` declarations.

use semgo::{
    parse, ByteSpan, Container, File, Location, LocationSpan, Node, NodeKind, Terminal,
};

fn location_span(
    start_line: usize,
    start_column: usize,
    end_line: usize,
    end_column: usize,
) -> LocationSpan {
    LocationSpan::new(
        Location::new(start_line, start_column),
        Location::new(end_line, end_column),
    )
}

fn terminal(
    kind: NodeKind,
    name: &str,
    span: ByteSpan,
    location_span: LocationSpan,
) -> Node {
    Node::Terminal(Terminal {
        kind,
        name: name.to_string(),
        location_span,
        span,
    })
}

#[test]
fn grouped_const() {
    let src = "package groupedconst\n\nconst (\n\tN = 1\n\tName = \"x\"\n)\n";
    let file = parse(src.as_bytes(), "UTF-8").unwrap();

    assert_eq!(
        file,
        File {
            location_span: location_span(1, 0, 6, 1),
            footer_span: ByteSpan::EMPTY,
            children: vec![
                terminal(
                    NodeKind::Package,
                    "groupedconst",
                    ByteSpan::new(0, 20),
                    location_span(1, 0, 1, 20),
                ),
                Node::Container(Container {
                    kind: NodeKind::Const,
                    name: "const".to_string(),
                    location_span: location_span(2, 0, 6, 1),
                    header_span: ByteSpan::new(21, 29),
                    footer_span: ByteSpan::new(49, 50),
                    children: vec![
                        terminal(
                            NodeKind::Const,
                            "N",
                            ByteSpan::new(30, 36),
                            location_span(4, 0, 4, 6),
                        ),
                        terminal(
                            NodeKind::Const,
                            "Name",
                            ByteSpan::new(37, 48),
                            location_span(5, 0, 5, 11),
                        ),
                    ],
                }),
            ],
            parsing_errors: vec![],
        }
    );
}

#[test]
fn grouped_import() {
    let src = "package groupedimport\n\nimport (\n\t\"fmt\"\n\t\"strings\"\n)\n";
    let file = parse(src.as_bytes(), "UTF-8").unwrap();

    assert_eq!(
        file,
        File {
            location_span: location_span(1, 0, 6, 1),
            footer_span: ByteSpan::EMPTY,
            children: vec![
                terminal(
                    NodeKind::Package,
                    "groupedimport",
                    ByteSpan::new(0, 21),
                    location_span(1, 0, 1, 21),
                ),
                Node::Container(Container {
                    kind: NodeKind::Import,
                    name: "import".to_string(),
                    location_span: location_span(2, 0, 6, 1),
                    header_span: ByteSpan::new(22, 31),
                    footer_span: ByteSpan::new(50, 51),
                    children: vec![
                        terminal(
                            NodeKind::Import,
                            "fmt",
                            ByteSpan::new(32, 38),
                            location_span(4, 0, 4, 6),
                        ),
                        terminal(
                            NodeKind::Import,
                            "strings",
                            ByteSpan::new(39, 49),
                            location_span(5, 0, 5, 10),
                        ),
                    ],
                }),
            ],
            parsing_errors: vec![],
        }
    );
}

// A struct nested in a type group spans from its own spec to its closing
// brace; the footer picks up the brace's newline.
#[test]
fn grouped_type_with_nested_struct() {
    let src = "package groupedtype\n\ntype (\n\tPerson struct {\n\t\tName string\n\t}\n)\n";
    let file = parse(src.as_bytes(), "UTF-8").unwrap();

    assert_eq!(
        file,
        File {
            location_span: location_span(1, 0, 7, 1),
            footer_span: ByteSpan::EMPTY,
            children: vec![
                terminal(
                    NodeKind::Package,
                    "groupedtype",
                    ByteSpan::new(0, 19),
                    location_span(1, 0, 1, 19),
                ),
                Node::Container(Container {
                    kind: NodeKind::Type,
                    name: "type".to_string(),
                    location_span: location_span(2, 0, 7, 1),
                    header_span: ByteSpan::new(20, 27),
                    footer_span: ByteSpan::new(62, 63),
                    children: vec![Node::Container(Container {
                        kind: NodeKind::Struct,
                        name: "Person".to_string(),
                        location_span: location_span(4, 0, 6, 2),
                        header_span: ByteSpan::new(28, 44),
                        footer_span: ByteSpan::new(59, 61),
                        children: vec![terminal(
                            NodeKind::Field,
                            "Name",
                            ByteSpan::new(45, 58),
                            location_span(5, 0, 5, 13),
                        )],
                    })],
                }),
            ],
            parsing_errors: vec![],
        }
    );
}

#[test]
fn empty_group_is_still_a_container() {
    let src = "package emptygroup\n\nconst ()\n";
    let file = parse(src.as_bytes(), "UTF-8").unwrap();

    assert_eq!(
        file.children,
        vec![
            terminal(
                NodeKind::Package,
                "emptygroup",
                ByteSpan::new(0, 18),
                location_span(1, 0, 1, 18),
            ),
            Node::Container(Container {
                kind: NodeKind::Const,
                name: "const".to_string(),
                location_span: location_span(2, 0, 3, 8),
                header_span: ByteSpan::new(19, 26),
                footer_span: ByteSpan::new(27, 28),
                children: vec![],
            }),
        ]
    );
}

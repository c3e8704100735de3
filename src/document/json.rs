//! Host snapshot ingestion
//!
//! Parses the JSON tree rich-text frameworks emit for their documents
//! (`{"type": ..., "attrs": ..., "content": [...], "text": ...}`). Inline
//! content is flattened into the owning block's text; token spans are computed
//! from the unflattened structure so engine positions match host positions.

use serde::Deserialize;

use super::{Node, NodeAttrs, NodeKind};

#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(rename = "type")]
    kind: String,
    attrs: Option<JsonAttrs>,
    content: Option<Vec<JsonNode>>,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonAttrs {
    level: Option<u8>,
}

/// Parse a document snapshot into top-level blocks
///
/// A root typed `doc` contributes its content; any other root is taken as a
/// single block. Returns None when the JSON does not parse.
pub(crate) fn parse_blocks(json: &str) -> Option<Vec<Node>> {
    let root: JsonNode = serde_json::from_str(json).ok()?;
    if root.kind == "doc" {
        let blocks = match &root.content {
            Some(children) => children.iter().map(block_from_json).collect(),
            None => Vec::new(),
        };
        Some(blocks)
    } else {
        Some(vec![block_from_json(&root)])
    }
}

fn kind_of(name: &str) -> NodeKind {
    match name {
        "paragraph" => NodeKind::Paragraph,
        "heading" => NodeKind::Heading,
        "listItem" => NodeKind::ListItem,
        "bulletList" => NodeKind::BulletList,
        "orderedList" => NodeKind::OrderedList,
        "codeBlock" => NodeKind::CodeBlock,
        "blockquote" => NodeKind::Blockquote,
        "horizontalRule" => NodeKind::HorizontalRule,
        _ => NodeKind::Unknown,
    }
}

fn is_inline(node: &JsonNode) -> bool {
    node.kind == "text"
        || node.kind == "hardBreak"
        || (node.text.is_some() && node.content.is_none())
}

/// Token span of a JSON node: text counts per char, other inline atoms count
/// one, blocks count two boundary tokens plus content, contentless atoms one.
fn size_of(node: &JsonNode) -> usize {
    if is_inline(node) {
        return match &node.text {
            Some(text) => text.chars().count(),
            None => 1,
        };
    }
    if let Some(children) = &node.content {
        return 2 + children.iter().map(size_of).sum::<usize>();
    }
    match kind_of(&node.kind) {
        NodeKind::HorizontalRule | NodeKind::Unknown => 1,
        _ => 2,
    }
}

fn flatten_text(node: &JsonNode, out: &mut String) {
    if node.kind == "hardBreak" {
        out.push('\n');
        return;
    }
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    if let Some(children) = &node.content {
        for child in children {
            flatten_text(child, out);
        }
    }
}

fn inline_text(node: &JsonNode) -> String {
    let mut text = String::new();
    if let Some(children) = &node.content {
        for child in children {
            flatten_text(child, &mut text);
        }
    }
    text
}

fn node_attrs(node: &JsonNode) -> NodeAttrs {
    let level = node
        .attrs
        .as_ref()
        .and_then(|attrs| attrs.level)
        .map(|level| level.min(6).max(1));
    NodeAttrs { level }
}

fn block_from_json(node: &JsonNode) -> Node {
    let size = size_of(node);
    let kind = kind_of(&node.kind);
    let attrs = node_attrs(node);

    match kind {
        NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock => {
            Node::assemble(kind, attrs, inline_text(node), Vec::new(), size)
        }
        NodeKind::HorizontalRule => Node::assemble(kind, attrs, String::new(), Vec::new(), size),
        NodeKind::BulletList | NodeKind::OrderedList | NodeKind::Blockquote => {
            let children = match &node.content {
                Some(children) => children.iter().map(block_from_json).collect(),
                None => Vec::new(),
            };
            Node::assemble(kind, attrs, String::new(), children, size)
        }
        NodeKind::ListItem => {
            // Only non-container children fold into the item's text; the
            // walker emits a container child's blocks as units of their own,
            // so folding those too would count their text twice. All children
            // are kept so each sits at its exact token offset.
            let mut parts: Vec<String> = Vec::new();
            let mut children = Vec::new();
            if let Some(content) = &node.content {
                for child in content {
                    let converted = block_from_json(child);
                    if !converted.is_container() {
                        let mut text = String::new();
                        flatten_text(child, &mut text);
                        parts.push(text);
                    }
                    children.push(converted);
                }
            }
            Node::assemble(kind, attrs, parts.join("\n"), children, size)
        }
        NodeKind::Unknown => match &node.content {
            Some(children) if !children.is_empty() && children.iter().all(|c| !is_inline(c)) => {
                let blocks = children.iter().map(block_from_json).collect();
                Node::assemble(kind, attrs, String::new(), blocks, size)
            }
            _ => Node::assemble(kind, attrs, inline_text(node), Vec::new(), size),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paragraphs_with_marks() {
        let json = r#"{"type":"doc","content":[
            {"type":"paragraph","content":[
                {"type":"text","text":"Hello "},
                {"type":"text","text":"world","marks":[{"type":"bold"}]}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, NodeKind::Paragraph);
        assert_eq!(blocks[0].text, "Hello world");
        assert_eq!(blocks[0].size(), 2 + 11);
    }

    #[test]
    fn test_parse_heading_level() {
        let json = r#"{"type":"doc","content":[
            {"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Title"}]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        assert_eq!(blocks[0].kind, NodeKind::Heading);
        assert_eq!(blocks[0].heading_level(), 2);
    }

    #[test]
    fn test_hard_break_becomes_newline() {
        let json = r#"{"type":"doc","content":[
            {"type":"paragraph","content":[
                {"type":"text","text":"a"},
                {"type":"hardBreak"},
                {"type":"text","text":"b"}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        assert_eq!(blocks[0].text, "a\nb");
        assert_eq!(blocks[0].size(), 2 + 3);
    }

    #[test]
    fn test_list_item_flattens_non_list_children() {
        let json = r#"{"type":"doc","content":[
            {"type":"bulletList","content":[
                {"type":"listItem","content":[
                    {"type":"paragraph","content":[{"type":"text","text":"item"}]}
                ]}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        let list = &blocks[0];
        assert_eq!(list.kind, NodeKind::BulletList);
        let item = &list.children[0];
        assert_eq!(item.text, "item");
        assert_eq!(item.children.len(), 1);
        assert_eq!(item.children[0].kind, NodeKind::Paragraph);
        // item wraps a 6-token paragraph, list wraps the 8-token item
        assert_eq!(item.size(), 8);
        assert_eq!(list.size(), 10);
    }

    #[test]
    fn test_list_item_keeps_container_text_out() {
        let json = r#"{"type":"doc","content":[
            {"type":"bulletList","content":[
                {"type":"listItem","content":[
                    {"type":"paragraph","content":[{"type":"text","text":"intro"}]},
                    {"type":"blockquote","content":[
                        {"type":"paragraph","content":[{"type":"text","text":"quoted text"}]}
                    ]}
                ]}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        let item = &blocks[0].children[0];
        assert_eq!(item.text, "intro");
        assert_eq!(item.children.len(), 2);
        assert_eq!(item.children[1].kind, NodeKind::Blockquote);
        assert_eq!(item.children[1].children[0].text, "quoted text");
        // paragraph 7 tokens, quote 2 + 13, item 2 + 7 + 15
        assert_eq!(item.size(), 24);
    }

    #[test]
    fn test_nested_list_stays_a_child() {
        let json = r#"{"type":"doc","content":[
            {"type":"bulletList","content":[
                {"type":"listItem","content":[
                    {"type":"paragraph","content":[{"type":"text","text":"a"}]},
                    {"type":"bulletList","content":[
                        {"type":"listItem","content":[
                            {"type":"paragraph","content":[{"type":"text","text":"b"}]}
                        ]}
                    ]}
                ]}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        let outer_item = &blocks[0].children[0];
        assert_eq!(outer_item.text, "a");
        assert_eq!(outer_item.children.len(), 2);
        assert_eq!(outer_item.children[0].kind, NodeKind::Paragraph);
        assert_eq!(outer_item.children[1].kind, NodeKind::BulletList);
        assert_eq!(outer_item.children[1].children[0].text, "b");
        assert_eq!(outer_item.size(), 2 + 3 + 7);
    }

    #[test]
    fn test_code_block_keeps_newlines() {
        let json = r#"{"type":"doc","content":[
            {"type":"codeBlock","attrs":{"language":"rust"},"content":[
                {"type":"text","text":"fn main() {\n}\n"}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        assert_eq!(blocks[0].kind, NodeKind::CodeBlock);
        assert_eq!(blocks[0].text, "fn main() {\n}\n");
    }

    #[test]
    fn test_blockquote_keeps_block_children() {
        let json = r#"{"type":"doc","content":[
            {"type":"blockquote","content":[
                {"type":"paragraph","content":[{"type":"text","text":"quoted"}]}
            ]}
        ]}"#;
        let blocks = parse_blocks(json).unwrap();
        assert_eq!(blocks[0].kind, NodeKind::Blockquote);
        assert_eq!(blocks[0].children[0].text, "quoted");
    }

    #[test]
    fn test_unknown_kinds_degrade() {
        let leaf = parse_blocks(r#"{"type":"doc","content":[
            {"type":"callout","content":[{"type":"text","text":"note"}]}
        ]}"#)
        .unwrap();
        assert_eq!(leaf[0].kind, NodeKind::Unknown);
        assert_eq!(leaf[0].text, "note");
        assert!(!leaf[0].is_container());

        let wrapper = parse_blocks(r#"{"type":"doc","content":[
            {"type":"panel","content":[
                {"type":"paragraph","content":[{"type":"text","text":"inner"}]}
            ]}
        ]}"#)
        .unwrap();
        assert_eq!(wrapper[0].kind, NodeKind::Unknown);
        assert!(wrapper[0].is_container());
        assert_eq!(wrapper[0].children[0].text, "inner");
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert_eq!(parse_blocks(r#"{"type":"doc"}"#).unwrap().len(), 0);
        assert!(parse_blocks("not json").is_none());
        assert!(parse_blocks(r#"{"content":[]}"#).is_none());
    }

    #[test]
    fn test_bare_block_root() {
        let blocks = parse_blocks(r#"{"type":"paragraph","content":[{"type":"text","text":"x"}]}"#)
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "x");
    }
}

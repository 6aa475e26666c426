//! Deterministic HTML serialization.
//!
//! Output order is stable: `class` first (in class-list order), then the
//! remaining attributes sorted by name. Useful for asserting on decorated
//! markup without caring how a fixture was authored.

use crate::node::{Document, NodeId, NodeKind};
use crate::parse;

/// Serializes `id` and its subtree to HTML.
pub fn to_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Text(text) => {
            out.push_str(&html_escape::encode_text(text));
        }
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            if !data.classes.is_empty() {
                out.push_str(" class=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(
                    &data.classes.join(" "),
                ));
                out.push('"');
            }
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if parse::is_void_tag(&data.tag) {
                return;
            }
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

//! HTML serialization of a [`Dom`].
//!
//! Text and attribute values were never entity-decoded by the tokenizer, so they are written
//! back verbatim. The only escaping applied is `"` inside attribute values, which can appear
//! when the source used single quotes.

use crate::dom::{Dom, NodeData, NodeId};
use crate::tokenizer::is_void_element;

pub fn serialize(dom: &Dom) -> String {
    let mut out = String::with_capacity(dom.len() * 16);
    if let Some(doctype) = dom.doctype() {
        out.push_str("<!");
        out.push_str(doctype);
        out.push('>');
    }
    for &child in dom.children(dom.root()) {
        serialize_node(dom, child, &mut out);
    }
    out
}

/// Serialize a single subtree (outer HTML).
pub fn serialize_node(dom: &Dom, id: NodeId, out: &mut String) {
    enum Step {
        Open(NodeId),
        Close(NodeId),
    }

    let mut stack = vec![Step::Open(id)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node) => match dom.data(node) {
                Some(NodeData::Element { name, attributes }) => {
                    out.push('<');
                    out.push_str(name);
                    for (key, value) in attributes {
                        out.push(' ');
                        out.push_str(key);
                        if let Some(value) = value {
                            out.push_str("=\"");
                            push_attr_value(out, value);
                            out.push('"');
                        }
                    }
                    out.push('>');
                    if is_void_element(name) {
                        continue;
                    }
                    stack.push(Step::Close(node));
                    for &child in dom.children(node).iter().rev() {
                        stack.push(Step::Open(child));
                    }
                }
                Some(NodeData::Text { text }) => out.push_str(text),
                Some(NodeData::Comment { text }) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                Some(NodeData::Document { .. }) => {
                    for &child in dom.children(node).iter().rev() {
                        stack.push(Step::Open(child));
                    }
                }
                None => {}
            },
            Step::Close(node) => {
                if let Some(name) = dom.element_name(node) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }
}

/// Serialize the children of `id` (inner HTML).
pub fn serialize_children(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    for &child in dom.children(id) {
        serialize_node(dom, child, &mut out);
    }
    out
}

fn push_attr_value(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

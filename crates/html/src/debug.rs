use crate::dom::{Dom, NodeData, NodeId};

/// Attributes worth showing in an outline line, in display order.
const OUTLINE_ATTRS: &[&str] = &["id", "class", "name", "href"];

/// Indented one-line-per-node dump of the tree, capped at `cap` lines.
///
/// Elements show `id`/`class`/`name`/`href` plus every `data-mobile*` attribute; whitespace-only
/// text is skipped and long text is truncated.
pub fn outline_from_dom(dom: &Dom, cap: usize) -> Vec<String> {
    struct IndentGuard<'a> {
        indent: &'a mut String,
        step: usize,
    }

    impl Drop for IndentGuard<'_> {
        fn drop(&mut self) {
            let new_len = self.indent.len() - self.step;
            self.indent.truncate(new_len);
        }
    }

    fn push_preview_replace_newlines(out: &mut String, s: &str, max_chars: usize) {
        let mut truncated = false;
        for (i, ch) in s.chars().enumerate() {
            if i == max_chars {
                truncated = true;
                break;
            }
            out.push(if ch == '\n' { ' ' } else { ch });
        }
        if truncated {
            out.push('…');
        }
    }

    fn push_attr(line: &mut String, key: &str, value: Option<&str>) {
        line.push(' ');
        line.push_str(key);
        if let Some(value) = value {
            line.push_str("=\"");
            line.push_str(value);
            line.push('"');
        }
    }

    const INDENT_STEP: &str = "  ";
    const PREVIEW_CHARS: usize = 40;

    fn walk(dom: &Dom, node: NodeId, indent: &mut String, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        match dom.data(node) {
            Some(NodeData::Document { doctype }) => {
                *left -= 1;
                let mut line = String::with_capacity(indent.len() + 64);
                line.push_str(indent);
                match doctype {
                    Some(dt) => {
                        line.push_str("<!");
                        line.push_str(dt);
                        line.push('>');
                    }
                    None => line.push_str("#document"),
                }
                out.push(line);
                indent.push_str(INDENT_STEP);
                let mut guard = IndentGuard {
                    indent,
                    step: INDENT_STEP.len(),
                };
                for &c in dom.children(node) {
                    walk(dom, c, &mut *guard.indent, out, left);
                }
            }
            Some(NodeData::Element { name, attributes }) => {
                *left -= 1;
                let mut line = String::with_capacity(indent.len() + 64);
                line.push_str(indent);
                line.push('<');
                line.push_str(name);
                for key in OUTLINE_ATTRS {
                    if let Some(value) = dom.attr(node, key) {
                        push_attr(&mut line, key, Some(value));
                    }
                }
                for (key, value) in attributes {
                    if key.starts_with("data-mobile") {
                        push_attr(&mut line, key, value.as_deref());
                    }
                }
                line.push('>');
                out.push(line);
                indent.push_str(INDENT_STEP);
                let mut guard = IndentGuard {
                    indent,
                    step: INDENT_STEP.len(),
                };
                for &c in dom.children(node) {
                    walk(dom, c, &mut *guard.indent, out, left);
                }
            }
            Some(NodeData::Text { text }) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return;
                }
                *left -= 1;
                let mut line = String::with_capacity(indent.len() + 64);
                line.push_str(indent);
                line.push('"');
                push_preview_replace_newlines(&mut line, trimmed, PREVIEW_CHARS);
                line.push('"');
                out.push(line);
            }
            Some(NodeData::Comment { text }) => {
                *left -= 1;
                let mut line = String::with_capacity(indent.len() + 64);
                line.push_str(indent);
                line.push_str("<!-- ");
                push_preview_replace_newlines(&mut line, text.trim(), PREVIEW_CHARS);
                line.push_str(" -->");
                out.push(line);
            }
            None => {}
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    let mut indent = String::new();
    walk(dom, dom.root(), &mut indent, &mut out, &mut left);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_dom, tokenize};

    #[test]
    fn outline_shows_structure_and_mobile_attrs() {
        let dom = build_dom(&tokenize(
            "<!DOCTYPE html><body><div id=a data-mobile-role=header>\n  Hello\n</div><!--c--></body>",
        ));
        assert_eq!(
            outline_from_dom(&dom, 100),
            vec![
                "<!DOCTYPE html>",
                "  <body>",
                "    <div id=\"a\" data-mobile-role=\"header\">",
                "      \"Hello\"",
                "    <!-- c -->",
            ]
        );
    }

    #[test]
    fn outline_respects_cap() {
        let dom = build_dom(&tokenize("<a><b><c></c></b></a>"));
        assert_eq!(outline_from_dom(&dom, 2).len(), 2);
    }
}

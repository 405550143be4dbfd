use crate::dom::{Attribute, Dom, NodeId};
use crate::types::{Token, TokenStream};

/// Incremental tree construction over a [`Dom`].
///
/// The builder only tracks the open-element stack; the document itself is passed in on every
/// call so callers (the rewrite driver) can mutate it between tokens.
///
/// Invariant: every id on the open stack was alive when pushed. Callers may remove or move
/// closed nodes freely, but must not remove an element that is still open.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    open_elements: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_parent(&self, dom: &Dom) -> NodeId {
        self.open_elements.last().copied().unwrap_or(dom.root())
    }

    pub fn open_elements(&self) -> &[NodeId] {
        &self.open_elements
    }

    /// Create an element under the current parent. When `push` is true it becomes the new
    /// current parent.
    pub fn open(&mut self, dom: &mut Dom, name: &str, attributes: Vec<Attribute>, push: bool) -> NodeId {
        let parent = self.current_parent(dom);
        let id = dom.create_element(name, attributes);
        dom.append_child(parent, id);
        if push {
            self.open_elements.push(id);
        }
        id
    }

    /// Append text to the current parent, merging with a trailing text sibling.
    pub fn text(&mut self, dom: &mut Dom, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.current_parent(dom);
        if let Some(&last) = dom.children(parent).last() {
            if let Some(crate::NodeData::Text { text: existing }) = dom.data_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        let id = dom.create_text(text);
        dom.append_child(parent, id);
    }

    pub fn comment(&mut self, dom: &mut Dom, text: &str) {
        let parent = self.current_parent(dom);
        let id = dom.create_comment(text);
        dom.append_child(parent, id);
    }

    /// Close the innermost open element named `name`, together with everything opened after
    /// it. Returns the closed elements innermost first. A stray end tag with no matching open
    /// element closes nothing.
    pub fn close(&mut self, dom: &Dom, name: &str) -> Vec<NodeId> {
        let Some(pos) = self
            .open_elements
            .iter()
            .rposition(|&id| dom.is_element_named(id, name))
        else {
            log::trace!(target: "html.tree_builder", "ignoring stray end tag </{name}>");
            return Vec::new();
        };
        let mut closed = self.open_elements.split_off(pos);
        closed.reverse();
        closed
    }

    /// Close every open element, innermost first.
    pub fn finish(&mut self) -> Vec<NodeId> {
        let mut closed = std::mem::take(&mut self.open_elements);
        closed.reverse();
        closed
    }
}

/// Build a complete DOM from a token stream without any rewriting.
pub fn build_dom(stream: &TokenStream) -> Dom {
    let atoms = stream.atoms();
    let mut dom = Dom::new();
    let mut builder = TreeBuilder::new();

    for token in stream.tokens() {
        match token {
            Token::Doctype(s) => dom.set_doctype(s.clone()),
            Token::Comment(c) => builder.comment(&mut dom, c),
            Token::Text(t) => builder.text(&mut dom, t),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let resolved: Vec<Attribute> = attributes
                    .iter()
                    .map(|(k, v)| (atoms.resolve_arc(*k), v.clone()))
                    .collect();
                builder.open(&mut dom, atoms.resolve(*name), resolved, !*self_closing);
            }
            Token::EndTag(name) => {
                builder.close(&dom, atoms.resolve(*name));
            }
        }
    }
    builder.finish();
    dom
}

use crate::dom::{Dom, NodeId};

/// Locate a top-level section (`head` or `body`): first as a child of `<html>`, then as a
/// direct child of the document, and finally anywhere in the tree.
fn find_section(dom: &Dom, section: &str) -> Option<NodeId> {
    let root = dom.root();
    let html = dom
        .children(root)
        .iter()
        .copied()
        .find(|&c| dom.is_element_named(c, "html"));
    if let Some(html) = html {
        if let Some(found) = dom
            .children(html)
            .iter()
            .copied()
            .find(|&c| dom.is_element_named(c, section))
        {
            return Some(found);
        }
    }
    dom.children(root)
        .iter()
        .copied()
        .find(|&c| dom.is_element_named(c, section))
        .or_else(|| dom.find_first_element(root, section))
}

pub fn find_head(dom: &Dom) -> Option<NodeId> {
    find_section(dom, "head")
}

pub fn find_body(dom: &Dom) -> Option<NodeId> {
    find_section(dom, "body")
}

/// Walk from `id`'s parent up to the document root.
pub fn ancestors(dom: &Dom, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(dom.parent(id), move |&n| dom.parent(n))
}

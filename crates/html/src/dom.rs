//! Mutable arena DOM with parent links.
//!
//! Contract:
//! - Every live node except the document root has exactly one parent, and appears exactly once
//!   in that parent's child list.
//! - Removing a node frees its whole subtree; freed slots are recycled and their ids report
//!   `is_alive == false` until reused.
//! - Detached-but-alive nodes exist only transiently inside surgery operations or between
//!   `create_*` and the first insertion.
//! - Operations given a dead id are no-ops (or return `None`); tree surgery never panics on
//!   stale ids handed back by a caller.

use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub type Attribute = (Arc<str>, Option<String>);

#[derive(Debug, Clone)]
pub enum NodeData {
    Document { doctype: Option<String> },
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
    },
    Text { text: String },
    Comment { text: String },
}

#[derive(Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
}

#[derive(Debug)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            live: 0,
        };
        dom.root = dom.alloc(NodeData::Document { doctype: None });
        dom
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = data;
            slot.parent = None;
            slot.children.clear();
            slot.alive = true;
            return NodeId(index);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            data,
            parent: None,
            children: Vec::new(),
            alive: true,
        });
        NodeId(index)
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.index()).filter(|s| s.alive)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.index()).filter(|s| s.alive)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the document root included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn create_element(&mut self, name: impl Into<Arc<str>>, attributes: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element {
            name: name.into(),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text { text: text.into() })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment { text: text.into() })
    }

    pub fn set_doctype(&mut self, doctype: String) {
        let root = self.root;
        if let Some(Slot {
            data: NodeData::Document { doctype: dt },
            ..
        }) = self.slot_mut(root)
        {
            *dt = Some(doctype);
        }
    }

    pub fn doctype(&self) -> Option<&str> {
        match self.data(self.root) {
            Some(NodeData::Document { doctype }) => doctype.as_deref(),
            _ => None,
        }
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slot(id).map(|s| &s.data)
    }

    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slot_mut(id).map(|s| &mut s.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|s| s.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            Some(NodeData::Element { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element_name(id).is_some()
    }

    pub fn is_element_named(&self, id: NodeId, target: &str) -> bool {
        self.element_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.data(id) {
            Some(NodeData::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Attribute value lookup; keys compare ASCII case-insensitively. Valueless attributes
    /// yield `Some("")`.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, id: NodeId, key: &str) -> bool {
        self.attributes(id)
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: Option<String>) {
        let Some(NodeData::Element { attributes, .. }) = self.data_mut(id) else {
            return;
        };
        match attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, v)) => *v = value,
            None => attributes.push((Arc::from(key), value)),
        }
    }

    fn can_have_children(&self, id: NodeId) -> bool {
        matches!(
            self.data(id),
            Some(NodeData::Document { .. } | NodeData::Element { .. })
        )
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Unlink `id` from its parent. The subtree stays alive and must be re-inserted or removed.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(slot) = self.slot_mut(parent) {
            if let Some(pos) = slot.children.iter().rposition(|&c| c == id) {
                slot.children.remove(pos);
            }
        }
        if let Some(slot) = self.slot_mut(id) {
            slot.parent = None;
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous position.
    /// Returns false (and changes nothing) when the insertion would be invalid.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_have_children(parent)
            || !self.is_alive(child)
            || child == self.root
            || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
        }
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
        true
    }

    /// Insert `child` immediately before `reference` in the reference's parent.
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        if child == reference
            || !self.is_alive(child)
            || child == self.root
            || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        self.detach(child);
        let Some(slot) = self.slot_mut(parent) else {
            return false;
        };
        let Some(pos) = slot.children.iter().rposition(|&c| c == reference) else {
            return false;
        };
        slot.children.insert(pos, child);
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
        true
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.children(parent).first().copied() {
            Some(first) => self.insert_before(first, child),
            None => self.append_child(parent, child),
        }
    }

    /// Move the subtree rooted at `id` to the end of `new_parent`'s children.
    pub fn move_to_end(&mut self, new_parent: NodeId, id: NodeId) -> bool {
        self.append_child(new_parent, id)
    }

    /// Detach and free `id` with its entire subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.slot_mut(current) {
                stack.append(&mut slot.children);
            }
            self.release(current);
        }
    }

    /// Free a single slot whose children were already moved or released.
    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.alive = false;
        slot.parent = None;
        slot.children.clear();
        slot.data = NodeData::Text {
            text: String::new(),
        };
        self.free.push(id.0);
        self.live -= 1;
    }

    /// Replace `id` with its children, in order, at its former position; then free `id`.
    /// A detached node is simply freed together with its children.
    ///
    /// Linear in the number of children: they are spliced into the parent in one step.
    pub fn unwrap(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        let Some(parent) = self.parent(id) else {
            self.remove(id);
            return;
        };
        let Some(pos) = self.children(parent).iter().rposition(|&c| c == id) else {
            return;
        };
        let children = match self.slot_mut(id) {
            Some(slot) => std::mem::take(&mut slot.children),
            None => return,
        };
        for &child in &children {
            if let Some(slot) = self.slot_mut(child) {
                slot.parent = Some(parent);
            }
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.splice(pos..=pos, children);
        }
        self.release(id);
    }

    /// Unwrap every direct child of `parent` whose element name satisfies `matches`, in one
    /// pass. Children hoisted out of an unwrapped element are tested as well. Returns the number
    /// of elements unwrapped.
    pub fn unwrap_children_where(
        &mut self,
        parent: NodeId,
        matches: impl Fn(&str) -> bool,
    ) -> usize {
        let mut pending = match self.slot_mut(parent) {
            Some(slot) => std::mem::take(&mut slot.children),
            None => return 0,
        };
        pending.reverse();
        let mut kept = Vec::with_capacity(pending.len());
        let mut unwrapped = 0;
        while let Some(child) = pending.pop() {
            if self.element_name(child).is_some_and(&matches) {
                if let Some(slot) = self.slot_mut(child) {
                    pending.extend(slot.children.drain(..).rev());
                }
                self.release(child);
                unwrapped += 1;
            } else {
                if let Some(slot) = self.slot_mut(child) {
                    slot.parent = Some(parent);
                }
                kept.push(child);
            }
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children = kept;
        }
        unwrapped
    }

    /// Pre-order iteration over the subtree rooted at `id` (inclusive).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.is_alive(id) { vec![id] } else { Vec::new() };
        Descendants { dom: self, stack }
    }

    /// First element named `name` in pre-order below `from` (inclusive).
    pub fn find_first_element(&self, from: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(from)
            .find(|&id| self.is_element_named(id, name))
    }

    /// Concatenated text of the subtree, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(NodeData::Text { text }) = self.data(node) {
                out.push_str(text);
            }
        }
        out
    }
}

pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(id).iter().rev().copied());
        Some(id)
    }
}

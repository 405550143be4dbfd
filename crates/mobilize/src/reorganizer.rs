//! Single-pass reorganization of the document body.
//!
//! Each element inside the body gets a [`Decision`] when it is entered. The tree surgery that
//! decision implies runs when the element exits, once its subtree is complete and nested
//! decisions were already applied. Role scopes live on an explicit stack keyed by frame depth.
//!
//! | own role | enclosing scope | tag            | decision        |
//! |----------|-----------------|----------------|-----------------|
//! | some     | any             | any            | `Relocate(role)`|
//! | none     | any             | table family   | `Unwrap`        |
//! | none     | deleting        | other          | `Keep` (dies with the deleted ancestor) |
//! | none     | none            | keeper         | `Keep`          |
//! | none     | none            | other          | `Delete`        |
//! | none     | navigational    | keeper or nav  | `Keep`          |
//! | none     | navigational    | other          | `PruneNav`      |
//! | none     | other role      | any            | `Keep`          |
//!
//! `PruneNav` is settled at exit: the element is unwrapped when any element child survived and
//! removed otherwise. Unwrapping keeps loose text next to the surviving links, so
//! `<li>Products: <a>x</a></li>` leaves `Products: <a>x</a>` in the navigation.

use crate::containers::ContainerManager;
use crate::role::{MobileRole, classify};
use crate::tag_policy::{is_keeper_tag, is_nav_allowed_tag, is_table_family_tag};
use html::{Dom, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Leave the element where it is.
    Keep,
    /// Move the finished subtree into the role's container.
    Relocate(MobileRole),
    /// Drop the subtree, hoisting keeper elements out of it first.
    Delete,
    /// Replace the element with its children.
    Unwrap,
    /// Inside navigation: unwrap when an element child survived, otherwise delete.
    PruneNav,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Role(MobileRole),
    Deleting,
}

#[derive(Debug)]
struct Frame {
    element: NodeId,
    decision: Decision,
}

/// Surgery performed on the current document so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReorganizeCounts {
    pub relocated: usize,
    pub deleted: usize,
    pub unwrapped: usize,
    pub keepers_hoisted: usize,
}

#[derive(Debug, Default)]
pub struct TreeReorganizer {
    containers: ContainerManager,
    frames: Vec<Frame>,
    scopes: Vec<(usize, Scope)>,
    body: Option<NodeId>,
    body_depth: usize,
    finished: bool,
    counts: ReorganizeCounts,
}

impl TreeReorganizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all per-document state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn counts(&self) -> ReorganizeCounts {
        self.counts
    }

    /// Track entry into a `<body>` element. The first body seen is where containers go.
    pub fn enter_body(&mut self, body: NodeId) {
        if self.finished {
            return;
        }
        self.body_depth += 1;
        if self.body.is_none() {
            self.body = Some(body);
        }
    }

    pub fn exit_body(&mut self) {
        self.body_depth = self.body_depth.saturating_sub(1);
    }

    /// Decide what happens to `element` when it exits. Elements outside the body, or seen after
    /// the document was finished, are kept without tracking.
    pub fn start_element(&mut self, dom: &Dom, element: NodeId) -> Decision {
        if self.finished || self.body_depth == 0 {
            return Decision::Keep;
        }
        let Some(name) = dom.element_name(element) else {
            return Decision::Keep;
        };
        let depth = self.frames.len();
        let context = self.scopes.last().map(|&(_, scope)| scope);
        let decision = match (classify(dom, element), context) {
            (Some(role), _) => Decision::Relocate(role),
            (None, _) if is_table_family_tag(name) => Decision::Unwrap,
            (None, Some(Scope::Deleting)) => Decision::Keep,
            (None, None) if is_keeper_tag(name) => Decision::Keep,
            (None, None) => Decision::Delete,
            (None, Some(Scope::Role(MobileRole::Navigational))) => {
                if is_keeper_tag(name) || is_nav_allowed_tag(name) {
                    Decision::Keep
                } else {
                    Decision::PruneNav
                }
            }
            (None, Some(Scope::Role(_))) => Decision::Keep,
        };
        match decision {
            Decision::Relocate(role) => self.scopes.push((depth, Scope::Role(role))),
            Decision::Delete => self.scopes.push((depth, Scope::Deleting)),
            _ => {}
        }
        log::trace!(
            target: "mobilize.reorganizer",
            "<{name}> at depth {depth}: {decision:?}"
        );
        self.frames.push(Frame { element, decision });
        decision
    }

    /// Apply the decision recorded for `element`. An exit that does not match the innermost
    /// tracked element is ignored.
    pub fn end_element(&mut self, dom: &mut Dom, element: NodeId) {
        if self.frames.last().is_none_or(|frame| frame.element != element) {
            if !self.frames.is_empty() {
                log::debug!(
                    target: "mobilize.reorganizer",
                    "exit without matching enter; ignoring"
                );
            }
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let depth = self.frames.len();
        if self.scopes.last().is_some_and(|&(d, _)| d == depth) {
            self.scopes.pop();
        }
        if !dom.is_alive(element) {
            return;
        }

        match frame.decision {
            Decision::Keep => {}
            Decision::Relocate(role) => match self.body {
                Some(body) => {
                    self.containers.relocate(dom, body, role, element);
                    self.counts.relocated += 1;
                }
                None => log::error!(
                    target: "mobilize.reorganizer",
                    "relocation of a {} element outside a body",
                    role.as_str()
                ),
            },
            Decision::Delete => self.delete(dom, element),
            Decision::Unwrap => {
                dom.unwrap(element);
                self.counts.unwrapped += 1;
            }
            Decision::PruneNav => {
                let survivors = dom.children(element).iter().any(|&c| dom.is_element(c));
                if survivors {
                    dom.unwrap(element);
                    self.counts.unwrapped += 1;
                } else {
                    dom.remove(element);
                    self.counts.deleted += 1;
                }
            }
        }
    }

    fn delete(&mut self, dom: &mut Dom, element: NodeId) {
        let hoisted = hoist_keepers(dom, element);
        dom.remove(element);
        self.counts.deleted += 1;
        self.counts.keepers_hoisted += hoisted;
    }

    /// End-of-document: resolve every container into the body in role order. Later calls are
    /// no-ops.
    pub fn finish(&mut self, dom: &mut Dom) {
        if self.finished {
            return;
        }
        self.finished = true;
        if !self.frames.is_empty() {
            log::debug!(
                target: "mobilize.reorganizer",
                "{} elements still open at end of document",
                self.frames.len()
            );
            self.frames.clear();
            self.scopes.clear();
        }
        match self.body.filter(|&body| dom.is_alive(body)) {
            Some(body) => self.containers.finalize_all(dom, body),
            None => log::debug!(target: "mobilize.reorganizer", "document has no body"),
        }
        let counts = self.counts;
        log::debug!(
            target: "mobilize.reorganizer",
            "reorganized: relocated={} deleted={} unwrapped={} keepers_hoisted={}",
            counts.relocated,
            counts.deleted,
            counts.unwrapped,
            counts.keepers_hoisted
        );
    }
}

/// Move the outermost keeper elements below `doomed` to just before it, in document order.
fn hoist_keepers(dom: &mut Dom, doomed: NodeId) -> usize {
    let mut keepers = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(doomed).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if dom.element_name(id).is_some_and(is_keeper_tag) {
            keepers.push(id);
            continue;
        }
        stack.extend(dom.children(id).iter().rev().copied());
    }
    keepers
        .into_iter()
        .filter(|&keeper| dom.insert_before(doomed, keeper))
        .count()
}

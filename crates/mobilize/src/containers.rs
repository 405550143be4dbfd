//! Placeholder containers that collect relocated subtrees.
//!
//! A container is an ordinary `div` appended to the body and tagged with
//! `data-mobile-container`, so the tree keeps its single-owner invariant while elements are
//! moved in. Containers only live between first use of a role and end-of-document, where they
//! are moved to the end of the body in role order and replaced by their contents.

use crate::role::MobileRole;
use crate::tag_policy::is_table_family_tag;
use html::{Dom, NodeId};
use std::sync::Arc;

pub const CONTAINER_ATTRIBUTE: &str = "data-mobile-container";

#[derive(Debug, Default)]
pub struct ContainerManager {
    containers: [Option<NodeId>; MobileRole::ALL.len()],
}

impl ContainerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self, role: MobileRole) -> Option<NodeId> {
        self.containers[role.index()]
    }

    pub fn used_roles(&self) -> impl Iterator<Item = MobileRole> + '_ {
        MobileRole::ALL
            .into_iter()
            .filter(|role| self.containers[role.index()].is_some())
    }

    pub fn is_container(dom: &Dom, id: NodeId) -> bool {
        dom.has_attr(id, CONTAINER_ATTRIBUTE)
    }

    /// Container for `role`, created at the current end of `body` on first use.
    pub fn get_or_create(&mut self, dom: &mut Dom, body: NodeId, role: MobileRole) -> NodeId {
        if let Some(existing) = self.containers[role.index()] {
            if dom.is_alive(existing) {
                return existing;
            }
            log::warn!(
                target: "mobilize.containers",
                "{} container vanished from the tree; recreating",
                role.as_str()
            );
        }
        let container = dom.create_element(
            "div",
            vec![(
                Arc::from(CONTAINER_ATTRIBUTE),
                Some(role.as_str().to_string()),
            )],
        );
        dom.append_child(body, container);
        log::debug!(
            target: "mobilize.containers",
            "created {} container",
            role.as_str()
        );
        self.containers[role.index()] = Some(container);
        container
    }

    /// Move a finished subtree into the container for `role` as its last child.
    pub fn relocate(&mut self, dom: &mut Dom, body: NodeId, role: MobileRole, element: NodeId) {
        let container = self.get_or_create(dom, body, role);
        let moved = dom.move_to_end(container, element);
        debug_assert!(moved, "relocation into {} container failed", role.as_str());
        if !moved {
            log::error!(
                target: "mobilize.containers",
                "could not relocate element into {} container",
                role.as_str()
            );
        }
    }

    /// Resolve one container: strip table wrappers among its direct children, then replace
    /// the container with its children in place, or drop it when empty.
    pub fn finalize_and_remove(&mut self, dom: &mut Dom, role: MobileRole) {
        let Some(container) = self.containers[role.index()].take() else {
            return;
        };
        if !dom.is_alive(container) {
            return;
        }
        strip_table_wrappers(dom, container);
        if dom.children(container).is_empty() {
            dom.remove(container);
        } else {
            dom.unwrap(container);
        }
    }

    /// Move every used container to the end of `body` in role order, then resolve each.
    pub fn finalize_all(&mut self, dom: &mut Dom, body: NodeId) {
        for role in MobileRole::ALL {
            if let Some(container) = self.containers[role.index()] {
                dom.move_to_end(body, container);
            }
        }
        for role in MobileRole::ALL {
            self.finalize_and_remove(dom, role);
        }
    }
}

/// Unwrap table-family elements among `parent`'s direct children. Hoisted children are
/// examined too.
fn strip_table_wrappers(dom: &mut Dom, parent: NodeId) {
    let stripped = dom.unwrap_children_where(parent, is_table_family_tag);
    if stripped > 0 {
        log::trace!(target: "mobilize.containers", "stripped {stripped} table wrappers");
    }
}

//! Mobile layout rewriting for HTML documents.
//!
//! Authors tag page sections with `data-mobile-role` (`navigational`, `header`, `content`,
//! `marginal`, `footer`). [`MobilizeRewriteFilter`] runs inside a
//! [`rewriter::RewriteDriver`] and, in a single pass over the element stream:
//!
//! - gathers role-tagged subtrees at the end of the body in role order,
//! - strips table layout while keeping its content,
//! - deletes untagged content outside any role, keeping scripts, styles and metadata,
//! - reduces navigation to links and small inline elements,
//! - adds a viewport meta, the mobilize stylesheet and the client init script.

pub mod bootstrap;
pub mod containers;
pub mod filter;
pub mod reorganizer;
pub mod role;
pub mod tag_policy;

pub use crate::bootstrap::DocumentBootstrap;
pub use crate::containers::{CONTAINER_ATTRIBUTE, ContainerManager};
pub use crate::filter::{MobilizeRewriteFilter, PAGES_MOBILIZED};
pub use crate::reorganizer::{Decision, ReorganizeCounts, TreeReorganizer};
pub use crate::role::{MobileRole, ROLE_ATTRIBUTE, classify};

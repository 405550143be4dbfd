use html::{Dom, NodeId};

/// Whether a filter may add `<script>` content to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptUsage {
    NeverInjectsScripts,
    WillInjectScripts,
}

/// Per-request metadata visible to filters when they decide whether to run.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or("")
    }
}

/// A stage of the rewrite pipeline.
///
/// Signals arrive strictly in document order: one `start_document`, then `start_element` /
/// `end_element` per element occurrence (the element is already attached to its parent on
/// start and has all its children on end), then one `end_document`, then `render_done` once the
/// document was serialized. Filters may restructure the tree only at `end_element` (for the
/// closed element and anything outside the open-element chain) and at `end_document`.
pub trait HtmlFilter {
    fn name(&self) -> &'static str;

    fn script_usage(&self) -> ScriptUsage {
        ScriptUsage::NeverInjectsScripts
    }

    /// Decide once per request whether the filter participates. `Err` carries the reason it
    /// was disabled, for diagnostics.
    fn determine_enabled(&mut self, _request: &RequestContext) -> Result<(), String> {
        Ok(())
    }

    fn start_document(&mut self, _dom: &mut Dom) {}

    fn start_element(&mut self, _dom: &mut Dom, _element: NodeId) {}

    fn end_element(&mut self, _dom: &mut Dom, _element: NodeId) {}

    fn end_document(&mut self, _dom: &mut Dom) {}

    /// Called after the rewritten document was rendered successfully.
    fn render_done(&mut self, _dom: &mut Dom) {}
}

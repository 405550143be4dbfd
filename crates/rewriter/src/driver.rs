//! Drives a filter chain over one document.
//!
//! The driver tokenizes input, grows the DOM with a [`TreeBuilder`] and signals each filter as
//! elements open and close. Nothing is flushed before `finish`: the whole document is rendered
//! once, after every filter saw `end_document`.
//!
//! Each `parse` chunk must end on a token boundary; the simplified tokenizer does not carry
//! partial tags across calls.

use crate::filter::{HtmlFilter, RequestContext, ScriptUsage};
use crate::{RewriteError, RewriteOptions};
use html::{Attribute, Dom, NodeId, Token, TreeBuilder, serialize, tokenize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriverState {
    Idle,
    Parsing,
    Finished,
}

struct FilterSlot {
    filter: Box<dyn HtmlFilter>,
    enabled: bool,
}

pub struct RewriteDriver {
    options: Arc<RewriteOptions>,
    request: RequestContext,
    filters: Vec<FilterSlot>,
    dom: Dom,
    builder: TreeBuilder,
    state: DriverState,
}

impl RewriteDriver {
    pub fn new(options: Arc<RewriteOptions>, request: RequestContext) -> Self {
        Self {
            options,
            request,
            filters: Vec::new(),
            dom: Dom::new(),
            builder: TreeBuilder::new(),
            state: DriverState::Idle,
        }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Add a filter to the chain. Filters that inject scripts run after all filters that do
    /// not, so their additions are never seen by the others; relative order is otherwise
    /// preserved.
    pub fn add_filter(&mut self, filter: Box<dyn HtmlFilter>) {
        let slot = FilterSlot {
            filter,
            enabled: true,
        };
        if slot.filter.script_usage() == ScriptUsage::WillInjectScripts {
            self.filters.push(slot);
            return;
        }
        let pos = self
            .filters
            .iter()
            .position(|s| s.filter.script_usage() == ScriptUsage::WillInjectScripts)
            .unwrap_or(self.filters.len());
        self.filters.insert(pos, slot);
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|s| s.filter.name()).collect()
    }

    /// True if any enabled filter declares it may inject scripts.
    pub fn injects_scripts(&self) -> bool {
        self.filters
            .iter()
            .any(|s| s.enabled && s.filter.script_usage() == ScriptUsage::WillInjectScripts)
    }

    fn start_if_needed(&mut self) -> Result<(), RewriteError> {
        match self.state {
            DriverState::Parsing => return Ok(()),
            DriverState::Finished => return Err(RewriteError::DocumentClosed),
            DriverState::Idle => {}
        }
        for slot in &mut self.filters {
            match slot.filter.determine_enabled(&self.request) {
                Ok(()) => slot.enabled = true,
                Err(reason) => {
                    log::debug!(
                        target: "rewriter.driver",
                        "filter {} disabled: {reason}",
                        slot.filter.name()
                    );
                    slot.enabled = false;
                }
            }
        }
        self.state = DriverState::Parsing;
        for slot in self.filters.iter_mut().filter(|s| s.enabled) {
            slot.filter.start_document(&mut self.dom);
        }
        Ok(())
    }

    /// Feed one chunk of markup.
    pub fn parse(&mut self, chunk: &str) -> Result<(), RewriteError> {
        self.start_if_needed()?;
        let stream = tokenize(chunk);
        let atoms = stream.atoms();
        for token in stream.tokens() {
            match token {
                Token::Doctype(doctype) => self.dom.set_doctype(doctype.clone()),
                Token::Comment(text) => self.builder.comment(&mut self.dom, text),
                Token::Text(text) => self.builder.text(&mut self.dom, text),
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    let attributes: Vec<Attribute> = attributes
                        .iter()
                        .map(|(k, v)| (atoms.resolve_arc(*k), v.clone()))
                        .collect();
                    let id = self.builder.open(
                        &mut self.dom,
                        atoms.resolve(*name),
                        attributes,
                        !*self_closing,
                    );
                    self.signal_start(id);
                    if *self_closing {
                        self.signal_end(id);
                    }
                }
                Token::EndTag(name) => {
                    for id in self.builder.close(&self.dom, atoms.resolve(*name)) {
                        self.signal_end(id);
                    }
                }
            }
        }
        Ok(())
    }

    fn signal_start(&mut self, id: NodeId) {
        for slot in self.filters.iter_mut().filter(|s| s.enabled) {
            if !self.dom.is_alive(id) {
                break;
            }
            slot.filter.start_element(&mut self.dom, id);
        }
    }

    fn signal_end(&mut self, id: NodeId) {
        for slot in self.filters.iter_mut().filter(|s| s.enabled) {
            // An earlier filter may have removed the element.
            if !self.dom.is_alive(id) {
                break;
            }
            slot.filter.end_element(&mut self.dom, id);
        }
    }

    /// Close the document, run end-of-document processing and render the result.
    pub fn finish(&mut self) -> Result<String, RewriteError> {
        self.start_if_needed()?;
        for id in self.builder.finish() {
            self.signal_end(id);
        }
        for slot in self.filters.iter_mut().filter(|s| s.enabled) {
            slot.filter.end_document(&mut self.dom);
        }
        let rendered = serialize(&self.dom);
        self.state = DriverState::Finished;
        for slot in self.filters.iter_mut().filter(|s| s.enabled) {
            slot.filter.render_done(&mut self.dom);
        }
        log::debug!(
            target: "rewriter.driver",
            "rendered {} bytes through [{}]",
            rendered.len(),
            self.filter_names().join(", ")
        );
        Ok(rendered)
    }

    /// Stop processing without end-of-document handling and return the tree as it stands.
    pub fn abort(&mut self) -> String {
        self.builder.finish();
        self.state = DriverState::Finished;
        log::debug!(target: "rewriter.driver", "document aborted before end");
        serialize(&self.dom)
    }

    /// Parse a complete document in one call and render it.
    pub fn rewrite(&mut self, document: &str) -> Result<String, RewriteError> {
        self.parse(document)?;
        self.finish()
    }
}

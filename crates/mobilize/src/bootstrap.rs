//! Head additions and the client-side init script.
//!
//! Every node this module adds carries `data-mobilize`, and the viewport meta is matched by
//! name. Running over an already mobilized page therefore finds its earlier additions instead of
//! adding them twice.

use html::traverse::find_head;
use html::{Dom, NodeId};
use rewriter::{MobilizeOptions, StaticAsset, StaticAssetManager};
use std::sync::Arc;

pub const MOBILIZE_ATTRIBUTE: &str = "data-mobilize";
pub const SPACER_CLASS: &str = "mobilize-spacer";
const VIEWPORT_CONTENT: &str = "width=device-width,user-scalable=no";

pub struct DocumentBootstrap {
    options: MobilizeOptions,
    assets: Arc<dyn StaticAssetManager>,
    added_viewport: bool,
    added_stylesheet: bool,
    added_spacer: bool,
    added_init_script: bool,
}

impl DocumentBootstrap {
    pub fn new(options: MobilizeOptions, assets: Arc<dyn StaticAssetManager>) -> Self {
        Self {
            options,
            assets,
            added_viewport: false,
            added_stylesheet: false,
            added_spacer: false,
            added_init_script: false,
        }
    }

    pub fn reset(&mut self) {
        self.added_viewport = false;
        self.added_stylesheet = false;
        self.added_spacer = false;
        self.added_init_script = false;
    }

    pub fn added_viewport(&self) -> bool {
        self.added_viewport
    }

    pub fn added_stylesheet(&self) -> bool {
        self.added_stylesheet
    }

    pub fn added_spacer(&self) -> bool {
        self.added_spacer
    }

    /// Head additions and the spacer. Each is added at most once per document.
    pub fn on_body_start(&mut self, dom: &mut Dom, body: NodeId) {
        if !self.added_viewport {
            self.added_viewport = true;
            add_viewport(dom, body);
        }
        if !self.added_stylesheet {
            self.added_stylesheet = true;
            self.add_stylesheet(dom, body);
        }
        if self.options.add_spacer && !self.added_spacer {
            self.added_spacer = true;
            let spacer = dom.create_element(
                "div",
                vec![(Arc::from("class"), Some(SPACER_CLASS.to_string()))],
            );
            dom.prepend_child(body, spacer);
        }
    }

    fn add_stylesheet(&self, dom: &mut Dom, body: NodeId) {
        if find_marked(dom, "css").is_some() {
            log::debug!(target: "mobilize.bootstrap", "stylesheet already present");
            return;
        }
        let inline = self.options.inline_assets;
        let css = self.assets.url_or_content(StaticAsset::MobilizeCss, inline);
        let style = if inline {
            let style = dom.create_element("style", vec![marker("css")]);
            let text = dom.create_text(css);
            dom.append_child(style, text);
            style
        } else {
            dom.create_element(
                "link",
                vec![
                    (Arc::from("rel"), Some("stylesheet".to_string())),
                    (Arc::from("href"), Some(css)),
                    marker("css"),
                ],
            )
        };
        insert_in_head(dom, body, style);
    }

    /// Append the mobilize script and the init script to `body`. Nothing is added without a
    /// body. Scripts left by an earlier run are moved to the end instead of duplicated, so
    /// initialization still follows the relocated content.
    pub fn on_end_document(&mut self, dom: &mut Dom, body: Option<NodeId>) {
        let Some(body) = body.filter(|&body| dom.is_alive(body)) else {
            log::debug!(target: "mobilize.bootstrap", "no body; init script skipped");
            return;
        };
        if self.added_init_script {
            return;
        }
        self.added_init_script = true;

        let loader = match find_marked(dom, "js") {
            Some(existing) => existing,
            None => self.create_loader(dom),
        };
        dom.move_to_end(body, loader);

        let init = match find_marked(dom, "init") {
            Some(existing) => {
                log::debug!(target: "mobilize.bootstrap", "init script already present; moved");
                existing
            }
            None => {
                let init = dom.create_element("script", vec![marker("init")]);
                let text = dom.create_text(self.init_script());
                dom.append_child(init, text);
                init
            }
        };
        dom.move_to_end(body, init);
    }

    fn create_loader(&self, dom: &mut Dom) -> NodeId {
        let inline = self.options.inline_assets;
        let js = self.assets.url_or_content(StaticAsset::MobilizeJs, inline);
        if inline {
            let script = dom.create_element("script", vec![marker("js")]);
            let text = dom.create_text(js);
            dom.append_child(script, text);
            script
        } else {
            dom.create_element("script", vec![(Arc::from("src"), Some(js)), marker("js")])
        }
    }

    /// Inline script configuring and starting client-side mobilization.
    pub fn init_script(&self) -> String {
        let mut script = format!("window.mobilizeDebug={};", self.options.debug);
        let settings = [
            ("mobilizePhone", &self.options.phone_number),
            ("mobilizeMapLocation", &self.options.map_location),
            ("mobilizeConversionId", &self.options.conversion_id),
        ];
        for (name, value) in settings {
            if let Some(value) = value {
                script.push_str(&format!("window.{name}=\"{}\";", escape_js_string(value)));
            }
        }
        script.push_str("mobilize.init();");
        script
    }
}

fn marker(value: &str) -> html::Attribute {
    (Arc::from(MOBILIZE_ATTRIBUTE), Some(value.to_string()))
}

fn find_marked(dom: &Dom, value: &str) -> Option<NodeId> {
    dom.descendants(dom.root())
        .find(|&id| dom.attr(id, MOBILIZE_ATTRIBUTE) == Some(value))
}

fn insert_in_head(dom: &mut Dom, body: NodeId, node: NodeId) {
    match find_head(dom) {
        Some(head) => dom.append_child(head, node),
        None => dom.insert_before(body, node),
    };
}

fn add_viewport(dom: &mut Dom, body: NodeId) {
    let existing = dom.descendants(dom.root()).find(|&id| {
        dom.is_element_named(id, "meta")
            && dom
                .attr(id, "name")
                .is_some_and(|name| name.eq_ignore_ascii_case("viewport"))
    });
    if let Some(meta) = existing {
        dom.set_attr(meta, "content", Some(VIEWPORT_CONTENT.to_string()));
        return;
    }
    let meta = dom.create_element(
        "meta",
        vec![
            (Arc::from("name"), Some("viewport".to_string())),
            (Arc::from("content"), Some(VIEWPORT_CONTENT.to_string())),
        ],
    );
    insert_in_head(dom, body, meta);
}

/// Escape `value` for a double- or single-quoted JavaScript string inside a `<script>` element.
pub fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

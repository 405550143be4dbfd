use crate::bootstrap::DocumentBootstrap;
use crate::reorganizer::TreeReorganizer;
use html::{Dom, NodeId};
use rewriter::{
    HtmlFilter, RequestContext, RewriteOptions, ScriptUsage, StaticAssetManager, Statistics,
    UserAgentMatcher, Variable,
};
use std::sync::Arc;

/// Statistic counting documents whose mobilization completed.
pub const PAGES_MOBILIZED: &str = "mobilization_pages_mobilized";

/// Rewrites a desktop page into the mobile layout declared by `data-mobile-role` attributes.
///
/// One instance handles one document at a time. The only state shared between instances is
/// the pages-mobilized counter in [`Statistics`].
pub struct MobilizeRewriteFilter {
    options: RewriteOptions,
    matcher: UserAgentMatcher,
    reorganizer: TreeReorganizer,
    bootstrap: DocumentBootstrap,
    pages_mobilized: Arc<Variable>,
    saw_end_document: bool,
    counted: bool,
}

impl MobilizeRewriteFilter {
    pub fn new(
        options: &RewriteOptions,
        stats: &Statistics,
        assets: Arc<dyn StaticAssetManager>,
    ) -> Self {
        Self {
            options: options.clone(),
            matcher: UserAgentMatcher::default(),
            reorganizer: TreeReorganizer::new(),
            bootstrap: DocumentBootstrap::new(options.mobilize.clone(), assets),
            pages_mobilized: stats.add_variable(PAGES_MOBILIZED),
            saw_end_document: false,
            counted: false,
        }
    }

    pub fn with_matcher(mut self, matcher: UserAgentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Register the statistics this filter updates.
    pub fn init_stats(stats: &Statistics) {
        stats.add_variable(PAGES_MOBILIZED);
    }

    pub fn is_applicable_for(
        options: &RewriteOptions,
        user_agent: &str,
        matcher: &UserAgentMatcher,
    ) -> bool {
        let mobilize = &options.mobilize;
        mobilize.enabled
            && (mobilize.mobilize_all_user_agents || matcher.is_mobile_user_agent(user_agent))
    }
}

impl HtmlFilter for MobilizeRewriteFilter {
    fn name(&self) -> &'static str {
        "MobilizeRewrite"
    }

    fn script_usage(&self) -> ScriptUsage {
        ScriptUsage::WillInjectScripts
    }

    fn determine_enabled(&mut self, request: &RequestContext) -> Result<(), String> {
        if !self.options.mobilize.enabled {
            return Err("mobilization is not enabled".to_string());
        }
        if Self::is_applicable_for(&self.options, request.user_agent(), &self.matcher) {
            Ok(())
        } else {
            Err(format!("user agent {:?} is not mobile", request.user_agent()))
        }
    }

    fn start_document(&mut self, _dom: &mut Dom) {
        self.reorganizer.reset();
        self.bootstrap.reset();
        self.saw_end_document = false;
        self.counted = false;
    }

    fn start_element(&mut self, dom: &mut Dom, element: NodeId) {
        if dom.is_element_named(element, "body") {
            if self.reorganizer.is_finished() {
                return;
            }
            self.reorganizer.enter_body(element);
            self.bootstrap.on_body_start(dom, element);
            return;
        }
        self.reorganizer.start_element(dom, element);
    }

    fn end_element(&mut self, dom: &mut Dom, element: NodeId) {
        if dom.is_element_named(element, "body") {
            self.reorganizer.exit_body();
        } else {
            self.reorganizer.end_element(dom, element);
        }
    }

    fn end_document(&mut self, dom: &mut Dom) {
        if self.saw_end_document {
            return;
        }
        self.reorganizer.finish(dom);
        self.bootstrap.on_end_document(dom, self.reorganizer.body());
        self.saw_end_document = true;
    }

    fn render_done(&mut self, _dom: &mut Dom) {
        if self.saw_end_document && !self.counted {
            self.counted = true;
            self.pages_mobilized.add(1);
            log::debug!(
                target: "mobilize.filter",
                "page mobilized ({} total)",
                self.pages_mobilized.get()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewriter::MobilizeOptions;

    fn options(enabled: bool, all_agents: bool) -> RewriteOptions {
        RewriteOptions {
            mobilize: MobilizeOptions {
                enabled,
                mobilize_all_user_agents: all_agents,
                ..MobilizeOptions::default()
            },
            ..RewriteOptions::default()
        }
    }

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0";

    #[test]
    fn applicability_needs_enabled_and_mobile_agent() {
        let matcher = UserAgentMatcher::default();
        assert!(MobilizeRewriteFilter::is_applicable_for(&options(true, false), IPHONE, &matcher));
        assert!(!MobilizeRewriteFilter::is_applicable_for(&options(true, false), DESKTOP, &matcher));
        assert!(MobilizeRewriteFilter::is_applicable_for(&options(true, true), DESKTOP, &matcher));
        assert!(!MobilizeRewriteFilter::is_applicable_for(&options(false, true), IPHONE, &matcher));
    }

    #[test]
    fn disabled_reason_names_the_cause() {
        let stats = Statistics::new();
        let assets = Arc::new(rewriter::AssetTable::default());
        let mut off = MobilizeRewriteFilter::new(&options(false, false), &stats, assets.clone());
        let err = off
            .determine_enabled(&RequestContext::with_user_agent(IPHONE))
            .expect_err("disabled");
        assert!(err.contains("not enabled"), "got: {err}");

        let mut desktop = MobilizeRewriteFilter::new(&options(true, false), &stats, assets);
        let err = desktop
            .determine_enabled(&RequestContext::with_user_agent(DESKTOP))
            .expect_err("desktop");
        assert!(err.contains("not mobile"), "got: {err}");
    }

    #[test]
    fn custom_matcher_widens_applicability() {
        let stats = Statistics::new();
        let kiosk = "KioskBrowser/2.1";
        let mut filter = MobilizeRewriteFilter::new(
            &options(true, false),
            &stats,
            Arc::new(rewriter::AssetTable::default()),
        )
        .with_matcher(UserAgentMatcher::new().with_mobile_marker("KioskBrowser"));
        assert!(filter.determine_enabled(&RequestContext::with_user_agent(kiosk)).is_ok());
    }

    #[test]
    fn identity() {
        let stats = Statistics::new();
        let filter = MobilizeRewriteFilter::new(
            &RewriteOptions::default(),
            &stats,
            Arc::new(rewriter::AssetTable::default()),
        );
        assert_eq!(filter.name(), "MobilizeRewrite");
        assert_eq!(filter.script_usage(), ScriptUsage::WillInjectScripts);
        assert_eq!(
            stats.find_variable(PAGES_MOBILIZED).map(|v| v.get()),
            Some(0)
        );
    }
}

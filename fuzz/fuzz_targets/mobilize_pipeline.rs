#![no_main]

use libfuzzer_sys::fuzz_target;
use mobilize::{CONTAINER_ATTRIBUTE, MobilizeRewriteFilter, PAGES_MOBILIZED};
use rewriter::{
    AssetTable, MobilizeOptions, RequestContext, RewriteDriver, RewriteOptions, Statistics,
};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let options = Arc::new(RewriteOptions {
        mobilize: MobilizeOptions {
            enabled: true,
            mobilize_all_user_agents: true,
            add_spacer: data.first().is_some_and(|b| b & 1 == 1),
            ..MobilizeOptions::default()
        },
        ..RewriteOptions::default()
    });
    let stats = Statistics::new();
    let mut driver = RewriteDriver::new(Arc::clone(&options), RequestContext::default());
    driver.add_filter(Box::new(MobilizeRewriteFilter::new(
        &options,
        &stats,
        Arc::new(AssetTable::default()),
    )));
    let Ok(_) = driver.rewrite(input) else {
        return;
    };

    let dom = driver.dom();
    for id in dom.descendants(dom.root()) {
        assert!(
            !dom.has_attr(id, CONTAINER_ATTRIBUTE) || input.contains(CONTAINER_ATTRIBUTE),
            "container left behind"
        );
        if let Some(name) = dom.element_name(id) {
            if mobilize::tag_policy::is_table_family_tag(name) {
                let body = html::traverse::find_body(dom);
                assert!(
                    body.is_none_or(|body| !html::traverse::ancestors(dom, id).any(|a| a == body)),
                    "table wrapper left inside body"
                );
            }
        }
    }
    assert_eq!(
        stats.find_variable(PAGES_MOBILIZED).map(|v| v.get()),
        Some(1)
    );
});

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mobilize::MobilizeRewriteFilter;
use rewriter::{
    AssetTable, MobilizeOptions, RequestContext, RewriteDriver, RewriteOptions, Statistics,
};
use std::sync::Arc;

const ROLES: [&str; 5] = ["navigational", "header", "content", "marginal", "footer"];

/// Desktop-style page: role sections in scrambled order, table layout and untagged chrome.
fn make_page(sections: usize) -> String {
    let mut out = String::with_capacity(sections * 160 + 64);
    out.push_str("<html><head><title>bench</title></head><body><table><tr>");
    for i in 0..sections {
        let role = ROLES[(i * 3) % ROLES.len()];
        out.push_str("<td><div data-mobile-role=");
        out.push_str(role);
        out.push_str("><ul><li><a href=#>link</a></li></ul><p>text <b>bold</b></p></div>");
        out.push_str("<div class=ad>ad<script>x()</script></div></td>");
    }
    out.push_str("</tr></table></body></html>");
    out
}

/// One content section holding a wide layout table.
fn make_table_page(rows: usize) -> String {
    let mut out = String::with_capacity(rows * 24 + 96);
    out.push_str("<body><div data-mobile-role=content><table><tbody>");
    for i in 0..rows {
        out.push_str("<tr><td>");
        out.push_str(&i.to_string());
        out.push_str("</td></tr>");
    }
    out.push_str("</tbody></table></div></body>");
    out
}

fn bench_options() -> Arc<RewriteOptions> {
    Arc::new(RewriteOptions {
        mobilize: MobilizeOptions {
            enabled: true,
            mobilize_all_user_agents: true,
            ..MobilizeOptions::default()
        },
        ..RewriteOptions::default()
    })
}

fn run(options: &Arc<RewriteOptions>, stats: &Statistics, assets: &Arc<AssetTable>, input: &str) {
    let mut driver = RewriteDriver::new(Arc::clone(options), RequestContext::default());
    driver.add_filter(Box::new(MobilizeRewriteFilter::new(
        options,
        stats,
        assets.clone(),
    )));
    let out = driver.rewrite(black_box(input)).expect("rewrite");
    black_box(out.len());
}

fn bench_mobilize_page(c: &mut Criterion) {
    let input = make_page(2_000);
    let options = bench_options();
    let stats = Statistics::new();
    let assets = Arc::new(AssetTable::default());
    c.bench_function("bench_mobilize_page", |b| {
        b.iter(|| run(&options, &stats, &assets, &input));
    });
}

fn bench_large_layout_table(c: &mut Criterion) {
    let input = make_table_page(20_000);
    let options = bench_options();
    let stats = Statistics::new();
    let assets = Arc::new(AssetTable::default());
    c.bench_function("bench_large_layout_table", |b| {
        b.iter(|| run(&options, &stats, &assets, &input));
    });
}

criterion_group!(benches, bench_mobilize_page, bench_large_layout_table);
criterion_main!(benches);

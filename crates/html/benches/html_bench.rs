use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html::{build_dom, serialize, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let mut out = String::with_capacity(blocks * 64 + 32);
    out.push_str("<html><body>");
    for i in 0..blocks {
        out.push_str("<div class=box><span>hello</span><img src=x>");
        if i % 8 == 0 {
            out.push_str("<table><tr><td>cell</td></tr></table>");
        }
        out.push_str("</div>");
    }
    out.push_str("</body></html>");
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri");
        body.push('<');
        body.push_str("pt");
    }
    body.push_str("</script>");
    body
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| {
            let stream = tokenize(black_box(&input));
            black_box(stream.tokens().len());
        });
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| {
            let stream = tokenize(black_box(&input));
            black_box(stream.tokens().len());
        });
    });
}

fn bench_tree_build_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let stream = tokenize(&input);
    c.bench_function("bench_tree_build_large", |b| {
        b.iter(|| {
            let dom = build_dom(black_box(&stream));
            black_box(dom);
        });
    });
}

fn bench_serialize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_serialize_large", |b| {
        b.iter_batched(
            || build_dom(&tokenize(&input)),
            |dom| black_box(serialize(&dom)),
            BatchSize::LargeInput,
        );
    });
}

fn bench_tokenize_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(512 * 1024);
    c.bench_function("bench_tokenize_rawtext_adversarial", |b| {
        b.iter(|| {
            let stream = tokenize(black_box(&input));
            black_box(stream.tokens().len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_tree_build_large,
    bench_serialize_large,
    bench_tokenize_rawtext_adversarial
);
criterion_main!(benches);

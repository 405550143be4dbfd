use html::traverse::{find_body, find_head};
use html::{parse_document, serialize, serialize_children};

const PAGE: &str = "<!DOCTYPE html><html lang=en><head><meta charset=utf-8>\
    <title>Caf&eacute; &amp; bar</title><script>if (a < b && c) { x(\"</div>\"); }</script>\
    </head><body class='home'><!-- nav --><div id=\"top\" hidden><img src=a.png alt=\"A&B\">\
    <br/><p>one<p>two</div></body></html>";

#[test]
fn real_page_survives_parse_and_serialize() {
    let dom = parse_document(PAGE);
    let out = serialize(&dom);
    assert!(out.starts_with("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">"));
    assert!(out.contains("<title>Caf&eacute; &amp; bar</title>"), "got: {out}");
    assert!(out.contains("<script>if (a < b && c) { x(\"</div>\"); }</script>"), "got: {out}");
    assert!(out.contains("<body class=\"home\"><!-- nav -->"), "got: {out}");
    assert!(out.contains("<div id=\"top\" hidden><img src=\"a.png\" alt=\"A&B\"><br>"));
    assert_eq!(serialize(&parse_document(&out)), out);
}

#[test]
fn surgery_on_a_parsed_page() {
    let mut dom = parse_document(PAGE);
    let head = find_head(&dom).expect("head");
    let body = find_body(&dom).expect("body");
    let script = dom.find_first_element(head, "script").expect("script");
    let div = dom.find_first_element(body, "div").expect("div");
    let before = dom.len();

    assert!(dom.move_to_end(body, script));
    dom.unwrap(div);
    assert!(!dom.is_alive(div));
    assert_eq!(dom.len(), before - 1);

    let inner = serialize_children(&dom, body);
    assert!(inner.starts_with("<!-- nav --><img"), "got: {inner}");
    assert!(inner.ends_with("</p></p><script>if (a < b && c) { x(\"</div>\"); }</script>"));

    let img = dom.find_first_element(body, "img").expect("img");
    dom.remove(img);
    assert!(dom.find_first_element(body, "img").is_none());
}

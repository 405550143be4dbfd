#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let stream = html::tokenize(input);
    let dom = html::build_dom(&stream);
    let rendered = html::serialize(&dom);
    let reparsed = html::parse_document(&rendered);
    let _ = html::debug::outline_from_dom(&reparsed, 256);
});

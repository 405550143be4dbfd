//! HTML document model for the rewrite pipeline: tokenizer, arena DOM with tree surgery,
//! incremental tree builder and serializer.

pub mod debug;
pub mod traverse;

mod dom;
mod dom_builder;
mod serialize;
mod tokenizer;
mod types;

use memchr::{memchr, memchr2};

/// Case-insensitive ASCII substring search, memchr-accelerated on the needle's first byte.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &[u8]) -> bool {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return true;
    }
    let hay_len = hay.len();
    if hay_len < n {
        return false;
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    if n == 1 {
        if a == b {
            return memchr(a, hay).is_some();
        }
        return memchr2(a, b, hay).is_some();
    }
    let mut i = 0;
    while i + n <= hay_len {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let Some(rel) = rel else {
            return false;
        };
        let pos = i + rel;
        if pos + n <= hay_len && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return true;
        }
        i = pos + 1;
    }
    false
}

pub use crate::dom::{Attribute, Descendants, Dom, NodeData, NodeId};
pub use crate::dom_builder::{TreeBuilder, build_dom};
pub use crate::serialize::{serialize, serialize_children, serialize_node};
pub use crate::tokenizer::{is_rawtext_element, is_void_element, tokenize};
pub use crate::types::{AtomId, AtomTable, Token, TokenStream};

/// Parse `input` into a DOM without any rewriting.
pub fn parse_document(input: &str) -> Dom {
    build_dom(&tokenize(input))
}

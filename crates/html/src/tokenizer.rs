//! Simplified HTML tokenizer tuned for rewriting rather than rendering.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`.
//! Attribute names use the same ASCII character class.
//!
//! Text and attribute values are kept exactly as written (no entity decoding), so a document
//! that passes through the pipeline untouched serializes back to equivalent markup.
//!
//! Known limitations:
//! - Not a full HTML5 tokenizer/state machine (no WHATWG parse-error recovery).
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>` (see
//!   `find_rawtext_close_tag`).
//! - `<` that does not start a tag, comment or declaration is kept as text.
use crate::types::{AtomId, AtomTable, Token, TokenStream};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let n = close_tag.len();
    debug_assert!(close_tag[0] == b'<' && close_tag[1] == b'/');
    if len < n {
        return None;
    }
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if hay_bytes[i + 1] == b'/' && starts_with_ignore_ascii_case_at(hay_bytes, i, close_tag) {
            let mut k = i + n;
            while k < len && hay_bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay_bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn is_rawtext_element(name: &str) -> bool {
    name == "script" || name == "style"
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn push_text(out: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Text(prev)) = out.last_mut() {
        prev.push_str(text);
        return;
    }
    out.push(Token::Text(text.to_string()));
}

/// Tokenizes into a token stream with interned tag/attribute names.
pub fn tokenize(input: &str) -> TokenStream {
    let mut out = Vec::new();
    let mut atoms = AtomTable::new();
    let mut i = 0;
    let bytes = input.as_bytes();
    let len = bytes.len();
    // Invariant: we scan by byte, but any slice endpoints must be UTF-8 char boundaries.
    // We only cut slices at ASCII structural bytes or at positions reached by scanning
    // ASCII-only tokens; therefore slice endpoints remain UTF-8 boundaries.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            push_text(&mut out, &input[start..i]);
            continue;
        }
        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + HTML_COMMENT_END.len();
                    continue;
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    break;
                }
            }
        }
        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += 2 + end + 1;
            continue;
        }
        if i + 1 < len && (bytes[i + 1] == b'!' || bytes[i + 1] == b'?') {
            // Bogus comment: `<![CDATA[...]>`, `<?xml ...?>` and friends.
            let body_start = i + 2;
            let end = memchr(b'>', &bytes[body_start..]).map_or(len, |rel| body_start + rel);
            out.push(Token::Comment(input[body_start..end].to_string()));
            i = (end + 1).min(len);
            continue;
        }
        if i + 1 < len && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < len && is_name_char(bytes[j]) {
                j += 1;
            }
            let name = (j > start).then(|| atoms.intern_ascii_lowercase(&input[start..j]));
            j = memchr(b'>', &bytes[j..]).map_or(len, |rel| j + rel + 1);
            if let Some(name) = name {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }

        let start = i + 1;
        let mut j = start;
        while j < len && is_name_char(bytes[j]) {
            j += 1;
        }
        if j == start {
            push_text(&mut out, "<");
            i += 1;
            continue;
        }
        let name = atoms.intern_ascii_lowercase(&input[start..j]);
        let (attributes, self_closing, content_start) = scan_attributes(input, j, &mut atoms);
        let name_str = atoms.resolve(name);
        let self_closing = self_closing || is_void_element(name_str);
        let rawtext = is_rawtext_element(name_str) && !self_closing;
        let close_tag = if name_str == "script" {
            SCRIPT_CLOSE_TAG
        } else {
            STYLE_CLOSE_TAG
        };

        out.push(Token::StartTag {
            name,
            attributes,
            self_closing,
        });

        if rawtext {
            let k = content_start;
            match find_rawtext_close_tag(&input[k..], close_tag) {
                Some((rel_start, rel_end)) => {
                    push_text(&mut out, &input[k..k + rel_start]);
                    out.push(Token::EndTag(name));
                    i = k + rel_end;
                    continue;
                }
                None => {
                    // Missing close tag: the remainder is rawtext and the element ends with input.
                    push_text(&mut out, &input[k..]);
                    out.push(Token::EndTag(name));
                    break;
                }
            }
        }

        i = content_start;
    }
    TokenStream::new(out, atoms)
}

type Attributes = Vec<(AtomId, Option<String>)>;

fn scan_attributes(input: &str, mut k: usize, atoms: &mut AtomTable) -> (Attributes, bool, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attributes: Attributes = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            k += 1;
            continue;
        }
        let attribute_name = atoms.intern_ascii_lowercase(&input[name_start..k]);

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let vstart = k;
                k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                let raw = &input[vstart..k];
                if k < len {
                    k += 1;
                }
                Some(raw.to_string())
            } else {
                let vstart = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                Some(input[vstart..k].to_string())
            }
        } else {
            None
        };
        // Duplicate attributes: first one wins, matching browser behavior.
        if !attributes.iter().any(|(existing, _)| *existing == attribute_name) {
            attributes.push((attribute_name, value));
        }
    }
    (attributes, self_closing, k)
}

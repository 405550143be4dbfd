//! Fixed tag membership tables. Names are expected in lowercase, as the tokenizer produces them.

/// Non-visual tags kept even when no ancestor carries a role; removing them tends to break
/// the page.
pub fn is_keeper_tag(name: &str) -> bool {
    matches!(
        name,
        "base" | "link" | "meta" | "noscript" | "script" | "style" | "template" | "title"
    )
}

/// Tags allowed to stay inside a navigational section: links and the small inline or form
/// elements that commonly wrap them.
pub fn is_nav_allowed_tag(name: &str) -> bool {
    matches!(
        name,
        "a" | "b"
            | "br"
            | "button"
            | "em"
            | "font"
            | "form"
            | "i"
            | "img"
            | "input"
            | "label"
            | "option"
            | "select"
            | "span"
            | "strong"
            | "textarea"
            | "u"
    )
}

/// Table layout wrappers; stripped while their content is kept.
pub fn is_table_family_tag(name: &str) -> bool {
    matches!(
        name,
        "caption" | "col" | "colgroup" | "table" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_disjoint_where_it_matters() {
        for tag in ["script", "style", "meta", "link"] {
            assert!(is_keeper_tag(tag));
            assert!(!is_nav_allowed_tag(tag));
            assert!(!is_table_family_tag(tag));
        }
        for tag in ["table", "tr", "td", "th", "tbody"] {
            assert!(is_table_family_tag(tag));
            assert!(!is_keeper_tag(tag));
            assert!(!is_nav_allowed_tag(tag));
        }
    }

    #[test]
    fn nav_allows_links_but_not_blocks() {
        assert!(is_nav_allowed_tag("a"));
        assert!(is_nav_allowed_tag("span"));
        for tag in ["div", "ul", "li", "p", "section"] {
            assert!(!is_nav_allowed_tag(tag), "{tag} should be pruned in nav");
        }
    }
}

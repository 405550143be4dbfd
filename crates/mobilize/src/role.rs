use html::{Dom, NodeId};

/// Attribute authors use to tag an element's place in the mobile layout.
pub const ROLE_ATTRIBUTE: &str = "data-mobile-role";

/// Layout role of an element. Declaration order is the output order of the mobilized body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MobileRole {
    Navigational,
    Header,
    Content,
    Marginal,
    Footer,
}

impl MobileRole {
    pub const ALL: [MobileRole; 5] = [
        MobileRole::Navigational,
        MobileRole::Header,
        MobileRole::Content,
        MobileRole::Marginal,
        MobileRole::Footer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MobileRole::Navigational => "navigational",
            MobileRole::Header => "header",
            MobileRole::Content => "content",
            MobileRole::Marginal => "marginal",
            MobileRole::Footer => "footer",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse an attribute value; surrounding whitespace and ASCII case are ignored.
    /// Unrecognized values yield `None`.
    pub fn from_attr_value(value: &str) -> Option<Self> {
        let value = value.trim();
        MobileRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
    }
}

/// Role declared on `element`, if any.
pub fn classify(dom: &Dom, element: NodeId) -> Option<MobileRole> {
    dom.attr(element, ROLE_ATTRIBUTE)
        .and_then(MobileRole::from_attr_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_leniently() {
        assert_eq!(
            MobileRole::from_attr_value("navigational"),
            Some(MobileRole::Navigational)
        );
        assert_eq!(
            MobileRole::from_attr_value("  Header "),
            Some(MobileRole::Header)
        );
        assert_eq!(
            MobileRole::from_attr_value("FOOTER"),
            Some(MobileRole::Footer)
        );
    }

    #[test]
    fn unknown_values_fail_open() {
        for value in ["", "nav", "sidebar", "content footer"] {
            assert_eq!(MobileRole::from_attr_value(value), None, "value: {value:?}");
        }
    }

    #[test]
    fn declared_order_is_output_order() {
        let mut roles = MobileRole::ALL;
        roles.sort();
        assert_eq!(roles, MobileRole::ALL);
        assert_eq!(MobileRole::Content.index(), 2);
    }

    #[test]
    fn classify_reads_the_role_attribute() {
        let dom = html::parse_document(
            "<div data-mobile-role=marginal></div><p DATA-MOBILE-ROLE=bogus></p><span></span>",
        );
        let kids = dom.children(dom.root()).to_vec();
        assert_eq!(classify(&dom, kids[0]), Some(MobileRole::Marginal));
        assert_eq!(classify(&dom, kids[1]), None);
        assert_eq!(classify(&dom, kids[2]), None);
    }
}

use html::contains_ignore_ascii_case;

const MOBILE_MARKERS: &[&str] = &[
    "Mobile",
    "iPhone",
    "iPod",
    "Android",
    "BlackBerry",
    "BB10",
    "Opera Mini",
    "Opera Mobi",
    "IEMobile",
    "Windows Phone",
    "webOS",
];

const TABLET_MARKERS: &[&str] = &["iPad", "Tablet", "Kindle", "Silk/"];

/// Classifies user-agent strings by device family with case-insensitive marker matching.
#[derive(Clone, Debug)]
pub struct UserAgentMatcher {
    mobile: Vec<String>,
    tablet: Vec<String>,
}

impl Default for UserAgentMatcher {
    fn default() -> Self {
        Self {
            mobile: MOBILE_MARKERS.iter().map(|m| m.to_string()).collect(),
            tablet: TABLET_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl UserAgentMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mobile_marker(mut self, marker: impl Into<String>) -> Self {
        self.mobile.push(marker.into());
        self
    }

    pub fn is_tablet_user_agent(&self, user_agent: &str) -> bool {
        if self
            .tablet
            .iter()
            .any(|m| contains_ignore_ascii_case(user_agent, m.as_bytes()))
        {
            return true;
        }
        // Android tablets omit the "Mobile" token.
        contains_ignore_ascii_case(user_agent, b"Android")
            && !contains_ignore_ascii_case(user_agent, b"Mobile")
    }

    pub fn is_mobile_user_agent(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() || self.is_tablet_user_agent(user_agent) {
            return false;
        }
        self.mobile
            .iter()
            .any(|m| contains_ignore_ascii_case(user_agent, m.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 \
                          (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
                                 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) AppleWebKit/605.1.15 \
                        (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                           (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

    #[test]
    fn phones_are_mobile() {
        let matcher = UserAgentMatcher::new();
        assert!(matcher.is_mobile_user_agent(IPHONE));
        assert!(matcher.is_mobile_user_agent(ANDROID_PHONE));
    }

    #[test]
    fn tablets_and_desktops_are_not_mobile() {
        let matcher = UserAgentMatcher::new();
        assert!(!matcher.is_mobile_user_agent(IPAD));
        assert!(!matcher.is_mobile_user_agent(ANDROID_TABLET));
        assert!(!matcher.is_mobile_user_agent(DESKTOP));
        assert!(!matcher.is_mobile_user_agent(""));
        assert!(matcher.is_tablet_user_agent(IPAD));
    }

    #[test]
    fn extra_markers_extend_detection() {
        let matcher = UserAgentMatcher::new().with_mobile_marker("FeaturePhoneBrowser");
        assert!(matcher.is_mobile_user_agent("FeaturePhoneBrowser/1.0"));
    }
}

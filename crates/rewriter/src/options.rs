//! Read-only configuration snapshot for one rewrite.
//!
//! Loaded from TOML; every field has a default so a partial file (or none) is valid:
//!
//! ```toml
//! static_asset_base = "/static/"
//!
//! [mobilize]
//! enabled = true
//! mobilize_all_user_agents = false
//! inline_assets = false
//! add_spacer = true
//! phone_number = "+1-555-0100"
//! ```

use crate::RewriteError;
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteOptions {
    /// Prefix for URLs of static assets referenced (not inlined) by filters.
    pub static_asset_base: String,
    pub mobilize: MobilizeOptions,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            static_asset_base: "/static/".to_string(),
            mobilize: MobilizeOptions::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MobilizeOptions {
    pub enabled: bool,
    /// Mobilize regardless of user agent (debugging aid).
    pub mobilize_all_user_agents: bool,
    /// Inline the stylesheet and script content instead of referencing asset URLs.
    pub inline_assets: bool,
    /// Reserve space at the top of the body for the client-side header bar.
    pub add_spacer: bool,
    pub debug: bool,
    pub phone_number: Option<String>,
    pub map_location: Option<String>,
    pub conversion_id: Option<String>,
}

impl RewriteOptions {
    pub fn from_toml_str(input: &str) -> Result<Self, RewriteError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, RewriteError> {
        let text = std::fs::read_to_string(path).map_err(|source| RewriteError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let options = RewriteOptions::from_toml_str("").expect("empty config");
        assert_eq!(options, RewriteOptions::default());
        assert!(!options.mobilize.enabled);
    }

    #[test]
    fn partial_mobilize_table() {
        let options = RewriteOptions::from_toml_str(
            "[mobilize]\nenabled = true\nphone_number = \"555\"\n",
        )
        .expect("config");
        assert!(options.mobilize.enabled);
        assert_eq!(options.mobilize.phone_number.as_deref(), Some("555"));
        assert!(!options.mobilize.inline_assets);
        assert_eq!(options.static_asset_base, "/static/");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RewriteOptions::from_toml_str("[mobilize]\nenable = true\n")
            .expect_err("typo must not be ignored");
        assert!(matches!(err, RewriteError::ConfigParse(_)), "got: {err:?}");
    }
}

//! Static assets filters can reference or inline.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaticAsset {
    MobilizeJs,
    MobilizeCss,
}

impl StaticAsset {
    pub fn file_name(self) -> &'static str {
        match self {
            StaticAsset::MobilizeJs => "mobilize.js",
            StaticAsset::MobilizeCss => "mobilize.css",
        }
    }
}

pub trait StaticAssetManager: Send + Sync {
    fn url(&self, asset: StaticAsset) -> String;

    fn content(&self, asset: StaticAsset) -> &str;

    /// Inline content when `inline` is set, otherwise the asset URL.
    fn url_or_content(&self, asset: StaticAsset, inline: bool) -> String {
        if inline {
            self.content(asset).to_string()
        } else {
            self.url(asset)
        }
    }
}

/// Built-in asset bodies served under a configurable URL prefix.
#[derive(Clone, Debug)]
pub struct AssetTable {
    base_url: String,
}

const MOBILIZE_JS: &str = include_str!("../assets/mobilize.js");
const MOBILIZE_CSS: &str = include_str!("../assets/mobilize.css");

impl AssetTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for AssetTable {
    fn default() -> Self {
        Self::new("/static/")
    }
}

impl StaticAssetManager for AssetTable {
    fn url(&self, asset: StaticAsset) -> String {
        let mut url = self.base_url.clone();
        if !url.is_empty() && !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(asset.file_name());
        url
    }

    fn content(&self, asset: StaticAsset) -> &str {
        match asset {
            StaticAsset::MobilizeJs => MOBILIZE_JS,
            StaticAsset::MobilizeCss => MOBILIZE_CSS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_file_name() {
        assert_eq!(
            AssetTable::new("https://cdn.example/s").url(StaticAsset::MobilizeCss),
            "https://cdn.example/s/mobilize.css"
        );
        assert_eq!(
            AssetTable::default().url(StaticAsset::MobilizeJs),
            "/static/mobilize.js"
        );
    }

    #[test]
    fn inline_mode_returns_content() {
        let table = AssetTable::default();
        let js = table.url_or_content(StaticAsset::MobilizeJs, true);
        assert!(js.contains("mobilize.init"), "got: {js}");
        assert_eq!(
            table.url_or_content(StaticAsset::MobilizeJs, false),
            "/static/mobilize.js"
        );
    }
}

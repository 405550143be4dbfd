use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RewriteError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("document already finished; no further input accepted")]
    DocumentClosed,
}

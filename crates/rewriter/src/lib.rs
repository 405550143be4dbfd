//! The rewrite pipeline around HTML filters: configuration, request metadata, statistics,
//! static assets and the driver that feeds a document through a filter chain.

pub mod assets;
pub mod driver;
pub mod filter;
pub mod options;
pub mod statistics;
pub mod user_agent;

mod error;

pub use crate::assets::{AssetTable, StaticAsset, StaticAssetManager};
pub use crate::driver::RewriteDriver;
pub use crate::error::RewriteError;
pub use crate::filter::{HtmlFilter, RequestContext, ScriptUsage};
pub use crate::options::{MobilizeOptions, RewriteOptions};
pub use crate::statistics::{Statistics, Variable};
pub use crate::user_agent::UserAgentMatcher;

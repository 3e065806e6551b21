//! Rigger Chart Resolution
//!
//! Turns a chart reference into a chart staged on local disk plus the
//! [`ChartMetadata`](rigger_core::ChartMetadata) describing it.
//!
//! Supported references:
//!
//! - **Remote archives**: `https://charts.example.com/nginx-1.2.3.tgz`
//! - **Local archives**: `./nginx-1.2.3.tgz`, `file:///charts/nginx.tar.gz`
//! - **Local directories**: `./charts/nginx`
//!
//! The `contentSHA` of the returned metadata is a digest over the staged files,
//! so two resolutions of unchanged content always agree.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rigger_repo::{ChartMetadataResolver, ChartResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ChartResolver::new(".rigger/tmp/chart")?;
//! let metadata = resolver.resolve_chart_metadata("./charts/nginx").await?;
//! println!("{} {} ({})", metadata.name, metadata.version, metadata.content_sha);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod error;
pub mod fetch;
pub mod reference;
pub mod resolver;

pub use error::{RepoError, Result};
pub use fetch::ChartFetcher;
pub use reference::ChartReference;
pub use resolver::{ChartMetadataResolver, ChartResolver};

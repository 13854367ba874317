//! # pagesift — web pages to clean, structured text
//!
//! This crate fetches a web page, inlines the documents its iframes point
//! at, strips presentation-layer noise (hidden elements, navigation, ads,
//! boilerplate), extracts page metadata, and renders the result as
//! sanitized markup, plain text, and markdown.
//!
//! ## Features
//!
//! - Concurrent, partial-failure-tolerant iframe embedding: a broken frame
//!   becomes an inline placeholder, never an error
//! - Metadata merged with precedence: the primary document wins, then
//!   frames in document order
//! - Rule-based sanitization that removes hidden and boilerplate nodes and
//!   unwraps degenerate self-links
//! - Deterministic output for a given page and set of frame responses
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), pagesift::Error> {
//!     let capture = pagesift::resolve("https://example.com", true).await?;
//!
//!     println!("fetched {}", capture.source_url);
//!     println!("{}", capture.markdown);
//!     for (key, value) in &capture.metadata {
//!         println!("{key}: {value}");
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod embed;
pub mod fetch;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod telemetry;

pub use config::CaptureConfig;
pub use error::{Error, Result};
pub use pipeline::{resolve, resolve_with_config, PageCapture};

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::config::CaptureConfig;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::pipeline::PageCapture;
}

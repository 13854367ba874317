//! The capture pipeline
//!
//! Sequences the whole run: fetch the primary page, resolve embedded
//! iframes, merge metadata (primary document first), sanitize, and render.
//! Only the primary fetch can fail the pipeline; everything downstream
//! degrades into visible placeholders inside an otherwise complete result.

use crate::config::CaptureConfig;
use crate::embed::{apply_frames, discover_frames, fetch_frames};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::metadata::{extract_metadata, merge_missing, MetadataMap};
use crate::render::{render_markdown, render_text};
use crate::sanitize::sanitize_tree;
use chrono::Utc;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Everything captured from one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCapture {
    /// URL the page actually resolved from, after redirects
    pub source_url: String,

    /// Capture time in milliseconds since the epoch, assigned once after
    /// rendering completes
    pub timestamp_millis: i64,

    /// Sanitized markup with iframes inlined
    pub raw: String,

    /// Plain text content
    pub text: String,

    /// Markdown rendering of the sanitized markup
    pub markdown: String,

    /// Merged metadata; the primary document wins over embedded frames
    #[serde(default)]
    pub metadata: MetadataMap,
}

/// Capture a page with the default configuration.
pub async fn resolve(url: &str, follow_redirects: bool) -> Result<PageCapture> {
    resolve_with_config(url, follow_redirects, CaptureConfig::default()).await
}

/// Capture a page.
///
/// Fails only when the primary page cannot be retrieved or returns a
/// non-success status. Iframe failures surface as inline placeholder text.
#[instrument(skip(config))]
pub async fn resolve_with_config(
    url: &str,
    follow_redirects: bool,
    config: CaptureConfig,
) -> Result<PageCapture> {
    let fetcher = PageFetcher::new(config)?;
    let page = fetcher.fetch_page(url, follow_redirects).await?;

    // Discovery parses and drops its tree so nothing non-Send is held
    // across the frame fetches; the apply pass re-parses the same input and
    // therefore sees the same iframe sequence.
    let frame_urls = {
        let document = Html::parse_document(&page.body);
        discover_frames(&document, &page.final_url)
    };
    debug!(frames = frame_urls.len(), "resolving embedded iframes");
    let outcomes = fetch_frames(&fetcher, &frame_urls).await;

    let mut document = Html::parse_document(&page.body);

    // The primary document's own metadata is read before frame content is
    // grafted in, so a frame can never shadow a key the page defines.
    let mut metadata = extract_metadata(&document);
    let frame_metadata = apply_frames(&mut document, &frame_urls, outcomes);
    merge_missing(&mut metadata, frame_metadata);

    sanitize_tree(&mut document);
    let raw = document.html();
    let text = render_text(&document);
    let markdown = render_markdown(&raw);

    Ok(PageCapture {
        source_url: page.final_url.to_string(),
        timestamp_millis: Utc::now().timestamp_millis(),
        raw,
        text,
        markdown,
        metadata,
    })
}

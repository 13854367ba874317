//! Rendering adapters: sanitized tree to plain text and to markdown

use html_to_markdown_rs::{convert, ConversionOptions, PreprocessingOptions, PreprocessingPreset};
use scraper::node::Node;
use scraper::Html;
use tracing::warn;

/// Serialize the tree's text content in document order, one trimmed segment
/// per line. Whitespace-only segments are dropped.
pub fn render_text(document: &Html) -> String {
    let mut segments = Vec::new();
    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                segments.push(trimmed.to_string());
            }
        }
    }
    segments.join("\n")
}

/// Convert sanitized markup to markdown.
///
/// Metadata re-extraction is disabled (handled upstream), interactive and
/// vector-graphic elements are stripped, and bare URLs are left as plain
/// text. Conversion failures degrade to an empty string; only the primary
/// fetch may fail the pipeline.
pub fn render_markdown(markup: &str) -> String {
    let options = ConversionOptions {
        extract_metadata: false,
        autolinks: false,
        strip_tags: vec!["button".to_string(), "svg".to_string()],
        preprocessing: PreprocessingOptions {
            enabled: true,
            preset: PreprocessingPreset::Aggressive,
            ..Default::default()
        },
        ..Default::default()
    };

    match convert(markup, Some(options)) {
        Ok(markdown) => markdown,
        Err(err) => {
            warn!(error = %err, "markdown conversion failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_trimmed_segments_in_document_order() {
        let document = Html::parse_document(
            "<html><body><p>  Hi  </p><div><span>there</span>\n   \n<b>friend</b></div></body></html>",
        );
        assert_eq!(render_text(&document), "Hi\nthere\nfriend");
    }

    #[test]
    fn text_of_empty_document_is_empty() {
        let document = Html::parse_document("<html><body></body></html>");
        assert_eq!(render_text(&document), "");
    }

    #[test]
    fn markdown_renders_headings_and_paragraphs() {
        let markdown =
            render_markdown("<html><body><h1>Title</h1><p>Some body text.</p></body></html>");
        assert!(markdown.contains("Title"));
        assert!(markdown.contains("Some body text."));
    }

    #[test]
    fn markdown_does_not_autolink_bare_urls() {
        let markdown =
            render_markdown("<html><body><p>see https://example.com for more</p></body></html>");
        assert!(!markdown.contains("<https://example.com>"));
    }
}

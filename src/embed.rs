//! Iframe resolution: discover, fetch, and inline embedded documents
//!
//! Resolution is split into three passes so the parse tree never crosses an
//! await point: [`discover_frames`] finds iframe sources and resolves them
//! against the base URL, [`fetch_frames`] gathers every payload
//! concurrently, and [`apply_frames`] substitutes outcomes into the tree in
//! original document order. Ordering is positional: discovery and
//! application walk the same parsed input, so outcome N always lands on
//! iframe N regardless of fetch completion order.

use crate::fetch::{FrameOutcome, PageFetcher};
use crate::metadata::{extract_metadata, merge_missing, MetadataMap};
use ego_tree::{NodeId, NodeRef, Tree};
use futures::future;
use futures::stream::{self, StreamExt};
use scraper::node::{Node, Text};
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

/// Find every iframe with a non-empty `src`, in document order, and resolve
/// each source against `base`. A source that cannot be joined keeps its raw
/// text; the fetch for it will fail and degrade to a placeholder, keeping
/// discovery and application aligned position by position.
pub fn discover_frames(document: &Html, base: &Url) -> Vec<String> {
    frame_nodes(document)
        .into_iter()
        .map(|(_, src)| match base.join(&src) {
            Ok(resolved) => resolved.to_string(),
            Err(err) => {
                debug!(%src, error = %err, "iframe src did not resolve against base");
                src
            }
        })
        .collect()
}

/// Fetch every iframe payload concurrently, preserving input order.
///
/// Each fetch is individually bounded by the configured frame timeout; the
/// whole batch is additionally bounded by the join deadline, after which
/// every frame degrades to a failed outcome.
pub async fn fetch_frames(fetcher: &PageFetcher, urls: &[String]) -> Vec<FrameOutcome> {
    if urls.is_empty() {
        return Vec::new();
    }

    let config = fetcher.config();
    let fetches = urls.iter().map(|url| fetcher.fetch_frame(url));
    let gather = async {
        match config.max_concurrent_frames {
            Some(limit) => {
                stream::iter(fetches)
                    .buffered(limit.max(1))
                    .collect::<Vec<_>>()
                    .await
            }
            None => future::join_all(fetches).await,
        }
    };

    match tokio::time::timeout(config.frame_join_timeout, gather).await {
        Ok(outcomes) => outcomes,
        Err(_) => {
            warn!(frames = urls.len(), "iframe batch deadline expired");
            vec![
                FrameOutcome::Failed("timed out waiting for iframe fetches".to_string());
                urls.len()
            ]
        }
    }
}

/// Substitute fetch outcomes into the tree, iframe by iframe in document
/// order, and return the metadata collected from successfully loaded frames
/// (earliest frame wins a contested key).
///
/// Loaded payloads are parsed and their body content grafted into a
/// `<div data-embedded-src="...">` container; payloads with no usable
/// content fall back to a single raw text child. Failures become an inline
/// placeholder text node naming the URL and the reason.
pub fn apply_frames(
    document: &mut Html,
    urls: &[String],
    outcomes: Vec<FrameOutcome>,
) -> MetadataMap {
    let nodes = frame_nodes(document);
    let mut collected = MetadataMap::new();

    for ((node_id, _), (url, outcome)) in nodes.into_iter().zip(urls.iter().zip(outcomes)) {
        match outcome {
            FrameOutcome::Loaded(payload) => {
                let fragment = Html::parse_document(&payload);
                merge_missing(&mut collected, extract_metadata(&fragment));
                replace_with_content(document, node_id, url, &fragment, &payload);
            }
            FrameOutcome::Failed(reason) => {
                let placeholder = format!("[Failed to embed iframe from {url}: {reason}]");
                replace_with_text(document, node_id, placeholder);
            }
        }
    }

    collected
}

fn frame_nodes(document: &Html) -> Vec<(NodeId, String)> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let element = node.value().as_element()?;
            if element.name() != "iframe" {
                return None;
            }
            let src = element.attr("src")?;
            if src.is_empty() {
                return None;
            }
            Some((node.id(), src.to_string()))
        })
        .collect()
}

fn replace_with_text(document: &mut Html, node_id: NodeId, message: String) {
    let Some(mut node) = document.tree.get_mut(node_id) else {
        return;
    };
    node.insert_before(Node::Text(Text {
        text: message.as_str().into(),
    }));
    node.detach();
}

fn replace_with_content(
    document: &mut Html,
    node_id: NodeId,
    src_url: &str,
    fragment: &Html,
    payload: &str,
) {
    let Some(container_value) = container_node(src_url) else {
        // parser yielded no wrapper element; degrade to the raw payload
        replace_with_text(document, node_id, payload.to_string());
        return;
    };

    let container_id = {
        let Some(mut node) = document.tree.get_mut(node_id) else {
            return;
        };
        let container_id = node.insert_before(container_value).id();
        node.detach();
        container_id
    };

    let content: Vec<NodeRef<'_, Node>> = match body_node(fragment) {
        Some(body) => body.children().collect(),
        None => fragment.tree.root().children().collect(),
    };

    if content.is_empty() {
        if let Some(mut container) = document.tree.get_mut(container_id) {
            container.append(Node::Text(Text {
                text: payload.into(),
            }));
        }
        return;
    }

    for child in content {
        graft(&mut document.tree, container_id, child);
    }
}

/// Build the container element carrying the resolved source URL. The URL
/// comes from a successful fetch, so it is already in serialized `Url` form
/// and cannot break out of the attribute.
fn container_node(src_url: &str) -> Option<Node> {
    let shell = Html::parse_fragment(&format!(r#"<div data-embedded-src="{src_url}"></div>"#));
    shell
        .tree
        .root()
        .descendants()
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|element| element.name() == "div")
        })
        .map(|node| node.value().clone())
}

fn body_node(fragment: &Html) -> Option<NodeRef<'_, Node>> {
    fragment.tree.root().descendants().find(|node| {
        node.value()
            .as_element()
            .is_some_and(|element| element.name() == "body")
    })
}

/// Deep-copy a subtree from another tree under `parent`.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let child = {
        let Some(mut parent) = tree.get_mut(parent) else {
            return;
        };
        parent.append(source.value().clone()).id()
    };
    for grandchild in source.children() {
        graft(tree, child, grandchild);
    }
}

//! Rule-based tree sanitization
//!
//! Classifies every element as keep, remove, or unwrap, then rewrites the
//! tree in a single depth-first pass. The pass is idempotent: running it on
//! an already-sanitized tree is a no-op.

use ego_tree::NodeId;
use scraper::node::{Element, Node};
use scraper::Html;
use std::collections::VecDeque;

/// Reserved layout/boilerplate tokens matched as substrings against tag
/// names, ids, and class tokens. Substring matching is intentional: a class
/// named `headers-wrapper` matches `header` and the element is removed.
const LAYOUT_TOKENS: [&str; 8] = [
    "header", "footer", "nav", "sidebar", "menu", "advert", "ads", "sponsor",
];

/// What to do with a node during sanitization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Retain the node and recurse into its children
    Keep,
    /// Detach the node and its entire subtree
    Remove,
    /// Discard the node but splice its children into its former position
    Unwrap,
}

/// Classify one element. First matching rule wins.
pub fn classify(element: &Element) -> Verdict {
    if element.attr("hidden").is_some() {
        return Verdict::Remove;
    }
    if element.attr("aria-hidden") == Some("true") {
        return Verdict::Remove;
    }
    if let Some(style) = element.attr("style") {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return Verdict::Remove;
        }
    }
    if element.name() == "a" && element.attr("href") == Some("#") {
        return Verdict::Unwrap;
    }

    let name = element.name();
    if LAYOUT_TOKENS.iter().any(|token| name.contains(token)) {
        return Verdict::Remove;
    }
    if let Some(id) = element.attr("id") {
        let id = id.to_ascii_lowercase();
        if LAYOUT_TOKENS.iter().any(|token| id.contains(token)) {
            return Verdict::Remove;
        }
    }
    let in_classes = element.classes().any(|class| {
        let class = class.to_ascii_lowercase();
        LAYOUT_TOKENS.iter().any(|token| class.contains(token))
    });
    if in_classes {
        return Verdict::Remove;
    }

    Verdict::Keep
}

/// Sanitize a parsed tree in place.
///
/// Children are visited from a snapshot per parent, so removing or
/// unwrapping a node never skips or duplicates a sibling visit. Children
/// spliced in by an unwrap are re-queued and classified at their new
/// position.
pub fn sanitize_tree(document: &mut Html) {
    let mut parents: Vec<NodeId> = vec![document.tree.root().id()];

    while let Some(parent) = parents.pop() {
        let children: Vec<NodeId> = match document.tree.get(parent) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => continue,
        };

        let mut queue: VecDeque<NodeId> = children.into();
        while let Some(id) = queue.pop_front() {
            let verdict = match document.tree.get(id) {
                Some(node) => match node.value() {
                    Node::Element(element) => classify(element),
                    _ => Verdict::Keep,
                },
                None => continue,
            };

            match verdict {
                Verdict::Keep => parents.push(id),
                Verdict::Remove => {
                    if let Some(mut node) = document.tree.get_mut(id) {
                        node.detach();
                    }
                }
                Verdict::Unwrap => {
                    let grandchildren: Vec<NodeId> = document
                        .tree
                        .get(id)
                        .map(|node| node.children().map(|child| child.id()).collect())
                        .unwrap_or_default();
                    if let Some(mut node) = document.tree.get_mut(id) {
                        for child in &grandchildren {
                            node.insert_id_before(*child);
                        }
                        node.detach();
                    }
                    for child in grandchildren.into_iter().rev() {
                        queue.push_front(child);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitized(html: &str) -> String {
        let mut document = Html::parse_document(html);
        sanitize_tree(&mut document);
        document.html()
    }

    #[test]
    fn removes_hidden_attribute() {
        let html = sanitized("<html><body><div hidden>gone</div><p>kept</p></body></html>");
        assert!(!html.contains("gone"));
        assert!(html.contains("kept"));
    }

    #[test]
    fn removes_aria_hidden_true() {
        let html = sanitized(r#"<body><span aria-hidden="true">gone</span>kept</body>"#);
        assert!(!html.contains("gone"));
        assert!(html.contains("kept"));
    }

    #[test]
    fn removes_inline_display_none_and_visibility_hidden() {
        let html = sanitized(
            r#"<body>
                <span style="display:none">a</span>
                <span style="display : NONE">b</span>
                <span style="color:red; visibility: hidden">c</span>
                <span style="color:red">kept</span>
            </body>"#,
        );
        assert!(!html.contains(">a<"));
        assert!(!html.contains(">b<"));
        assert!(!html.contains(">c<"));
        assert!(html.contains("kept"));
    }

    #[test]
    fn unwraps_self_link_anchors() {
        let html = sanitized(r##"<body><p>before<a href="#">text</a>after</p></body>"##);
        assert!(html.contains("beforetextafter"));
        assert!(!html.contains("<a"));
    }

    #[test]
    fn keeps_real_anchors() {
        let html = sanitized(r#"<body><a href="/somewhere">link</a></body>"#);
        assert!(html.contains(r#"<a href="/somewhere">link</a>"#));
    }

    #[test]
    fn unwrapped_children_are_reclassified() {
        let html = sanitized(r##"<body><a href="#"><nav>chrome</nav>content</a></body>"##);
        assert!(!html.contains("chrome"));
        assert!(html.contains("content"));
    }

    #[test]
    fn removes_boilerplate_by_tag_id_and_class() {
        let html = sanitized(
            r#"<body>
                <nav id="main-nav">links</nav>
                <div id="PageFooter">foot</div>
                <div class="content-header">masthead</div>
                <div class="article">body text</div>
            </body>"#,
        );
        assert!(!html.contains("links"));
        assert!(!html.contains("foot"));
        // substring match on "header" is intentional
        assert!(!html.contains("masthead"));
        assert!(html.contains("body text"));
    }

    #[test]
    fn classifier_rules_apply_in_order() {
        // hidden wins before the anchor unwrap rule ever runs
        let element_html = Html::parse_fragment(r##"<a href="#" hidden>x</a>"##);
        let element = element_html
            .tree
            .root()
            .descendants()
            .find_map(|node| match node.value() {
                Node::Element(el) if el.name() == "a" => Some(el.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(classify(&element), Verdict::Remove);
    }

    #[test]
    fn sanitization_is_idempotent() {
        let source = r##"<html><body>
            <div hidden>gone</div>
            <p>before<a href="#">text</a>after</p>
            <nav>links</nav>
            <div class="article">kept</div>
        </body></html>"##;

        let mut document = Html::parse_document(source);
        sanitize_tree(&mut document);
        let once = document.html();
        sanitize_tree(&mut document);
        let twice = document.html();
        assert_eq!(once, twice);
    }
}

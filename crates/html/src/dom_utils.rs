//! Small DOM traversal helpers shared by the style engine and the engine
//! orchestrator. Grounded on the teacher's `collect.rs`/`traverse.rs` split.

use crate::dom::Node;

/// Collect the concatenated text of every `<style>` element in document
/// order, as `(element, joined_text)` pairs so callers can still see which
/// node a sheet came from (e.g. for a future per-node media-query base).
pub fn collect_style_texts<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match node {
        Node::Element { name, children, .. } => {
            if name.eq_ignore_ascii_case("style") {
                out.push(node);
            }
            for child in children {
                collect_style_texts(child, out);
            }
        }
        Node::Text { .. } | Node::Comment { .. } => {}
    }
}

pub fn style_text_of(style_element: &Node) -> String {
    let mut out = String::new();
    for child in style_element.children() {
        if let Node::Text { text } = child {
            out.push_str(text);
        }
    }
    out
}

/// Collect `<link rel="stylesheet" href="…">` elements in document order,
/// body included (per §4.8 step 6).
pub fn collect_stylesheet_links<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match node {
        Node::Element { name, children, .. } => {
            if name.eq_ignore_ascii_case("link")
                && node.attr_has_token("rel", "stylesheet")
                && node.attr("href").is_some()
            {
                out.push(node);
            }
            for child in children {
                collect_stylesheet_links(child, out);
            }
        }
        Node::Text { .. } | Node::Comment { .. } => {}
    }
}

/// Collect every `<script>` element's source text, in document order, for
/// the (non-evaluating) `js` tokenizer.
pub fn collect_script_texts<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match node {
        Node::Element { name, children, .. } => {
            if name.eq_ignore_ascii_case("script") {
                out.push(node);
            }
            for child in children {
                collect_script_texts(child, out);
            }
        }
        Node::Text { .. } | Node::Comment { .. } => {}
    }
}

pub fn is_non_rendering_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "head" | "style" | "script" | "title" | "meta" | "link" | "base" | "template"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse};

    #[test]
    fn collects_stylesheet_links_in_document_order() {
        let doc = parse(
            b"<html><head><link rel=stylesheet href=one.css></head><body><link rel=\"stylesheet\" href=\"two.css\"></body></html>",
            ParseOptions::default(),
        );
        let mut out = Vec::new();
        collect_stylesheet_links(&doc.root, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].attr("href"), Some("one.css"));
        assert_eq!(out[1].attr("href"), Some("two.css"));
    }
}

//! Tree construction (§4.6 step 1-2): pre-order walk of the styled tree,
//! pruning `display:none` subtrees and non-rendering elements, falling back
//! to `alt` text for `<img>` with no working `src`, and grouping consecutive
//! inline-level siblings under an anonymous block wrapper wherever they are
//! mixed in with block-level siblings.

use css::{PropertyId, StyledNode};
use html::dom_utils::is_non_rendering_element;

use crate::{BoxKind, LayoutBox, LayoutText};

/// `size(url) -> Option<{width, height}>` (§6, consumed by layout). A `None`
/// return means the resource is unavailable and the engine falls back to
/// `alt` text. Takes the raw (already-resolved) `src` string rather than a
/// `Url` so the crate stays decoupled from any particular URL type.
pub trait ImageSizeLookup {
    fn size(&self, src: &str) -> Option<(f32, f32)>;
}

fn is_inline_level(display: &str) -> bool {
    matches!(display, "inline" | "inline-block")
}

/// Build the box tree for `node`, or `None` if `node` (or every element it
/// contains) is pruned. The returned box is never itself pruned away by a
/// caller — `None` only propagates up past elements whose own subtree has
/// nothing left to render.
pub fn build<'a, 't>(node: StyledNode<'a, 't>, images: &dyn ImageSizeLookup) -> Option<LayoutBox<'a, 't>> {
    let dom = node.dom_node();

    if dom.is_text() {
        let text = dom.text().unwrap_or("");
        let mut b = LayoutBox::new(BoxKind::Inline, Some(node));
        b.text = LayoutText::Borrowed(text);
        return Some(b);
    }

    let Some(tag) = dom.tag_name() else {
        // Comment nodes never reach here (cascade already skips them while
        // building the styled tree), but stay total rather than panicking.
        return None;
    };

    if is_non_rendering_element(tag) {
        return None;
    }
    if node.keyword(PropertyId::Display) == "none" {
        return None;
    }

    if tag.eq_ignore_ascii_case("br") {
        return Some(LayoutBox::new(BoxKind::LineBreak, Some(node)));
    }

    if tag.eq_ignore_ascii_case("img") {
        return Some(build_img(node, images));
    }

    let kind = if is_inline_level(&node.keyword(PropertyId::Display)) { BoxKind::Inline } else { BoxKind::Block };
    let children = group_inline_runs(node.children().filter_map(|c| build(c, images)).collect());
    let mut b = LayoutBox::new(kind, Some(node));
    b.children = children;
    Some(b)
}

/// `<img>` with no working `src` renders its `alt` as text (§4.6 step 1).
/// The fallback box keeps the `<img>` element's own `display` rather than
/// the text's (§9 open question / SPEC_FULL decision 2) — it is an element
/// box carrying text, not a plain text box, which is exactly the
/// inline-vs-anonymous-block inconsistency the spec asks us to preserve.
fn build_img<'a, 't>(node: StyledNode<'a, 't>, images: &dyn ImageSizeLookup) -> LayoutBox<'a, 't> {
    let kind = if is_inline_level(&node.keyword(PropertyId::Display)) { BoxKind::Inline } else { BoxKind::Block };
    let src = node.dom_node().attr("src");
    let resolved = src.and_then(|s| images.size(s));
    let mut b = LayoutBox::new(kind, Some(node));
    if let Some(size) = resolved {
        b.intrinsic_size = Some(size);
        return b;
    }
    log::debug!("<img src={src:?}> has no working src; falling back to alt text");
    let alt = node.dom_node().attr("alt").unwrap_or("");
    b.text = LayoutText::Borrowed(alt);
    b
}

/// Group maximal runs of consecutive inline-level children under one
/// anonymous block wrapper each (§4.6 step 2) — but only when the children
/// actually mix block-level and inline-level boxes. A block-level element
/// whose children are *all* inline-level is left unwrapped: it establishes
/// an inline formatting context directly over its own children rather than
/// delegating to a single wrapper (anonymous wrappers are inserted "only
/// between block-level siblings", never as the sole child of their parent).
fn group_inline_runs<'a, 't>(children: Vec<LayoutBox<'a, 't>>) -> Vec<LayoutBox<'a, 't>> {
    if !children.iter().any(|c| c.kind == BoxKind::Block) {
        return children;
    }

    let mut out = Vec::new();
    let mut run: Vec<LayoutBox<'a, 't>> = Vec::new();

    for child in children {
        if child.kind == BoxKind::Block {
            flush_run(&mut run, &mut out);
            out.push(child);
        } else {
            run.push(child);
        }
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run<'a, 't>(run: &mut Vec<LayoutBox<'a, 't>>, out: &mut Vec<LayoutBox<'a, 't>>) {
    if run.is_empty() {
        return;
    }
    let mut wrapper = LayoutBox::new(BoxKind::AnonymousBlock, None);
    wrapper.children = std::mem::take(run);
    out.push(wrapper);
}

#[cfg(test)]
mod tests {
    use super::*;
    use css::{MediaContext, build_style_tree, parse_stylesheet};
    use html::ParseOptions;

    struct NoImages;
    impl ImageSizeLookup for NoImages {
        fn size(&self, _src: &str) -> Option<(f32, f32)> {
            None
        }
    }

    #[test]
    fn mixed_inline_and_block_children_get_wrapped() {
        let doc = html::parse(b"<div>text<p>block</p>more text</div>", ParseOptions::default());
        let sheet = parse_stylesheet("p { display: block; } div { display: block; }");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let div = body.children().next().unwrap();
        let b = build(div, &NoImages).unwrap();
        // anonymous(text), p, anonymous(more text)
        assert_eq!(b.children.len(), 3);
        assert_eq!(b.children[0].kind, BoxKind::AnonymousBlock);
        assert!(!b.children[1].is_anonymous());
        assert_eq!(b.children[2].kind, BoxKind::AnonymousBlock);
    }

    #[test]
    fn display_none_element_is_pruned() {
        let doc = html::parse(b"<div><p style=\"display:none\">x</p><span>y</span></div>", ParseOptions::default());
        let sheet = parse_stylesheet("div{display:block}span{display:inline}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let div = body.children().next().unwrap();
        let b = build(div, &NoImages).unwrap();
        // no block-level sibling survives pruning, so the remaining <span>
        // is left unwrapped rather than boxed in an anonymous block.
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.children[0].kind, BoxKind::Inline);
    }

    #[test]
    fn pure_inline_content_is_not_wrapped() {
        let doc = html::parse(b"<p>hello <b>world</b></p>", ParseOptions::default());
        let sheet = parse_stylesheet("p{display:block}b{display:inline}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let p = body.children().next().unwrap();
        let b = build(p, &NoImages).unwrap();
        assert_eq!(b.children.len(), 2);
        assert!(b.children.iter().all(|c| c.kind != BoxKind::AnonymousBlock));
    }

    #[test]
    fn img_without_src_falls_back_to_alt_text() {
        let doc = html::parse(b"<img alt=\"a cat\">", ParseOptions::default());
        let sheet = parse_stylesheet("img{display:inline}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let img = body.children().next().unwrap();
        let b = build(img, &NoImages).unwrap();
        assert_eq!(b.text.as_str(), "a cat");
        assert_eq!(b.kind, BoxKind::Inline);
    }

    #[test]
    fn head_and_script_elements_are_pruned() {
        let doc = html::parse(b"<html><head><title>t</title></head><body><script>x</script>y</body></html>", ParseOptions::default());
        let sheet = parse_stylesheet("");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let b = build(styled.root(), &NoImages).unwrap();
        // only <body>'s content contributes boxes; <head> produces nothing.
        assert_eq!(b.children.len(), 1);
    }
}

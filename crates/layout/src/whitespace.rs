//! Whitespace collapsing (§4.6 "Whitespace collapsing"): the tree is a
//! sequence of runs ended by any non-inline box, and within a run interior
//! whitespace collapses to a single space with the boundary characters
//! trimmed.

use css::PropertyId;

use crate::{BoxKind, LayoutBox, LayoutText};

/// `true` when `b`'s own children form one whitespace run (all inline-level)
/// rather than being block-level siblings that each start their own run.
fn children_form_a_run(b: &LayoutBox) -> bool {
    b.children.iter().any(|c| matches!(c.kind, BoxKind::Inline | BoxKind::LineBreak))
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// A box is an opaque barrier within a run when its own `white-space` is not
/// `normal` — its text is left untouched and it resets the "currently
/// trimming leading whitespace" state on both sides, same as a `<br>`.
fn is_preserved(b: &LayoutBox) -> bool {
    b.styled.map(|s| s.keyword(PropertyId::WhiteSpace) != "normal").unwrap_or(false)
}

/// Collapse one run (a maximal sequence of inline-level siblings), walking
/// it as a single logical character stream: `first` is true until the first
/// real character of the run has been emitted (trims leading whitespace of
/// the run as a whole, across any number of leading whitespace-only boxes),
/// `pending` is true whenever whitespace has been seen since the last
/// emitted character and still owes a single separating space to whichever
/// box supplies the next one. Leftover `pending` at the end of the run is
/// simply never emitted, which trims trailing whitespace of the last box for
/// free.
fn collapse_run(children: &mut Vec<LayoutBox>) {
    let mut first = true;
    let mut pending = false;

    for child in children.iter_mut() {
        if is_preserved(child) || child.kind == BoxKind::LineBreak {
            first = true;
            pending = false;
            continue;
        }
        if !child.children.is_empty() {
            // Nested inline element (e.g. `<span>`): its own children form a
            // nested run, normalized independently by the recursive
            // `collapse` call once this level is done.
            continue;
        }
        if child.text.is_empty() {
            continue;
        }

        let original = child.text.as_str();
        let mut out = String::with_capacity(original.len());
        for c in original.chars() {
            if is_whitespace(c) {
                if !first {
                    pending = true;
                }
                continue;
            }
            if pending {
                out.push(' ');
                pending = false;
            }
            out.push(c);
            first = false;
        }

        if out != original {
            child.text = LayoutText::Owned(out);
        }
    }

    children.retain(|c| !(c.kind == BoxKind::Inline && c.children.is_empty() && c.text.is_empty() && c.styled.map(|s| s.dom_node().is_text()).unwrap_or(true)));
}

/// Drop anonymous blocks that ended up with no children (every inline box
/// inside collapsed away to nothing).
fn prune_empty_anonymous_blocks(children: &mut Vec<LayoutBox>) {
    children.retain(|c| !(c.kind == BoxKind::AnonymousBlock && c.children.is_empty()));
}

pub fn collapse(b: &mut LayoutBox) {
    if children_form_a_run(b) {
        collapse_run(&mut b.children);
    }
    for child in &mut b.children {
        collapse(child);
    }
    prune_empty_anonymous_blocks(&mut b.children);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{self, ImageSizeLookup};
    use css::{MediaContext, build_style_tree, parse_stylesheet};
    use html::ParseOptions;

    struct NoImages;
    impl ImageSizeLookup for NoImages {
        fn size(&self, _src: &str) -> Option<(f32, f32)> {
            None
        }
    }

    fn find_text<'a, 't>(b: &'a LayoutBox<'_, 't>, out: &mut Vec<&'a str>) {
        if !b.text.is_empty() {
            out.push(b.text.as_str());
        }
        for c in &b.children {
            find_text(c, out);
        }
    }

    #[test]
    fn collapses_interior_whitespace_and_trims_boundaries() {
        let doc = html::parse(b"<p>  hello   \n  world  </p>", ParseOptions::default());
        let sheet = parse_stylesheet("");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let p = body.children().next().unwrap();
        let mut b = tree::build(p, &NoImages).unwrap();
        collapse(&mut b);
        let mut texts = Vec::new();
        find_text(&b, &mut texts);
        assert_eq!(texts, vec!["hello world"]);
    }

    #[test]
    fn is_idempotent() {
        let doc = html::parse(b"<p>  a  b  </p>", ParseOptions::default());
        let sheet = parse_stylesheet("");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let p = body.children().next().unwrap();
        let mut b = tree::build(p, &NoImages).unwrap();
        collapse(&mut b);
        let mut once = Vec::new();
        find_text(&b, &mut once);
        collapse(&mut b);
        let mut twice = Vec::new();
        find_text(&b, &mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn whitespace_only_text_box_is_removed() {
        let doc = html::parse(b"<div><p>a</p>   <p>b</p></div>", ParseOptions::default());
        let sheet = parse_stylesheet("div{display:block}p{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let body = styled.root().children().next().unwrap();
        let div = body.children().next().unwrap();
        let mut b = tree::build(div, &NoImages).unwrap();
        collapse(&mut b);
        // the whitespace-only run between the two <p>s collapses away
        // entirely, leaving just the two block boxes.
        assert_eq!(b.children.len(), 2);
    }
}

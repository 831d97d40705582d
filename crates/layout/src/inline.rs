//! Inline wrapping (§4.6 "Inline wrapping"): greedy left-to-right placement
//! within a row, `<br>` row resets, and the three-way overflow rule (push to
//! a fresh row alone / split splittable text at the latest fitting space /
//! leave it overflowing).
//!
//! Nested inline elements (`<span>`, `<b>`, …) and replaced boxes are
//! atomic for line-breaking purposes — only a bare text box is ever split.
//! This keeps the wrapping algorithm itself simple while still matching the
//! letter of the spec, which only describes splitting "splittable text".

use std::collections::VecDeque;

use css::{LengthValue, PropertyId, StyledNode};

use crate::boxmodel::{self, Containing};
use crate::font::{Font, FontCache, FontWeightClass};
use crate::{BoxKind, EdgeSizes, LayoutBox, LayoutContext, LayoutText};

fn resolve_inline_margin(styled: StyledNode, ctx: &LayoutContext, percent_base: f32) -> EdgeSizes {
    let r = &ctx.resolution;
    let pb = Some(percent_base);
    let m = |id| match styled.length(id, r, pb) {
        LengthValue::Length(px) => px,
        _ => 0.0,
    };
    EdgeSizes {
        top: m(PropertyId::MarginTop),
        right: m(PropertyId::MarginRight),
        bottom: m(PropertyId::MarginBottom),
        left: m(PropertyId::MarginLeft),
    }
}

/// Resolve an atomic row item's own box (padding/border/margin + content
/// size) at local origin `(0, 0)`; the row algorithm translates it into
/// place once its row is known. Returns its margin-box width/height and,
/// for a bare DOM text leaf, its (post-collapse) text for the splitting
/// check.
fn measure_at_origin(item: &mut LayoutBox, fonts: &FontCache, ctx: &LayoutContext, line_width_hint: f32) -> (f32, f32, Option<String>) {
    let Some(styled) = item.styled else {
        return (0.0, 0.0, None);
    };

    let edges = boxmodel::resolve_padding_and_border(styled, ctx, line_width_hint);
    let margin = resolve_inline_margin(styled, ctx, line_width_hint);
    let edge_w = margin.left + margin.right + edges.border.left + edges.border.right + edges.padding.left + edges.padding.right;
    let edge_h = margin.top + margin.bottom + edges.border.top + edges.border.bottom + edges.padding.top + edges.padding.bottom;
    item.dimensions.margin = margin;
    item.dimensions.border = edges.border;
    item.dimensions.padding = edges.padding;
    item.dimensions.content.x = margin.left + edges.border.left + edges.padding.left;
    item.dimensions.content.y = margin.top + edges.border.top + edges.padding.top;

    if item.children.is_empty() {
        if let Some((iw, ih)) = item.intrinsic_size {
            item.dimensions.content.width = iw;
            item.dimensions.content.height = ih;
            return (iw + edge_w, ih + edge_h, None);
        }
        if !item.text.is_empty() {
            let text = item.text.as_str().to_string();
            let size = styled.font_size(&ctx.resolution);
            let weight = FontWeightClass::from_numeric(styled.font_weight());
            let family = styled.raw_value(PropertyId::FontFamily);
            let font = fonts.resolve_family_list(&family);
            let m = font.measure(&text, size, weight);
            let height = size * (text.matches('\n').count() as f32 + 1.0);
            item.dimensions.content.width = m.width;
            item.dimensions.content.height = height;
            return (m.width + edge_w, height + edge_h, Some(text));
        }
        item.dimensions.content.width = 0.0;
        item.dimensions.content.height = 0.0;
        return (edge_w, edge_h, None);
    }

    if boxmodel::has_only_inline_children(item) {
        let (cw, ch) = layout_row_no_wrap(&mut item.children, fonts, ctx);
        item.dimensions.content.width = cw;
        item.dimensions.content.height = ch;
        return (cw + edge_w, ch + edge_h, None);
    }

    // An inline element with a block-level descendant never arises from a
    // conforming tree (tree construction only leaves non-Block children
    // unwrapped when there is no Block among them), but a malformed
    // nesting could still get here; treat it as a shrink-wrapped block
    // rather than panicking.
    let containing = Containing { content_width: line_width_hint, content_height: None };
    boxmodel::layout_box(item, 0.0, 0.0, containing, fonts, ctx);
    let mb = item.dimensions.margin_box();
    (mb.width, mb.height, None)
}

fn new_leaf_with_text<'a, 't>(kind: BoxKind, styled: Option<StyledNode<'a, 't>>, text: String) -> LayoutBox<'a, 't> {
    let mut b = LayoutBox::new(kind, styled);
    b.text = LayoutText::Owned(text);
    b
}

/// The latest space (by byte index) in `text` whose prefix still measures
/// within `available` px, or `None` if even the first space doesn't fit.
fn latest_fitting_space(text: &str, font: &dyn Font, size: f32, weight: FontWeightClass, available: f32) -> Option<usize> {
    text.char_indices()
        .filter(|(_, c)| *c == ' ')
        .map(|(i, _)| i)
        .rev()
        .find(|&idx| font.measure(&text[..idx], size, weight).width <= available)
}

fn translate_subtree(b: &mut LayoutBox, dx: f32, dy: f32) {
    b.dimensions.content.x += dx;
    b.dimensions.content.y += dy;
    for child in &mut b.children {
        translate_subtree(child, dx, dy);
    }
}

/// Shared core: greedily place `items` left to right within `available_width`,
/// wrapping per §4.6 "Inline wrapping", and return the finished (already
/// absolutely positioned) boxes plus the total row-stack height.
fn layout_row_core<'a, 't>(
    items: Vec<LayoutBox<'a, 't>>,
    origin_x: f32,
    origin_y: f32,
    available_width: f32,
    fonts: &FontCache,
    ctx: &LayoutContext,
) -> (Vec<LayoutBox<'a, 't>>, f32) {
    let mut queue: VecDeque<LayoutBox<'a, 't>> = items.into();
    let mut finished = Vec::new();
    let mut current_row: Vec<(LayoutBox<'a, 't>, f32)> = Vec::new();
    let mut row_top = origin_y;
    let mut row_max_height = 0.0f32;
    let mut last_child_end = 0.0f32;

    let mut close_row = |current_row: &mut Vec<(LayoutBox, f32)>, row_top: &mut f32, row_max_height: &mut f32, finished: &mut Vec<LayoutBox>| {
        for (mut b, x_offset) in current_row.drain(..) {
            translate_subtree(&mut b, origin_x + x_offset, *row_top);
            finished.push(b);
        }
        *row_top += *row_max_height;
        *row_max_height = 0.0;
    };

    while let Some(mut item) = queue.pop_front() {
        if item.kind == BoxKind::LineBreak {
            close_row(&mut current_row, &mut row_top, &mut row_max_height, &mut finished);
            last_child_end = 0.0;
            continue;
        }

        let (w, h, splittable_text) = measure_at_origin(&mut item, fonts, ctx, available_width);

        if last_child_end + w > available_width {
            if last_child_end >= available_width {
                close_row(&mut current_row, &mut row_top, &mut row_max_height, &mut finished);
                last_child_end = 0.0;
                current_row.push((item, last_child_end));
                row_max_height = row_max_height.max(h);
                last_child_end += w;
                continue;
            }

            if let Some(text) = splittable_text {
                let styled = item.styled;
                let size = styled.map(|s| s.font_size(&ctx.resolution)).unwrap_or(16.0);
                let weight = styled.map(|s| FontWeightClass::from_numeric(s.font_weight())).unwrap_or(FontWeightClass::Normal);
                let family = styled.map(|s| s.raw_value(PropertyId::FontFamily)).unwrap_or_default();
                let font = fonts.resolve_family_list(&family);
                let remaining = available_width - last_child_end;

                if let Some(split_at) = latest_fitting_space(&text, font.as_ref(), size, weight, remaining) {
                    let left = text[..split_at].trim_end_matches(' ').to_string();
                    let right = text[split_at + 1..].trim_start_matches(' ').to_string();

                    let mut left_box = new_leaf_with_text(item.kind, styled, left);
                    let (lw, lh, _) = measure_at_origin(&mut left_box, fonts, ctx, available_width);
                    current_row.push((left_box, last_child_end));
                    row_max_height = row_max_height.max(lh);
                    let _ = lw;

                    close_row(&mut current_row, &mut row_top, &mut row_max_height, &mut finished);
                    last_child_end = 0.0;

                    if !right.is_empty() {
                        queue.push_front(new_leaf_with_text(item.kind, styled, right));
                    }
                    continue;
                }
            }
            // else: leave the box on the current row even though it overflows.
        }

        current_row.push((item, last_child_end));
        row_max_height = row_max_height.max(h);
        last_child_end += w;
    }

    close_row(&mut current_row, &mut row_top, &mut row_max_height, &mut finished);
    (finished, row_top - origin_y)
}

/// Lay out `children` as a wrapped row within `available_width` (used for
/// anonymous blocks and all-inline block boxes). Returns the total height.
pub fn layout_row(children: &mut Vec<LayoutBox>, origin_x: f32, origin_y: f32, available_width: f32, fonts: &FontCache, ctx: &LayoutContext) -> f32 {
    let items = std::mem::take(children);
    let (placed, height) = layout_row_core(items, origin_x, origin_y, available_width, fonts, ctx);
    *children = placed;
    height
}

/// Atomic sizing for a non-replaced inline element whose own children are
/// all inline-level (§4.6 step 5's "inline boxes with text" generalized to
/// inline boxes with inline content): a single unwrapped row at local
/// origin, so its natural (shrink-to-fit) width and height can be read back.
fn layout_row_no_wrap(children: &mut Vec<LayoutBox>, fonts: &FontCache, ctx: &LayoutContext) -> (f32, f32) {
    let items = std::mem::take(children);
    let (placed, height) = layout_row_core(items, 0.0, 0.0, f32::INFINITY, fonts, ctx);
    let width = placed.iter().map(|b| b.dimensions.margin_box().x + b.dimensions.margin_box().width).fold(0.0f32, f32::max);
    *children = placed;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontCache;
    use crate::tree::{self, ImageSizeLookup};
    use crate::{build_layout_tree, LayoutContext};
    use css::{MediaContext, ResolutionInfo, build_style_tree, parse_stylesheet};
    use html::ParseOptions;

    struct NoImages;
    impl ImageSizeLookup for NoImages {
        fn size(&self, _src: &str) -> Option<(f32, f32)> {
            None
        }
    }

    fn ctx(width: f32) -> LayoutContext {
        LayoutContext { resolution: ResolutionInfo { root_font_size: 16.0, viewport_width: width, viewport_height: 600.0 } }
    }

    fn paragraph_children<'a, 't>(tree: &'a LayoutBox<'_, 't>) -> &'a [LayoutBox<'a, 't>] {
        let body = tree.children.iter().find(|b| b.tag_name() == Some("body")).unwrap();
        let p = &body.children[0];
        &p.children
    }

    #[test]
    fn short_text_stays_on_one_row() {
        let doc = html::parse(b"<p>hi there</p>", ParseOptions::default());
        let sheet = parse_stylesheet("html{display:block}body{display:block}p{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let c = ctx(800.0);
        let tree = build_layout_tree(styled.root(), &NoImages, &fonts, &c).unwrap();
        let children = paragraph_children(&tree);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text.as_str(), "hi there");
    }

    #[test]
    fn a_br_starts_a_new_row() {
        let doc = html::parse(b"<p>one<br>two</p>", ParseOptions::default());
        let sheet = parse_stylesheet("html{display:block}body{display:block}p{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let c = ctx(800.0);
        let tree = build_layout_tree(styled.root(), &NoImages, &fonts, &c).unwrap();
        let children = paragraph_children(&tree);
        let one = children.iter().find(|b| b.text.as_str() == "one").unwrap();
        let two = children.iter().find(|b| b.text.as_str() == "two").unwrap();
        assert!(two.dimensions.content.y > one.dimensions.content.y);
    }

    #[test]
    fn long_text_wraps_at_a_space() {
        let doc = html::parse(b"<p>aaaaaaaaaa bbbbbbbbbb cccccccccc</p>", ParseOptions::default());
        let sheet = parse_stylesheet("html{display:block}body{display:block}p{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        // Narrow enough that the naive monospace estimator (8px/char at
        // font-size 16) can't fit all three words on one row.
        let c = ctx(120.0);
        let tree = build_layout_tree(styled.root(), &NoImages, &fonts, &c).unwrap();
        let children = paragraph_children(&tree);
        assert!(children.len() > 1);
        let first_y = children[0].dimensions.content.y;
        assert!(children.iter().any(|b| b.dimensions.content.y > first_y));
    }

    #[test]
    fn a_single_word_wider_than_the_line_overflows_without_breaking() {
        let doc = html::parse(b"<p>supercalifragilisticexpialidocious</p>", ParseOptions::default());
        let sheet = parse_stylesheet("html{display:block}body{display:block}p{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let c = ctx(10.0);
        let tree = build_layout_tree(styled.root(), &NoImages, &fonts, &c).unwrap();
        let children = paragraph_children(&tree);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text.as_str(), "supercalifragilisticexpialidocious");
    }
}

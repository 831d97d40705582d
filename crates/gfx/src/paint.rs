//! The painter (§4.7): walks a layout tree in pre-order and drives a
//! [`Canvas`] with drawing commands, honoring an optional clip rect and the
//! `html`/`body` background cascade (CSS 2.2 §14.2). Grounded on hastur's
//! `render/render.cpp` (`render_layout`/`render_layout_impl`/`do_render`).

use core_types::ResourceKind;
use css::{Color, PropertyId, ResolutionInfo, StyledNode};
use layout::{BoxKind, LayoutBox, Rect};
use log::debug;

use crate::command::{BorderSide, Borders, Canvas, Corners, FontStyle, Radius};

/// `size(url) -> Option<{width, height}>` (§6) is consumed by layout;
/// painting needs the actual pixels. A `None` return means the box falls
/// back to drawing nothing for that element (layout already committed to
/// `alt` text when the image was unavailable at layout time).
pub trait ImagePixelLookup {
    fn pixels(&self, src: &str) -> Option<Vec<u8>>;
}

pub struct NoImages;

impl ImagePixelLookup for NoImages {
    fn pixels(&self, _src: &str) -> Option<Vec<u8>> {
        None
    }
}

fn background_color_of(b: Option<&LayoutBox>, ctx: &ResolutionInfo) -> Color {
    b.and_then(|b| b.styled).map(|s| s.color(PropertyId::BackgroundColor, ctx)).unwrap_or(Color::TRANSPARENT)
}

/// CSS 2.2 §14.2: if `/html` has a non-transparent background, that's the
/// canvas clear color; else try `/html/body`; else clear white. The `html`
/// box's own background is still drawn afterward in the normal pre-order
/// walk below (this clear doesn't suppress it, per §4.7).
fn clear_canvas_background(canvas: &mut dyn Canvas, root: &LayoutBox, ctx: &ResolutionInfo) {
    let html_bg = background_color_of(Some(root), ctx);
    if !html_bg.is_transparent() {
        canvas.clear(html_bg);
        return;
    }
    let body = root.children.iter().find(|c| c.tag_name().is_some_and(|t| t.eq_ignore_ascii_case("body")));
    let body_bg = background_color_of(body, ctx);
    if !body_bg.is_transparent() {
        canvas.clear(body_bg);
        return;
    }
    canvas.clear(Color::rgba(255, 255, 255, 255));
}

/// Entry point (§4.7). `clip`, when given, is intersected against every
/// box's border-box before descending; an empty intersection skips the
/// whole subtree.
pub fn paint(canvas: &mut dyn Canvas, root: &LayoutBox, ctx: &ResolutionInfo, clip: Option<Rect>, images: &dyn ImagePixelLookup) {
    clear_canvas_background(canvas, root, ctx);
    paint_box(canvas, root, ctx, clip, images);
}

fn paint_box(canvas: &mut dyn Canvas, b: &LayoutBox, ctx: &ResolutionInfo, clip: Option<Rect>, images: &dyn ImagePixelLookup) {
    if let Some(clip) = clip {
        if clip.intersect(&b.dimensions.border_box()).is_empty() {
            return;
        }
    }

    if b.kind != BoxKind::AnonymousBlock && b.kind != BoxKind::LineBreak {
        draw_box(canvas, b, ctx, images);
    }

    for child in &b.children {
        paint_box(canvas, child, ctx, clip, images);
    }
}

fn draw_box(canvas: &mut dyn Canvas, b: &LayoutBox, ctx: &ResolutionInfo, images: &dyn ImagePixelLookup) {
    let Some(styled) = b.styled else { return };

    if !b.text.is_empty() {
        draw_text(canvas, b, styled, ctx);
        return;
    }

    if b.intrinsic_size.is_some() {
        if let Some(src) = styled.dom_node().attr("src") {
            match images.pixels(src) {
                Some(rgba) => {
                    canvas.draw_pixels(b.dimensions.content, &rgba);
                    return;
                }
                None => debug!("no pixels available for {:?} {src}, falling back to box draw", ResourceKind::Image),
            }
        }
    }

    draw_element(canvas, b, styled, ctx);
}

fn draw_text(canvas: &mut dyn Canvas, b: &LayoutBox, styled: StyledNode, ctx: &ResolutionInfo) {
    let families = family_list(&styled.raw_value(PropertyId::FontFamily));
    let size = styled.font_size(ctx);
    let color = styled.color(PropertyId::Color, ctx);
    let style = font_style(styled);
    canvas.draw_text((b.dimensions.content.x, b.dimensions.content.y), b.text.as_str(), &families, size, style, color);
}

fn family_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string()).filter(|s| !s.is_empty()).collect()
}

fn font_style(styled: StyledNode) -> FontStyle {
    let decoration = styled.keyword(PropertyId::TextDecorationLine);
    FontStyle {
        italic: matches!(styled.keyword(PropertyId::FontStyle).as_str(), "italic" | "oblique"),
        bold: styled.font_weight() >= 700,
        underline: decoration.contains("underline"),
        overline: decoration.contains("overline"),
        strikethrough: decoration.contains("line-through"),
    }
}

fn draw_element(canvas: &mut dyn Canvas, b: &LayoutBox, styled: StyledNode, ctx: &ResolutionInfo) {
    let background_color = styled.color(PropertyId::BackgroundColor, ctx);
    let corners = resolve_corners(styled, ctx, &b.dimensions.padding_box());
    let edges = b.dimensions.border;

    if !edges.is_empty_edges() {
        let borders = Borders {
            top: BorderSide { color: styled.color(PropertyId::BorderTopColor, ctx), width: edges.top },
            right: BorderSide { color: styled.color(PropertyId::BorderRightColor, ctx), width: edges.right },
            bottom: BorderSide { color: styled.color(PropertyId::BorderBottomColor, ctx), width: edges.bottom },
            left: BorderSide { color: styled.color(PropertyId::BorderLeftColor, ctx), width: edges.left },
        };
        canvas.draw_rect(b.dimensions.padding_box(), background_color, borders, corners);
    } else if !background_color.is_transparent() {
        canvas.draw_rect(b.dimensions.padding_box(), background_color, Borders::default(), corners);
    }
}

trait EdgeSizesExt {
    fn is_empty_edges(&self) -> bool;
}

impl EdgeSizesExt for layout::EdgeSizes {
    fn is_empty_edges(&self) -> bool {
        self.top <= 0.0 && self.right <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0
    }
}

/// `border-*-radius` longhands are stored as `"H"` or `"H / V"` (§4.1,
/// §4.2). `percent_base` is the padding-box dimension each axis resolves
/// percentages against.
fn resolve_corners(styled: StyledNode, ctx: &ResolutionInfo, padding_box: &Rect) -> Corners {
    Corners {
        top_left: resolve_radius(styled, PropertyId::BorderTopLeftRadius, ctx, padding_box),
        top_right: resolve_radius(styled, PropertyId::BorderTopRightRadius, ctx, padding_box),
        bottom_right: resolve_radius(styled, PropertyId::BorderBottomRightRadius, ctx, padding_box),
        bottom_left: resolve_radius(styled, PropertyId::BorderBottomLeftRadius, ctx, padding_box),
    }
}

fn resolve_radius(styled: StyledNode, id: PropertyId, ctx: &ResolutionInfo, padding_box: &Rect) -> Radius {
    let raw = styled.raw_value(id);
    let (h_str, v_str) = match raw.split_once('/') {
        Some((h, v)) => (h.trim(), v.trim()),
        None => (raw.trim(), raw.trim()),
    };
    let local_font_size = styled.font_size(ctx);
    let horizontal = css::resolve_length(h_str, ctx, local_font_size, Some(padding_box.width)).unwrap_or(0.0).max(0.0);
    let vertical = css::resolve_length(v_str, ctx, local_font_size, Some(padding_box.height)).unwrap_or(0.0).max(0.0);
    Radius { horizontal, vertical }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandRecorder, DrawCommand};
    use css::{MediaContext, build_style_tree, parse_stylesheet};
    use html::ParseOptions;
    use layout::{FontCache, ImageSizeLookup, LayoutContext};

    struct NoImageSizes;
    impl ImageSizeLookup for NoImageSizes {
        fn size(&self, _src: &str) -> Option<(f32, f32)> {
            None
        }
    }

    fn layout_and_paint(html_src: &[u8], css_src: &str) -> Vec<DrawCommand> {
        let doc = html::parse(html_src, ParseOptions::default());
        let sheet = parse_stylesheet(css_src);
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let ctx = LayoutContext { resolution: ResolutionInfo::default() };
        let tree = layout::build_layout_tree(styled.root(), &NoImageSizes, &fonts, &ctx)
            .expect("non-empty layout tree");
        let mut rec = CommandRecorder::new();
        paint(&mut rec, &tree, &ctx.resolution, None, &NoImages);
        rec.take()
    }

    #[test]
    fn fully_transparent_box_with_no_border_emits_no_rect() {
        let cmds = layout_and_paint(b"<div></div>", "html{display:block}body{display:block}div{display:block}");
        assert!(cmds.iter().all(|c| !matches!(c, DrawCommand::DrawRect { .. })));
    }

    #[test]
    fn background_color_emits_a_draw_rect() {
        let cmds = layout_and_paint(
            b"<div></div>",
            "html{display:block}body{display:block}div{display:block;background-color:red}",
        );
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::DrawRect { color, .. } if *color == css::parse_color("red"))));
    }

    #[test]
    fn html_background_becomes_the_canvas_clear_color() {
        let cmds = layout_and_paint(b"<body>x</body>", "html{display:block;background-color:indigo}body{display:block}");
        assert_eq!(cmds.first(), Some(&DrawCommand::Clear { color: css::parse_color("indigo") }));
    }

    #[test]
    fn no_html_or_body_background_clears_white() {
        let cmds = layout_and_paint(b"<body>x</body>", "html{display:block}body{display:block}");
        assert_eq!(cmds.first(), Some(&DrawCommand::Clear { color: Color::rgba(255, 255, 255, 255) }));
    }

    #[test]
    fn text_box_emits_draw_text_with_resolved_color() {
        let cmds = layout_and_paint(
            b"<p>hi</p>",
            "html{display:block}body{display:block}p{display:block;color:red}",
        );
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::DrawText { color, text, .. } if *color == css::parse_color("red") && text == "hi")));
    }

    #[test]
    fn clip_rect_skips_boxes_entirely_outside_it() {
        let doc = html::parse(b"<div style=\"height:10px\"></div><div style=\"height:10px\"></div>", ParseOptions::default());
        let sheet = parse_stylesheet("html{display:block}body{display:block}div{display:block}");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let ctx = LayoutContext { resolution: ResolutionInfo::default() };
        let tree = layout::build_layout_tree(styled.root(), &NoImageSizes, &fonts, &ctx).unwrap();
        let mut rec = CommandRecorder::new();
        let clip = Rect { x: 0.0, y: 0.0, width: 800.0, height: 5.0 };
        paint(&mut rec, &tree, &ctx.resolution, Some(clip), &NoImages);
        // Only the first 5px-tall region is visible; nothing below it should
        // have produced a draw command beyond the initial clear.
        assert!(rec.commands().len() <= 2);
    }
}

//! Box model computation (§4.6 "Box model computation"): resolves
//! padding/border/margin, the CSS2.1 block-width auto-margin algorithm,
//! recursive child placement, and the height-from-children-or-resolved-value
//! rule, for every non-anonymous box. Inline formatting contexts (runs of
//! inline-level children, whether wrapped in an anonymous block or held
//! directly by an all-inline block) are delegated to [`crate::inline`].

use css::{LengthValue, PropertyId, StyledNode};

use crate::font::FontCache;
use crate::{BoxKind, EdgeSizes, LayoutBox, LayoutContext};
use crate::inline;

#[derive(Clone, Copy)]
pub(crate) struct Containing {
    pub content_width: f32,
    /// `None` means indefinite (auto) — a `%` height against this containing
    /// block can't resolve (§4.6 step 4).
    pub content_height: Option<f32>,
}

pub fn layout_root(root: &mut LayoutBox, fonts: &FontCache, ctx: &LayoutContext) {
    let containing =
        Containing { content_width: ctx.resolution.viewport_width, content_height: Some(ctx.resolution.viewport_height) };
    layout_box(root, 0.0, 0.0, containing, fonts, ctx);
}

pub(crate) fn layout_box(b: &mut LayoutBox, x: f32, y: f32, containing: Containing, fonts: &FontCache, ctx: &LayoutContext) {
    match b.kind {
        BoxKind::AnonymousBlock => layout_anonymous(b, x, y, containing, fonts, ctx),
        BoxKind::Block | BoxKind::Inline => layout_block(b, x, y, containing, fonts, ctx),
        BoxKind::LineBreak => {}
    }
}

fn length_or_zero(v: LengthValue) -> f32 {
    match v {
        LengthValue::Length(px) => px,
        _ => 0.0,
    }
}

pub(crate) struct EdgeValues {
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
}

pub(crate) fn resolve_padding_and_border(styled: StyledNode, ctx: &LayoutContext, percent_base: f32) -> EdgeValues {
    let r = &ctx.resolution;
    let pb = Some(percent_base);
    let border_width = |width_id, style_id| {
        let style = styled.keyword(style_id);
        if style == "none" {
            0.0
        } else {
            length_or_zero(styled.length(width_id, r, pb))
        }
    };
    EdgeValues {
        padding: EdgeSizes {
            top: length_or_zero(styled.length(PropertyId::PaddingTop, r, pb)),
            right: length_or_zero(styled.length(PropertyId::PaddingRight, r, pb)),
            bottom: length_or_zero(styled.length(PropertyId::PaddingBottom, r, pb)),
            left: length_or_zero(styled.length(PropertyId::PaddingLeft, r, pb)),
        },
        border: EdgeSizes {
            top: border_width(PropertyId::BorderTopWidth, PropertyId::BorderTopStyle),
            right: border_width(PropertyId::BorderRightWidth, PropertyId::BorderRightStyle),
            bottom: border_width(PropertyId::BorderBottomWidth, PropertyId::BorderBottomStyle),
            left: border_width(PropertyId::BorderLeftWidth, PropertyId::BorderLeftStyle),
        },
    }
}

/// The CSS2.1 §10.3.3 block-width algorithm (§4.6 step 2): resolve `width`,
/// then redistribute `auto` margins so margins + border + padding + width
/// fills the parent's content width exactly, clamped to `min-width`/
/// `max-width` afterward.
fn resolve_block_width(
    styled: StyledNode,
    ctx: &LayoutContext,
    containing_width: f32,
    edges: &EdgeValues,
) -> (f32, f32, f32) {
    let r = &ctx.resolution;
    let pb = Some(containing_width);
    let width = styled.length(PropertyId::Width, r, pb);
    let margin_left = styled.length(PropertyId::MarginLeft, r, pb);
    let margin_right = styled.length(PropertyId::MarginRight, r, pb);

    let non_auto_width = match width {
        LengthValue::Length(px) => Some(px),
        _ => None,
    };
    let fixed_non_margin = edges.border.left + edges.border.right + edges.padding.left + edges.padding.right;

    let (mut content_width, mut ml, mut mr) = match (non_auto_width, margin_left, margin_right) {
        (Some(w), LengthValue::Auto, LengthValue::Auto) => {
            let remainder = (containing_width - fixed_non_margin - w).max(0.0);
            (w, remainder / 2.0, remainder / 2.0)
        }
        (Some(w), LengthValue::Auto, mr) => {
            let mr = length_or_zero(mr);
            ((w), (containing_width - fixed_non_margin - w - mr).max(0.0), mr)
        }
        (Some(w), ml, LengthValue::Auto) => {
            let ml = length_or_zero(ml);
            (w, ml, (containing_width - fixed_non_margin - w - ml).max(0.0))
        }
        (Some(w), ml, mr) => {
            // Over-constrained: the spec's redistribution only kicks in for
            // auto margins, so an explicit width with explicit margins is
            // used as given, following CSS2.1's "right is over-determined"
            // fallback of trusting the author's margins.
            (w, length_or_zero(ml), length_or_zero(mr))
        }
        (None, ml, mr) => {
            // `width: auto` fills whatever the (non-auto) margins leave.
            let ml = if matches!(ml, LengthValue::Auto) { 0.0 } else { length_or_zero(ml) };
            let mr = if matches!(mr, LengthValue::Auto) { 0.0 } else { length_or_zero(mr) };
            ((containing_width - fixed_non_margin - ml - mr).max(0.0), ml, mr)
        }
    };

    let min_width = length_or_zero(styled.length(PropertyId::MinWidth, r, pb));
    let max_width = match styled.length(PropertyId::MaxWidth, r, pb) {
        LengthValue::Length(px) => Some(px),
        _ => None,
    };
    content_width = content_width.max(min_width);
    if let Some(max_width) = max_width {
        content_width = content_width.min(max_width);
    }
    if content_width < 0.0 {
        content_width = 0.0;
        ml = 0.0;
        mr = 0.0;
    }

    (ml, mr, content_width)
}

pub(crate) fn has_only_inline_children(b: &LayoutBox) -> bool {
    b.children.iter().any(|c| matches!(c.kind, BoxKind::Inline | BoxKind::LineBreak))
}

fn layout_block(b: &mut LayoutBox, x: f32, y: f32, containing: Containing, fonts: &FontCache, ctx: &LayoutContext) {
    let Some(styled) = b.styled else { return };
    let r = &ctx.resolution;

    let edges = resolve_padding_and_border(styled, ctx, containing.content_width);
    let (margin_left, margin_right, content_width) = resolve_block_width(styled, ctx, containing.content_width, &edges);
    let margin_top = length_or_zero(styled.length(PropertyId::MarginTop, r, Some(containing.content_width)));
    let margin_bottom = length_or_zero(styled.length(PropertyId::MarginBottom, r, Some(containing.content_width)));

    b.dimensions.padding = edges.padding;
    b.dimensions.border = edges.border;
    b.dimensions.margin = EdgeSizes { top: margin_top, right: margin_right, bottom: margin_bottom, left: margin_left };

    b.dimensions.content.x = x + margin_left + edges.border.left + edges.padding.left;
    b.dimensions.content.y = y + margin_top + edges.border.top + edges.padding.top;
    b.dimensions.content.width = content_width;

    let own_height = styled.length(PropertyId::Height, r, containing.content_height);
    let own_height_px = match own_height {
        LengthValue::Length(px) => Some(px),
        _ => None,
    };

    let child_containing = Containing { content_width, content_height: own_height_px };

    let children_height = if !b.children.is_empty() && has_only_inline_children(b) {
        inline::layout_row(&mut b.children, b.dimensions.content.x, b.dimensions.content.y, content_width, fonts, ctx)
    } else {
        let mut cursor_y = b.dimensions.content.y;
        for child in &mut b.children {
            layout_box(child, b.dimensions.content.x, cursor_y, child_containing, fonts, ctx);
            cursor_y += child.dimensions.margin_box().height;
        }
        cursor_y - b.dimensions.content.y
    };

    let min_height = length_or_zero(styled.length(PropertyId::MinHeight, r, containing.content_height));
    let max_height = match styled.length(PropertyId::MaxHeight, r, containing.content_height) {
        LengthValue::Length(px) => Some(px),
        _ => None,
    };
    let mut height = own_height_px.unwrap_or(children_height);
    height = height.max(min_height);
    if let Some(max_height) = max_height {
        height = height.min(max_height);
    }
    b.dimensions.content.height = height.max(0.0);
}

fn layout_anonymous(b: &mut LayoutBox, x: f32, y: f32, containing: Containing, fonts: &FontCache, ctx: &LayoutContext) {
    b.dimensions.padding = EdgeSizes::default();
    b.dimensions.border = EdgeSizes::default();
    b.dimensions.margin = EdgeSizes::default();
    b.dimensions.content.x = x;
    b.dimensions.content.y = y;
    b.dimensions.content.width = containing.content_width;
    b.dimensions.content.height = inline::layout_row(&mut b.children, x, y, containing.content_width, fonts, ctx);
}

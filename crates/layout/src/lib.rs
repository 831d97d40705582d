//! Layout engine (§4.6): turns a styled tree into a box tree with resolved
//! content/padding/border/margin rectangles, collapsed and wrapped inline
//! text, and `text-transform` applied.
//!
//! Pipeline: `tree::build` (box generation + anonymous block insertion) ->
//! `whitespace::collapse` -> `transform::apply_text_transform` ->
//! `boxmodel::layout` (box model + inline wrapping, §4.6 "Box model
//! computation" / "Inline wrapping"). `build_layout_tree` below sequences all
//! four for callers that just want a finished tree.

mod boxmodel;
pub mod font;
mod inline;
mod transform;
mod tree;
mod whitespace;

pub use font::{Font, FontCache, FontProvider, FontWeightClass, TextMetrics};
pub use tree::ImageSizeLookup;

use css::{ResolutionInfo, StyledNode};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Expand by `edges` on every side (used to go content -> padding ->
    /// border -> margin box, §3 "margin-box is border-box ⊕ margin" etc.).
    pub fn expanded_by(&self, edges: &EdgeSizes) -> Rect {
        Rect {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.left + edges.right,
            height: self.height + edges.top + edges.bottom,
        }
    }

    /// Intersection with `other`; an empty result (non-positive width or
    /// height) means "nothing to draw" for the painter's clip check (§4.7).
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);
        Rect { x: x1, y: y1, width: (x2 - x1).max(0.0), height: (y2 - y1).max(0.0) }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub content: Rect,
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
    pub margin: EdgeSizes,
}

impl Dimensions {
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(&self.padding)
    }

    pub fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(&self.border)
    }

    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(&self.margin)
    }
}

/// Layout-time text storage (§3, §9 "text lifetime"): borrowed when
/// whitespace collapsing didn't change anything, owned only when it did, and
/// `None` for non-text boxes. Never allocates unless the text actually
/// changed.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutText<'a> {
    None,
    Borrowed(&'a str),
    Owned(String),
}

impl<'a> LayoutText<'a> {
    pub fn as_str(&self) -> &str {
        match self {
            LayoutText::None => "",
            LayoutText::Borrowed(s) => s,
            LayoutText::Owned(s) => s,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, LayoutText::None) || self.as_str().is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxKind {
    Block,
    Inline,
    /// Layout-only wrapper inserted between a block parent and a run of
    /// inline siblings (§3, GLOSSARY "Anonymous block"). Carries no style.
    AnonymousBlock,
    /// `<br>`: forces a new line in the enclosing anonymous block and is
    /// otherwise zero-sized.
    LineBreak,
}

pub struct LayoutBox<'a, 't> {
    pub kind: BoxKind,
    /// `None` for anonymous boxes and `<br>` (§3 "an anonymous box has no
    /// styled_ref"); `Some` for every element or text box.
    pub styled: Option<StyledNode<'a, 't>>,
    pub dimensions: Dimensions,
    pub children: Vec<LayoutBox<'a, 't>>,
    pub text: LayoutText<'a>,
    /// Set only for `<img>` with a resolvable `src` (§4.6 step 5): its
    /// content width/height come straight from the image's intrinsic size
    /// rather than the general box-model width algorithm.
    pub intrinsic_size: Option<(f32, f32)>,
}

impl<'a, 't> LayoutBox<'a, 't> {
    fn new(kind: BoxKind, styled: Option<StyledNode<'a, 't>>) -> Self {
        LayoutBox {
            kind,
            styled,
            dimensions: Dimensions::default(),
            children: Vec::new(),
            text: LayoutText::None,
            intrinsic_size: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.styled.is_none()
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.styled.and_then(|s| s.dom_node().tag_name())
    }
}

/// Top-to-bottom configuration for a layout pass (§4.8 "NavigateOptions"
/// shaped call sites).
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext {
    pub resolution: ResolutionInfo,
}

/// Run tree construction, whitespace collapsing, text-transform, and box
/// model computation in sequence (§4.6). Returns `None` when the root itself
/// is `display:none` (§4.6 "Failure modes": treated as navigation success
/// with an empty tree).
pub fn build_layout_tree<'a, 't>(
    root: StyledNode<'a, 't>,
    images: &dyn ImageSizeLookup,
    fonts: &FontCache,
    ctx: &LayoutContext,
) -> Option<LayoutBox<'a, 't>> {
    let mut tree = tree::build(root, images)?;
    whitespace::collapse(&mut tree);
    transform::apply_text_transform(&mut tree);
    boxmodel::layout_root(&mut tree, fonts, ctx);
    Some(tree)
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
    fn display_none_root_produces_no_tree() {
        let doc = html::parse(b"<html style=\"display:none\"></html>", ParseOptions::default());
        let sheet = parse_stylesheet("");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let ctx = LayoutContext { resolution: ResolutionInfo::default() };
        assert!(build_layout_tree(styled.root(), &NoImages, &fonts, &ctx).is_none());
    }

    #[test]
    fn simple_paragraph_gets_a_text_box_scenario_3() {
        let doc = html::parse(b"<div><p>   hello   </p></div>", ParseOptions::default());
        let sheet = parse_stylesheet("");
        let styled = build_style_tree(&doc, &sheet, &MediaContext::default());
        let fonts = FontCache::without_provider();
        let ctx = LayoutContext { resolution: ResolutionInfo::default() };
        let tree = build_layout_tree(styled.root(), &NoImages, &fonts, &ctx).unwrap();

        fn find_text<'a, 't>(b: &'a LayoutBox<'_, 't>) -> Option<&'a str> {
            if !b.text.is_empty() {
                return Some(b.text.as_str());
            }
            b.children.iter().find_map(find_text)
        }
        assert_eq!(find_text(&tree), Some("hello"));
    }
}

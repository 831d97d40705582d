//! Style engine (§4.4): builds a styled-node tree mirroring the DOM,
//! matching rules per element and honoring inheritance, `initial`/
//! `inherit`/`unset`/`currentcolor`/`var()`.
//!
//! The tree is stored as an arena (`StyleTree`) with children carrying
//! owning indices and parents carrying a non-owning index back-edge (§9
//! "cyclic graphs") rather than raw pointers, so the whole module is safe
//! Rust. `StyledNode` is a cheap `Copy` handle into the arena.

use std::borrow::Cow;

use html::{Document, Node};

use crate::media::MediaContext;
use crate::parser::{Rule, Stylesheet, parse_inline_declarations};
use crate::properties::PropertyId;
use crate::selector::{self, ElementLike};
use crate::values::{self, Color, ResolutionInfo};

struct Entry<'a> {
    dom: &'a Node,
    properties: Vec<(PropertyId, String)>,
    custom_properties: Vec<(String, String)>,
    children: Vec<usize>,
    parent: Option<usize>,
}

pub struct StyleTree<'a> {
    nodes: Vec<Entry<'a>>,
    root: usize,
}

impl<'a> StyleTree<'a> {
    pub fn root(&self) -> StyledNode<'a, '_> {
        StyledNode { tree: self, idx: self.root }
    }
}

#[derive(Clone, Copy)]
pub struct StyledNode<'a, 't> {
    tree: &'t StyleTree<'a>,
    idx: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthValue {
    Auto,
    None,
    Length(f32),
}

enum Effective<'x> {
    Literal(Cow<'x, str>),
    Inherit,
    InitialValue,
}

impl<'a, 't> StyledNode<'a, 't> {
    fn entry(&self) -> &'t Entry<'a> {
        &self.tree.nodes[self.idx]
    }

    pub fn dom_node(&self) -> &'a Node {
        self.entry().dom
    }

    pub fn parent(&self) -> Option<Self> {
        self.entry().parent.map(|p| StyledNode { tree: self.tree, idx: p })
    }

    pub fn children(&self) -> impl Iterator<Item = StyledNode<'a, 't>> + 't {
        let tree = self.tree;
        self.entry().children.iter().map(move |&i| StyledNode { tree, idx: i })
    }

    /// Reverse scan — last matching declaration wins (§9 "property store").
    pub fn get_raw(&self, id: PropertyId) -> Option<&'t str> {
        self.entry().properties.iter().rev().find(|(pid, _)| *pid == id).map(|(_, v)| v.as_str())
    }

    fn effective(&self, id: PropertyId) -> Effective<'t> {
        let Some(raw) = self.get_raw(id) else {
            return if id.is_inherited() { Effective::Inherit } else { Effective::InitialValue };
        };
        let trimmed = raw.trim();
        match trimmed {
            "inherit" => return Effective::Inherit,
            "initial" => return Effective::InitialValue,
            "unset" => return if id.is_inherited() { Effective::Inherit } else { Effective::InitialValue },
            _ => {}
        }
        if trimmed.starts_with("var(") {
            return match self.resolve_var_chain(trimmed, &mut Vec::new()) {
                Some(resolved) => match resolved.trim() {
                    "inherit" => Effective::Inherit,
                    "initial" => Effective::InitialValue,
                    _ => Effective::Literal(Cow::Owned(resolved)),
                },
                None => Effective::InitialValue,
            };
        }
        Effective::Literal(Cow::Borrowed(trimmed))
    }

    /// Walk `--name` up the parent chain; first hit wins. `visited` guards
    /// against circular `var()` references.
    fn lookup_custom_property(&self, name: &str, visited: &mut Vec<String>) -> Option<String> {
        if visited.iter().any(|v| v == name) {
            return None;
        }
        visited.push(name.to_string());
        let mut node = Some(*self);
        while let Some(n) = node {
            if let Some((_, v)) = n.entry().custom_properties.iter().rev().find(|(k, _)| k == name) {
                let trimmed = v.trim();
                return Some(n.resolve_var_chain(trimmed, visited).unwrap_or_else(|| trimmed.to_string()));
            }
            node = n.parent();
        }
        None
    }

    /// `raw` is assumed already trimmed. Returns `None` when `raw` isn't a
    /// `var(...)` expression, or when resolution (including fallback) fails
    /// — the caller falls back to the property's initial value in that case.
    fn resolve_var_chain(&self, raw: &str, visited: &mut Vec<String>) -> Option<String> {
        let inner = raw.strip_prefix("var(")?.strip_suffix(')')?;
        let (name, fallback) = split_var_args(inner);
        if let Some(found) = self.lookup_custom_property(name.trim(), visited) {
            return Some(found);
        }
        fallback.map(|fb| {
            let fb = fb.trim();
            self.resolve_var_chain(fb, visited).unwrap_or_else(|| fb.to_string())
        })
    }

    pub fn color(&self, id: PropertyId, ctx: &ResolutionInfo) -> Color {
        match self.effective(id) {
            Effective::Inherit => self
                .parent()
                .map(|p| p.color(id, ctx))
                .unwrap_or_else(|| values::parse_color(id.initial_value())),
            Effective::InitialValue => self.color_literal(id.initial_value(), id, ctx),
            Effective::Literal(v) => self.color_literal(&v, id, ctx),
        }
    }

    fn color_literal(&self, v: &str, id: PropertyId, ctx: &ResolutionInfo) -> Color {
        if v.trim().eq_ignore_ascii_case("currentcolor") {
            return if id == PropertyId::Color {
                self.parent().map(|p| p.color(PropertyId::Color, ctx)).unwrap_or(Color::BLACK)
            } else {
                self.color(PropertyId::Color, ctx)
            };
        }
        if v.trim().eq_ignore_ascii_case("canvastext") {
            return Color::BLACK;
        }
        values::parse_color(v)
    }

    pub fn length(&self, id: PropertyId, ctx: &ResolutionInfo, percent_base: Option<f32>) -> LengthValue {
        match self.effective(id) {
            Effective::Inherit => self.parent().map(|p| p.length(id, ctx, percent_base)).unwrap_or(LengthValue::Auto),
            Effective::InitialValue => self.length_literal(id.initial_value(), ctx, percent_base),
            Effective::Literal(v) => self.length_literal(&v, ctx, percent_base),
        }
    }

    fn length_literal(&self, v: &str, ctx: &ResolutionInfo, percent_base: Option<f32>) -> LengthValue {
        if values::is_auto(v) {
            return LengthValue::Auto;
        }
        if values::is_none(v) {
            return LengthValue::None;
        }
        let local_font_size = self.font_size(ctx);
        match values::resolve_length(v, ctx, local_font_size, percent_base) {
            Some(px) => LengthValue::Length(px),
            None => {
                log::warn!("unresolvable length value {v:?}; defaulting to 0");
                LengthValue::Length(0.0)
            }
        }
    }

    /// Plain keyword-valued properties (`display`, `white-space`,
    /// `text-align`, …) after the keyword/`var()` walk, lowercased.
    pub fn keyword(&self, id: PropertyId) -> String {
        match self.effective(id) {
            Effective::Inherit => self.parent().map(|p| p.keyword(id)).unwrap_or_else(|| id.initial_value().to_string()),
            Effective::InitialValue => id.initial_value().to_string(),
            Effective::Literal(v) => v.trim().to_ascii_lowercase(),
        }
    }

    /// Same keyword/`inherit`/`initial`/`var()` walk as [`Self::keyword`] but
    /// case-preserving, for values where case is meaningful (`font-family`
    /// names, `background-image` URLs).
    pub fn raw_value(&self, id: PropertyId) -> String {
        match self.effective(id) {
            Effective::Inherit => self.parent().map(|p| p.raw_value(id)).unwrap_or_else(|| id.initial_value().to_string()),
            Effective::InitialValue => id.initial_value().to_string(),
            Effective::Literal(v) => v.trim().to_string(),
        }
    }

    /// Font-size's ancestor-walk heuristic (§4.4, §9 decision 3): find the
    /// nearest ancestor (including self) whose declaration is not
    /// `inherit`/`unset`, then evaluate *that* declaration against *its
    /// parent's* font-size (16px if there is none). Strictly decreases
    /// depth each step, so it cannot loop.
    pub fn font_size(&self, ctx: &ResolutionInfo) -> f32 {
        let mut node = *self;
        loop {
            let is_inherit_like = match node.get_raw(PropertyId::FontSize) {
                None => true,
                Some(r) => matches!(r.trim(), "inherit" | "unset"),
            };
            if !is_inherit_like {
                break;
            }
            match node.parent() {
                Some(p) => node = p,
                None => break,
            }
        }

        let parent_font_size = node.parent().map(|p| p.font_size(ctx)).unwrap_or(ctx.root_font_size);
        match node.get_raw(PropertyId::FontSize) {
            None => ctx.root_font_size,
            Some(raw) => {
                let trimmed = raw.trim();
                let resolved = node.resolve_var_chain(trimmed, &mut Vec::new());
                let v = resolved.as_deref().unwrap_or(trimmed);
                if v.eq_ignore_ascii_case("initial") {
                    return 16.0;
                }
                values::resolve_font_size(v, ctx, parent_font_size)
            }
        }
    }

    pub fn font_weight(&self) -> u16 {
        match self.effective(PropertyId::FontWeight) {
            Effective::Inherit => self.parent().map(|p| p.font_weight()).unwrap_or(400),
            Effective::InitialValue => 400,
            Effective::Literal(v) => {
                let v = v.trim();
                if let Some(w) = values::resolve_font_weight_absolute(v) {
                    return w;
                }
                if matches!(v, "bolder" | "lighter") {
                    let parent_weight = self.parent().map(|p| p.font_weight()).unwrap_or(400);
                    return values::relative_font_weight(v, parent_weight);
                }
                400
            }
        }
    }
}

fn split_var_args(inner: &str) -> (&str, Option<&str>) {
    let mut depth = 0i32;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => return (&inner[..i], Some(&inner[i + 1..])),
            _ => {}
        }
    }
    (inner, None)
}

#[derive(Clone, Copy)]
struct DomCursor<'b, 'a> {
    chain: &'b [&'a Node],
}

impl<'b, 'a> ElementLike for DomCursor<'b, 'a> {
    fn tag_name(&self) -> &str {
        self.chain.last().and_then(|n| n.tag_name()).unwrap_or("")
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.chain.last().and_then(|n| n.attr(name))
    }

    fn parent(&self) -> Option<Self> {
        if self.chain.len() <= 1 {
            None
        } else {
            Some(DomCursor { chain: &self.chain[..self.chain.len() - 1] })
        }
    }
}

fn rule_applies(rule: &Rule, cursor: &DomCursor<'_, '_>, ctx: &MediaContext) -> bool {
    if let Some(q) = &rule.media_query {
        if !q.evaluate(ctx) {
            return false;
        }
    }
    rule.selectors.iter().any(|s| selector::is_match(cursor, s))
}

/// Build the styled tree (§4.4). `@font-face`'s literal `"@font-face"`
/// selector never matches a real element so it naturally never contributes
/// declarations here.
pub fn build_style_tree<'a>(doc: &'a Document, sheet: &Stylesheet, ctx: &MediaContext) -> StyleTree<'a> {
    let mut tree = StyleTree { nodes: Vec::new(), root: 0 };
    let mut ancestors: Vec<&'a Node> = Vec::new();
    let root = build_node(&mut tree, &doc.root, None, sheet, ctx, &mut ancestors);
    tree.root = root;
    tree
}

fn build_node<'a>(
    tree: &mut StyleTree<'a>,
    dom: &'a Node,
    parent: Option<usize>,
    sheet: &Stylesheet,
    ctx: &MediaContext,
    ancestors: &mut Vec<&'a Node>,
) -> usize {
    let idx = tree.nodes.len();
    tree.nodes.push(Entry { dom, properties: Vec::new(), custom_properties: Vec::new(), children: Vec::new(), parent });
    if let Some(p) = parent {
        tree.nodes[p].children.push(idx);
    }

    ancestors.push(dom);
    if dom.is_element() {
        collect_declarations(tree, idx, dom, ancestors, sheet, ctx);
    }

    for child in dom.children() {
        if matches!(child, Node::Comment { .. }) {
            continue;
        }
        build_node(tree, child, Some(idx), sheet, ctx, ancestors);
    }
    ancestors.pop();
    idx
}

/// Four-bucket cascade order (§9 open question, decided in DESIGN.md):
/// stylesheet-normal, inline-normal, stylesheet-important, inline-important
/// — each later bucket outranking the earlier ones via last-write-wins.
fn collect_declarations<'a>(
    tree: &mut StyleTree<'a>,
    idx: usize,
    dom: &'a Node,
    ancestors: &[&'a Node],
    sheet: &Stylesheet,
    ctx: &MediaContext,
) {
    let cursor = DomCursor { chain: ancestors };
    let inline_rule = dom.attr("style").map(parse_inline_declarations);

    for rule in &sheet.rules {
        if rule_applies(rule, &cursor, ctx) {
            tree.nodes[idx].properties.extend(rule.declarations.iter().cloned());
            tree.nodes[idx].custom_properties.extend(rule.custom_properties.iter().cloned());
        }
    }
    if let Some(inline) = &inline_rule {
        tree.nodes[idx].properties.extend(inline.declarations.iter().cloned());
        tree.nodes[idx].custom_properties.extend(inline.custom_properties.iter().cloned());
    }
    for rule in &sheet.rules {
        if rule_applies(rule, &cursor, ctx) {
            tree.nodes[idx].properties.extend(rule.important_declarations.iter().cloned());
        }
    }
    if let Some(inline) = &inline_rule {
        tree.nodes[idx].properties.extend(inline.important_declarations.iter().cloned());
    }
}

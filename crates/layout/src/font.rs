//! The `Font`/font-provider interfaces the layout engine consumes (§6), plus
//! the shared font cache (§5 "Shared resources") and the naive fallback
//! estimator used when no family resolves so layout is always produced (§4.6
//! "Failure modes").

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Coarse weight split layout passes to the font at measurement time (§4.6
/// "Font weight conversion"): the full numeric weight collapses to whichever
/// side of 700 it falls on before it ever reaches a `Font`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeightClass {
    Normal,
    Bold,
}

impl FontWeightClass {
    pub fn from_numeric(weight: u16) -> FontWeightClass {
        if weight >= 700 { FontWeightClass::Bold } else { FontWeightClass::Normal }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// A resolved font handle. `measure` is the only operation the layout engine
/// needs from it.
pub trait Font {
    fn measure(&self, text: &str, size_px: f32, weight: FontWeightClass) -> TextMetrics;
}

/// `font(family) -> Option<Font>` (§6, consumed). One call per distinct
/// family name; results are cached by `FontCache` below.
pub trait FontProvider {
    fn font(&self, family: &str) -> Option<Rc<dyn Font>>;
}

/// Deterministic fallback so tests (and pages with no installed fonts) never
/// depend on a real font backend: `ceil(font-size / 2)` px per character,
/// `font-size` tall.
struct NaiveMonospace;

impl Font for NaiveMonospace {
    fn measure(&self, text: &str, size_px: f32, _weight: FontWeightClass) -> TextMetrics {
        let per_char = (size_px / 2.0).ceil();
        TextMetrics { width: text.chars().count() as f32 * per_char, height: size_px }
    }
}

/// `mapping{family-name -> font-handle}` shared by the layout and paint
/// phases (§5): populated on first use, never invalidated during a page.
/// Interior-mutable so layout and paint can share one `&FontCache` without a
/// `RefCell` at every call site.
pub struct FontCache {
    provider: Option<Box<dyn FontProvider>>,
    cache: RefCell<HashMap<String, Option<Rc<dyn Font>>>>,
    fallback: Rc<dyn Font>,
}

impl FontCache {
    pub fn new(provider: Option<Box<dyn FontProvider>>) -> FontCache {
        FontCache { provider, cache: RefCell::new(HashMap::new()), fallback: Rc::new(NaiveMonospace) }
    }

    pub fn without_provider() -> FontCache {
        FontCache::new(None)
    }

    fn resolve_one(&self, family: &str) -> Option<Rc<dyn Font>> {
        let family = family.trim();
        if family.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.borrow().get(family) {
            return hit.clone();
        }
        let resolved = self.provider.as_ref().and_then(|p| p.font(family));
        self.cache.borrow_mut().insert(family.to_string(), resolved.clone());
        resolved
    }

    /// `font-family` is a comma-separated fallback list (§4.6 "the first
    /// resolvable family, fallback font otherwise"). Strips surrounding
    /// quotes from each candidate.
    pub fn resolve_family_list(&self, family_list: &str) -> Rc<dyn Font> {
        for candidate in family_list.split(',') {
            let candidate = candidate.trim().trim_matches('"').trim_matches('\'');
            if let Some(font) = self.resolve_one(candidate) {
                return font;
            }
        }
        self.fallback.clone()
    }

    /// The family name actually used (for the painter's `draw_text`
    /// command), independent of whether it resolved to a real `Font`.
    pub fn first_family(&self, family_list: &str) -> String {
        family_list
            .split(',')
            .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "monospace".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_naive_estimator_without_a_provider() {
        let cache = FontCache::without_provider();
        let font = cache.resolve_family_list("Arial, sans-serif");
        let m = font.measure("hi", 10.0, FontWeightClass::Normal);
        assert_eq!(m, TextMetrics { width: 10.0, height: 10.0 });
    }

    #[test]
    fn resolves_first_matching_family_in_the_list() {
        struct OnlySerif;
        impl FontProvider for OnlySerif {
            fn font(&self, family: &str) -> Option<Rc<dyn Font>> {
                (family == "serif").then(|| Rc::new(NaiveMonospace) as Rc<dyn Font>)
            }
        }
        let cache = FontCache::new(Some(Box::new(OnlySerif)));
        assert_eq!(cache.first_family("\"Helvetica\", serif"), "Helvetica");
        // Helvetica doesn't resolve, serif does -> still measurable (falls
        // through to the provider's serif handle, not the naive fallback).
        let font = cache.resolve_family_list("Helvetica, serif");
        let m = font.measure("ab", 10.0, FontWeightClass::Normal);
        assert_eq!(m.width, 10.0);
    }
}

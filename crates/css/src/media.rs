//! Media-query engine (§4.5): parse query strings into a closed `MediaQuery`
//! variant and evaluate against a `MediaContext`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Screen,
    Print,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MediaQuery {
    And(Vec<MediaQuery>),
    True,
    False,
    Type(MediaType),
    Width { min: Option<f32>, max: Option<f32> },
    Height { min: Option<f32>, max: Option<f32> },
    PrefersColorScheme(ColorScheme),
    PrefersReducedMotion(bool),
    HoverType(bool),
    IsInOrientation(Orientation),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaContext {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub dark_mode: bool,
    pub prefers_reduced_motion: bool,
    pub hover: bool,
}

impl Default for MediaContext {
    fn default() -> Self {
        MediaContext {
            viewport_width: 800.0,
            viewport_height: 600.0,
            dark_mode: false,
            prefers_reduced_motion: false,
            hover: true,
        }
    }
}

impl MediaQuery {
    pub fn evaluate(&self, ctx: &MediaContext) -> bool {
        match self {
            MediaQuery::And(qs) => qs.iter().all(|q| q.evaluate(ctx)),
            MediaQuery::True => true,
            MediaQuery::False => false,
            MediaQuery::Type(MediaType::Screen) => true,
            MediaQuery::Type(MediaType::Print) => false,
            MediaQuery::Width { min, max } => {
                min.is_none_or(|m| ctx.viewport_width >= m) && max.is_none_or(|m| ctx.viewport_width <= m)
            }
            MediaQuery::Height { min, max } => {
                min.is_none_or(|m| ctx.viewport_height >= m) && max.is_none_or(|m| ctx.viewport_height <= m)
            }
            MediaQuery::PrefersColorScheme(ColorScheme::Dark) => ctx.dark_mode,
            MediaQuery::PrefersColorScheme(ColorScheme::Light) => !ctx.dark_mode,
            MediaQuery::PrefersReducedMotion(want) => *want == ctx.prefers_reduced_motion,
            MediaQuery::HoverType(want) => *want == ctx.hover,
            MediaQuery::IsInOrientation(Orientation::Landscape) => ctx.viewport_width >= ctx.viewport_height,
            MediaQuery::IsInOrientation(Orientation::Portrait) => ctx.viewport_width < ctx.viewport_height,
        }
    }
}

/// Root font-size used for `em`/`rem` inside media-feature lengths; queries
/// evaluate independent of the document's actual root font-size.
const MEDIA_ROOT_FONT_SIZE: f32 = 16.0;

fn parse_media_length(value: &str) -> Option<f32> {
    let v = value.trim();
    if v == "0" {
        return Some(0.0);
    }
    if let Some(n) = v.strip_suffix("px") {
        return n.trim().parse().ok();
    }
    if let Some(n) = v.strip_suffix("rem") {
        return n.trim().parse::<f32>().ok().map(|n| n * MEDIA_ROOT_FONT_SIZE);
    }
    if let Some(n) = v.strip_suffix("em") {
        return n.trim().parse::<f32>().ok().map(|n| n * MEDIA_ROOT_FONT_SIZE);
    }
    None
}

pub fn parse_media_query(input: &str) -> MediaQuery {
    let input = input.trim();
    if input.is_empty() {
        return MediaQuery::True;
    }
    let parts: Vec<&str> = input.split(" and ").map(str::trim).collect();
    if parts.len() > 1 {
        return MediaQuery::And(parts.into_iter().map(parse_atom).collect());
    }
    parse_atom(parts[0])
}

fn parse_atom(atom: &str) -> MediaQuery {
    let atom = atom.trim();
    match atom {
        "all" | "only all" => return MediaQuery::True,
        "print" => return MediaQuery::Type(MediaType::Print),
        "screen" => return MediaQuery::Type(MediaType::Screen),
        _ => {}
    }

    let Some(inner) = atom.strip_prefix('(').and_then(|s| s.strip_suffix(')')) else {
        log::debug!("unrecognized media atom {atom:?}; treating as false");
        return MediaQuery::False;
    };
    let Some((feature, value)) = inner.split_once(':') else {
        return MediaQuery::False;
    };
    let feature = feature.trim();
    let value = value.trim();

    match feature {
        "min-width" => parse_media_length(value)
            .map(|px| MediaQuery::Width { min: Some(px), max: None })
            .unwrap_or(MediaQuery::False),
        "max-width" => parse_media_length(value)
            .map(|px| MediaQuery::Width { min: None, max: Some(px) })
            .unwrap_or(MediaQuery::False),
        "width" => parse_media_length(value)
            .map(|px| MediaQuery::Width { min: Some(px), max: Some(px) })
            .unwrap_or(MediaQuery::False),
        "min-height" => parse_media_length(value)
            .map(|px| MediaQuery::Height { min: Some(px), max: None })
            .unwrap_or(MediaQuery::False),
        "max-height" => parse_media_length(value)
            .map(|px| MediaQuery::Height { min: None, max: Some(px) })
            .unwrap_or(MediaQuery::False),
        "height" => parse_media_length(value)
            .map(|px| MediaQuery::Height { min: Some(px), max: Some(px) })
            .unwrap_or(MediaQuery::False),
        "prefers-color-scheme" => match value {
            "dark" => MediaQuery::PrefersColorScheme(ColorScheme::Dark),
            "light" => MediaQuery::PrefersColorScheme(ColorScheme::Light),
            _ => MediaQuery::False,
        },
        "prefers-reduced-motion" => match value {
            "reduce" => MediaQuery::PrefersReducedMotion(true),
            "no-preference" => MediaQuery::PrefersReducedMotion(false),
            _ => MediaQuery::False,
        },
        "hover" => match value {
            "hover" => MediaQuery::HoverType(true),
            "none" => MediaQuery::HoverType(false),
            _ => MediaQuery::False,
        },
        "orientation" => match value {
            "portrait" => MediaQuery::IsInOrientation(Orientation::Portrait),
            "landscape" => MediaQuery::IsInOrientation(Orientation::Landscape),
            _ => MediaQuery::False,
        },
        _ => MediaQuery::False,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_width_gates_on_viewport_scenario_4() {
        let q = parse_media_query("(min-width:900px)");
        let narrow = MediaContext { viewport_width: 600.0, ..MediaContext::default() };
        let wide = MediaContext { viewport_width: 900.0, ..MediaContext::default() };
        assert!(!q.evaluate(&narrow));
        assert!(q.evaluate(&wide));
    }

    #[test]
    fn unrecognized_query_is_false() {
        let q = parse_media_query("(nonsense: true)");
        assert_eq!(q, MediaQuery::False);
        assert!(!q.evaluate(&MediaContext::default()));
    }

    #[test]
    fn and_requires_every_operand() {
        let q = parse_media_query("screen and (min-width:400px)");
        let ctx = MediaContext { viewport_width: 500.0, ..MediaContext::default() };
        assert!(q.evaluate(&ctx));
        let ctx2 = MediaContext { viewport_width: 100.0, ..MediaContext::default() };
        assert!(!q.evaluate(&ctx2));
    }

    #[test]
    fn prefers_color_scheme() {
        let q = parse_media_query("(prefers-color-scheme: dark)");
        assert!(q.evaluate(&MediaContext { dark_mode: true, ..MediaContext::default() }));
        assert!(!q.evaluate(&MediaContext { dark_mode: false, ..MediaContext::default() }));
    }
}

//! The value resolver (§4.1): turns an unresolved value string into a pixel
//! count, color, or keyword under a `ResolutionInfo` and a local font-size.
//! Pure functions only — no knowledge of the styled tree, inheritance, or
//! `var()`; the style engine (`cascade.rs`) owns tree-walking and calls down
//! into this module for the final unit/color math.

/// Viewport + root font-size context a length resolves against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionInfo {
    pub root_font_size: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for ResolutionInfo {
    fn default() -> Self {
        ResolutionInfo {
            root_font_size: 16.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Sentinel returned for malformed/out-of-range color syntax (§4.1).
    pub const ERROR: Color = Color::rgba(255, 0, 0, 255);

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}

pub fn is_auto(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("auto")
}

pub fn is_none(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("none")
}

/// Resolve a length-bearing value string (`"12px"`, `"1.5em"`, `"50%"`, ...)
/// to a pixel count. `percent_base`, when `Some`, is the value `%` resolves
/// against; when `None` and the value is a percentage, resolution fails
/// (caller should treat that as "unresolvable").
pub fn resolve_length(
    value: &str,
    ctx: &ResolutionInfo,
    local_font_size: f32,
    percent_base: Option<f32>,
) -> Option<f32> {
    let v = value.trim();
    if v == "0" {
        return Some(0.0);
    }
    if let Some(kw) = border_width_keyword(v) {
        return Some(kw);
    }

    let (number_part, unit) = split_number_and_unit(v)?;
    let number: f32 = number_part.parse().ok()?;

    let px = match unit {
        "px" => number,
        "em" => number * local_font_size,
        "rem" => number * ctx.root_font_size,
        "ex" | "ch" => number * 0.5 * local_font_size,
        "pt" => number * 16.0 / 12.0,
        "%" => number / 100.0 * percent_base?,
        "vw" => number / 100.0 * ctx.viewport_width,
        "vh" => number / 100.0 * ctx.viewport_height,
        "vmin" => number / 100.0 * ctx.viewport_width.min(ctx.viewport_height),
        "vmax" => number / 100.0 * ctx.viewport_width.max(ctx.viewport_height),
        _ => return None,
    };
    Some(px)
}

fn split_number_and_unit(v: &str) -> Option<(&str, &str)> {
    if v == "%" {
        return None;
    }
    let end = v
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e' || c == 'E'))
        .unwrap_or(v.len());
    if end == 0 {
        return None;
    }
    Some((&v[..end], v[end..].trim()))
}

pub fn border_width_keyword(v: &str) -> Option<f32> {
    match v.trim() {
        "thin" => Some(3.0),
        "medium" => Some(5.0),
        "thick" => Some(7.0),
        _ => None,
    }
}

/// `font-size` absolute-size keywords, as a ratio of the 16px medium.
pub fn absolute_font_size_keyword(v: &str) -> Option<f32> {
    let ratio = match v.trim() {
        "xx-small" => 3.0 / 5.0,
        "x-small" => 3.0 / 4.0,
        "small" => 8.0 / 9.0,
        "medium" => 1.0,
        "large" => 6.0 / 5.0,
        "x-large" => 3.0 / 2.0,
        "xx-large" => 2.0 / 1.0,
        "xxx-large" => 3.0 / 1.0,
        _ => return None,
    };
    Some(ratio * 16.0)
}

/// Resolve a `font-size` value string against the parent's font-size,
/// honoring relative `larger`/`smaller` keywords and absolute keywords,
/// falling back to the generic length resolver for numeric lengths.
pub fn resolve_font_size(
    value: &str,
    ctx: &ResolutionInfo,
    parent_font_size: f32,
) -> f32 {
    let v = value.trim();
    if let Some(px) = absolute_font_size_keyword(v) {
        return px;
    }
    match v {
        "larger" => return parent_font_size * 1.2,
        "smaller" => return parent_font_size / 1.2,
        _ => {}
    }
    // `em`/`%` in a font-size declaration are relative to the *parent's*
    // font-size, not the element's own (which is what we're computing).
    resolve_length(v, ctx, parent_font_size, Some(parent_font_size)).unwrap_or_else(|| {
        log::warn!("unresolvable font-size value {v:?}; falling back to parent size");
        parent_font_size
    })
}

/// Parse a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
/// functional (`rgb(...)`, `rgba(...)`, both comma and space/slash syntax),
/// or a named color. Malformed input yields `Color::ERROR`.
pub fn parse_color(value: &str) -> Color {
    let v = value.trim();
    if let Some(hex) = v.strip_prefix('#') {
        if let Some(c) = parse_hex_color(hex) {
            return c;
        }
        return Color::ERROR;
    }
    if let Some(inner) = v.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_function(inner, true);
    }
    if let Some(inner) = v.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_function(inner, false);
    }
    named_color(v).unwrap_or(Color::ERROR)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let digit = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Color::rgba(
            digit(&hex[0..1].repeat(2))?,
            digit(&hex[1..2].repeat(2))?,
            digit(&hex[2..3].repeat(2))?,
            255,
        )),
        4 => Some(Color::rgba(
            digit(&hex[0..1].repeat(2))?,
            digit(&hex[1..2].repeat(2))?,
            digit(&hex[2..3].repeat(2))?,
            digit(&hex[3..4].repeat(2))?,
        )),
        6 => Some(Color::rgba(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
            255,
        )),
        8 => Some(Color::rgba(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
            digit(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn parse_rgb_function(inner: &str, has_alpha_comma_form: bool) -> Color {
    // Accept both `r, g, b[, a]` and `r g b[ / a]`.
    let (channels_part, alpha_part) = if let Some((c, a)) = inner.split_once('/') {
        (c.trim(), Some(a.trim()))
    } else {
        (inner, None)
    };

    let parts: Vec<&str> = if channels_part.contains(',') {
        channels_part.split(',').map(str::trim).collect()
    } else {
        channels_part.split_whitespace().collect()
    };

    let needed = if has_alpha_comma_form && alpha_part.is_none() { 4 } else { 3 };
    if parts.len() < 3 {
        return Color::ERROR;
    }

    let channel = |s: &str| -> Option<u8> {
        if let Some(pct) = s.strip_suffix('%') {
            let p: f32 = pct.parse().ok()?;
            Some((p.clamp(0.0, 100.0) / 100.0 * 255.0).round() as u8)
        } else {
            s.parse::<f32>().ok().map(|n| n.clamp(0.0, 255.0).round() as u8)
        }
    };

    let r = match channel(parts[0]) {
        Some(v) => v,
        None => return Color::ERROR,
    };
    let g = match channel(parts[1]) {
        Some(v) => v,
        None => return Color::ERROR,
    };
    let b = match channel(parts[2]) {
        Some(v) => v,
        None => return Color::ERROR,
    };

    let alpha_str = alpha_part.or_else(|| parts.get(3).copied());
    let a = match alpha_str {
        None => 255,
        Some(s) => {
            let a = if let Some(pct) = s.strip_suffix('%') {
                pct.trim().parse::<f32>().ok().map(|p| p / 100.0 * 255.0)
            } else {
                s.parse::<f32>().ok().map(|n| n * 255.0)
            };
            match a {
                Some(n) => n.clamp(0.0, 255.0).round() as u8,
                None => return Color::ERROR,
            }
        }
    };

    if parts.len() < needed && alpha_part.is_none() && parts.len() != 3 {
        return Color::ERROR;
    }

    Color::rgba(r, g, b, a)
}

fn named_color(name: &str) -> Option<Color> {
    let c = match name.to_ascii_lowercase().as_str() {
        "black" => Color::rgba(0, 0, 0, 255),
        "white" => Color::rgba(255, 255, 255, 255),
        "red" => Color::rgba(255, 0, 0, 255),
        "green" => Color::rgba(0, 128, 0, 255),
        "lime" => Color::rgba(0, 255, 0, 255),
        "blue" => Color::rgba(0, 0, 255, 255),
        "yellow" => Color::rgba(255, 255, 0, 255),
        "cyan" | "aqua" => Color::rgba(0, 255, 255, 255),
        "magenta" | "fuchsia" => Color::rgba(255, 0, 255, 255),
        "gray" | "grey" => Color::rgba(128, 128, 128, 255),
        "silver" => Color::rgba(192, 192, 192, 255),
        "maroon" => Color::rgba(128, 0, 0, 255),
        "olive" => Color::rgba(128, 128, 0, 255),
        "navy" => Color::rgba(0, 0, 128, 255),
        "purple" => Color::rgba(128, 0, 128, 255),
        "teal" => Color::rgba(0, 128, 128, 255),
        "orange" => Color::rgba(255, 165, 0, 255),
        "pink" => Color::rgba(255, 192, 203, 255),
        "brown" => Color::rgba(165, 42, 42, 255),
        "indigo" => Color::rgba(75, 0, 130, 255),
        "violet" => Color::rgba(238, 130, 238, 255),
        "gold" => Color::rgba(255, 215, 0, 255),
        "coral" => Color::rgba(255, 127, 80, 255),
        "salmon" => Color::rgba(250, 128, 114, 255),
        "khaki" => Color::rgba(240, 230, 140, 255),
        "transparent" => Color::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

/// Font weight: `normal`=400, `bold`=700, numeric 1..=1000. Relative
/// `bolder`/`lighter` need the parent's computed weight, so those are
/// resolved by the style engine, not here.
pub fn resolve_font_weight_absolute(value: &str) -> Option<u16> {
    match value.trim() {
        "normal" => Some(400),
        "bold" => Some(700),
        v => v.parse::<u16>().ok().filter(|n| (1..=1000).contains(n)),
    }
}

/// Three-bucket `bolder`/`lighter` step function from CSS Fonts 4, given the
/// parent's resolved numeric weight.
pub fn relative_font_weight(keyword: &str, parent_weight: u16) -> u16 {
    match keyword {
        "bolder" => match parent_weight {
            ..100 => 400,
            100..400 => 400,
            400..600 => 700,
            _ => 900,
        },
        "lighter" => match parent_weight {
            ..100 => 100,
            100..600 => 100,
            600..700 => 400,
            _ => 700,
        },
        _ => parent_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_basic_units() {
        let ctx = ResolutionInfo::default();
        assert_eq!(resolve_length("16px", &ctx, 16.0, None), Some(16.0));
        assert_eq!(resolve_length("2em", &ctx, 10.0, None), Some(20.0));
        assert_eq!(resolve_length("2rem", &ctx, 10.0, None), Some(32.0));
        assert_eq!(resolve_length("50%", &ctx, 10.0, Some(200.0)), Some(100.0));
        assert_eq!(resolve_length("0", &ctx, 10.0, None), Some(0.0));
        assert_eq!(resolve_length("0%", &ctx, 10.0, None), Some(0.0));
    }

    #[test]
    fn percent_without_base_is_unresolvable() {
        let ctx = ResolutionInfo::default();
        assert_eq!(resolve_length("50%", &ctx, 10.0, None), None);
    }

    #[test]
    fn border_width_keywords() {
        assert_eq!(border_width_keyword("thin"), Some(3.0));
        assert_eq!(border_width_keyword("thick"), Some(7.0));
    }

    #[test]
    fn parses_hex_and_functional_colors() {
        assert_eq!(parse_color("#fff"), Color::rgba(255, 255, 255, 255));
        assert_eq!(parse_color("#00ff0080"), Color::rgba(0, 255, 0, 128));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::rgba(1, 2, 3, 255));
        assert_eq!(parse_color("rgb(1 2 3 / 50%)"), Color::rgba(1, 2, 3, 128));
        assert_eq!(parse_color("indigo"), Color::rgba(75, 0, 130, 255));
    }

    #[test]
    fn malformed_color_is_error_red() {
        assert_eq!(parse_color("not-a-color"), Color::ERROR);
        assert_eq!(parse_color("#12"), Color::ERROR);
    }

    #[test]
    fn font_size_keywords_and_relative() {
        assert_eq!(absolute_font_size_keyword("medium"), Some(16.0));
        let ctx = ResolutionInfo::default();
        assert_eq!(resolve_font_size("larger", &ctx, 10.0), 12.0);
        assert_eq!(resolve_font_size("smaller", &ctx, 12.0), 10.0);
    }

    #[test]
    fn relative_font_weight_buckets() {
        assert_eq!(relative_font_weight("bolder", 300), 400);
        assert_eq!(relative_font_weight("bolder", 500), 700);
        assert_eq!(relative_font_weight("bolder", 800), 900);
        assert_eq!(relative_font_weight("lighter", 300), 100);
        assert_eq!(relative_font_weight("lighter", 650), 400);
    }
}

//! Shorthand expansion (§4.2), performed at parse time so the rest of the
//! engine only ever sees longhands.

use crate::properties::PropertyId;
use crate::properties::PropertyId::*;

type Expanded = Vec<(PropertyId, String)>;

/// `Some(v)` means `name` is a recognised shorthand (`v` empty on failed
/// validation, per-spec "drop all longhands silently"). `None` means `name`
/// isn't a shorthand at all — the caller falls back to a plain longhand.
pub fn expand_shorthand(name: &str, value: &str) -> Option<Expanded> {
    match name {
        "padding" => Some(four_side(value, [PaddingTop, PaddingRight, PaddingBottom, PaddingLeft])),
        "margin" => Some(four_side(value, [MarginTop, MarginRight, MarginBottom, MarginLeft])),
        "border-color" => Some(four_side(value, [BorderTopColor, BorderRightColor, BorderBottomColor, BorderLeftColor])),
        "border-style" => Some(four_side(value, [BorderTopStyle, BorderRightStyle, BorderBottomStyle, BorderLeftStyle])),
        "border-width" => Some(four_side(value, [BorderTopWidth, BorderRightWidth, BorderBottomWidth, BorderLeftWidth])),
        "border" => Some(border_sides(value, &[
            (BorderTopColor, BorderTopStyle, BorderTopWidth),
            (BorderRightColor, BorderRightStyle, BorderRightWidth),
            (BorderBottomColor, BorderBottomStyle, BorderBottomWidth),
            (BorderLeftColor, BorderLeftStyle, BorderLeftWidth),
        ])),
        "border-top" => Some(border_sides(value, &[(BorderTopColor, BorderTopStyle, BorderTopWidth)])),
        "border-right" => Some(border_sides(value, &[(BorderRightColor, BorderRightStyle, BorderRightWidth)])),
        "border-bottom" => Some(border_sides(value, &[(BorderBottomColor, BorderBottomStyle, BorderBottomWidth)])),
        "border-left" => Some(border_sides(value, &[(BorderLeftColor, BorderLeftStyle, BorderLeftWidth)])),
        "outline" => Some(border_sides(value, &[(OutlineColor, OutlineStyle, OutlineWidth)])),
        "background" => Some(background(value)),
        "border-radius" => Some(border_radius(value)),
        "text-decoration" => Some(text_decoration(value).unwrap_or_default()),
        "flex-flow" => Some(flex_flow(value)),
        "font" => Some(font(value)),
        _ => None,
    }
}

fn four_side(value: &str, ids: [PropertyId; 4]) -> Expanded {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let resolved = match tokens.len() {
        1 => [tokens[0], tokens[0], tokens[0], tokens[0]],
        2 => [tokens[0], tokens[1], tokens[0], tokens[1]],
        3 => [tokens[0], tokens[1], tokens[2], tokens[1]],
        4 => [tokens[0], tokens[1], tokens[2], tokens[3]],
        _ => return Vec::new(),
    };
    ids.into_iter().zip(resolved).map(|(id, v)| (id, v.to_string())).collect()
}

fn is_border_style_keyword(t: &str) -> bool {
    matches!(
        t,
        "none" | "hidden" | "dotted" | "dashed" | "solid" | "double" | "groove" | "ridge" | "inset" | "outset"
    )
}

fn looks_like_width(t: &str) -> bool {
    t == "thin" || t == "medium" || t == "thick" || t.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn looks_like_color(t: &str) -> bool {
    t.starts_with('#') || t.starts_with("rgb(") || t.starts_with("rgba(") || t == "currentcolor" || t == "transparent"
        || (!is_border_style_keyword(t) && !looks_like_width(t))
}

/// Classify 1-3 tokens into color/style/width, in any order, per §4.2. More
/// than 3 tokens is invalid; missing components take their initial values.
fn border_sides(value: &str, sides: &[(PropertyId, PropertyId, PropertyId)]) -> Expanded {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() > 3 {
        return Vec::new();
    }
    let mut color = None;
    let mut style = None;
    let mut width = None;
    for t in tokens {
        if is_border_style_keyword(t) && style.is_none() {
            style = Some(t);
        } else if looks_like_width(t) && width.is_none() {
            width = Some(t);
        } else if color.is_none() {
            color = Some(t);
        } else {
            return Vec::new();
        }
    }
    let color = color.unwrap_or("currentcolor");
    let style = style.unwrap_or("none");
    let width = width.unwrap_or("medium");
    let mut out = Vec::new();
    for (c, s, w) in sides {
        out.push((*c, color.to_string()));
        out.push((*s, style.to_string()));
        out.push((*w, width.to_string()));
    }
    out
}

fn background(value: &str) -> Expanded {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let mut out = vec![
        (BackgroundImage, BackgroundImage.initial_value().to_string()),
        (BackgroundRepeat, BackgroundRepeat.initial_value().to_string()),
        (BackgroundPosition, BackgroundPosition.initial_value().to_string()),
        (BackgroundAttachment, BackgroundAttachment.initial_value().to_string()),
    ];
    let color = if tokens.len() == 1 {
        tokens[0].to_string()
    } else {
        BackgroundColor.initial_value().to_string()
    };
    out.push((BackgroundColor, color));
    out
}

/// `a b c d / e f g h`; each side of the slash independently undergoes the
/// four-value rotation. Per corner the longhand stores `"H"` when the
/// vertical radius equals the horizontal one, else `"H / V"`.
fn border_radius(value: &str) -> Expanded {
    let (h_part, v_part) = match value.split_once('/') {
        Some((h, v)) => (h.trim(), Some(v.trim())),
        None => (value.trim(), None),
    };
    let h = rotate4(h_part);
    let v = v_part.map(rotate4).unwrap_or_else(|| h.clone());
    let ids = [BorderTopLeftRadius, BorderTopRightRadius, BorderBottomRightRadius, BorderBottomLeftRadius];
    let Some(h) = h else { return Vec::new() };
    let Some(v) = v else { return Vec::new() };
    ids.into_iter()
        .zip(h.into_iter().zip(v))
        .map(|(id, (hv, vv))| {
            let value = if hv == vv { hv } else { format!("{hv} / {vv}") };
            (id, value)
        })
        .collect()
}

fn rotate4(part: &str) -> Option<[String; 4]> {
    let tokens: Vec<&str> = part.split_whitespace().collect();
    let resolved = match tokens.len() {
        1 => [tokens[0], tokens[0], tokens[0], tokens[0]],
        2 => [tokens[0], tokens[1], tokens[0], tokens[1]],
        3 => [tokens[0], tokens[1], tokens[2], tokens[1]],
        4 => [tokens[0], tokens[1], tokens[2], tokens[3]],
        _ => return None,
    };
    Some(resolved.map(str::to_string))
}

fn text_decoration(value: &str) -> Option<Expanded> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 2 {
        return None;
    }
    let mut line = None;
    let mut style = None;
    for t in tokens {
        match t {
            "none" | "underline" | "overline" | "line-through" | "blink" if line.is_none() => line = Some(t),
            "solid" | "double" | "dotted" | "dashed" | "wavy" if style.is_none() => style = Some(t),
            _ => return None,
        }
    }
    let mut out = Vec::new();
    if let Some(l) = line {
        out.push((TextDecorationLine, l.to_string()));
    }
    if let Some(s) = style {
        out.push((TextDecorationStyle, s.to_string()));
    }
    if out.is_empty() {
        return None;
    }
    Some(out)
}

fn flex_flow(value: &str) -> Expanded {
    let v = value.trim();
    if matches!(v, "inherit" | "initial" | "unset" | "revert") {
        return vec![(FlexDirection, v.to_string()), (FlexWrap, v.to_string())];
    }
    let mut direction = None;
    let mut wrap = None;
    for t in v.split_whitespace() {
        match t {
            "row" | "row-reverse" | "column" | "column-reverse" if direction.is_none() => direction = Some(t),
            "nowrap" | "wrap" | "wrap-reverse" if wrap.is_none() => wrap = Some(t),
            _ => return Vec::new(),
        }
    }
    let mut out = Vec::new();
    if let Some(d) = direction {
        out.push((FlexDirection, d.to_string()));
    }
    if let Some(w) = wrap {
        out.push((FlexWrap, w.to_string()));
    }
    out
}

const SYSTEM_FONT_KEYWORDS: &[&str] = &["caption", "icon", "menu", "message-box", "small-caption", "status-bar"];

fn font(value: &str) -> Expanded {
    let v = value.trim();
    if SYSTEM_FONT_KEYWORDS.contains(&v) {
        let mut out = reset_font_longhands();
        out.push((FontFamily, v.to_string()));
        return out;
    }

    let tokens: Vec<&str> = v.split_whitespace().collect();
    let mut i = 0;
    let mut style = None;
    let mut weight = None;
    let mut variant = None;
    let mut stretch = None;

    while i < tokens.len() {
        let t = tokens[i];
        if matches!(t, "italic" | "oblique") && style.is_none() {
            style = Some(t);
        } else if matches!(t, "bold" | "bolder" | "lighter") || t.parse::<u16>().is_ok() {
            if weight.is_none() {
                weight = Some(t);
            } else {
                break;
            }
        } else if matches!(t, "small-caps") && variant.is_none() {
            variant = Some(t);
        } else if matches!(t, "condensed" | "expanded" | "semi-condensed" | "semi-expanded") && stretch.is_none() {
            stretch = Some(t);
        } else {
            break;
        }
        i += 1;
    }

    if i >= tokens.len() {
        return Vec::new();
    }
    let size_part = tokens[i];
    i += 1;
    if i > tokens.len() {
        return Vec::new();
    }
    let (size, line_height) = match size_part.split_once('/') {
        Some((s, l)) => (s, Some(l)),
        None => (size_part, None),
    };
    if i >= tokens.len() {
        return Vec::new();
    }
    let family = tokens[i..].join(" ");
    if family.is_empty() {
        return Vec::new();
    }

    let mut out = reset_font_longhands();
    out.push((FontStyle, style.unwrap_or("normal").to_string()));
    out.push((FontWeight, weight.unwrap_or("normal").to_string()));
    out.push((FontVariant, variant.unwrap_or("normal").to_string()));
    out.push((FontStretch, stretch.unwrap_or("normal").to_string()));
    out.push((FontSize, size.to_string()));
    out.push((LineHeight, line_height.unwrap_or("normal").to_string()));
    out.push((FontFamily, family));
    out
}

fn reset_font_longhands() -> Expanded {
    [FontStyle, FontWeight, FontVariant, FontStretch, LineHeight]
        .into_iter()
        .map(|id| (id, id.initial_value().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_four_value_padding() {
        let out = expand_shorthand("padding", "1px 2px 3px 4px").unwrap();
        assert_eq!(out, vec![
            (PaddingTop, "1px".to_string()),
            (PaddingRight, "2px".to_string()),
            (PaddingBottom, "3px".to_string()),
            (PaddingLeft, "4px".to_string()),
        ]);
    }

    #[test]
    fn two_value_margin_rotates() {
        let out = expand_shorthand("margin", "1px 2px").unwrap();
        assert_eq!(out[0].1, "1px");
        assert_eq!(out[1].1, "2px");
        assert_eq!(out[2].1, "1px");
        assert_eq!(out[3].1, "2px");
    }

    #[test]
    fn border_shorthand_classifies_tokens_scenario_5() {
        let out = expand_shorthand("border", "5px black solid").unwrap();
        assert!(out.contains(&(BorderTopColor, "black".to_string())));
        assert!(out.contains(&(BorderTopStyle, "solid".to_string())));
        assert!(out.contains(&(BorderTopWidth, "5px".to_string())));
        assert!(out.contains(&(BorderLeftColor, "black".to_string())));
    }

    #[test]
    fn border_with_too_many_tokens_is_dropped() {
        let out = expand_shorthand("border", "5px black solid extra").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn background_single_token_is_color() {
        let out = expand_shorthand("background", "indigo").unwrap();
        assert!(out.contains(&(BackgroundColor, "indigo".to_string())));
    }

    #[test]
    fn border_radius_with_slash() {
        let out = expand_shorthand("border-radius", "4px / 8px").unwrap();
        assert_eq!(out[0].1, "4px / 8px");
    }

    #[test]
    fn text_decoration_unknown_combo_drops_all() {
        assert!(expand_shorthand("text-decoration", "underline solid wavy").unwrap().is_empty());
        let out = expand_shorthand("text-decoration", "solid underline").unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn font_shorthand_parses_size_and_family() {
        let out = expand_shorthand("font", "italic bold 12px/1.5 Arial, sans-serif").unwrap();
        assert!(out.contains(&(FontStyle, "italic".to_string())));
        assert!(out.contains(&(FontWeight, "bold".to_string())));
        assert!(out.contains(&(FontSize, "12px".to_string())));
        assert!(out.contains(&(LineHeight, "1.5".to_string())));
        assert!(out.contains(&(FontFamily, "Arial, sans-serif".to_string())));
    }

    #[test]
    fn font_system_keyword_aliases_family() {
        let out = expand_shorthand("font", "caption").unwrap();
        assert!(out.contains(&(FontFamily, "caption".to_string())));
    }
}

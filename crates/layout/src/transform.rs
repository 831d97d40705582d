//! `text-transform` (§4.6 "Text transform"), applied after whitespace
//! collapsing so word boundaries are computed against the final text.

use css::PropertyId;

use crate::{LayoutBox, LayoutText};

fn capitalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_alpha = false;
    for c in s.chars() {
        if c.is_ascii_alphabetic() && !prev_was_alpha {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_was_alpha = c.is_ascii_alphabetic();
    }
    out
}

fn apply_to(text: &str, transform: &str) -> Option<String> {
    match transform {
        "uppercase" => Some(text.chars().map(|c| if c.is_ascii_alphabetic() { c.to_ascii_uppercase() } else { c }).collect()),
        "lowercase" => Some(text.chars().map(|c| if c.is_ascii_alphabetic() { c.to_ascii_lowercase() } else { c }).collect()),
        "capitalize" => Some(capitalize(text)),
        // `full-width`/`full-size-kana` acknowledged, left unimplemented.
        _ => None,
    }
}

pub fn apply_text_transform(b: &mut LayoutBox) {
    if !b.text.is_empty() {
        if let Some(styled) = b.styled {
            let transform = styled.keyword(PropertyId::TextTransform);
            if let Some(transformed) = apply_to(b.text.as_str(), &transform) {
                if transformed != b.text.as_str() {
                    b.text = LayoutText::Owned(transformed);
                }
            }
        }
    }
    for child in &mut b.children {
        apply_text_transform(child);
    }
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

    fn build_and_transform(html_src: &[u8], css_src: &str) -> LayoutBox<'static, 'static> {
        let doc = Box::leak(Box::new(html::parse(html_src, ParseOptions::default())));
        let sheet = Box::leak(Box::new(parse_stylesheet(css_src)));
        let styled = Box::leak(Box::new(build_style_tree(doc, sheet, &MediaContext::default())));
        let mut b = tree::build(styled.root(), &NoImages).unwrap();
        apply_text_transform(&mut b);
        b
    }

    fn first_text<'a, 't>(b: &'a LayoutBox<'_, 't>) -> &'a str {
        if !b.text.is_empty() {
            return b.text.as_str();
        }
        b.children.iter().map(first_text).find(|s| !s.is_empty()).unwrap_or("")
    }

    #[test]
    fn uppercases_ascii_text() {
        let b = build_and_transform(b"<p style=\"text-transform:uppercase\">hello</p>", "");
        assert_eq!(first_text(&b), "HELLO");
    }

    #[test]
    fn capitalize_uppercases_first_letter_of_each_word() {
        let b = build_and_transform(b"<p style=\"text-transform:capitalize\">hello world</p>", "");
        assert_eq!(first_text(&b), "Hello World");
    }

    #[test]
    fn capitalize_treats_apostrophes_as_word_boundaries() {
        let b = build_and_transform(b"<p style=\"text-transform:capitalize\">it's ok</p>", "");
        assert_eq!(first_text(&b), "It'S Ok");
    }

    #[test]
    fn none_leaves_text_untouched() {
        let b = build_and_transform(b"<p>Hello</p>", "");
        assert_eq!(first_text(&b), "Hello");
    }
}

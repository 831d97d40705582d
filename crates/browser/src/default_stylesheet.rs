//! The engine's built-in user-agent stylesheet, spliced in before any
//! author styles (§4.8 step 4). Grounded conceptually on hastur's
//! `css::default_style()` (`css::parse(kDefaultCss)`); the actual UA rule
//! text isn't part of the filtered source, so this is authored fresh,
//! covering the HTML elements the parser and layout tests already exercise.

const DEFAULT_USER_AGENT_CSS: &str = r#"
html, body, div, p, ul, ol, li, header, footer, section, article, nav, figure, figcaption, blockquote {
    display: block;
}
h1, h2, h3, h4, h5, h6 { display: block; font-weight: bold; }
h1 { font-size: 2em; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.17em; }
h4 { font-size: 1em; }
h5 { font-size: 0.83em; }
h6 { font-size: 0.67em; }

head, style, script, title, meta, link, base, template { display: none; }

span, a, b, strong, i, em, u, small, code, label { display: inline; }
strong, b { font-weight: bold; }
em, i { font-style: italic; }
u { text-decoration: underline; }
a { color: blue; text-decoration: underline; }

img { display: inline; }
br { display: inline; }

ul, ol { list-style-type: disc; }
ol { list-style-type: decimal; }
li { display: block; }

p { margin-top: 1em; margin-bottom: 1em; }
"#;

pub fn default_stylesheet() -> css::Stylesheet {
    css::parse_stylesheet(DEFAULT_USER_AGENT_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stylesheet_parses_without_rules_collapsing_to_zero() {
        let sheet = default_stylesheet();
        assert!(!sheet.rules.is_empty());
    }

    #[test]
    fn head_and_its_children_are_hidden() {
        let sheet = default_stylesheet();
        let head_rule = sheet.rules.iter().find(|r| r.selectors.iter().any(|s| s == "head")).unwrap();
        assert!(head_rule.declarations.iter().any(|(id, v)| *id == css::PropertyId::Display && v == "none"));
    }
}

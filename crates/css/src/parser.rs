//! CSS parser (§4.2): a tokeniser-less scanner over peek/advance/
//! skip-whitespace primitives. Recognises `/* */` comments anywhere
//! whitespace is legal, `@media`/`@font-face`/`@charset`/`@import`, and
//! expands shorthands at parse time via `shorthand::expand_shorthand`.

use crate::media::{MediaQuery, parse_media_query};
use crate::properties::PropertyId;
use crate::shorthand::expand_shorthand;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<(PropertyId, String)>,
    pub important_declarations: Vec<(PropertyId, String)>,
    pub custom_properties: Vec<(String, String)>,
    pub media_query: Option<MediaQuery>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn splice(&mut self, other: Stylesheet) {
        self.rules.extend(other.rules);
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser { chars: input.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_whitespace()) {
                self.pos += 1;
            }
            if self.starts_with("/*") {
                self.pos += 2;
                while !self.eof() && !self.starts_with("*/") {
                    self.pos += 1;
                }
                if !self.eof() {
                    self.pos += 2;
                }
                continue;
            }
            break;
        }
    }

    /// Consume up to (not including) the first top-level occurrence of any
    /// char in `stop`. Returns `None` on EOF without finding one.
    fn consume_until_any(&mut self, stop: &[char]) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stop.contains(&c) {
                return Some(self.chars[start..self.pos].iter().collect());
            }
            self.pos += 1;
        }
        None
    }

    /// Skip a balanced `{ ... }` block assuming the next char is `{`.
    fn skip_balanced_braces(&mut self) {
        if self.advance() != Some('{') {
            return;
        }
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(_) => {}
                None => break,
            }
        }
    }
}

pub fn parse_stylesheet(input: &str) -> Stylesheet {
    let mut parser = Parser::new(input);
    let rules = parse_rules(&mut parser, None, false);
    Stylesheet { rules }
}

/// Parse `style="..."` as if it were the body of a rule (§4.4 step 2),
/// wrapping it as `dummy { <value> }` and reusing this parser.
pub fn parse_inline_declarations(style_attr: &str) -> Rule {
    let wrapped = format!("dummy {{ {style_attr} }}");
    let mut parser = Parser::new(&wrapped);
    let rules = parse_rules(&mut parser, None, false);
    rules.into_iter().next().unwrap_or_default()
}

fn combine(outer: Option<&MediaQuery>, inner: MediaQuery) -> MediaQuery {
    match outer {
        None => inner,
        Some(o) => MediaQuery::And(vec![o.clone(), inner]),
    }
}

/// `in_block`: when true, stop after consuming the matching `}` (nested
/// `@media` body); when false, run to EOF (top-level stylesheet).
fn parse_rules(p: &mut Parser, media: Option<&MediaQuery>, in_block: bool) -> Vec<Rule> {
    let mut rules = Vec::new();
    loop {
        p.skip_whitespace_and_comments();
        if p.eof() {
            break;
        }
        if p.peek() == Some('}') {
            if in_block {
                p.advance();
            }
            break;
        }
        if p.peek() == Some('@') {
            if let Some(mut nested) = parse_at_rule(p, media) {
                rules.append(&mut nested);
            }
            continue;
        }
        match parse_one_rule(p, media) {
            Some(rule) => rules.push(rule),
            None => break, // truncated — drop the partial rule, stop here
        }
    }
    rules
}

fn parse_at_rule(p: &mut Parser, media: Option<&MediaQuery>) -> Option<Vec<Rule>> {
    p.advance(); // '@'
    let start = p.pos;
    while p.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '-') {
        p.pos += 1;
    }
    let name: String = p.chars[start..p.pos].iter().collect::<String>().to_ascii_lowercase();

    match name.as_str() {
        "charset" => {
            let _ = p.consume_until_any(&[';']);
            p.advance();
            log::warn!("@charset is not honored; bytes are always treated as UTF-8");
            Some(Vec::new())
        }
        "import" => {
            let _ = p.consume_until_any(&[';']);
            p.advance();
            log::warn!("@import is not supported; the referenced sheet is ignored");
            Some(Vec::new())
        }
        "media" => {
            let query_text = p.consume_until_any(&['{'])?;
            p.advance(); // '{'
            let query = combine(media, parse_media_query(&query_text));
            Some(parse_rules(p, Some(&query), true))
        }
        "font-face" => {
            p.skip_whitespace_and_comments();
            if p.peek() != Some('{') {
                return Some(Vec::new());
            }
            p.advance();
            let (declarations, important_declarations, custom_properties) = parse_declaration_block(p)?;
            Some(vec![Rule {
                selectors: vec!["@font-face".to_string()],
                declarations,
                important_declarations,
                custom_properties,
                media_query: media.cloned(),
            }])
        }
        _ => {
            log::debug!("skipping unsupported at-rule @{name}");
            let _ = p.consume_until_any(&['{', ';']);
            if p.peek() == Some('{') {
                p.skip_balanced_braces();
            } else if p.peek() == Some(';') {
                p.advance();
            }
            Some(Vec::new())
        }
    }
}

/// `consume_until_any` scans raw characters and has no notion of `/* */`
/// comments, so anything it returns for use as a name/selector needs a
/// comment-stripping pass before trimming (§4.2 "comments anywhere
/// whitespace is legal").
fn strip_comments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(c2) = chars.next() {
                if c2 == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_one_rule(p: &mut Parser, media: Option<&MediaQuery>) -> Option<Rule> {
    let selector_text = p.consume_until_any(&['{'])?;
    p.advance(); // '{'
    let selector_text = strip_comments(&selector_text);
    let selectors: Vec<String> = selector_text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let (declarations, important_declarations, custom_properties) = parse_declaration_block(p)?;
    if selectors.is_empty() {
        return Some(Rule { selectors, declarations, important_declarations, custom_properties, media_query: media.cloned() });
    }
    Some(Rule { selectors, declarations, important_declarations, custom_properties, media_query: media.cloned() })
}

type DeclarationSets = (Vec<(PropertyId, String)>, Vec<(PropertyId, String)>, Vec<(String, String)>);

fn parse_declaration_block(p: &mut Parser) -> Option<DeclarationSets> {
    let mut declarations = Vec::new();
    let mut important_declarations = Vec::new();
    let mut custom_properties = Vec::new();

    loop {
        p.skip_whitespace_and_comments();
        if p.eof() {
            return None; // truncated mid-rule: drop everything parsed so far
        }
        if p.peek() == Some('}') {
            p.advance();
            break;
        }

        let Some(raw_name) = p.consume_until_any(&[':', ';', '}']) else {
            return None;
        };
        let name = strip_comments(&raw_name).trim().to_string();
        if p.peek() != Some(':') {
            // no colon before `;`/`}`/eof: malformed declaration, skip it
            if p.peek() == Some(';') {
                p.advance();
            }
            continue;
        }
        p.advance(); // ':'

        let Some(raw_value) = p.consume_until_any(&[';', '}']) else {
            return None;
        };
        let had_semicolon = p.peek() == Some(';');
        if had_semicolon {
            p.advance();
        }

        let mut value = strip_comments(&raw_value).trim().to_string();
        let mut important = false;
        if let Some(rest) = strip_important_suffix(&value) {
            important = true;
            value = rest.trim().to_string();
        }

        if name.is_empty() {
            continue;
        }
        let first = name.chars().next().unwrap();
        if name.starts_with("--") {
            custom_properties.push((name, value));
            continue;
        }
        if name.starts_with('-') {
            log::debug!("dropping vendor-prefixed property {name}");
            continue;
        }
        if !first.is_ascii_alphabetic() {
            continue; // IE hacks like `*foo: bar`
        }

        let lower = name.to_ascii_lowercase();
        let target = if important { &mut important_declarations } else { &mut declarations };
        match expand_shorthand(&lower, &value) {
            Some(expanded) => target.extend(expanded),
            None => target.push((PropertyId::from_name(&lower), value)),
        }
    }

    Some((declarations, important_declarations, custom_properties))
}

fn strip_important_suffix(value: &str) -> Option<&str> {
    let lower = value.to_ascii_lowercase();
    let idx = lower.rfind('!')?;
    if lower[idx + 1..].trim().eq_ignore_ascii_case("important") {
        Some(&value[..idx])
    } else {
        None
    }
}

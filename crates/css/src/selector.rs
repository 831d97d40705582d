//! Selector matcher (§4.3). Operates over anything implementing
//! `ElementLike` so the style engine can match against `StyledNode` handles
//! while keeping this module ignorant of the cascade.

pub trait ElementLike: Clone {
    fn tag_name(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn parent(&self) -> Option<Self>;
}

#[derive(Clone, Debug, PartialEq)]
enum Simple {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    AttrPresence(String),
    AttrEquals(String, String),
}

#[derive(Clone, Debug, PartialEq)]
enum Pseudo {
    Link,
    Root,
    Is(Vec<String>),
    Unknown,
}

/// `is_match(styled_node, selector_string)` — testable property 3 holds
/// structurally: every branch below only reads `node`'s own data and walks
/// `parent()`, never `node`'s children.
pub fn is_match<E: ElementLike>(node: &E, selector: &str) -> bool {
    let (remainder, pseudo) = split_trailing_pseudo(selector);
    if let Some(p) = &pseudo {
        if matches!(p, Pseudo::Unknown) {
            return false;
        }
        if !pseudo_matches(node, p) {
            return false;
        }
    }
    match_combinators(node, remainder)
}

fn split_trailing_pseudo(selector: &str) -> (&str, Option<Pseudo>) {
    let selector = selector.trim();
    let Some(idx) = selector.rfind(':') else {
        return (selector, None);
    };
    let prefix = selector[..idx].trim();
    let suffix = &selector[idx + 1..];
    let pseudo = match suffix {
        "link" | "any-link" => Pseudo::Link,
        "root" => Pseudo::Root,
        s if s.starts_with("is(") && s.ends_with(')') => {
            let inner = &s[3..s.len() - 1];
            Pseudo::Is(inner.split(',').map(|p| p.trim().to_string()).collect())
        }
        _ => Pseudo::Unknown,
    };
    (prefix, Some(pseudo))
}

fn pseudo_matches<E: ElementLike>(node: &E, pseudo: &Pseudo) -> bool {
    match pseudo {
        Pseudo::Link => {
            let tag = node.tag_name();
            (tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("area")) && node.attr("href").is_some()
        }
        Pseudo::Root => node.parent().is_none(),
        Pseudo::Is(list) => list.iter().any(|s| is_match(node, s)),
        Pseudo::Unknown => false,
    }
}

fn match_combinators<E: ElementLike>(node: &E, remainder: &str) -> bool {
    let remainder = remainder.trim();
    if remainder.is_empty() {
        return false;
    }
    if remainder.contains('>') {
        let parts: Vec<&str> = remainder.split('>').map(str::trim).collect();
        return match_child_chain(node, &parts);
    }
    if remainder.split_whitespace().count() > 1 {
        let parts: Vec<&str> = remainder.split_whitespace().collect();
        return match_descendant_chain(node, &parts);
    }
    match_compound(node, remainder)
}

fn match_child_chain<E: ElementLike>(node: &E, parts: &[&str]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !match_compound(node, last) {
        return false;
    }
    let mut current = node.clone();
    for part in rest.iter().rev() {
        let Some(parent) = current.parent() else {
            return false;
        };
        if !match_compound(&parent, part) {
            return false;
        }
        current = parent;
    }
    true
}

fn match_descendant_chain<E: ElementLike>(node: &E, parts: &[&str]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !match_compound(node, last) {
        return false;
    }
    let mut current = node.clone();
    for part in rest.iter().rev() {
        loop {
            match current.parent() {
                None => return false,
                Some(parent) => {
                    current = parent;
                    if match_compound(&current, part) {
                        break;
                    }
                }
            }
        }
    }
    true
}

fn parse_compound(compound: &str) -> Vec<Simple> {
    let mut out = Vec::new();
    let chars: Vec<char> = compound.chars().collect();
    let mut i = 0;

    if i < chars.len() && chars[i] == '*' {
        out.push(Simple::Universal);
        i += 1;
    } else {
        let start = i;
        while i < chars.len() && !"#.[".contains(chars[i]) {
            i += 1;
        }
        if i > start {
            out.push(Simple::Tag(chars[start..i].iter().collect()));
        }
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                let start = i;
                while i < chars.len() && !"#.[".contains(chars[i]) {
                    i += 1;
                }
                out.push(Simple::Id(chars[start..i].iter().collect()));
            }
            '.' => {
                i += 1;
                let start = i;
                while i < chars.len() && !"#.[".contains(chars[i]) {
                    i += 1;
                }
                out.push(Simple::Class(chars[start..i].iter().collect()));
            }
            '[' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                let inner: String = chars[start..i].iter().collect();
                if i < chars.len() {
                    i += 1;
                }
                if let Some((k, v)) = inner.split_once('=') {
                    let v = v.trim().trim_matches('"').trim_matches('\'');
                    out.push(Simple::AttrEquals(k.trim().to_string(), v.to_string()));
                } else {
                    out.push(Simple::AttrPresence(inner.trim().to_string()));
                }
            }
            _ => i += 1,
        }
    }
    out
}

fn match_compound<E: ElementLike>(node: &E, compound: &str) -> bool {
    let compound = compound.trim();
    if compound.is_empty() {
        return false;
    }
    parse_compound(compound).iter().all(|simple| match simple {
        Simple::Universal => true,
        Simple::Tag(name) => name.is_empty() || node.tag_name().eq_ignore_ascii_case(name),
        Simple::Id(id) => node.attr("id") == Some(id.as_str()),
        Simple::Class(class) => node
            .attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        Simple::AttrPresence(name) => node.attr(name).is_some(),
        Simple::AttrEquals(name, value) => node.attr(name) == Some(value.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Elem {
        tag: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        parent: Option<Box<Elem>>,
    }

    impl ElementLike for Elem {
        fn tag_name(&self) -> &str {
            self.tag
        }
        fn attr(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
        fn parent(&self) -> Option<Elem> {
            self.parent.as_deref().cloned()
        }
    }

    #[test]
    fn matches_tag_class_and_id() {
        let e = Elem { tag: "p", attrs: vec![("class", "big red"), ("id", "x")], parent: None };
        assert!(is_match(&e, "p"));
        assert!(is_match(&e, "p.big"));
        assert!(is_match(&e, "#x"));
        assert!(is_match(&e, "*"));
        assert!(!is_match(&e, "div"));
        assert!(!is_match(&e, ".missing"));
    }

    #[test]
    fn link_pseudo_requires_href_scenario_6() {
        let with_href = Elem { tag: "a", attrs: vec![("href", "x")], parent: None };
        let without_href = Elem { tag: "a", attrs: vec![], parent: None };
        assert!(is_match(&with_href, "a:link"));
        assert!(!is_match(&without_href, "a:link"));
    }

    #[test]
    fn root_pseudo_checks_parentless() {
        let root = Elem { tag: "html", attrs: vec![], parent: None };
        let child = Elem { tag: "body", attrs: vec![], parent: Some(Box::new(Elem { tag: "html", attrs: vec![], parent: None })) };
        assert!(is_match(&root, ":root"));
        assert!(!is_match(&child, ":root"));
    }

    #[test]
    fn descendant_and_child_combinators() {
        let grandparent = Elem { tag: "div", attrs: vec![("class", "outer")], parent: None };
        let parent = Elem { tag: "section", attrs: vec![], parent: Some(Box::new(grandparent)) };
        let child = Elem { tag: "p", attrs: vec![], parent: Some(Box::new(parent)) };
        assert!(is_match(&child, "div p"));
        assert!(is_match(&child, "section > p"));
        assert!(!is_match(&child, "div > p"));
    }

    #[test]
    fn unknown_pseudo_never_matches() {
        let e = Elem { tag: "p", attrs: vec![], parent: None };
        assert!(!is_match(&e, "p:hover"));
    }
}

/// Ordered list of DOM children. A plain `Vec` rather than an arena: nothing
/// downstream (style engine, layout) mutates the DOM after parsing, so there
/// is no need for stable indices or patch-friendly storage here.
pub type NodeList = Vec<Node>;

/// A DOM node. Tagged union over the three kinds the core cares about;
/// script/style contents are kept as ordinary `Text` children of their
/// element so the style engine and (non-evaluating) `js` tokenizer can find
/// them the same way any other text is found.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element {
        name: String,
        /// Case-sensitive key -> value mapping, insertion order preserved
        /// so that a repeated attribute keeps its first value (matching
        /// typical tag-soup behavior) while iteration order stays stable.
        attributes: Vec<(String, String)>,
        children: NodeList,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn element(name: impl Into<String>) -> Node {
        Node::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut NodeList {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => {
                // Unreachable in practice: callers only mutate element
                // children. Kept total (rather than panicking) by handing
                // back a leaked-once empty vec would be unsound across
                // calls, so we make the invariant explicit instead.
                panic!("text/comment nodes have no children")
            }
        }
    }

    /// Case-sensitive attribute lookup, per the DOM data model (§3).
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Whether `key`'s value contains `token` as a whitespace-separated
    /// token (used for `class` matching and `rel="stylesheet"`).
    pub fn attr_has_token(&self, key: &str, token: &str) -> bool {
        self.attr(key)
            .map(|v| v.split_whitespace().any(|t| t == token))
            .unwrap_or(false)
    }

    pub fn attrs(&self) -> &[(String, String)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

/// Owns the parsed tree for the lifetime of a page. `StyledNode`s and
/// `LayoutBox`es in the `css`/`layout` crates hold non-owning references
/// into this.
#[derive(Clone, Debug)]
pub struct Document {
    pub doctype: Option<Doctype>,
    pub quirks_mode: bool,
    /// The root `<html>` element, synthesized if the source omitted it.
    pub root: Node,
}

impl Document {
    pub fn html_element(&self) -> Option<&Node> {
        Some(&self.root).filter(|n| n.tag_name().is_some_and(|t| t.eq_ignore_ascii_case("html")))
    }

    pub fn head_element(&self) -> Option<&Node> {
        self.root
            .children()
            .iter()
            .find(|n| n.tag_name().is_some_and(|t| t.eq_ignore_ascii_case("head")))
    }

    pub fn body_element(&self) -> Option<&Node> {
        self.root
            .children()
            .iter()
            .find(|n| n.tag_name().is_some_and(|t| t.eq_ignore_ascii_case("body")))
    }
}

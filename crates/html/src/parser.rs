use crate::dom::{Doctype, Document, Node};
use crate::entities::decode_entities;
use crate::tokenizer::{Token, Tokenizer, is_void_element};

/// Options threaded through to the HTML parser. `enable_js` only changes
/// *parsing* behavior (whether `<noscript>` content is treated as rawtext or
/// as ordinary markup) — scripts are never evaluated regardless.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOptions {
    pub enable_js: bool,
}

fn is_metadata_element(name: &str) -> bool {
    matches!(
        name,
        "title" | "meta" | "link" | "base" | "style"
    )
}

struct Frame {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    BeforeHead,
    InHead,
    AfterHead,
    InBody,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    mode: Mode,
    doctype: Option<Doctype>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame {
                name: "html".to_string(),
                attrs: Vec::new(),
                children: Vec::new(),
            }],
            mode: Mode::BeforeHead,
            doctype: None,
        }
    }

    fn top_children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.stack.last_mut().expect("root frame always present").children
    }

    /// Ensure a head/body container is open for top-level (depth == 1)
    /// content, opening a synthetic one if needed. No-op once nested.
    fn ensure_container_for(&mut self, name_hint: &str) {
        if self.stack.len() != 1 {
            return;
        }
        if is_metadata_element(name_hint) {
            if self.mode == Mode::BeforeHead {
                self.stack.push(Frame {
                    name: "head".to_string(),
                    attrs: Vec::new(),
                    children: Vec::new(),
                });
                self.mode = Mode::InHead;
            }
        } else if self.mode != Mode::InBody {
            self.stack.push(Frame {
                name: "body".to_string(),
                attrs: Vec::new(),
                children: Vec::new(),
            });
            self.mode = Mode::InBody;
        }
    }

    fn push_start_tag(&mut self, name: String, attrs: Vec<(String, String)>) {
        if name == "html" {
            if self.stack.len() == 1 {
                self.stack[0].attrs = attrs;
            }
            return;
        }
        if name == "head" {
            if self.stack.len() == 1 && self.mode == Mode::BeforeHead {
                self.stack.push(Frame { name, attrs, children: Vec::new() });
                self.mode = Mode::InHead;
            }
            return;
        }
        if name == "body" {
            if self.stack.len() == 1 && self.mode != Mode::InBody {
                self.stack.push(Frame { name, attrs, children: Vec::new() });
                self.mode = Mode::InBody;
            }
            return;
        }

        self.ensure_container_for(&name);

        if is_void_element(&name) {
            self.top_children_mut().push(Node::Element {
                name,
                attributes: attrs,
                children: Vec::new(),
            });
        } else {
            self.stack.push(Frame { name, attrs, children: Vec::new() });
        }
    }

    fn push_self_closing(&mut self, name: String, attrs: Vec<(String, String)>) {
        self.ensure_container_for(&name);
        self.top_children_mut().push(Node::Element {
            name,
            attributes: attrs,
            children: Vec::new(),
        });
    }

    fn push_complete_element(&mut self, name: String, attrs: Vec<(String, String)>, children: Vec<Node>) {
        self.ensure_container_for(&name);
        self.top_children_mut().push(Node::Element { name, attributes: attrs, children });
    }

    fn pop_frame(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let frame = self.stack.pop().unwrap();
        let popped_to_root = self.stack.len() == 1;
        let name = frame.name.clone();
        self.stack.last_mut().unwrap().children.push(Node::Element {
            name: frame.name,
            attributes: frame.attrs,
            children: frame.children,
        });
        if popped_to_root && name == "head" {
            self.mode = Mode::AfterHead;
        }
    }

    fn close_matching(&mut self, name: &str) {
        // `</body>` and `</html>` never actually close anything early; real
        // parsers keep them open until EOF so trailing content still lands
        // inside. This also sidesteps needing an "after body" mode.
        if name == "body" || name == "html" {
            return;
        }
        let Some(idx) = self.stack.iter().rposition(|f| f.name == name) else {
            log::debug!("ignoring stray end tag </{name}>");
            return;
        };
        while self.stack.len() > idx + 1 {
            self.pop_frame();
        }
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if self.stack.len() == 1 && text.trim().is_empty() {
            // Whitespace-only text before any container never forces one open.
            return;
        }
        self.ensure_container_for("#text");
        let decoded = decode_entities(&text).into_owned();
        self.top_children_mut().push(Node::Text { text: decoded });
    }

    fn push_comment(&mut self, text: String) {
        self.top_children_mut().push(Node::Comment { text });
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.pop_frame();
        }
        let root_frame = self.stack.pop().expect("root frame always present");
        let quirks_mode = compute_quirks_mode(&self.doctype);
        Document {
            doctype: self.doctype,
            quirks_mode,
            root: Node::Element {
                name: root_frame.name,
                attributes: root_frame.attrs,
                children: root_frame.children,
            },
        }
    }
}

fn compute_quirks_mode(doctype: &Option<Doctype>) -> bool {
    match doctype {
        None => true,
        Some(d) => {
            if !d.name.eq_ignore_ascii_case("html") {
                return true;
            }
            match &d.public_id {
                None => false,
                Some(pid) => {
                    let lower = pid.to_ascii_lowercase();
                    lower.starts_with("-//w3c//dtd html 4.0 frameset")
                        || lower.starts_with("-//w3c//dtd html 4.01 frameset")
                        || lower.starts_with("-//ietf//dtd html")
                }
            }
        }
    }
}

const RAWTEXT_SENTINEL: &str = "\0rawtext";

/// Parse `bytes` as UTF-8 HTML, yielding a `Document`. This is the
/// `parse(bytes, opts) -> Document` contract the rendering core consumes.
/// Malformed UTF-8 is replaced lossily rather than failing the parse — a
/// garbled page still deserves a best-effort layout.
pub fn parse(bytes: &[u8], opts: ParseOptions) -> Document {
    let text = tools::utf8::decode_lossy_chunked(bytes, 8192);
    let mut tokenizer = Tokenizer::new(&text);
    let mut builder = TreeBuilder::new();
    let _ = opts; // `enable_js` only matters inside rawtext detection below;
                  // kept as a parameter so callers can thread it through even
                  // though our noscript handling is intentionally simple.

    while let Some(token) = tokenizer.next_token() {
        match token {
            Token::Doctype { name, public_id, system_id } => {
                builder.doctype = Some(Doctype { name, public_id, system_id });
            }
            Token::Comment(text) => builder.push_comment(text),
            Token::Text(text) => builder.push_text(text),
            Token::EndTag { name } => builder.close_matching(&name),
            Token::StartTag { name, mut attrs, self_closing } => {
                if let Some(pos) = attrs.iter().position(|(k, _)| k == RAWTEXT_SENTINEL) {
                    let (_, body) = attrs.remove(pos);
                    builder.push_complete_element(
                        name,
                        attrs,
                        vec![Node::Text { text: body }],
                    );
                } else if self_closing || is_void_element(&name) {
                    builder.push_self_closing(name, attrs);
                } else {
                    builder.push_start_tag(name, attrs);
                }
            }
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_head_and_body() {
        let doc = parse(b"<div><p>hello</p></div>", ParseOptions::default());
        let body = doc.body_element().expect("synthetic body");
        assert_eq!(body.children().len(), 1);
        assert_eq!(body.children()[0].tag_name(), Some("div"));
    }

    #[test]
    fn explicit_head_with_style() {
        let doc = parse(
            b"<html><head><style>p{font-size:123em}</style></head></html>",
            ParseOptions::default(),
        );
        let head = doc.head_element().expect("head");
        let style = &head.children()[0];
        assert_eq!(style.tag_name(), Some("style"));
        assert_eq!(style.children()[0].text(), Some("p{font-size:123em}"));
    }

    #[test]
    fn explicit_body_text() {
        let doc = parse(b"<html><body>hi</body></html>", ParseOptions::default());
        let body = doc.body_element().unwrap();
        assert_eq!(body.children()[0].text(), Some("hi"));
    }

    #[test]
    fn void_elements_have_no_children_and_do_not_swallow_siblings() {
        let doc = parse(b"<p>a<br>b</p>", ParseOptions::default());
        let body = doc.body_element().unwrap();
        let p = &body.children()[0];
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.children()[1].tag_name(), Some("br"));
        assert!(p.children()[1].children().is_empty());
    }

    #[test]
    fn doctype_html_is_no_quirks() {
        let doc = parse(b"<!DOCTYPE html><html></html>", ParseOptions::default());
        assert!(!doc.quirks_mode);
    }

    #[test]
    fn missing_doctype_is_quirks() {
        let doc = parse(b"<html></html>", ParseOptions::default());
        assert!(doc.quirks_mode);
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let doc = parse(b"<p>hi</div></p>", ParseOptions::default());
        let body = doc.body_element().unwrap();
        assert_eq!(body.children().len(), 1);
        assert_eq!(body.children()[0].tag_name(), Some("p"));
    }

    #[test]
    fn anchor_with_href_scenario() {
        let doc = parse(b"<a href=\"x\">link</a>", ParseOptions::default());
        let body = doc.body_element().unwrap();
        let a = &body.children()[0];
        assert_eq!(a.attr("href"), Some("x"));
    }
}

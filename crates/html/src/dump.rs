use crate::dom::{Document, Node};

/// Render a `Document` in the DOM tree-dump format used by tests (§6): one
/// root line `#document`, each subsequent line prefixed by `| ` plus two
/// spaces per depth level, elements as `<name>` with attributes on their own
/// subsequent (deeper) lines, text as `"text"`, comments as `<!-- text -->`,
/// doctype as `<!DOCTYPE name[ "pid" "sid"]>`.
pub fn dump_tree(doc: &Document) -> String {
    let mut out = String::from("#document\n");
    if let Some(dt) = &doc.doctype {
        out.push_str("| ");
        out.push_str(&format_doctype(dt));
        out.push('\n');
    }
    dump_node(&doc.root, 1, &mut out);
    out
}

fn format_doctype(dt: &crate::dom::Doctype) -> String {
    match (&dt.public_id, &dt.system_id) {
        (None, None) => format!("<!DOCTYPE {}>", dt.name),
        (pid, sid) => format!(
            "<!DOCTYPE {} \"{}\" \"{}\">",
            dt.name,
            pid.as_deref().unwrap_or(""),
            sid.as_deref().unwrap_or("")
        ),
    }
}

fn indent(depth: usize, out: &mut String) {
    out.push_str("| ");
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_node(node: &Node, depth: usize, out: &mut String) {
    match node {
        Node::Element { name, attributes, children } => {
            indent(depth - 1, out);
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push('\n');
            for (key, value) in attributes {
                indent(depth, out);
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(value);
                out.push('"');
                out.push('\n');
            }
            for child in children {
                dump_node(child, depth + 1, out);
            }
        }
        Node::Text { text } => {
            indent(depth - 1, out);
            out.push('"');
            out.push_str(text);
            out.push('"');
            out.push('\n');
        }
        Node::Comment { text } => {
            indent(depth - 1, out);
            out.push_str("<!-- ");
            out.push_str(text);
            out.push_str(" -->");
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse};

    #[test]
    fn dumps_simple_document() {
        let doc = parse(b"<html><body><p id=\"x\">hi</p></body></html>", ParseOptions::default());
        let dump = dump_tree(&doc);
        assert!(dump.starts_with("#document\n"));
        assert!(dump.contains("| <html>\n"));
        assert!(dump.contains("|   <body>\n"));
        assert!(dump.contains("|     <p>\n"));
        assert!(dump.contains("|       id=\"x\"\n"));
        assert!(dump.contains("|       \"hi\"\n"));
    }
}

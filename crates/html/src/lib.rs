//! DOM data model and a tag-soup HTML parser.
//!
//! This crate fulfils the `parse(bytes, opts) -> Document` contract the
//! rendering core consumes. It is deliberately not a full WHATWG HTML5
//! tokenizer/tree-construction state machine — that subsystem is explicitly
//! out of scope for the core (network fetching, JS evaluation, and HTML
//! tree construction are all external collaborators here) — but it has to
//! be complete enough to drive real pages through the pipeline.

mod dom;
mod dump;
mod entities;
mod parser;
mod tokenizer;

pub mod dom_utils;

pub use dom::{Doctype, Document, Node, NodeList};
pub use dump::dump_tree;
pub use parser::{ParseOptions, parse};

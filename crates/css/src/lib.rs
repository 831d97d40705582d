mod cascade;
mod media;
mod parser;
mod properties;
mod selector;
mod shorthand;
mod values;

pub use cascade::{LengthValue, StyleTree, StyledNode, build_style_tree};
pub use media::{ColorScheme, MediaContext, MediaQuery, MediaType, Orientation, parse_media_query};
pub use parser::{Rule, Stylesheet, parse_inline_declarations, parse_stylesheet};
pub use properties::PropertyId;
pub use selector::{ElementLike, is_match};
pub use values::{Color, ResolutionInfo, is_auto, is_none, parse_color, resolve_length};

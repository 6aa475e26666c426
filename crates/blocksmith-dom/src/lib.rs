pub mod node;
pub mod parse;
pub mod query;
pub mod serialize;

// Re-export key types for easier usage
pub use node::{Document, DomError, ElementData, NodeId, NodeKind};
pub use parse::{ParseError, parse_block, parse_fragment};
pub use serialize::to_html;

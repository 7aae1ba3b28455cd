mod load;
mod model;

pub use load::{LoadError, load_code_graph};
#[cfg(test)]
pub(crate) use load::parse_code_graph;
pub use model::{CodeGraph, CodeLink, CodeNode, LinkType, NodeType};

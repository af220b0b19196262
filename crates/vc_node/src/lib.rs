#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod document;
mod error;
mod format;
mod input;
mod node_map;
mod output;
mod position;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::NodeError;
pub use format::{Format, Mode};
pub use input::{InputNode, InputNodeMap, NodeReader};
pub use node_map::NodeMap;
pub use output::{NodeWriter, OutputNode, OutputNodeMap};
pub use position::Position;

// -----------------------------------------------------------------------------
// Re-export crates

pub use quick_xml;

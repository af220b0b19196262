#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;

// Generated code refers to `::vc_bind`, which must resolve inside
// this crate's own tests and doctests.
extern crate self as vc_bind;

// -----------------------------------------------------------------------------
// Modules

pub mod class;
pub mod context;
pub mod convert;
pub mod descriptor;
pub mod filter;
pub mod instance;
pub mod label;
pub mod scan;
pub mod schema;
pub mod session;
pub mod strategy;
pub mod style;
pub mod transform;
pub mod utils;

mod error;
mod impls;
mod persister;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-level exports

pub use class::{Bind, Typed};
pub use error::{BoxError, Error, Result};
pub use persister::Persister;
pub use vc_bind_derive::Xml;

// -----------------------------------------------------------------------------
// Re-export crates

pub use vc_node;

use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;
use vc_node::NodeError;

/// Error type user callbacks and transforms may return.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while building schemas or converting documents.
///
/// The variants follow the part of the schema that failed: attribute,
/// element and text errors cover both missing required values and
/// unexpected nodes, while persistence errors cover schema definition
/// problems and type mismatches.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A schema definition or type mismatch problem.
    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Attribute(String),

    #[error("{0}")]
    Element(String),

    #[error("{0}")]
    Text(String),

    /// A constructor parameter does not line up with the schema.
    #[error("{0}")]
    Constructor(String),

    /// A property accessor is declared inconsistently.
    #[error("{0}")]
    Method(String),

    /// No concrete type or constructor could produce a value.
    #[error("{0}")]
    Instantiation(String),

    /// An `id`/`reference` pair could not be resolved.
    #[error("{0}")]
    Cycle(String),

    /// Text could not be converted to or from a primitive.
    #[error("{0}")]
    Transform(String),

    /// A lifecycle callback returned an error.
    #[error("Callback '{name}' of {class} failed: {source}")]
    Callback {
        name: &'static str,
        class: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Shorthand for results of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

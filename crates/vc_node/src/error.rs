use alloc::string::String;

use thiserror::Error;

use crate::Position;

// -----------------------------------------------------------------------------
// NodeError

/// Errors raised by the node reader and writer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NodeError {
    /// The source is not well formed XML.
    #[error("XML syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    /// The source ended before the document element was closed.
    #[error("Unexpected end of document at {0}")]
    UnexpectedEof(Position),

    /// The source has no document element.
    #[error("Document has no root element")]
    NoRoot,

    /// An element was added to a node that is already committed.
    #[error("Cannot add child '{child}' to committed node '{parent}'")]
    Committed { parent: String, child: String },

    /// A second document element was requested from the writer.
    #[error("Document already has root element '{0}'")]
    DuplicateRoot(String),

    /// Serializing the node tree failed.
    #[error("Unable to write document: {0}")]
    Write(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

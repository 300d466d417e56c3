//! Error types surfaced by the engine and the adapter boundary.
//!
//! All fallible operations validate their inputs before mutating the
//! diagram, so on error the diagram is left unchanged. The engine never
//! retries.

use thiserror::Error;

use crate::types::{BitString, NodeName, Value};

/// The result of an MTBDD operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when an MTBDD operation failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A bit string does not span all variables of the diagram.
    #[error("bit string has {actual} bits, the diagram has {expected} variables")]
    BitStringLength { expected: usize, actual: usize },

    /// A flat-table entry refers to a variable outside `[0, num_vars)`.
    #[error("flat entry {position} tests variable {var}, the diagram has {num_vars} variables")]
    FlatVarOutOfRange {
        position: usize,
        var: i32,
        num_vars: usize,
    },

    /// A flat-table entry refers to a child position outside the table.
    #[error("flat entry {position} points at position {child}, the table has {len} entries")]
    FlatChildOutOfRange {
        position: usize,
        child: u64,
        len: usize,
    },

    /// A root with the given name already exists.
    #[error("a root named {0} already exists")]
    DuplicateRoot(NodeName),

    /// There is no root with the given name.
    #[error("no root named {0}")]
    MissingRoot(NodeName),

    /// Export requires the root names to be exactly `0..num_roots`.
    #[error("root names are not contiguous: missing root {missing} among {num_roots} roots")]
    NonContiguousRoots { missing: NodeName, num_roots: usize },

    /// A symbol is absent from the encoder's dictionary.
    #[error("symbol {0} is not in the alphabet")]
    UnknownSymbol(Value),

    /// A bit string decodes to no symbol in the encoder's dictionary.
    #[error("code {code:?} does not encode any alphabet symbol")]
    UnknownCode { code: BitString },
}

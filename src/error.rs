//! Error type shared by the lexicon loaders, the collection text parser and
//! the checked table cursors.

use alloc::string::String;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by `chainlex`.
///
/// Load errors are fatal for the operation that produced them: nothing is
/// partially installed. Lookups of missing keys are never errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying reader or file failure.
    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input does not start with the `DAWG` magic bytes.
    #[error("not a DAWG file: missing \"DAWG\" magic")]
    BadMagic,

    /// The textual header after the magic could not be read.
    #[error("improperly formed lexicon header: {reason}")]
    MalformedHeader {
        /// What was wrong with the header
        reason: String,
    },

    /// Fewer edge bytes followed the header than it announced.
    #[error("truncated edge block: expected {expected} bytes, found {actual}")]
    TruncatedEdges {
        /// Byte count announced by the header
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// An edge record points outside the edge array or is otherwise invalid.
    #[error("corrupt edge at index {index}: {reason}")]
    CorruptEdge {
        /// Index of the offending edge
        index: usize,
        /// Description of the violation
        reason: String,
    },

    /// A compiled DAWG was installed into a lexicon that already holds words.
    #[error("binary lexicon files require an empty lexicon")]
    BinaryRequiresEmpty,

    /// The word set needs more edges than the 24-bit child offset can address.
    #[error("too many edges for the DAWG format: {count}")]
    TooManyEdges {
        /// Number of edges that would have been written
        count: usize,
    },

    /// The table was structurally modified after the cursor was created.
    #[error(
        "collection modified during iteration; do not modify a collection while a cursor over it \
         is live"
    )]
    ConcurrentModification,

    /// Collection text could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the input where parsing failed
        position: usize,
        /// Description of the failure
        message: String,
    },
}

use thiserror::Error;

/// Errors returned from the fallible edges of the core: file opens and
/// k-mer string decoding. The query path never returns an `Error` — a
/// missing k-mer is `None`, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A pair-array or index file header did not match what this crate
    /// expects: wrong magic, or a `val_len` other than 4.
    #[error("bad {context} format: expected {expected}, found {found}")]
    BadFormat {
        context: &'static str,
        expected: &'static str,
        found: String,
    },

    /// `bitkmer::encode` saw a byte outside `{A,C,G,T,a,c,g,t}`.
    #[error("invalid base {char:?} at position {position}")]
    InvalidBase { char: char, position: usize },

    /// A debug-only bounds violation on `Index::at`. Never constructed
    /// in release builds; release trusts the caller-derived bin index.
    #[error("index {index} out of range (bound {bound})")]
    OutOfRange { index: usize, bound: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

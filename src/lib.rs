//! A memory-mapped, read-mostly taxonomic k-mer database core: bit-packed
//! canonical k-mers, a minimizer-sparse offset index, and a hybrid
//! binary/linear search over a sorted pair array.
//!
//! This crate owns none of the bytes it reads — every type here borrows
//! a byte slice a caller has opened (typically via `memmap2`) and lives
//! no longer than it. Building a FASTA/FASTQ classifier, a taxonomy/LCA
//! layer, or a CLI on top of this core is out of scope here.

mod bitkmer;
mod database;
mod error;
mod index;
mod index_builder;
mod index_header;
mod query;

pub use bitkmer::{bin_key, canonical, decode, encode, reverse_complement, DEFAULT_TOGGLE_MASK};
pub use database::Database;
pub use error::{Error, Result};
pub use index::Index;
pub use index_builder::IndexBuilder;
pub use index_header::{IndexHeader, IndexVersion};
pub use query::QueryState;

//! Building a minimizer index from an already-sorted pair array.
//!
//! Follows the same shape as `process_k2file`'s page construction: a
//! `Vec` of atomics sized to the output, a `rayon` parallel pass that
//! only ever increments cells, then a sequential pass that turns the
//! histogram into the file this crate reads back with [`crate::index::Index`].

use byteorder::{LittleEndian, WriteBytesExt};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bitkmer::{bin_key, DEFAULT_TOGGLE_MASK};
use crate::database::Database;

/// Builds v2 (`"KRAKIX2"`) minimizer indices: every bin key folds in
/// [`DEFAULT_TOGGLE_MASK`] for better bin-size balance, matching the
/// `IndexVersion::V2` this crate's reader expects by default.
pub struct IndexBuilder {
    nt: u8,
}

impl IndexBuilder {
    /// `nt` is the minimizer length new bins are keyed by; must be in
    /// `[1, 15]` and not exceed the k-mer length of any database this
    /// builder is run against.
    pub fn new(nt: u8) -> Self {
        debug_assert!((1..=15).contains(&nt), "nt must be in [1, 15]");
        IndexBuilder { nt }
    }

    /// Counts, in parallel, which bin every key in `database` falls
    /// into, then serializes the resulting offset table as a complete
    /// v2 index file.
    pub fn build(&self, database: &Database) -> Vec<u8> {
        let k = database.k();
        let pair_count = database.pair_count();
        let bin_count = 4usize.pow(self.nt as u32);

        if pair_count == 0 {
            eprintln!("index_builder: building an index over an empty pair array");
        }

        let histogram: Vec<AtomicU64> = (0..bin_count).map(|_| AtomicU64::new(0)).collect();

        (0..pair_count).into_par_iter().for_each(|i| {
            let (key, _value) = database
                .pair_at(i)
                .expect("i < pair_count by construction of this range");
            let bin = bin_key(key, k, self.nt, DEFAULT_TOGGLE_MASK) as usize;
            histogram[bin].fetch_add(1, Ordering::Relaxed);
        });

        let mut offsets = Vec::with_capacity(bin_count + 1);
        let mut running = 0u64;
        offsets.push(running);
        for cell in &histogram {
            running += cell.load(Ordering::Relaxed);
            offsets.push(running);
        }

        let mut out = Vec::with_capacity(8 + offsets.len() * 8);
        out.extend_from_slice(b"KRAKIX2");
        out.push(self.nt);
        for &offset in &offsets {
            out.write_u64::<LittleEndian>(offset).expect("Vec<u8> writes are infallible");
        }
        out
    }
}

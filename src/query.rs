//! Looking up a k-mer's taxon: a hybrid binary/linear search over the
//! minimizer bin a k-mer falls in, plus an amortised variant that
//! remembers the last bin a caller landed in.
//!
//! Grounded on the `last_minimizer`/`last_taxon` caching in
//! `classify_seq` — consecutive k-mers from the same read usually
//! share a minimizer, so skipping the index lookup on a repeat pays
//! off over a read-length scan.

use crate::database::Database;

/// Window size below which [`search_range`] switches from binary to
/// linear search. Minimizer bins are small in practice; below this
/// size a linear scan wins on cache behaviour alone.
const LINEAR_THRESHOLD: usize = 16;

/// Per-caller cache of the last bin a query landed in, so a run of
/// k-mers sharing a minimizer can skip the index lookup. `Copy` and
/// cheap to carry on the stack per scanning thread — never shared
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct QueryState {
    last_bin_key: u64,
    lo: usize,
    hi: usize,
}

impl Default for QueryState {
    /// `lo > hi` is the sentinel for "nothing cached yet"; the first
    /// query always falls through to a fresh index lookup.
    fn default() -> Self {
        QueryState {
            last_bin_key: 0,
            lo: 1,
            hi: 0,
        }
    }
}

impl QueryState {
    fn is_cached_for(&self, bin: u64) -> bool {
        self.lo <= self.hi && self.last_bin_key == bin
    }

    fn cache(&mut self, bin: u64, lo: usize, hi: usize) {
        self.last_bin_key = bin;
        self.lo = lo;
        self.hi = hi;
    }
}

/// Binary search while the window is larger than [`LINEAR_THRESHOLD`],
/// then linear scan the remainder. Pairs in `[lo, hi)` are assumed
/// sorted ascending by key, which the on-disk format guarantees.
/// Treats an out-of-range `lo`/`hi` as "nothing here" rather than
/// panicking — a mismatched index/database pair is malformed input,
/// not a crash.
fn search_range(db: &Database, lo: usize, hi: usize, target: u64) -> Option<u32> {
    let mut lo = lo.min(db.pair_count());
    let mut hi = hi.min(db.pair_count());

    while hi - lo > LINEAR_THRESHOLD {
        let mid = lo + (hi - lo) / 2;
        match db.pair_at(mid) {
            Some((key, _)) if key < target => lo = mid + 1,
            Some(_) | None => hi = mid,
        }
    }

    for i in lo..hi {
        match db.pair_at(i) {
            Some((key, value)) if key == target => return Some(value),
            Some((key, _)) if key > target => break,
            Some(_) => continue,
            None => break,
        }
    }
    None
}

impl<'a> Database<'a> {
    /// Looks up the taxon stored for `kmer`. Stateless: recomputes the
    /// minimizer bin from scratch every call. `None` if `kmer` isn't
    /// present.
    ///
    /// # Panics
    /// If no index has been bound via [`Database::bind_index`].
    pub fn query(&self, kmer: u64) -> Option<u32> {
        let index = self.index().expect("bind_index must be called before query");
        let bin = self.bin_key_of(kmer);
        let canonical_kmer = self.canonical_of(kmer);
        let lo = index.at(bin as usize) as usize;
        let hi = index.at(bin as usize + 1) as usize;
        search_range(self, lo, hi, canonical_kmer)
    }

    /// Looks up the taxon stored for `kmer`, using `state` to skip the
    /// minimizer computation when `kmer` falls in the same bin as the
    /// previous call. A flat two-attempt loop rather than a recursive
    /// retry: the first attempt searches the incoming cached range, if
    /// any, without computing `kmer`'s bin key at all; only a miss on
    /// that attempt computes the bin key, and only a bin change on top
    /// of that reloads the range from the index for a second search.
    ///
    /// # Panics
    /// If no index has been bound via [`Database::bind_index`].
    pub fn query_with_state(&self, kmer: u64, state: &mut QueryState) -> Option<u32> {
        let canonical_kmer = self.canonical_of(kmer);

        for attempt in 0..2 {
            if attempt == 0 {
                if state.lo > state.hi {
                    continue;
                }
                if let Some(value) = search_range(self, state.lo, state.hi, canonical_kmer) {
                    return Some(value);
                }
            } else {
                let bin = self.bin_key_of(kmer);
                if state.is_cached_for(bin) {
                    // Already searched exactly this bin's range on attempt 0 and missed.
                    return None;
                }
                let index = self
                    .index()
                    .expect("bind_index must be called before query_with_state");
                let lo = index.at(bin as usize) as usize;
                let hi = index.at(bin as usize + 1) as usize;
                state.cache(bin, lo, hi);
                return search_range(self, state.lo, state.hi, canonical_kmer);
            }
        }
        None
    }
}

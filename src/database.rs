//! The pair-array file: header parsing plus raw (key, value) access.
//! Holds no ownership of its backing storage — it borrows the bytes of
//! a file a collaborator has already opened (and typically memory-mapped).

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Error;
use crate::index::Index;

const MAGIC: &[u8; 8] = b"JFLISTDN";
const REQUIRED_VAL_LEN: u64 = 4;

/// A borrowed view over a pair-array file: the parsed header plus the
/// sorted `(key, value)` records that follow it. `Database` never owns
/// the byte region it reads from — the region (typically a memory
/// map) must outlive this value, which the `'a` lifetime enforces.
#[derive(Debug, Clone, Copy)]
pub struct Database<'a> {
    bytes: &'a [u8],
    key_bits: usize,
    key_ct: usize,
    index: Option<Index<'a>>,
}

impl<'a> Database<'a> {
    /// Parses the pair-array header out of `bytes`. Does not read, or
    /// even validate the length of, the pair array itself — callers
    /// that need that must go through [`Database::pair_at`], which is
    /// bounds-checked.
    ///
    /// # Errors
    /// `Error::BadFormat` if the magic doesn't match `"JFLISTDN"`, or
    /// `val_len` is anything but 4.
    pub fn open(bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.len() < 56 || &bytes[0..8] != MAGIC {
            return Err(Error::BadFormat {
                context: "database magic",
                expected: "JFLISTDN",
                found: String::from_utf8_lossy(bytes.get(0..8).unwrap_or(b"")).into_owned(),
            });
        }
        let key_bits = LittleEndian::read_u64(&bytes[8..16]) as usize;
        let val_len = LittleEndian::read_u64(&bytes[16..24]);
        if val_len != REQUIRED_VAL_LEN {
            return Err(Error::BadFormat {
                context: "database val_len",
                expected: "4",
                found: val_len.to_string(),
            });
        }
        let key_ct = LittleEndian::read_u64(&bytes[48..56]) as usize;

        Ok(Database {
            bytes,
            key_bits,
            key_ct,
            index: None,
        })
    }

    /// K-mer length, `key_bits / 2`.
    pub fn k(&self) -> usize {
        self.key_bits / 2
    }

    pub fn key_bits(&self) -> usize {
        self.key_bits
    }

    /// Byte width of a stored key, `ceil(key_bits / 8)`.
    pub fn key_len(&self) -> usize {
        (self.key_bits + 7) / 8
    }

    /// Byte width of a stored value. Always 4 — fixed by the format.
    pub fn val_len(&self) -> usize {
        REQUIRED_VAL_LEN as usize
    }

    /// `key_len + val_len`, the byte stride between consecutive pairs.
    pub fn pair_stride(&self) -> usize {
        self.key_len() + self.val_len()
    }

    /// Total header length: `72 + 2*(4 + 8*key_bits)`.
    pub fn header_size(&self) -> usize {
        72 + 2 * (4 + 8 * self.key_bits)
    }

    /// Byte offset of the first pair — the same as [`Database::header_size`],
    /// exposed under the name the external interface spec uses.
    pub fn pair_ptr(&self) -> usize {
        self.header_size()
    }

    pub fn pair_count(&self) -> usize {
        self.key_ct
    }

    /// The mask that discards high-order garbage above `key_bits` in a
    /// stored key's last byte.
    pub fn key_mask(&self) -> u64 {
        if self.key_bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.key_bits) - 1
        }
    }

    /// Attaches the minimizer index this database's bins are delimited
    /// by. Required before [`Database::query`]/[`Database::query_with_state`].
    pub fn bind_index(&mut self, index: Index<'a>) {
        self.index = Some(index);
    }

    pub fn index(&self) -> Option<&Index<'a>> {
        self.index.as_ref()
    }

    /// Reads pair `i` directly: the masked key and its taxon value.
    /// `None` if `i >= pair_count()` — every other bin-relative
    /// operation in this crate is built on this primitive.
    #[inline]
    pub fn pair_at(&self, i: usize) -> Option<(u64, u32)> {
        if i >= self.key_ct {
            return None;
        }
        let stride = self.pair_stride();
        let key_len = self.key_len();
        let base = self.header_size() + i * stride;
        let key_bytes = &self.bytes[base..base + key_len];
        let key = LittleEndian::read_uint(key_bytes, key_len) & self.key_mask();
        let value = LittleEndian::read_u32(&self.bytes[base + key_len..base + key_len + 4]);
        Some((key, value))
    }

    /// Iterates every stored pair in on-disk order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        (0..self.key_ct).map(move |i| self.pair_at(i).expect("i < key_ct"))
    }

    /// `bin_key` for `kmer`, supplying this database's own `k` and the
    /// bound index's `nt`/xor mask. Panics (via `expect`) if no index
    /// is bound — callers that haven't called `bind_index` yet have a
    /// programming error, not a recoverable one.
    pub fn bin_key_of(&self, kmer: u64) -> u64 {
        let index = self.index.expect("bind_index must be called before bin_key_of");
        crate::bitkmer::bin_key(kmer, self.k(), index.nt(), index.xor_mask())
    }

    /// `canonical` for `kmer` using this database's own `k`.
    pub fn canonical_of(&self, kmer: u64) -> u64 {
        crate::bitkmer::canonical(kmer, self.k())
    }
}

//! The minimizer-sparse offset table: `(4^nt)+1` monotone offsets
//! delimiting bins inside the pair array.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Error;
use crate::index_header::{IndexHeader, IndexVersion, HEADER_LEN};

/// A borrowed view over an index file's bytes: the header plus the
/// offset table `B[0..=4^nt]`. Holds no ownership of the backing
/// region — the byte slice must outlive this `Index`.
#[derive(Debug, Clone, Copy)]
pub struct Index<'a> {
    header: IndexHeader,
    offsets: &'a [u8],
}

impl<'a> Index<'a> {
    /// Parses an index file's bytes: header, then the offset table.
    ///
    /// # Errors
    /// `Error::BadFormat` if the magic doesn't match, or the buffer is
    /// too short to hold the `4^nt + 1` offsets the header promises.
    pub fn open(bytes: &'a [u8]) -> Result<Self, Error> {
        let header = IndexHeader::parse(bytes)?;
        let offsets = &bytes[HEADER_LEN..];
        let needed = header.offsets_byte_len();
        if offsets.len() < needed {
            return Err(Error::BadFormat {
                context: "index offsets",
                expected: format!("{needed} bytes"),
                found: format!("{} bytes", offsets.len()),
            });
        }
        Ok(Index {
            header,
            offsets: &offsets[..needed],
        })
    }

    pub fn version(&self) -> IndexVersion {
        self.header.version
    }

    pub fn nt(&self) -> u8 {
        self.header.nt
    }

    /// The XOR mask this index's minimizers were built with.
    pub fn xor_mask(&self) -> u64 {
        self.header.version.xor_mask()
    }

    /// Number of offsets, `4^nt + 1`.
    pub fn len(&self) -> usize {
        self.header.offset_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `B[i]`, the pair-array index of the first pair in bin `i` (or,
    /// for `i == 4^nt`, the total pair count).
    ///
    /// In debug builds, panics via `OutOfRange` (as an internal
    /// invariant violation, not a recoverable error) if `i` is beyond
    /// the table. Release builds trust the caller and skip the check,
    /// since every caller in this crate derives `i` from `bin_key`,
    /// which is always in `[0, 4^nt]`.
    #[inline]
    pub fn at(&self, i: usize) -> u64 {
        debug_assert!(
            i < self.len(),
            "{}",
            Error::OutOfRange {
                index: i,
                bound: self.len()
            }
        );
        let byte_offset = i * 8;
        LittleEndian::read_u64(&self.offsets[byte_offset..byte_offset + 8])
    }

    /// Checked variant of [`Index::at`] for callers outside the hot
    /// path (tests, tooling) that want `Result` instead of a debug
    /// panic.
    pub fn try_at(&self, i: usize) -> Result<u64, Error> {
        if i >= self.len() {
            return Err(Error::OutOfRange {
                index: i,
                bound: self.len(),
            });
        }
        Ok(self.at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_index_bytes(nt: u8, offsets: &[u64]) -> Vec<u8> {
        let mut bytes = b"KRAKIX2".to_vec();
        bytes.push(nt);
        for &o in offsets {
            bytes.extend_from_slice(&o.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn reads_offsets_in_order() {
        let nt = 1u8; // 4 bins, 5 offsets
        let offsets = [0u64, 2, 5, 9, 12];
        let bytes = build_index_bytes(nt, &offsets);
        let index = Index::open(&bytes).unwrap();
        assert_eq!(index.len(), 5);
        for (i, &expected) in offsets.iter().enumerate() {
            assert_eq!(index.at(i), expected);
        }
    }

    #[test]
    fn rejects_truncated_offsets() {
        let nt = 2u8; // needs 17 offsets = 136 bytes
        let mut bytes = b"KRAKIDX".to_vec();
        bytes.push(nt);
        bytes.extend_from_slice(&[0u8; 16]); // way too short
        assert!(matches!(Index::open(&bytes), Err(Error::BadFormat { .. })));
    }

    #[test]
    fn try_at_reports_out_of_range() {
        let bytes = build_index_bytes(1, &[0, 1, 2, 3, 4]);
        let index = Index::open(&bytes).unwrap();
        assert!(index.try_at(5).is_err());
        assert!(index.try_at(4).is_ok());
    }

    #[test]
    fn xor_mask_follows_version() {
        let v1 = Index::open(&build_index_bytes(1, &[0, 0, 0, 0, 0])).unwrap();
        assert_eq!(v1.xor_mask(), 0);

        let mut bytes = b"KRAKIX2".to_vec();
        bytes.push(1);
        bytes.extend_from_slice(&[0u8; 5 * 8]);
        let v2 = Index::open(&bytes).unwrap();
        assert_eq!(v2.xor_mask(), crate::bitkmer::DEFAULT_TOGGLE_MASK);
    }
}

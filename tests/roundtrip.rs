//! End-to-end test against real files on disk: build a pair array and
//! an index, memory-map both back, and query through the public API.

use std::io::Write;

use kmer_taxdb::{canonical, encode, Database, Index, IndexBuilder};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn write_database_file(key_bits: u64, pairs: &[(u64, u32)]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut bytes = vec![0u8; 56];
    bytes[0..8].copy_from_slice(b"JFLISTDN");
    bytes[8..16].copy_from_slice(&key_bits.to_le_bytes());
    bytes[16..24].copy_from_slice(&4u64.to_le_bytes());
    bytes[48..56].copy_from_slice(&(pairs.len() as u64).to_le_bytes());
    bytes.resize(72 + 2 * (4 + 8 * key_bits as usize), 0);

    let key_len = ((key_bits + 7) / 8) as usize;
    for &(key, value) in pairs {
        let mut key_bytes = key.to_le_bytes().to_vec();
        key_bytes.truncate(key_len);
        bytes.extend_from_slice(&key_bytes);
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    file.write_all(&bytes).unwrap();
    file
}

fn write_index_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

#[test]
fn builds_queries_and_misses_over_memory_mapped_files() {
    const K: usize = 12;
    const NT: u8 = 3;

    let mut rng = StdRng::seed_from_u64(0xD1B54A32D192ED03);

    let mask = (1u64 << (2 * K)) - 1;
    let mut keys: Vec<u64> = (0..2_000)
        .map(|_| canonical(rng.gen::<u64>() & mask, K))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    let pairs: Vec<(u64, u32)> = keys.iter().map(|&k| (k, (k % 4096) as u32)).collect();

    let db_file = write_database_file((2 * K) as u64, &pairs);
    let db_mmap = unsafe { memmap2::Mmap::map(db_file.as_file()).unwrap() };
    let database = Database::open(&db_mmap).unwrap();
    assert_eq!(database.k(), K);
    assert_eq!(database.pair_count(), pairs.len());

    let index_bytes = IndexBuilder::new(NT).build(&database);
    let index_file = write_index_file(&index_bytes);
    let index_mmap = unsafe { memmap2::Mmap::map(index_file.as_file()).unwrap() };
    let index = Index::open(&index_mmap).unwrap();
    assert_eq!(index.nt(), NT);

    let mut database = database;
    database.bind_index(index);

    for &(key, value) in pairs.iter().step_by(37) {
        assert_eq!(database.query(key), Some(value));
    }

    let absent = loop {
        let candidate = canonical(rng.gen::<u64>() & mask, K);
        if keys.binary_search(&candidate).is_err() {
            break candidate;
        }
    };
    assert_eq!(database.query(absent), None);
}

#[test]
fn amortised_query_agrees_with_stateless_query_across_a_read() {
    use kmer_taxdb::QueryState;

    const K: usize = 8;
    const NT: u8 = 2;

    let read = "ACGTACGTGGCCTTAAACGTGGCCAAACGTTTGGCCAAGGTT";
    let mut kmers = Vec::new();
    for window_start in 0..=(read.len() - K) {
        kmers.push(encode(&read[window_start..window_start + K]).unwrap());
    }

    let mut canon: Vec<u64> = kmers.iter().map(|&k| canonical(k, K)).collect();
    canon.sort_unstable();
    canon.dedup();
    let pairs: Vec<(u64, u32)> = canon.iter().enumerate().map(|(i, &k)| (k, i as u32)).collect();

    let db_file = write_database_file((2 * K) as u64, &pairs);
    let db_mmap = unsafe { memmap2::Mmap::map(db_file.as_file()).unwrap() };
    let database = Database::open(&db_mmap).unwrap();
    let index_bytes = IndexBuilder::new(NT).build(&database);
    let index_file = write_index_file(&index_bytes);
    let index_mmap = unsafe { memmap2::Mmap::map(index_file.as_file()).unwrap() };

    let mut database = database;
    database.bind_index(Index::open(&index_mmap).unwrap());

    let mut state = QueryState::default();
    for &kmer in &kmers {
        assert_eq!(database.query(kmer), database.query_with_state(kmer, &mut state));
    }
}

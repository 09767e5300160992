//! The read-only dictionary (ROD): a flat word block addressed by byte
//! offset, an open-addressing hash table over those offsets, and a
//! soundslike-sorted jump index used to scan candidates sharing a
//! soundslike prefix.
//!
//! Grounded on `examples/original_source/modules/speller/default/primes.cpp`
//! for prime-sized table growth, and on the `ToMemmap`/`vfs::File`
//! abstraction in `examples/other_examples/.../divvunspell-src-speller-mod.rs.rs`
//! for memory-mapping a built dictionary file instead of reading it
//! eagerly into owned buffers.

use std::fs::File;
use std::io::{self, Read as _, Write as _};
use std::path::Path;

use memmap2::Mmap;

use crate::dict::{Dict, SensitiveCompare, WordEntry};
use crate::error::{ErrorKind, SpellError};
use crate::lang::Lang;
use crate::suggest::SuggestSource;

const MAGIC: &[u8; 20] = b"spellwright rod 1\0\0";
const ENDIAN_SENTINEL: u32 = 12_345_678;
const EMPTY: u32 = u32::MAX;
const HEADER_LEN: usize = 20 + 4 + 4 * 4;

/// Smallest prime >= `n` (trial division is fine; dictionaries are at
/// most a few hundred thousand words, so tables stay small).
pub fn next_prime(n: u32) -> u32 {
    fn is_prime(n: u32) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut d = 3;
        while d.saturating_mul(d) <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Target load factor for the open-addressing table: keep roughly twice
/// as many buckets as words so probe chains stay short.
const LOAD_FACTOR_DIVISOR: u32 = 2;

/// Fixed-size file header. Everything after it is the word block,
/// followed immediately by the hash table (an array of `u32` offsets).
#[derive(Debug, Clone, Copy)]
struct DataHead {
    word_count: u32,
    word_block_size: u32,
    hash_table_size: u32,
}

impl DataHead {
    fn to_bytes(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&ENDIAN_SENTINEL.to_le_bytes());
        buf.extend_from_slice(&self.word_count.to_le_bytes());
        buf.extend_from_slice(&self.word_block_size.to_le_bytes());
        buf.extend_from_slice(&self.hash_table_size.to_le_bytes());
        buf
    }

    fn parse(buf: &[u8]) -> Result<DataHead, SpellError> {
        if buf.len() < HEADER_LEN {
            return Err(SpellError::simple(ErrorKind::BadFileFormat, "file too short for a ROD header"));
        }
        if &buf[0..20] != MAGIC {
            return Err(SpellError::simple(ErrorKind::BadFileFormat, "bad ROD magic string"));
        }
        let endian = u32::from_le_bytes(buf[20..24].try_into().unwrap());
        if endian != ENDIAN_SENTINEL {
            return Err(SpellError::simple(
                ErrorKind::BadFileFormat,
                "ROD endian sentinel mismatch (built on a different byte order)",
            ));
        }
        let word_count = u32::from_le_bytes(buf[24..28].try_into().unwrap());
        let word_block_size = u32::from_le_bytes(buf[28..32].try_into().unwrap());
        let hash_table_size = u32::from_le_bytes(buf[32..36].try_into().unwrap());
        Ok(DataHead {
            word_count,
            word_block_size,
            hash_table_size,
        })
    }
}

/// One word block entry's header: four 4-byte slots addressed by
/// negative offset from the word bytes themselves (`buf[off-16..off]`),
/// `frequency`, `flags`, `next_offset` (the next entry in this bucket's
/// collision chain, or `EMPTY`), and `word_size`.
struct EntryHeader {
    frequency: u32,
    flags: u32,
    next_offset: u32,
    word_size: u32,
}

fn read_header(block: &[u8], word_offset: u32) -> EntryHeader {
    let o = word_offset as usize;
    EntryHeader {
        frequency: u32::from_le_bytes(block[o - 16..o - 12].try_into().unwrap()),
        flags: u32::from_le_bytes(block[o - 12..o - 8].try_into().unwrap()),
        next_offset: u32::from_le_bytes(block[o - 8..o - 4].try_into().unwrap()),
        word_size: u32::from_le_bytes(block[o - 4..o].try_into().unwrap()),
    }
}

/// A soundslike-sorted entry used by the jump tables and soundslike scan.
struct SoundslikeEntry {
    soundslike: Vec<u8>,
    offset: u32,
}

/// The read-only dictionary: a memory-mapped (or owned, for in-memory
/// builds) word block, its hash table, and a soundslike index rebuilt
/// at load time from the word bytes (the jump tables are derived
/// structures, not part of the persisted format here).
pub struct Rod {
    storage: Storage,
    word_count: u32,
    word_block_off: usize,
    word_block_len: usize,
    hash_table_off: usize,
    hash_table_size: u32,
    soundslike_index: Vec<SoundslikeEntry>,
    /// first soundslike byte -> index range in `soundslike_index`.
    jump1: [(u32, u32); 257],
}

enum Storage {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Storage {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v,
            Storage::Mapped(m) => m,
        }
    }
}

impl Rod {
    fn word_block(&self) -> &[u8] {
        &self.storage.bytes()[self.word_block_off..self.word_block_off + self.word_block_len]
    }

    fn hash_slots(&self) -> &[u8] {
        &self.storage.bytes()[self.hash_table_off..self.hash_table_off + self.hash_table_size as usize * 4]
    }

    fn hash_slot(&self, i: u32) -> u32 {
        let s = self.hash_slots();
        let o = i as usize * 4;
        u32::from_le_bytes(s[o..o + 4].try_into().unwrap())
    }

    fn word_at(&self, offset: u32) -> &[u8] {
        let h = read_header(self.word_block(), offset);
        let o = offset as usize;
        &self.word_block()[o..o + h.word_size as usize]
    }

    /// Hashes raw word bytes into a bucket index. `build` and `lookup`
    /// must agree on exactly what bytes get hashed here (raw, uncleaned
    /// bytes in both places) or a word stored under one bucket becomes
    /// unreachable by its own literal lookup.
    fn hash_bucket(&self, word: &[u8]) -> u32 {
        fnv1a(word) % self.hash_table_size
    }

    /// Builds a ROD in memory from a word list, ready for `write_to` or
    /// direct use as a `Dict`. This is the terminal step of the
    /// offline dictionary build pipeline.
    pub fn build(words: &[WordEntry], lang: &Lang) -> Rod {
        let mut word_block = Vec::new();
        let mut offsets = Vec::with_capacity(words.len());
        for w in words {
            let header_pos = word_block.len();
            word_block.extend_from_slice(&0u32.to_le_bytes()); // frequency
            word_block.extend_from_slice(&0u32.to_le_bytes()); // flags
            word_block.extend_from_slice(&EMPTY.to_le_bytes()); // next_offset
            word_block.extend_from_slice(&(w.word.len() as u32).to_le_bytes());
            let word_off = word_block.len() as u32;
            word_block.extend_from_slice(&w.word);
            debug_assert_eq!(header_pos + 16, word_off as usize);
            offsets.push((word_off, w.word.clone()));
        }

        let table_size = next_prime((words.len() as u32 / LOAD_FACTOR_DIVISOR).max(1) * LOAD_FACTOR_DIVISOR + 1);
        let mut slots = vec![EMPTY; table_size as usize];
        for (offset, raw) in &offsets {
            let bucket = fnv1a(raw) % table_size;
            if slots[bucket as usize] == EMPTY {
                slots[bucket as usize] = *offset;
                continue;
            }
            // collision: chain onto the existing bucket's entry via its
            // `next_offset` slot, walking to the end of the chain.
            let mut cur = slots[bucket as usize];
            loop {
                let h = read_header(&word_block, cur);
                if h.next_offset == EMPTY {
                    let pos = cur as usize - 8;
                    word_block[pos..pos + 4].copy_from_slice(&offset.to_le_bytes());
                    break;
                }
                cur = h.next_offset;
            }
        }

        let mut hash_table_bytes = Vec::with_capacity(slots.len() * 4);
        for s in &slots {
            hash_table_bytes.extend_from_slice(&s.to_le_bytes());
        }

        let head = DataHead {
            word_count: words.len() as u32,
            word_block_size: word_block.len() as u32,
            hash_table_size: table_size,
        };
        let mut storage = head.to_bytes();
        let word_block_off = storage.len();
        storage.extend_from_slice(&word_block);
        let hash_table_off = storage.len();
        storage.extend_from_slice(&hash_table_bytes);

        let mut rod = Rod {
            storage: Storage::Owned(storage),
            word_count: head.word_count,
            word_block_off,
            word_block_len: word_block.len(),
            hash_table_off,
            hash_table_size: table_size,
            soundslike_index: Vec::new(),
            jump1: [(0, 0); 257],
        };
        rod.build_soundslike_index(lang);
        rod
    }

    /// Writes this ROD's on-disk form (header + word block + hash
    /// table) so a later process can `load` it via `memmap2`.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> Result<(), SpellError> {
        out.write_all(self.storage.bytes())
            .map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), SpellError> {
        let file = File::create(path).map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        self.write_to(file)
    }

    /// Memory-maps a previously built `.rws`-style file and rebuilds the
    /// soundslike jump index from its word bytes.
    pub fn load(path: &Path, lang: &Lang) -> Result<Rod, SpellError> {
        let file = File::open(path).map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let head = DataHead::parse(&mmap)?;
        log::debug!("mapped dictionary {} ({} words)", path.display(), head.word_count);
        let word_block_off = HEADER_LEN;
        let hash_table_off = word_block_off + head.word_block_size as usize;
        let mut rod = Rod {
            storage: Storage::Mapped(mmap),
            word_count: head.word_count,
            word_block_off,
            word_block_len: head.word_block_size as usize,
            hash_table_off,
            hash_table_size: head.hash_table_size,
            soundslike_index: Vec::new(),
            jump1: [(0, 0); 257],
        };
        rod.build_soundslike_index(lang);
        Ok(rod)
    }

    /// Loads the on-disk form from any reader into an owned in-memory
    /// ROD (used when the source is not a plain file, e.g. in `wasm`).
    pub fn load_bytes(mut reader: impl io::Read, lang: &Lang) -> Result<Rod, SpellError> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let head = DataHead::parse(&buf)?;
        let word_block_off = HEADER_LEN;
        let hash_table_off = word_block_off + head.word_block_size as usize;
        let mut rod = Rod {
            storage: Storage::Owned(buf),
            word_count: head.word_count,
            word_block_off,
            word_block_len: head.word_block_size as usize,
            hash_table_off,
            hash_table_size: head.hash_table_size,
            soundslike_index: Vec::new(),
            jump1: [(0, 0); 257],
        };
        rod.build_soundslike_index(lang);
        Ok(rod)
    }

    fn build_soundslike_index(&mut self, lang: &Lang) {
        let mut index = Vec::with_capacity(self.word_count as usize);
        let mut offset = 0u32;
        let block_len = self.word_block_len as u32;
        // scan the word block by repeatedly reading the hash table's
        // bucket chains would miss words reachable only via collision
        // chains already covered; walking the flat block by (header,
        // word) pairs in file order finds every word exactly once.
        while offset < block_len {
            let word_off = offset + 16;
            let h = read_header(self.word_block(), word_off);
            let word = &self.word_block()[word_off as usize..word_off as usize + h.word_size as usize];
            index.push(SoundslikeEntry {
                soundslike: lang.to_soundslike(word),
                offset: word_off,
            });
            offset = word_off + h.word_size;
        }
        index.sort_by(|a, b| a.soundslike.cmp(&b.soundslike));

        let mut jump1 = [(0u32, 0u32); 257];
        let mut i = 0usize;
        for b in 0..=255u16 {
            let start = i;
            while i < index.len() && index[i].soundslike.first().copied() == Some(b as u8) {
                i += 1;
            }
            jump1[b as usize] = (start as u32, i as u32);
        }
        jump1[256] = (i as u32, index.len() as u32); // empty soundslike bucket

        self.soundslike_index = index;
        self.jump1 = jump1;
    }

    /// Every word sharing `word`'s soundslike key, used by the
    /// suggester's phonetic scan.
    pub fn soundslike_lookup(&self, soundslike: &[u8]) -> Vec<&[u8]> {
        let first = soundslike.first().copied().map(|b| b as usize).unwrap_or(256);
        let (mut start, end) = self.jump1[first];
        let mut out = Vec::new();
        while start < end {
            let e = &self.soundslike_index[start as usize];
            if e.soundslike == soundslike {
                out.push(self.word_at(e.offset));
            } else if e.soundslike.as_slice() > soundslike {
                break;
            }
            start += 1;
        }
        out
    }

    /// All words whose soundslike key starts with `prefix`, bounded by
    /// the one- or two-byte jump table range.
    pub fn soundslike_elements(&self, prefix: &[u8]) -> Vec<&[u8]> {
        if prefix.is_empty() {
            return self.soundslike_index.iter().map(|e| self.word_at(e.offset)).collect();
        }
        let first = prefix[0] as usize;
        let (start, end) = self.jump1[first];
        let mut out = Vec::new();
        for i in start..end {
            let e = &self.soundslike_index[i as usize];
            if e.soundslike.starts_with(prefix) {
                out.push(self.word_at(e.offset));
            }
        }
        out
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }
}

impl Rod {
    /// Iterates every stored word, offset by offset, for the scans
    /// `lookup`'s fallback and `clean_lookup` both need: neither can
    /// trust the raw-byte hash bucket once the comparison tolerates a
    /// case fold, an accent fold, or a begin/end special-byte mismatch,
    /// any of which can put the match in a different bucket than the
    /// query's own raw bytes hash to.
    fn scan_words(&self) -> impl Iterator<Item = &[u8]> {
        let block = self.word_block();
        let block_len = self.word_block_len as u32;
        let mut off = 0u32;
        std::iter::from_fn(move || {
            if off >= block_len {
                return None;
            }
            let word_off = off + 16;
            let h = read_header(block, word_off);
            let candidate = &block[word_off as usize..word_off as usize + h.word_size as usize];
            off = word_off + h.word_size;
            Some(candidate)
        })
    }
}

impl Dict for Rod {
    fn lookup(&self, word: &[u8], compare: &SensitiveCompare, lang: &Lang, _flag: Option<u8>) -> Option<WordEntry> {
        let bucket = self.hash_bucket(word);
        let mut offset = self.hash_slot(bucket);
        while offset != EMPTY {
            let candidate = self.word_at(offset);
            if compare.eq(lang, candidate, word) {
                return Some(WordEntry::new(candidate.to_vec()));
            }
            offset = read_header(self.word_block(), offset).next_offset;
        }
        if !compare.case_insensitive && matches!(compare.position, crate::dict::ComparePosition::Plain) {
            return None;
        }
        self.scan_words()
            .find(|candidate| compare.eq(lang, candidate, word))
            .map(|candidate| WordEntry::new(candidate.to_vec()))
    }

    fn clean_lookup(&self, word: &[u8], lang: &Lang) -> Option<WordEntry> {
        let clean_word = lang.to_clean(word);
        self.scan_words()
            .find(|candidate| lang.to_clean(candidate) == clean_word)
            .map(|candidate| WordEntry::new(candidate.to_vec()))
    }

    fn len(&self) -> usize {
        self.word_count as usize
    }
}

impl SuggestSource for Rod {
    fn contains(&self, word: &[u8]) -> bool {
        let bucket = self.hash_bucket(word);
        let mut offset = self.hash_slot(bucket);
        while offset != EMPTY {
            if self.word_at(offset) == word {
                return true;
            }
            offset = read_header(self.word_block(), offset).next_offset;
        }
        false
    }

    fn soundslike_exact(&self, soundslike: &[u8]) -> Vec<Vec<u8>> {
        self.soundslike_lookup(soundslike).into_iter().map(|w| w.to_vec()).collect()
    }

    fn soundslike_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        self.soundslike_elements(prefix).into_iter().map(|w| w.to_vec()).collect()
    }

    fn sample(&self, limit: usize) -> Vec<Vec<u8>> {
        self.soundslike_index.iter().take(limit).map(|e| self.word_at(e.offset).to_vec()).collect()
    }
}

/// FNV-1a, used for both the hash table bucket and as a cheap stand-in
/// for the original's string hash; no specific algorithm is mandated,
/// only that it distribute offsets evenly across buckets.
fn fnv1a(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0x811c_9dc5;
    for &b in bytes {
        h ^= b as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<WordEntry> {
        list.iter().map(|w| WordEntry::new(w.as_bytes().to_vec())).collect()
    }

    #[test]
    fn next_prime_examples() {
        assert_eq!(next_prime(1), 2);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(17), 17);
    }

    #[test]
    fn build_then_lookup_round_trips() {
        let lang = Lang::english();
        let rod = Rod::build(&words(&["cat", "dog", "bird"]), &lang);
        let compare = SensitiveCompare::plain(false);
        assert!(rod.lookup(b"cat", &compare, &lang, None).is_some());
        assert!(rod.lookup(b"zzz", &compare, &lang, None).is_none());
        assert_eq!(rod.word_count(), 3);
    }

    #[test]
    fn save_and_load_through_bytes_preserves_lookup() {
        let lang = Lang::english();
        let rod = Rod::build(&words(&["cat", "dog", "bird", "catalog"]), &lang);
        let mut buf = Vec::new();
        rod.write_to(&mut buf).unwrap();
        let loaded = Rod::load_bytes(&buf[..], &lang).unwrap();
        let compare = SensitiveCompare::plain(false);
        assert!(loaded.lookup(b"catalog", &compare, &lang, None).is_some());
        assert_eq!(loaded.word_count(), 4);
    }

    #[test]
    fn soundslike_lookup_groups_homophone_like_spellings() {
        let lang = Lang::english();
        let rod = Rod::build(&words(&["knight", "nite"]), &lang);
        let sl = lang.to_soundslike(b"knight");
        let hits = rod.soundslike_lookup(&sl);
        assert!(hits.iter().any(|w| *w == b"knight"));
    }

    #[test]
    fn soundslike_elements_respects_prefix() {
        let lang = Lang::english();
        let rod = Rod::build(&words(&["cat", "cot", "dog"]), &lang);
        let hits = rod.soundslike_elements(b"K");
        assert!(hits.iter().all(|w| lang.to_soundslike(w).starts_with(b"K")));
    }

    #[test]
    fn case_insensitive_compare_finds_a_differently_cased_entry() {
        let lang = Lang::english();
        let rod = Rod::build(&words(&["Dog"]), &lang);
        assert!(rod.lookup(b"dog", &SensitiveCompare::plain(false), &lang, None).is_none());
        assert!(rod.lookup(b"dog", &SensitiveCompare::plain(true), &lang, None).is_some());
    }

    #[test]
    fn clean_lookup_folds_accents_that_plain_lookup_rejects() {
        let lang = Lang::english();
        let rod = Rod::build(&[WordEntry::new(b"caf\xE9".to_vec())], &lang);
        let compare = SensitiveCompare::plain(false);
        assert!(rod.lookup(b"cafe", &compare, &lang, None).is_none());
        assert!(rod.clean_lookup(b"cafe", &lang).is_some());
    }

    #[test]
    fn begin_only_compare_tolerates_a_leading_special_byte_mismatch() {
        use crate::dict::ComparePosition;
        let lang = Lang::english();
        let rod = Rod::build(&words(&["brien"]), &lang);
        let compare = SensitiveCompare {
            position: ComparePosition::BeginOnly,
            case_insensitive: false,
        };
        assert!(rod.lookup(b"'brien", &compare, &lang, None).is_some());
    }
}

//! In-memory writable dictionaries: the personal word list, the
//! session-only word list, and the replacement ("ignore and always
//! suggest this instead") dictionary.
//!
//! A plain `HashMap`-backed word set, exposed as a `Dict` implementor
//! with add/remove/synchronize and a plain-text on-disk format modeled
//! on Aspell's own `personal_ws-1.1` header (see
//! `examples/original_source/prog/aspell.cpp` for the convention this
//! mirrors).

use hashbrown::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write as _};
use std::path::{Path, PathBuf};

use crate::dict::{ComparePosition, Dict, SensitiveCompare, WordEntry};
use crate::error::{ErrorKind, SpellError};
use crate::lang::Lang;

/// A personal or session word list: words added by the user that are
/// always treated as correctly spelled.
#[derive(Default)]
pub struct WritableDict {
    words: HashMap<Vec<u8>, WordEntry>,
    path: Option<PathBuf>,
    lang_code: String,
    dirty: bool,
}

impl WritableDict {
    pub fn new(lang_code: &str) -> WritableDict {
        WritableDict {
            words: HashMap::new(),
            path: None,
            lang_code: lang_code.to_string(),
            dirty: false,
        }
    }

    /// Loads a `personal_ws-1.1` file: a header line
    /// `personal_ws-1.1 <lang> <count> <encoding>` followed by one word
    /// per line, optionally `word/flags`.
    pub fn load(path: &Path) -> Result<WritableDict, SpellError> {
        let file = File::open(path).map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let mut lines = BufReader::new(file).lines();
        let header = lines
            .next()
            .ok_or_else(|| SpellError::simple(ErrorKind::BadFileFormat, "empty personal word list"))?
            .map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let mut parts = header.split_whitespace();
        let magic = parts.next().unwrap_or_default();
        if magic != "personal_ws-1.1" {
            return Err(SpellError::simple(
                ErrorKind::BadFileFormat,
                "missing personal_ws-1.1 header",
            )
            .with_file(&path.display().to_string(), 1));
        }
        let lang_code = parts.next().unwrap_or("en").to_string();
        let mut dict = WritableDict::new(&lang_code);
        for line in lines {
            let line = line.map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (word, flags) = match line.split_once('/') {
                Some((w, f)) => (w, f.as_bytes().to_vec()),
                None => (line, Vec::new()),
            };
            dict.words
                .insert(word.as_bytes().to_vec(), WordEntry::with_flags(word.as_bytes().to_vec(), flags));
        }
        dict.path = Some(path.to_path_buf());
        Ok(dict)
    }

    pub fn add(&mut self, word: &[u8]) {
        self.words
            .entry(word.to_vec())
            .or_insert_with(|| WordEntry::new(word.to_vec()));
        self.dirty = true;
    }

    pub fn remove(&mut self, word: &[u8]) -> bool {
        let removed = self.words.remove(word).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn clear(&mut self) {
        self.dirty |= !self.words.is_empty();
        self.words.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the current contents back to the file this dict was
    /// `load`ed from, if any.
    pub fn synchronize(&mut self) -> Result<(), SpellError> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => return Ok(()),
        };
        self.save_as(&path)?;
        self.dirty = false;
        Ok(())
    }

    pub fn save_as(&self, path: &Path) -> Result<(), SpellError> {
        let mut file = File::create(path).map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        writeln!(file, "personal_ws-1.1 {} {} UTF-8", self.lang_code, self.words.len())
            .map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        let mut entries: Vec<&WordEntry> = self.words.values().collect();
        entries.sort_by(|a, b| a.word.cmp(&b.word));
        for e in entries {
            if e.flags.is_empty() {
                writeln!(file, "{}", String::from_utf8_lossy(&e.word))
            } else {
                writeln!(
                    file,
                    "{}/{}",
                    String::from_utf8_lossy(&e.word),
                    String::from_utf8_lossy(&e.flags)
                )
            }
            .map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        }
        Ok(())
    }
}

impl Dict for WritableDict {
    fn lookup(&self, word: &[u8], compare: &SensitiveCompare, lang: &Lang, _flag: Option<u8>) -> Option<WordEntry> {
        if let Some(e) = self.words.get(word) {
            return Some(e.clone());
        }
        if compare.case_insensitive || !matches!(compare.position, ComparePosition::Plain) {
            return self.words.values().find(|e| compare.eq(lang, &e.word, word)).cloned();
        }
        None
    }

    fn clean_lookup(&self, word: &[u8], lang: &Lang) -> Option<WordEntry> {
        let clean_word = lang.to_clean(word);
        self.words.values().find(|e| lang.to_clean(&e.word) == clean_word).cloned()
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}

/// The replacement dictionary: misspelling -> preferred correction(s),
/// consulted before the general suggester.
#[derive(Default)]
pub struct ReplacementDict {
    entries: HashMap<Vec<u8>, Vec<Vec<u8>>>,
    path: Option<PathBuf>,
    lang_code: String,
    dirty: bool,
}

impl ReplacementDict {
    pub fn new(lang_code: &str) -> ReplacementDict {
        ReplacementDict {
            entries: HashMap::new(),
            path: None,
            lang_code: lang_code.to_string(),
            dirty: false,
        }
    }

    /// Loads a tab-separated `misspelling<TAB>correction` file, one pair
    /// per line, skipping its `personal_repl-1.1` header.
    pub fn load(path: &Path) -> Result<ReplacementDict, SpellError> {
        let file = File::open(path).map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let mut lines = BufReader::new(file).lines();
        let header = lines
            .next()
            .ok_or_else(|| SpellError::simple(ErrorKind::BadFileFormat, "empty replacement list"))?
            .map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
        let mut parts = header.split_whitespace();
        let magic = parts.next().unwrap_or_default();
        if magic != "personal_repl-1.1" {
            return Err(SpellError::simple(
                ErrorKind::BadFileFormat,
                "missing personal_repl-1.1 header",
            )
            .with_file(&path.display().to_string(), 1));
        }
        let lang_code = parts.next().unwrap_or("en").to_string();
        let mut dict = ReplacementDict::new(&lang_code);
        for line in lines {
            let line = line.map_err(|e| SpellError::simple(ErrorKind::CantReadFile, &e.to_string()))?;
            if let Some((from, to)) = line.split_once('\t') {
                dict.add(from.trim().as_bytes(), to.trim().as_bytes());
            }
        }
        dict.path = Some(path.to_path_buf());
        dict.dirty = false;
        Ok(dict)
    }

    pub fn add(&mut self, misspelling: &[u8], correction: &[u8]) {
        let list = self.entries.entry(misspelling.to_vec()).or_default();
        if !list.iter().any(|c| c == correction) {
            list.push(correction.to_vec());
            self.dirty = true;
        }
    }

    pub fn corrections(&self, misspelling: &[u8]) -> &[Vec<u8>] {
        self.entries.get(misspelling).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn synchronize(&mut self) -> Result<(), SpellError> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => return Ok(()),
        };
        let mut file = File::create(&path).map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        writeln!(file, "personal_repl-1.1 {} {} UTF-8", self.lang_code, self.entries.len())
            .map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
        let mut keys: Vec<&Vec<u8>> = self.entries.keys().collect();
        keys.sort();
        for k in keys {
            for to in &self.entries[k] {
                writeln!(file, "{}\t{}", String::from_utf8_lossy(k), String::from_utf8_lossy(to))
                    .map_err(|e| SpellError::simple(ErrorKind::CantWriteFile, &e.to_string()))?;
            }
        }
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Dict for ReplacementDict {
    fn lookup(&self, word: &[u8], compare: &SensitiveCompare, lang: &Lang, _flag: Option<u8>) -> Option<WordEntry> {
        if self.entries.contains_key(word) {
            return Some(WordEntry::new(word.to_vec()));
        }
        if compare.case_insensitive || !matches!(compare.position, ComparePosition::Plain) {
            if let Some(key) = self.entries.keys().find(|k| compare.eq(lang, k, word)) {
                return Some(WordEntry::new(key.clone()));
            }
        }
        None
    }

    fn clean_lookup(&self, word: &[u8], lang: &Lang) -> Option<WordEntry> {
        let clean_word = lang.to_clean(word);
        self.entries
            .keys()
            .find(|k| lang.to_clean(k) == clean_word)
            .map(|k| WordEntry::new(k.clone()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Exposed for error-path plumbing in std callers that need a plain
/// `io::Result` mapping, without pulling `io::Error` into the core's
/// public surface elsewhere.
pub fn map_io_err(kind: ErrorKind, e: io::Error) -> SpellError {
    SpellError::simple(kind, &e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup_personal_word() {
        let lang = Lang::english();
        let mut d = WritableDict::new("en");
        d.add(b"gonhanh");
        assert!(d.lookup(b"gonhanh", &SensitiveCompare::plain(false), &lang, None).is_some());
        assert!(d.lookup(b"nope", &SensitiveCompare::plain(false), &lang, None).is_none());
    }

    #[test]
    fn remove_then_lookup_misses() {
        let lang = Lang::english();
        let mut d = WritableDict::new("en");
        d.add(b"foo");
        assert!(d.remove(b"foo"));
        assert!(d.lookup(b"foo", &SensitiveCompare::plain(false), &lang, None).is_none());
    }

    #[test]
    fn replacement_dict_dedups_identical_corrections() {
        let mut r = ReplacementDict::new("en");
        r.add(b"teh", b"the");
        r.add(b"teh", b"the");
        assert_eq!(r.corrections(b"teh").len(), 1);
    }

    #[test]
    fn writable_dict_case_insensitive_lookup_falls_back_across_case() {
        let lang = Lang::english();
        let mut d = WritableDict::new("en");
        d.add(b"Foo");
        assert!(d.lookup(b"foo", &SensitiveCompare::plain(false), &lang, None).is_none());
        assert!(d.lookup(b"foo", &SensitiveCompare::plain(true), &lang, None).is_some());
    }

    #[test]
    fn replacement_dict_case_insensitive_lookup_falls_back_across_case() {
        let lang = Lang::english();
        let mut r = ReplacementDict::new("en");
        r.add(b"Teh", b"the");
        assert!(r.lookup(b"teh", &SensitiveCompare::plain(false), &lang, None).is_none());
        assert!(r.lookup(b"teh", &SensitiveCompare::plain(true), &lang, None).is_some());
    }

    #[test]
    fn writable_dict_clean_lookup_folds_accents() {
        let lang = Lang::english();
        let mut d = WritableDict::new("en");
        d.add(b"caf\xE9");
        assert!(d.lookup(b"cafe", &SensitiveCompare::plain(false), &lang, None).is_none());
        assert!(d.clean_lookup(b"cafe", &lang).is_some());
    }
}

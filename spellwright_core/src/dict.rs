//! Shared dictionary types: `WordEntry`, the `Dict` abstraction, compare
//! policies, and `CheckInfo`, the scratch result node `affix_check`
//! builds and `SpellerImpl` consumes.
//!
//! `WordEntry` is addressed by value here (the ROD addresses it by
//! byte offset instead, see `rod.rs`), and dictionaries are unified
//! behind one `Dict` trait rather than a single in-memory `HashMap`
//! per dictionary kind.

/// One dictionary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: Vec<u8>,
    /// affix flags allowed on this root, if any.
    pub flags: Vec<u8>,
    pub category: Option<String>,
}

impl WordEntry {
    pub fn new(word: Vec<u8>) -> WordEntry {
        WordEntry {
            word,
            flags: Vec::new(),
            category: None,
        }
    }

    pub fn with_flags(word: Vec<u8>, flags: Vec<u8>) -> WordEntry {
        WordEntry {
            word,
            flags,
            category: None,
        }
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags.contains(&flag)
    }
}

/// The four `SensitiveCompare` flavors: whether begin/end "special"
/// bytes are tolerated, and whether comparison is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparePosition {
    Plain,
    BeginOnly,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy)]
pub struct SensitiveCompare {
    pub position: ComparePosition,
    pub case_insensitive: bool,
}

impl SensitiveCompare {
    pub fn plain(case_insensitive: bool) -> SensitiveCompare {
        SensitiveCompare {
            position: ComparePosition::Plain,
            case_insensitive,
        }
    }

    /// Compares two already-encoded byte strings under this policy. For
    /// `Plain` this is exact byte equality (or case-folded, via `lower`);
    /// positional flavors additionally tolerate a mismatch of the
    /// specific edge's "special" bytes (apostrophes/hyphens), modeled
    /// here as also accepting equality once such bytes are stripped from
    /// the relevant edge of both strings. `BeginOnly` is used for a root
    /// recovered by stripping a suffix (its leading edge is the word's
    /// own leading edge); `End` for a root recovered by stripping a
    /// prefix; `Middle` for a root recovered by stripping both, which
    /// tolerates a mismatch at either edge since neither sits at the
    /// word's own boundary anymore.
    pub fn eq(&self, lang: &crate::lang::Lang, a: &[u8], b: &[u8]) -> bool {
        let (a, b) = match self.position {
            ComparePosition::Plain => (a.to_vec(), b.to_vec()),
            ComparePosition::BeginOnly => (strip_begin(lang, a), strip_begin(lang, b)),
            ComparePosition::End => (strip_end(lang, a), strip_end(lang, b)),
            ComparePosition::Middle => (strip_end(lang, &strip_begin(lang, a)), strip_end(lang, &strip_begin(lang, b))),
        };
        if self.case_insensitive {
            lang.to_lower(&a) == lang.to_lower(&b)
        } else {
            a == b
        }
    }
}

fn strip_begin(lang: &crate::lang::Lang, w: &[u8]) -> Vec<u8> {
    let mut i = 0;
    while i < w.len() && lang.special(w[i]).begin {
        i += 1;
    }
    w[i..].to_vec()
}

fn strip_end(lang: &crate::lang::Lang, w: &[u8]) -> Vec<u8> {
    let mut end = w.len();
    while end > 0 && lang.special(w[end - 1]).end {
        end -= 1;
    }
    w[..end].to_vec()
}

/// Result node of a successful lookup/affix-check.
#[derive(Debug, Clone)]
pub struct CheckInfo {
    pub root: Vec<u8>,
    pub prefix_strip_len: u8,
    pub prefix_add_len: u8,
    pub suffix_strip_len: u8,
    pub suffix_add_len: u8,
    /// true when this node continues into a further compound component.
    pub compound: bool,
    pub guess: bool,
}

impl CheckInfo {
    pub fn simple(root: Vec<u8>) -> CheckInfo {
        CheckInfo {
            root,
            prefix_strip_len: 0,
            prefix_add_len: 0,
            suffix_strip_len: 0,
            suffix_add_len: 0,
            compound: false,
            guess: false,
        }
    }
}

/// Abstract set of `WordEntry`s. ROD, personal, session, and
/// replacement dictionaries all implement this.
///
/// Entries are returned by value rather than by reference: the ROD's
/// words live behind a memory map and are materialized into owned
/// `WordEntry`s on the way out, so a borrowed return would either tie
/// every lookup to a single mutable scratch slot or require leaking —
/// cloning a short byte string per hit is cheap enough for a checker
/// that already does far more work per word than this.
pub trait Dict {
    /// Looks up `word` under `compare`, optionally requiring `flag`
    /// (used by affix-check in `Word` mode). `compare.position` and
    /// `compare.case_insensitive` both feed `SensitiveCompare::eq`; a
    /// miss on the exact bytes falls back to a full scan comparing every
    /// stored entry under that same policy, since a position-tolerant or
    /// case-folded match may hash into a different bucket than the one
    /// an exact-byte query would probe.
    fn lookup(&self, word: &[u8], compare: &SensitiveCompare, lang: &crate::lang::Lang, flag: Option<u8>) -> Option<WordEntry>;

    /// Always case-/accent-insensitive, regardless of `compare`: folds
    /// both sides through `Lang::to_clean` before comparing. Used where
    /// a caller wants the clean-form match (`café` found for a `cafe`
    /// query) independent of whatever `ignore-case` is currently set to.
    fn clean_lookup(&self, word: &[u8], lang: &crate::lang::Lang) -> Option<WordEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Heuristic size used to order same-class dicts by descending size:
    /// bigger dicts first maximizes early hits.
    fn size_hint(&self) -> usize {
        self.len()
    }
}

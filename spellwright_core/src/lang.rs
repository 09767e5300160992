//! Per-language static tables: case transforms, clean (accent-stripped)
//! form, soundslike transform, word-boundary "special" characters.
//!
//! A four-way case classification plus a normalize/restore pair
//! (`CasePattern`, `case_pattern`/`fix_case`) built on a byte-table
//! model: every table covers byte values 0-255, so a `Lang` can be
//! built once and shared read-only across dictionaries.

use hashbrown::HashMap;

/// `AllLower`, `FirstUpper`, `AllUpper`, or `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    AllLower,
    FirstUpper,
    AllUpper,
    Other,
}

/// Whether a byte may legally begin, occur inside, or end a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Special {
    pub begin: bool,
    pub middle: bool,
    pub end: bool,
}

/// Per-language static tables and helpers.
pub struct Lang {
    pub code: String,
    to_lower: [u8; 256],
    to_upper: [u8; 256],
    to_title: [u8; 256],
    /// true if the byte is already in "clean" (accent-stripped) form.
    clean_of: [u8; 256],
    special: [Special; 256],
    /// optional typo-fix replacement table: pattern -> replacement, with a
    /// bias toward likely-typo substitutions, consulted early in the
    /// suggestion pipeline.
    pub repl_table: Vec<(String, String)>,
    /// optional typo keyboard layout: byte -> row/col, used by typo edit
    /// distance when typo-aware re-scoring is enabled.
    pub keyboard: Option<Keyboard>,
    /// `.aff` `TRY` alphabet (most-frequent letters first), used by the
    /// suggester's one-edit neighborhood in place of the built-in guess
    /// when a real dictionary's affix file supplies one.
    pub try_chars: Vec<u8>,
}

/// A simple keyboard layout: each key maps to (row, col); adjacency is
/// derived from Chebyshev distance between two keys' coordinates.
pub struct Keyboard {
    pub position: HashMap<u8, (i8, i8)>,
}

impl Keyboard {
    /// The default "Qwerty" row layout.
    pub fn qwerty() -> Keyboard {
        const ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
        let mut position = HashMap::new();
        for (row, chars) in ROWS.iter().enumerate() {
            for (col, c) in chars.bytes().enumerate() {
                position.insert(c, (row as i8, col as i8));
            }
        }
        Keyboard { position }
    }

    pub fn distance(&self, a: u8, b: u8) -> Option<i32> {
        let la = a.to_ascii_lowercase();
        let lb = b.to_ascii_lowercase();
        let (ra, ca) = *self.position.get(&la)?;
        let (rb, cb) = *self.position.get(&lb)?;
        Some(((ra - rb).abs() as i32).max((ca - cb).abs() as i32))
    }
}

/// Minimal ASCII-accent folding table used by `to_clean` for the built-in
/// English-like language. A real deployment supplies a language-specific
/// table; this keeps the default usable without external data files.
const LATIN1_FOLD: &[(u8, u8)] = &[
    (0xC0, b'A'), (0xC1, b'A'), (0xC2, b'A'), (0xC3, b'A'), (0xC4, b'A'), (0xC5, b'A'),
    (0xC7, b'C'),
    (0xC8, b'E'), (0xC9, b'E'), (0xCA, b'E'), (0xCB, b'E'),
    (0xCC, b'I'), (0xCD, b'I'), (0xCE, b'I'), (0xCF, b'I'),
    (0xD1, b'N'),
    (0xD2, b'O'), (0xD3, b'O'), (0xD4, b'O'), (0xD5, b'O'), (0xD6, b'O'), (0xD8, b'O'),
    (0xD9, b'U'), (0xDA, b'U'), (0xDB, b'U'), (0xDC, b'U'),
    (0xDD, b'Y'),
    (0xE0, b'a'), (0xE1, b'a'), (0xE2, b'a'), (0xE3, b'a'), (0xE4, b'a'), (0xE5, b'a'),
    (0xE7, b'c'),
    (0xE8, b'e'), (0xE9, b'e'), (0xEA, b'e'), (0xEB, b'e'),
    (0xEC, b'i'), (0xED, b'i'), (0xEE, b'i'), (0xEF, b'i'),
    (0xF1, b'n'),
    (0xF2, b'o'), (0xF3, b'o'), (0xF4, b'o'), (0xF5, b'o'), (0xF6, b'o'), (0xF8, b'o'),
    (0xF9, b'u'), (0xFA, b'u'), (0xFB, b'u'), (0xFC, b'u'),
    (0xFD, b'y'), (0xFF, b'y'),
];

impl Lang {
    /// Builds the default English-like `Lang`: ASCII case folding,
    /// Latin-1 accent stripping, apostrophe/hyphen as word-middle
    /// characters, and the built-in metaphone-lite soundslike.
    pub fn english() -> Lang {
        let mut to_lower = [0u8; 256];
        let mut to_upper = [0u8; 256];
        let mut to_title = [0u8; 256];
        let mut clean_of = [0u8; 256];
        for b in 0..=255u16 {
            let b = b as u8;
            to_lower[b as usize] = b.to_ascii_lowercase();
            to_upper[b as usize] = b.to_ascii_uppercase();
            to_title[b as usize] = b.to_ascii_uppercase();
            clean_of[b as usize] = b;
        }
        for &(accented, plain) in LATIN1_FOLD {
            clean_of[accented as usize] = plain;
        }
        let mut special = [Special::default(); 256];
        // an apostrophe may open a contraction ("'tis"), sit inside one
        // ("don't"), or close a possessive ("dogs'"); a hyphen is
        // treated as word-interior only ("well-known").
        special[b'\'' as usize] = Special { begin: true, middle: true, end: true };
        special[b'-' as usize] = Special { begin: false, middle: true, end: false };
        Lang {
            code: "en".to_string(),
            to_lower,
            to_upper,
            to_title,
            clean_of,
            special,
            repl_table: Vec::new(),
            keyboard: Some(Keyboard::qwerty()),
            try_chars: Vec::new(),
        }
    }

    pub fn to_lower_byte(&self, b: u8) -> u8 {
        self.to_lower[b as usize]
    }

    pub fn to_upper_byte(&self, b: u8) -> u8 {
        self.to_upper[b as usize]
    }

    /// Byte-wise lowercase. `to_lower(to_lower(w)) == to_lower(w)`.
    pub fn to_lower(&self, w: &[u8]) -> Vec<u8> {
        w.iter().map(|&b| self.to_lower[b as usize]).collect()
    }

    pub fn to_upper(&self, w: &[u8]) -> Vec<u8> {
        w.iter().map(|&b| self.to_upper[b as usize]).collect()
    }

    /// Strips accents/diacritics to the lookup/soundslike "clean" form.
    /// `to_clean(to_clean(w)) == to_clean(w)` since the table is already
    /// a fixed point on its own outputs (every accented byte maps to a
    /// plain ASCII byte that maps to itself).
    pub fn to_clean(&self, w: &[u8]) -> Vec<u8> {
        w.iter()
            .map(|&b| self.to_lower[self.clean_of[b as usize] as usize])
            .collect()
    }

    pub fn is_clean(&self, w: &[u8]) -> bool {
        w.iter().all(|&b| self.clean_of[b as usize] == b && self.to_lower[b as usize] == b)
    }

    pub fn special(&self, c: u8) -> Special {
        self.special[c as usize]
    }

    /// Classifies `w`'s capitalization pattern.
    pub fn case_pattern(&self, w: &[u8]) -> CasePattern {
        if w.is_empty() {
            return CasePattern::AllLower;
        }
        let is_upper = |b: u8| self.to_lower[b as usize] != b;
        let is_lower = |b: u8| self.to_upper[b as usize] != b;
        let mut any_lower = false;
        let mut any_upper = false;
        let mut first_upper = false;
        for (i, &b) in w.iter().enumerate() {
            if is_upper(b) {
                any_upper = true;
                if i == 0 {
                    first_upper = true;
                }
            } else if is_lower(b) {
                any_lower = true;
            }
        }
        if !any_upper {
            CasePattern::AllLower
        } else if !any_lower {
            CasePattern::AllUpper
        } else if first_upper && w[1..].iter().all(|&b| !is_upper(b)) {
            CasePattern::FirstUpper
        } else {
            CasePattern::Other
        }
    }

    /// Restores `pattern` onto `candidate` (used when emitting
    /// suggestions/compound forms built from a clean/lowercase root).
    pub fn fix_case(&self, pattern: CasePattern, candidate: &[u8]) -> Vec<u8> {
        match pattern {
            CasePattern::AllLower | CasePattern::Other => candidate.to_vec(),
            CasePattern::AllUpper => self.to_upper(candidate),
            CasePattern::FirstUpper => {
                let mut out = candidate.to_vec();
                if let Some(first) = out.first_mut() {
                    *first = self.to_title[*first as usize];
                }
                out
            }
        }
    }

    fn in_word_or_special_middle(&self, c: u8) -> bool {
        c.is_ascii_alphabetic() || c >= 0x80 || self.special[c as usize].middle
    }

    /// Splits `buf` into `(first_word, rest)` on non-word bytes and,
    /// when `camel` is set, additionally at a byte boundary where an
    /// uppercase letter follows a lowercase one (camelCase boundary).
    pub fn split_word<'a>(&self, buf: &'a [u8], camel: bool) -> (&'a [u8], &'a [u8]) {
        let mut end = 0;
        while end < buf.len() && self.in_word_or_special_middle(buf[end]) {
            if camel
                && end > 0
                && self.to_lower[buf[end] as usize] != buf[end]
                && self.to_lower[buf[end - 1] as usize] == buf[end - 1]
                && buf[end - 1].is_ascii_alphabetic()
            {
                break;
            }
            end += 1;
        }
        if end == 0 && !buf.is_empty() {
            end = 1;
        }
        (&buf[..end], &buf[end..])
    }

    /// A deterministic, length-non-increasing phonetic transform
    /// (metaphone-lite). Used by the soundslike index.
    pub fn to_soundslike(&self, w: &[u8]) -> Vec<u8> {
        let clean = self.to_clean(w);
        let rules: Vec<(&str, &str)> = vec![
            ("PH", "F"), ("GH", "G"), ("CK", "K"), ("SH", "S"), ("TH", "T"),
            ("WH", "W"), ("QU", "K"), ("X", "K"), ("Z", "S"), ("C", "K"),
        ];
        let upper = self.to_upper(&clean);
        let mut folded = String::with_capacity(upper.len());
        let s = String::from_utf8_lossy(&upper);
        let bytes = s.as_bytes();
        let mut i = 0;
        'outer: while i < bytes.len() {
            for &(pat, rep) in &rules {
                if bytes[i..].starts_with(pat.as_bytes()) {
                    folded.push_str(rep);
                    i += pat.len();
                    continue 'outer;
                }
            }
            folded.push(bytes[i] as char);
            i += 1;
        }
        // drop vowels after the first letter, collapse doubled letters
        let mut out: Vec<u8> = Vec::with_capacity(folded.len());
        for (i, b) in folded.bytes().enumerate() {
            let is_vowel = matches!(b, b'A' | b'E' | b'I' | b'O' | b'U');
            if i > 0 && is_vowel {
                continue;
            }
            if out.last() == Some(&b) {
                continue;
            }
            out.push(b);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_idempotence() {
        let lang = Lang::english();
        let w = b"Caf\xE9".to_vec();
        assert_eq!(lang.to_lower(&lang.to_lower(&w)), lang.to_lower(&w));
        assert_eq!(lang.to_clean(&lang.to_clean(&w)), lang.to_clean(&w));
    }

    #[test]
    fn clean_strips_accents_and_lowercases() {
        let lang = Lang::english();
        assert_eq!(lang.to_clean(b"Caf\xE9"), b"cafe");
    }

    #[test]
    fn case_pattern_classification() {
        let lang = Lang::english();
        assert_eq!(lang.case_pattern(b"hello"), CasePattern::AllLower);
        assert_eq!(lang.case_pattern(b"Hello"), CasePattern::FirstUpper);
        assert_eq!(lang.case_pattern(b"HELLO"), CasePattern::AllUpper);
        assert_eq!(lang.case_pattern(b"HeLLo"), CasePattern::Other);
    }

    #[test]
    fn fix_case_restores_pattern() {
        let lang = Lang::english();
        assert_eq!(lang.fix_case(CasePattern::FirstUpper, b"the"), b"The");
        assert_eq!(lang.fix_case(CasePattern::AllUpper, b"the"), b"THE");
        assert_eq!(lang.fix_case(CasePattern::AllLower, b"the"), b"the");
    }

    #[test]
    fn soundslike_never_extends() {
        let lang = Lang::english();
        for w in ["night", "though", "physical", "xerox", "quick", "ax", "ox"] {
            let sl = lang.to_soundslike(w.as_bytes());
            assert!(sl.len() <= w.len(), "{w} -> {:?}", String::from_utf8_lossy(&sl));
        }
    }

    #[test]
    fn split_word_on_non_word_bytes() {
        let lang = Lang::english();
        let (w, rest) = lang.split_word(b"hello, world", false);
        assert_eq!(w, b"hello");
        assert_eq!(rest, b", world");
    }

    #[test]
    fn split_word_camel_case_boundary() {
        let lang = Lang::english();
        let (w, rest) = lang.split_word(b"camelCase", true);
        assert_eq!(w, b"camel");
        assert_eq!(rest, b"Case");
    }
}

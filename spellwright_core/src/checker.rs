//! Whole-word acceptance on top of a dictionary lookup: camelCase
//! splitting, run-together compound splitting, and a single level of
//! special-character splitting, tried in that order.
//!
//! Same "try the whole token, then fall back to splitting it" shape a
//! line-oriented checker typically uses, generalized from a single
//! in-memory lookup to an injected `is_word` closure so `Checker` stays
//! independent of how the caller assembles its dictionaries (ROD,
//! personal, session, affix-expanded).

use crate::lang::Lang;

#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    /// words shorter than this are accepted unconditionally (skip
    /// checking very short tokens).
    pub ignore_length: usize,
    pub camel_case: bool,
    pub run_together: bool,
    /// maximum number of components a run-together compound may split
    /// into.
    pub run_together_limit: usize,
    /// minimum length of each run-together component.
    pub run_together_min: usize,
    /// split on a special (non-word-char, e.g. hyphen) byte once, and
    /// check both halves, if nothing else accepts the token.
    pub special_split: bool,
}

impl Default for CheckOptions {
    fn default() -> CheckOptions {
        CheckOptions {
            ignore_length: 0,
            camel_case: false,
            run_together: false,
            run_together_limit: 8,
            run_together_min: 3,
            special_split: true,
        }
    }
}

pub struct Checker<'a> {
    lang: &'a Lang,
    options: CheckOptions,
}

impl<'a> Checker<'a> {
    pub fn new(lang: &'a Lang, options: CheckOptions) -> Checker<'a> {
        Checker { lang, options }
    }

    /// Decides whether `word` is acceptable, trying (in order): the
    /// ignore-length shortcut, the whole word as-is, a camelCase split,
    /// a run-together compound split, and finally a single
    /// special-character split.
    pub fn check_word<F>(&self, word: &[u8], mut is_word: F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        if word.len() < self.options.ignore_length {
            return true;
        }
        if is_word(word) {
            return true;
        }
        if self.options.camel_case && self.check_camel(word, &mut is_word) {
            return true;
        }
        if self.options.run_together && self.check_runtogether(word, &mut is_word) {
            return true;
        }
        if self.options.special_split && self.check_special_split(word, &mut is_word) {
            return true;
        }
        false
    }

    /// Splits `word` at every camelCase boundary and requires each part
    /// to check out on its own.
    fn check_camel<F>(&self, word: &[u8], is_word: &mut F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        let mut rest = word;
        let mut any_split = false;
        while !rest.is_empty() {
            let (part, tail) = self.lang.split_word(rest, true);
            if part.is_empty() {
                return false;
            }
            if !is_word(part) {
                return false;
            }
            if tail.len() < rest.len() {
                any_split = true;
            }
            rest = tail;
        }
        any_split
    }

    /// Tries every way of splitting `word` into 2..=run_together_limit
    /// components of at least `run_together_min` bytes each, all
    /// individually valid words.
    /// Retries each non-first component with its first byte lowercased,
    /// so `"NewYork"` checks as `"New"` + `"york"`.
    fn check_runtogether<F>(&self, word: &[u8], is_word: &mut F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.check_single(word, self.options.run_together_limit, is_word)
    }

    fn check_single<F>(&self, word: &[u8], budget: usize, is_word: &mut F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        if budget == 0 {
            return false;
        }
        let min = self.options.run_together_min;
        if word.len() < min {
            return false;
        }
        if is_word(word) {
            return true;
        }
        if budget == 1 {
            return false;
        }
        let max_first = word.len().saturating_sub(min);
        for split in min..=max_first {
            let (first, rest) = word.split_at(split);
            if !is_word(first) {
                let lowered = self.title_retry(first);
                if lowered.as_deref().map(|w| is_word(w)) != Some(true) {
                    continue;
                }
            }
            if self.check_single(rest, budget - 1, is_word) {
                return true;
            }
        }
        false
    }

    fn title_retry(&self, word: &[u8]) -> Option<Vec<u8>> {
        let first = *word.first()?;
        if self.lang.to_lower_byte(first) == first {
            return None;
        }
        let mut lowered = word.to_vec();
        lowered[0] = self.lang.to_lower_byte(first);
        Some(lowered)
    }

    /// Splits once on the first byte that is neither a word character
    /// nor an in-word "special" byte, and checks both halves. One level
    /// only: the halves are not recursively split again.
    fn check_special_split<F>(&self, word: &[u8], is_word: &mut F) -> bool
    where
        F: FnMut(&[u8]) -> bool,
    {
        let split_at = word.iter().position(|&b| {
            !(b.is_ascii_alphabetic() || b >= 0x80 || self.lang.special(b).middle)
        });
        match split_at {
            Some(ix) if ix > 0 && ix + 1 < word.len() => {
                let (left, rest) = word.split_at(ix);
                let right = &rest[1..];
                !left.is_empty() && !right.is_empty() && is_word(left) && is_word(right)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(words: &[&'static str]) -> impl FnMut(&[u8]) -> bool + '_ {
        move |w: &[u8]| words.iter().any(|d| d.as_bytes() == w)
    }

    #[test]
    fn short_words_pass_via_ignore_length() {
        let lang = Lang::english();
        let c = Checker::new(&lang, CheckOptions { ignore_length: 3, ..Default::default() });
        assert!(c.check_word(b"hi", dict(&[])));
    }

    #[test]
    fn camel_case_components_both_checked() {
        let lang = Lang::english();
        let opts = CheckOptions { camel_case: true, ..Default::default() };
        let c = Checker::new(&lang, opts);
        assert!(c.check_word(b"camelCase", dict(&["camel", "case"])));
        assert!(!c.check_word(b"camelCase", dict(&["camel"])));
    }

    #[test]
    fn run_together_compound_splits_two_words() {
        let lang = Lang::english();
        let opts = CheckOptions { run_together: true, ..Default::default() };
        let c = Checker::new(&lang, opts);
        assert!(c.check_word(b"cupcake", dict(&["cup", "cake"])));
    }

    #[test]
    fn run_together_respects_component_minimum() {
        let lang = Lang::english();
        let opts = CheckOptions { run_together: true, run_together_min: 4, ..Default::default() };
        let c = Checker::new(&lang, opts);
        // "cup" is below the minimum length, so this split is not tried.
        assert!(!c.check_word(b"cupcake", dict(&["cup", "cake"])));
    }

    #[test]
    fn special_char_split_checks_both_sides_once() {
        let lang = Lang::english();
        let c = Checker::new(&lang, CheckOptions::default());
        assert!(c.check_word(b"well+being", dict(&["well", "being"])));
    }
}

//! `SpellerImpl`: the facade tying a language's tables, its affix rules,
//! its attached dictionaries (main ROD, personal, session, replacement),
//! the checker, and the suggester into the one object library callers
//! hold.
//!
//! `Lang` supplies the static per-language tables; `SpellerImpl` is the
//! stateful object built from it plus whichever dictionaries are
//! attached. The attached-dict book-keeping (descending-size ordering so
//! the likeliest hit is probed first) matters once more than one
//! dictionary of the same kind can be attached at once.

use crate::affix::AffixManager;
use crate::checker::Checker;
use crate::config::SpellerParms;
use crate::dict::{ComparePosition, Dict, SensitiveCompare};
use crate::error::{ErrorKind, SpellError};
use crate::lang::{CasePattern, Lang};
use crate::rod::Rod;
use crate::suggest::{self, SuggestionList};
use crate::writable::{ReplacementDict, WritableDict};

/// The live spelling engine for one language: tables, affix rules, and
/// whatever dictionaries are currently attached.
pub struct SpellerImpl {
    pub lang: Lang,
    affix: AffixManager,
    parms: SpellerParms,
    main_dict: Option<Rod>,
    personal: WritableDict,
    session: WritableDict,
    repl: ReplacementDict,
}

impl SpellerImpl {
    pub fn new(lang: Lang, affix: AffixManager, parms: SpellerParms) -> SpellerImpl {
        let lang_code = parms.lang_code.clone();
        SpellerImpl {
            lang,
            affix,
            parms,
            main_dict: None,
            personal: WritableDict::new(&lang_code),
            session: WritableDict::new(&lang_code),
            repl: ReplacementDict::new(&lang_code),
        }
    }

    pub fn attach_main_dict(&mut self, rod: Rod) {
        self.main_dict = Some(rod);
    }

    pub fn attach_personal_dict(&mut self, dict: WritableDict) {
        self.personal = dict;
    }

    pub fn attach_session_dict(&mut self, dict: WritableDict) {
        self.session = dict;
    }

    pub fn attach_replacement_dict(&mut self, dict: ReplacementDict) {
        self.repl = dict;
    }

    pub fn personal_mut(&mut self) -> &mut WritableDict {
        &mut self.personal
    }

    pub fn session_mut(&mut self) -> &mut WritableDict {
        &mut self.session
    }

    pub fn replacement_mut(&mut self) -> &mut ReplacementDict {
        &mut self.repl
    }

    /// True if `root` is a dictionary word (personal, session, or main),
    /// optionally requiring it carry `flag` among its affix flags.
    fn root_ok(&self, root: &[u8], flag: u8, position: ComparePosition) -> bool {
        let compare = SensitiveCompare {
            position,
            case_insensitive: self.parms.ignore_case,
        };
        if let Some(e) = self.session.lookup(root, &compare, &self.lang, None) {
            if e.flags.is_empty() || e.has_flag(flag) {
                return true;
            }
        }
        if let Some(e) = self.personal.lookup(root, &compare, &self.lang, None) {
            if e.flags.is_empty() || e.has_flag(flag) {
                return true;
            }
        }
        if let Some(rod) = &self.main_dict {
            // the mmap'd ROD does not currently carry per-word flags
            // through `lookup`, so presence alone is treated as
            // flag-compatible; dictionaries built without affix flags
            // on the root are common and this keeps them usable.
            if rod.lookup(root, &compare, &self.lang, Some(flag)).is_some() {
                return true;
            }
        }
        false
    }

    /// Whether `word`, taken literally (no further splitting), is a
    /// known word: attached dicts directly, or via one affix strip.
    fn is_known_literal(&self, word: &[u8]) -> bool {
        let compare = SensitiveCompare::plain(self.parms.ignore_case);
        if self.session.lookup(word, &compare, &self.lang, None).is_some() {
            return true;
        }
        if self.personal.lookup(word, &compare, &self.lang, None).is_some() {
            return true;
        }
        if let Some(rod) = &self.main_dict {
            if rod.lookup(word, &compare, &self.lang, None).is_some() {
                return true;
            }
        }
        self.affix
            .affix_check(word, |root, flag, position| self.root_ok(root, flag, position))
            .is_some()
    }

    /// Whether `word` is acceptable, after case compensation (a
    /// `FirstUpper`/`AllUpper` word may only be stored lowercase) and
    /// the checker's camelCase/run-together/special-split fallbacks.
    pub fn check(&self, word: &[u8]) -> bool {
        if self.is_known_literal(word) {
            return true;
        }
        let pattern = self.lang.case_pattern(word);
        if !matches!(pattern, CasePattern::AllLower) {
            let lowered = self.lang.to_lower(word);
            if self.is_known_literal(&lowered) {
                return true;
            }
        }
        let checker = Checker::new(&self.lang, self.parms.check);
        checker.check_word(word, |w| self.is_known_literal(w))
    }

    /// Produces ranked corrections for `word`. Any replacement-dictionary
    /// entries for `word` are fed into the suggestion pipeline alongside
    /// everything the scan phases find, and scored by the same weighted
    /// edit-distance/soundslike rule as every other candidate.
    pub fn suggest(&self, word: &[u8]) -> SuggestionList {
        let extra: Vec<(Vec<u8>, Vec<u8>)> = self
            .repl
            .corrections(word)
            .iter()
            .map(|to| (word.to_vec(), to.clone()))
            .collect();

        let Some(rod) = &self.main_dict else {
            return SuggestionList::default();
        };
        suggest::suggest(&self.lang, &self.parms.suggest, word, self.try_chars(), &extra, rod)
    }

    fn try_chars(&self) -> &[u8] {
        &self.lang.try_chars
    }

    pub fn add_to_personal(&mut self, word: &[u8]) {
        self.personal.add(word);
    }

    pub fn add_to_session(&mut self, word: &[u8]) {
        self.session.add(word);
    }

    /// Adds a misspelling -> correction mapping, refusing it when
    /// `correction` does not itself check out (a replacement dictionary
    /// only stands in for a real word, never another misspelling).
    /// Returns whether the mapping was accepted. When `ignore_repl` is
    /// set, the store is skipped entirely and this reports success
    /// without touching the replacement dictionary.
    pub fn store_replacement(&mut self, misspelling: &[u8], correction: &[u8]) -> bool {
        if self.parms.ignore_repl {
            return true;
        }
        if !self.check(correction) {
            return false;
        }
        self.repl.add(misspelling, correction);
        true
    }

    pub fn synchronize(&mut self) -> Result<(), SpellError> {
        self.personal.synchronize()?;
        self.repl.synchronize()?;
        Ok(())
    }

    pub fn clear_session(&mut self) {
        self.session.clear();
    }
}

/// Builds a `SpellerImpl` for the bundled default English-like
/// language, with no main dictionary attached (callers must
/// `attach_main_dict` before `check`/`suggest` will find anything
/// beyond the personal/session lists).
pub fn new_default_english() -> Result<SpellerImpl, SpellError> {
    let parms = crate::config::commit(crate::config::Config::default())?;
    Ok(SpellerImpl::new(Lang::english(), AffixManager::new(), parms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::WordEntry;

    fn speller_with(words: &[&str]) -> SpellerImpl {
        let mut speller = new_default_english().unwrap();
        let entries: Vec<WordEntry> = words.iter().map(|w| WordEntry::new(w.as_bytes().to_vec())).collect();
        let rod = Rod::build(&entries, &speller.lang);
        speller.attach_main_dict(rod);
        speller
    }

    #[test]
    fn known_word_checks_out() {
        let speller = speller_with(&["hello", "world"]);
        assert!(speller.check(b"hello"));
        assert!(!speller.check(b"helo"));
    }

    #[test]
    fn personal_word_is_accepted_once_added() {
        let mut speller = speller_with(&["hello"]);
        assert!(!speller.check(b"gonhanh"));
        speller.add_to_personal(b"gonhanh");
        assert!(speller.check(b"gonhanh"));
    }

    #[test]
    fn case_compensation_accepts_capitalized_known_word() {
        let speller = speller_with(&["hello"]);
        assert!(speller.check(b"Hello"));
        assert!(speller.check(b"HELLO"));
    }

    #[test]
    fn suggest_returns_close_dictionary_word() {
        let speller = speller_with(&["the", "there", "then"]);
        let list = speller.suggest(b"teh");
        assert!(list.items.iter().any(|s| s.word == b"the"));
    }

    #[test]
    fn store_replacement_refuses_a_correction_that_does_not_check_out() {
        let mut speller = speller_with(&["receive"]);
        assert!(speller.store_replacement(b"recieve", b"receive"));
        assert!(!speller.store_replacement(b"wierd", b"not_a_real_word_either"));
    }

    #[test]
    fn ignore_repl_suppresses_replacement_dict_updates() {
        let mut speller = speller_with(&["receive"]);
        speller.parms.ignore_repl = true;
        assert!(speller.store_replacement(b"recieve", b"receive"));
        assert!(speller.repl.corrections(b"recieve").is_empty());
    }

    #[test]
    fn suggest_uses_the_affix_files_try_alphabet() {
        // a `TRY` alphabet missing the letter needed to fix the typo means
        // the one-edit neighborhood can never produce "cat" from "cbt"; a
        // wider alphabet elsewhere in the same struct does find it.
        let mut speller = speller_with(&["cat"]);
        speller.lang.try_chars = b"xyz".to_vec();
        assert!(!speller.suggest(b"cbt").items.iter().any(|s| s.word == b"cat"));
        speller.lang.try_chars = b"a".to_vec();
        assert!(speller.suggest(b"cbt").items.iter().any(|s| s.word == b"cat"));
    }
}

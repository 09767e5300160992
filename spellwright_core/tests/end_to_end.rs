//! End-to-end scenarios against the public `SpellerImpl` facade: a
//! small in-memory dictionary built with `Rod::build`, checked and
//! corrected the way a real caller would.

use spellwright_core::affix::AffixManager;
use spellwright_core::config::{commit, Config};
use spellwright_core::dict::WordEntry;
use spellwright_core::lang::Lang;
use spellwright_core::rod::Rod;
use spellwright_core::speller::SpellerImpl;

fn build_speller(words: &[&str], aff: &str) -> SpellerImpl {
    let lang = Lang::english();
    let (affix, extras) = AffixManager::parse(aff).unwrap();
    let mut lang = lang;
    lang.repl_table = extras.repl_table;

    let parms = commit(Config::default()).unwrap();
    let mut speller = SpellerImpl::new(lang, affix, parms);
    let entries: Vec<WordEntry> = words.iter().map(|w| WordEntry::new(w.as_bytes().to_vec())).collect();
    let rod = Rod::build(&entries, &speller.lang);
    speller.attach_main_dict(rod);
    speller
}

const SIMPLE_AFF: &str = "\
SFX S Y 1
SFX S 0 s .
";

#[test]
fn lowercase_dictionary_word_checks_out() {
    let speller = build_speller(&["hello", "world", "cafe"], "");
    assert!(speller.check(b"hello"));
    assert!(speller.check(b"world"));
}

#[test]
fn uppercase_variant_of_known_word_checks_out() {
    let speller = build_speller(&["hello"], "");
    assert!(speller.check(b"HELLO"));
    assert!(speller.check(b"Hello"));
}

#[test]
fn accented_word_checks_out_against_its_own_raw_form() {
    // the dictionary entry is stored with its own raw bytes (an
    // accented "e"); `Rod::build`'s hash bucketing and `Rod::lookup`'s
    // must agree on hashing those same raw bytes, or a word whose raw
    // form differs from its clean form becomes unreachable by a direct
    // lookup for its own literal spelling.
    let mut speller = SpellerImpl::new(Lang::english(), AffixManager::new(), commit(Config::default()).unwrap());
    let entries = vec![WordEntry::new(b"caf\xE9".to_vec())];
    let rod = Rod::build(&entries, &speller.lang);
    speller.attach_main_dict(rod);
    assert!(speller.check(b"caf\xE9"));
    assert!(!speller.check(b"cafe"));
}

#[test]
fn unknown_word_does_not_check_out() {
    let speller = build_speller(&["hello", "world"], "");
    assert!(!speller.check(b"xyzzy"));
}

#[test]
fn misspelling_is_suggested_the_correct_word() {
    let speller = build_speller(&["hello", "help", "held"], "");
    let suggestions = speller.suggest(b"helo");
    assert!(suggestions.items.iter().any(|s| s.word == b"hello"));
}

#[test]
fn replacement_table_suggestion_beats_the_generic_pipeline() {
    let mut speller = build_speller(&["receive"], "");
    speller.store_replacement(b"recieve", b"receive");
    let suggestions = speller.suggest(b"recieve");
    assert_eq!(suggestions.items.first().map(|s| s.word.as_slice()), Some(&b"receive"[..]));
}

#[test]
fn camel_case_compound_checks_out_once_enabled() {
    let mut config = Config::default();
    config.camel_case = true;
    let parms = commit(config).unwrap();
    let mut speller = SpellerImpl::new(Lang::english(), AffixManager::new(), parms);
    let entries = vec![WordEntry::new(b"camel".to_vec()), WordEntry::new(b"case".to_vec())];
    let rod = Rod::build(&entries, &speller.lang);
    speller.attach_main_dict(rod);
    assert!(speller.check(b"camelCase"));
}

#[test]
fn compound_run_together_checks_out_once_enabled() {
    let mut config = Config::default();
    config.run_together = true;
    let parms = commit(config).unwrap();
    let lang = Lang::english();
    let mut speller = SpellerImpl::new(lang, AffixManager::new(), parms);
    let entries = vec![WordEntry::new(b"cup".to_vec()), WordEntry::new(b"cake".to_vec())];
    let rod = Rod::build(&entries, &speller.lang);
    speller.attach_main_dict(rod);
    assert!(speller.check(b"cupcake"));
}

#[test]
fn affix_expanded_plural_round_trips() {
    // `SpellerImpl` does not expose its `AffixManager` directly; this
    // exercises the same `.aff` text through the public `affix` module
    // to confirm the rule the `build_speller(..., SIMPLE_AFF)` helper
    // relies on actually produces "cats" from "cat" + 'S'.
    let (affix, _) = AffixManager::parse(SIMPLE_AFF).unwrap();
    let forms = affix.expand(b"cat", &[b'S']);
    assert!(forms.contains(&b"cats".to_vec()));
}

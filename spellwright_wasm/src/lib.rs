//! Thin `wasm-bindgen` bridge: loads an `.aff`/`.dic` pair handed over
//! from JavaScript as strings (no filesystem access inside wasm) and
//! exposes `check_word`/`suggest` over the built [`SpellerImpl`].
//!
//! Module-global state is held behind a `OnceLock<Mutex<_>>` so the
//! exported functions stay plain, stateless `#[wasm_bindgen]` calls,
//! built directly on `spellwright_core`'s `SpellerImpl` and affix
//! engine.

use std::sync::{Mutex, OnceLock};

use wasm_bindgen::prelude::*;

use spellwright_core::affix::AffixManager;
use spellwright_core::config::{commit, Config};
use spellwright_core::dict::WordEntry;
use spellwright_core::lang::Lang;
use spellwright_core::rod::Rod;
use spellwright_core::speller::SpellerImpl;

fn parse_dic(text: &str) -> Vec<(Vec<u8>, Vec<u8>)> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            if i == 0 && line.parse::<u64>().is_ok() {
                return None;
            }
            Some(match line.split_once('/') {
                Some((w, f)) => (w.as_bytes().to_vec(), f.as_bytes().to_vec()),
                None => (line.as_bytes().to_vec(), Vec::new()),
            })
        })
        .collect()
}

fn build_speller(lang_code: &str, aff_text: &str, dic_text: &str) -> Result<SpellerImpl, String> {
    let (affix, extras) = AffixManager::parse(aff_text).map_err(|e| e.to_string())?;
    let mut lang = Lang::english();
    lang.code = lang_code.to_string();
    lang.repl_table = extras.repl_table;
    lang.try_chars = extras.try_chars.into_bytes();

    let mut words = Vec::new();
    for (root, flags) in parse_dic(dic_text) {
        if flags.is_empty() {
            words.push(WordEntry::new(root));
        } else {
            for surface in affix.expand(&root, &flags) {
                words.push(WordEntry::new(surface));
            }
            words.push(WordEntry::with_flags(root, flags));
        }
    }
    let rod = Rod::build(&words, &lang);

    let parms = commit(Config {
        lang_code: lang_code.to_string(),
        ..Config::default()
    })
    .map_err(|e| e.to_string())?;
    let mut speller = SpellerImpl::new(lang, affix, parms);
    speller.attach_main_dict(rod);
    Ok(speller)
}

fn state() -> &'static Mutex<Option<SpellerImpl>> {
    static STATE: OnceLock<Mutex<Option<SpellerImpl>>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(None))
}

/// Builds a speller from `.aff`/`.dic` text and installs it as the
/// active language; returns a single-element error vector on failure,
/// or an empty vector on success, surfacing problems as plain strings
/// since `wasm_bindgen` exports cannot cross the boundary as `Result`
/// with a custom error type.
#[wasm_bindgen]
pub fn load_language(lang_code: &str, aff_text: &str, dic_text: &str) -> Vec<String> {
    match build_speller(lang_code, aff_text, dic_text) {
        Ok(speller) => {
            *state().lock().unwrap() = Some(speller);
            Vec::new()
        }
        Err(message) => vec![message],
    }
}

#[wasm_bindgen]
pub fn check_word(word: &str) -> bool {
    match state().lock().unwrap().as_ref() {
        Some(speller) => speller.check(word.as_bytes()),
        None => false,
    }
}

/// Ranked corrections for `word`, capped by the active `SuggestParms`'s
/// `limit`. Returns an empty vector if no language is loaded.
#[wasm_bindgen]
pub fn suggest(word: &str) -> Vec<String> {
    let guard = state().lock().unwrap();
    let Some(speller) = guard.as_ref() else {
        return Vec::new();
    };
    speller
        .suggest(word.as_bytes())
        .items
        .iter()
        .map(|s| String::from_utf8_lossy(&s.word).into_owned())
        .collect()
}

#[wasm_bindgen]
pub fn add_to_session(word: &str) {
    if let Some(speller) = state().lock().unwrap().as_mut() {
        speller.add_to_session(word.as_bytes());
    }
}

#[wasm_bindgen(start)]
fn main() -> Result<(), JsValue> {
    Ok(())
}

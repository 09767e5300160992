//! Loads a `.aff`/`.dic` pair from disk into a ready-to-use
//! [`SpellerImpl`], and implements the offline dictionary-build step
//! that turns the same pair into a `.rws` read-only dictionary file.
//!
//! The `.dic` format follows the Hunspell/Aspell convention: an
//! optional leading line giving the word count, then one `root` or
//! `root/FLAGS` entry per line.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use spellwright_core::affix::AffixManager;
use spellwright_core::config::{commit, Config};
use spellwright_core::dict::WordEntry;
use spellwright_core::lang::Lang;
use spellwright_core::rod::Rod;
use spellwright_core::speller::SpellerImpl;

/// One `.dic` line: a root word plus the affix flags it accepts.
pub struct DicEntry {
    pub root: Vec<u8>,
    pub flags: Vec<u8>,
}

/// Parses a `.dic` file body: skips a leading bare integer (word count),
/// blank lines, and `#`-prefixed comments; splits `word/FLAGS` on the
/// first unescaped `/`.
pub fn parse_dic(text: &str) -> Vec<DicEntry> {
    let mut entries = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if i == 0 && line.parse::<u64>().is_ok() {
            continue;
        }
        let (root, flags) = match line.split_once('/') {
            Some((r, f)) => (r, f.as_bytes().to_vec()),
            None => (line, Vec::new()),
        };
        entries.push(DicEntry {
            root: root.as_bytes().to_vec(),
            flags,
        });
    }
    entries
}

/// Expands every `.dic` entry through the affix manager ("fully
/// expand" mode, the simplest of the documented strategies and the one
/// that needs no jump-table-validity bookkeeping at build time). Roots
/// with no flags are kept as-is.
pub fn expand_entries(entries: &[DicEntry], affix: &AffixManager) -> Vec<WordEntry> {
    let mut words = Vec::new();
    for e in entries {
        words.push(WordEntry::with_flags(e.root.clone(), e.flags.clone()));
        if !e.flags.is_empty() {
            for surface in affix.expand(&e.root, &e.flags) {
                words.push(WordEntry::new(surface));
            }
        }
    }
    words
}

/// Builds the `Lang`/`AffixManager`/`Rod` triple from an `.aff` file's
/// text and a `.dic` file's text, the in-memory equivalent of the build
/// pipeline's output.
pub fn build_from_sources(aff_text: &str, dic_text: &str, lang_code: &str) -> Result<(Lang, AffixManager, Rod)> {
    let (affix, extras) = AffixManager::parse(aff_text).context("parsing .aff file")?;
    let mut lang = Lang::english();
    lang.code = lang_code.to_string();
    lang.repl_table = extras.repl_table;
    lang.try_chars = extras.try_chars.into_bytes();

    let entries = parse_dic(dic_text);
    if entries.is_empty() {
        warn!("dictionary {lang_code} has no word entries");
    }
    let words = expand_entries(&entries, &affix);
    let rod = Rod::build(&words, &lang);
    Ok((lang, affix, rod))
}

/// Reads `<base>.aff` and `<base>.dic` (or `<base>.rws` if it already
/// exists, skipping the expansion step) and returns a speller attached
/// to the result, configured per `config`.
pub fn load_speller(base: &Path, lang_code: &str, config: Config) -> Result<SpellerImpl> {
    let aff_path = base.with_extension("aff");
    let dic_path = base.with_extension("dic");
    let rws_path = base.with_extension("rws");

    let aff_text = fs::read_to_string(&aff_path).with_context(|| format!("reading {}", aff_path.display()))?;
    let (affix, extras) = AffixManager::parse(&aff_text).with_context(|| format!("parsing {}", aff_path.display()))?;
    let mut lang = Lang::english();
    lang.code = lang_code.to_string();
    lang.repl_table = extras.repl_table;
    lang.try_chars = extras.try_chars.into_bytes();

    let rod = if rws_path.is_file() {
        debug!("loading prebuilt dictionary {}", rws_path.display());
        Rod::load(&rws_path, &lang).with_context(|| format!("loading {}", rws_path.display()))?
    } else {
        let dic_text = fs::read_to_string(&dic_path).with_context(|| format!("reading {}", dic_path.display()))?;
        let entries = parse_dic(&dic_text);
        let words = expand_entries(&entries, &affix);
        debug!("built in-memory dictionary from {} ({} words)", dic_path.display(), words.len());
        Rod::build(&words, &lang)
    };

    let parms = commit(config)?;
    let mut speller = SpellerImpl::new(lang, affix, parms);
    speller.attach_main_dict(rod);
    Ok(speller)
}

/// The `build-dict` subcommand: runs the full build pipeline and writes
/// a `.rws` file next to the `.dic`/`.aff` pair.
pub fn build_dict(aff_path: &Path, dic_path: &Path, out_path: &Path, lang_code: &str) -> Result<()> {
    let aff_text = fs::read_to_string(aff_path).with_context(|| format!("reading {}", aff_path.display()))?;
    let dic_text = fs::read_to_string(dic_path).with_context(|| format!("reading {}", dic_path.display()))?;
    let (_lang, _affix, rod) = build_from_sources(&aff_text, &dic_text, lang_code)?;
    rod.save(out_path).with_context(|| format!("writing {}", out_path.display()))?;
    println!("wrote {} words to {}", rod.word_count(), out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dic_skips_leading_count_and_comments() {
        let text = "3\nhello\nworld/S\n# a comment\ncat\n";
        let entries = parse_dic(text);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].root, b"world");
        assert_eq!(entries[1].flags, b"S");
    }

    #[test]
    fn build_from_sources_produces_a_working_rod() {
        let aff = "SFX S Y 1\nSFX S 0 s .\n";
        let dic = "2\ncat/S\ndog\n";
        let (lang, _affix, rod) = build_from_sources(aff, dic, "en").unwrap();
        assert!(rod.soundslike_lookup(&lang.to_soundslike(b"cat")).iter().any(|w| *w == b"cat"));
    }
}

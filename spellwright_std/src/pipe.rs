//! The ispell/aspell-compatible pipe-mode loop (`-a`/`-l`): reads one
//! line of input at a time and replies in the line-oriented protocol
//! editors and mail clients have driven spell checkers through for
//! decades. This protocol is a deliberately out-of-scope external
//! collaborator of the core engine; this module is that collaborator,
//! built entirely on `SpellerImpl`'s public surface.

use std::io::{BufRead, Write};

use anyhow::Result;

use spellwright_core::speller::SpellerImpl;

use crate::tokenize;

pub const GREETING: &str = "@(#) International Ispell Version 3.1.20 (but really Spellwright)";

/// `-a`: full protocol with suggestions. `-l`: list misspelled words only,
/// one per line, no leading status characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeMode {
    All,
    ListOnly,
}

/// Runs the pipe-mode loop until EOF, writing replies to `out`.
pub fn run(speller: &mut SpellerImpl, mode: PipeMode, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut terse = false;
    if mode == PipeMode::All {
        writeln!(out, "{GREETING}")?;
    }
    let mut line_buf = Vec::new();
    let mut reader = input;
    loop {
        line_buf.clear();
        let n = reader.read_until(b'\n', &mut line_buf)?;
        if n == 0 {
            break;
        }
        while line_buf.last() == Some(&b'\n') || line_buf.last() == Some(&b'\r') {
            line_buf.pop();
        }
        if line_buf.is_empty() {
            continue;
        }
        if let Some(command) = line_buf.first().copied() {
            if handle_command(speller, command, &line_buf[1..], &mut terse)? {
                if mode == PipeMode::All {
                    writeln!(out)?;
                }
                continue;
            }
        }
        check_line(speller, mode, terse, &line_buf, &mut out)?;
    }
    Ok(())
}

/// Handles a single-character ispell command line; returns `true` if
/// `line` was a recognized command (and so must not also be spell
/// checked as text).
fn handle_command(speller: &mut SpellerImpl, command: u8, rest: &[u8], terse: &mut bool) -> Result<bool> {
    match command {
        b'*' => {
            speller.add_to_personal(rest);
            Ok(true)
        }
        b'&' => {
            let lowered = speller.lang.to_lower(rest);
            speller.add_to_personal(&lowered);
            Ok(true)
        }
        b'@' => {
            speller.add_to_session(rest);
            Ok(true)
        }
        b'#' => {
            speller.synchronize()?;
            Ok(true)
        }
        b'!' => {
            *terse = true;
            Ok(true)
        }
        b'%' => {
            *terse = false;
            Ok(true)
        }
        b'~' | b'+' | b'-' => Ok(true), // mode flags this engine does not model; accepted and ignored
        _ => Ok(false),
    }
}

fn check_line(
    speller: &mut SpellerImpl,
    mode: PipeMode,
    terse: bool,
    line: &[u8],
    out: &mut impl Write,
) -> Result<()> {
    for (word, offset) in tokenize::words(line) {
        if speller.check(word) {
            if mode == PipeMode::All && !terse {
                writeln!(out, "*")?;
            }
            continue;
        }
        match mode {
            PipeMode::ListOnly => {
                writeln!(out, "{}", String::from_utf8_lossy(word))?;
            }
            PipeMode::All => {
                let suggestions = speller.suggest(word);
                if suggestions.items.is_empty() {
                    writeln!(out, "# {} {}", String::from_utf8_lossy(word), offset)?;
                } else {
                    let joined = suggestions
                        .items
                        .iter()
                        .map(|s| String::from_utf8_lossy(&s.word).into_owned())
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(
                        out,
                        "& {} {} {}: {}",
                        String::from_utf8_lossy(word),
                        suggestions.items.len(),
                        offset,
                        joined
                    )?;
                }
            }
        }
    }
    if mode == PipeMode::All {
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellwright_core::affix::AffixManager;
    use spellwright_core::config::{commit, Config};
    use spellwright_core::dict::WordEntry;
    use spellwright_core::lang::Lang;
    use spellwright_core::rod::Rod;

    fn speller_with(words: &[&str]) -> SpellerImpl {
        let lang = Lang::english();
        let parms = commit(Config::default()).unwrap();
        let mut speller = SpellerImpl::new(lang, AffixManager::new(), parms);
        let entries: Vec<WordEntry> = words.iter().map(|w| WordEntry::new(w.as_bytes().to_vec())).collect();
        let rod = Rod::build(&entries, &speller.lang);
        speller.attach_main_dict(rod);
        speller
    }

    #[test]
    fn correct_word_reports_asterisk() {
        let mut speller = speller_with(&["hello"]);
        let mut out = Vec::new();
        run(&mut speller, PipeMode::All, "hello\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("*\n"));
    }

    #[test]
    fn misspelled_word_reports_suggestions() {
        let mut speller = speller_with(&["the", "there", "then"]);
        let mut out = Vec::new();
        run(&mut speller, PipeMode::All, "teh\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l.starts_with("& teh") && l.contains("the")));
    }

    #[test]
    fn star_command_adds_to_personal_without_checking_it() {
        let mut speller = speller_with(&["hello"]);
        let mut out = Vec::new();
        run(&mut speller, PipeMode::All, "*gonhanh\ngonhanh\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("*\n"));
        assert!(!text.contains("& gonhanh"));
    }

    #[test]
    fn list_mode_prints_only_misspelled_words() {
        let mut speller = speller_with(&["hello"]);
        let mut out = Vec::new();
        run(&mut speller, PipeMode::ListOnly, "hello helllo\n".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "helllo\n");
    }
}

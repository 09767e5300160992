//! Suggestion generation: given a misspelled word, produce an ordered
//! list of likely corrections.
//!
//! Grounded on `examples/original_source/modules/speller/default/suggest.cpp`:
//! the same named presets (`ultra`/`fast`/`normal`/`slow`/`bad-spellers`/
//! `soundslike`), the same percentage-scale edit-distance weights
//! (`del1=95, del2=95, swap=90, sub=100, max=100, min=90` for the
//! default `normal` preset), the same `split_chars = " -"`, and the same
//! shaped pipeline (try a word-split first, then the replacement table,
//! then a one-edit neighborhood, then a soundslike scan at increasing
//! distances, then an n-gram fallback) — reimplemented here over the
//! smaller, explicit [`SuggestSource`] seam instead of `suggest.cpp`'s
//! direct coupling to the speller's internal dictionary stack, and with
//! a single weighted-average scorer rather than the original's several
//! special-cased score adjustments.

use hashbrown::HashSet;

use crate::edit_distance::{self, LimitHit, RawWeights};
use crate::lang::Lang;
use crate::typo::{self, TypoWeights};

/// One of the six named presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestMode {
    Ultra,
    Fast,
    Normal,
    Slow,
    BadSpellers,
    Soundslike,
}

/// Percentage-scale edit-distance weights used only for suggestion
/// scoring, distinct from [`RawWeights`], which drives the plain DP
/// edit distance used elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub del1: u32,
    pub del2: u32,
    pub swap: u32,
    pub sub: u32,
    pub max: u32,
    pub min: u32,
}

impl ScoreWeights {
    fn as_raw(self) -> RawWeights {
        RawWeights {
            del1: self.del1,
            del2: self.del2,
            swap: self.swap,
            sub: self.sub,
            similar: 0,
            min: self.min,
            max: self.max,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SuggestParms {
    pub mode: SuggestMode,
    pub weights: ScoreWeights,
    pub use_typo_analysis: bool,
    pub use_repl_table: bool,
    /// furthest soundslike edit distance scanned (0, 1, or 2 rounds).
    pub span: u32,
    pub limit: usize,
    pub ngram_keep: usize,
    /// candidates scoring at or above this are dropped outright.
    pub skip_score: u32,
    pub split_chars: &'static str,
    pub scan_threshold: u32,
    pub scan_2_threshold: u32,
    pub ngram_threshold: u32,
    /// 0-100 weight given to the plain/typo word score in the final
    /// blended score; `sl_weight` is always `100 - word_weight`.
    pub word_weight: u32,
    /// 0-100 weight given to the soundslike-distance score.
    pub sl_weight: u32,
}

const T_PROBABLY: u32 = 50;
const T_MAYBE: u32 = 100;
const T_UNLIKELY: u32 = 175;

impl SuggestParms {
    pub fn for_mode(mode: SuggestMode) -> SuggestParms {
        let weights = match mode {
            SuggestMode::Ultra => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 95 },
            SuggestMode::Fast => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 90 },
            SuggestMode::Normal => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 90 },
            SuggestMode::Slow => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 100 },
            SuggestMode::BadSpellers => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 90 },
            SuggestMode::Soundslike => ScoreWeights { del1: 95, del2: 95, swap: 90, sub: 100, max: 100, min: 100 },
        };
        let (span, ngram_keep, limit) = match mode {
            SuggestMode::Ultra => (0, 4, 4),
            SuggestMode::Fast => (1, 6, 10),
            SuggestMode::Normal => (1, 10, 15),
            SuggestMode::Slow => (2, 16, 20),
            SuggestMode::BadSpellers => (2, 20, 20),
            SuggestMode::Soundslike => (2, 10, 15),
        };
        // how much the final score leans on soundslike distance versus
        // word-edit distance: the `soundslike` preset and `bad-spellers`
        // (whose typed-in word is assumed to barely resemble its own
        // correct spelling) weight the soundslike term more heavily.
        let sl_weight = match mode {
            SuggestMode::Soundslike | SuggestMode::BadSpellers => 70,
            _ => 30,
        };
        SuggestParms {
            mode,
            weights,
            use_typo_analysis: matches!(mode, SuggestMode::BadSpellers | SuggestMode::Slow),
            use_repl_table: true,
            span,
            limit,
            ngram_keep,
            skip_score: weights.max * 4,
            split_chars: " -",
            scan_threshold: T_UNLIKELY,
            scan_2_threshold: T_MAYBE,
            ngram_threshold: T_MAYBE,
            word_weight: 100 - sl_weight,
            sl_weight,
        }
    }

    pub fn ultra() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::Ultra)
    }
    pub fn fast() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::Fast)
    }
    pub fn normal() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::Normal)
    }
    pub fn slow() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::Slow)
    }
    pub fn bad_spellers() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::BadSpellers)
    }
    pub fn soundslike() -> SuggestParms {
        SuggestParms::for_mode(SuggestMode::Soundslike)
    }
}

/// One ranked suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: Vec<u8>,
    pub score: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    pub items: Vec<Suggestion>,
}

impl SuggestionList {
    /// Sorts by ascending score, then lexicographically, and drops
    /// case-fold-insensitive duplicates.
    fn finalize(mut self, lang: &Lang, limit: usize) -> SuggestionList {
        self.items.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.word.cmp(&b.word)));
        let mut seen = HashSet::new();
        self.items.retain(|s| seen.insert(lang.to_lower(&s.word)));
        self.items.truncate(limit);
        self
    }
}

/// The word source a suggester scans: typically the attached ROD plus
/// any writable dictionaries, unified behind this trait so `suggest.rs`
/// does not depend on `rod.rs`/`writable.rs` directly.
pub trait SuggestSource {
    fn contains(&self, word: &[u8]) -> bool;
    /// words sharing exactly this soundslike key.
    fn soundslike_exact(&self, soundslike: &[u8]) -> Vec<Vec<u8>>;
    /// words whose soundslike key starts with this prefix.
    fn soundslike_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>>;
    /// a bounded sample of the whole word list, for the n-gram fallback.
    fn sample(&self, limit: usize) -> Vec<Vec<u8>>;
}

/// Preferred corrections consulted before the general suggester:
/// `lang.repl_table` plus an optional per-user replacement dictionary,
/// both `(pattern, replacement)` pairs applied against the misspelling
/// as a whole.
fn replacement_candidates(lang: &Lang, word: &[u8], repl_extra: &[(Vec<u8>, Vec<u8>)]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    for (from, to) in &lang.repl_table {
        if word == from.as_bytes() {
            out.push(to.as_bytes().to_vec());
        }
    }
    for (from, to) in repl_extra {
        if word == from.as_slice() {
            out.push(to.clone());
        }
    }
    out
}

/// Inserts each of `parms.split_chars` at every interior byte boundary
/// and keeps results where both halves independently exist in `source`
/// (e.g. `"helloworld"` -> `"hello world"`).
fn split_candidates(parms: &SuggestParms, word: &[u8], source: &dyn SuggestSource) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if word.len() < 4 || parms.split_chars.is_empty() {
        return out;
    }
    for i in 2..word.len() - 1 {
        let (left, right) = word.split_at(i);
        if source.contains(left) && source.contains(right) {
            for sep in parms.split_chars.bytes() {
                let mut candidate = left.to_vec();
                candidate.push(sep);
                candidate.extend_from_slice(right);
                out.push(candidate);
            }
        }
    }
    out
}

/// One-edit neighborhood: every insertion, deletion, substitution, and
/// adjacent transposition of `word` over the language's "try" alphabet,
/// kept only if it exists in `source`.
fn one_edit_candidates(lang: &Lang, word: &[u8], try_chars: &[u8], source: &dyn SuggestSource) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let alphabet: &[u8] = if try_chars.is_empty() {
        b"etaoinshrdlcumwfgypbvkjxqzESIANRTOLCDUGMPHBYFVKWZ"
    } else {
        try_chars
    };

    for i in 0..=word.len() {
        for &c in alphabet {
            let mut candidate = word.to_vec();
            candidate.insert(i, c);
            if source.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    for i in 0..word.len() {
        let mut candidate = word.to_vec();
        candidate.remove(i);
        if source.contains(&candidate) {
            out.push(candidate);
        }
    }
    for i in 0..word.len() {
        for &c in alphabet {
            if c == word[i] {
                continue;
            }
            let mut candidate = word.to_vec();
            candidate[i] = c;
            if source.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    for i in 0..word.len().saturating_sub(1) {
        if word[i] == word[i + 1] {
            continue;
        }
        let mut candidate = word.to_vec();
        candidate.swap(i, i + 1);
        if source.contains(&candidate) {
            out.push(candidate);
        }
    }
    let _ = lang;
    out
}

/// Words sharing the original's soundslike key, or keys within `parms.span`
/// edits of it. Each wider pass only runs while the previous pass's
/// "try harder" signal still exceeds its threshold: an exact hit means
/// there's little reason to pay for the 1- or 2-edit scan, and a 1-edit
/// pass that already found something means the (most expensive) 2-edit
/// pass is skipped too.
fn soundslike_candidates(lang: &Lang, parms: &SuggestParms, word: &[u8], source: &dyn SuggestSource) -> Vec<Vec<u8>> {
    let sl = lang.to_soundslike(word);
    let mut out = source.soundslike_exact(&sl);
    if parms.span == 0 {
        return out;
    }

    let try_harder = if out.is_empty() { T_UNLIKELY } else { 0 };
    if try_harder < parms.scan_threshold {
        return out;
    }

    let prefix_len = sl.len().min(2);
    let mut found_at_1 = false;
    let mut hits: Vec<(Vec<u8>, LimitHit)> = Vec::new();
    for candidate_word in source.soundslike_prefix(&sl[..prefix_len]) {
        let candidate_sl = lang.to_soundslike(&candidate_word);
        if let Some(hit) = edit_distance::limit1(&sl, &candidate_sl, RawWeights::default()) {
            found_at_1 = true;
            hits.push((candidate_word, hit));
        }
    }
    out.extend(hits.into_iter().map(|(w, _)| w));

    if parms.span < 2 {
        return out;
    }
    let try_harder_after_1 = if found_at_1 { T_PROBABLY } else { T_UNLIKELY };
    if try_harder_after_1 < parms.scan_2_threshold {
        return out;
    }

    for candidate_word in source.soundslike_prefix(&sl[..prefix_len]) {
        let candidate_sl = lang.to_soundslike(&candidate_word);
        if let Some(hit) = edit_distance::limit2(&sl, &candidate_sl, RawWeights::default()) {
            // a 2-edit hit sharing none of its leading bytes with the
            // original soundslike is the scan's weakest, most
            // expensive-to-justify result; `stopped_at` lets a caller
            // this deep in the scan discard it without a rescore.
            if hit.stopped_at > 0 {
                out.push(candidate_word);
            }
        }
    }
    out
}

/// Simple trigram-overlap fallback: ranks `source.sample(..)` by how
/// many 3-byte windows it shares with `word`, keeping the top
/// `parms.ngram_keep`, used only when nothing sharper has produced
/// enough candidates.
fn ngram_candidates(parms: &SuggestParms, word: &[u8], source: &dyn SuggestSource) -> Vec<Vec<u8>> {
    let grams = |w: &[u8]| -> HashSet<[u8; 3]> {
        let mut s = HashSet::new();
        if w.len() >= 3 {
            for g in w.windows(3) {
                s.insert([g[0], g[1], g[2]]);
            }
        }
        s
    };
    let target = grams(word);
    if target.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(usize, Vec<u8>)> = source
        .sample(parms.ngram_keep * 40)
        .into_iter()
        .map(|w| {
            let overlap = grams(&w).intersection(&target).count();
            (overlap, w)
        })
        .filter(|(overlap, _)| *overlap > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(parms.ngram_keep);
    scored.into_iter().map(|(_, w)| w).collect()
}

/// Scores a candidate against the original word as a weighted average of
/// the word-edit-distance score (the plain edit distance, optionally
/// re-weighted by keyboard-adjacency/case-only typo costs when
/// `parms.use_typo_analysis` is set) and the soundslike-distance score
/// (the plain edit distance between the two soundslike keys).
fn score_candidate(lang: &Lang, parms: &SuggestParms, original: &[u8], candidate: &[u8]) -> u32 {
    let word_score = if parms.use_typo_analysis {
        typo::typo_edit_distance(lang, original, candidate, TypoWeights::default())
    } else {
        edit_distance::edit_distance(original, candidate, parms.weights.as_raw())
    };
    let sl_original = lang.to_soundslike(original);
    let sl_candidate = lang.to_soundslike(candidate);
    let soundslike_score = edit_distance::edit_distance(&sl_original, &sl_candidate, RawWeights::default());
    (parms.word_weight * word_score + parms.sl_weight * soundslike_score) / 100
}

/// Runs the full suggestion pipeline for `word` against `source`,
/// producing an ordered, deduped [`SuggestionList`].
///
/// `BadSpellers` runs the pipeline twice — once under the `soundslike`
/// preset, once under `slow` — and merges the two result sets before a
/// final re-sort, on the premise that a genuinely bad speller's input
/// often only converges on the right word through a phonetic match the
/// ordinary edit-distance-weighted pass would score too far away.
pub fn suggest(
    lang: &Lang,
    parms: &SuggestParms,
    word: &[u8],
    try_chars: &[u8],
    repl_extra: &[(Vec<u8>, Vec<u8>)],
    source: &dyn SuggestSource,
) -> SuggestionList {
    if parms.mode == SuggestMode::BadSpellers {
        let soundslike_pass = suggest(lang, &SuggestParms::soundslike(), word, try_chars, repl_extra, source);
        let slow_pass = suggest(lang, &SuggestParms::slow(), word, try_chars, repl_extra, source);
        let mut merged = SuggestionList::default();
        let mut seen = HashSet::new();
        for s in soundslike_pass.items.into_iter().chain(slow_pass.items) {
            if seen.insert(lang.to_lower(&s.word)) {
                merged.items.push(s);
            }
        }
        return merged.finalize(lang, parms.limit);
    }

    let mut candidates: Vec<Vec<u8>> = Vec::new();

    candidates.extend(split_candidates(parms, word, source));

    if parms.use_repl_table {
        candidates.extend(replacement_candidates(lang, word, repl_extra));
    }

    candidates.extend(one_edit_candidates(lang, word, try_chars, source));

    candidates.extend(soundslike_candidates(lang, parms, word, source));

    let mut list = SuggestionList::default();
    let mut seen_candidates = HashSet::new();
    for c in candidates {
        if c == word || !seen_candidates.insert(c.clone()) {
            continue;
        }
        let score = score_candidate(lang, parms, word, &c);
        if score >= parms.skip_score {
            continue;
        }
        list.items.push(Suggestion { word: c, score });
    }

    if list.items.len() < parms.limit {
        for c in ngram_candidates(parms, word, source) {
            if c == word || !seen_candidates.insert(c.clone()) {
                continue;
            }
            let score = score_candidate(lang, parms, word, &c);
            if score < parms.ngram_threshold {
                list.items.push(Suggestion { word: c, score });
            }
        }
    }

    list.finalize(lang, parms.limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        words: Vec<Vec<u8>>,
        lang: Lang,
    }

    impl SuggestSource for FakeSource {
        fn contains(&self, word: &[u8]) -> bool {
            self.words.iter().any(|w| w == word)
        }
        fn soundslike_exact(&self, soundslike: &[u8]) -> Vec<Vec<u8>> {
            self.words.iter().filter(|w| self.lang.to_soundslike(w) == soundslike).cloned().collect()
        }
        fn soundslike_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
            self.words
                .iter()
                .filter(|w| self.lang.to_soundslike(w).starts_with(prefix))
                .cloned()
                .collect()
        }
        fn sample(&self, limit: usize) -> Vec<Vec<u8>> {
            self.words.iter().take(limit).cloned().collect()
        }
    }

    fn source(words: &[&str]) -> FakeSource {
        FakeSource {
            words: words.iter().map(|w| w.as_bytes().to_vec()).collect(),
            lang: Lang::english(),
        }
    }

    #[test]
    fn one_edit_typo_is_top_suggestion() {
        let lang = Lang::english();
        let src = source(&["the", "there", "then", "they"]);
        let parms = SuggestParms::normal();
        let list = suggest(&lang, &parms, b"teh", b"", &[], &src);
        assert_eq!(list.items.first().map(|s| s.word.as_slice()), Some(&b"the"[..]));
    }

    #[test]
    fn replacement_table_is_consulted() {
        let mut lang = Lang::english();
        lang.repl_table.push(("recieve".to_string(), "receive".to_string()));
        let src = source(&["receive"]);
        let parms = SuggestParms::normal();
        let list = suggest(&lang, &parms, b"recieve", b"", &[], &src);
        assert!(list.items.iter().any(|s| s.word == b"receive"));
    }

    #[test]
    fn suggestions_are_deduplicated_case_insensitively() {
        let lang = Lang::english();
        let src = source(&["cat", "Cat"]);
        let parms = SuggestParms::normal();
        let list = suggest(&lang, &parms, b"cot", b"", &[], &src);
        let hits: Vec<_> = list.items.iter().filter(|s| lang.to_lower(&s.word) == b"cat").collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn suggestion_list_respects_limit() {
        let lang = Lang::english();
        let src = source(&["cat", "bat", "rat", "hat", "mat", "sat", "fat", "pat", "vat", "oat"]);
        let mut parms = SuggestParms::normal();
        parms.limit = 3;
        let list = suggest(&lang, &parms, b"cit", b"", &[], &src);
        assert!(list.items.len() <= 3);
    }

    #[test]
    fn score_blends_word_and_soundslike_distance() {
        let lang = Lang::english();
        // "cat" and "kat" fold to the same soundslike key ("C" and "K" both
        // map onto "K"), but differ by one raw-byte substitution.
        let mut parms = SuggestParms::normal();
        parms.word_weight = 0;
        parms.sl_weight = 100;
        let sl_only = score_candidate(&lang, &parms, b"cat", b"kat");
        parms.word_weight = 100;
        parms.sl_weight = 0;
        let word_only = score_candidate(&lang, &parms, b"cat", b"kat");
        assert_eq!(sl_only, 0);
        assert!(word_only > sl_only);
    }

    #[test]
    fn bad_spellers_merges_soundslike_and_slow_passes() {
        let lang = Lang::english();
        // "fone" and "phone" fold to the same soundslike key ("PH" -> "F"),
        // so only the soundslike-preset pass of the merge finds it; a plain
        // `slow` pass alone would have to lean entirely on edit distance.
        let src = source(&["phone"]);
        let parms = SuggestParms::bad_spellers();
        let list = suggest(&lang, &parms, b"fone", b"", &[], &src);
        assert!(list.items.iter().any(|s| s.word == b"phone"));
    }

    #[test]
    fn soundslike_scan_skips_the_wider_pass_once_an_exact_hit_is_found() {
        let lang = Lang::english();
        let src = source(&["cat"]);
        let parms = SuggestParms::slow();
        // "kat" shares "cat"'s soundslike key exactly (both fold to "KT"),
        // so the 1- and 2-edit soundslike passes never need to run at all.
        let hits = soundslike_candidates(&lang, &parms, b"kat", &src);
        assert!(hits.iter().any(|w| w == b"cat"));
    }
}

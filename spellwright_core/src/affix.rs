//! Affix rules: parsing the `.aff` text's `PFX`/`SFX` blocks (plus the
//! ancillary `TRY`/`REP` headers), and the three core operations:
//! `expand`, `affix_check`, and `munch`.
//!
//! The entry/class shape follows a flat `AffixEntry`/`AffixClass` split
//! addressed by index rather than pointer, with a line-oriented `.aff`
//! tokenizer; conditions are delegated to
//! [`crate::condition::ConditionTable`] instead of being recompiled
//! per entry.

use hashbrown::HashMap;

use crate::condition::ConditionTable;
use crate::dict::{CheckInfo, ComparePosition};
use crate::error::{ErrorKind, SpellError};
use crate::lang::Lang;

/// One `PFX`/`SFX` rule line: strip `strip` from the relevant edge of the
/// root and append `append`, provided the remaining root satisfies
/// `condition`. `expand` and `affix_check` are exact inverses of each
/// other under this definition: `munch(b)` round trips to `b`.
#[derive(Debug, Clone)]
pub struct AffixEntry {
    pub flag: u8,
    pub is_prefix: bool,
    pub strip: Vec<u8>,
    pub append: Vec<u8>,
    pub condition: u32,
    pub cross_product: bool,
}

impl AffixEntry {
    /// Applies this entry to `root`, returning the surface form if the
    /// remaining root (after `strip` is removed from the relevant edge)
    /// satisfies `condition`.
    fn expand_one(&self, root: &[u8], conditions: &ConditionTable) -> Option<Vec<u8>> {
        if self.is_prefix {
            if !root.starts_with(&self.strip) {
                return None;
            }
            let remainder = &root[self.strip.len()..];
            if !conditions.get(self.condition).match_edge(remainder, true) {
                return None;
            }
            let mut out = self.append.clone();
            out.extend_from_slice(remainder);
            Some(out)
        } else {
            if !root.ends_with(&self.strip) {
                return None;
            }
            let remainder = &root[..root.len() - self.strip.len()];
            if !conditions.get(self.condition).match_edge(remainder, false) {
                return None;
            }
            let mut out = remainder.to_vec();
            out.extend_from_slice(&self.append);
            Some(out)
        }
    }

    /// Inverse of `expand_one`: given a surface word, recovers the root
    /// this entry would have produced it from, if any.
    fn strip_one(&self, surface: &[u8], conditions: &ConditionTable) -> Option<Vec<u8>> {
        if self.is_prefix {
            if !surface.starts_with(&self.append) {
                return None;
            }
            let remainder = &surface[self.append.len()..];
            if !conditions.get(self.condition).match_edge(remainder, true) {
                return None;
            }
            let mut root = self.strip.clone();
            root.extend_from_slice(remainder);
            Some(root)
        } else {
            if !surface.ends_with(&self.append) {
                return None;
            }
            let remainder = &surface[..surface.len() - self.append.len()];
            if !conditions.get(self.condition).match_edge(remainder, false) {
                return None;
            }
            let mut root = remainder.to_vec();
            root.extend_from_slice(&self.strip);
            Some(root)
        }
    }
}

/// A flag's full rule set plus whether it takes part in cross-product
/// expansion with the opposite affix kind.
#[derive(Debug, Clone)]
struct AffixClass {
    flag: u8,
    is_prefix: bool,
    cross_product: bool,
    entries: Vec<u32>,
}

/// Parsed `.aff` ancillary data that belongs to `Lang`, not the affix
/// engine itself: the `TRY`/`REP` headers.
#[derive(Debug, Clone, Default)]
pub struct AffixFileExtras {
    pub try_chars: String,
    pub repl_table: Vec<(String, String)>,
}

/// The full affix engine for one language: every `PFX`/`SFX` entry,
/// bucketed by flag for `expand`/`affix_check`, plus the shared
/// condition table entries are interned into.
pub struct AffixManager {
    entries: Vec<AffixEntry>,
    conditions: ConditionTable,
    classes: HashMap<u8, AffixClass>,
}

impl AffixManager {
    pub fn new() -> AffixManager {
        AffixManager {
            entries: Vec::new(),
            conditions: ConditionTable::new(),
            classes: HashMap::new(),
        }
    }

    pub fn conditions(&self) -> &ConditionTable {
        &self.conditions
    }

    fn add_entry(&mut self, class: AffixEntry) -> u32 {
        let ix = self.entries.len() as u32;
        let flag = class.flag;
        let is_prefix = class.is_prefix;
        let cross_product = class.cross_product;
        self.entries.push(class);
        let key = self.classes.entry(flag).or_insert_with(|| AffixClass {
            flag,
            is_prefix,
            cross_product,
            entries: Vec::new(),
        });
        key.entries.push(ix);
        ix
    }

    fn entries_for(&self, flag: u8) -> &[u32] {
        self.classes.get(&flag).map(|c| c.entries.as_slice()).unwrap_or(&[])
    }

    pub fn is_cross_product(&self, flag: u8) -> bool {
        self.classes.get(&flag).map(|c| c.cross_product).unwrap_or(false)
    }

    pub fn is_prefix_flag(&self, flag: u8) -> bool {
        self.classes.get(&flag).map(|c| c.is_prefix).unwrap_or(false)
    }

    /// Parses a complete `.aff` text body. Returns the built manager plus
    /// the ancillary `Lang`-bound tables (`TRY`/`REP`).
    pub fn parse(text: &str) -> Result<(AffixManager, AffixFileExtras), SpellError> {
        let mut mgr = AffixManager::new();
        let mut extras = AffixFileExtras::default();

        let mut lines = text.lines().enumerate().peekable();
        while let Some((line_no, raw)) = lines.next() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let tag = match fields.next() {
                Some(t) => t,
                None => continue,
            };
            match tag {
                "PFX" | "SFX" => {
                    let is_prefix = tag == "PFX";
                    let flag_str = fields.next().ok_or_else(|| header_error(line_no))?;
                    let flag = parse_flag_byte(flag_str, line_no)?;
                    let cross = fields.next().ok_or_else(|| header_error(line_no))?;
                    let cross_product = cross.eq_ignore_ascii_case("Y");
                    let count_str = fields.next().ok_or_else(|| header_error(line_no))?;
                    let count: usize = count_str
                        .parse()
                        .map_err(|_| header_error(line_no))?;
                    for _ in 0..count {
                        let (body_no, body_raw) = lines.next().ok_or_else(|| header_error(line_no))?;
                        let body = strip_comment(body_raw).trim();
                        let mut bf = body.split_whitespace();
                        let btag = bf.next().ok_or_else(|| header_error(body_no))?;
                        if btag != tag {
                            return Err(SpellError::simple(
                                ErrorKind::CorruptAffix,
                                "affix rule count does not match the number of rule lines",
                            )
                            .with_file("<aff>", body_no as u32 + 1));
                        }
                        let bflag_str = bf.next().ok_or_else(|| header_error(body_no))?;
                        let bflag = parse_flag_byte(bflag_str, body_no)?;
                        if bflag != flag {
                            return Err(SpellError::simple(
                                ErrorKind::CorruptAffix,
                                "affix rule flag does not match its group header",
                            )
                            .with_file("<aff>", body_no as u32 + 1));
                        }
                        let strip_str = bf.next().ok_or_else(|| header_error(body_no))?;
                        let add_str = bf.next().ok_or_else(|| header_error(body_no))?;
                        let cond_str = bf.next().unwrap_or(".");
                        let strip = zero_or_bytes(strip_str);
                        let append = zero_or_bytes(add_str);
                        let condition = mgr
                            .conditions
                            .intern(cond_str)
                            .map_err(|e| e.with_file("<aff>", body_no as u32 + 1))?;
                        mgr.add_entry(AffixEntry {
                            flag,
                            is_prefix,
                            strip,
                            append,
                            condition,
                            cross_product,
                        });
                    }
                }
                "TRY" => {
                    extras.try_chars = fields.collect::<Vec<_>>().join("");
                }
                "REP" => {
                    if let Some(count_str) = fields.next() {
                        if let Ok(count) = count_str.parse::<usize>() {
                            for _ in 0..count {
                                if let Some((_, body_raw)) = lines.next() {
                                    let body = strip_comment(body_raw).trim();
                                    let mut bf = body.split_whitespace();
                                    if bf.next() == Some("REP") {
                                        if let (Some(from), Some(to)) = (bf.next(), bf.next()) {
                                            extras.repl_table.push((from.to_string(), to.to_string()));
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                other => {
                    // unrecognized top-level header: ignored rather than
                    // rejected, so unknown directives do not break a load.
                    log::debug!("ignoring unrecognized .aff header {other:?} at line {}", line_no + 1);
                }
            }
        }
        Ok((mgr, extras))
    }

    /// Every surface form reachable from `root` by applying one entry of
    /// each of `flags` (cross-product of a matching prefix and suffix
    /// when both allow it). Deterministic order: suffix-only forms,
    /// then prefix-only forms, then prefix+suffix combinations.
    pub fn expand(&self, root: &[u8], flags: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let mut prefix_forms: Vec<(Vec<u8>, bool)> = Vec::new();
        let mut suffix_forms: Vec<(Vec<u8>, bool)> = Vec::new();

        for &flag in flags {
            for &ix in self.entries_for(flag) {
                let entry = &self.entries[ix as usize];
                if let Some(surface) = entry.expand_one(root, &self.conditions) {
                    if entry.is_prefix {
                        prefix_forms.push((surface, entry.cross_product));
                    } else {
                        suffix_forms.push((surface, entry.cross_product));
                    }
                }
            }
        }
        for (s, _) in &suffix_forms {
            out.push(s.clone());
        }
        for (p, _) in &prefix_forms {
            out.push(p.clone());
        }
        for &flag in flags {
            for &pix in self.entries_for(flag) {
                let pentry = &self.entries[pix as usize];
                if !pentry.is_prefix || !pentry.cross_product {
                    continue;
                }
                for &flag2 in flags {
                    for &six in self.entries_for(flag2) {
                        let sentry = &self.entries[six as usize];
                        if sentry.is_prefix || !sentry.cross_product {
                            continue;
                        }
                        if let Some(mid) = sentry.expand_one(root, &self.conditions) {
                            if let Some(full) = pentry.expand_one(&mid, &self.conditions) {
                                out.push(full);
                            }
                        }
                    }
                }
            }
        }
        out
    }

    /// Strips at most one matching affix from `word` and asks `root_ok`
    /// whether the recovered root is a dictionary word carrying the
    /// entry's flag. Returns the first `CheckInfo` found, trying suffix
    /// strips before prefix strips (and single-affix forms before
    /// cross-product forms), matching `expand`'s ordering.
    ///
    /// `root_ok` is also told which edge of the recovered root is no
    /// longer the word's own boundary, so the dictionary lookup it
    /// performs can tolerate a special-byte mismatch there: a
    /// suffix-only strip leaves the root's leading edge at the word's
    /// own start (`BeginOnly`), a prefix-only strip leaves its trailing
    /// edge at the word's own end (`End`), and a cross-product strip
    /// leaves neither edge at a word boundary (`Middle`).
    pub fn affix_check<F>(&self, word: &[u8], mut root_ok: F) -> Option<CheckInfo>
    where
        F: FnMut(&[u8], u8, ComparePosition) -> bool,
    {
        for (entry_ix, entry) in self.entries.iter().enumerate() {
            if entry.is_prefix {
                continue;
            }
            if let Some(root) = entry.strip_one(word, &self.conditions) {
                if root_ok(&root, entry.flag, ComparePosition::BeginOnly) {
                    return Some(suffix_info(root, entry));
                }
            }
            let _ = entry_ix;
        }
        for entry in &self.entries {
            if !entry.is_prefix {
                continue;
            }
            if let Some(root) = entry.strip_one(word, &self.conditions) {
                if root_ok(&root, entry.flag, ComparePosition::End) {
                    return Some(prefix_info(root, entry));
                }
            }
        }
        for sentry in &self.entries {
            if sentry.is_prefix || !sentry.cross_product {
                continue;
            }
            let mid = match sentry.strip_one(word, &self.conditions) {
                Some(m) => m,
                None => continue,
            };
            for pentry in &self.entries {
                if !pentry.is_prefix || !pentry.cross_product {
                    continue;
                }
                if let Some(root) = pentry.strip_one(&mid, &self.conditions) {
                    if root_ok(&root, sentry.flag, ComparePosition::Middle) || root_ok(&root, pentry.flag, ComparePosition::Middle) {
                        let mut info = suffix_info(root, sentry);
                        info.prefix_strip_len = pentry.strip.len() as u8;
                        info.prefix_add_len = pentry.append.len() as u8;
                        return Some(info);
                    }
                }
            }
        }
        None
    }

    /// Collects every root/flag pair `word` could have come from,
    /// regardless of whether `root_ok` accepts them. Used by the
    /// dictionary-build pipeline to enumerate candidate (root, flag)
    /// pairs for a derived form.
    pub fn munch<F>(&self, word: &[u8], mut root_ok: F) -> Vec<(Vec<u8>, u8)>
    where
        F: FnMut(&[u8], u8) -> bool,
    {
        let mut out = Vec::new();
        for entry in &self.entries {
            if let Some(root) = entry.strip_one(word, &self.conditions) {
                if root_ok(&root, entry.flag) {
                    out.push((root, entry.flag));
                }
            }
        }
        out
    }
}

impl Default for AffixManager {
    fn default() -> AffixManager {
        AffixManager::new()
    }
}

fn suffix_info(root: Vec<u8>, entry: &AffixEntry) -> CheckInfo {
    let mut info = CheckInfo::simple(root);
    info.suffix_strip_len = entry.strip.len() as u8;
    info.suffix_add_len = entry.append.len() as u8;
    info
}

fn prefix_info(root: Vec<u8>, entry: &AffixEntry) -> CheckInfo {
    let mut info = CheckInfo::simple(root);
    info.prefix_strip_len = entry.strip.len() as u8;
    info.prefix_add_len = entry.append.len() as u8;
    info
}

fn zero_or_bytes(s: &str) -> Vec<u8> {
    if s == "0" {
        Vec::new()
    } else {
        s.as_bytes().to_vec()
    }
}

fn parse_flag_byte(s: &str, line_no: usize) -> Result<u8, SpellError> {
    s.as_bytes().first().copied().ok_or_else(|| {
        SpellError::simple(ErrorKind::CorruptAffix, "empty affix flag").with_file("<aff>", line_no as u32 + 1)
    })
}

fn header_error(line_no: usize) -> SpellError {
    SpellError::simple(ErrorKind::CorruptAffix, "malformed PFX/SFX header or rule line")
        .with_file("<aff>", line_no as u32 + 1)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(ix) => &line[..ix],
        None => line,
    }
}

/// Tries `expand`/`affix_check` with both `word` and its case-compensated
/// lowercase form: a `FirstUpper`/`AllUpper` word may only match
/// dictionary entries stored lowercase.
pub fn case_compensated_roots<'a>(lang: &Lang, word: &'a [u8]) -> (Vec<u8>, bool) {
    use crate::lang::CasePattern;
    match lang.case_pattern(word) {
        CasePattern::AllLower => (word.to_vec(), false),
        _ => (lang.to_lower(word), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "\
TRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ
SFX S Y 2
SFX S 0 s [^sxzh]
SFX S 0 es [sxzh]
PFX U Y 1
PFX U 0 un .
";

    #[test]
    fn suffix_expand_round_trips_through_affix_check() {
        let (mgr, extras) = AffixManager::parse(AFF).unwrap();
        assert_eq!(extras.try_chars.chars().next(), Some('e'));
        let forms = mgr.expand(b"cat", &[b'S']);
        assert!(forms.contains(&b"cats".to_vec()));

        let info = mgr
            .affix_check(b"cats", |root, flag, _| root == b"cat" && flag == b'S')
            .expect("cats should check out against cat+S");
        assert_eq!(info.root, b"cat");
        assert_eq!(info.suffix_add_len, 1);
    }

    #[test]
    fn suffix_condition_chooses_es_after_sibilant() {
        let (mgr, _) = AffixManager::parse(AFF).unwrap();
        let forms = mgr.expand(b"box", &[b'S']);
        assert!(forms.contains(&b"boxes".to_vec()));
        assert!(!forms.contains(&b"boxs".to_vec()));
    }

    #[test]
    fn prefix_expand_and_check() {
        let (mgr, _) = AffixManager::parse(AFF).unwrap();
        let forms = mgr.expand(b"happy", &[b'U']);
        assert!(forms.contains(&b"unhappy".to_vec()));

        let info = mgr
            .affix_check(b"unhappy", |root, flag, _| root == b"happy" && flag == b'U')
            .unwrap();
        assert_eq!(info.root, b"happy");
        assert_eq!(info.prefix_add_len, 2);
    }

    #[test]
    fn munch_enumerates_without_requiring_acceptance() {
        let (mgr, _) = AffixManager::parse(AFF).unwrap();
        let candidates = mgr.munch(b"cats", |_, _| true);
        assert!(candidates.iter().any(|(root, flag)| root == b"cat" && *flag == b'S'));
    }

    #[test]
    fn affix_check_rejects_when_root_not_accepted() {
        let (mgr, _) = AffixManager::parse(AFF).unwrap();
        assert!(mgr.affix_check(b"cats", |_, _, _| false).is_none());
    }
}

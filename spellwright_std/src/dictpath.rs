//! Dictionary search path resolution: `SPELLWRIGHT_DICPATH`/`DICPATH`
//! environment variables, plus a single-asterisk wildcard convention
//! for matching any `.aff`/`.dic` pair in a directory, expressed as
//! free functions over `PathBuf` instead of `String` path arithmetic
//! with an OS-conditional separator.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories to search for `.aff`/`.dic` pairs, in order: every entry
/// of `SPELLWRIGHT_DICPATH` if set, else every entry of `DICPATH`, else
/// the current directory.
pub fn search_dirs() -> Vec<PathBuf> {
    if let Some(paths) = env::var_os("SPELLWRIGHT_DICPATH") {
        return env::split_paths(&paths).collect();
    }
    if let Some(paths) = env::var_os("DICPATH") {
        return env::split_paths(&paths).collect();
    }
    vec![PathBuf::from(".")]
}

/// Finds `<dir>/<name>.<ext>` in each of `dirs`, returning the first hit.
/// `name` may itself be a path (absolute or containing a separator), in
/// which case the search directories are ignored and `<name>.<ext>` is
/// used directly. `name` may also carry a single `*` wildcard (e.g.
/// `"en_*"`), in which case each directory is listed via
/// [`list_wildcarded`] and the first (alphabetically least) match wins.
pub fn find_with_ext(name: &str, ext: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_absolute() || name.contains(std::path::MAIN_SEPARATOR) {
        let candidate = direct.with_extension(ext);
        return candidate.is_file().then_some(candidate);
    }
    if name.contains('*') {
        for dir in dirs {
            if let Some(stem) = list_wildcarded(dir, name, ext).into_iter().next() {
                return Some(dir.join(stem).with_extension(ext));
            }
        }
        return None;
    }
    for dir in dirs {
        let candidate = dir.join(name).with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Expands a single `*` wildcard in `pattern`'s file name against `dir`,
/// returning matching base names (without the trailing `.ext`). Only one
/// asterisk is honored.
pub fn list_wildcarded(dir: &Path, pattern: &str, ext: &str) -> Vec<String> {
    let mut out = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return out;
    };
    let suffix = format!(".{ext}");
    let (pre, post) = match pattern.split_once('*') {
        Some((pre, post)) => (pre, post),
        None => (pattern, ""),
    };
    for entry in entries.flatten() {
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(&suffix) else {
            continue;
        };
        if stem.starts_with(pre) && stem.ends_with(post) {
            out.push(stem.to_string());
        }
    }
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn finds_dict_by_base_name_in_search_dir() {
        let dir = std::env::temp_dir().join("spellwright_dictpath_test_find");
        let _ = fs::create_dir_all(&dir);
        File::create(dir.join("en.aff")).unwrap();
        let found = find_with_ext("en", "aff", &[dir.clone()]);
        assert_eq!(found, Some(dir.join("en.aff")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn wildcard_lists_every_matching_base_name() {
        let dir = std::env::temp_dir().join("spellwright_dictpath_test_wild");
        let _ = fs::create_dir_all(&dir);
        File::create(dir.join("en_US.aff")).unwrap();
        File::create(dir.join("en_GB.aff")).unwrap();
        File::create(dir.join("de_DE.aff")).unwrap();
        let mut found = list_wildcarded(&dir, "en_*", "aff");
        found.sort();
        assert_eq!(found, vec!["en_GB".to_string(), "en_US".to_string()]);
        let _ = fs::remove_dir_all(&dir);
    }
}

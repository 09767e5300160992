//! Explicit configuration: a plain `Config` struct plus a `commit` step
//! that validates it into a [`SpellerParms`] ready to build a
//! [`crate::speller::SpellerImpl`] from. Replaces a per-option callback
//! table with a closed struct and one validation function.
//!
//! A string-keyed `set_option` handler dispatching each `-a`-mode
//! option works for a line-oriented protocol but does not give library
//! callers a typed config object.

use crate::checker::CheckOptions;
use crate::error::{ErrorKind, SpellError};
use crate::suggest::{SuggestMode, SuggestParms};

#[derive(Debug, Clone)]
pub struct Config {
    pub lang_code: String,
    /// minimum word length checked; shorter tokens are always accepted.
    pub ignore_length: usize,
    pub ignore_case: bool,
    /// suppresses updates to the replacement dictionary from user
    /// "store replacement" calls: `store_replacement` becomes a no-op
    /// that reports success without recording anything.
    pub ignore_repl: bool,
    pub sug_mode: String,
    pub camel_case: bool,
    pub run_together: bool,
    pub run_together_limit: usize,
    pub run_together_min: usize,
    pub use_typo_analysis: Option<bool>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            lang_code: "en".to_string(),
            ignore_length: 0,
            ignore_case: false,
            ignore_repl: false,
            sug_mode: "normal".to_string(),
            camel_case: false,
            run_together: false,
            run_together_limit: 8,
            run_together_min: 3,
            use_typo_analysis: None,
        }
    }
}

/// Validated, ready-to-use configuration.
#[derive(Debug, Clone)]
pub struct SpellerParms {
    pub lang_code: String,
    pub ignore_case: bool,
    pub ignore_repl: bool,
    pub check: CheckOptions,
    pub suggest: SuggestParms,
}

/// Validates `config`, resolving `sug-mode`'s string value to a
/// [`SuggestMode`] and producing the options the checker/suggester
/// actually run with.
/// Compound components a run-together split may recurse into; spec's
/// own stated ceiling regardless of what a caller asks for.
const RUN_TOGETHER_LIMIT_MAX: usize = 8;

pub fn commit(mut config: Config) -> Result<SpellerParms, SpellError> {
    let mode = match config.sug_mode.as_str() {
        "ultra" => SuggestMode::Ultra,
        "fast" => SuggestMode::Fast,
        "normal" => SuggestMode::Normal,
        "slow" => SuggestMode::Slow,
        "bad-spellers" => SuggestMode::BadSpellers,
        "soundslike" => SuggestMode::Soundslike,
        other => {
            return Err(SpellError::new(
                ErrorKind::BadValue,
                "unknown sug-mode %0:: expected one of ultra, fast, normal, slow, bad-spellers, soundslike",
                &[other],
            ))
        }
    };
    if config.run_together_min == 0 {
        return Err(SpellError::simple(
            ErrorKind::BadValue,
            "run-together-min must be at least 1",
        ));
    }
    if config.run_together_limit < 2 && config.run_together {
        return Err(SpellError::simple(
            ErrorKind::BadValue,
            "run-together-limit must allow at least 2 components",
        ));
    }
    config.run_together_limit = config.run_together_limit.min(RUN_TOGETHER_LIMIT_MAX);

    let mut suggest = SuggestParms::for_mode(mode);
    if let Some(use_typo) = config.use_typo_analysis {
        suggest.use_typo_analysis = use_typo;
    }

    let check = CheckOptions {
        ignore_length: config.ignore_length,
        camel_case: config.camel_case,
        run_together: config.run_together,
        run_together_limit: config.run_together_limit,
        run_together_min: config.run_together_min,
        special_split: true,
    };

    Ok(SpellerParms {
        lang_code: config.lang_code,
        ignore_case: config.ignore_case,
        ignore_repl: config.ignore_repl,
        check,
        suggest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_commits_to_normal_mode() {
        let parms = commit(Config::default()).unwrap();
        assert_eq!(parms.suggest.mode, SuggestMode::Normal);
    }

    #[test]
    fn unknown_sug_mode_is_rejected() {
        let mut config = Config::default();
        config.sug_mode = "turbo".to_string();
        let err = commit(config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadValue);
    }

    #[test]
    fn zero_run_together_min_is_rejected() {
        let mut config = Config::default();
        config.run_together_min = 0;
        assert!(commit(config).is_err());
    }

    #[test]
    fn run_together_limit_is_clamped_to_eight() {
        let mut config = Config::default();
        config.run_together = true;
        config.run_together_limit = 50;
        let parms = commit(config).unwrap();
        assert_eq!(parms.check.run_together_limit, 8);
    }
}

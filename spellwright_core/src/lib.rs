//! Read-only dictionary, affix engine, and suggestion pipeline for
//! natural-language spell checking.
//!
//! The module layout mirrors the engine's own pieces rather than a
//! generic `utils`/`types` split: [`lang`] is the per-language static
//! data, [`condition`] and [`affix`] are the affix engine, [`dict`] is
//! the shared word/lookup vocabulary every dictionary kind speaks,
//! [`rod`] and [`writable`] are the dictionary kinds themselves,
//! [`checker`] is whole-word acceptance, [`edit_distance`]/[`typo`]/
//! [`suggest`] are the correction pipeline, [`config`] validates how all
//! of the above gets wired together, and [`speller`] is the facade a
//! caller actually holds.

pub mod affix;
pub mod checker;
pub mod condition;
pub mod config;
pub mod dict;
pub mod edit_distance;
pub mod error;
pub mod lang;
pub mod rod;
pub mod speller;
pub mod suggest;
pub mod typo;
pub mod writable;

pub use error::{ErrorKind, SpellError, SpellResult};
pub use speller::SpellerImpl;

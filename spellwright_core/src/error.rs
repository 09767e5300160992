//! Error kinds per the core's contract: a kind, a templated message with
//! positionally-substituted parameters, and optional file/line context.
//!
//! Generalized from "notes only printed to the user" into a real
//! `std::error::Error` so the engine can propagate load-time failures
//! instead of only reporting them.

use std::fmt;

/// Error kinds named by the core's contract (see spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadFileFormat,
    LanguageRelated,
    CantReadFile,
    CantWriteFile,
    MismatchedLanguage,
    InvalidWord,
    InvalidCond,
    InvalidCondStrip,
    CorruptAffix,
    BadValue,
    OperationNotSupported,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadFileFormat => "bad_file_format",
            ErrorKind::LanguageRelated => "language_related",
            ErrorKind::CantReadFile => "cant_read_file",
            ErrorKind::CantWriteFile => "cant_write_file",
            ErrorKind::MismatchedLanguage => "mismatched_language",
            ErrorKind::InvalidWord => "invalid_word",
            ErrorKind::InvalidCond => "invalid_cond",
            ErrorKind::InvalidCondStrip => "invalid_cond_strip",
            ErrorKind::CorruptAffix => "corrupt_affix",
            ErrorKind::BadValue => "bad_value",
            ErrorKind::OperationNotSupported => "operation_not_supported",
        }
    }
}

/// A formatted message template with `%0:`, `%1:`, ... positional markers,
/// substituted in order as parameters are supplied.
fn substitute(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '%' {
            let rest = &template[i + 1..];
            if let Some(colon) = rest.find(':') {
                if let Ok(n) = rest[..colon].parse::<usize>() {
                    if let Some(p) = params.get(n) {
                        out.push_str(p);
                        for _ in 0..colon + 1 {
                            chars.next();
                        }
                        continue;
                    }
                }
            }
        }
        out.push(c);
    }
    out
}

/// File/line context attached via the `with_file` combinator.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub file: Option<String>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SpellError {
    pub kind: ErrorKind,
    message: String,
    pub context: FileContext,
}

impl SpellError {
    pub fn new(kind: ErrorKind, template: &str, params: &[&str]) -> SpellError {
        let params: Vec<String> = params.iter().map(|s| s.to_string()).collect();
        SpellError {
            kind,
            message: substitute(template, &params),
            context: FileContext::default(),
        }
    }

    pub fn simple(kind: ErrorKind, message: &str) -> SpellError {
        SpellError {
            kind,
            message: message.to_string(),
            context: FileContext::default(),
        }
    }

    /// Attaches file/line context to an existing error, returning a new one.
    pub fn with_file(mut self, file: &str, line: u32) -> SpellError {
        self.context.file = Some(file.to_string());
        self.context.line = Some(line);
        self
    }
}

impl fmt::Display for SpellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.context.file, self.context.line) {
            (Some(file), Some(line)) => {
                write!(f, "{}:{}: {}: {}", file, line, self.kind.as_str(), self.message)
            }
            (Some(file), None) => write!(f, "{}: {}: {}", file, self.kind.as_str(), self.message),
            _ => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}

impl std::error::Error for SpellError {}

pub type SpellResult<T> = Result<T, SpellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_positional_params() {
        let e = SpellError::new(
            ErrorKind::BadValue,
            "unknown option %0: expected one of %1:",
            &["sug-mode", "ultra, fast, normal, slow"],
        );
        assert_eq!(
            e.to_string(),
            "bad_value: unknown option sug-mode: expected one of ultra, fast, normal, slow"
        );
    }

    #[test]
    fn with_file_adds_context() {
        let e = SpellError::simple(ErrorKind::CorruptAffix, "bad condition").with_file("en.aff", 42);
        assert_eq!(e.to_string(), "en.aff:42: corrupt_affix: bad condition");
    }
}

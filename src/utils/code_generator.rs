//! Short code generation and validation of user-chosen prefixes and paths.
//!
//! Generated codes are drawn uniformly from a 64-character URL-safe alphabet.
//! Prefixes and custom paths share the same charset but are case-folded.

use crate::error::{AppError, ErrorCode};
use rand::Rng;
use serde_json::json;

/// URL-safe alphabet. Contains no `.`, so a generated code can never contain
/// the custom-domain marker.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

pub const DEFAULT_CODE_LENGTH: usize = 6;

const MAX_RESERVED_ATTEMPTS: usize = 50;

/// Words a generated code must not spell (case-insensitive), as they shadow
/// top-level routes.
pub const RESERVED_WORDS: &[&str] = &[
    "line",
    "auth",
    "api",
    "dashboard",
    "admin",
    "app",
    "www",
    "ftp",
    "mail",
    "docs",
    "health",
];

/// Built-in prefixes no user may reserve as a custom domain.
pub const RESERVED_PREFIXES: &[&str] = &["www", "api", "admin", "app", "mail", "ftp", "support"];

const PREFIX_MIN_LEN: usize = 3;
const PREFIX_MAX_LEN: usize = 10;
const PATH_MIN_LEN: usize = 1;
const PATH_MAX_LEN: usize = 50;

/// Random short code source bound to one deployment's custom-domain marker.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    marker: String,
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator producing codes of [`DEFAULT_CODE_LENGTH`].
    ///
    /// `marker` is the custom-domain marker (e.g. `.s8l.xyz`); codes containing
    /// it are rejected like reserved words.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            length: DEFAULT_CODE_LENGTH,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    /// Generates a code with the thread-local RNG.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        self.generate_with(|| rng.random_range(0..ALPHABET.len()))
    }

    /// Generates a code from a caller-supplied index source.
    ///
    /// After [`MAX_RESERVED_ATTEMPTS`] rejected draws one extra character is
    /// appended, so the result may be one character longer than requested.
    /// Never fails.
    pub fn generate_with(&self, mut next_index: impl FnMut() -> usize) -> String {
        let mut draw = |len: usize| -> String {
            (0..len)
                .map(|_| ALPHABET[next_index() % ALPHABET.len()] as char)
                .collect()
        };

        let mut code = draw(self.length);
        let mut attempts = 1;

        while self.is_rejected(&code) && attempts < MAX_RESERVED_ATTEMPTS {
            code = draw(self.length);
            attempts += 1;
        }

        if self.is_rejected(&code) {
            code.push_str(&draw(1));
        }

        code
    }

    /// True if `code` is reserved or contains the custom-domain marker.
    pub fn is_rejected(&self, code: &str) -> bool {
        is_reserved_word(code) || (!self.marker.is_empty() && code.contains(&self.marker))
    }
}

/// True if `code` spells a reserved word, ignoring case.
pub fn is_reserved_word(code: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(code))
}

fn is_url_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates a custom domain prefix and returns it case-folded.
///
/// # Rules
///
/// - Length: 3-10 characters
/// - Allowed characters: letters, digits, `-`, `_`
/// - Not a built-in or configured reserved prefix
///
/// # Errors
///
/// Returns [`AppError::Validation`] with `prefix_invalid` or `prefix_reserved`.
pub fn validate_prefix(prefix: &str, extra_reserved: &[String]) -> Result<String, AppError> {
    let len = prefix.chars().count();
    if !(PREFIX_MIN_LEN..=PREFIX_MAX_LEN).contains(&len) {
        return Err(AppError::validation(
            ErrorCode::PrefixInvalid,
            "Prefix must be 3-10 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !is_url_safe(prefix) {
        return Err(AppError::validation(
            ErrorCode::PrefixInvalid,
            "Prefix can only contain letters, digits, hyphens, and underscores",
            json!({ "prefix": prefix }),
        ));
    }

    let folded = prefix.to_ascii_lowercase();

    let reserved = RESERVED_PREFIXES.contains(&folded.as_str())
        || extra_reserved
            .iter()
            .any(|word| word.eq_ignore_ascii_case(&folded));
    if reserved {
        return Err(AppError::validation(
            ErrorCode::PrefixReserved,
            "This prefix is reserved",
            json!({ "prefix": folded }),
        ));
    }

    Ok(folded)
}

/// Validates a custom path and returns it case-folded.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: letters, digits, `-`, `_`
///
/// # Errors
///
/// Returns [`AppError::Validation`] with `path_invalid`.
pub fn validate_custom_path(path: &str) -> Result<String, AppError> {
    let len = path.chars().count();
    if !(PATH_MIN_LEN..=PATH_MAX_LEN).contains(&len) {
        return Err(AppError::validation(
            ErrorCode::PathInvalid,
            "Custom path must be 1-50 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !is_url_safe(path) {
        return Err(AppError::validation(
            ErrorCode::PathInvalid,
            "Custom path can only contain letters, digits, hyphens, and underscores",
            json!({ "path": path }),
        ));
    }

    Ok(path.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generator() -> CodeGenerator {
        CodeGenerator::new(".s8l.xyz")
    }

    fn index_of(c: char) -> usize {
        ALPHABET.iter().position(|&b| b as char == c).unwrap()
    }

    #[test]
    fn test_generate_has_default_length() {
        assert_eq!(generator().generate().len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_generate_uses_alphabet_only() {
        for _ in 0..200 {
            let code = generator().generate();
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)), "{code}");
            assert!(!is_reserved_word(&code));
        }
    }

    #[test]
    fn test_generate_is_mostly_unique() {
        let codes: HashSet<_> = (0..1000).map(|_| generator().generate()).collect();
        assert!(codes.len() > 990);
    }

    #[test]
    fn test_alphabet_indices() {
        assert_eq!(index_of('a'), 26);
        assert_eq!(index_of('p'), 41);
        assert_eq!(index_of('i'), 34);
        assert_eq!(ALPHABET.iter().collect::<HashSet<_>>().len(), 64);
    }

    #[test]
    fn test_reserved_draw_is_retried() {
        // First draw spells "api", the second draw spells "abc".
        let script = [26, 41, 34, 26, 27, 28];
        let mut i = 0;
        let code = generator().with_length(3).generate_with(|| {
            let idx = script[i % script.len()];
            i += 1;
            idx
        });

        assert_eq!(code, "abc");
    }

    #[test]
    fn test_reserved_fallback_appends_character() {
        let script = [26, 41, 34];
        let mut i = 0;
        let code = generator().with_length(3).generate_with(|| {
            let idx = script[i % script.len()];
            i += 1;
            idx
        });

        assert_eq!(code, "apia");
        assert!(!is_reserved_word(&code));
    }

    #[test]
    fn test_reserved_word_is_case_insensitive() {
        assert!(is_reserved_word("API"));
        assert!(is_reserved_word("Dashboard"));
        assert!(!is_reserved_word("apis"));
    }

    #[test]
    fn test_marker_is_rejected() {
        let generator = CodeGenerator::new("-_");
        assert!(generator.is_rejected("ab-_cd"));
        assert!(!generator.is_rejected("abcdef"));
    }

    #[test]
    fn test_validate_prefix_folds_case() {
        assert_eq!(validate_prefix("AbC", &[]).unwrap(), "abc");
        assert_eq!(validate_prefix("my_team-1", &[]).unwrap(), "my_team-1");
    }

    #[test]
    fn test_validate_prefix_length() {
        let err = validate_prefix("ab", &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixInvalid);

        let err = validate_prefix("abcdefghijk", &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixInvalid);
    }

    #[test]
    fn test_validate_prefix_charset() {
        let err = validate_prefix("ab.c", &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixInvalid);
    }

    #[test]
    fn test_validate_prefix_reserved() {
        for &reserved in RESERVED_PREFIXES {
            let err = validate_prefix(&reserved.to_uppercase(), &[]).unwrap_err();
            assert_eq!(err.code(), ErrorCode::PrefixReserved, "{reserved}");
        }

        let extra = vec!["blog".to_string()];
        let err = validate_prefix("BLOG", &extra).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrefixReserved);
    }

    #[test]
    fn test_validate_custom_path() {
        assert_eq!(validate_custom_path("X").unwrap(), "x");
        assert_eq!(validate_custom_path(&"a".repeat(50)).unwrap().len(), 50);

        assert_eq!(
            validate_custom_path("").unwrap_err().code(),
            ErrorCode::PathInvalid
        );
        assert_eq!(
            validate_custom_path(&"a".repeat(51)).unwrap_err().code(),
            ErrorCode::PathInvalid
        );
        assert_eq!(
            validate_custom_path("a/b").unwrap_err().code(),
            ErrorCode::PathInvalid
        );
    }
}

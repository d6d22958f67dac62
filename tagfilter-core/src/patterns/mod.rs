//! Pattern utilities shared by the filter implementations.
//!
//! This module translates wildcard expressions into regular expressions,
//! parses `source||replacement` rule patterns, performs capture-group
//! substitution and normalizes tags for keyword matching. Compiled regexes
//! are obtained through [`PatternCache`] so the same pattern is never
//! compiled twice while it stays cached.
//!
//! License: MIT OR APACHE 2.0

pub mod cache;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, TagFilterError};

pub use cache::{PatternCache, PatternFlags, DEFAULT_CACHE_CAPACITY};

/// Delimiter separating the source from the replacement in replace rules.
pub const REPLACEMENT_DELIMITER: &str = "||";

static CAPTURE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+)").expect("capture reference regex is valid"));

/// Normalizes a tag for keyword matching: trim, lowercase, spaces to underscores.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace(' ', "_")
}

/// Translates a wildcard expression into an anchored regular expression.
///
/// * `*` matches zero or more characters.
/// * `_` matches exactly one character.
/// * `x?` makes the preceding single-character unit optional. A `?` with no
///   such unit (leading, or after `*`) is matched literally.
///
/// Every other character is matched literally.
///
/// ```
/// use tagfilter_core::patterns::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("*_hair"), "^.*.hair$");
/// assert_eq!(wildcard_to_regex("colou?r"), "^colou?r$");
/// assert_eq!(wildcard_to_regex("a.b"), r"^a\.b$");
/// ```
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    // Set when the last emitted unit matches exactly one character.
    let mut single_unit = false;
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => {
                out.push_str(".*");
                single_unit = false;
            }
            '_' => {
                out.push('.');
                single_unit = true;
            }
            '?' if single_unit => {
                out.push('?');
                single_unit = false;
            }
            _ => {
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                single_unit = true;
            }
        }
    }
    out.push('$');
    out
}

/// Splits a `source||replacement` pattern on the first delimiter.
///
/// Both halves are trimmed. Fails with `InvalidPattern` when the delimiter is absent.
pub fn parse_replacement_pattern(text: &str) -> Result<(String, String)> {
    match text.split_once(REPLACEMENT_DELIMITER) {
        Some((source, replacement)) => Ok((source.trim().to_string(), replacement.trim().to_string())),
        None => Err(TagFilterError::invalid_pattern(
            text,
            "expected format 'source||replacement'",
        )),
    }
}

/// Returns true if the text contains any regex metacharacter.
pub fn is_regex_pattern(text: &str) -> bool {
    const REGEX_CHARS: &str = r".*+?^${}[]|()";
    text.chars().any(|c| REGEX_CHARS.contains(c))
}

/// Returns true if the text compiles as a regular expression.
pub fn validate_regex_pattern(text: &str) -> bool {
    Regex::new(text).is_ok()
}

/// Escapes every regex metacharacter so the text matches itself literally.
pub fn escape_for_literal_match(text: &str) -> String {
    regex::escape(text)
}

/// Prefixes the pattern with an inline case-insensitivity flag.
pub fn create_case_insensitive_pattern(pattern: &str) -> String {
    format!("(?i){}", pattern)
}

/// Compiles a pattern through the process-wide cache.
pub fn compile_pattern(pattern: &str, flags: PatternFlags) -> Result<Regex> {
    PatternCache::global().get_compiled_pattern(pattern, flags)
}

/// Matches `text` against a wildcard expression.
///
/// The compiled expression is applied with a match that must begin at the
/// start of `text`; the `^…$` anchors produced by [`wildcard_to_regex`] make
/// this a whole-string match on both the case-sensitive and the
/// case-insensitive path.
pub fn match_with_wildcards(
    text: &str,
    pattern: &str,
    case_sensitive: bool,
    cache: &PatternCache,
) -> Result<bool> {
    let mut regex_pattern = wildcard_to_regex(pattern);
    let flags = if case_sensitive {
        PatternFlags::NONE
    } else {
        regex_pattern = create_case_insensitive_pattern(&regex_pattern);
        PatternFlags::IGNORE_CASE
    };
    let compiled = cache.get_compiled_pattern(&regex_pattern, flags)?;
    Ok(compiled.find(text).is_some_and(|m| m.start() == 0))
}

/// Rewrites `$N` placeholders into the `${N}` form understood by `regex`.
///
/// A `$` that is not followed by digits is emitted as a literal dollar sign.
pub fn capture_template(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 8);
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        if digits.is_empty() {
            out.push_str("$$");
        } else {
            out.push_str("${");
            out.push_str(&digits);
            out.push('}');
        }
    }
    out
}

/// Lists the capture-group numbers referenced as `$N` in a replacement.
pub fn capture_references(replacement: &str) -> Vec<usize> {
    CAPTURE_REFERENCE
        .captures_iter(replacement)
        .filter_map(|cap| cap.get(1)?.as_str().parse().ok())
        .collect()
}

/// Substitutes the first match of `pattern` in `text` with `replacement`.
///
/// `$1`, `$2`, ... in the replacement refer to the pattern's capture groups.
///
/// ```
/// use tagfilter_core::patterns::{substitute_with_capture, PatternCache};
///
/// let cache = PatternCache::new(8);
/// let out = substitute_with_capture("red_hair", r"(.*)_hair", "$1_bald", &cache).unwrap();
/// assert_eq!(out, "red_bald");
/// ```
pub fn substitute_with_capture(
    text: &str,
    pattern: &str,
    replacement: &str,
    cache: &PatternCache,
) -> Result<String> {
    let compiled = cache.get_compiled_pattern(pattern, PatternFlags::NONE)?;
    let template = capture_template(replacement);
    Ok(compiled.replace(text, template.as_str()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_pattern_goes_through_global_cache() {
        let first = compile_pattern("^global_cache_tag_[0-9]+$", PatternFlags::NONE).unwrap();
        let second = compile_pattern("^global_cache_tag_[0-9]+$", PatternFlags::NONE).unwrap();
        assert!(PatternCache::global().contains("^global_cache_tag_[0-9]+$", PatternFlags::NONE));
        assert_eq!(first.as_str(), second.as_str());
        assert!(first.is_match("global_cache_tag_42"));
    }

    #[test]
    fn wildcard_translation_escapes_literals() {
        assert_eq!(wildcard_to_regex("test*ing"), "^test.*ing$");
        assert_eq!(wildcard_to_regex("a+b"), r"^a\+b$");
        assert_eq!(wildcard_to_regex("red_?"), "^red.?$");
        assert_eq!(wildcard_to_regex("?x"), r"^\?x$");
        assert_eq!(wildcard_to_regex("*?"), r"^.*\?$");
    }

    #[test]
    fn wildcard_matching_is_whole_string() {
        let cache = PatternCache::new(16);
        assert!(match_with_wildcards("red_hair", "*_hair", true, &cache).unwrap());
        assert!(!match_with_wildcards("blue_eyes", "*_hair", true, &cache).unwrap());
        assert!(!match_with_wildcards("red_hair_long", "*_hair", true, &cache).unwrap());
        assert!(match_with_wildcards("color", "colou?r", true, &cache).unwrap());
        assert!(match_with_wildcards("colour", "colou?r", true, &cache).unwrap());
        assert!(!match_with_wildcards("colouur", "colou?r", true, &cache).unwrap());
    }

    #[test]
    fn wildcard_matching_case_insensitive() {
        let cache = PatternCache::new(16);
        assert!(!match_with_wildcards("RED_HAIR", "*_hair", true, &cache).unwrap());
        assert!(match_with_wildcards("RED_HAIR", "*_hair", false, &cache).unwrap());
        assert!(!match_with_wildcards("RED_HAIR_X", "*_hair", false, &cache).unwrap());
    }

    #[test]
    fn underscore_matches_exactly_one_character() {
        let cache = PatternCache::new(16);
        assert!(match_with_wildcards("a-b", "a_b", true, &cache).unwrap());
        assert!(!match_with_wildcards("ab", "a_b", true, &cache).unwrap());
        assert!(!match_with_wildcards("a--b", "a_b", true, &cache).unwrap());
    }

    #[test]
    fn parse_replacement_pattern_splits_on_first_delimiter() {
        assert_eq!(
            parse_replacement_pattern("a||b").unwrap(),
            ("a".to_string(), "b".to_string())
        );
        assert_eq!(
            parse_replacement_pattern(" red_hair || blue_hair ").unwrap(),
            ("red_hair".to_string(), "blue_hair".to_string())
        );
        assert_eq!(
            parse_replacement_pattern("a||b||c").unwrap(),
            ("a".to_string(), "b||c".to_string())
        );
    }

    #[test]
    fn parse_replacement_pattern_requires_delimiter() {
        let err = parse_replacement_pattern("no_delimiter").unwrap_err();
        assert!(matches!(err, TagFilterError::InvalidPattern { .. }));
    }

    #[test]
    fn capture_substitution_replaces_first_match_only() {
        let cache = PatternCache::new(16);
        assert_eq!(
            substitute_with_capture("thing_old", "(.*)_old", "$1_new", &cache).unwrap(),
            "thing_new"
        );
        assert_eq!(
            substitute_with_capture("a1b2", r"(\d)", "<$1>", &cache).unwrap(),
            "a<1>b2"
        );
    }

    #[test]
    fn capture_template_keeps_stray_dollars_literal() {
        assert_eq!(capture_template("$1_new"), "${1}_new");
        assert_eq!(capture_template("cost$"), "cost$$");
        assert_eq!(capture_template("$x$12"), "$$x${12}");

        let cache = PatternCache::new(4);
        assert_eq!(
            substitute_with_capture("price", "(price)", "$$1", &cache).unwrap(),
            "$price"
        );
    }

    #[test]
    fn capture_references_are_listed() {
        assert_eq!(capture_references("$1 and $2, $10"), vec![1, 2, 10]);
        assert!(capture_references("plain").is_empty());
    }

    #[test]
    fn normalize_tag_trims_lowercases_and_joins_words() {
        assert_eq!(normalize_tag("  Long Hair "), "long_hair");
        assert_eq!(normalize_tag("NSFW"), "nsfw");
    }

    #[test]
    fn regex_helpers() {
        assert!(!is_regex_pattern("simple_tag"));
        assert!(is_regex_pattern(".*_hair"));
        assert!(is_regex_pattern("tag[0-9]+"));
        assert!(validate_regex_pattern(r"\b(nude|naked)\b"));
        assert!(!validate_regex_pattern("[unclosed"));
        assert_eq!(escape_for_literal_match("a.b"), r"a\.b");
        assert_eq!(create_case_insensitive_pattern("abc"), "(?i)abc");
    }
}

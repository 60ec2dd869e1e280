//! Name derivation: URL-safe slugs and display titles from archive file stems.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Slug used when a stem has no usable characters at all.
pub const FALLBACK_SLUG: &str = "template";

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern"));
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_-]+").expect("Invalid regex pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]\S*").expect("Invalid regex pattern"));

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Turn arbitrary text into a URL-safe identifier.
///
/// Diacritics are stripped after NFKD decomposition, `&` becomes `and`, and every run
/// of characters outside `[a-z0-9]` collapses to one hyphen. Never returns an empty
/// string: input without any usable character yields [`FALLBACK_SLUG`].
///
/// ```text
/// "Café & Bar"     → "cafe-and-bar"
/// "My_Cool_Site"   → "my-cool-site"
/// "***"            → "template"
/// ```
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace('&', " and ");

    let slug = NON_ALNUM_RUN.replace_all(&folded, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Turn a file stem into a human-readable title: separators become single spaces and
/// each word is capitalised (`my-cool_site` → `My Cool Site`).
pub fn humanize(file_stem: &str) -> String {
    let spaced = SEPARATOR_RUN.replace_all(file_stem, " ");
    let spaced = WHITESPACE_RUN.replace_all(&spaced, " ");

    WORD.replace_all(spaced.trim(), |caps: &Captures| {
        let mut chars = caps[0].chars();
        let Some(first) = chars.next() else {
            return String::new();
        };
        let mut word: String = first.to_uppercase().collect();
        word.push_str(&chars.as_str().to_lowercase());
        word
    })
    .into_owned()
}

/// Escape a value for embedding inside a double-quoted YAML scalar.
pub fn escape_double_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

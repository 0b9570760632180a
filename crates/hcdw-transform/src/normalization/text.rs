//! Free-text normalization.

use std::sync::LazyLock;

use regex::Regex;

static DEPT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bDept\b").expect("department token pattern"));

/// Normalizes a free-text value.
///
/// Absent values become the empty string. Characters other than ASCII
/// letters, ASCII digits and whitespace are removed, every whitespace-delimited
/// word is title-cased (first character upper, rest lower) and surrounding
/// whitespace is trimmed. The output is a fixed point of this function.
pub fn normalize_text(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut normalized = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            normalized.push(ch);
            word_start = true;
        } else if ch.is_ascii_alphanumeric() {
            if word_start {
                normalized.push(ch.to_ascii_uppercase());
            } else {
                normalized.push(ch.to_ascii_lowercase());
            }
            word_start = false;
        }
    }
    normalized.trim().to_string()
}

/// Like [`normalize_text`], but an empty result means "no value".
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    let normalized = normalize_text(value);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Expands the abbreviated `Dept` token of a normalized department name.
pub fn expand_department(value: &str) -> String {
    DEPT_TOKEN.replace_all(value, "Department").into_owned()
}

//! Identifier, name and description scrubbing.

use crate::models::statement::UNKNOWN;

/// Keep only alphanumerics; `"unknown"` when nothing is left.
pub fn clean_identifier(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if cleaned.is_empty() {
        UNKNOWN.to_string()
    } else {
        cleaned
    }
}

/// Keep alphanumerics and interior spaces, condensing runs of whitespace.
pub fn clean_bank_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let condensed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if condensed.is_empty() {
        UNKNOWN.to_string()
    } else {
        condensed
    }
}

/// Collapse whitespace in a free-text description.
pub fn clean_description(raw: &str) -> String {
    let condensed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if condensed.is_empty() {
        UNKNOWN.to_string()
    } else {
        condensed
    }
}

/// Whether a field holds something other than the unknown sentinel.
pub fn is_known(value: &str) -> bool {
    !value.is_empty() && value != UNKNOWN
}

//! Editor-side input restrictions.
//!
//! These mirror what the D-Script editor enforces while the user types.
//! The validator never relies on them: text that slips past the filter is
//! simply reported as invalid commands.

use crate::script::validator::MAX_LINES;

/// True iff `text` is non-empty and contains only `A`-`Z` and whitespace.
pub fn is_allowed_input(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
}

/// Decides what the editor buffer becomes after an edit.
///
/// A proposal with disallowed characters is rejected (the previous buffer is
/// kept) unless it is blank.  Accepted text is cut to its first
/// `MAX_LINES` raw lines.
pub fn filter_edit(previous: &str, proposed: &str) -> String {
    if !is_allowed_input(proposed) && !proposed.trim().is_empty() {
        return previous.to_owned();
    }

    let line_count = proposed.split('\n').count();
    if line_count <= MAX_LINES {
        proposed.to_owned()
    } else {
        proposed.split('\n').take(MAX_LINES).collect::<Vec<_>>().join("\n")
    }
}

use serde::{Deserialize, Serialize};

/// One non-blank line of a D-Script.
///
/// `number` is 1-based and counts only non-blank lines, so a blank line in
/// the editor does not shift the numbers used in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub number: usize,
    pub text: String,
}

impl ScriptLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        ScriptLine { number, text: text.into() }
    }
}

/// Splits raw editor text into trimmed, non-blank lines.
///
/// Blank lines are dropped entirely.  Trailing `\r` from Windows line endings
/// goes away with the per-line trim.  Never fails; empty input yields an
/// empty `Vec`.
pub fn tokenize(source: &str) -> Vec<ScriptLine> {
    source
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, text)| ScriptLine::new(index + 1, text))
        .collect()
}

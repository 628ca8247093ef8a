use serde::{Deserialize, Serialize};

use crate::script::command::{Command, LineIssue, LinePosition};
use crate::script::line::{tokenize, ScriptLine};

pub const MIN_LINES: usize = 5;
pub const MAX_LINES: usize = 10;
pub const MIN_DEFAULT_LAYERS: usize = 2;
pub const MAX_DEFAULT_LAYERS: usize = 4;
pub const MIN_SPECIAL_LAYERS: usize = 1;
pub const MAX_SPECIAL_LAYERS: usize = 4;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every problem the validator can report.
///
/// The `Display` output is the exact message shown to the user; line-tagged
/// variants are prefixed with `Line <n>: `.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("Script must have at least 5 lines (including INITIATEMYNETWORK and RUNMEPLEASE)")]
    TooFewLines,
    #[error("Script exceeds maximum of 10 lines")]
    TooManyLines,
    #[error("Line {line}: Must start with INITIATEMYNETWORK")]
    MustStartWithInit { line: usize },
    #[error("Line {line}: Invalid network type. Use IRISSCANNING, IMAGERECOG, or CLIMATEPRED")]
    InvalidNetworkType { line: usize },
    #[error("Line {line}: Last line must be RUNMEPLEASE")]
    LastLineNotRun { line: usize },
    #[error("Line {line}: Maximum 4 default layers allowed")]
    TooManyDefaultLayers { line: usize },
    #[error("Line {line}: Maximum 4 special layers allowed")]
    TooManySpecialLayers { line: usize },
    #[error("Line {line}: Invalid command. Use ADDONELAYER or ADDSPECIALLAYER")]
    InvalidCommand { line: usize },
    #[error("Script must have at least 2 default layers (ADDONELAYER)")]
    TooFewDefaultLayers,
    #[error("Script must have at least 1 special layer (ADDSPECIALLAYER)")]
    TooFewSpecialLayers,
    #[error("Missing INITIATEMYNETWORK command")]
    MissingInit,
    #[error("Missing RUNMEPLEASE command as the last line")]
    MissingRun,
}

impl ScriptError {
    /// The 1-based line this error is tagged with, or `None` for whole-script
    /// errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::MustStartWithInit { line }
            | ScriptError::InvalidNetworkType { line }
            | ScriptError::LastLineNotRun { line }
            | ScriptError::TooManyDefaultLayers { line }
            | ScriptError::TooManySpecialLayers { line }
            | ScriptError::InvalidCommand { line } => Some(*line),
            ScriptError::TooFewLines
            | ScriptError::TooManyLines
            | ScriptError::TooFewDefaultLayers
            | ScriptError::TooFewSpecialLayers
            | ScriptError::MissingInit
            | ScriptError::MissingRun => None,
        }
    }

    fn from_issue(issue: LineIssue, line: usize) -> ScriptError {
        match issue {
            LineIssue::MissingInitKeyword => ScriptError::MustStartWithInit { line },
            LineIssue::InvalidNetworkType => ScriptError::InvalidNetworkType { line },
            LineIssue::NotRun => ScriptError::LastLineNotRun { line },
            LineIssue::UnknownLayerCommand => ScriptError::InvalidCommand { line },
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of validating a script, in the shape the editor consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: &[ScriptError]) -> Self {
        ValidationResult {
            is_valid: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Whether any error is tagged with `line` (used to draw per-line
    /// markers next to the editor gutter).
    pub fn has_line_error(&self, line: usize) -> bool {
        let tag = format!("Line {}:", line);
        self.errors.iter().any(|e| e.starts_with(&tag))
    }
}

// ---------------------------------------------------------------------------
// Rule engine
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tally {
    has_init: bool,
    has_run: bool,
    default_layers: usize,
    special_layers: usize,
}

/// Validates raw script text.
pub fn validate(source: &str) -> ValidationResult {
    let errors = validate_lines(&tokenize(source));
    ValidationResult::from_errors(&errors)
}

/// Applies the full D-Script grammar to already tokenized lines and returns
/// every error in report order: line-count bounds, then per-line errors in
/// document order, then the trailing whole-script checks.
pub fn validate_lines(lines: &[ScriptLine]) -> Vec<ScriptError> {
    let mut errors = Vec::new();

    if lines.len() < MIN_LINES {
        errors.push(ScriptError::TooFewLines);
    }
    if lines.len() > MAX_LINES {
        errors.push(ScriptError::TooManyLines);
    }

    let mut tally = Tally::default();

    for (index, line) in lines.iter().enumerate() {
        let position = LinePosition::of(index, lines.len());
        match Command::parse(position, &line.text) {
            Ok(Command::Init { .. }) => tally.has_init = true,
            Ok(Command::Run) => tally.has_run = true,
            Ok(Command::AddDefaultLayer) => {
                tally.default_layers += 1;
                if tally.default_layers > MAX_DEFAULT_LAYERS {
                    errors.push(ScriptError::TooManyDefaultLayers { line: line.number });
                }
            }
            Ok(Command::AddSpecialLayer) => {
                tally.special_layers += 1;
                if tally.special_layers > MAX_SPECIAL_LAYERS {
                    errors.push(ScriptError::TooManySpecialLayers { line: line.number });
                }
            }
            Err(issue) => errors.push(ScriptError::from_issue(issue, line.number)),
        }
    }

    if tally.default_layers < MIN_DEFAULT_LAYERS {
        errors.push(ScriptError::TooFewDefaultLayers);
    }
    if tally.special_layers < MIN_SPECIAL_LAYERS {
        errors.push(ScriptError::TooFewSpecialLayers);
    }
    if !tally.has_init {
        errors.push(ScriptError::MissingInit);
    }
    if !tally.has_run {
        errors.push(ScriptError::MissingRun);
    }

    log::debug!(
        "validated {} line(s): {} error(s), {} default / {} special layer(s)",
        lines.len(),
        errors.len(),
        tally.default_layers,
        tally.special_layers
    );

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: &[&str]) -> String {
        lines.join("\n")
    }

    #[test]
    fn minimal_script_is_valid() {
        let result = validate(&script(&[
            "INITIATEMYNETWORK IRISSCANNING",
            "ADDONELAYER",
            "ADDONELAYER",
            "ADDSPECIALLAYER",
            "RUNMEPLEASE",
        ]));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn empty_script_reports_every_whole_script_error_in_order() {
        let errors = validate_lines(&[]);
        assert_eq!(
            errors,
            vec![
                ScriptError::TooFewLines,
                ScriptError::TooFewDefaultLayers,
                ScriptError::TooFewSpecialLayers,
                ScriptError::MissingInit,
                ScriptError::MissingRun,
            ]
        );
    }

    #[test]
    fn single_line_is_only_checked_as_init() {
        let errors = validate_lines(&tokenize("RUNMEPLEASE"));
        assert!(errors.contains(&ScriptError::MustStartWithInit { line: 1 }));
        assert!(!errors.iter().any(|e| matches!(e, ScriptError::LastLineNotRun { .. })));
        assert!(errors.contains(&ScriptError::MissingRun));
    }

    #[test]
    fn two_line_script_checks_second_line_as_run() {
        let errors = validate_lines(&tokenize("INITIATEMYNETWORK IMAGERECOG\nRUNMEPLEASE"));
        assert_eq!(
            errors,
            vec![
                ScriptError::TooFewLines,
                ScriptError::TooFewDefaultLayers,
                ScriptError::TooFewSpecialLayers,
            ]
        );

        let errors = validate_lines(&tokenize("INITIATEMYNETWORK IMAGERECOG\nADDONELAYER"));
        assert!(errors.contains(&ScriptError::LastLineNotRun { line: 2 }));
    }

    #[test]
    fn every_layer_past_the_maximum_is_reported() {
        let errors = validate_lines(&tokenize(&script(&[
            "INITIATEMYNETWORK CLIMATEPRED",
            "ADDSPECIALLAYER",
            "ADDSPECIALLAYER",
            "ADDSPECIALLAYER",
            "ADDSPECIALLAYER",
            "ADDSPECIALLAYER",
            "ADDSPECIALLAYER",
            "ADDONELAYER",
            "ADDONELAYER",
            "RUNMEPLEASE",
        ])));
        assert_eq!(
            errors,
            vec![
                ScriptError::TooManySpecialLayers { line: 6 },
                ScriptError::TooManySpecialLayers { line: 7 },
            ]
        );
    }

    #[test]
    fn line_numbers_skip_blank_lines() {
        let result = validate("INITIATEMYNETWORK IRISSCANNING\n\nADDONELAYER\n\nFOO\nADDONELAYER\nADDSPECIALLAYER\nRUNMEPLEASE");
        assert_eq!(
            result.errors,
            vec!["Line 3: Invalid command. Use ADDONELAYER or ADDSPECIALLAYER".to_owned()]
        );
        assert!(result.has_line_error(3));
        assert!(!result.has_line_error(5));
    }

    #[test]
    fn error_line_tags() {
        assert_eq!(ScriptError::InvalidCommand { line: 4 }.line(), Some(4));
        assert_eq!(ScriptError::MissingRun.line(), None);
        assert_eq!(
            ScriptError::TooManyDefaultLayers { line: 7 }.to_string(),
            "Line 7: Maximum 4 default layers allowed"
        );
    }

    #[test]
    fn result_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(validate("")).unwrap();
        assert_eq!(json["isValid"], serde_json::Value::Bool(false));
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(5));
    }
}

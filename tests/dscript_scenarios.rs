//! End-to-end tests for the D-Script front end: validation, extraction and
//! the simulated run that consumes the extracted configuration.

use ferrite_dscript::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TOO_FEW_LINES: &str = "Script must have at least 5 lines (including INITIATEMYNETWORK and RUNMEPLEASE)";
const TOO_MANY_LINES: &str = "Script exceeds maximum of 10 lines";
const INVALID_TYPE_LINE_1: &str = "Line 1: Invalid network type. Use IRISSCANNING, IMAGERECOG, or CLIMATEPRED";
const TOO_FEW_DEFAULT: &str = "Script must have at least 2 default layers (ADDONELAYER)";
const TOO_FEW_SPECIAL: &str = "Script must have at least 1 special layer (ADDSPECIALLAYER)";
const MISSING_RUN: &str = "Missing RUNMEPLEASE command as the last line";

fn script(lines: &[&str]) -> String {
    lines.join("\n")
}

fn has(result: &ValidationResult, message: &str) -> bool {
    result.errors.iter().any(|e| e == message)
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_minimal_iris_script() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);

    let result = validate(&source);
    assert!(result.is_valid);
    assert!(result.errors.is_empty());

    let config = extract_config(&source);
    assert_eq!(config.network_type, Some(NetworkKind::IrisScanning));
    assert_eq!(config.default_layer_count, 2);
    assert_eq!(config.special_layer_count, 1);
    assert_eq!(config.metrics_key(), "IRISSCANNING-2-1");
}

#[test]
fn test_four_lines_without_network_type() {
    let result = validate("INITIATEMYNETWORK\nADDONELAYER\nADDSPECIALLAYER\nRUNMEPLEASE");
    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec![
            TOO_FEW_LINES.to_owned(),
            INVALID_TYPE_LINE_1.to_owned(),
            TOO_FEW_DEFAULT.to_owned(),
            "Missing INITIATEMYNETWORK command".to_owned(),
        ]
    );
}

#[test]
fn test_fifth_default_layer_reported_at_its_line() {
    let source = script(&[
        "INITIATEMYNETWORK IMAGERECOG",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    let result = validate(&source);
    assert_eq!(
        result.errors,
        vec![
            "Line 6: Maximum 4 default layers allowed".to_owned(),
            "Line 7: Maximum 4 default layers allowed".to_owned(),
        ]
    );
    for line in 2..=5 {
        assert!(!result.has_line_error(line), "line {} should be clean", line);
    }
}

#[test]
fn test_misspelled_run_command() {
    let source = script(&[
        "INITIATEMYNETWORK CLIMATEPRED",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASENOW",
    ]);
    let result = validate(&source);
    assert_eq!(
        result.errors,
        vec!["Line 5: Last line must be RUNMEPLEASE".to_owned(), MISSING_RUN.to_owned()]
    );
}

// =============================================================================
// Line-count bounds
// =============================================================================

#[test]
fn test_exactly_ten_lines_is_accepted() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    assert!(validate(&source).is_valid);

    let config = extract_config(&source);
    assert_eq!((config.default_layer_count, config.special_layer_count), (4, 4));
}

#[test]
fn test_eleven_lines_is_rejected() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    let result = validate(&source);
    assert_eq!(result.errors[0], TOO_MANY_LINES);
    assert!(has(&result, "Line 10: Maximum 4 special layers allowed"));
}

#[test]
fn test_blank_lines_do_not_count() {
    let source = "\n\nINITIATEMYNETWORK IRISSCANNING\n\n\nADDONELAYER\n   \nADDONELAYER\nADDSPECIALLAYER\n\nRUNMEPLEASE\n\n\n\n\n\n\n";
    assert!(validate(source).is_valid);
    assert_eq!(extract_config(source).metrics_key(), "IRISSCANNING-2-1");
}

#[test]
fn test_every_short_script_reports_lower_bound() {
    let lines = ["INITIATEMYNETWORK IRISSCANNING", "ADDONELAYER", "ADDONELAYER", "RUNMEPLEASE"];
    for n in 0..=lines.len() {
        let result = validate(&script(&lines[..n]));
        assert!(has(&result, TOO_FEW_LINES), "{} line(s)", n);
        assert!(!has(&result, TOO_MANY_LINES));
    }
}

// =============================================================================
// Init line
// =============================================================================

#[test]
fn test_init_keyword_required_on_line_one() {
    for first in ["RUNMEPLEASE", "ADDONELAYER", "INITIATE IRISSCANNING", "initiatemynetwork IRISSCANNING"] {
        let source = script(&[first, "ADDONELAYER", "ADDONELAYER", "ADDSPECIALLAYER", "RUNMEPLEASE"]);
        let result = validate(&source);
        assert!(has(&result, "Line 1: Must start with INITIATEMYNETWORK"), "{}", first);
        assert!(!has(&result, INVALID_TYPE_LINE_1));
    }
}

#[test]
fn test_unknown_network_types() {
    for first in ["INITIATEMYNETWORK WEATHER", "INITIATEMYNETWORK irisscanning", "INITIATEMYNETWORK  IMAGERECOG"] {
        let source = script(&[first, "ADDONELAYER", "ADDONELAYER", "ADDSPECIALLAYER", "RUNMEPLEASE"]);
        let result = validate(&source);
        assert!(has(&result, INVALID_TYPE_LINE_1), "{}", first);
        assert_eq!(extract_config(&source).network_type, None);
    }
}

#[test]
fn test_trailing_tokens_after_type_are_ignored() {
    let source = script(&[
        "INITIATEMYNETWORK IMAGERECOG PLEASE",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    assert!(validate(&source).is_valid);
    assert_eq!(extract_config(&source).network_type, Some(NetworkKind::ImageRecog));
}

// =============================================================================
// Middle lines
// =============================================================================

#[test]
fn test_out_of_charset_text_is_an_invalid_command() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDONELAYER",
        "addonelayer",
        "ADDONELAYER;",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    let result = validate(&source);
    assert_eq!(
        result.errors,
        vec![
            "Line 3: Invalid command. Use ADDONELAYER or ADDSPECIALLAYER".to_owned(),
            "Line 4: Invalid command. Use ADDONELAYER or ADDSPECIALLAYER".to_owned(),
        ]
    );
}

#[test]
fn test_layer_minimums_are_independent_of_line_count() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "ADDSPECIALLAYER",
        "RUNMEPLEASE",
    ]);
    let result = validate(&source);
    assert_eq!(result.errors, vec![TOO_FEW_DEFAULT.to_owned()]);

    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "RUNMEPLEASE",
    ]);
    assert_eq!(validate(&source).errors, vec![TOO_FEW_SPECIAL.to_owned()]);
}

#[test]
fn test_run_in_the_middle_is_invalid() {
    let source = script(&[
        "INITIATEMYNETWORK IRISSCANNING",
        "RUNMEPLEASE",
        "ADDONELAYER",
        "ADDONELAYER",
        "ADDSPECIALLAYER",
    ]);
    let result = validate(&source);
    assert!(has(&result, "Line 2: Invalid command. Use ADDONELAYER or ADDSPECIALLAYER"));
    assert!(has(&result, "Line 5: Last line must be RUNMEPLEASE"));
    assert!(has(&result, TOO_FEW_SPECIAL));
    assert!(has(&result, MISSING_RUN));
}

// =============================================================================
// Extraction feeds the simulator
// =============================================================================

#[test]
fn test_run_script_uses_extracted_config() {
    let source = script(&[
        "INITIATEMYNETWORK IMAGERECOG",
        "ADDSPECIALLAYER",
        "ADDONELAYER",
        "ADDONELAYER",
        "RUNMEPLEASE",
    ]);
    let sim = SimulationConfig::instant(Rounds::new(5).unwrap());
    let run = run_script(&source, &sim, &mut StdRng::seed_from_u64(11)).unwrap();

    assert_eq!(run.config.metrics_key(), "IMAGERECOG-2-1");
    assert_eq!(run.outcome.metrics.accuracy, 83.4);
    assert_eq!(run.outcome.metrics.epochs, vec![1, 2, 3, 4, 5]);
    assert_eq!(run.outcome.rounds_completed, 5);
    assert!(run.outcome.metrics.verdict.starts_with("Nice work!"));
}

#[test]
fn test_run_script_rejects_invalid_input() {
    let sim = SimulationConfig::instant(Rounds::default());
    let err = run_script("", &sim, &mut StdRng::seed_from_u64(0)).unwrap_err();
    match err {
        Error::InvalidScript(errors) => assert_eq!(errors.len(), 5),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_example_script_is_valid() {
    assert!(validate(EXAMPLE_SCRIPT).is_valid);
}

#[test]
fn test_builder_script_round_trips_through_validator() {
    let mut builder = NetworkBuilder::new();
    builder.initiate(NetworkKind::ClimatePred);
    builder.add_layer(LayerKind::Default).unwrap();
    builder.add_layer(LayerKind::Special).unwrap();
    builder.add_layer(LayerKind::Default).unwrap();

    let source = builder.to_script();
    assert!(validate(&source).is_valid);
    assert_eq!(extract_config(&source), builder.to_config().unwrap());
}

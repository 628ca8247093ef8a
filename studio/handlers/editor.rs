use std::io::{self, Cursor};
use tiny_http::{Request, Response};

use ferrite_dscript::{extract_config, filter_edit, ValidationResult, EXAMPLE_SCRIPT};

use crate::handlers::run::{build_results_html, start_run};
use crate::render::{build_rounds_options, html_escape, render_flash_html, render_page, Page};
use crate::routes::{bad_request, read_body, redirect};
use crate::state::{lock, FlashMessage, RunSource, SharedState, StudioState};
use crate::util::form::{form_get, parse_form, parse_rounds};

// ---------------------------------------------------------------------------
// GET /editor
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    let flash      = st.take_flash();
    let script     = st.script.clone();
    let rounds     = st.rounds;
    let validation = st.validation();
    let running    = st.run.is_running();
    let results    = build_results_html(&st.run, &st.round_history, RunSource::Editor);
    drop(st);

    let can_run = validation.is_valid && !running && !script.trim().is_empty();

    let page = render_page(Page::Editor, running, |tmpl| {
        tmpl
            .replace("{{FLASH_EDITOR}}", &render_flash_html(flash.as_ref()))
            .replace("{{EDITOR_SCRIPT}}", &html_escape(&script))
            .replace("{{EDITOR_GUTTER}}", &build_gutter(&script, &validation))
            .replace("{{EDITOR_ERRORS}}", &build_error_list(&validation))
            .replace("{{ROUNDS_OPTIONS}}", &build_rounds_options(rounds))
            .replace("{{RUN_DISABLED}}", if can_run { "" } else { "disabled" })
            .replace("{{EDITOR_RESULTS}}", &results)
    });
    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// POST /editor/save
// ---------------------------------------------------------------------------

/// Applies an edit to the buffer through the editor's input filter and
/// stores the selected rounds.
pub fn handle_save(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let body = read_body(request);
    let mut st = lock(&state);
    if let Err(message) = apply_save(&mut st, body) {
        return bad_request(message);
    }
    drop(st);

    redirect("/editor")
}

/// Form fields: `script` and `rounds`, each optional. A field that is
/// absent leaves the matching piece of state alone.
fn apply_save(st: &mut StudioState, body: io::Result<String>) -> Result<(), &'static str> {
    let body = body.map_err(|_| "Request body must be UTF-8 form data.")?;
    let pairs = parse_form(&body);

    if let Some(raw) = form_get(&pairs, "script") {
        let proposed = raw.replace("\r\n", "\n");
        let accepted = filter_edit(&st.script, &proposed);
        if accepted != proposed {
            let text = if accepted == st.script {
                "Only uppercase letters, spaces and new lines are allowed."
            } else {
                "Scripts are limited to 10 lines; extra lines were dropped."
            };
            st.flash = Some(FlashMessage::error(text));
        }
        st.script = accepted;
    }

    if let Some(raw) = form_get(&pairs, "rounds") {
        match parse_rounds(raw) {
            Ok(rounds) => {
                st.select_rounds(rounds);
            }
            Err(text) => st.flash = Some(FlashMessage::error(text)),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST /editor/example
// ---------------------------------------------------------------------------

pub fn handle_example(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    st.script = EXAMPLE_SCRIPT.to_owned();
    st.flash = Some(FlashMessage::success("Example script loaded."));
    drop(st);
    redirect("/editor")
}

// ---------------------------------------------------------------------------
// POST /editor/run
// ---------------------------------------------------------------------------

pub fn handle_run(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);

    let validation = st.validation();
    if !validation.is_valid {
        st.flash = Some(FlashMessage::error("Fix the script errors before running it."));
        drop(st);
        return redirect("/editor");
    }

    let config = extract_config(&st.script);
    if !start_run(&mut st, &state, config, RunSource::Editor) {
        st.flash = Some(FlashMessage::error("A simulation is already running."));
    }
    drop(st);

    redirect("/editor")
}

// ---------------------------------------------------------------------------
// Page fragments
// ---------------------------------------------------------------------------

/// Line-number gutter with an error dot next to each offending line.
///
/// Numbers follow the raw buffer; the validator's numbers count only
/// non-blank lines, so each raw line is mapped onto its non-blank index.
fn build_gutter(script: &str, validation: &ValidationResult) -> String {
    let mut non_blank = 0;
    script
        .split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let marker = if raw.trim().is_empty() {
                ""
            } else {
                non_blank += 1;
                if validation.has_line_error(non_blank) { r#"<span class="error-dot"></span>"# } else { "" }
            };
            format!(r#"<div class="line-number">{}{}</div>"#, marker, i + 1)
        })
        .collect()
}

fn build_error_list(validation: &ValidationResult) -> String {
    if validation.errors.is_empty() {
        return r#"<p class="ok">No errors. Ready to run.</p>"#.to_owned();
    }
    let items: String = validation
        .errors
        .iter()
        .map(|e| format!("<li>{}</li>", html_escape(e)))
        .collect();
    format!(r#"<ul class="error-list">{}</ul>"#, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_dscript::validate;

    #[test]
    fn gutter_marks_lines_by_non_blank_index() {
        let script = "INITIATEMYNETWORK IRISSCANNING\n\nFOO\nADDONELAYER\nADDONELAYER\nADDSPECIALLAYER\nRUNMEPLEASE";
        let gutter = build_gutter(script, &validate(script));
        let lines: Vec<&str> = gutter.split("</div>").filter(|s| !s.is_empty()).collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[2].contains("error-dot"));
        assert!(!lines[1].contains("error-dot"));
        assert!(!lines[0].contains("error-dot"));
    }

    #[test]
    fn rounds_only_post_keeps_the_buffer() {
        let mut st = StudioState::new(0.0);
        st.script = EXAMPLE_SCRIPT.to_owned();
        apply_save(&mut st, Ok("rounds=5".to_owned())).unwrap();
        assert_eq!(st.script, EXAMPLE_SCRIPT);
        assert_eq!(st.rounds.get(), 5);
        assert!(st.flash.is_none());
    }

    #[test]
    fn unreadable_body_is_rejected_without_touching_state() {
        let mut st = StudioState::new(0.0);
        st.script = EXAMPLE_SCRIPT.to_owned();
        let body = Err(io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"));
        assert!(apply_save(&mut st, body).is_err());
        assert_eq!(st.script, EXAMPLE_SCRIPT);
        assert_eq!(st.rounds.get(), 3);
    }

    #[test]
    fn disallowed_edit_keeps_buffer_and_flashes() {
        let mut st = StudioState::new(0.0);
        st.script = EXAMPLE_SCRIPT.to_owned();
        apply_save(&mut st, Ok("script=addonelayer".to_owned())).unwrap();
        assert_eq!(st.script, EXAMPLE_SCRIPT);
        assert!(st.flash.is_some());
    }

    #[test]
    fn out_of_range_rounds_flash_an_error() {
        let mut st = StudioState::new(0.0);
        apply_save(&mut st, Ok("rounds=9".to_owned())).unwrap();
        assert_eq!(st.rounds.get(), 3);
        assert!(st.flash.is_some());
    }
}

use std::io::Cursor;
use tiny_http::{Request, Response};

use ferrite_dscript::{LayerKind, NetworkBuilder, NetworkKind, MAX_LAYERS_PER_KIND};

use crate::handlers::run::{build_results_html, start_run};
use crate::render::{build_rounds_options, html_escape, render_flash_html, render_page, Page};
use crate::routes::{bad_request, read_body, redirect};
use crate::state::{lock, FlashMessage, RunSource, SharedState, StudioState};
use crate::util::form::{form_get, parse_form, parse_rounds};

// ---------------------------------------------------------------------------
// GET /builder
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    let flash   = st.take_flash();
    let builder = st.builder.clone();
    let rounds  = st.rounds;
    let running = st.run.is_running();
    let results = build_results_html(&st.run, &st.round_history, RunSource::Builder);
    drop(st);

    let page = render_page(Page::Builder, running, |tmpl| {
        tmpl
            .replace("{{FLASH_BUILDER}}", &render_flash_html(flash.as_ref()))
            .replace("{{BUILDER_TYPES}}", &build_type_buttons(&builder))
            .replace("{{BUILDER_LAYERS}}", &build_layer_list(&builder))
            .replace("{{BUILDER_COUNTS}}", &build_counts(&builder))
            .replace("{{BUILDER_ROUNDS_OPTIONS}}", &build_rounds_options(rounds))
            .replace("{{ADD_DEFAULT_DISABLED}}", if builder.can_add_default_layer() { "" } else { "disabled" })
            .replace("{{ADD_SPECIAL_DISABLED}}", if builder.can_add_special_layer() { "" } else { "disabled" })
            .replace("{{TRAIN_DISABLED}}", if builder.can_train() && !running { "" } else { "disabled" })
            .replace("{{BUILDER_SCRIPT}}", &html_escape(&builder.to_script()))
            .replace("{{BUILDER_RESULTS}}", &results)
    });
    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// POST /builder/action
// ---------------------------------------------------------------------------

/// Form fields: `action` = `initiate` | `add` | `remove` | `reset`, plus
/// `kind` (network token or `default` / `special`) or `id`.
pub fn handle_action(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let body = match read_body(request) {
        Ok(body) => body,
        Err(_) => return bad_request("Request body must be UTF-8 form data."),
    };
    let pairs = parse_form(&body);
    let action = form_get(&pairs, "action").unwrap_or("");
    let kind   = form_get(&pairs, "kind").unwrap_or("");
    let id     = form_get(&pairs, "id").unwrap_or("");

    let mut st = lock(&state);
    let outcome: Result<(), String> = match action {
        "initiate" => match NetworkKind::from_token(kind) {
            Some(network_type) => {
                st.builder.initiate(network_type);
                st.clear_result();
                Ok(())
            }
            None => Err(format!("Unknown network type '{}'.", kind)),
        },
        "add" => match LayerKind::from_name(kind) {
            Some(layer_kind) => st.builder.add_layer(layer_kind).map(|_| ()).map_err(|e| e.to_string()),
            None => Err(format!("Unknown layer kind '{}'.", kind)),
        },
        "remove" => st.builder.remove_layer(id).map(|_| ()).map_err(|e| e.to_string()),
        "reset" => {
            st.reset_network();
            Ok(())
        }
        other => Err(format!("Unknown action '{}'.", other)),
    };
    if let Err(text) = outcome {
        st.flash = Some(FlashMessage::error(text));
    }
    drop(st);

    redirect("/builder")
}

// ---------------------------------------------------------------------------
// POST /builder/rounds
// ---------------------------------------------------------------------------

pub fn handle_rounds(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let body = match read_body(request) {
        Ok(body) => body,
        Err(_) => return bad_request("Request body must be UTF-8 form data."),
    };
    let pairs = parse_form(&body);
    let mut st = lock(&state);
    apply_rounds(&mut st, form_get(&pairs, "rounds").unwrap_or(""));
    drop(st);
    redirect("/builder")
}

fn apply_rounds(st: &mut StudioState, raw: &str) {
    match parse_rounds(raw) {
        Ok(rounds) => {
            st.select_rounds(rounds);
        }
        Err(text) => st.flash = Some(FlashMessage::error(text)),
    }
}

// ---------------------------------------------------------------------------
// POST /builder/train
// ---------------------------------------------------------------------------

pub fn handle_train(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    match st.builder.to_config() {
        Ok(config) => {
            if !start_run(&mut st, &state, config, RunSource::Builder) {
                st.flash = Some(FlashMessage::error("A simulation is already running."));
            }
        }
        Err(e) => st.flash = Some(FlashMessage::error(e.to_string())),
    }
    drop(st);
    redirect("/builder")
}

// ---------------------------------------------------------------------------
// Page fragments
// ---------------------------------------------------------------------------

fn build_type_buttons(builder: &NetworkBuilder) -> String {
    NetworkKind::ALL
        .iter()
        .map(|kind| {
            let active = if builder.network_type() == Some(*kind) { " btn-active" } else { "" };
            format!(
                r#"<form method="post" action="/builder/action" class="inline">
                  <input type="hidden" name="action" value="initiate">
                  <input type="hidden" name="kind" value="{token}">
                  <button class="btn{active}">{label}</button>
                </form>"#,
                token  = kind.token(),
                active = active,
                label  = kind.label(),
            )
        })
        .collect()
}

fn build_layer_list(builder: &NetworkBuilder) -> String {
    if builder.layers().is_empty() {
        return r#"<p class="hint">No layers yet.</p>"#.to_owned();
    }
    let rows: String = builder
        .layers()
        .iter()
        .map(|layer| {
            format!(
                r#"<li class="layer layer-{cls}">{kind}
                  <form method="post" action="/builder/action" class="inline">
                    <input type="hidden" name="action" value="remove">
                    <input type="hidden" name="id" value="{id}">
                    <button class="btn btn-small">&times;</button>
                  </form>
                </li>"#,
                cls  = layer.kind.to_string().to_ascii_lowercase(),
                kind = layer.kind,
                id   = html_escape(&layer.id),
            )
        })
        .collect();
    format!(r#"<ol class="layer-list">{}</ol>"#, rows)
}

fn build_counts(builder: &NetworkBuilder) -> String {
    format!(
        "{} / {max} default, {} / {max} special",
        builder.count(LayerKind::Default),
        builder.count(LayerKind::Special),
        max = MAX_LAYERS_PER_KIND,
    )
}

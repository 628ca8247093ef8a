use std::io::{Cursor, Read};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Builds the header list, skipping any pair tiny_http rejects.
fn headers(pairs: &[(&str, &str)]) -> Vec<Header> {
    pairs
        .iter()
        .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
        .collect()
}

fn body_response(status: u16, content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        headers(&[("Content-Type", content_type)]),
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    body_response(200, "text/html; charset=utf-8", body.into_bytes())
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    body_response(200, "application/json", body.into_bytes())
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        headers(&[("Location", location), ("Content-Length", "0")]),
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

pub fn bad_request(message: &str) -> Response<Cursor<Vec<u8>>> {
    body_response(400, "text/plain", message.as_bytes().to_vec())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    body_response(404, "text/plain", b"404 Not Found".to_vec())
}

/// Reads the whole request body as UTF-8.
pub fn read_body(request: &mut Request) -> Result<String, std::io::Error> {
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// All handlers (except SSE) receive a `&mut Request` so that the dispatcher
/// retains ownership and can call `request.respond(response)` at the end.
/// The SSE handler takes ownership to perform long-lived streaming.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let path = match url.find('?') {
        Some(pos) => url[..pos].to_owned(),
        None      => url.clone(),
    };

    log::debug!("{} {}", method, path);

    // SSE — long-lived; handler takes ownership and drives the stream loop.
    if method == Method::Get && path == "/run/events" {
        handlers::run_sse::handle(request, state);
        return;
    }

    let response = match (method, path.as_str()) {
        // ── Root redirect ─────────────────────────────────────────────────
        (Method::Get, "/") => redirect("/editor"),

        // ── Editor ───────────────────────────────────────────────────────
        (Method::Get,  "/editor")         => handlers::editor::handle_get(state),
        (Method::Post, "/editor/save")    => handlers::editor::handle_save(&mut request, state),
        (Method::Post, "/editor/example") => handlers::editor::handle_example(state),
        (Method::Post, "/editor/run")     => handlers::editor::handle_run(state),

        // ── Builder ──────────────────────────────────────────────────────
        (Method::Get,  "/builder")        => handlers::builder::handle_get(state),
        (Method::Post, "/builder/action") => handlers::builder::handle_action(&mut request, state),
        (Method::Post, "/builder/rounds") => handlers::builder::handle_rounds(&mut request, state),
        (Method::Post, "/builder/train")  => handlers::builder::handle_train(state),

        // ── Run control ──────────────────────────────────────────────────
        (Method::Post, "/run/stop") => handlers::run::handle_stop(state),

        // ── JSON API ─────────────────────────────────────────────────────
        (Method::Post, "/api/validate") => handlers::api::handle_validate(&mut request),
        (Method::Post, "/api/extract")  => handlers::api::handle_extract(&mut request),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response for {}: {}", path, e);
    }
}

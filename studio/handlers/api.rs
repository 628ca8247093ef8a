use std::io::Cursor;
use tiny_http::{Request, Response};

use ferrite_dscript::{extract_config, validate};

use crate::routes::{bad_request, json_response, read_body};

/// `POST /api/validate` — raw script in the body, `ValidationResult` JSON out.
///
/// The editor calls this on every keystroke.
pub fn handle_validate(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let body = match read_body(request) {
        Ok(b)  => b,
        Err(_) => return bad_request("Request body must be UTF-8 text."),
    };
    match serde_json::to_string(&validate(&body)) {
        Ok(json) => json_response(json),
        Err(e)   => bad_request(&e.to_string()),
    }
}

/// `POST /api/extract` — raw script in the body, `NetworkConfig` JSON out.
pub fn handle_extract(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let body = match read_body(request) {
        Ok(b)  => b,
        Err(_) => return bad_request("Request body must be UTF-8 text."),
    };
    match serde_json::to_string(&extract_config(&body)) {
        Ok(json) => json_response(json),
        Err(e)   => bad_request(&e.to_string()),
    }
}

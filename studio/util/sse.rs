use std::io::Write;

/// Raw HTTP head for an SSE stream, written straight to the socket because
/// tiny_http has no streaming response body.
pub const SSE_RESPONSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                                     Content-Type: text/event-stream\r\n\
                                     Cache-Control: no-cache\r\n\
                                     Connection: keep-alive\r\n\
                                     X-Accel-Buffering: no\r\n\
                                     \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format (per SSE spec):
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Like [`format_sse_event`] but tagged with an `id:` line, which the
/// browser echoes back as `Last-Event-ID` when it reconnects.
pub fn format_sse_event_with_id(event_name: &str, id: usize, json_data: &str) -> String {
    format!("id: {}\nevent: {}\ndata: {}\n\n", id, event_name, json_data)
}

/// Formats a keep-alive SSE comment.
/// SSE comments start with `:` and are ignored by EventSource clients
/// but prevent the connection from timing out.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes a single SSE message to a writer, flushing immediately.
pub fn write_sse<W: Write + ?Sized>(writer: &mut W, msg: &str) -> std::io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.flush()
}

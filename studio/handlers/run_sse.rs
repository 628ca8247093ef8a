use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use tiny_http::Request;

use crate::state::{lock, RunStatus, SharedState};
use ferrite_dscript::RoundStats;

use crate::util::sse::{
    format_sse_event, format_sse_event_with_id, format_sse_keepalive, write_sse, SSE_RESPONSE_HEAD,
};

/// `GET /run/events` — Server-Sent Events handler.
///
/// Consumes `request` and drives a long-lived loop that:
/// 1. Replays the rounds already recorded for the current run, skipping
///    those at or below the client's `Last-Event-ID`.
/// 2. Waits up to 500 ms for the next `RoundStats`; on success writes an
///    `event: round` frame, on timeout a keep-alive comment.
/// 3. When the simulation thread closes the channel, writes a `done` or
///    `stopped` event carrying the outcome and closes.
pub fn handle(request: Request, state: SharedState) {
    let last_event_id = last_event_id(&request);
    let mut writer = request.into_writer();

    if write_sse(&mut *writer, SSE_RESPONSE_HEAD).is_err() {
        return;
    }

    let round_rx = {
        let st = lock(&state);
        match &st.run {
            RunStatus::Running { round_rx, .. } => Some(round_rx.clone()),
            _ => None,
        }
    };

    let rx_arc = match round_rx {
        Some(r) => r,
        None    => {
            let _ = write_sse(&mut *writer, &final_event(&state));
            return;
        }
    };

    // Replay history so a reconnecting client catches up.
    {
        let st = lock(&state);
        for stats in rounds_to_replay(&st.round_history, last_event_id) {
            if let Ok(json) = serde_json::to_string(stats) {
                if write_sse(&mut *writer, &round_event(stats.round, &json)).is_err() { return; }
            }
        }
    }

    loop {
        let result = {
            let rx = rx_arc.lock().unwrap_or_else(|p| p.into_inner());
            rx.recv_timeout(Duration::from_millis(500))
        };

        match result {
            Ok(stats) => {
                lock(&state).round_history.push(stats.clone());

                match serde_json::to_string(&stats) {
                    Ok(json) => {
                        if write_sse(&mut *writer, &round_event(stats.round, &json)).is_err() { return; }
                    }
                    Err(e) => log::warn!("could not serialize round stats: {}", e),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if write_sse(&mut *writer, format_sse_keepalive()).is_err() { return; }
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = write_sse(&mut *writer, &final_event(&state));
                return;
            }
        }
    }
}

fn round_event(round: usize, json: &str) -> String {
    format_sse_event_with_id("round", round, json)
}

/// Round number the client saw last, sent back by `EventSource` on reconnect.
fn last_event_id(request: &Request) -> Option<usize> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Last-Event-ID"))
        .and_then(|h| h.value.as_str().trim().parse().ok())
}

/// Recorded rounds the client has not seen yet.
fn rounds_to_replay(history: &[RoundStats], last_event_id: Option<usize>) -> &[RoundStats] {
    let seen = last_event_id.unwrap_or(0);
    let start = history.iter().position(|s| s.round > seen).unwrap_or(history.len());
    &history[start..]
}

/// `done` / `stopped` frame describing the latest finished run.
fn final_event(state: &SharedState) -> String {
    let st = lock(state);
    match &st.run {
        RunStatus::Done { outcome, .. } => {
            let name = if outcome.was_stopped { "stopped" } else { "done" };
            let json = serde_json::to_string(outcome).unwrap_or_else(|_| "{}".to_owned());
            format_sse_event(name, &json)
        }
        _ => format_sse_event("done", "{}"),
    }
}

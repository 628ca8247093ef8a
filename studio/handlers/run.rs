use std::io::Cursor;
use std::sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}, mpsc};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_http::Response;

use ferrite_dscript::{run_simulation, NetworkConfig, RoundStats, SimulationConfig};

use crate::render::html_escape;
use crate::state::{lock, RunSource, RunStatus, SharedState, StudioState};

// ---------------------------------------------------------------------------
// Starting a run
// ---------------------------------------------------------------------------

/// Starts a background simulation of `config` unless one is already running.
///
/// Takes the already-locked state so callers can validate and start in one
/// critical section.  Returns `false` when a run was already in progress.
pub fn start_run(
    st: &mut StudioState,
    state: &SharedState,
    config: NetworkConfig,
    source: RunSource,
) -> bool {
    if st.run.is_running() {
        return false;
    }

    let (tx, rx) = mpsc::channel::<RoundStats>();
    let stop_flag = Arc::new(AtomicBool::new(false));
    let round_rx  = Arc::new(Mutex::new(rx));

    let mut sim = SimulationConfig::new(st.rounds, st.time_scale);
    sim.progress_tx = Some(tx);
    sim.stop_flag   = Some(stop_flag.clone());

    st.run = RunStatus::Running {
        stop_flag,
        round_rx: round_rx.clone(),
        total_rounds: st.rounds.get(),
        source,
    };
    st.round_history.clear();

    log::info!("starting simulated run of {} ({})", config.metrics_key(), st.rounds);

    let state_clone = state.clone();
    thread::spawn(move || {
        let mut rng = StdRng::from_entropy();
        let outcome = run_simulation(&config, &sim, &mut rng);

        let mut st = lock(&state_clone);

        // Drain whatever the SSE handler did not pick up.
        let remaining: Vec<RoundStats> = {
            let rx_guard = round_rx.lock().unwrap_or_else(|p| p.into_inner());
            rx_guard.try_iter().collect()
        };
        st.round_history.extend(remaining);

        st.run = RunStatus::Done { config, outcome, source };
        drop(st);

        // Closing the channel only now guarantees SSE clients observe `Done`.
        drop(sim);
    });

    true
}

// ---------------------------------------------------------------------------
// POST /run/stop
// ---------------------------------------------------------------------------

pub fn handle_stop(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = lock(&state);
    let back = match &st.run {
        RunStatus::Running { stop_flag, source, .. } => {
            stop_flag.store(true, Ordering::Relaxed);
            *source
        }
        RunStatus::Done { source, .. } => *source,
        RunStatus::Idle => RunSource::Editor,
    };
    drop(st);
    crate::routes::redirect(page_path(back))
}

pub fn page_path(source: RunSource) -> &'static str {
    match source {
        RunSource::Editor  => "/editor",
        RunSource::Builder => "/builder",
    }
}

// ---------------------------------------------------------------------------
// Results panel
// ---------------------------------------------------------------------------

/// Renders the results panel for `page`; runs started from the other tab
/// are not shown.
pub fn build_results_html(run: &RunStatus, history: &[RoundStats], page: RunSource) -> String {
    match run {
        RunStatus::Idle => String::new(),
        RunStatus::Running { total_rounds, source, .. } if *source == page => format!(
            r#"<div class="card" id="live-run">
              <h3>Training&hellip;</h3>
              <p class="hint">Round <span id="live-round">{done}</span> of {total}</p>
              <div id="live-chart"></div>
              <form method="post" action="/run/stop"><button class="btn btn-secondary">Stop</button></form>
            </div>"#,
            done  = history.len(),
            total = total_rounds,
        ),
        RunStatus::Done { config, outcome, source } if *source == page => {
            let stopped = if outcome.was_stopped {
                format!(
                    r#"<p class="hint">Stopped after {} of {} round(s).</p>"#,
                    outcome.rounds_completed,
                    outcome.metrics.epochs.len()
                )
            } else {
                String::new()
            };
            format!(
                r#"<div class="card" id="results">
                  <h3>Results for <code>{key}</code></h3>
                  <div class="metrics-row">
                    <div class="metric-card"><div class="val">{acc:.1}%</div><div class="lbl">Accuracy</div></div>
                    <div class="metric-card"><div class="val">{rounds}</div><div class="lbl">Rounds</div></div>
                    <div class="metric-card"><div class="val">{secs:.1}s</div><div class="lbl">Time</div></div>
                  </div>
                  {stopped}
                  {chart}
                  <p class="verdict">{verdict}</p>
                </div>"#,
                key     = html_escape(&config.metrics_key()),
                acc     = outcome.metrics.accuracy,
                rounds  = outcome.metrics.epochs.len(),
                secs    = outcome.elapsed_total_ms as f64 / 1000.0,
                stopped = stopped,
                chart   = build_svg_accuracy_curve(&outcome.metrics.values),
                verdict = html_escape(&outcome.metrics.verdict),
            )
        }
        _ => r#"<p class="hint">A run started from the other tab is in progress.</p>"#.to_owned(),
    }
}

/// Accuracy-per-round line chart as inline SVG.
fn build_svg_accuracy_curve(values: &[f64]) -> String {
    if values.len() < 2 {
        return String::new();
    }

    let w = 560.0f64;
    let h = 200.0f64;
    let pad_l = 44.0f64;
    let pad_r = 16.0f64;
    let pad_t = 16.0f64;
    let pad_b = 28.0f64;

    let max_y = 100.0f64;
    let min_y = 50.0f64;
    let n     = values.len();

    let px = |i: usize, v: f64| -> (f64, f64) {
        let x = pad_l + (i as f64 / (n - 1) as f64) * (w - pad_l - pad_r);
        let y = pad_t + (max_y - v.clamp(min_y, max_y)) / (max_y - min_y) * (h - pad_t - pad_b);
        (x, y)
    };

    let path: String = values.iter().enumerate().map(|(i, &v)| {
        let (x, y) = px(i, v);
        if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
    }).collect();

    let y_labels: String = (0..=5).map(|g| {
        let val = min_y + 10.0 * g as f64;
        let (_, y) = px(0, val);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"#999\" font-size=\"10\">{:.0}%</text>\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#f0f2f5\" stroke-width=\"1\"/>",
            pad_l - 4.0, y + 4.0, val,
            pad_l, y, w - pad_r, y
        )
    }).collect();

    let x_labels: String = (0..n).map(|i| {
        let (x, _) = px(i, min_y);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#999\" font-size=\"10\">{}</text>",
            x, h - 6.0, i + 1
        )
    }).collect();

    format!(
        "<svg viewBox=\"0 0 {w} {h}\" width=\"100%\" class=\"chart\">{y_labels}{x_labels}\
         <path d=\"{path}\" stroke=\"#1e40af\" stroke-width=\"2\" fill=\"none\"/></svg>",
        w = w, h = h, y_labels = y_labels, x_labels = x_labels, path = path,
    )
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::script::NetworkConfig;
use crate::simulate::metrics::{simulate_metrics, NetworkMetrics};
use crate::simulate::round_stats::RoundStats;
use crate::simulate::sim_config::SimulationConfig;

/// Granularity at which a sleeping round re-checks the stop flag.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Result of one simulated training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub metrics: NetworkMetrics,
    pub rounds_completed: usize,
    pub was_stopped: bool,
    pub elapsed_total_ms: u64,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// "Trains" `config` by pacing out precomputed metrics over wall-clock time.
///
/// The final metrics are decided up front by [`simulate_metrics`]; the loop
/// then spends an equal slice of the (scaled) nominal duration on each
/// round and reports the accuracy reached after it.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `sim.stop_flag` is set to `true`.
pub fn run_simulation<R: Rng + ?Sized>(
    config: &NetworkConfig,
    sim: &SimulationConfig,
    rng: &mut R,
) -> SimulationOutcome {
    let metrics = simulate_metrics(config, sim.rounds, rng);
    let total_rounds = sim.rounds.get();

    let nominal_ms = rng.gen_range(sim.rounds.duration_range_ms());
    let scaled_ms = (nominal_ms as f64 * sim.time_scale.max(0.0)) as u64;
    let per_round = Duration::from_millis(scaled_ms / total_rounds as u64);

    log::info!(
        "simulating {} for {} round(s) over {} ms",
        config.metrics_key(),
        total_rounds,
        scaled_ms
    );

    let t_start = Instant::now();
    let mut rounds_completed = 0;
    let mut was_stopped = false;

    for round in 1..=total_rounds {
        if is_stopped(sim.stop_flag.as_deref()) {
            was_stopped = true;
            break;
        }

        let t_round = Instant::now();
        if !sleep_unless_stopped(per_round, sim.stop_flag.as_deref()) {
            was_stopped = true;
            break;
        }
        rounds_completed = round;

        if let Some(ref tx) = sim.progress_tx {
            let stats = RoundStats {
                round,
                total_rounds,
                accuracy: metrics.values.get(round - 1).copied().unwrap_or(metrics.accuracy),
                elapsed_ms: t_round.elapsed().as_millis() as u64,
            };
            if tx.send(stats).is_err() {
                log::debug!("progress receiver dropped after round {}", round);
                break;
            }
        }
    }

    if was_stopped {
        log::warn!("simulation stopped after {} of {} round(s)", rounds_completed, total_rounds);
    }

    SimulationOutcome {
        metrics,
        rounds_completed,
        was_stopped,
        elapsed_total_ms: t_start.elapsed().as_millis() as u64,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_stopped(flag: Option<&AtomicBool>) -> bool {
    flag.map(|f| f.load(Ordering::Relaxed)).unwrap_or(false)
}

/// Sleeps for `total`, waking every `STOP_POLL` to check the flag.
/// Returns `false` if the flag was raised before the time was up.
fn sleep_unless_stopped(total: Duration, flag: Option<&AtomicBool>) -> bool {
    let deadline = Instant::now() + total;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        if is_stopped(flag) {
            return false;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

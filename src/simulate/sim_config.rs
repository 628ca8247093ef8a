use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::simulate::round_stats::RoundStats;
use crate::simulate::rounds::Rounds;

/// Configuration for a `run_simulation` call.
///
/// # Fields
/// - `rounds`      — number of simulated training rounds
/// - `time_scale`  — multiplier applied to the nominal run duration;
///                   `0.0` finishes instantly, `1.0` takes the full 10-50 s
/// - `progress_tx` — optional channel; one `RoundStats` per completed round.
///                   If the receiver is dropped the run ends early.
/// - `stop_flag`   — optional atomic flag; when set from another thread the
///                   run ends before the next round.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub rounds: Rounds,
    pub time_scale: f64,
    pub progress_tx: Option<mpsc::Sender<RoundStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl SimulationConfig {
    /// Creates a config with no progress channel and no stop flag.
    pub fn new(rounds: Rounds, time_scale: f64) -> Self {
        SimulationConfig {
            rounds,
            time_scale,
            progress_tx: None,
            stop_flag: None,
        }
    }

    /// An instant run, handy for tests and the CLI.
    pub fn instant(rounds: Rounds) -> Self {
        SimulationConfig::new(rounds, 0.0)
    }
}

use std::sync::{Arc, Mutex, MutexGuard, atomic::AtomicBool, mpsc};

use ferrite_dscript::{
    validate, NetworkBuilder, NetworkConfig, RoundStats, Rounds, SimulationOutcome, ValidationResult,
};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

/// Which tab started the current run; results are shown on that tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSource { Editor, Builder }

pub enum RunStatus {
    /// Nothing has been run yet (or the result was cleared).
    Idle,
    /// A simulation is running in a background thread.
    Running {
        stop_flag:    Arc<AtomicBool>,
        round_rx:     Arc<Mutex<mpsc::Receiver<RoundStats>>>,
        total_rounds: usize,
        source:       RunSource,
    },
    /// The simulation finished (naturally or via Stop).
    Done {
        config:  NetworkConfig,
        outcome: SimulationOutcome,
        source:  RunSource,
    },
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running { .. })
    }
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Current editor buffer.
    pub script:        String,
    /// Rounds selected for the next run.
    pub rounds:        Rounds,
    /// Click-driven network under construction.
    pub builder:       NetworkBuilder,
    /// Current simulation lifecycle state.
    pub run:           RunStatus,
    /// Round stats of the most recent run.
    pub round_history: Vec<RoundStats>,
    /// One-shot flash message for the next page render.
    pub flash:         Option<FlashMessage>,
    /// Multiplier applied to simulated training time.
    pub time_scale:    f64,
}

impl StudioState {
    pub fn new(time_scale: f64) -> Self {
        StudioState {
            script:        String::new(),
            rounds:        Rounds::default(),
            builder:       NetworkBuilder::new(),
            run:           RunStatus::Idle,
            round_history: Vec::new(),
            flash:         None,
            time_scale,
        }
    }

    /// Validation of the current editor buffer; recomputed on every call.
    pub fn validation(&self) -> ValidationResult {
        validate(&self.script)
    }

    /// Forgets the last result unless a run is in progress.
    pub fn clear_result(&mut self) {
        if !self.run.is_running() {
            self.run = RunStatus::Idle;
            self.round_history.clear();
        }
    }

    /// Stores a new rounds selection; a change invalidates the last result.
    /// Returns whether the selection changed.
    pub fn select_rounds(&mut self, rounds: Rounds) -> bool {
        if rounds == self.rounds {
            return false;
        }
        self.rounds = rounds;
        self.clear_result();
        true
    }

    /// Starts over on the builder tab: empties the network, the editor
    /// buffer and the last result.
    pub fn reset_network(&mut self) {
        self.builder.reset();
        self.script.clear();
        self.clear_result();
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared state type — an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks the shared state, recovering the guard if a handler thread
/// panicked while holding it.
pub fn lock(state: &SharedState) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_dscript::{run_script, NetworkKind, SimulationConfig, EXAMPLE_SCRIPT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn finished_state() -> StudioState {
        let mut st = StudioState::new(0.0);
        st.script = EXAMPLE_SCRIPT.to_owned();
        let sim = SimulationConfig::instant(st.rounds);
        let run = run_script(&st.script, &sim, &mut StdRng::seed_from_u64(3))
            .expect("example script is valid");
        st.run = RunStatus::Done { config: run.config, outcome: run.outcome, source: RunSource::Editor };
        st.round_history.push(RoundStats { round: 1, total_rounds: 3, accuracy: 50.0, elapsed_ms: 0 });
        st
    }

    #[test]
    fn changing_rounds_clears_the_last_result() {
        let mut st = finished_state();
        assert!(st.select_rounds(Rounds::new(5).unwrap()));
        assert_eq!(st.rounds.get(), 5);
        assert!(matches!(st.run, RunStatus::Idle));
        assert!(st.round_history.is_empty());
    }

    #[test]
    fn selecting_the_same_rounds_keeps_the_result() {
        let mut st = finished_state();
        let current = st.rounds;
        assert!(!st.select_rounds(current));
        assert!(matches!(st.run, RunStatus::Done { .. }));
    }

    #[test]
    fn reset_network_clears_builder_script_and_result() {
        let mut st = finished_state();
        st.builder.initiate(NetworkKind::IrisScanning);
        st.reset_network();
        assert!(st.builder.network_type().is_none());
        assert!(st.script.is_empty());
        assert!(matches!(st.run, RunStatus::Idle));
    }
}

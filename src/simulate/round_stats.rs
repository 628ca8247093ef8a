use serde::{Deserialize, Serialize};

/// Progress emitted by `run_simulation` after each completed round.
///
/// The studio's SSE handler forwards these to the browser to drive the live
/// accuracy chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStats {
    /// 1-based round number.
    pub round: usize,
    pub total_rounds: usize,
    /// Accuracy (percent) reached after this round.
    pub accuracy: f64,
    /// Wall-clock time spent in this round in milliseconds.
    pub elapsed_ms: u64,
}

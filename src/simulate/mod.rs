pub mod loop_fn;
pub mod metrics;
pub mod round_stats;
pub mod rounds;
pub mod runner;
pub mod sim_config;
pub mod verdict;

pub use loop_fn::{run_simulation, SimulationOutcome};
pub use metrics::{predefined_metrics, simulate_metrics, NetworkMetrics};
pub use round_stats::RoundStats;
pub use rounds::Rounds;
pub use runner::{run_script, ScriptRun};
pub use sim_config::SimulationConfig;
pub use verdict::verdict;

pub mod builder;
pub mod error;
pub mod log_level;
pub mod script;
pub mod simulate;

// Convenience re-exports
pub use builder::{BuilderError, Layer, LayerKind, NetworkBuilder, MAX_LAYERS_PER_KIND};
pub use error::{Error, Result};
pub use log_level::{init_logging, LogLevel};
pub use script::{
    extract_config, filter_edit, is_allowed_input, tokenize, validate, validate_lines, Command,
    NetworkConfig, NetworkKind, ScriptError, ScriptLine, ValidationResult,
};
pub use simulate::{
    run_script, run_simulation, simulate_metrics, verdict, NetworkMetrics, RoundStats, Rounds,
    ScriptRun, SimulationConfig, SimulationOutcome,
};

/// The sample script the editor offers as a starting point.
pub const EXAMPLE_SCRIPT: &str = "INITIATEMYNETWORK IRISSCANNING
ADDONELAYER
ADDONELAYER
ADDSPECIALLAYER
RUNMEPLEASE";

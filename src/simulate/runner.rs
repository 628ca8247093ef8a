use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::script::{extract_from_lines, tokenize, validate_lines, NetworkConfig};
use crate::simulate::loop_fn::{run_simulation, SimulationOutcome};
use crate::simulate::sim_config::SimulationConfig;

/// A script that was validated, interpreted and run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRun {
    pub config: NetworkConfig,
    pub outcome: SimulationOutcome,
}

/// Validates `source`, extracts its configuration and runs the simulation.
///
/// Returns [`Error::InvalidScript`] with the rendered error list when the
/// script does not validate; nothing is simulated in that case.
pub fn run_script<R: Rng + ?Sized>(source: &str, sim: &SimulationConfig, rng: &mut R) -> Result<ScriptRun> {
    let lines = tokenize(source);
    let errors = validate_lines(&lines);
    if !errors.is_empty() {
        return Err(Error::InvalidScript(errors.iter().map(ToString::to_string).collect()));
    }

    let config = extract_from_lines(&lines);
    let outcome = run_simulation(&config, sim, rng);
    Ok(ScriptRun { config, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NetworkKind;
    use crate::simulate::rounds::Rounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn runs_a_valid_script() {
        let source = "INITIATEMYNETWORK CLIMATEPRED\nADDONELAYER\nADDSPECIALLAYER\nADDONELAYER\nRUNMEPLEASE";
        let sim = SimulationConfig::instant(Rounds::new(2).unwrap());
        let run = run_script(source, &sim, &mut StdRng::seed_from_u64(5)).unwrap();

        assert_eq!(run.config, NetworkConfig::new(NetworkKind::ClimatePred, 2, 1));
        assert_eq!(run.outcome.metrics.accuracy, 85.2);
        assert_eq!(run.outcome.metrics.values, vec![73.1, 77.4]);
    }

    #[test]
    fn refuses_an_invalid_script() {
        let sim = SimulationConfig::instant(Rounds::default());
        match run_script("RUNMEPLEASE", &sim, &mut StdRng::seed_from_u64(5)) {
            Err(Error::InvalidScript(errors)) => {
                assert_eq!(errors[0], "Script must have at least 5 lines (including INITIATEMYNETWORK and RUNMEPLEASE)");
            }
            other => panic!("expected InvalidScript, got {:?}", other),
        }
    }
}

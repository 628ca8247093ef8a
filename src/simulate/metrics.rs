use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::script::NetworkConfig;
use crate::simulate::rounds::Rounds;
use crate::simulate::verdict::verdict;

/// Simulated outcome of training a scripted network.
///
/// `epochs` holds the 1-based round numbers and `values` the accuracy (in
/// percent) reached after each of them; both have one entry per round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub accuracy: f64,
    pub epochs: Vec<usize>,
    pub values: Vec<f64>,
    pub verdict: String,
}

/// A precomputed five-round result for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredefinedMetrics {
    pub key: &'static str,
    pub accuracy: f64,
    pub values: [f64; 5],
}

const PREDEFINED: &[PredefinedMetrics] = &[
    PredefinedMetrics { key: "IRISSCANNING-1-0", accuracy: 75.2, values: [65.1, 68.4, 71.9, 73.8, 75.2] },
    PredefinedMetrics { key: "IRISSCANNING-2-0", accuracy: 81.7, values: [70.3, 74.8, 78.2, 80.5, 81.7] },
    PredefinedMetrics { key: "IRISSCANNING-3-0", accuracy: 84.3, values: [72.1, 76.5, 80.2, 83.1, 84.3] },
    PredefinedMetrics { key: "IRISSCANNING-1-1", accuracy: 82.5, values: [71.2, 75.6, 79.1, 81.3, 82.5] },
    PredefinedMetrics { key: "IRISSCANNING-2-1", accuracy: 86.9, values: [74.8, 79.2, 83.1, 85.4, 86.9] },
    PredefinedMetrics { key: "IMAGERECOG-1-0",   accuracy: 68.7, values: [58.2, 61.5, 64.9, 67.3, 68.7] },
    PredefinedMetrics { key: "IMAGERECOG-2-0",   accuracy: 76.2, values: [65.4, 69.1, 72.5, 74.8, 76.2] },
    PredefinedMetrics { key: "IMAGERECOG-3-0",   accuracy: 79.8, values: [68.3, 72.1, 75.6, 78.2, 79.8] },
    PredefinedMetrics { key: "IMAGERECOG-2-1",   accuracy: 83.4, values: [71.5, 75.2, 79.1, 81.8, 83.4] },
    PredefinedMetrics { key: "CLIMATEPRED-1-0",  accuracy: 71.3, values: [61.8, 65.2, 68.1, 70.2, 71.3] },
    PredefinedMetrics { key: "CLIMATEPRED-2-0",  accuracy: 79.1, values: [68.5, 72.3, 75.8, 77.9, 79.1] },
    PredefinedMetrics { key: "CLIMATEPRED-3-0",  accuracy: 82.6, values: [70.9, 74.8, 78.3, 81.1, 82.6] },
    PredefinedMetrics { key: "CLIMATEPRED-2-1",  accuracy: 85.2, values: [73.1, 77.4, 81.2, 83.8, 85.2] },
];

/// Looks up the precomputed result for a metrics key such as
/// `"IRISSCANNING-2-1"`.
pub fn predefined_metrics(key: &str) -> Option<&'static PredefinedMetrics> {
    PREDEFINED.iter().find(|m| m.key == key)
}

/// Produces the metrics for `config` trained over `rounds`.
///
/// A randomly perturbed, rising accuracy curve is always drawn from `rng`.
/// When the configuration has a precomputed entry its accuracy and (truncated)
/// curve replace the random ones.
pub fn simulate_metrics<R: Rng + ?Sized>(config: &NetworkConfig, rounds: Rounds, rng: &mut R) -> NetworkMetrics {
    let r = rounds.get();
    let epochs: Vec<usize> = (1..=r).collect();

    let base = 60.0 + rng.gen::<f64>() * 10.0;
    let max = base + (r as f64) * 5.0 + rng.gen::<f64>() * 5.0;
    let step = (max - base) / (r.saturating_sub(1).max(1) as f64);

    let generated: Vec<f64> = (0..r)
        .map(|i| {
            if i == 0 {
                base
            } else if i == r - 1 {
                max
            } else {
                base + step * i as f64 + (rng.gen::<f64>() * 2.0 - 1.0)
            }
        })
        .collect();

    let key = config.metrics_key();
    let (accuracy, values) = match predefined_metrics(&key) {
        Some(known) => (known.accuracy, known.values.iter().take(r).copied().collect()),
        None => (max, generated),
    };

    NetworkMetrics {
        accuracy,
        epochs,
        values,
        verdict: verdict(config.network_type, accuracy).to_owned(),
    }
}

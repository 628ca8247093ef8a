use serde::{Deserialize, Serialize};

use crate::script::command::{NetworkKind, ADD_DEFAULT_KEYWORD, ADD_SPECIAL_KEYWORD};
use crate::script::line::{tokenize, ScriptLine};

/// The structured configuration a valid script describes.
///
/// Handed to the training simulator, which looks results up by
/// [`NetworkConfig::metrics_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// `None` only when extraction ran on a script whose init line was
    /// never validated.
    pub network_type: Option<NetworkKind>,
    pub default_layer_count: usize,
    pub special_layer_count: usize,
}

impl NetworkConfig {
    pub fn new(network_type: NetworkKind, default_layer_count: usize, special_layer_count: usize) -> Self {
        NetworkConfig {
            network_type: Some(network_type),
            default_layer_count,
            special_layer_count,
        }
    }

    /// Lookup key `"<type>-<default>-<special>"`; a missing type renders as
    /// `null`.
    pub fn metrics_key(&self) -> String {
        let kind = self.network_type.map(|k| k.token()).unwrap_or("null");
        format!("{}-{}-{}", kind, self.default_layer_count, self.special_layer_count)
    }

    pub fn total_layers(&self) -> usize {
        self.default_layer_count + self.special_layer_count
    }
}

/// Extracts the configuration from raw script text.
///
/// Assumes the script already passed [`validate`](crate::script::validate):
/// no errors are reported, unknown lines are skipped and the layer counts
/// are not bounds-checked.
pub fn extract_config(source: &str) -> NetworkConfig {
    extract_from_lines(&tokenize(source))
}

pub fn extract_from_lines(lines: &[ScriptLine]) -> NetworkConfig {
    let network_type = lines
        .first()
        .and_then(|line| line.text.split(' ').nth(1))
        .and_then(NetworkKind::from_token);

    let mut config = NetworkConfig {
        network_type,
        default_layer_count: 0,
        special_layer_count: 0,
    };

    for line in lines.iter().skip(1) {
        match line.text.as_str() {
            ADD_DEFAULT_KEYWORD => config.default_layer_count += 1,
            ADD_SPECIAL_KEYWORD => config.special_layer_count += 1,
            _ => {}
        }
    }

    log::debug!("extracted network config {}", config.metrics_key());
    config
}

use serde::{Deserialize, Serialize};

use crate::builder::layer::{Layer, LayerKind};
use crate::script::{Command, NetworkConfig, NetworkKind};

/// The builder caps each layer kind lower than the D-Script grammar does.
pub const MAX_LAYERS_PER_KIND: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("initiate a network before adding layers")]
    NotInitiated,
    #[error("maximum {max} {kind} layers allowed", max = MAX_LAYERS_PER_KIND)]
    LayerLimit { kind: LayerKind },
    #[error("no layer with id '{0}'")]
    UnknownLayer(String),
    #[error("a network needs a type and at least one layer before training")]
    NotTrainable,
}

/// Click-driven network construction: the alternative to writing D-Script.
///
/// Holds the selected network type and the ordered layer list.  Every
/// mutation goes through a method so the per-kind limits always hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBuilder {
    network_type: Option<NetworkKind>,
    layers: Vec<Layer>,
    next_id: u64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        NetworkBuilder::default()
    }

    pub fn network_type(&self) -> Option<NetworkKind> {
        self.network_type
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Selects a network type and discards any layers.
    pub fn initiate(&mut self, kind: NetworkKind) {
        self.network_type = Some(kind);
        self.layers.clear();
    }

    pub fn count(&self, kind: LayerKind) -> usize {
        self.layers.iter().filter(|l| l.kind == kind).count()
    }

    pub fn can_add(&self, kind: LayerKind) -> bool {
        self.network_type.is_some() && self.count(kind) < MAX_LAYERS_PER_KIND
    }

    pub fn can_add_default_layer(&self) -> bool {
        self.can_add(LayerKind::Default)
    }

    pub fn can_add_special_layer(&self) -> bool {
        self.can_add(LayerKind::Special)
    }

    pub fn can_train(&self) -> bool {
        self.network_type.is_some() && !self.layers.is_empty()
    }

    /// Appends a layer and returns its id.
    pub fn add_layer(&mut self, kind: LayerKind) -> Result<String, BuilderError> {
        if self.network_type.is_none() {
            return Err(BuilderError::NotInitiated);
        }
        if !self.can_add(kind) {
            return Err(BuilderError::LayerLimit { kind });
        }

        self.next_id += 1;
        let id = format!("layer-{}", self.next_id);
        self.layers.push(Layer { id: id.clone(), kind });
        Ok(id)
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, BuilderError> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| BuilderError::UnknownLayer(id.to_owned()))?;
        Ok(self.layers.remove(index))
    }

    pub fn reset(&mut self) {
        self.network_type = None;
        self.layers.clear();
    }

    /// The configuration to hand to the simulator.
    pub fn to_config(&self) -> Result<NetworkConfig, BuilderError> {
        match self.network_type {
            Some(kind) if self.can_train() => Ok(NetworkConfig::new(
                kind,
                self.count(LayerKind::Default),
                self.count(LayerKind::Special),
            )),
            _ => Err(BuilderError::NotTrainable),
        }
    }

    /// Renders the current network as D-Script commands (without checking
    /// that the result would validate).
    pub fn to_commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.layers.len() + 2);
        if let Some(network_type) = self.network_type {
            commands.push(Command::Init { network_type });
        }
        commands.extend(self.layers.iter().map(|l| match l.kind {
            LayerKind::Default => Command::AddDefaultLayer,
            LayerKind::Special => Command::AddSpecialLayer,
        }));
        commands.push(Command::Run);
        commands
    }

    pub fn to_script(&self) -> String {
        self.to_commands()
            .iter()
            .map(Command::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

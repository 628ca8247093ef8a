pub mod builder;
pub mod layer;

pub use builder::{BuilderError, NetworkBuilder, MAX_LAYERS_PER_KIND};
pub use layer::{Layer, LayerKind};

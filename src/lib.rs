//! Dictionary-like container whose writes can be grouped into layers.
//!
//! [`LayeredMap::commit`] opens a layer, [`LayeredMap::reset`] rolls it back,
//! restoring exactly the state the map had when the layer was opened. Reads
//! cost the same at any depth; a rollback costs as much as the number of keys
//! the layer touched.

mod layered;

pub use layered::{LayerGuard, LayeredMap, MapError, MapResult};

mod error;
mod guard;
mod layer;
mod map;

pub use error::*;
pub use guard::*;
pub(crate) use layer::Layer;
pub use map::*;

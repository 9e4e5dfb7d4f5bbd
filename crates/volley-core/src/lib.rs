mod angle;
mod arena;
mod debug;
pub mod math;
mod settings;
mod trajectory;
mod world;

pub use angle::*;
pub use arena::*;
pub use debug::*;
pub use settings::*;
pub use trajectory::*;
pub use world::*;

/// A floor position or direction, in arena units.
pub type Vector2 = nalgebra::Vector2<f64>;
/// A position or direction in the arena, `z` up, in arena units.
pub type Vector3 = nalgebra::Vector3<f64>;

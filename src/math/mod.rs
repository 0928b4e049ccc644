pub mod vec2;
pub mod bezier;
pub mod random;

pub use vec2::Vec2;
pub use bezier::{QuadraticBezier, bezier_point_at};
pub use random::{RandomRange, SceneRng, ScriptedRandom, Span};

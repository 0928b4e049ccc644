pub mod canvas;
pub mod driver;
pub mod web;

pub use canvas::{Canvas2d, Color, DrawingSurface};
pub use driver::FrameDriver;
pub use web::WebCanvas;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas::{Canvas2d, Color, DrawingSurface};

/// Wrapper around a browser 2D context implementing [`Canvas2d`]
pub struct WebCanvas {
    pub ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Canvas2d for WebCanvas {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.clear_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool) {
        // Only fails for a negative radius
        if let Err(e) = self.ctx.arc_with_anticlockwise(
            x as f64,
            y as f64,
            radius as f64,
            start_angle as f64,
            end_angle as f64,
            anticlockwise,
        ) {
            log::warn!("arc rejected by canvas: {:?}", e);
        }
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }
}

impl DrawingSurface for HtmlCanvasElement {
    type Context = WebCanvas;

    fn width(&self) -> f32 {
        HtmlCanvasElement::width(self) as f32
    }

    fn height(&self) -> f32 {
        HtmlCanvasElement::height(self) as f32
    }

    fn context_2d(&self) -> Option<WebCanvas> {
        self.get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .map(WebCanvas::new)
    }
}

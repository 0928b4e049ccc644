//! In-memory canvas that records every draw call
//!
//! Fill and stroke commands are stamped with the style that was active when
//! they were issued, so tests can assert on what ended up on screen without
//! replaying the state machine.

use crate::math::Vec2;
use crate::render::{Canvas2d, Color, DrawingSurface};

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    FillRect { x: f32, y: f32, width: f32, height: f32, color: Color },
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        anticlockwise: bool,
    },
    Fill { color: Color },
    Stroke { color: Color, line_width: f32 },
}

#[derive(Debug, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    fill: Color,
    stroke: Color,
    line_width: f32,
}

impl Default for CommandRecorder {
    fn default() -> Self {
        // Canvas defaults: black fill and stroke, 1px lines
        Self {
            commands: Vec::new(),
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
        }
    }
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain everything recorded so far
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }
}

impl Canvas2d for CommandRecorder {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color: self.fill,
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo(Vec2::new(x, y)));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool) {
        self.commands.push(DrawCommand::Arc {
            center: Vec2::new(x, y),
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill { color: self.fill });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            color: self.stroke,
            line_width: self.line_width,
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        // Canvas ignores non-positive and non-finite widths
        if width > 0.0 && width.is_finite() {
            self.line_width = width;
        }
    }
}

/// Test surface handing out a fresh recorder
#[derive(Debug, Clone, Copy)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub supports_2d: bool,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            supports_2d: true,
        }
    }

    /// A surface with no 2D context, like a canvas locked to WebGL
    pub fn without_2d(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            supports_2d: false,
        }
    }
}

impl DrawingSurface for RecordingSurface {
    type Context = CommandRecorder;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn context_2d(&self) -> Option<CommandRecorder> {
        self.supports_2d.then(CommandRecorder::new)
    }
}

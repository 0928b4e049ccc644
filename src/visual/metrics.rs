//! Summaries of recorded frames for automated draw-order checks

use crate::render::Color;
use super::recorder::DrawCommand;

/// Counts and ordering facts about a recorded command stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub clears: usize,
    pub filled_rects: usize,
    pub arcs: usize,
    pub fills: usize,
    pub strokes: usize,
    pub line_segments: usize,
    /// Widths of every stroke, in draw order
    pub stroke_widths: Vec<f32>,
}

impl FrameSummary {
    pub fn from_commands(commands: &[DrawCommand]) -> Self {
        let mut summary = Self::default();

        for command in commands {
            match command {
                DrawCommand::ClearRect { .. } => summary.clears += 1,
                DrawCommand::FillRect { .. } => summary.filled_rects += 1,
                DrawCommand::Arc { .. } => summary.arcs += 1,
                DrawCommand::Fill { .. } => summary.fills += 1,
                DrawCommand::LineTo(_) => summary.line_segments += 1,
                DrawCommand::Stroke { line_width, .. } => {
                    summary.strokes += 1;
                    summary.stroke_widths.push(*line_width);
                }
                DrawCommand::BeginPath | DrawCommand::MoveTo(_) => {}
            }
        }

        summary
    }
}

/// Index of the first fill (path or rect) painted with `color`
pub fn first_paint_with(commands: &[DrawCommand], color: Color) -> Option<usize> {
    commands.iter().position(|c| paints_with(c, color))
}

/// Index of the last fill (path or rect) painted with `color`
pub fn last_paint_with(commands: &[DrawCommand], color: Color) -> Option<usize> {
    commands.iter().rposition(|c| paints_with(c, color))
}

/// Number of fills (path or rect) painted with `color`
pub fn paints_with_count(commands: &[DrawCommand], color: Color) -> usize {
    commands.iter().filter(|c| paints_with(c, color)).count()
}

fn paints_with(command: &DrawCommand, color: Color) -> bool {
    match command {
        DrawCommand::Fill { color: c } | DrawCommand::FillRect { color: c, .. } => *c == color,
        _ => false,
    }
}

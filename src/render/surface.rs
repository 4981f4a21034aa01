//! Pixel-space drawing of the board
//!
//! `draw_board` paints the game onto any [`Surface`] using the board's own
//! pixel coordinates (origin top-left, `cell_size` pixels per cell). [`Scene`]
//! records those calls and replays them onto a ratatui canvas.

use ratatui::style::Color;
use ratatui::widgets::canvas::{Line as CanvasLine, Painter, Shape};

use crate::game::{GameState, Position};

pub const BACKGROUND_COLOR: Color = Color::Rgb(0x20, 0x21, 0x52);
pub const GRID_COLOR: Color = Color::Rgb(0x32, 0x33, 0x51);
pub const SNAKE_COLOR: Color = Color::Rgb(0x82, 0xde, 0x16);
pub const FOOD_COLOR: Color = Color::Rgb(0xde, 0x16, 0x6b);

/// A 2D drawing target in pixel coordinates
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// One-pixel line between two points
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color);

    /// Solid rectangle with its top-left corner at (x, y)
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
}

/// Draw the full board: background, grid lines, food, then every snake cell
pub fn draw_board<S: Surface>(surface: &mut S, state: &GameState, cell_size: u32) {
    let cell = f64::from(cell_size);
    let side = state.grid_count as f64 * cell;

    surface.clear(BACKGROUND_COLOR);

    for i in 0..=state.grid_count {
        let offset = i as f64 * cell;
        surface.stroke_line((offset, 0.0), (offset, side), GRID_COLOR);
        surface.stroke_line((0.0, offset), (side, offset), GRID_COLOR);
    }

    fill_cell(surface, state.food, cell, FOOD_COLOR);
    for segment in &state.snake.body {
        fill_cell(surface, *segment, cell, SNAKE_COLOR);
    }
}

/// Square inset by one pixel so neighbouring cells stay visually separate
fn fill_cell<S: Surface>(surface: &mut S, pos: Position, cell: f64, color: Color) {
    surface.fill_rect(
        f64::from(pos.x) * cell + 1.0,
        f64::from(pos.y) * cell + 1.0,
        cell - 2.0,
        cell - 2.0,
        color,
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
}

/// Recorded drawing, replayable onto a ratatui canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Colour of the last clear, used as the canvas background
    pub fn background(&self) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Canvas y grows upwards, board y grows downwards
    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }
}

impl Surface for Scene {
    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color) {
        self.ops.push(DrawOp::Line { from, to, color });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }
}

impl Shape for Scene {
    fn draw(&self, painter: &mut Painter) {
        for op in &self.ops {
            match *op {
                // Painted by the canvas itself through background()
                DrawOp::Clear(_) => {}
                DrawOp::Line { from, to, color } => {
                    CanvasLine {
                        x1: from.0,
                        y1: self.flip(from.1),
                        x2: to.0,
                        y2: self.flip(to.1),
                        color,
                    }
                    .draw(painter);
                }
                DrawOp::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    let mut py = y;
                    while py < y + height {
                        let mut px = x;
                        while px < x + width {
                            if let Some((gx, gy)) = painter.get_point(px, self.flip(py)) {
                                painter.paint(gx, gy, color);
                            }
                            px += 1.0;
                        }
                        py += 1.0;
                    }
                }
            }
        }
    }
}

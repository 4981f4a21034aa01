use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// Largest grid the terminal board and per-tick redraw are sized for
pub const MAX_GRID_COUNT: usize = 200;

/// Largest cell side, in pixels, the board is rasterised with
pub const MAX_CELL_SIZE: u32 = 100;

/// Configuration for the game
///
/// Loadable from a JSON file; fields missing from the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the square grid
    pub grid_count: usize,
    /// Side of one cell on the drawing surface, in pixels
    pub cell_size: u32,
    /// Period between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Points awarded for eating food
    pub food_score: u32,
    /// Head position of a freshly started snake
    pub initial_head: Position,
    /// Initial length of the snake
    pub initial_snake_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_count: 20,
            cell_size: 20,
            tick_interval_ms: 100,
            food_score: 10,
            initial_head: Position::new(5, 5),
            initial_snake_length: 3,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_count: usize) -> Self {
        Self {
            grid_count,
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn with_grid_count(mut self, grid_count: usize) -> Self {
        self.grid_count = grid_count;
        self
    }

    pub fn with_tick_interval(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Side of the drawing surface in pixels, `None` when it does not fit a u32
    fn checked_canvas_size(&self) -> Option<u32> {
        u32::try_from(self.grid_count)
            .ok()?
            .checked_mul(self.cell_size)
    }

    /// Side of the drawing surface in pixels
    pub fn canvas_size(&self) -> u32 {
        self.checked_canvas_size().unwrap_or(u32::MAX)
    }

    /// Reject configurations the starting snake does not fit in
    pub fn validate(&self) -> Result<()> {
        if self.grid_count > MAX_GRID_COUNT {
            bail!(
                "grid of {} cells is larger than the maximum of {}",
                self.grid_count,
                MAX_GRID_COUNT
            );
        }
        if self.checked_canvas_size().is_none() {
            bail!(
                "board of {} cells of {} pixels is too large to draw",
                self.grid_count,
                self.cell_size
            );
        }

        if self.cell_size < 3 || self.cell_size > MAX_CELL_SIZE {
            bail!("cell size must be between 3 and {} pixels", MAX_CELL_SIZE);
        }
        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_count {
            bail!(
                "initial snake length must be between 1 and the grid size of {}",
                self.grid_count
            );
        }

        let head = self.initial_head;
        let grid = self.grid_count as i32;
        let tail_x = i64::from(head.x) - self.initial_snake_length as i64 + 1;

        if head.x >= grid || head.y < 0 || head.y >= grid || tail_x < 0 {
            bail!(
                "grid of {} cells cannot hold the starting snake at ({}, {})",
                self.grid_count,
                head.x,
                head.y
            );
        }
        if self.grid_count * self.grid_count <= self.initial_snake_length {
            bail!("grid of {} cells leaves no room for food", self.grid_count);
        }
        if self.tick_interval_ms == 0 {
            bail!("tick interval must be positive");
        }
        Ok(())
    }
}

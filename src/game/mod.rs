//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Every operation takes the `GameState` explicitly, so it can be driven by the
//! terminal loop or by tests without a timer or a drawing surface.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickResult};
pub use state::{CollisionType, GameState, Position, RunState, Snake};

//! Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic (game module)
//! - Board drawing and the TUI layout (render module)
//! - Keyboard mapping (input module)
//! - High score persistence (storage module)
//! - The interactive loop and its tick scheduler (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod storage;

//! Side-scrolling arcade engine for the portfolio site.
//!
//! The library holds everything that is not terminal I/O: the entity data
//! model, the per-frame simulation, the pluggable rulesets, the game state
//! machine, and the collaborator interfaces (leaderboard, content store).
//! The binary in `main.rs` is only a host that feeds input and draws
//! published snapshots.

pub mod camera;
pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod content;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod physics;
pub mod ruleset;
pub mod scripts;
pub mod snapshot;

//! blocktris - a falling-block puzzle game
//!
//! The game-state engine (board, pieces, collision, line clears, scoring and
//! the tick state machine) lives in plain modules with no terminal
//! dependencies beyond colour values. `input` and `ui` adapt it to a
//! crossterm/ratatui front end.

pub mod board;
pub mod collision;
pub mod game;
pub mod input;
pub mod piece;
pub mod randomizer;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod ui;

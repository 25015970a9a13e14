pub mod board;
pub mod control;
pub mod pieces;
pub mod placement;
pub mod playtest;
pub mod scoring;
pub mod settings;
pub mod spawn;
pub mod state;
pub mod tetris_ui;
pub mod view;

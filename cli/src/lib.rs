//! Memotree command-line shell
//!
//! Drives the memo tree engine against a data directory holding
//! `treeData.json` and `recordings.json`.

pub mod app;
pub mod audio;
pub mod commands;

pub use app::App;
pub use commands::Command;

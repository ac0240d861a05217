//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod optimise;
pub mod scenarios;
pub mod sensitivity;

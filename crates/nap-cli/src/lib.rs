//! Nap planner CLI library.
//!
//! This crate provides the command-line interface for the nap planner.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, NapAction};
pub use config::{BabyConfig, Config, ScheduleConfig};

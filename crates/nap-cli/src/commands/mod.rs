//! CLI subcommand implementations.

pub mod history;
pub mod log;
pub mod nap;
pub mod now;
pub mod schedule;
pub mod status;
pub mod util;

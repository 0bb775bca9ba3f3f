//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Baby nap planner.
///
/// Predicts the day's naps from wake windows and merges in the naps you log.
#[derive(Debug, Parser)]
#[command(name = "naps", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the timeline for a day.
    Schedule {
        /// Day to show: YYYY-MM-DD, `today` or `yesterday`.
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show what the baby should be doing right now.
    Now {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Log the morning wake-up time.
    Wake {
        /// Time as HH:MM.
        time: String,

        /// Day to log for (default: today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Log when night sleep started.
    Bedtime {
        /// Time as HH:MM.
        time: String,

        /// Day to log for (default: today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Log and edit naps.
    #[command(subcommand)]
    Nap(NapAction),

    /// Dismiss a predicted nap slot.
    Skip {
        /// Slot index shown by `naps schedule`.
        slot: usize,

        /// Day to skip it on (default: today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Summarize recent days.
    History {
        /// Number of days to include, ending today.
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show configuration and database location.
    Status,
}

/// Nap logging actions.
#[derive(Debug, Subcommand)]
pub enum NapAction {
    /// Log a nap. Without `--end` the nap is in progress.
    Add {
        /// Start time as HH:MM.
        start: String,

        /// End time as HH:MM.
        #[arg(long)]
        end: Option<String>,

        /// Day to log for (default: today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Finish an in-progress nap.
    End {
        /// Nap ID.
        id: String,

        /// End time as HH:MM.
        time: String,
    },

    /// Change a nap's start or end.
    Edit {
        /// Nap ID.
        id: String,

        /// New start time as HH:MM.
        #[arg(long)]
        start: Option<String>,

        /// New end time as HH:MM.
        #[arg(long)]
        end: Option<String>,

        /// Clear the end time, making the nap in progress again.
        #[arg(long, conflicts_with = "end")]
        reopen: bool,
    },

    /// Shift a nap by a number of minutes, rounded to 5.
    Move {
        /// Nap ID.
        id: String,

        /// Minutes to shift by; negative moves earlier.
        #[arg(long, allow_negative_numbers = true)]
        by: i32,
    },

    /// Delete a logged nap.
    Delete {
        /// Nap ID.
        id: String,
    },
}

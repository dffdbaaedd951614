//! Command-line argument definitions for the Avow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the scene to check, an optional report
//! file, the configuration file and per-run overrides.

use clap::{Parser, ValueEnum};

use avow::config::EditorMode;

/// Command-line arguments for the Avow diagram checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file
    #[arg(help = "Path to the scene file (TOML)")]
    pub input: String,

    /// Path to the TOML report written for a valid diagram
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Unit scale applied to every avow, overriding the configuration
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Which editor the scene comes from, overriding the configuration
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Editor mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Report every problem as an error
    Builder,
    /// Report unconnected avows as warnings
    Solver,
}

impl From<Mode> for EditorMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Builder => EditorMode::Builder,
            Mode::Solver => EditorMode::Solver,
        }
    }
}

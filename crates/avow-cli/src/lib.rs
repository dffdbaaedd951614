//! CLI logic for the Avow diagram checker.
//!
//! This module reads a scene of placed avows, extracts the layered diagram
//! and reports its aggregates or every problem found.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::{Args, Mode};

use std::fs;

use log::{info, warn};

use avow::{AvowError, editor::Editor, scene::Scene};

use report::Report;

/// Run the Avow CLI application
///
/// This function loads the scene named by `args`, extracts its diagram and
/// prints the layers with the total voltage and current. When an output
/// path is given, a TOML report of the diagram is written there as well.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `AvowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scenes
/// - Diagrams with error diagnostics
pub fn run(args: &Args) -> Result<(), AvowError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Checking diagram"
    );

    let app_config = config::resolve_config(args)?;
    let scale = app_config.extraction().scale();

    let source = fs::read_to_string(&args.input)?;
    let scene: Scene = toml::from_str(&source).map_err(|e| AvowError::Scene(e.to_string()))?;

    let mut editor = Editor::from_scene(&scene, app_config)?;
    let (diagram, errors) = editor.extract()?.into_parts();

    for diag in errors.iter().filter(|d| d.severity().is_warning()) {
        warn!(diag:%; "Diagram warning");
    }
    if errors.has_errors() {
        return Err(errors.into());
    }

    print!("{diagram}");
    println!("voltage: {}", diagram.voltage());
    println!("current: {}", diagram.current());

    if let Some(output) = &args.output {
        let report = Report::new(&diagram, scale);
        let text = toml::to_string(&report).map_err(|e| AvowError::Scene(e.to_string()))?;
        fs::write(output, text)?;
        info!(output_file = output; "Report written");
    }

    Ok(())
}

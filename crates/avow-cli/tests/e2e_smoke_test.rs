use std::{fs, path::PathBuf};

use tempfile::tempdir;

use avow_cli::{Args, Mode, run};

/// Collects all .toml scenes from a directory
fn collect_scene_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demo scenes live at the workspace root.
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: Option<PathBuf>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.map(|path| path.to_string_lossy().to_string()),
        config: None,
        scale: None,
        mode: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_scene_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.report.toml",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args_for(demo_path, Some(output_path.clone()))) {
            Ok(()) if !output_path.exists() => {
                failed_demos.push((demo_path.clone(), "no report written".to_string()));
            }
            Ok(()) => {}
            Err(e) => failed_demos.push((demo_path.clone(), e.to_string())),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_scene_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.report.toml",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args_for(demo_path, Some(output_path.clone()))).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(
            !output_path.exists(),
            "Report written for invalid demo {}",
            demo_path.display()
        );
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded when they should have failed",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_report_contents() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("chain.report.toml");

    let mut args = args_for(&demos_path().join("chain.toml"), Some(output_path.clone()));
    args.scale = Some(10.0);
    run(&args).expect("chain demo is valid");

    let report = fs::read_to_string(&output_path).expect("report written");
    assert!(report.contains("scale = 10.0"));
    assert!(report.contains("voltage = 150.0"));
    assert!(report.contains("current = 10.0"));
}

#[test]
fn e2e_solver_mode_accepts_unconnected() {
    let mut args = args_for(&demos_path().join("errors").join("unconnected.toml"), None);
    args.mode = Some(Mode::Solver);

    // Both avows hang from the source side by side.
    run(&args).expect("unconnected avows are warnings in solver mode");
}

#[test]
fn e2e_missing_input() {
    let args = args_for(&demos_path().join("does_not_exist.toml"), None);

    assert!(run(&args).is_err());
}

#[test]
fn e2e_malformed_scene() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.toml");
    fs::write(&input, "[[avow]]\nx = 0.0\n").expect("write scene");

    let err = run(&args_for(&input, None)).expect_err("scene is malformed");
    assert!(err.to_string().starts_with("Scene error"));
}

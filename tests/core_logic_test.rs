use copyright_strip::core::config::{ConfigManager, ConfigProvider, FailurePolicy};
use copyright_strip::utils::{self, ReportFormat, RunOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "// Crafted with ❤ at Breu, Inc. <info@breu.io>, Copyright © 2024.\n\
//\n\
// Licensed under the Apache License, Version 2.0 (the \"License\"); you may not use this file except in compliance with\n\
// the License.\n\
//\n\
// specific language governing permissions and limitations under the License.\n";

fn setup_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for (path, body) in [
        ("cmd/api/main.go", "package main\n"),
        ("internal/core/defs/stack.go", "package defs\n"),
        ("deploy/helm/values.yaml", "replicas: 1\n"),
    ] {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, format!("{HEADER}{body}")).unwrap();
    }
    fs::write(root.join("cmd").join("README.md"), format!("{HEADER}# cmd\n")).unwrap();
    dir
}

fn config_for(project: &Path) -> ConfigManager {
    let manager = ConfigManager::new_at(project);
    manager.initialize().unwrap();

    let mut config = manager.load_config().unwrap();
    config.roots = ["cmd", "internal", "deploy"]
        .iter()
        .map(|root| project.join(root))
        .collect();
    manager.save_config(&config).unwrap();
    manager
}

#[test]
fn test_core_workflow() {
    let project = setup_project();
    let root = project.path();
    let manager = config_for(root);

    // Validation passes once every configured root exists.
    assert!(manager.validate_config().unwrap().is_empty());

    let summary = utils::run_strip(&manager, RunOptions::default()).unwrap();
    assert_eq!(summary.stripped.len(), 3);
    assert_eq!(summary.ignored, 1);

    assert_eq!(
        fs::read_to_string(root.join("cmd/api/main.go")).unwrap(),
        "package main\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("deploy/helm/values.yaml")).unwrap(),
        "replicas: 1\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("cmd/README.md")).unwrap(),
        format!("{HEADER}# cmd\n")
    );

    // A second pass finds nothing left to strip.
    let again = utils::run_strip(&manager, RunOptions::default()).unwrap();
    assert!(again.stripped.is_empty());
    assert_eq!(again.unchanged, 3);
}

#[test]
fn test_command_line_overrides() {
    let project = setup_project();
    let root = project.path();
    let manager = config_for(root);

    let options = RunOptions {
        roots: vec![root.join("cmd")],
        ignored: vec!["main.go".to_string()],
        dry_run: false,
        failure_policy: Some(FailurePolicy::SkipFile),
        format: ReportFormat::Json,
        verbose: false,
    };
    let summary = utils::run_strip(&manager, options).unwrap();

    // Only `cmd` was walked, and the override replaced the default ignore list.
    assert_eq!(summary.roots_scanned, vec![root.join("cmd")]);
    assert_eq!(summary.failure_policy, "skip-file");
    assert_eq!(
        fs::read_to_string(root.join("cmd/README.md")).unwrap(),
        "# cmd\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("cmd/api/main.go")).unwrap(),
        format!("{HEADER}package main\n")
    );
    assert_eq!(
        fs::read_to_string(root.join("internal/core/defs/stack.go")).unwrap(),
        format!("{HEADER}package defs\n")
    );
}

#[test]
fn test_dry_run_reports_without_writing() {
    let project = setup_project();
    let root = project.path();
    let manager = config_for(root);

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let summary = utils::run_strip(&manager, options).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.stripped.len(), 3);
    assert_eq!(
        fs::read_to_string(root.join("internal/core/defs/stack.go")).unwrap(),
        format!("{HEADER}package defs\n")
    );
}

#[test]
fn test_failures_make_the_run_fail() {
    let project = setup_project();
    let root = project.path();
    let manager = config_for(root);
    fs::write(root.join("internal").join("logo.png"), [0x89u8, 0x50, 0xff, 0xd8]).unwrap();

    let result = utils::run_strip(&manager, RunOptions::default());
    assert!(result.is_err(), "an unreadable file should fail the run");

    // The other roots were still processed under the default skip-root policy.
    assert_eq!(
        fs::read_to_string(root.join("deploy/helm/values.yaml")).unwrap(),
        "replicas: 1\n"
    );
}

#[test]
fn test_validate_reports_missing_roots() {
    let project = tempfile::tempdir().unwrap();
    let manager = ConfigManager::new_at(project.path());
    manager.initialize().unwrap();

    let mut config = manager.load_config().unwrap();
    config.roots = vec![project.path().join("nowhere")];
    manager.save_config(&config).unwrap();

    let issues = manager.validate_config().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(utils::validate_config(&manager).is_err());
}

#[test]
fn test_config_verbose_raises_log_level() {
    let project = tempfile::tempdir().unwrap();
    let manager = ConfigManager::new_at(project.path());
    assert_eq!(utils::log_level(false, &manager), "info");
    assert_eq!(utils::log_level(true, &manager), "debug");

    manager.initialize().unwrap();
    let mut config = manager.load_config().unwrap();
    config.global_settings.verbose = true;
    manager.save_config(&config).unwrap();

    assert_eq!(utils::log_level(false, &manager), "debug");
}

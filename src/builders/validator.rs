use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::builders::patterns::{MarkerBlock, MarkerSettings};
use crate::core::config::StripperConfig;

/// The `ConfigValidator` trait defines the public interface for validating
/// a `StripperConfig` before any file is touched.
pub trait ConfigValidator {
    /// Performs a full validation of the configuration and returns a list of
    /// human-readable issues. An empty list means the configuration is usable.
    fn validate_config(&self, config: &StripperConfig) -> Result<Vec<String>>;

    /// Validates the pair of marker phrases on their own.
    fn validate_markers(&self, markers: &MarkerSettings) -> Vec<String>;
}

/// Runs the standard checks: version, markers, ignore names and roots.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }

    /// Ignore entries are compared against base names, so anything that
    /// looks like a path can never match.
    fn check_ignored(&self, ignored: &[String]) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for name in ignored {
            if name.trim().is_empty() {
                issues.push("Empty entry in ignore list".to_string());
                continue;
            }
            if name.contains(['/', '\\']) {
                issues.push(format!(
                    "Ignore entry '{name}' contains a path separator; only base names are matched"
                ));
            }
            if !seen.insert(name.as_str()) {
                issues.push(format!("Duplicate ignore entry '{name}'"));
            }
        }
        issues
    }

    fn check_roots(&self, roots: &[PathBuf]) -> Vec<String> {
        if roots.is_empty() {
            return vec!["No root directories configured".to_string()];
        }

        roots
            .iter()
            .filter_map(|root| {
                if !root.exists() {
                    Some(format!("Root not found: {}", root.display()))
                } else if !root.is_dir() {
                    Some(format!("Root is not a directory: {}", root.display()))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &StripperConfig) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if config.version != "1.0" {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        issues.extend(self.validate_markers(&config.markers));
        issues.extend(self.check_ignored(&config.ignored));
        issues.extend(self.check_roots(&config.roots));

        Ok(issues)
    }

    fn validate_markers(&self, markers: &MarkerSettings) -> Vec<String> {
        let mut issues = Vec::new();

        if let Err(e) = MarkerBlock::from_settings(markers) {
            issues.push(format!("Invalid markers: {e}"));
        }
        if markers.start.trim() == markers.end.trim() && !markers.start.trim().is_empty() {
            issues.push("Start and end markers are identical".to_string());
        }

        issues
    }
}

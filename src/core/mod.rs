// This file is the module declaration file for the `core` module.
// It declares the submodules contained within `src/core/` and exposes
// them to the rest of the crate.

// `config` module:
// This module is responsible for managing the application's configuration.
// It defines the data structures for the configuration file (`StripperConfig`,
// `GlobalSettings`, `FailurePolicy`), provides a `ConfigProvider` trait for
// abstracting configuration access, and includes a `ConfigManager` that loads
// and saves the file as TOML, JSON or YAML depending on its extension.
pub mod config;

// `engine` module:
// This module holds the `StripEngine`, which walks the root directories,
// skips ignored file names, removes the copyright block from every other
// file, and collects the outcome of the run in a `RunSummary`.
pub mod engine;

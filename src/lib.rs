//! Removes a leading copyright block from every file below a set of
//! directories.
//!
//! A block starts at a line beginning with a fixed opening phrase and ends
//! at the nearest following line beginning with a fixed closing phrase. Only
//! the first block of each file is removed; everything else is written back
//! byte for byte.
//!
//! ```rust,no_run
//! use copyright_strip::builders::patterns::{IgnoreSet, MarkerBlock, MarkerSettings};
//! use copyright_strip::core::engine::StripEngine;
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let block = MarkerBlock::from_settings(&MarkerSettings::default())?;
//!     let engine = StripEngine::new(block, IgnoreSet::defaults());
//!     let summary = engine.process_directories(&[PathBuf::from("internal")]);
//!     println!("stripped {} files", summary.stripped.len());
//!     Ok(())
//! }
//! ```

pub mod builders;
pub mod core;
pub mod utils;

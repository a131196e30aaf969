// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules encapsulate the matching, validation and
// reporting logic used by the engine.

// `patterns` module:
// This is a fundamental module that defines the copyright block matcher
// (`MarkerBlock` and the `BlockMatcher` trait) and the `IgnoreSet` of file
// base names that are never processed.
pub mod patterns;

// `reporter` module:
// This module is responsible for presenting the result of a run. It defines
// a `StatusReporter` trait with a colored `ConsoleReporter` and a
// `JsonReporter` implementation.
pub mod reporter;

// `validator` module:
// This module is dedicated to ensuring the integrity and correctness of
// the configuration. It defines the `ConfigValidator` trait and a
// `StandardValidator` implementation to check markers, ignore entries,
// and root directories before a run.
pub mod validator;

//! # regroup-gradle
//!
//! Gradle build-script support for regroup.
//!
//! Scans Groovy DSL build files (build.gradle) into a lossless declaration-level
//! tree, then rewrites the group segment of matching dependency coordinates while
//! leaving every other byte untouched. Handles quoted and double-quoted colon
//! notation, map-style keyword arguments, interpolated GStrings, and
//! `platform`/`enforcedPlatform` wrappers. Declarations whose group is written as
//! an embedded expression are skipped, never guessed at.

pub mod notation;
pub mod planner;
pub mod scanner;
pub mod tree;
pub mod walker;

pub use notation::PLACEHOLDER;
pub use scanner::scan;
pub use tree::{Declaration, DependencyArg, GStringSegment, MapEntry, Node, Script};
pub use walker::{DependencyMatch, RewriteOutcome, change_dependency_group, find_dependencies};

use regroup_core::{GroupChange, RewriteError};

/// Scan and rewrite in one step: the common text-in, text-out entry point.
pub fn rewrite_build_script(
    source: &str,
    change: &GroupChange,
) -> Result<RewriteOutcome, RewriteError> {
    change_dependency_group(&scanner::scan(source), change)
}

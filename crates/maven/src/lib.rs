//! # regroup-maven
//!
//! Maven POM support for regroup.
//!
//! Searches and rewrites `<dependency>` coordinates with quick-xml, streaming
//! the document through a reader/writer pair so that everything outside the
//! targeted `<groupId>` text nodes (indentation, comments, attribute order)
//! is copied through untouched. Covers `<dependencies>`,
//! `<dependencyManagement>`, and profile dependency sections.

pub mod pom;

pub use pom::{
    PomDependency, PomRewrite, change_dependency_group, find_dependencies, sync_resolved_model,
};

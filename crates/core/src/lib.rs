//! # regroup-core
//!
//! Core types for regroup: the dependency coordinate model, the group/artifact
//! pattern matcher, rewrite request validation, and the resolved-dependency index
//! that search and verification flows consult.
//!
//! Everything in this crate is pure data and pure functions; file handling and
//! build-file syntax live in the `regroup-gradle` and `regroup-maven` crates.

pub mod coordinate;
pub mod error;
pub mod pattern;
pub mod request;
pub mod resolved;

pub use coordinate::Coordinate;
pub use error::RewriteError;
pub use pattern::CoordinatePattern;
pub use request::GroupChange;
pub use resolved::{ResolvedDependencyRecord, ResolvedModel};

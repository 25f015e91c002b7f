use crate::coordinate::Coordinate;
use crate::error::RewriteError;

/// The reserved token matching any value in a pattern position.
pub const WILDCARD: &str = "*";

/// A group/artifact pattern. Each segment is either exact text or the whole-segment
/// wildcard token; there is no infix glob support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatePattern {
    group: String,
    artifact: String,
}

impl CoordinatePattern {
    /// Build a pattern. Empty segments are rejected here, at the caller-facing
    /// boundary; the matching engines assume well-formed patterns.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
    ) -> Result<Self, RewriteError> {
        let group = group.into();
        let artifact = artifact.into();
        if group.is_empty() || artifact.is_empty() {
            return Err(RewriteError::EmptyPattern);
        }
        Ok(Self { group, artifact })
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Case-sensitive match over group and artifact; version never participates.
    #[must_use]
    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.matches_parts(&coordinate.group, &coordinate.artifact)
    }

    #[must_use]
    pub fn matches_parts(&self, group: &str, artifact: &str) -> bool {
        segment_matches(&self.group, group) && segment_matches(&self.artifact, artifact)
    }
}

fn segment_matches(pattern: &str, value: &str) -> bool {
    pattern == WILDCARD || pattern == value
}

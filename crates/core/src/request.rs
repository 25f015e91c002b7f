use crate::error::RewriteError;
use crate::pattern::CoordinatePattern;

/// A validated group-change request: which declarations to match and what to
/// rename their group to.
///
/// `new_version` is accepted at this boundary and carried for a version-rewrite
/// collaborator; nothing in this workspace acts on it. An empty string is the
/// recognized "no version change" sentinel and is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChange {
    pattern: CoordinatePattern,
    new_group: String,
    new_version: Option<String>,
}

impl GroupChange {
    pub fn new(
        old_group_pattern: impl Into<String>,
        old_artifact_pattern: impl Into<String>,
        new_group: impl Into<String>,
        new_version: Option<String>,
    ) -> Result<Self, RewriteError> {
        let pattern = CoordinatePattern::new(old_group_pattern, old_artifact_pattern)?;
        let new_group = new_group.into();
        if new_group.is_empty() {
            return Err(RewriteError::EmptyNewGroup);
        }
        let new_version = new_version.filter(|v| !v.is_empty());
        Ok(Self {
            pattern,
            new_group,
            new_version,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &CoordinatePattern {
        &self.pattern
    }

    #[must_use]
    pub fn new_group(&self) -> &str {
        &self.new_group
    }

    #[must_use]
    pub fn new_version(&self) -> Option<&str> {
        self.new_version.as_deref()
    }
}

use std::fmt;

/// A logical dependency coordinate parsed from a declaration.
///
/// Identity is (group, artifact); version, classifier, and extension are
/// descriptive. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub extension: Option<String>,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
            classifier: None,
            extension: None,
        }
    }

    /// Parse colon notation: `group:artifact[:version[:classifier]][@extension]`.
    ///
    /// Returns `None` for anything that is not a recognizable coordinate: fewer
    /// than two segments, more than four, an empty group or artifact, or an
    /// `@extension` suffix that itself contains a colon.
    #[must_use]
    pub fn parse(notation: &str) -> Option<Self> {
        let (body, extension) = match notation.rsplit_once('@') {
            Some((_, ext)) if ext.is_empty() || ext.contains(':') => return None,
            Some((body, ext)) => (body, Some(ext.to_string())),
            None => (notation, None),
        };

        let segments: Vec<&str> = body.split(':').collect();
        if segments.len() < 2 || segments.len() > 4 {
            return None;
        }
        if segments[0].is_empty() || segments[1].is_empty() {
            return None;
        }

        Some(Self {
            group: segments[0].to_string(),
            artifact: segments[1].to_string(),
            version: segments.get(2).map(|s| (*s).to_string()),
            classifier: segments.get(3).map(|s| (*s).to_string()),
            extension,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        if let Some(extension) = &self.extension {
            write!(f, "@{extension}")?;
        }
        Ok(())
    }
}

use std::collections::HashMap;

/// One resolved dependency as reported by the build tool for a named
/// configuration. Populated from the optional resolved-project snapshot; this
/// workspace never resolves anything itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencyRecord {
    pub configuration: String,
    pub group: String,
    pub artifact: String,
    pub version: String,
}

/// Advisory index over resolved dependencies, keyed by
/// (configuration, group, artifact).
///
/// The rewrite itself never reads this index; search and verification flows do.
/// After a declaration's group is rewritten, [`ResolvedModel::record_group_change`]
/// rekeys the matching record so downstream consumers see the declaration
/// reflected in the resolved model. A missing record is a silent no-op: the index
/// never blocks a textual rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedModel {
    records: HashMap<(String, String, String), ResolvedDependencyRecord>,
}

impl ResolvedModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ResolvedDependencyRecord>) -> Self {
        let mut model = Self::new();
        for record in records {
            model.insert(record);
        }
        model
    }

    pub fn insert(&mut self, record: ResolvedDependencyRecord) {
        self.records.insert(
            (
                record.configuration.clone(),
                record.group.clone(),
                record.artifact.clone(),
            ),
            record,
        );
    }

    #[must_use]
    pub fn lookup(
        &self,
        configuration: &str,
        group: &str,
        artifact: &str,
    ) -> Option<&ResolvedDependencyRecord> {
        self.records.get(&(
            configuration.to_string(),
            group.to_string(),
            artifact.to_string(),
        ))
    }

    /// Rekey the record for (configuration, old_group, artifact) under the new
    /// group, preserving its version. No-ops when the record is absent.
    pub fn record_group_change(
        &mut self,
        configuration: &str,
        old_group: &str,
        artifact: &str,
        new_group: &str,
    ) {
        let old_key = (
            configuration.to_string(),
            old_group.to_string(),
            artifact.to_string(),
        );
        if let Some(mut record) = self.records.remove(&old_key) {
            record.group = new_group.to_string();
            self.insert(record);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

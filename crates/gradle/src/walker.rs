use std::sync::Arc;

use regroup_core::{Coordinate, CoordinatePattern, GroupChange, RewriteError};

use crate::planner;
use crate::tree::{Node, Script};

/// One matched declaration site, addressed by its node index in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMatch {
    pub node_index: usize,
    pub configuration: String,
    pub coordinate: Coordinate,
}

/// Search flow: every declaration whose coordinate satisfies the pattern, in
/// document order. Read-only; the result set replaces any ambient marker state.
#[must_use]
pub fn find_dependencies(script: &Script, pattern: &CoordinatePattern) -> Vec<DependencyMatch> {
    script
        .declarations()
        .filter_map(|(node_index, declaration)| {
            let coordinate = declaration.coordinate()?;
            pattern.matches(&coordinate).then(|| DependencyMatch {
                node_index,
                configuration: declaration.configuration.clone(),
                coordinate,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub script: Script,
    /// Number of declarations whose text actually changed.
    pub changed: usize,
    /// Sites that matched the pattern but whose group is written as an embedded
    /// expression and was left untouched.
    pub skipped_dynamic: Vec<DependencyMatch>,
}

/// Rewrite the group of every matching declaration, producing a new script that
/// shares all untouched nodes with the input.
///
/// Single deterministic document-order pass. All edits are planned before any
/// is applied; a planning failure surfaces the error with the input script left
/// fully intact, never half-rewritten. Zero matches is a clean no-op. The
/// resolved model, when attached, is synchronized per rewritten declaration.
pub fn change_dependency_group(
    script: &Script,
    change: &GroupChange,
) -> Result<RewriteOutcome, RewriteError> {
    let mut replacements = Vec::new();
    let mut skipped_dynamic = Vec::new();

    for (node_index, declaration) in script.declarations() {
        let Some(coordinate) = declaration.coordinate() else {
            continue;
        };
        if !change.pattern().matches(&coordinate) {
            continue;
        }
        match planner::plan(declaration, change.new_group()) {
            Some(edit) => {
                // No-op edit: keep the node's identity rather than churn it.
                if coordinate.group == change.new_group() {
                    continue;
                }
                let rewritten = planner::apply(declaration, &edit)?;
                replacements.push((node_index, rewritten, coordinate));
            }
            None => skipped_dynamic.push(DependencyMatch {
                node_index,
                configuration: declaration.configuration.clone(),
                coordinate,
            }),
        }
    }

    let mut nodes = script.nodes.clone();
    let mut resolved = script.resolved.clone();
    let changed = replacements.len();
    for (node_index, declaration, old) in replacements {
        if let Some(model) = resolved.as_mut() {
            model.record_group_change(
                &declaration.configuration,
                &old.group,
                &old.artifact,
                change.new_group(),
            );
        }
        nodes[node_index] = Arc::new(Node::Declaration(declaration));
    }

    Ok(RewriteOutcome {
        script: Script { nodes, resolved },
        changed,
        skipped_dynamic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    use regroup_core::{ResolvedDependencyRecord, ResolvedModel};

    fn change(group: &str, artifact: &str, new_group: &str) -> GroupChange {
        GroupChange::new(group, artifact, new_group, None).unwrap()
    }

    #[test]
    fn test_spring_boot_starter_example() {
        let before = r#"plugins {
    id 'java-library'
}

repositories {
    mavenCentral()
}

dependencies {
    implementation 'org.springframework.boot:spring-boot-starter:2.5.4'
}
"#;
        let after = before.replace(
            "org.springframework.boot:spring-boot-starter",
            "org.newboot:spring-boot-starter",
        );

        let script = scan(before);
        let outcome = change_dependency_group(
            &script,
            &change("org.springframework.boot", "spring-boot-starter", "org.newboot"),
        )
        .unwrap();

        assert_eq!(outcome.script.to_source(), after);
        assert_eq!(outcome.changed, 1);
        assert!(outcome.skipped_dynamic.is_empty());
    }

    #[test]
    fn test_map_style_full_wildcard_example() {
        let before = "dependencies {\n    api group: 'org.openrewrite', name: 'rewrite-core', version: 'latest.release', classifier: 'classifier', ext: 'ext'\n}\n";
        let script = scan(before);
        let outcome =
            change_dependency_group(&script, &change("*", "*", "org.dewrite")).unwrap();
        assert_eq!(
            outcome.script.to_source(),
            "dependencies {\n    api group: 'org.dewrite', name: 'rewrite-core', version: 'latest.release', classifier: 'classifier', ext: 'ext'\n}\n"
        );
    }

    #[test]
    fn test_platform_and_plain_sibling_example() {
        let before = r#"dependencies {
    implementation platform("org.optaplanner:optaplanner-bom:9.37.0.Final")
    implementation "org.optaplanner:optaplanner-core"
}
"#;
        let script = scan(before);
        let outcome =
            change_dependency_group(&script, &change("org.optaplanner", "*", "ai.timefold.solver"))
                .unwrap();
        assert_eq!(
            outcome.script.to_source(),
            r#"dependencies {
    implementation platform("ai.timefold.solver:optaplanner-bom:9.37.0.Final")
    implementation "ai.timefold.solver:optaplanner-core"
}
"#
        );
        assert_eq!(outcome.changed, 2);
    }

    #[test]
    fn test_gstring_version_example() {
        let before = r#"dependencies {
    def jakartaVersion = "2.0.1.Final"
    implementation "javax.validation:validation-api:${jakartaVersion}"
}
"#;
        let script = scan(before);
        let outcome = change_dependency_group(
            &script,
            &change("javax.validation", "validation-api", "jakarta.validation"),
        )
        .unwrap();
        assert_eq!(
            outcome.script.to_source(),
            r#"dependencies {
    def jakartaVersion = "2.0.1.Final"
    implementation "jakarta.validation:validation-api:${jakartaVersion}"
}
"#
        );
    }

    #[test]
    fn test_quote_style_shape_equivalence() {
        let before = r#"dependencies {
    api 'org.openrewrite:rewrite-core:latest.release'
    api "org.openrewrite:rewrite-core:latest.release"
    api group: 'org.openrewrite', name: 'rewrite-core', version: 'latest.release'
    api group: "org.openrewrite", name: "rewrite-core", version: "latest.release"
}
"#;
        let script = scan(before);
        let outcome = change_dependency_group(
            &script,
            &change("org.openrewrite", "rewrite-core", "org.dewrite"),
        )
        .unwrap();
        assert_eq!(
            outcome.script.to_source(),
            r#"dependencies {
    api 'org.dewrite:rewrite-core:latest.release'
    api "org.dewrite:rewrite-core:latest.release"
    api group: 'org.dewrite', name: 'rewrite-core', version: 'latest.release'
    api group: "org.dewrite", name: "rewrite-core", version: "latest.release"
}
"#
        );
        assert_eq!(outcome.changed, 4);
    }

    #[test]
    fn test_ext_grid() {
        let before = r#"dependencies {
    api 'org.openrewrite:rewrite-core@ext'
    api "org.openrewrite:rewrite-core:latest.release@ext"
    api 'org.openrewrite:rewrite-core:latest.release:classifier@ext'
    api group: 'org.openrewrite', name: 'rewrite-core', ext: 'ext'
    api group: "org.openrewrite", name: "rewrite-core", version: "latest.release", classifier: "classifier", ext: "ext"
}
"#;
        let script = scan(before);
        let outcome = change_dependency_group(
            &script,
            &change("org.openrewrite", "rewrite-core", "org.dewrite"),
        )
        .unwrap();
        let after = outcome.script.to_source();
        assert_eq!(after.matches("org.dewrite").count(), 5);
        assert!(!after.contains("org.openrewrite"));
        assert_eq!(after.matches("@ext").count(), 3);
        assert_eq!(after.matches("classifier").count(), 3);
    }

    #[test]
    fn test_idempotence() {
        let before = r#"dependencies {
    implementation 'org.springframework.boot:spring-boot-starter:2.5.4'
}
"#;
        let request = change("*", "*", "org.newboot");
        let first = change_dependency_group(&scan(before), &request).unwrap();
        let second = change_dependency_group(&scan(&first.script.to_source()), &request).unwrap();
        assert_eq!(second.script.to_source(), first.script.to_source());
        assert_eq!(second.changed, 0);
    }

    #[test]
    fn test_wildcard_coverage() {
        let source = r#"dependencies {
    api 'org.openrewrite:rewrite-core:7.0.0'
    implementation 'com.google.guava:guava:31.1-jre'
    testImplementation 'junit:junit:4.13.2'
}
"#;
        let script = scan(source);
        let all = find_dependencies(&script, &CoordinatePattern::new("*", "*").unwrap());
        assert_eq!(all.len(), 3);

        let guava_group =
            find_dependencies(&script, &CoordinatePattern::new("com.google.guava", "*").unwrap());
        assert_eq!(guava_group.len(), 1);
        assert_eq!(guava_group[0].coordinate.artifact, "guava");
        assert_eq!(guava_group[0].configuration, "implementation");
    }

    #[test]
    fn test_configuration_named_lines_outside_dependencies_are_untouched() {
        let source = "configurations {\n    // dependencies { (legacy)\n    api 'g:a:1.0'\n}\n";
        let outcome =
            change_dependency_group(&scan(source), &change("*", "*", "org.new")).unwrap();
        assert_eq!(outcome.script.to_source(), source);
        assert_eq!(outcome.changed, 0);
    }

    #[test]
    fn test_interpolated_group_is_skipped_and_reported() {
        let source = "dependencies {\n    implementation \"${grp}suffix:artifact:1.0\"\n}\n";
        let script = scan(source);
        let outcome = change_dependency_group(&script, &change("*", "*", "org.new")).unwrap();
        assert_eq!(outcome.script.to_source(), source);
        assert_eq!(outcome.changed, 0);
        assert_eq!(outcome.skipped_dynamic.len(), 1);
        assert_eq!(outcome.skipped_dynamic[0].coordinate.artifact, "artifact");
    }

    #[test]
    fn test_non_matching_nodes_keep_reference_identity() {
        let source = r#"dependencies {
    api 'org.openrewrite:rewrite-core:7.0.0'
    implementation 'com.google.guava:guava:31.1-jre'
}
"#;
        let script = scan(source);
        let outcome = change_dependency_group(
            &script,
            &change("com.google.guava", "guava", "com.guava.next"),
        )
        .unwrap();

        let mut shared = 0;
        let mut replaced = 0;
        for (old, new) in script.nodes.iter().zip(outcome.script.nodes.iter()) {
            if Arc::ptr_eq(old, new) {
                shared += 1;
            } else {
                replaced += 1;
            }
        }
        assert_eq!(replaced, 1);
        assert!(shared >= 2);
        // Old value still prints the original text.
        assert_eq!(script.to_source(), source);
    }

    #[test]
    fn test_no_op_rewrite_shares_every_node() {
        let source = "dependencies {\n    api 'org.openrewrite:rewrite-core:7.0.0'\n}\n";
        let script = scan(source);
        let outcome = change_dependency_group(
            &script,
            &change("org.openrewrite", "rewrite-core", "org.openrewrite"),
        )
        .unwrap();
        assert_eq!(outcome.changed, 0);
        for (old, new) in script.nodes.iter().zip(outcome.script.nodes.iter()) {
            assert!(Arc::ptr_eq(old, new));
        }
    }

    #[test]
    fn test_resolved_model_synchronized_after_rewrite() {
        let source = "dependencies {\n    api 'org.openrewrite:rewrite-core:7.0.0'\n}\n";
        let mut script = scan(source);
        script.resolved = Some(ResolvedModel::from_records([ResolvedDependencyRecord {
            configuration: "api".to_string(),
            group: "org.openrewrite".to_string(),
            artifact: "rewrite-core".to_string(),
            version: "7.0.0".to_string(),
        }]));

        let outcome = change_dependency_group(
            &script,
            &change("org.openrewrite", "rewrite-core", "org.dewrite"),
        )
        .unwrap();

        let resolved = outcome.script.resolved.unwrap();
        assert!(resolved.lookup("api", "org.openrewrite", "rewrite-core").is_none());
        let record = resolved.lookup("api", "org.dewrite", "rewrite-core").unwrap();
        assert_eq!(record.version, "7.0.0");
    }

    #[test]
    fn test_rewrite_without_resolved_model_still_proceeds() {
        let source = "dependencies {\n    api 'g:a:1.0'\n}\n";
        let outcome =
            change_dependency_group(&scan(source), &change("g", "a", "g2")).unwrap();
        assert_eq!(outcome.changed, 1);
        assert!(outcome.script.resolved.is_none());
    }

    #[test]
    fn test_locality_only_group_bytes_differ() {
        let before = "dependencies {\n    api \"org.openrewrite:rewrite-core:latest.release:classifier@ext\"\n}\n";
        let script = scan(before);
        let outcome = change_dependency_group(
            &script,
            &change("org.openrewrite", "rewrite-core", "org.dewrite"),
        )
        .unwrap();
        let after = outcome.script.to_source();
        let expected = before.replacen("org.openrewrite", "org.dewrite", 1);
        assert_eq!(after, expected);
    }
}

use regroup_core::RewriteError;

use crate::notation::is_dynamic_value;
use crate::tree::{Declaration, DependencyArg, GStringSegment, MapEntry};

/// A pending, not-yet-applied change to one declaration's group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub new_group: String,
}

/// Decide whether the declaration's group occupies a contiguous literal span
/// that can be replaced. Returns `None` for any group that is partially or
/// fully an embedded expression: safety over completeness, the site is left
/// untouched.
///
/// A matching site whose group already equals `new_group` still yields an
/// `Edit`; the applier may special-case the no-op to avoid tree-identity churn.
#[must_use]
pub fn plan(declaration: &Declaration, new_group: &str) -> Option<Edit> {
    if group_is_literal_span(&declaration.arg) {
        Some(Edit {
            new_group: new_group.to_string(),
        })
    } else {
        None
    }
}

fn group_is_literal_span(arg: &DependencyArg) -> bool {
    match arg {
        DependencyArg::StringLiteral { value, .. } => {
            value.find(':').is_some_and(|colon| colon > 0)
        }
        // The group is rewritable only when the first segment is literal text
        // that already contains the first colon; otherwise the group span
        // includes an interpolation.
        DependencyArg::GString { segments } => matches!(
            segments.first(),
            Some(GStringSegment::Literal(text)) if text.find(':').is_some_and(|colon| colon > 0)
        ),
        DependencyArg::MapStyle { entries } => entries
            .iter()
            .find(|entry| entry.key == "group")
            .is_some_and(|entry| !is_dynamic_value(entry.quote, &entry.value)),
        DependencyArg::Platform { inner, .. } => group_is_literal_span(inner),
    }
}

/// Apply an edit as a pure old-node to new-node function. Only the textual
/// region encoding the group field differs; quotes, spacing, and every other
/// segment are carried over unchanged.
pub fn apply(declaration: &Declaration, edit: &Edit) -> Result<Declaration, RewriteError> {
    Ok(Declaration {
        configuration: declaration.configuration.clone(),
        open: declaration.open.clone(),
        arg: apply_to_arg(&declaration.arg, &edit.new_group)?,
        close: declaration.close.clone(),
    })
}

fn apply_to_arg(arg: &DependencyArg, new_group: &str) -> Result<DependencyArg, RewriteError> {
    match arg {
        DependencyArg::StringLiteral { quote, value } => {
            let colon = first_colon(value)?;
            Ok(DependencyArg::StringLiteral {
                quote: *quote,
                value: format!("{new_group}{}", &value[colon..]),
            })
        }
        DependencyArg::GString { segments } => {
            let Some(GStringSegment::Literal(first)) = segments.first() else {
                return Err(RewriteError::SpanOutOfBounds {
                    start: 0,
                    end: 0,
                    len: 0,
                });
            };
            let colon = first_colon(first)?;
            let mut rewritten = segments.clone();
            rewritten[0] = GStringSegment::Literal(format!("{new_group}{}", &first[colon..]));
            Ok(DependencyArg::GString {
                segments: rewritten,
            })
        }
        DependencyArg::MapStyle { entries } => {
            let rewritten = entries
                .iter()
                .map(|entry| {
                    if entry.key == "group" {
                        MapEntry {
                            leading: entry.leading.clone(),
                            key: entry.key.clone(),
                            separator: entry.separator.clone(),
                            quote: entry.quote,
                            value: new_group.to_string(),
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect();
            Ok(DependencyArg::MapStyle { entries: rewritten })
        }
        DependencyArg::Platform {
            function,
            open,
            inner,
            close,
        } => Ok(DependencyArg::Platform {
            function: function.clone(),
            open: open.clone(),
            inner: Box::new(apply_to_arg(inner, new_group)?),
            close: close.clone(),
        }),
    }
}

/// The group span ends strictly before the first colon. A missing colon here
/// means the node changed between planning and application: a file-local
/// defect, not a skip.
fn first_colon(text: &str) -> Result<usize, RewriteError> {
    text.find(':').ok_or(RewriteError::SpanOutOfBounds {
        start: 0,
        end: text.len(),
        len: text.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn declaration_of(source: &str) -> Declaration {
        let script = scan(source);
        let (_, declaration) = script.declarations().next().unwrap();
        declaration.clone()
    }

    fn rewrite(source: &str, new_group: &str) -> Option<String> {
        let declaration = declaration_of(source);
        let edit = plan(&declaration, new_group)?;
        let rewritten = apply(&declaration, &edit).unwrap();
        let mut out = String::new();
        rewritten.print(&mut out);
        Some(out)
    }

    #[test]
    fn test_string_literal_rewrites_only_the_group_span() {
        assert_eq!(
            rewrite(
                "dependencies {\n    implementation 'org.springframework.boot:spring-boot-starter:2.5.4'\n}\n",
                "org.newboot"
            )
            .unwrap(),
            "implementation 'org.newboot:spring-boot-starter:2.5.4'"
        );
    }

    #[test]
    fn test_double_quote_style_is_preserved() {
        assert_eq!(
            rewrite(
                "dependencies {\n    api \"org.openrewrite:rewrite-core:latest.release\"\n}\n",
                "org.dewrite"
            )
            .unwrap(),
            "api \"org.dewrite:rewrite-core:latest.release\""
        );
    }

    #[test]
    fn test_ext_suffix_is_untouched() {
        assert_eq!(
            rewrite(
                "dependencies {\n    api 'org.openrewrite:rewrite-core:latest.release:classifier@ext'\n}\n",
                "org.dewrite"
            )
            .unwrap(),
            "api 'org.dewrite:rewrite-core:latest.release:classifier@ext'"
        );
    }

    #[test]
    fn test_gstring_version_interpolation_survives() {
        assert_eq!(
            rewrite(
                "dependencies {\n    implementation \"javax.validation:validation-api:${jakartaVersion}\"\n}\n",
                "jakarta.validation"
            )
            .unwrap(),
            "implementation \"jakarta.validation:validation-api:${jakartaVersion}\""
        );
    }

    #[test]
    fn test_interpolated_group_is_never_rewritten() {
        assert_eq!(
            rewrite(
                "dependencies {\n    implementation \"${grp}:validation-api:1.0\"\n}\n",
                "jakarta.validation"
            ),
            None
        );
    }

    #[test]
    fn test_partially_interpolated_group_is_never_rewritten() {
        // Group continues into the interpolation: "org${suffix}:artifact:1.0".
        assert_eq!(
            rewrite(
                "dependencies {\n    implementation \"org${suffix}:validation-api:1.0\"\n}\n",
                "jakarta.validation"
            ),
            None
        );
    }

    #[test]
    fn test_map_style_rewrites_only_the_group_value() {
        assert_eq!(
            rewrite(
                "dependencies {\n    api group: 'org.openrewrite', name: 'rewrite-core', version: 'latest.release', classifier: 'classifier', ext: 'ext'\n}\n",
                "org.dewrite"
            )
            .unwrap(),
            "api group: 'org.dewrite', name: 'rewrite-core', version: 'latest.release', classifier: 'classifier', ext: 'ext'"
        );
    }

    #[test]
    fn test_map_style_dynamic_group_is_never_rewritten() {
        assert_eq!(
            rewrite(
                "dependencies {\n    api group: \"${grp}\", name: 'rewrite-core'\n}\n",
                "org.dewrite"
            ),
            None
        );
    }

    #[test]
    fn test_platform_wrapper_is_untouched() {
        assert_eq!(
            rewrite(
                "dependencies {\n    implementation platform(\"org.optaplanner:optaplanner-bom:9.37.0.Final\")\n}\n",
                "ai.timefold.solver"
            )
            .unwrap(),
            "implementation platform(\"ai.timefold.solver:optaplanner-bom:9.37.0.Final\")"
        );
    }

    #[test]
    fn test_same_group_still_plans_an_edit() {
        let declaration =
            declaration_of("dependencies {\n    api 'org.openrewrite:rewrite-core'\n}\n");
        assert!(plan(&declaration, "org.openrewrite").is_some());
    }
}

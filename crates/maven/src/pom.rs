use std::collections::HashSet;
use std::io::Cursor;

use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use regroup_core::{CoordinatePattern, GroupChange, ResolvedModel, RewriteError};

/// One `<dependency>` tag read from a POM, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomDependency {
    /// Ordinal of the tag among all `<dependency>` tags in the document.
    pub index: usize,
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub scope: Option<String>,
}

/// Result of a POM rewrite: the new document text plus the dependencies whose
/// `<groupId>` was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomRewrite {
    pub pom: String,
    pub changed: Vec<PomDependency>,
    /// Matching dependencies whose `<groupId>` is a property reference and was
    /// left untouched.
    pub skipped_dynamic: Vec<PomDependency>,
}

/// First-order dependency search over `<dependencies>` and
/// `<dependencyManagement>` sections, including profile dependencies.
/// Exclusions and plugins are not dependencies and are never reported.
pub fn find_dependencies(
    pom: &str,
    pattern: &CoordinatePattern,
) -> Result<Vec<PomDependency>, RewriteError> {
    Ok(collect_dependencies(pom)?
        .into_iter()
        .filter(|dependency| pattern.matches_parts(&dependency.group, &dependency.artifact))
        .collect())
}

/// Rewrite the `<groupId>` text of every dependency matching the request.
///
/// Two passes over the event stream: the first parses each `<dependency>` tag
/// and records which ordinals match, the second copies every event verbatim and
/// substitutes only the text node inside the matching tags' `<groupId>`.
/// Indentation, comments, attribute order, and the XML declaration all survive
/// the copy loop. A matching dependency whose group is a `${...}` property
/// reference is never rewritten; it is reported in `skipped_dynamic` instead.
/// Malformed XML fails the whole file; no partial rewrite.
pub fn change_dependency_group(
    pom: &str,
    change: &GroupChange,
) -> Result<PomRewrite, RewriteError> {
    let mut changed = Vec::new();
    let mut skipped_dynamic = Vec::new();
    for dependency in collect_dependencies(pom)? {
        if !change
            .pattern()
            .matches_parts(&dependency.group, &dependency.artifact)
        {
            continue;
        }
        if is_property_reference(&dependency.group) {
            skipped_dynamic.push(dependency);
        } else if dependency.group != change.new_group() {
            changed.push(dependency);
        }
    }
    if changed.is_empty() {
        return Ok(PomRewrite {
            pom: pom.to_string(),
            changed,
            skipped_dynamic,
        });
    }

    let targets: HashSet<usize> = changed.iter().map(|dependency| dependency.index).collect();
    let pom = rewrite_group_ids(pom, &targets, change.new_group())?;
    Ok(PomRewrite {
        pom,
        changed,
        skipped_dynamic,
    })
}

/// Reflect a completed rewrite in the resolved index: rekey each changed
/// dependency's record under the new group, scope standing in for the
/// configuration name (`compile` when unspecified). Missing records no-op.
pub fn sync_resolved_model(model: &mut ResolvedModel, changed: &[PomDependency], new_group: &str) {
    for dependency in changed {
        model.record_group_change(
            dependency.scope.as_deref().unwrap_or("compile"),
            &dependency.group,
            &dependency.artifact,
            new_group,
        );
    }
}

fn malformed(error: impl std::fmt::Display) -> RewriteError {
    RewriteError::MalformedXml(error.to_string())
}

/// True when a `<groupId>` value is a `${...}` property reference rather than
/// literal text. The value is known only at build time, so it can never be part
/// of a replacement span.
fn is_property_reference(text: &str) -> bool {
    text.contains("${")
}

/// True when `path` ends with `<dependencies><dependency>` plus the given field,
/// which keeps `<exclusion>` and `<plugin>` children out of consideration.
fn is_dependency_field(path: &[Vec<u8>], field: &[u8]) -> bool {
    let n = path.len();
    n >= 3
        && path[n - 1] == field
        && path[n - 2] == b"dependency"
        && path[n - 3] == b"dependencies"
}

fn is_dependency_tag(path: &[Vec<u8>]) -> bool {
    let n = path.len();
    n >= 2 && path[n - 1] == b"dependency" && path[n - 2] == b"dependencies"
}

fn collect_dependencies(pom: &str) -> Result<Vec<PomDependency>, RewriteError> {
    #[derive(Default)]
    struct Pending {
        group: Option<String>,
        artifact: Option<String>,
        version: Option<String>,
        scope: Option<String>,
    }

    let mut reader = Reader::from_str(pom);
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut dependencies = Vec::new();
    let mut ordinal = 0usize;
    let mut pending: Option<Pending> = None;
    let mut field: Option<Vec<u8>> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(e) => {
                path.push(e.local_name().as_ref().to_vec());
                if is_dependency_tag(&path) {
                    pending = Some(Pending::default());
                } else if pending.is_some()
                    && let Some(name) = path.last()
                    && matches!(
                        name.as_slice(),
                        b"groupId" | b"artifactId" | b"version" | b"scope"
                    )
                    && is_dependency_field(&path, name)
                {
                    field = Some(name.clone());
                }
            }
            Event::End(_) => {
                if is_dependency_tag(&path) {
                    if let Some(done) = pending.take()
                        && let (Some(group), Some(artifact)) = (done.group, done.artifact)
                    {
                        dependencies.push(PomDependency {
                            index: ordinal,
                            group,
                            artifact,
                            version: done.version,
                            scope: done.scope,
                        });
                    }
                    ordinal += 1;
                }
                field = None;
                path.pop();
            }
            Event::Text(e) => {
                if let (Some(pending), Some(field)) = (pending.as_mut(), field.as_deref()) {
                    let text = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                    match field {
                        b"groupId" => pending.group = Some(text),
                        b"artifactId" => pending.artifact = Some(text),
                        b"version" => pending.version = Some(text),
                        b"scope" => pending.scope = Some(text),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(dependencies)
}

fn rewrite_group_ids(
    pom: &str,
    targets: &HashSet<usize>,
    new_group: &str,
) -> Result<String, RewriteError> {
    let mut reader = Reader::from_str(pom);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut ordinal = 0usize;
    let mut current: Option<usize> = None;
    let mut in_target_group = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(e) => {
                path.push(e.local_name().as_ref().to_vec());
                if is_dependency_tag(&path) {
                    current = Some(ordinal);
                } else if is_dependency_field(&path, b"groupId") {
                    in_target_group = current.is_some_and(|index| targets.contains(&index));
                }
                writer.write_event(Event::Start(e.clone())).map_err(malformed)?;
            }
            Event::End(e) => {
                if is_dependency_tag(&path) {
                    current = None;
                    ordinal += 1;
                }
                in_target_group = false;
                path.pop();
                writer.write_event(Event::End(e.clone())).map_err(malformed)?;
            }
            Event::Text(e) => {
                if in_target_group {
                    // Preserve any whitespace around the text inside <groupId>.
                    let raw = String::from_utf8_lossy(e.as_ref()).to_string();
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        writer.write_event(Event::Text(e.clone())).map_err(malformed)?;
                    } else {
                        let replaced = raw.replacen(trimmed, new_group, 1);
                        writer
                            .write_event(Event::Text(BytesText::from_escaped(replaced)))
                            .map_err(malformed)?;
                    }
                } else {
                    writer.write_event(Event::Text(e.clone())).map_err(malformed)?;
                }
            }
            Event::Eof => break,
            other => writer.write_event(other).map_err(malformed)?,
        }
        buf.clear();
    }

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(malformed)
}

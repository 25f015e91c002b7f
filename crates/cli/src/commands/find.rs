use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::future::try_join_all;
use regroup_core::{Coordinate, CoordinatePattern};
use regroup_gradle::PLACEHOLDER;
use serde_json::json;
use tokio::fs::read_to_string;

use crate::build_file::{BuildFileKind, detect_build_file};

#[derive(Args, Debug)]
#[command(about = "Find dependency declarations matching a group/artifact pattern")]
pub struct FindArgs {
    /// Group pattern: exact text or `*`
    #[arg(short, long)]
    pub group: String,

    /// Artifact pattern: exact text or `*`
    #[arg(short, long)]
    pub artifact: String,

    /// Emit results as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// build.gradle and pom.xml files to search
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
struct FileMatches {
    path: PathBuf,
    matches: Vec<MatchLine>,
}

#[derive(Debug)]
struct MatchLine {
    configuration: String,
    coordinate: String,
}

pub async fn handle_find(args: &FindArgs) -> Result<()> {
    let pattern = CoordinatePattern::new(&args.group, &args.artifact)?;

    let per_file = try_join_all(args.files.iter().map(|path| find_in_file(path, &pattern))).await?;

    if args.json {
        let report = json!(
            per_file
                .iter()
                .map(|file| {
                    json!({
                        "file": file.path.display().to_string(),
                        "matches": file
                            .matches
                            .iter()
                            .map(|m| json!({
                                "configuration": m.configuration,
                                "coordinate": m.coordinate,
                            }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect::<Vec<_>>()
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for file in &per_file {
        if file.matches.is_empty() {
            continue;
        }
        println!("{}", file.path.display().to_string().bold());
        for found in &file.matches {
            println!("  {} {}", found.configuration.cyan(), found.coordinate);
        }
    }
    let total: usize = per_file.iter().map(|file| file.matches.len()).sum();
    println!("Found {total} matching declaration(s)");
    Ok(())
}

async fn find_in_file(path: &Path, pattern: &CoordinatePattern) -> Result<FileMatches> {
    let kind = detect_build_file(path)?;
    let source = read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let matches = match kind {
        BuildFileKind::Gradle => {
            let script = regroup_gradle::scan(&source);
            regroup_gradle::find_dependencies(&script, pattern)
                .into_iter()
                .map(|found| MatchLine {
                    configuration: found.configuration,
                    coordinate: display_coordinate(&found.coordinate),
                })
                .collect()
        }
        BuildFileKind::Pom => regroup_maven::find_dependencies(&source, pattern)?
            .into_iter()
            .map(|found| MatchLine {
                configuration: found.scope.unwrap_or_else(|| "compile".to_string()),
                coordinate: match &found.version {
                    Some(version) => format!("{}:{}:{version}", found.group, found.artifact),
                    None => format!("{}:{}", found.group, found.artifact),
                },
            })
            .collect(),
    };

    Ok(FileMatches {
        path: path.to_path_buf(),
        matches,
    })
}

/// Render a coordinate for display, showing embedded-expression positions as
/// `${..}` instead of the internal placeholder token.
fn display_coordinate(coordinate: &Coordinate) -> String {
    coordinate
        .to_string()
        .replace(PLACEHOLDER, "${..}")
}

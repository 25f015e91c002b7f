use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::future::try_join_all;
use regroup_core::GroupChange;
use tokio::fs::{read_to_string, write};

use crate::build_file::{BuildFileKind, detect_build_file};

#[derive(Args, Debug)]
#[command(about = "Rewrite the group of matching dependency declarations")]
pub struct ChangeArgs {
    /// Old group pattern: exact text or `*`
    #[arg(short, long)]
    pub group: String,

    /// Old artifact pattern: exact text or `*`
    #[arg(short, long)]
    pub artifact: String,

    #[arg(long)]
    pub new_group: String,

    /// Accepted and carried for a version-rewrite step; this command never
    /// touches version fields. An empty string means "no version change".
    #[arg(long)]
    pub new_version: Option<String>,

    /// Report what would change without writing any file
    #[arg(short, long, default_value = "false")]
    pub dry_run: bool,

    /// build.gradle and pom.xml files to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
struct FileReport {
    path: PathBuf,
    changed: usize,
    skipped_dynamic: usize,
}

/// Rewrite dependency groups across the given files, each file processed
/// independently and written back only when its whole rewrite succeeded.
pub async fn handle_change(args: &ChangeArgs) -> Result<()> {
    let change = GroupChange::new(
        &args.group,
        &args.artifact,
        &args.new_group,
        args.new_version.clone(),
    )?;

    let reports = try_join_all(
        args.files
            .iter()
            .map(|path| change_file(path, &change, args.dry_run)),
    )
    .await?;

    let mut total = 0;
    for report in &reports {
        total += report.changed;
        let status = if report.changed > 0 {
            format!("{} changed", report.changed).green().to_string()
        } else {
            "unchanged".to_string()
        };
        println!("{}: {}", report.path.display(), status);
        if report.skipped_dynamic > 0 {
            println!(
                "{}",
                format!(
                    "  {} matching declaration(s) skipped: group is a dynamic expression",
                    report.skipped_dynamic
                )
                .yellow()
            );
        }
    }
    if args.dry_run && total > 0 {
        println!("{}", "dry run: no files were written".yellow());
    }
    Ok(())
}

async fn change_file(path: &Path, change: &GroupChange, dry_run: bool) -> Result<FileReport> {
    let kind = detect_build_file(path)?;
    let source = read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (rewritten, changed, skipped_dynamic) = match kind {
        BuildFileKind::Gradle => {
            let outcome = regroup_gradle::rewrite_build_script(&source, change)?;
            (
                outcome.script.to_source(),
                outcome.changed,
                outcome.skipped_dynamic.len(),
            )
        }
        BuildFileKind::Pom => {
            let rewrite = regroup_maven::change_dependency_group(&source, change)?;
            (
                rewrite.pom,
                rewrite.changed.len(),
                rewrite.skipped_dynamic.len(),
            )
        }
    };

    if changed > 0 && !dry_run {
        write(path, &rewritten)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        changed,
        skipped_dynamic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_change_rewrites_gradle_file() {
        let temp_dir = TempDir::new().unwrap();
        let build_gradle = temp_dir.path().join("build.gradle");
        fs::write(
            &build_gradle,
            "dependencies {\n    implementation 'org.springframework.boot:spring-boot-starter:2.5.4'\n}\n",
        )
        .unwrap();

        let args = ChangeArgs {
            group: "org.springframework.boot".to_string(),
            artifact: "spring-boot-starter".to_string(),
            new_group: "org.newboot".to_string(),
            new_version: None,
            dry_run: false,
            files: vec![build_gradle.clone()],
        };
        handle_change(&args).await.unwrap();

        let content = fs::read_to_string(&build_gradle).unwrap();
        assert_eq!(
            content,
            "dependencies {\n    implementation 'org.newboot:spring-boot-starter:2.5.4'\n}\n"
        );
    }

    #[tokio::test]
    async fn test_change_rewrites_pom_file() {
        let temp_dir = TempDir::new().unwrap();
        let pom = temp_dir.path().join("pom.xml");
        fs::write(
            &pom,
            "<project>\n  <dependencies>\n    <dependency>\n      <groupId>junit</groupId>\n      <artifactId>junit</artifactId>\n      <version>4.13.2</version>\n    </dependency>\n  </dependencies>\n</project>\n",
        )
        .unwrap();

        let args = ChangeArgs {
            group: "junit".to_string(),
            artifact: "*".to_string(),
            new_group: "org.junit".to_string(),
            new_version: None,
            dry_run: false,
            files: vec![pom.clone()],
        };
        handle_change(&args).await.unwrap();

        let content = fs::read_to_string(&pom).unwrap();
        assert!(content.contains("<groupId>org.junit</groupId>"));
        assert!(content.contains("<version>4.13.2</version>"));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let build_gradle = temp_dir.path().join("build.gradle");
        let before = "dependencies {\n    api 'g:a:1.0'\n}\n";
        fs::write(&build_gradle, before).unwrap();

        let args = ChangeArgs {
            group: "g".to_string(),
            artifact: "a".to_string(),
            new_group: "g2".to_string(),
            new_version: None,
            dry_run: true,
            files: vec![build_gradle.clone()],
        };
        handle_change(&args).await.unwrap();

        assert_eq!(fs::read_to_string(&build_gradle).unwrap(), before);
    }

    #[tokio::test]
    async fn test_invalid_pattern_fails_before_touching_files() {
        let args = ChangeArgs {
            group: String::new(),
            artifact: "*".to_string(),
            new_group: "g2".to_string(),
            new_version: None,
            dry_run: false,
            files: vec![PathBuf::from("does-not-exist.gradle")],
        };
        assert!(handle_change(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_multiple_files_processed_independently() {
        let temp_dir = TempDir::new().unwrap();
        let gradle = temp_dir.path().join("build.gradle");
        let pom = temp_dir.path().join("pom.xml");
        fs::write(&gradle, "dependencies {\n    api 'g:a:1.0'\n}\n").unwrap();
        fs::write(
            &pom,
            "<project>\n  <dependencies>\n    <dependency>\n      <groupId>g</groupId>\n      <artifactId>a</artifactId>\n    </dependency>\n  </dependencies>\n</project>\n",
        )
        .unwrap();

        let args = ChangeArgs {
            group: "g".to_string(),
            artifact: "a".to_string(),
            new_group: "g2".to_string(),
            new_version: None,
            dry_run: false,
            files: vec![gradle.clone(), pom.clone()],
        };
        handle_change(&args).await.unwrap();

        assert!(fs::read_to_string(&gradle).unwrap().contains("'g2:a:1.0'"));
        assert!(
            fs::read_to_string(&pom)
                .unwrap()
                .contains("<groupId>g2</groupId>")
        );
    }
}

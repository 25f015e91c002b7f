use std::path::Path;

use anyhow::{Result, bail};

/// Which rewrite flow a file goes through, decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFileKind {
    Gradle,
    Pom,
}

pub fn detect_build_file(path: &Path) -> Result<BuildFileKind> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if name == "pom.xml" || name.ends_with(".pom") {
        return Ok(BuildFileKind::Pom);
    }
    if name.ends_with(".gradle") {
        return Ok(BuildFileKind::Gradle);
    }
    bail!(
        "unsupported build file: {} (expected pom.xml or *.gradle)",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use rstest::rstest;

    #[rstest]
    #[case("pom.xml", BuildFileKind::Pom)]
    #[case("app/pom.xml", BuildFileKind::Pom)]
    #[case("guava-29.0.pom", BuildFileKind::Pom)]
    #[case("build.gradle", BuildFileKind::Gradle)]
    #[case("app/build.gradle", BuildFileKind::Gradle)]
    #[case("settings.gradle", BuildFileKind::Gradle)]
    fn test_detect(#[case] path: &str, #[case] expected: BuildFileKind) {
        assert_eq!(detect_build_file(&PathBuf::from(path)).unwrap(), expected);
    }

    #[rstest]
    #[case("build.gradle.kts")]
    #[case("package.json")]
    #[case("Cargo.toml")]
    fn test_detect_rejects(#[case] path: &str) {
        assert!(detect_build_file(&PathBuf::from(path)).is_err());
    }
}

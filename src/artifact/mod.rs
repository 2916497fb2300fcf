//! Artifact model for Maven dependencies.
//!
//! An artifact is a uniquely identified build output or library dependency.
//! Set membership throughout the crate uses the
//! `group:artifact:version[:classifier]` key.

pub mod filter;
pub mod resolver;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maven dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "compile" => Some(Scope::Compile),
            "provided" => Some(Scope::Provided),
            "runtime" => Some(Scope::Runtime),
            "test" => Some(Scope::Test),
            "system" => Some(Scope::System),
            _ => None,
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Compile
    }
}

/// A dependency artifact (group, name, version, type, optional classifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Packaging type: "jar", "war", "pom", ...
    pub artifact_type: String,
    pub classifier: Option<String>,
    pub scope: Scope,
    /// Optional dependencies are not followed during transitive expansion.
    #[serde(default)]
    pub optional: bool,
    /// Resolved file-system location, once resolved.
    pub file: Option<PathBuf>,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        artifact_type: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: artifact_type.into(),
            classifier: None,
            scope: Scope::Compile,
            optional: false,
            file: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Identity key used for set membership: `group:artifact:version` plus
    /// the classifier when present.
    pub fn key(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.version, c
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.version),
        }
    }

    /// File name of the artifact in a repository:
    /// `{artifact}-{version}[-classifier].{type}`.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, c, self.artifact_type
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.artifact_type),
        }
    }

    /// Location of this artifact under a Maven repository root.
    pub fn repository_path(&self, repository: &Path) -> PathBuf {
        repository
            .join(self.group_id.replace('.', "/"))
            .join(&self.artifact_id)
            .join(&self.version)
            .join(self.file_name())
    }

    /// Location of this artifact's pom under a Maven repository root.
    pub fn repository_pom_path(&self, repository: &Path) -> PathBuf {
        repository
            .join(self.group_id.replace('.', "/"))
            .join(&self.artifact_id)
            .join(&self.version)
            .join(format!("{}-{}.pom", self.artifact_id, self.version))
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.artifact_type, self.version
        )
    }
}

// Re-export commonly used types
pub use filter::{ArtifactFilter, ExclusionPatterns, OrFilter, ScopeFilter};
pub use resolver::{ArtifactResolver, LocalRepositoryResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trip() {
        for scope in [
            Scope::Compile,
            Scope::Provided,
            Scope::Runtime,
            Scope::Test,
            Scope::System,
        ] {
            assert_eq!(Scope::from_str(scope.as_str()), Some(scope));
        }
        assert_eq!(Scope::from_str("unknown"), None);
    }

    #[test]
    fn test_artifact_key() {
        let artifact = Artifact::new("org.example", "core", "1.0", "jar");
        assert_eq!(artifact.key(), "org.example:core:1.0");

        let sources = Artifact::new("org.example", "core", "1.0", "jar")
            .with_classifier("sources");
        assert_eq!(sources.key(), "org.example:core:1.0:sources");
    }

    #[test]
    fn test_repository_path() {
        let artifact = Artifact::new("org.example.deep", "core", "1.2.3", "jar");
        let path = artifact.repository_path(Path::new("/repo"));
        assert_eq!(
            path,
            PathBuf::from("/repo/org/example/deep/core/1.2.3/core-1.2.3.jar")
        );
    }

    #[test]
    fn test_repository_path_with_classifier() {
        let artifact = Artifact::new("g", "a", "2.0", "jar").with_classifier("tests");
        let path = artifact.repository_path(Path::new("/repo"));
        assert_eq!(path, PathBuf::from("/repo/g/a/2.0/a-2.0-tests.jar"));
    }

    #[test]
    fn test_display() {
        let artifact = Artifact::new("g", "a", "1.0", "war");
        assert_eq!(artifact.to_string(), "g:a:war:1.0");
    }
}

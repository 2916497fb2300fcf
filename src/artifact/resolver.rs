//! Artifact resolution against a Maven repository.
//!
//! The assembler only depends on the [`ArtifactResolver`] trait; the shipped
//! implementation locates artifacts in the local repository on disk and never
//! touches the network.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};
use crate::project::loader::parse_pom_file;

use super::filter::ArtifactFilter;
use super::{Artifact, Scope};

/// Resolution capability consumed by the classpath assembler.
pub trait ArtifactResolver: Send + Sync {
    /// Locates the artifact's file and stores it on the artifact.
    ///
    /// A required artifact that cannot be located is an error; generation
    /// has no partial-success mode.
    fn resolve(
        &self,
        artifact: &mut Artifact,
        remote_repositories: &[String],
        local_repository: &Path,
    ) -> Result<()>;

    /// Expands the artifact set to include dependencies of dependencies.
    ///
    /// Only seed artifacts accepted by `filter` are expanded; the result is
    /// de-duplicated by artifact key and carries resolved file locations
    /// where known.
    fn resolve_transitively(
        &self,
        artifacts: Vec<Artifact>,
        root: &Artifact,
        local_repository: &Path,
        remote_repositories: &[String],
        filter: &dyn ArtifactFilter,
    ) -> Result<Vec<Artifact>>;
}

/// Resolver backed by the local repository layout
/// (`{group-as-dirs}/{artifact}/{version}/{artifact}-{version}.{type}`).
///
/// Remote repositories are accepted for contract fidelity but never
/// contacted; an artifact missing from the local repository is unresolvable.
pub struct LocalRepositoryResolver;

impl LocalRepositoryResolver {
    pub fn new() -> Self {
        Self
    }

    /// The repository to use when the caller does not name one: the `M2_REPO`
    /// environment variable, falling back to `~/.m2/repository`.
    pub fn default_repository() -> Option<PathBuf> {
        if let Some(repo) = std::env::var_os("M2_REPO") {
            return Some(PathBuf::from(repo));
        }
        dirs_home().map(|home| home.join(".m2/repository"))
    }

    /// Direct dependencies of `artifact` per its pom in the local
    /// repository. A missing pom means the artifact is a leaf.
    fn transitive_edges(&self, artifact: &Artifact, local_repository: &Path) -> Vec<Artifact> {
        let pom = artifact.repository_pom_path(local_repository);
        if !pom.is_file() {
            tracing::debug!("No pom for {} in local repository, treating as leaf", artifact);
            return Vec::new();
        }
        match parse_pom_file(&pom) {
            Ok(descriptor) => descriptor
                .dependencies
                .into_iter()
                .filter(|dep| !dep.optional && dep.scope != Scope::Test)
                .collect(),
            Err(e) => {
                tracing::warn!("Skipping unreadable pom {}: {}", pom.display(), e);
                Vec::new()
            }
        }
    }
}

impl Default for LocalRepositoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactResolver for LocalRepositoryResolver {
    fn resolve(
        &self,
        artifact: &mut Artifact,
        _remote_repositories: &[String],
        local_repository: &Path,
    ) -> Result<()> {
        let location = artifact.repository_path(local_repository);
        if location.is_file() {
            artifact.file = Some(location);
            Ok(())
        } else {
            Err(GeneratorError::ArtifactNotFound(format!(
                "{} (looked in {})",
                artifact,
                location.display()
            )))
        }
    }

    fn resolve_transitively(
        &self,
        artifacts: Vec<Artifact>,
        root: &Artifact,
        local_repository: &Path,
        _remote_repositories: &[String],
        filter: &dyn ArtifactFilter,
    ) -> Result<Vec<Artifact>> {
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(root.key());

        let mut result: Vec<Artifact> = Vec::new();
        let mut queue: VecDeque<Artifact> = VecDeque::new();

        for artifact in artifacts {
            if !filter.include(&artifact) {
                tracing::debug!("Scope filter rejected {}", artifact);
                continue;
            }
            if seen.insert(artifact.key()) {
                queue.push_back(artifact);
            }
        }

        while let Some(mut artifact) = queue.pop_front() {
            for dep in self.transitive_edges(&artifact, local_repository) {
                if seen.insert(dep.key()) {
                    queue.push_back(dep);
                }
            }
            if artifact.file.is_none() {
                let location = artifact.repository_path(local_repository);
                if location.is_file() {
                    artifact.file = Some(location);
                }
            }
            result.push(artifact);
        }

        Ok(result)
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::filter::{OrFilter, ScopeFilter};
    use std::fs;
    use tempfile::TempDir;

    /// Installs a fake jar (and optional pom) for `g:a:v` in the repo.
    fn install(repo: &Path, group: &str, artifact: &str, version: &str, pom: Option<&str>) {
        let dir = repo
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}-{}.jar", artifact, version)), b"jar").unwrap();
        if let Some(content) = pom {
            fs::write(dir.join(format!("{}-{}.pom", artifact, version)), content).unwrap();
        }
    }

    fn scope_filter() -> OrFilter {
        let mut filter = OrFilter::new();
        filter.add(Box::new(ScopeFilter(Scope::Compile)));
        filter.add(Box::new(ScopeFilter(Scope::Provided)));
        filter.add(Box::new(ScopeFilter(Scope::Test)));
        filter
    }

    #[test]
    fn test_resolve_found() {
        let repo = TempDir::new().unwrap();
        install(repo.path(), "org.example", "core", "1.0", None);

        let resolver = LocalRepositoryResolver::new();
        let mut artifact = Artifact::new("org.example", "core", "1.0", "jar");
        resolver.resolve(&mut artifact, &[], repo.path()).unwrap();

        assert_eq!(
            artifact.file,
            Some(
                repo.path()
                    .join("org/example/core/1.0/core-1.0.jar")
            )
        );
    }

    #[test]
    fn test_resolve_missing_is_fatal() {
        let repo = TempDir::new().unwrap();
        let resolver = LocalRepositoryResolver::new();
        let mut artifact = Artifact::new("org.example", "absent", "1.0", "jar");

        let err = resolver.resolve(&mut artifact, &[], repo.path()).unwrap_err();
        assert!(matches!(err, GeneratorError::ArtifactNotFound(_)));
        assert!(artifact.file.is_none());
    }

    #[test]
    fn test_transitive_expansion() {
        let repo = TempDir::new().unwrap();
        install(
            repo.path(),
            "g",
            "top",
            "1.0",
            Some(
                r#"<project>
  <groupId>g</groupId>
  <artifactId>top</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>g</groupId>
      <artifactId>child</artifactId>
      <version>2.0</version>
    </dependency>
  </dependencies>
</project>"#,
            ),
        );
        install(repo.path(), "g", "child", "2.0", None);

        let resolver = LocalRepositoryResolver::new();
        let root = Artifact::new("me", "root", "0.1", "jar");
        let seeds = vec![Artifact::new("g", "top", "1.0", "jar")];

        let result = resolver
            .resolve_transitively(seeds, &root, repo.path(), &[], &scope_filter())
            .unwrap();

        let keys: Vec<String> = result.iter().map(|a| a.key()).collect();
        assert!(keys.contains(&"g:top:1.0".to_string()));
        assert!(keys.contains(&"g:child:2.0".to_string()));
        assert!(result.iter().all(|a| a.file.is_some()));
    }

    #[test]
    fn test_transitive_skips_root_identity() {
        let repo = TempDir::new().unwrap();
        install(repo.path(), "me", "root", "0.1", None);

        let resolver = LocalRepositoryResolver::new();
        let root = Artifact::new("me", "root", "0.1", "jar");
        let seeds = vec![Artifact::new("me", "root", "0.1", "jar")];

        let result = resolver
            .resolve_transitively(seeds, &root, repo.path(), &[], &scope_filter())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_transitive_scope_filter_rejects_runtime() {
        let repo = TempDir::new().unwrap();
        install(repo.path(), "g", "rt", "1.0", None);

        let resolver = LocalRepositoryResolver::new();
        let root = Artifact::new("me", "root", "0.1", "jar");
        let seeds = vec![Artifact::new("g", "rt", "1.0", "jar").with_scope(Scope::Runtime)];

        let result = resolver
            .resolve_transitively(seeds, &root, repo.path(), &[], &scope_filter())
            .unwrap();
        assert!(result.is_empty());
    }
}

//! Classpath assembly.
//!
//! Merges the direct and transitively-resolved dependency artifacts of a
//! root project and its related modules into a deterministic, ordered list
//! of classpath entries.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::artifact::filter::{OrFilter, ScopeFilter};
use crate::artifact::{Artifact, ArtifactResolver, ExclusionPatterns, Scope};
use crate::error::Result;
use crate::paths::{normalize_path, relativize};
use crate::project::ProjectDescriptor;

use super::source_roots::collect_source_roots;
use super::writer::write_classpath_file;
use super::{ClasspathEntry, JRE_CONTAINER};

/// Configuration surface of the assembler.
pub struct ClasspathConfig {
    /// Symbolic name substituted for the local repository root.
    pub repo_variable: String,
    /// Local repository root.
    pub local_repository: PathBuf,
    /// Artifact types allowed on the classpath.
    pub allowed_types: HashSet<String>,
    /// Remote repositories handed to the resolver.
    pub remote_repositories: Vec<String>,
    /// Whether to expand the dependency set transitively.
    pub transitive: bool,
    /// Artifacts to drop, by group, group:artifact or group:artifact:version.
    pub excludes: ExclusionPatterns,
    /// Whether resource directories join the source entries.
    pub include_resources: bool,
    /// Raw markup spliced verbatim before the closing tag.
    pub merge: Option<String>,
}

impl ClasspathConfig {
    pub fn new(repo_variable: impl Into<String>, local_repository: impl Into<PathBuf>) -> Self {
        Self {
            repo_variable: repo_variable.into(),
            local_repository: local_repository.into(),
            allowed_types: HashSet::from(["jar".to_string()]),
            remote_repositories: Vec::new(),
            transitive: false,
            excludes: ExclusionPatterns::new(),
            include_resources: false,
            merge: None,
        }
    }
}

/// Assembles and writes `.classpath` files.
pub struct ClasspathAssembler<'a> {
    resolver: &'a dyn ArtifactResolver,
    config: &'a ClasspathConfig,
}

impl<'a> ClasspathAssembler<'a> {
    pub fn new(resolver: &'a dyn ArtifactResolver, config: &'a ClasspathConfig) -> Self {
        Self { resolver, config }
    }

    /// Builds the ordered entry list for `root` and its related projects.
    ///
    /// Resolution failures for required artifacts abort the whole assembly;
    /// there is no partial result.
    pub fn assemble(
        &self,
        root: &ProjectDescriptor,
        related: &[Arc<ProjectDescriptor>],
    ) -> Result<Vec<ClasspathEntry>> {
        let root_directory = root.root_directory();

        // Identities of our own modules; a dependency matching one is never
        // treated as an external library.
        let mut self_keys: HashSet<String> = HashSet::new();
        self_keys.insert(root.self_artifact().key());
        for project in related {
            self_keys.insert(project.self_artifact().key());
        }

        let mut source_roots =
            collect_source_roots(root, &root_directory, self.config.include_resources);
        for project in related {
            source_roots.extend(collect_source_roots(
                project,
                &root_directory,
                self.config.include_resources,
            ));
        }

        let candidates = self.collect_candidates(root, related, &self_keys)?;
        let candidates = self.remove_project_artifacts(candidates, root, related);
        let candidates = self.expand_transitively(candidates, root)?;
        let candidates = self.apply_exclusions(candidates);
        let paths = self.artifact_paths(candidates)?;

        let mut entries = Vec::new();
        for source_root in &source_roots {
            tracing::info!("Adding src path {}", source_root);
            entries.push(ClasspathEntry::Source(source_root.clone()));
        }
        for path in paths {
            if path.starts_with(&self.config.repo_variable) {
                entries.push(ClasspathEntry::Variable(path));
            } else if path.starts_with(&root_directory) {
                entries.push(ClasspathEntry::Library(relativize(&path, &root_directory)));
            } else {
                entries.push(ClasspathEntry::Library(path));
            }
        }
        entries.push(ClasspathEntry::Container(JRE_CONTAINER.to_string()));

        let output = relativize(&normalize_path(&root.output_directory), &root_directory);
        entries.push(ClasspathEntry::Output(output));

        Ok(entries)
    }

    /// Assembles and writes the `.classpath` file into the root project
    /// directory, returning its path.
    pub fn write(
        &self,
        root: &ProjectDescriptor,
        related: &[Arc<ProjectDescriptor>],
    ) -> Result<PathBuf> {
        let entries = self.assemble(root, related)?;
        let classpath_file = root.base_dir.join(".classpath");
        write_classpath_file(&classpath_file, &entries, self.config.merge.as_deref())?;
        tracing::info!("Classpath file written --> '{}'", classpath_file.display());
        Ok(classpath_file)
    }

    /// Direct dependencies of the root and every related project,
    /// de-duplicated by identity key with the first occurrence winning.
    /// Related-project dependencies that are not one of our own modules are
    /// resolved before being kept.
    fn collect_candidates(
        &self,
        root: &ProjectDescriptor,
        related: &[Arc<ProjectDescriptor>],
        self_keys: &HashSet<String>,
    ) -> Result<Vec<Artifact>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<Artifact> = Vec::new();

        for dependency in &root.dependencies {
            if seen.insert(dependency.key()) {
                candidates.push(dependency.clone());
            }
        }

        for project in related {
            for dependency in &project.dependencies {
                if !seen.insert(dependency.key()) {
                    continue;
                }
                let mut dependency = dependency.clone();
                let own_module = self_keys.contains(&dependency.key())
                    || dependency.group_id == project.group_id;
                if !own_module {
                    self.resolver.resolve(
                        &mut dependency,
                        &self.config.remote_repositories,
                        &self.config.local_repository,
                    )?;
                }
                candidates.push(dependency);
            }
        }

        Ok(candidates)
    }

    /// Drops every candidate whose (group, artifact) matches one of the
    /// given projects' own build artifacts; a project never depends on
    /// itself as a library entry.
    fn remove_project_artifacts(
        &self,
        candidates: Vec<Artifact>,
        root: &ProjectDescriptor,
        related: &[Arc<ProjectDescriptor>],
    ) -> Vec<Artifact> {
        let own: HashSet<(&str, &str)> = std::iter::once((root.group_id.as_str(), root.artifact_id.as_str()))
            .chain(
                related
                    .iter()
                    .map(|p| (p.group_id.as_str(), p.artifact_id.as_str())),
            )
            .collect();

        candidates
            .into_iter()
            .filter(|artifact| {
                let keep = !own.contains(&(artifact.group_id.as_str(), artifact.artifact_id.as_str()));
                if !keep {
                    tracing::debug!("Dropping project artifact {} from candidates", artifact);
                }
                keep
            })
            .collect()
    }

    fn expand_transitively(
        &self,
        candidates: Vec<Artifact>,
        root: &ProjectDescriptor,
    ) -> Result<Vec<Artifact>> {
        if !self.config.transitive {
            return Ok(candidates);
        }
        let mut filter = OrFilter::new();
        filter.add(Box::new(ScopeFilter(Scope::Compile)));
        filter.add(Box::new(ScopeFilter(Scope::Provided)));
        filter.add(Box::new(ScopeFilter(Scope::Test)));

        self.resolver.resolve_transitively(
            candidates,
            &root.self_artifact(),
            &self.config.local_repository,
            &self.config.remote_repositories,
            &filter,
        )
    }

    fn apply_exclusions(&self, candidates: Vec<Artifact>) -> Vec<Artifact> {
        if self.config.excludes.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|artifact| match self.config.excludes.matches(artifact) {
                Some(granularity) => {
                    tracing::info!(
                        "Excluding {} from .classpath, {} is excluded",
                        artifact,
                        granularity.as_str()
                    );
                    false
                }
                None => true,
            })
            .collect()
    }

    /// Maps surviving artifacts to sorted path strings, substituting the
    /// repository variable for the local repository root.
    fn artifact_paths(&self, candidates: Vec<Artifact>) -> Result<Vec<String>> {
        let local_repository =
            normalize_path(&self.config.local_repository.to_string_lossy());
        let mut paths = Vec::new();

        for mut artifact in candidates {
            if !self.config.allowed_types.contains(&artifact.artifact_type) {
                tracing::info!(
                    "Skipping {}, type '{}' is not a classpath artifact type",
                    artifact,
                    artifact.artifact_type
                );
                continue;
            }
            if artifact.file.is_none() {
                self.resolver.resolve(
                    &mut artifact,
                    &self.config.remote_repositories,
                    &self.config.local_repository,
                )?;
            }
            match &artifact.file {
                Some(file) => {
                    let path = normalize_path(&file.to_string_lossy());
                    let path = match path.strip_prefix(&local_repository) {
                        Some(rest) => format!("{}{}", self.config.repo_variable, rest),
                        None => path,
                    };
                    paths.push(path);
                }
                None => {
                    tracing::warn!("Could not locate {}, dropping from classpath", artifact);
                }
            }
        }

        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::filter::ArtifactFilter;
    use crate::error::GeneratorError;
    use std::path::Path;

    /// Resolver that "locates" every artifact at a fixed repository root
    /// without touching the filesystem.
    struct StubResolver {
        repository: PathBuf,
    }

    impl StubResolver {
        fn new(repository: impl Into<PathBuf>) -> Self {
            Self {
                repository: repository.into(),
            }
        }
    }

    impl ArtifactResolver for StubResolver {
        fn resolve(
            &self,
            artifact: &mut Artifact,
            _remote_repositories: &[String],
            _local_repository: &Path,
        ) -> Result<()> {
            artifact.file = Some(artifact.repository_path(&self.repository));
            Ok(())
        }

        fn resolve_transitively(
            &self,
            artifacts: Vec<Artifact>,
            root: &Artifact,
            _local_repository: &Path,
            _remote_repositories: &[String],
            filter: &dyn ArtifactFilter,
        ) -> Result<Vec<Artifact>> {
            Ok(artifacts
                .into_iter()
                .filter(|a| a.key() != root.key() && filter.include(a))
                .map(|mut a| {
                    if a.file.is_none() {
                        a.file = Some(a.repository_path(&self.repository));
                    }
                    a
                })
                .collect())
        }
    }

    /// Resolver that fails every call.
    struct FailingResolver;

    impl ArtifactResolver for FailingResolver {
        fn resolve(
            &self,
            artifact: &mut Artifact,
            _remote_repositories: &[String],
            _local_repository: &Path,
        ) -> Result<()> {
            Err(GeneratorError::ArtifactNotFound(artifact.to_string()))
        }

        fn resolve_transitively(
            &self,
            _artifacts: Vec<Artifact>,
            root: &Artifact,
            _local_repository: &Path,
            _remote_repositories: &[String],
            _filter: &dyn ArtifactFilter,
        ) -> Result<Vec<Artifact>> {
            Err(GeneratorError::ArtifactNotFound(root.to_string()))
        }
    }

    fn root_project(deps: Vec<Artifact>) -> ProjectDescriptor {
        let mut project = ProjectDescriptor::new("org.example", "app", "1.0", "/work/app");
        project.dependencies = deps;
        project
    }

    fn lib_paths(entries: &[ClasspathEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter(|e| matches!(e, ClasspathEntry::Library(_) | ClasspathEntry::Variable(_)))
            .map(|e| e.path())
            .collect()
    }

    #[test]
    fn test_variable_substitution_and_sorting() {
        let resolver = StubResolver::new("/repo");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![
            Artifact::new("z.group", "zlib", "2.0", "jar"),
            Artifact::new("a.group", "alib", "1.0", "jar"),
        ]);

        let entries = assembler.assemble(&root, &[]).unwrap();
        assert_eq!(
            lib_paths(&entries),
            vec![
                "M2_REPO/a/group/alib/1.0/alib-1.0.jar",
                "M2_REPO/z/group/zlib/2.0/zlib-2.0.jar",
            ]
        );
        // Both are var entries since they live under the repository.
        assert!(entries
            .iter()
            .filter(|e| e.kind() == "var")
            .count()
            == 2);
    }

    #[test]
    fn test_library_outside_repository_stays_lib() {
        let resolver = StubResolver::new("/elsewhere");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![Artifact::new("g", "a", "1.0", "jar")]);
        let entries = assembler.assemble(&root, &[]).unwrap();

        let libs: Vec<&ClasspathEntry> = entries.iter().filter(|e| e.kind() == "lib").collect();
        assert_eq!(libs.len(), 1);
        assert_eq!(libs[0].path(), "/elsewhere/g/a/1.0/a-1.0.jar");
    }

    #[test]
    fn test_type_filter_drops_war() {
        let resolver = StubResolver::new("/repo");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![
            Artifact::new("g", "a", "1.0", "jar"),
            Artifact::new("g", "web", "1.0", "war"),
        ]);

        let entries = assembler.assemble(&root, &[]).unwrap();
        let paths = lib_paths(&entries);
        assert_eq!(paths, vec!["M2_REPO/g/a/1.0/a-1.0.jar"]);
    }

    #[test]
    fn test_exclusions_applied() {
        let resolver = StubResolver::new("/repo");
        let mut config = ClasspathConfig::new("M2_REPO", "/repo");
        config.excludes = ExclusionPatterns::from_patterns(["bad.group"]);
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![
            Artifact::new("good.group", "a", "1.0", "jar"),
            Artifact::new("bad.group", "b", "1.0", "jar"),
            Artifact::new("bad.group", "c", "2.0", "jar"),
        ]);

        let entries = assembler.assemble(&root, &[]).unwrap();
        assert_eq!(
            lib_paths(&entries),
            vec!["M2_REPO/good/group/a/1.0/a-1.0.jar"]
        );
    }

    #[test]
    fn test_project_self_artifact_removed() {
        let resolver = StubResolver::new("/repo");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let mut core = ProjectDescriptor::new("org.example", "core", "1.0", "/work/core");
        core.dependencies = vec![Artifact::new("g", "a", "1.0", "jar")];
        let related = vec![Arc::new(core)];

        // The root depends on the related module; it must not surface as a
        // library entry.
        let root = root_project(vec![Artifact::new("org.example", "core", "1.0", "jar")]);

        let entries = assembler.assemble(&root, &related).unwrap();
        assert_eq!(lib_paths(&entries), vec!["M2_REPO/g/a/1.0/a-1.0.jar"]);
    }

    #[test]
    fn test_duplicate_dependency_first_wins() {
        let resolver = StubResolver::new("/repo");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let mut other = ProjectDescriptor::new("org.example", "other", "1.0", "/work/other");
        other.dependencies = vec![Artifact::new("g", "a", "1.0", "jar").with_scope(Scope::Test)];
        let related = vec![Arc::new(other)];

        let root = root_project(vec![Artifact::new("g", "a", "1.0", "jar")]);
        let entries = assembler.assemble(&root, &related).unwrap();

        assert_eq!(lib_paths(&entries).len(), 1);
    }

    #[test]
    fn test_resolution_failure_aborts() {
        let resolver = FailingResolver;
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![Artifact::new("g", "a", "1.0", "jar")]);
        let err = assembler.assemble(&root, &[]).unwrap_err();
        assert!(matches!(err, GeneratorError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_fixed_trailing_entries() {
        let resolver = StubResolver::new("/repo");
        let config = ClasspathConfig::new("M2_REPO", "/repo");
        let assembler = ClasspathAssembler::new(&resolver, &config);

        let root = root_project(vec![]);
        let entries = assembler.assemble(&root, &[]).unwrap();

        let n = entries.len();
        assert_eq!(entries[n - 2], ClasspathEntry::Container(JRE_CONTAINER.to_string()));
        assert_eq!(entries[n - 1], ClasspathEntry::Output("target/classes".to_string()));
    }
}

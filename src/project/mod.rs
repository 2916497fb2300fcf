//! Project descriptors for Maven modules.
//!
//! A descriptor captures the resolved build metadata of one module: its
//! coordinates, source and resource roots, direct dependencies and declared
//! submodules. Descriptors are immutable once loaded.

pub mod cache;
pub mod loader;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::paths::normalize_path;

/// The descriptor file name next to each module's base directory.
pub const POM_FILE: &str = "pom.xml";

/// A resource directory of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDir {
    /// Absolute directory path.
    pub directory: String,
}

impl ResourceDir {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

/// Resolved build metadata of a single Maven module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Packaging: "jar", "war", "pom", ...
    pub packaging: String,
    /// Base directory of the module.
    pub base_dir: PathBuf,
    /// Absolute compile source root paths.
    pub compile_source_roots: Vec<String>,
    /// Absolute test source root paths.
    pub test_source_roots: Vec<String>,
    pub resources: Vec<ResourceDir>,
    pub test_resources: Vec<ResourceDir>,
    /// Absolute build output directory.
    pub output_directory: String,
    /// Direct dependency artifacts.
    pub dependencies: Vec<Artifact>,
    /// Submodule names declared in the descriptor.
    pub modules: Vec<String>,
}

impl ProjectDescriptor {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_dir = base_dir.into();
        let output_directory =
            normalize_path(&base_dir.join("target/classes").to_string_lossy());
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: "jar".to_string(),
            base_dir,
            compile_source_roots: Vec::new(),
            test_source_roots: Vec::new(),
            resources: Vec::new(),
            test_resources: Vec::new(),
            output_directory,
            dependencies: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// The artifact this project itself builds.
    pub fn self_artifact(&self) -> Artifact {
        Artifact::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.version.clone(),
            self.packaging.clone(),
        )
    }

    /// Location of this project's descriptor file.
    pub fn pom_path(&self) -> PathBuf {
        self.base_dir.join(POM_FILE)
    }

    /// Normalized base directory string.
    pub fn root_directory(&self) -> String {
        normalize_path(&self.base_dir.to_string_lossy())
    }
}

/// The set of already-loaded project descriptors for one run, available for
/// reuse before any descriptor is rebuilt from disk.
#[derive(Default)]
pub struct BuildSession {
    projects: Vec<Arc<ProjectDescriptor>>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, project: Arc<ProjectDescriptor>) {
        self.projects.push(project);
    }

    pub fn projects(&self) -> &[Arc<ProjectDescriptor>] {
        &self.projects
    }

    /// Finds the loaded project whose descriptor file is exactly `pom`.
    pub fn find_by_pom(&self, pom: &Path) -> Option<Arc<ProjectDescriptor>> {
        let wanted = normalize_path(&pom.to_string_lossy());
        self.projects
            .iter()
            .find(|p| normalize_path(&p.pom_path().to_string_lossy()) == wanted)
            .cloned()
    }
}

// Re-export commonly used types
pub use cache::{DescriptorCache, KnownProjects};
pub use loader::{PomLoader, ProjectLoader};

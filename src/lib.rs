pub mod artifact;
pub mod eclipse;
pub mod error;
pub mod paths;
pub mod project;

pub use artifact::{
    Artifact, ArtifactFilter, ArtifactResolver, ExclusionPatterns, LocalRepositoryResolver,
    OrFilter, Scope, ScopeFilter,
};
pub use eclipse::{
    write_classpath_file, write_project_file, ClasspathAssembler, ClasspathConfig, ClasspathEntry,
};
pub use error::{GeneratorError, Result};
pub use paths::normalize_path;
pub use project::{
    BuildSession, DescriptorCache, KnownProjects, PomLoader, ProjectDescriptor, ProjectLoader,
    ResourceDir,
};

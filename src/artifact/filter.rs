//! Artifact inclusion filters and exclusion patterns.

use std::collections::HashSet;

use super::{Artifact, Scope};

/// Decides whether an artifact takes part in resolution.
pub trait ArtifactFilter: Send + Sync {
    fn include(&self, artifact: &Artifact) -> bool;
}

/// Combines filters with logical OR.
///
/// An artifact is included iff at least one contained filter accepts it;
/// with no filters nothing is included.
#[derive(Default)]
pub struct OrFilter {
    filters: Vec<Box<dyn ArtifactFilter>>,
}

impl OrFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: Box<dyn ArtifactFilter>) {
        self.filters.push(filter);
    }
}

impl ArtifactFilter for OrFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        self.filters.iter().any(|f| f.include(artifact))
    }
}

/// Accepts artifacts of exactly the given scope.
pub struct ScopeFilter(pub Scope);

impl ArtifactFilter for ScopeFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        artifact.scope == self.0
    }
}

/// Granularity at which an exclusion pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionMatch {
    GroupId,
    GroupArtifact,
    GroupArtifactVersion,
}

impl ExclusionMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionMatch::GroupId => "groupId",
            ExclusionMatch::GroupArtifact => "groupId:artifactId",
            ExclusionMatch::GroupArtifactVersion => "groupId:artifactId:version",
        }
    }
}

/// Exclusion patterns at three granularities: `group`, `group:artifact`
/// and `group:artifact:version`, checked in that order.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPatterns {
    patterns: HashSet<String>,
}

impl ExclusionPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, pattern: impl Into<String>) {
        self.patterns.insert(pattern.into());
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the granularity at which the artifact is excluded, if any.
    pub fn matches(&self, artifact: &Artifact) -> Option<ExclusionMatch> {
        if self.patterns.contains(&artifact.group_id) {
            return Some(ExclusionMatch::GroupId);
        }
        let group_artifact = format!("{}:{}", artifact.group_id, artifact.artifact_id);
        if self.patterns.contains(&group_artifact) {
            return Some(ExclusionMatch::GroupArtifact);
        }
        let full = format!("{}:{}", group_artifact, artifact.version);
        if self.patterns.contains(&full) {
            return Some(ExclusionMatch::GroupArtifactVersion);
        }
        None
    }
}

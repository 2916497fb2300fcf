//! Caller-owned caches for loaded descriptors and known project ids.
//!
//! Both were ambient singletons in earlier generations of this tool; here
//! they are plain values the caller constructs and passes around, with an
//! explicit `clear`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::paths::normalize_path;

use super::loader::ProjectLoader;
use super::{BuildSession, ProjectDescriptor};

/// Memoizes loaded project descriptors by normalized pom path.
///
/// `get` first checks the memo map, then the session's already-loaded
/// projects, and only then invokes the loader. A load failure leaves the
/// slot empty and produces a debug diagnostic; the caller decides how to
/// handle the missing descriptor.
#[derive(Default)]
pub struct DescriptorCache {
    // Guards the read-check-insert sequence so a descriptor is never built
    // twice for the same path within one run.
    projects: Mutex<HashMap<String, Arc<ProjectDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        pom: &Path,
        session: &BuildSession,
        loader: &dyn ProjectLoader,
    ) -> Option<Arc<ProjectDescriptor>> {
        let key = normalize_path(&pom.to_string_lossy());
        let mut projects = self.projects.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(project) = projects.get(&key) {
            return Some(project.clone());
        }
        if let Some(project) = session.find_by_pom(pom) {
            return Some(project);
        }
        match loader.load(pom) {
            Ok(project) => {
                let project = Arc::new(project);
                projects.insert(key, project.clone());
                Some(project)
            }
            Err(e) => {
                tracing::debug!("Failed to build project from pom {}: {}", pom.display(), e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.projects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.projects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Stores the ids of projects taking part in the current generation.
#[derive(Default)]
pub struct KnownProjects {
    ids: Mutex<Vec<String>>,
}

impl KnownProjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, project_id: impl Into<String>) {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(project_id.into());
    }

    pub fn is_present(&self, project_id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|id| id == project_id)
    }

    pub fn clear(&self) {
        self.ids.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

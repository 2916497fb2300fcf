//! Source and resource root collection.
//!
//! Gathers the compilable roots of a project as paths relative to the build
//! root, de-duplicated and with nested resource paths collapsed. Eclipse
//! refuses nested source entries, so no collected path may be a prefix of
//! another.

use std::collections::BTreeSet;
use std::path::Path;

use crate::paths::{normalize_path, relativize};
use crate::project::ProjectDescriptor;

/// Collects the source roots of `project`, relative to `root_directory`
/// (the normalized base directory of the overall build).
///
/// Configured roots that do not exist as directories are silently skipped.
/// With `include_resources`, resource and test-resource directories join the
/// set after nesting resolution: a resource inside an existing entry is
/// dropped, and an incoming parent evicts previously added children.
pub fn collect_source_roots(
    project: &ProjectDescriptor,
    root_directory: &str,
    include_resources: bool,
) -> BTreeSet<String> {
    let mut source_paths: BTreeSet<String> = BTreeSet::new();

    for root in project
        .compile_source_roots
        .iter()
        .chain(project.test_source_roots.iter())
    {
        let source_root = normalize_path(root);
        if Path::new(&source_root).is_dir() {
            source_paths.insert(relativize(&source_root, root_directory));
        }
    }

    if include_resources {
        for resource in project.resources.iter().chain(project.test_resources.iter()) {
            let resource_root = normalize_path(&resource.directory);
            if !Path::new(&resource_root).is_dir() {
                continue;
            }
            let resource_path = relativize(&resource_root, root_directory);

            // Skip a child of an existing entry.
            if source_paths.iter().any(|p| resource_path.starts_with(p.as_str())) {
                continue;
            }
            // Evict children of the incoming entry, then insert it.
            source_paths.retain(|p| !p.starts_with(&resource_path));
            source_paths.insert(resource_path);
        }
    }

    source_paths
}

//! Project descriptor loading from pom.xml.
//!
//! A streaming quick-xml parser that extracts exactly the metadata the
//! generator needs: coordinates (with parent fallback), packaging, direct
//! dependencies, build directories and the declared submodules. Property
//! references in values are taken literally, not interpolated.

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::artifact::{Artifact, Scope};
use crate::error::{GeneratorError, Result};
use crate::paths::normalize_path;

use super::{ProjectDescriptor, ResourceDir};

/// Capability of building a project descriptor from a pom file.
pub trait ProjectLoader: Send + Sync {
    fn load(&self, pom: &Path) -> Result<ProjectDescriptor>;
}

/// Loader backed by [`parse_pom_file`].
#[derive(Default)]
pub struct PomLoader;

impl PomLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectLoader for PomLoader {
    fn load(&self, pom: &Path) -> Result<ProjectDescriptor> {
        parse_pom_file(pom)
    }
}

/// Parses the pom at `path`, using its directory as the module base dir.
pub fn parse_pom_file(path: &Path) -> Result<ProjectDescriptor> {
    let content = fs::read_to_string(path)?;
    let base_dir = path
        .parent()
        .ok_or_else(|| GeneratorError::ProjectNotFound(path.to_path_buf()))?;
    parse_pom_str(&content, base_dir)
}

/// Raw field collector filled during the event loop.
#[derive(Default)]
struct RawPom {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    parent_group_id: Option<String>,
    parent_version: Option<String>,
    source_directory: Option<String>,
    test_source_directory: Option<String>,
    output_directory: Option<String>,
    resources: Vec<String>,
    test_resources: Vec<String>,
    modules: Vec<String>,
    dependencies: Vec<RawDependency>,
}

#[derive(Default)]
struct RawDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    dep_type: Option<String>,
    classifier: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
}

/// Parses pom content into a descriptor rooted at `base_dir`.
pub fn parse_pom_str(content: &str, base_dir: &Path) -> Result<ProjectDescriptor> {
    let mut reader = Reader::from_reader(content.as_bytes());
    let mut buf = Vec::new();

    // Element name stack, rooted below <project>.
    let mut stack: Vec<String> = Vec::new();
    let mut raw = RawPom::default();
    let mut dep = RawDependency::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "dependency" && stack_is(&stack, &["project", "dependencies"]) {
                    dep = RawDependency::default();
                }
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                if stack_is(&stack, &["project", "dependencies", "dependency"]) {
                    raw.dependencies.push(std::mem::take(&mut dep));
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                let text = reader
                    .decoder()
                    .decode(t.as_ref())
                    .map_err(|e| GeneratorError::Parse(format!("pom text decode: {}", e)))?
                    .trim()
                    .to_string();
                if !text.is_empty() {
                    record_text(&stack, &mut raw, &mut dep, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GeneratorError::Parse(format!("pom XML error: {}", e)));
            }
            _ => {}
        }
        buf.clear();
    }

    build_descriptor(raw, base_dir)
}

fn stack_is(stack: &[String], expected: &[&str]) -> bool {
    stack.len() == expected.len() && stack.iter().zip(expected).all(|(a, b)| a == b)
}

fn record_text(stack: &[String], raw: &mut RawPom, dep: &mut RawDependency, text: String) {
    let path: Vec<&str> = stack.iter().map(String::as_str).collect();
    match path.as_slice() {
        ["project", "groupId"] => raw.group_id = Some(text),
        ["project", "artifactId"] => raw.artifact_id = Some(text),
        ["project", "version"] => raw.version = Some(text),
        ["project", "packaging"] => raw.packaging = Some(text),
        ["project", "parent", "groupId"] => raw.parent_group_id = Some(text),
        ["project", "parent", "version"] => raw.parent_version = Some(text),
        ["project", "modules", "module"] => raw.modules.push(text),
        ["project", "build", "sourceDirectory"] => raw.source_directory = Some(text),
        ["project", "build", "testSourceDirectory"] => raw.test_source_directory = Some(text),
        ["project", "build", "outputDirectory"] => raw.output_directory = Some(text),
        ["project", "build", "resources", "resource", "directory"] => raw.resources.push(text),
        ["project", "build", "testResources", "testResource", "directory"] => {
            raw.test_resources.push(text)
        }
        ["project", "dependencies", "dependency", field] => match *field {
            "groupId" => dep.group_id = Some(text),
            "artifactId" => dep.artifact_id = Some(text),
            "version" => dep.version = Some(text),
            "type" => dep.dep_type = Some(text),
            "classifier" => dep.classifier = Some(text),
            "scope" => dep.scope = Some(text),
            "optional" => dep.optional = Some(text),
            _ => {}
        },
        _ => {}
    }
}

fn build_descriptor(raw: RawPom, base_dir: &Path) -> Result<ProjectDescriptor> {
    let group_id = raw
        .group_id
        .or(raw.parent_group_id)
        .ok_or_else(|| GeneratorError::Parse("pom is missing groupId".to_string()))?;
    let artifact_id = raw
        .artifact_id
        .ok_or_else(|| GeneratorError::Parse("pom is missing artifactId".to_string()))?;
    let version = raw
        .version
        .or(raw.parent_version)
        .ok_or_else(|| GeneratorError::Parse("pom is missing version".to_string()))?;

    let mut project = ProjectDescriptor::new(group_id, artifact_id, version, base_dir);
    if let Some(packaging) = raw.packaging {
        project.packaging = packaging;
    }

    project.compile_source_roots = vec![absolutize(
        base_dir,
        raw.source_directory.as_deref().unwrap_or("src/main/java"),
    )];
    project.test_source_roots = vec![absolutize(
        base_dir,
        raw.test_source_directory
            .as_deref()
            .unwrap_or("src/test/java"),
    )];
    project.output_directory = absolutize(
        base_dir,
        raw.output_directory.as_deref().unwrap_or("target/classes"),
    );

    project.resources = if raw.resources.is_empty() {
        vec![ResourceDir::new(absolutize(base_dir, "src/main/resources"))]
    } else {
        raw.resources
            .iter()
            .map(|dir| ResourceDir::new(absolutize(base_dir, dir)))
            .collect()
    };
    project.test_resources = if raw.test_resources.is_empty() {
        vec![ResourceDir::new(absolutize(base_dir, "src/test/resources"))]
    } else {
        raw.test_resources
            .iter()
            .map(|dir| ResourceDir::new(absolutize(base_dir, dir)))
            .collect()
    };

    project.modules = raw.modules;

    for raw_dep in raw.dependencies {
        let (Some(group), Some(artifact)) = (raw_dep.group_id, raw_dep.artifact_id) else {
            tracing::warn!("Ignoring dependency with missing coordinates");
            continue;
        };
        let Some(version) = raw_dep.version else {
            tracing::warn!(
                "Ignoring dependency {}:{} with no version (managed versions are not interpolated)",
                group,
                artifact
            );
            continue;
        };
        let mut artifact = Artifact::new(
            group,
            artifact,
            version,
            raw_dep.dep_type.unwrap_or_else(|| "jar".to_string()),
        );
        if let Some(classifier) = raw_dep.classifier {
            artifact = artifact.with_classifier(classifier);
        }
        if let Some(scope) = raw_dep.scope.as_deref() {
            match Scope::from_str(scope) {
                Some(scope) => artifact = artifact.with_scope(scope),
                None => {
                    tracing::warn!("Unknown scope '{}' for {}, assuming compile", scope, artifact)
                }
            }
        }
        if raw_dep.optional.as_deref() == Some("true") {
            artifact = artifact.with_optional(true);
        }
        project.dependencies.push(artifact);
    }

    Ok(project)
}

/// Joins relative paths onto the base dir and normalizes separators.
fn absolutize(base_dir: &Path, path: &str) -> String {
    let normalized = normalize_path(path);
    if Path::new(&normalized).is_absolute() {
        normalized
    } else {
        normalize_path(&base_dir.join(&normalized).to_string_lossy())
    }
}

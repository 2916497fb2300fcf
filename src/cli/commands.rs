use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use walkdir::WalkDir;

use crate::error::{GeneratorError, Result};
use eclipse_gen::artifact::{ExclusionPatterns, LocalRepositoryResolver};
use eclipse_gen::eclipse::{write_project_file, ClasspathAssembler, ClasspathConfig};
use eclipse_gen::project::{
    BuildSession, DescriptorCache, KnownProjects, PomLoader, ProjectDescriptor, ProjectLoader,
    POM_FILE,
};

#[derive(Parser)]
#[command(name = "eclipse-gen")]
#[command(about = "Generates Eclipse .classpath and .project files for Maven multi-module builds")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Generate .classpath and .project for the project in the current directory
    eclipse-gen generate

    # Multi-module build with transitive resolution and resource directories
    eclipse-gen generate ./server --transitive --include-resources

    # Exclude a group and a specific artifact version
    eclipse-gen generate --exclude org.slowlib --exclude log4j:log4j:1.2.12

    # Show the parsed project descriptor
    eclipse-gen info --format json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the Eclipse metadata files
    Generate(GenerateArgs),

    /// Show the parsed project descriptor
    Info {
        /// Project directory or pom.xml path
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Project directory or pom.xml path
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Symbolic name substituted for the local repository root
    #[arg(long, default_value = "M2_REPO")]
    pub repo_var: String,

    /// Local repository root (defaults to $M2_REPO or ~/.m2/repository)
    #[arg(long)]
    pub local_repo: Option<PathBuf>,

    /// Artifact types allowed on the classpath
    #[arg(long = "type", default_value = "jar")]
    pub types: Vec<String>,

    /// Exclusion pattern: group, group:artifact or group:artifact:version
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// Resolve dependencies transitively
    #[arg(long)]
    pub transitive: bool,

    /// Add resource directories as source entries
    #[arg(long)]
    pub include_resources: bool,

    /// File whose content is spliced verbatim into the generated .classpath
    #[arg(long)]
    pub merge_file: Option<PathBuf>,

    /// Name written into the .project file (defaults to the artifactId)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Ignore declared submodules, generate for the root project only
    #[arg(long)]
    pub no_modules: bool,
}

/// Resolves a CLI path argument to the descriptor file it names.
fn pom_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(POM_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Loads the descriptors of every submodule declared below `root`,
/// recursively, skipping modules whose descriptor cannot be built.
fn collect_related(
    root: &ProjectDescriptor,
    cache: &DescriptorCache,
    session: &BuildSession,
    loader: &dyn ProjectLoader,
    known: &KnownProjects,
) -> Vec<Arc<ProjectDescriptor>> {
    let mut related = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = root
        .modules
        .iter()
        .map(|m| (root.base_dir.clone(), m.clone()))
        .collect();

    while let Some((base_dir, module)) = pending.pop() {
        let Some(module_pom) = find_module_pom(&base_dir, &module) else {
            tracing::warn!("No {} found for module '{}', skipping", POM_FILE, module);
            continue;
        };
        let Some(project) = cache.get(&module_pom, session, loader) else {
            tracing::warn!("Could not load module '{}', skipping", module);
            continue;
        };
        let id = project.self_artifact().key();
        if known.is_present(&id) {
            continue;
        }
        known.add(id);
        pending.extend(
            project
                .modules
                .iter()
                .map(|m| (project.base_dir.clone(), m.clone())),
        );
        related.push(project);
    }

    related
}

/// Locates a module's pom: the declared directory first, then the nearest
/// pom below it for modules that nest their descriptor deeper.
fn find_module_pom(base_dir: &Path, module: &str) -> Option<PathBuf> {
    let module_dir = base_dir.join(module);
    let direct = module_dir.join(POM_FILE);
    if direct.is_file() {
        return Some(direct);
    }
    WalkDir::new(&module_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == POM_FILE)
        .map(|e| e.into_path())
}

pub fn generate(args: &GenerateArgs) -> Result<()> {
    let loader = PomLoader::new();
    let root_pom = pom_path(&args.path);
    let root = loader.load(&root_pom)?;

    let session = BuildSession::new();
    let cache = DescriptorCache::new();
    let known = KnownProjects::new();
    known.add(root.self_artifact().key());

    let related = if args.no_modules {
        Vec::new()
    } else {
        collect_related(&root, &cache, &session, &loader, &known)
    };

    let local_repository = match &args.local_repo {
        Some(repo) => repo.clone(),
        None => LocalRepositoryResolver::default_repository().ok_or_else(|| {
            GeneratorError::Config(
                "could not determine the local repository, pass --local-repo".to_string(),
            )
        })?,
    };

    let merge = match &args.merge_file {
        Some(file) => Some(fs::read_to_string(file)?),
        None => None,
    };

    let mut config = ClasspathConfig::new(&args.repo_var, local_repository);
    config.allowed_types = args.types.iter().cloned().collect();
    config.excludes = ExclusionPatterns::from_patterns(args.excludes.clone());
    config.transitive = args.transitive;
    config.include_resources = args.include_resources;
    config.merge = merge;

    let resolver = LocalRepositoryResolver::new();
    let assembler = ClasspathAssembler::new(&resolver, &config);
    let classpath_file = assembler.write(&root, &related)?;

    let project_name = args
        .project_name
        .clone()
        .unwrap_or_else(|| root.artifact_id.clone());
    let project_file = root.base_dir.join(".project");
    write_project_file(&project_file, &project_name)?;
    tracing::info!("Project file written --> '{}'", project_file.display());

    println!("Wrote {}", classpath_file.display());
    println!("Wrote {}", project_file.display());
    if !related.is_empty() {
        println!("Included {} related module(s)", related.len());
    }

    Ok(())
}

pub fn info(path: &Path, format: &str) -> Result<()> {
    let loader = PomLoader::new();
    let project = loader.load(&pom_path(path))?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&project)
                .map_err(|e| GeneratorError::Parse(e.to_string()))?;
            println!("{}", json);
        }
        _ => {
            println!(
                "{}:{}:{} ({})",
                project.group_id, project.artifact_id, project.version, project.packaging
            );
            println!("Base dir: {}", project.base_dir.display());
            println!("Output:   {}", project.output_directory);
            for root in &project.compile_source_roots {
                println!("Source:   {}", root);
            }
            for root in &project.test_source_roots {
                println!("Test:     {}", root);
            }
            if !project.modules.is_empty() {
                println!("Modules:  {}", project.modules.join(", "));
            }
            if project.dependencies.is_empty() {
                println!("No dependencies");
            } else {
                println!("Dependencies:");
                for dep in &project.dependencies {
                    println!("  {} ({})", dep, dep.scope.as_str());
                }
            }
        }
    }

    Ok(())
}

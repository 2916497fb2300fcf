//! Eclipse metadata generation.
//!
//! Produces the `.classpath` and `.project` files for a Maven multi-module
//! project from its loaded descriptors.

pub mod classpath;
pub mod source_roots;
pub mod writer;

use serde::{Deserialize, Serialize};

/// Container entry every generated classpath carries.
pub const JRE_CONTAINER: &str = "org.eclipse.jdt.launching.JRE_CONTAINER";

/// Builder id written into every `.project` file.
pub const JAVA_BUILDER: &str = "org.eclipse.jdt.core.javabuilder";

/// Nature id written into every `.project` file.
pub const JAVA_NATURE: &str = "org.eclipse.jdt.core.javanature";

/// One `classpathentry` element of a `.classpath` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClasspathEntry {
    /// A source or resource root, relative to the project directory.
    Source(String),
    /// A library path, absolute or relative to the project directory.
    Library(String),
    /// A library path under the repository variable.
    Variable(String),
    /// A classpath container such as the JRE.
    Container(String),
    /// The build output directory.
    Output(String),
}

impl ClasspathEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            ClasspathEntry::Source(_) => "src",
            ClasspathEntry::Library(_) => "lib",
            ClasspathEntry::Variable(_) => "var",
            ClasspathEntry::Container(_) => "con",
            ClasspathEntry::Output(_) => "output",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ClasspathEntry::Source(p)
            | ClasspathEntry::Library(p)
            | ClasspathEntry::Variable(p)
            | ClasspathEntry::Container(p)
            | ClasspathEntry::Output(p) => p,
        }
    }
}

// Re-export commonly used types
pub use classpath::{ClasspathAssembler, ClasspathConfig};
pub use writer::{write_classpath_file, write_project_file};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kinds() {
        assert_eq!(ClasspathEntry::Source("src".into()).kind(), "src");
        assert_eq!(ClasspathEntry::Library("a.jar".into()).kind(), "lib");
        assert_eq!(ClasspathEntry::Variable("M2_REPO/a.jar".into()).kind(), "var");
        assert_eq!(ClasspathEntry::Container(JRE_CONTAINER.into()).kind(), "con");
        assert_eq!(ClasspathEntry::Output("target/classes".into()).kind(), "output");
    }

    #[test]
    fn test_entry_path() {
        let entry = ClasspathEntry::Variable("M2_REPO/g/a/1.0/a-1.0.jar".into());
        assert_eq!(entry.path(), "M2_REPO/g/a/1.0/a-1.0.jar");
    }
}

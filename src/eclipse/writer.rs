//! XML emission for the `.classpath` and `.project` files.
//!
//! Any serialization or I/O failure is fatal; a partially written document
//! is never considered valid.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;

use super::{ClasspathEntry, JAVA_BUILDER, JAVA_NATURE};

/// Writes the `.classpath` document: ordered `classpathentry` elements plus
/// an optional raw merge fragment spliced in before the closing tag.
pub fn write_classpath_file(
    path: &Path,
    entries: &[ClasspathEntry],
    merge: Option<&str>,
) -> Result<()> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("classpath")))?;

    for entry in entries {
        let mut element = BytesStart::new("classpathentry");
        element.push_attribute(("kind", entry.kind()));
        element.push_attribute(("path", entry.path()));
        writer.write_event(Event::Empty(element))?;
    }

    if let Some(merge) = merge {
        if !merge.trim().is_empty() {
            // Caller-supplied markup goes in verbatim.
            writer.write_event(Event::Text(BytesText::from_escaped(merge)))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("classpath")))?;
    fs::write(path, writer.into_inner())?;
    Ok(())
}

/// Writes the fixed-shape `.project` document, parameterized only by the
/// project name.
pub fn write_project_file(path: &Path, project_name: &str) -> Result<()> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("projectDescription")))?;

    text_element(&mut writer, "name", project_name)?;
    empty_element(&mut writer, "comment")?;
    empty_element(&mut writer, "projects")?;

    writer.write_event(Event::Start(BytesStart::new("buildSpec")))?;
    writer.write_event(Event::Start(BytesStart::new("buildCommand")))?;
    text_element(&mut writer, "name", JAVA_BUILDER)?;
    empty_element(&mut writer, "arguments")?;
    writer.write_event(Event::End(BytesEnd::new("buildCommand")))?;
    writer.write_event(Event::End(BytesEnd::new("buildSpec")))?;

    writer.write_event(Event::Start(BytesStart::new("natures")))?;
    text_element(&mut writer, "nature", JAVA_NATURE)?;
    writer.write_event(Event::End(BytesEnd::new("natures")))?;

    writer.write_event(Event::End(BytesEnd::new("projectDescription")))?;
    fs::write(path, writer.into_inner())?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty_element(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer.write_event(Event::Empty(BytesStart::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclipse::JRE_CONTAINER;
    use tempfile::TempDir;

    #[test]
    fn test_classpath_document_shape() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".classpath");

        let entries = vec![
            ClasspathEntry::Source("src/main/java".into()),
            ClasspathEntry::Variable("M2_REPO/g/a/1.0/a-1.0.jar".into()),
            ClasspathEntry::Container(JRE_CONTAINER.into()),
            ClasspathEntry::Output("target/classes".into()),
        ];
        write_classpath_file(&file, &entries, None).unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(content.contains(r#"<classpathentry kind="src" path="src/main/java"/>"#));
        assert!(content.contains(r#"<classpathentry kind="var" path="M2_REPO/g/a/1.0/a-1.0.jar"/>"#));
        assert!(content.contains(&format!(r#"<classpathentry kind="con" path="{}"/>"#, JRE_CONTAINER)));
        assert!(content.contains(r#"<classpathentry kind="output" path="target/classes"/>"#));
        assert!(content.trim_end().ends_with("</classpath>"));
    }

    #[test]
    fn test_classpath_merge_spliced_verbatim() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".classpath");

        let merge = r#"<classpathentry kind="lib" path="extra.jar"/>"#;
        write_classpath_file(&file, &[], Some(merge)).unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains(merge));
        let merge_pos = content.find(merge).unwrap();
        let close_pos = content.find("</classpath>").unwrap();
        assert!(merge_pos < close_pos);
    }

    #[test]
    fn test_blank_merge_ignored() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".classpath");

        write_classpath_file(&file, &[], Some("   \n")).unwrap();
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(!content.contains("   \n</classpath>"));
    }

    #[test]
    fn test_project_document_shape() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".project");

        write_project_file(&file, "my-project").unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("<projectDescription>"));
        assert!(content.contains("<name>my-project</name>"));
        assert!(content.contains("<comment/>"));
        assert!(content.contains("<projects/>"));
        assert!(content.contains(&format!("<name>{}</name>", JAVA_BUILDER)));
        assert!(content.contains("<arguments/>"));
        assert!(content.contains(&format!("<nature>{}</nature>", JAVA_NATURE)));
    }

    #[test]
    fn test_project_name_is_escaped() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".project");

        write_project_file(&file, "a<b&c").unwrap();
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("<name>a&lt;b&amp;c</name>"));
    }
}

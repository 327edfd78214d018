//! Scaffolding of new projects.
//! Derives the names of a new project, resolves its configuration and
//! generates the starter files of the project layout from templates.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{Config, ProjectConfig, Registry};
use crate::constants::{CORE_MARKER_FILE, DEFAULT_VERSION, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::generate::{backup_paths, WriteOutcome};
use crate::naming::{symbol_from_name, ProjectSymbol};
use crate::template::{make_executable, TemplateEngine};

/// One generated file of the project layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Logical template name, when it differs from the path's basename
    pub template: Option<&'static str>,
    /// Whether the file is made executable after writing
    pub executable: bool,
}

impl ScaffoldFile {
    fn new<P: Into<PathBuf>>(path: P, template: Option<&'static str>, executable: bool) -> Self {
        Self { path: path.into(), template, executable }
    }
}

/// Files of a new project, in generation order.
pub fn scaffold_files(package: &str) -> Vec<ScaffoldFile> {
    let mut files = vec![
        ScaffoldFile::new(format!("bin/{package}"), Some("command"), true),
        ScaffoldFile::new(PROJECT_CONFIG_FILE, None, false),
        ScaffoldFile::new(format!("lib/{package}.rb"), Some("library"), false),
        ScaffoldFile::new(format!("lib/{package}/{CORE_MARKER_FILE}"), None, false),
        ScaffoldFile::new("test/runner", Some("test_runner"), true),
        ScaffoldFile::new("test/helper.rb", Some("test_helper.rb"), false),
        ScaffoldFile::new(format!("test/{package}_test.rb"), Some("library_test.rb"), false),
    ];

    for document in [
        "LICENSE", "MANUAL", "SYNOPSIS", "README", "INSTALL", "USAGE", "HACKING", "HISTORY",
        "CREDITS", "BEYOND",
    ] {
        files.push(ScaffoldFile::new(document, None, false));
    }

    files
}

/// Path of the library file that loads a project; its directory-of-directory
/// is the project root.
pub fn library_file(root: &Path, package: &str) -> PathBuf {
    root.join("lib").join(format!("{package}.rb"))
}

/// Names of a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNames {
    /// Human project name as given by the user
    pub project: String,
    /// Project symbol naming the project's namespace
    pub library: ProjectSymbol,
    /// Filesystem-safe package name
    pub package: String,
}

impl ProjectNames {
    /// Derives the library symbol and package name from a project name.
    ///
    /// # Errors
    /// * `Error::ValidationError` if the project name or package override is unusable
    pub fn derive(project_name: &str, package_override: Option<&str>) -> Result<Self> {
        let library = symbol_from_name(project_name)?;
        let package = match package_override.map(str::trim) {
            Some("") => {
                return Err(Error::ValidationError("package name must not be empty".to_string()))
            }
            Some(package) if package.contains(['/', '\\']) => {
                return Err(Error::ValidationError(format!(
                    "package name '{package}' must not contain path separators"
                )))
            }
            Some(package) => package.to_string(),
            None => library.program_name(),
        };

        Ok(Self { project: project_name.to_string(), library, package })
    }
}

/// Generates new projects into a root directory.
pub struct Scaffold<'a> {
    engine: &'a TemplateEngine<'a>,
    root: PathBuf,
}

impl<'a> Scaffold<'a> {
    pub fn new<P: Into<PathBuf>>(engine: &'a TemplateEngine<'a>, root: P) -> Self {
        Self { engine, root: root.into() }
    }

    /// Instills Inochi into the root directory.
    ///
    /// # Arguments
    /// * `registry` - Registry used to resolve the new project's configuration
    /// * `names` - Names of the new project
    ///
    /// # Returns
    /// * `Result<Vec<(PathBuf, WriteOutcome)>>` - Every generated path and what happened to it
    pub fn init(
        &self,
        registry: &mut Registry,
        names: &ProjectNames,
    ) -> Result<Vec<(PathBuf, WriteOutcome)>> {
        let partial = ProjectConfig {
            project: Some(names.project.clone()),
            version: Some(DEFAULT_VERSION.to_string()),
            program: Some(names.package.clone()),
            ..ProjectConfig::default()
        };
        let config =
            registry.resolve(&names.library, partial, &library_file(&self.root, &names.package))?;
        let context = scaffold_context(&config, names)?;

        let mut outcomes = Vec::new();
        for file in scaffold_files(&names.package) {
            let path = self.root.join(&file.path);
            debug!("Generating {}", path.display());

            let outcome = self.engine.create(&path, file.template, &context)?;
            if file.executable {
                make_executable(&path)?;
                if outcome == WriteOutcome::Updated {
                    make_executable(backup_paths(&path).1)?;
                }
            }
            outcomes.push((path, outcome));
        }

        Ok(outcomes)
    }
}

/// Template context: every configuration parameter plus the derived names.
pub fn scaffold_context(config: &Config, names: &ProjectNames) -> Result<serde_json::Value> {
    let mut context = config.to_value()?;
    if let serde_json::Value::Object(fields) = &mut context {
        fields.insert("library".to_string(), names.library.to_string().into());
        fields.insert("package".to_string(), names.package.clone().into());
        fields.insert("year".to_string(), config.release.chars().take(4).collect::<String>().into());
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_files_layout() {
        let paths: Vec<PathBuf> = scaffold_files("an_xml_parser").into_iter().map(|f| f.path).collect();
        assert_eq!(paths[0], PathBuf::from("bin/an_xml_parser"));
        assert_eq!(paths[3], PathBuf::from("lib/an_xml_parser/inochi.rb"));
        assert_eq!(paths[6], PathBuf::from("test/an_xml_parser_test.rb"));
        assert_eq!(paths.len(), 17);
    }

    #[test]
    fn test_derive_names() {
        let names = ProjectNames::derive("an XMLParser", None).unwrap();
        assert_eq!(names.library.as_str(), "An_XMLParser");
        assert_eq!(names.package, "an_xml_parser");

        let names = ProjectNames::derive("Foo", Some("foo-cli")).unwrap();
        assert_eq!(names.package, "foo-cli");

        assert!(ProjectNames::derive("Foo", Some(" ")).is_err());
        assert!(ProjectNames::derive("Foo", Some("a/b")).is_err());
        assert!(ProjectNames::derive("!!", None).is_err());
    }
}

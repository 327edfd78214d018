//! Loading of existing projects.
//! Finds a scaffolded project's package and library symbol, resolves its
//! configuration and extracts its authors from the license.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use log::debug;
use regex::Regex;

use crate::config::{load_project_config, Config, Registry};
use crate::constants::{CORE_MARKER_FILE, LICENSE_FILE, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::naming::ProjectSymbol;
use crate::scaffold::library_file;

static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:module|class)\b\s+([A-Za-z0-9_]+)").unwrap());

static COPYRIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Copyright.*?\d+\s+(.*)").unwrap());

static CONTACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*<(.*?)>").unwrap());

/// A copyright holder of the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub contact: String,
}

/// An existing project and its resolved configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub package: String,
    pub library: ProjectSymbol,
    pub config: Arc<Config>,
}

impl Project {
    /// Loads the project located in `root`.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the project configuration file or the core
    ///   marker file is missing or malformed
    pub fn load<P: AsRef<Path>>(root: P, registry: &mut Registry) -> Result<Self> {
        let root = root.as_ref();
        let config_path = root.join(PROJECT_CONFIG_FILE);
        if !config_path.is_file() {
            return Err(Error::ConfigError(format!(
                "no project configuration file '{}'",
                config_path.display()
            )));
        }

        let (package, marker) = find_core_marker(root)?;
        let marker_source =
            fs::read_to_string(&marker).map_err(|e| Error::file("read", &marker, e))?;
        let library = library_symbol(&marker_source).ok_or_else(|| {
            Error::ConfigError(format!("no module declaration in '{}'", marker.display()))
        })?;
        debug!("Found project '{library}' in package '{package}'.");

        let partial = load_project_config(&config_path)?;
        let config = registry.resolve(&library, partial, &library_file(root, &package))?;

        Ok(Self { root: root.to_path_buf(), package, library, config })
    }

    /// Authors named in the project's license file; empty if there is none.
    pub fn authors(&self) -> Result<Vec<Author>> {
        let license = self.root.join(LICENSE_FILE);
        if !license.is_file() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&license).map_err(|e| Error::file("read", &license, e))?;
        Ok(copyright_holders(&text))
    }
}

/// Extracts copyright holders from notices of the form
/// `Copyright YEAR HOLDER <EMAIL>`, where the email is optional.
pub fn copyright_holders(license: &str) -> Vec<Author> {
    COPYRIGHT
        .captures_iter(license)
        .map(|caps| {
            let holder = caps[1].trim_end();
            match CONTACT.captures(holder) {
                Some(contact) => {
                    let start = contact.get(0).map_or(holder.len(), |m| m.start());
                    Author { name: holder[..start].to_string(), contact: contact[1].to_string() }
                }
                None => Author { name: holder.to_string(), contact: String::new() },
            }
        })
        .collect()
}

/// The symbol declared by the first `module` or `class` in `source`.
pub fn library_symbol(source: &str) -> Option<ProjectSymbol> {
    NAMESPACE.captures(source).and_then(|caps| ProjectSymbol::new(&caps[1]).ok())
}

// Finds lib/<package>/inochi.rb, preferring the alphabetically first package.
fn find_core_marker(root: &Path) -> Result<(String, PathBuf)> {
    let lib = root.join("lib");
    let entries = fs::read_dir(&lib).map_err(|e| Error::file("list", &lib, e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::file("list", &lib, e))?;
        let marker = entry.path().join(CORE_MARKER_FILE);
        if marker.is_file() {
            if let Some(package) = entry.file_name().to_str() {
                candidates.push((package.to_string(), marker));
            }
        }
    }

    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        Error::ConfigError(format!(
            "no core marker file 'lib/*/{CORE_MARKER_FILE}' in '{}'",
            root.display()
        ))
    })
}

//! Project configuration handling.
//! Resolves a partial project configuration (usually loaded from `inochi.conf`)
//! into a complete [`Config`] by applying defaults, resolving cross-references
//! between fields and normalizing dependency version requirements.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VERSION;
use crate::error::{Error, Result};
use crate::naming::ProjectSymbol;

/// Normalized dependencies: package name to its version requirements.
/// An empty list means any version is acceptable.
pub type Dependencies = IndexMap<String, Vec<String>>;

/// Version requirements for one dependency as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VersionRequirements {
    /// A single requirement such as `"~> 1"`
    One(String),
    /// Several requirements that must all hold, such as `[">= 1.2", "< 2"]`
    Many(Vec<Option<String>>),
}

/// Raw dependencies as written by the user; `None` stands for "any version".
pub type RawDependencies = IndexMap<String, Option<VersionRequirements>>;

/// Partial project configuration. Every absent field receives a default
/// during resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Name of the project
    pub project: Option<String>,
    /// Short single-line description of the project
    pub tagline: Option<String>,
    /// Address of the project's home page
    pub website: Option<String>,
    /// Address of the project's user manual
    pub docsite: Option<String>,
    /// Name of the main project executable
    pub program: Option<String>,
    /// Number of this release
    pub version: Option<String>,
    /// Date of this release
    pub release: Option<String>,
    /// How the project name is displayed
    pub display: Option<String>,
    /// Directory which contains the project
    pub install: Option<PathBuf>,
    /// Dependencies needed at runtime
    #[serde(alias = "require-dependencies")]
    pub require: Option<RawDependencies>,
    /// Dependencies needed during development
    #[serde(alias = "develop-dependencies")]
    pub develop: Option<RawDependencies>,
}

/// Version number of a project release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new<S: Into<String>>(version: S) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the major number in this version.
    pub fn major(&self) -> Option<&str> {
        let digits = self.0.bytes().take_while(u8::is_ascii_digit).count();
        (digits > 0).then(|| &self.0[..digits])
    }

    /// Returns a string describing any version with the current major number.
    pub fn series(&self) -> Option<String> {
        self.major().map(|major| format!("{major}.x.x"))
    }

    /// Returns a pessimistic requirement matching the current major number.
    pub fn requirement(&self) -> Option<String> {
        self.major().map(|major| format!("~> {major}"))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved project configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub project: String,
    pub tagline: String,
    pub website: String,
    pub docsite: String,
    pub program: String,
    pub version: Version,
    pub release: String,
    pub display: String,
    pub install: PathBuf,
    pub require: Dependencies,
    pub develop: Dependencies,
}

impl Config {
    /// Every configuration parameter as an uppercased constant name mapped to
    /// its value. The `INOCHI` constant holds the whole configuration.
    pub fn constants(&self) -> Result<IndexMap<String, serde_json::Value>> {
        let record = self.to_value()?;
        let mut constants = IndexMap::new();
        if let serde_json::Value::Object(fields) = &record {
            for (name, value) in fields {
                constants.insert(name.to_uppercase(), value.clone());
            }
        }
        constants.insert("INOCHI".to_string(), record);
        Ok(constants)
    }

    /// The configuration as a JSON object keyed by parameter name.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| Error::ConfigError(format!("cannot serialize configuration: {e}")))
    }

    /// Description of this release, e.g. `Inochi 3.0.0 (2010-04-27)`.
    pub fn summary(&self) -> String {
        format!("{} {} ({})", self.project, self.version, self.release)
    }

    /// Version information in YAML fashion for easy consumption by other tools.
    pub fn version_info(&self) -> String {
        format!(
            "project: {}\nversion: {}\nrelease: {}\nwebsite: {}\ninstall: {}",
            self.project,
            self.version,
            self.release,
            self.website,
            self.install.display()
        )
    }
}

/// Keeps the configuration of every project resolved during this run.
///
/// Resolution happens at most once per project symbol; later requests for
/// the same symbol return the record created first.
#[derive(Debug, Default)]
pub struct Registry {
    resolved: HashMap<ProjectSymbol, Arc<Config>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the configuration of the given project.
    ///
    /// # Arguments
    /// * `symbol` - Symbol of the project
    /// * `partial` - Configuration supplied by the user
    /// * `caller_file` - File requesting the resolution, located in the
    ///   project's library directory
    ///
    /// # Returns
    /// * `Result<Arc<Config>>` - The configuration, shared with later callers
    pub fn resolve(
        &mut self,
        symbol: &ProjectSymbol,
        partial: ProjectConfig,
        caller_file: &Path,
    ) -> Result<Arc<Config>> {
        if let Some(config) = self.resolved.get(symbol) {
            debug!("Project '{symbol}' is already configured.");
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(resolve_config(symbol, partial, caller_file)?);
        debug!("Configured project '{symbol}' installed in '{}'.", config.install.display());
        self.resolved.insert(symbol.clone(), Arc::clone(&config));
        Ok(config)
    }

    pub fn get(&self, symbol: &ProjectSymbol) -> Option<Arc<Config>> {
        self.resolved.get(symbol).cloned()
    }

    pub fn is_resolved(&self, symbol: &ProjectSymbol) -> bool {
        self.resolved.contains_key(symbol)
    }
}

/// Applies defaults to the partial configuration without consulting a
/// [`Registry`].
pub fn resolve_config(
    symbol: &ProjectSymbol,
    partial: ProjectConfig,
    caller_file: &Path,
) -> Result<Config> {
    let caller_install = install_dir(caller_file)?;
    let install = partial.install.unwrap_or(caller_install);

    let project = partial.project.unwrap_or_else(|| symbol.to_string());
    let version = Version::new(partial.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()));
    let website = partial.website.unwrap_or_default();

    Ok(Config {
        tagline: partial.tagline.unwrap_or_default(),
        release: partial.release.unwrap_or_else(today),
        docsite: partial.docsite.unwrap_or_else(|| website.clone()),
        display: partial.display.unwrap_or_else(|| format!("{project} {version}")),
        program: partial.program.unwrap_or_else(|| symbol.program_name()),
        require: normalize_dependencies(partial.require.unwrap_or_default()),
        develop: normalize_dependencies(partial.develop.unwrap_or_default()),
        install,
        project,
        version,
        website,
    })
}

/// Converts every requirement into a list, dropping empty entries.
pub fn normalize_dependencies(raw: RawDependencies) -> Dependencies {
    raw.into_iter()
        .map(|(name, requirements)| {
            let requirements: Vec<String> = match requirements {
                None => Vec::new(),
                Some(VersionRequirements::One(requirement)) => vec![requirement],
                Some(VersionRequirements::Many(requirements)) => {
                    requirements.into_iter().flatten().collect()
                }
            };
            let requirements: Vec<String> =
                requirements.into_iter().filter(|r| !r.trim().is_empty()).collect();
            (name, requirements)
        })
        .collect()
}

/// Reads a partial configuration from a YAML project configuration file.
pub fn load_project_config<P: AsRef<Path>>(config_path: P) -> Result<ProjectConfig> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from {}", config_path.display());

    let content = std::fs::read_to_string(config_path)
        .map_err(|e| Error::file("read project configuration", config_path, e))?;
    let invalid = |e: serde_yaml::Error| {
        Error::ConfigError(format!(
            "could not load project configuration file '{}': {e}",
            config_path.display()
        ))
    };

    // A file holding only comments is an empty configuration.
    let value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(invalid)?;
    if value.is_null() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_value(value).map_err(invalid)
}

/// The project directory: one level above the directory of `caller_file`.
fn install_dir(caller_file: &Path) -> Result<PathBuf> {
    if caller_file.as_os_str().is_empty() {
        return Err(Error::ConfigError(
            "cannot determine the file requesting project configuration".to_string(),
        ));
    }

    let caller_file = if caller_file.is_absolute() {
        caller_file.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::file("resolve current directory for", caller_file, e))?
            .join(caller_file)
    };

    caller_file
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::ConfigError(format!(
                "cannot determine install directory from '{}'",
                caller_file.display()
            ))
        })
}

fn today() -> String {
    chrono::Local::now().format("%F").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_helpers() {
        let version = Version::new("3.0.0");
        assert_eq!(version.major(), Some("3"));
        assert_eq!(version.series().as_deref(), Some("3.x.x"));
        assert_eq!(version.requirement().as_deref(), Some("~> 3"));

        let version = Version::new("beta");
        assert_eq!(version.major(), None);
        assert_eq!(version.series(), None);
    }

    #[test]
    fn test_install_dir() {
        let install = install_dir(Path::new("/srv/foo/lib/foo.rb")).unwrap();
        assert_eq!(install, PathBuf::from("/srv/foo"));

        assert!(install_dir(Path::new("")).is_err());
        assert!(install_dir(Path::new("/foo.rb")).is_err());
    }
}

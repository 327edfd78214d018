//! Template lookup and materialization.
//! Locates templates among the built-in set or in a template directory,
//! renders them through a [`TemplateRenderer`] and hands the result to a
//! [`FileGenerator`].

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use log::debug;

use crate::constants::TEMPLATE_EXTENSION;
use crate::error::{Error, Result};
use crate::generate::{FileGenerator, WriteOutcome};
use crate::renderer::TemplateRenderer;

static BUILTIN_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Source of the built-in template for a logical template name.
pub fn builtin_template(logical_name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .get_file(template_file_name(logical_name))
        .and_then(|file| file.contents_utf8())
}

fn template_file_name(logical_name: &str) -> String {
    format!("{logical_name}.{TEMPLATE_EXTENSION}")
}

/// Renders templates onto the filesystem.
pub struct TemplateEngine<'a> {
    /// `None` selects the templates built into Inochi
    template_dir: Option<PathBuf>,
    renderer: &'a dyn TemplateRenderer,
    generator: &'a FileGenerator<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates an engine reading `<logical-name>.j2` files from `template_dir`.
    pub fn new<P: Into<PathBuf>>(
        template_dir: P,
        renderer: &'a dyn TemplateRenderer,
        generator: &'a FileGenerator<'a>,
    ) -> Self {
        Self { template_dir: Some(template_dir.into()), renderer, generator }
    }

    /// Creates an engine using the templates built into Inochi.
    pub fn with_default_templates(
        renderer: &'a dyn TemplateRenderer,
        generator: &'a FileGenerator<'a>,
    ) -> Self {
        Self { template_dir: None, renderer, generator }
    }

    /// Directory the templates are read from, or `None` for the built-in set.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// Path of the template file for a logical template name, when templates
    /// come from a directory.
    pub fn template_path(&self, logical_name: &str) -> Option<PathBuf> {
        self.template_dir.as_ref().map(|dir| dir.join(template_file_name(logical_name)))
    }

    /// Renders the named template against `context`.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if the template does not exist
    /// * `Error::TemplateError` if rendering fails or references an undefined name
    pub fn render(&self, logical_name: &str, context: &serde_json::Value) -> Result<String> {
        let source = self.template_source(logical_name)?;
        self.renderer.render(logical_name, &source, context)
    }

    fn template_source(&self, logical_name: &str) -> Result<String> {
        let Some(template_path) = self.template_path(logical_name) else {
            debug!("Rendering built-in template {logical_name}");
            return builtin_template(logical_name)
                .map(str::to_string)
                .ok_or_else(|| self.not_found(logical_name));
        };

        if !template_path.is_file() {
            return Err(self.not_found(logical_name));
        }
        debug!("Rendering template {}", template_path.display());
        fs::read_to_string(&template_path).map_err(|e| Error::file("read template", &template_path, e))
    }

    fn not_found(&self, logical_name: &str) -> Error {
        Error::TemplateNotFoundError {
            template: logical_name.to_string(),
            template_dir: match &self.template_dir {
                Some(dir) => dir.display().to_string(),
                None => "built-in templates".to_string(),
            },
        }
    }

    /// Renders the named template and writes the result to `output_path`.
    pub fn render_and_write<P: AsRef<Path>>(
        &self,
        logical_name: &str,
        context: &serde_json::Value,
        output_path: P,
    ) -> Result<WriteOutcome> {
        let content = self.render(logical_name, context)?;
        self.generator.write(output_path, content.as_bytes())
    }

    /// Writes `output_path` from the template named after its basename,
    /// unless another template name is given.
    pub fn create<P: AsRef<Path>>(
        &self,
        output_path: P,
        template: Option<&str>,
        context: &serde_json::Value,
    ) -> Result<WriteOutcome> {
        let output_path = output_path.as_ref();
        let logical_name = match template {
            Some(name) => name.to_string(),
            None => output_path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::TemplateError(format!(
                        "cannot derive a template name from '{}'",
                        output_path.display()
                    ))
                })?,
        };

        self.render_and_write(&logical_name, context, output_path)
    }
}

/// Marks a generated file as executable.
#[cfg(unix)]
pub fn make_executable<P: AsRef<Path>>(path: P) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| Error::file("set permissions of", path, e))
}

/// Marks a generated file as executable.
#[cfg(not(unix))]
pub fn make_executable<P: AsRef<Path>>(_path: P) -> Result<()> {
    Ok(())
}

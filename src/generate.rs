//! Non-destructive file generation.
//! Writes generated content to disk without ever losing what was there
//! before: unchanged files are skipped, and changed files get a backup and a
//! candidate replacement that a merge tool reconciles.

use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, warn};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// What [`FileGenerator::write`] did with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The path did not exist and was created
    Created,
    /// The path already had the same content
    Skipped,
    /// The path had different content; `.old` and `.new` siblings were written
    Updated,
}

impl WriteOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            WriteOutcome::Created => "create",
            WriteOutcome::Skipped => "skip",
            WriteOutcome::Updated => "update",
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives a notification for every file the generator acts on.
pub trait Notifier {
    fn notify(&self, action: &str, path: &Path);
}

/// Prints notifications to stdout as right-aligned action labels.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, action: &str, path: &Path) {
        println!("{action:>16}  {}", path.display());
    }
}

/// Returns the `<path>.old` and `<path>.new` siblings of a generated file.
pub fn backup_paths(path: &Path) -> (PathBuf, PathBuf) {
    let sibling = |suffix: &str| {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };
    (sibling(".old"), sibling(".new"))
}

/// Writes generated content to the filesystem.
pub struct FileGenerator<'a> {
    notifier: &'a dyn Notifier,
    merger: Option<String>,
}

impl<'a> FileGenerator<'a> {
    /// Creates a generator.
    ///
    /// # Arguments
    /// * `notifier` - Receives one notification per written path
    /// * `merger` - Command invoked as `<merger> <old> <new> <current>` for updated files
    pub fn new(notifier: &'a dyn Notifier, merger: Option<String>) -> Self {
        let merger = merger.filter(|command| !command.trim().is_empty());
        Self { notifier, merger }
    }

    /// Writes `content` to `path`.
    ///
    /// # Returns
    /// * `WriteOutcome::Created` - `path` did not exist
    /// * `WriteOutcome::Skipped` - `path` already holds `content`
    /// * `WriteOutcome::Updated` - `path` differs; its content was copied to
    ///   `<path>.old`, `content` went to `<path>.new` and `path` is untouched
    ///
    /// # Errors
    /// * `Error::FileError` if reading, copying or writing fails
    pub fn write<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<WriteOutcome> {
        let path = path.as_ref();

        if !path.exists() {
            self.notifier.notify(WriteOutcome::Created.label(), path);
            write_replacing(path, content, default_permissions())?;
            return Ok(WriteOutcome::Created);
        }

        let existing = fs::read(path).map_err(|e| Error::file("read", path, e))?;
        if digest(&existing) == digest(content) {
            self.notifier.notify(WriteOutcome::Skipped.label(), path);
            return Ok(WriteOutcome::Skipped);
        }

        self.notifier.notify(WriteOutcome::Updated.label(), path);
        let (old_path, new_path) = backup_paths(path);
        let permissions = copy_preserving(path, &old_path)?;
        write_replacing(&new_path, content, Some(permissions))?;

        if let Some(merger) = &self.merger {
            if let Err(e) = run_merger(merger, &old_path, &new_path, path) {
                warn!("{e}");
            }
        }

        Ok(WriteOutcome::Updated)
    }
}

fn digest(content: &[u8]) -> Vec<u8> {
    Sha256::digest(content).to_vec()
}

// Writes into a sibling temporary file and renames it over `path`, so a
// failed write never leaves a truncated `path` behind.
fn write_replacing(
    path: &Path,
    content: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| Error::file("create directory", parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent)
        .map_err(|e| Error::file("create temporary file in", parent, e))?;
    file.write_all(content).map_err(|e| Error::file("write", path, e))?;
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::file("set permissions of", path, e))?;
    }
    file.as_file().sync_all().map_err(|e| Error::file("sync", path, e))?;
    file.persist(path).map_err(|e| Error::file("write", path, e.error))?;
    Ok(())
}

// Temporary files are private to the owner; generated files are not.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

// Copies the file along with its permissions and timestamps, returning the
// permissions.
fn copy_preserving(source: &Path, dest: &Path) -> Result<fs::Permissions> {
    let metadata = fs::metadata(source).map_err(|e| Error::file("inspect", source, e))?;
    fs::copy(source, dest).map_err(|e| Error::file("back up", source, e))?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    File::open(dest)
        .and_then(|file| file.set_times(times))
        .map_err(|e| Error::file("preserve timestamps of", dest, e))?;
    Ok(metadata.permissions())
}

// The merge is advisory: its exit status is not inspected.
fn run_merger(merger: &str, old_path: &Path, new_path: &Path, path: &Path) -> Result<()> {
    debug!("Running merge tool '{merger}' on '{}'.", path.display());

    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{merger} \"$@\""))
        .arg("sh")
        .arg(old_path)
        .arg(new_path)
        .arg(path)
        .status()
        .map_err(|e| Error::ExternalToolError(format!("cannot run merge tool '{merger}': {e}")))?;

    debug!("Merge tool '{merger}' exited with {status}.");
    Ok(())
}

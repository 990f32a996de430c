//! Destinations for rendered text.
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where rendered text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Overwrite this file. Its parent directory must already exist.
    File(PathBuf),
    /// Print to standard output.
    Stdout,
}

impl OutputSink {
    pub fn from_arg(output: Option<PathBuf>) -> Self {
        match output {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }

    /// Writes the full rendered text to this sink.
    ///
    /// # Errors
    /// * `Error::OutputWriteError` if the file cannot be written
    /// * `Error::IoError` if writing to stdout fails
    pub fn write(&self, rendered: &str) -> Result<()> {
        match self {
            OutputSink::File(path) => write_file(path, rendered),
            OutputSink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{rendered}")?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputSink::File(path) => write!(f, "{}", path.display()),
            OutputSink::Stdout => write!(f, "<stdout>"),
        }
    }
}

/// Replaces `path` with `content` through a temporary file in the same
/// directory, so the destination is either untouched or complete.
///
/// An existing destination keeps its permissions, and a symlink is written
/// through to its target. New files are created `0644` on unix.
fn write_file(path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| Error::OutputWriteError {
        path: path.to_path_buf(),
        source,
    };

    let (target, existing) = match fs::canonicalize(path) {
        Ok(target) => {
            let permissions = fs::metadata(&target).map_err(write_error)?.permissions();
            (target, Some(permissions))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(e) => return Err(write_error(e)),
    };

    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp_file.write_all(content.as_bytes()).map_err(write_error)?;
    match existing {
        Some(permissions) => temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(write_error)?,
        #[cfg(unix)]
        None => {
            use std::os::unix::fs::PermissionsExt;
            temp_file
                .as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(write_error)?;
        }
        #[cfg(not(unix))]
        None => {}
    }
    temp_file.as_file().sync_all().map_err(write_error)?;
    temp_file.persist(&target).map_err(|e| write_error(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), target.display());
    Ok(())
}

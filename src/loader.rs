//! Template lookup for tfrender.
//! Maps a template name directly to a file inside a single search directory.
use crate::error::{Error, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};

/// Default search root when no `--template-dir` is given.
pub const DEFAULT_TEMPLATE_DIR: &str = ".";

/// A template name that was found under its search root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    /// Logical name, as passed on the command line.
    pub name: String,
    /// Search root the name was resolved against.
    pub template_dir: PathBuf,
    /// Full path of the template file.
    pub path: PathBuf,
}

impl std::fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "template '{}' from '{}'", self.name, self.template_dir.display())
    }
}

/// Trait for locating templates by name.
pub trait TemplateLoader {
    /// Resolves a template name to exactly one template file.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if no such template exists
    fn resolve(&self, name: &str) -> Result<TemplateRef>;
}

/// Loader for templates stored flat in one directory on the local filesystem.
pub struct DirLoader<P: AsRef<Path>> {
    template_dir: P,
}

impl<P: AsRef<Path>> DirLoader<P> {
    /// Creates a new DirLoader rooted at `template_dir`.
    pub fn new(template_dir: P) -> Self {
        Self { template_dir }
    }
}

impl Default for DirLoader<PathBuf> {
    fn default() -> Self {
        DirLoader::new(PathBuf::from(DEFAULT_TEMPLATE_DIR))
    }
}

impl<P: AsRef<Path>> TemplateLoader for DirLoader<P> {
    fn resolve(&self, name: &str) -> Result<TemplateRef> {
        let template_dir = self.template_dir.as_ref();
        let not_found = || Error::TemplateNotFoundError {
            name: name.to_string(),
            template_dir: template_dir.to_path_buf(),
        };

        if !is_contained_name(name) {
            debug!("Template name '{name}' leaves the search root");
            return Err(not_found());
        }

        let path = template_dir.join(name);
        if !path.is_file() {
            return Err(not_found());
        }

        debug!("Resolved template '{}' to {}", name, path.display());
        Ok(TemplateRef {
            name: name.to_string(),
            template_dir: template_dir.to_path_buf(),
            path,
        })
    }
}

/// True when joining `name` onto a root cannot point outside of it.
fn is_contained_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

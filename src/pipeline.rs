//! Render pipeline orchestration.
//! Runs the stages in their fixed order: load sources, merge, resolve, render.
//! The caller decides where the rendered text goes.

use crate::error::Result;
use crate::loader::{DirLoader, TemplateLoader};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::variables::{merge, VariableSource, Variables};
use log::debug;
use std::path::{Path, PathBuf};

/// One render run over a single template directory.
pub struct Pipeline<L: TemplateLoader, R: TemplateRenderer> {
    loader: L,
    renderer: R,
}

impl Pipeline<DirLoader<PathBuf>, MiniJinjaRenderer> {
    /// Creates a pipeline resolving templates under `template_dir`.
    pub fn new<P: Into<PathBuf>>(template_dir: P) -> Self {
        Self::with(DirLoader::new(template_dir.into()), MiniJinjaRenderer::new())
    }
}

impl<L: TemplateLoader, R: TemplateRenderer> Pipeline<L, R> {
    pub fn with(loader: L, renderer: R) -> Self {
        Self { loader, renderer }
    }

    /// Loads the optional config file and the literal overrides, then merges
    /// them with literals taking precedence.
    ///
    /// # Errors
    /// * `Error::FormatError` for a malformed literal
    /// * `Error::ConfigReadError` for an unreadable or malformed config file
    pub fn load<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        config: Option<P>,
        literals: &[S],
    ) -> Result<Variables> {
        let mut sources: Vec<VariableSource> = Vec::with_capacity(literals.len() + 1);
        if let Some(path) = config {
            sources.push(VariableSource::File(path.as_ref().to_path_buf()));
        }
        for literal in literals {
            sources.push(VariableSource::parse_literal(literal.as_ref())?);
        }

        let mut file_vars = None;
        let mut literal_vars = Vec::new();
        for source in sources {
            debug!("Loading variables from {source}");
            match source {
                VariableSource::Literal { key, value } => literal_vars.push((key, value)),
                file => file_vars = Some(file.load()?),
            }
        }

        let variables = merge(file_vars, literal_vars);
        debug!(
            "Merged variables: {:?}",
            variables.iter().map(|(key, _)| key).collect::<Vec<_>>()
        );
        Ok(variables)
    }

    /// Resolves `template` and renders it against `variables`.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if the template does not exist
    /// * `Error::UndefinedVariableError` if it references a missing variable
    pub fn render(&self, template: &str, variables: &Variables) -> Result<String> {
        let template_ref = self.loader.resolve(template)?;
        debug!("Rendering {template_ref}");
        self.renderer.render(&template_ref, variables)
    }
}

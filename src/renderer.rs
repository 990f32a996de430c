//! Template rendering for tfrender.
//! Binds the merged variables to a template with MiniJinja and turns any
//! reference to an unbound variable into a hard error.
use crate::error::{Error, Result};
use crate::loader::TemplateRef;
use crate::variables::Variables;
use log::debug;
use minijinja::value::{Enumerator, Object, Value};
use minijinja::{path_loader, Environment, ErrorKind, UndefinedBehavior};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Globals the engine provides itself. A lookup for one of these reaches the
/// variable context first, so such misses are not missing variables.
const BUILTIN_GLOBALS: [&str; 4] = ["range", "dict", "namespace", "debug"];

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a resolved template file against the variables.
    ///
    /// # Errors
    /// * `Error::UndefinedVariableError` if the template uses a missing key
    /// * `Error::TemplateError` for any other engine failure
    /// * `Error::IoError` if the template file cannot be read
    fn render(&self, template: &TemplateRef, variables: &Variables) -> Result<String>;

    /// Renders an inline template body registered under `name`.
    fn render_str(&self, name: &str, source: &str, variables: &Variables) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with strict undefined handling and block trimming.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }

    fn render_registered(
        &self,
        mut env: Environment<'static>,
        name: &str,
        source: &str,
        variables: &Variables,
    ) -> Result<String> {
        env.add_template_owned(name.to_string(), source.to_string())?;
        let tmpl = env.get_template(name)?;

        let misses = Arc::new(Mutex::new(Vec::new()));
        let context = Value::from_object(TrackedMap::root(variables, Arc::clone(&misses)));

        let rendered = tmpl
            .render(context)
            .map_err(|err| classify_error(err, name, source, &misses))?;

        debug!("Rendered '{}' into {} bytes", name, rendered.len());
        Ok(rendered)
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// The template's search root becomes the loader, so `include`,
    /// `import` and `extends` find sibling templates.
    fn render(&self, template: &TemplateRef, variables: &Variables) -> Result<String> {
        let source = std::fs::read_to_string(&template.path)?;
        let mut env = self.env.clone();
        env.set_loader(path_loader(template.template_dir.clone()));
        self.render_registered(env, &template.name, &source, variables)
    }

    fn render_str(&self, name: &str, source: &str, variables: &Variables) -> Result<String> {
        self.render_registered(self.env.clone(), name, source, variables)
    }
}

/// Render context that remembers every name it could not provide, in
/// lookup order. Nested mappings are tracked too, recorded as dotted paths
/// such as `backend.key`.
#[derive(Debug)]
struct TrackedMap {
    path: Option<String>,
    values: BTreeMap<String, Value>,
    misses: Arc<Mutex<Vec<String>>>,
}

impl TrackedMap {
    fn root(variables: &Variables, misses: Arc<Mutex<Vec<String>>>) -> Self {
        let values = variables
            .iter()
            .map(|(key, value)| (key.to_string(), track(value, key.to_string(), &misses)))
            .collect();
        Self { path: None, values, misses }
    }

    fn qualified(&self, name: &str) -> String {
        match &self.path {
            Some(path) => format!("{path}.{name}"),
            None => name.to_string(),
        }
    }
}

impl Object for TrackedMap {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str()?;
        let found = self.values.get(name).cloned();
        let is_global = self.path.is_none() && BUILTIN_GLOBALS.contains(&name);
        if found.is_none() && !is_global {
            if let Ok(mut misses) = self.misses.lock() {
                misses.push(self.qualified(name));
            }
        }
        found
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.values.keys().map(|k| Value::from(k.as_str())).collect())
    }
}

/// Converts a variable value for the engine, wrapping every mapping in it in
/// a `TrackedMap`.
fn track(value: &serde_json::Value, path: String, misses: &Arc<Mutex<Vec<String>>>) -> Value {
    match value {
        serde_json::Value::Object(map) => {
            let values = map
                .iter()
                .map(|(key, value)| (key.clone(), track(value, format!("{path}.{key}"), misses)))
                .collect();
            Value::from_object(TrackedMap {
                path: Some(path),
                values,
                misses: Arc::clone(misses),
            })
        }
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| track(item, format!("{path}[{i}]"), misses))
            .collect::<Vec<_>>()
            .into(),
        other => Value::from_serialize(other),
    }
}

/// Turns an engine error into `UndefinedVariableError` when it was caused by
/// an unbound reference, otherwise wraps it as a `TemplateError`.
fn classify_error(
    err: minijinja::Error,
    name: &str,
    source: &str,
    misses: &Mutex<Vec<String>>,
) -> Error {
    if err.kind() != ErrorKind::UndefinedError {
        return Error::TemplateError(err);
    }

    let misses = misses.lock().map(|m| m.clone()).unwrap_or_default();

    // The span only points into `source` when the failure is in this template
    // and not in an included one.
    let expression = if err.name() == Some(name) {
        err.range()
            .and_then(|range| source.get(range))
            .map(strip_delimiters)
            .filter(|expr| !expr.is_empty())
    } else {
        None
    };

    // A miss only names the failure when it appears in the failing
    // expression. Earlier misses may come from `is defined` guards.
    let missing = match expression {
        Some(expr) => misses
            .iter()
            .find(|miss| identifiers(miss).all(|part| identifiers(expr).any(|i| i == part)))
            .cloned()
            .unwrap_or_else(|| expr.to_string()),
        None => misses.last().cloned().unwrap_or_else(|| "<unknown>".to_string()),
    };

    Error::UndefinedVariableError {
        name: missing,
        template: err.name().unwrap_or(name).to_string(),
        line: err.line(),
    }
}

/// Strips `{{ }}` / `{% %}` delimiters and whitespace from an expression span.
fn strip_delimiters(expr: &str) -> &str {
    let expr = expr.trim();
    let expr = expr
        .strip_prefix("{{")
        .or_else(|| expr.strip_prefix("{%"))
        .unwrap_or(expr);
    let expr = expr
        .strip_suffix("}}")
        .or_else(|| expr.strip_suffix("%}"))
        .unwrap_or(expr);
    expr.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '+')
}

fn identifiers(expr: &str) -> impl Iterator<Item = &str> {
    expr.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

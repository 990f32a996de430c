//! tfrender renders Jinja templates into Terraform configuration files.
//! Variables come from an optional YAML config file and `key=value`
//! overrides; any reference to a variable that was not supplied is an error.

/// Command-line interface module for the tfrender application
pub mod cli;

/// Policy checks on resource configuration (required tags)
pub mod checks;

/// Error types and handling for the tfrender application
pub mod error;

/// Template lookup inside the template directory
pub mod loader;

/// Logger configuration
pub mod logger;

/// Writing rendered text to a file or stdout
pub mod output;

/// Orchestration of the load, merge, resolve and render stages
pub mod pipeline;

/// Template rendering with strict undefined handling
pub mod renderer;

/// Variable sources and merge precedence
pub mod variables;

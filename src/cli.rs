//! Command-line interface implementation for tfrender.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::loader::DEFAULT_TEMPLATE_DIR;

/// Command-line arguments structure for tfrender.
#[derive(Parser, Debug)]
#[command(author, version, about = "tfrender: render Jinja templates for Terraform", long_about = None)]
pub struct Args {
    /// Template file name, relative to the template directory
    #[arg(short, long, value_name = "NAME")]
    pub template: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Variable in key=value format. May be repeated; later values win
    #[arg(short = 'v', long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// YAML config file with variables
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Template directory
    #[arg(short = 'd', long, value_name = "DIR", default_value = DEFAULT_TEMPLATE_DIR)]
    pub template_dir: PathBuf,

    /// Enable verbose logging output
    #[arg(long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

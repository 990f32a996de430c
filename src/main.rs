//! tfrender's main application entry point.
//! Parses arguments, sets up logging and runs the render pipeline once.

use tfrender::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    output::OutputSink,
    pipeline::Pipeline,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the config file and `--var` literals
/// 2. Merges them, literals last
/// 3. Resolves the template in the template directory
/// 4. Renders it; nothing is written if rendering fails
/// 5. Writes the result to the output file or stdout
fn run(args: Args) -> Result<()> {
    let pipeline = Pipeline::new(args.template_dir);

    let variables = pipeline.load(args.config.as_deref(), &args.vars)?;
    let rendered = pipeline.render(&args.template, &variables)?;

    let sink = OutputSink::from_arg(args.output);
    sink.write(&rendered)?;

    if let OutputSink::File(path) = &sink {
        println!("Rendered template written to: {}", path.display());
    }
    Ok(())
}

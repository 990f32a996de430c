//! Logger setup. Logs go to stderr so rendered text on stdout stays clean.

pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

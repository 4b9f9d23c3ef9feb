use std::path::Path;

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use log4rs_dynamic_filters::DynamicLevelFilter;

use crate::error::{Error, Result};

/// Logging configuration file, read from the working directory.
pub const LOG_CONFIG_PATH: &str = "log4rs.yaml";

/// Name of the dynamic filter that `--verbose` turns up.
/// `log4rs.yaml` must attach a `dynamic_level` filter with this name.
pub const DYNAMIC_FILTER: &str = "secret_santa";

const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

/// Set up logging from `path` if it exists, or to stderr otherwise.
pub fn init(path: impl AsRef<Path>, verbose: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        log4rs::init_file(path, log4rs_dynamic_filters::default_deserializers())
            .map_err(|e| Error::Logging(e.to_string()))?;
        if verbose {
            DynamicLevelFilter::set(DYNAMIC_FILTER, LevelFilter::Debug);
        }
        debug!("Logging configured from {}", path.display());
    } else {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        log4rs::init_config(fallback_config(level)?).map_err(|e| Error::Logging(e.to_string()))?;
        debug!("No {} found, logging to stderr", path.display());
    }
    Ok(())
}

/// Console-only configuration. The MongoDB driver is kept quiet regardless.
fn fallback_config(level: LevelFilter) -> Result<LogConfig> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().build("mongodb", LevelFilter::Warn))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| Error::Logging(e.to_string()))
}

use log::{error, info, LevelFilter};
use std::path::Path;

use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::types::HashAlgorithm;

/// Environment variable holding the log level filter
pub const LOG_LEVEL_ENV: &str = "FASTIMAGEHASH_LOG";

/// Initialize the file logger with timestamp, log level, and module path
///
/// The log rotates at 10MB and keeps 5 archives. The level defaults to `info` and can be
/// overridden with `FASTIMAGEHASH_LOG`.
pub fn init_logger<P: AsRef<Path>>(log_dir: P) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("fastimagehash.log");
    let archived_logs_pattern = log_dir.join("fastimagehash.{}.log");

    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);

    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern.to_string_lossy(), 5)
        .map_err(|e| format!("Failed to create log roller: {}", e))?;

    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| format!("Failed to create log appender: {}", e))?;

    let level = level_from_env();
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| format!("Failed to build log config: {}", e))?;

    log4rs::init_config(config).map_err(|e| format!("Failed to initialize log4rs: {}", e))?;

    info!("fastimagehash {} started", crate::VERSION);
    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Level filter from `FASTIMAGEHASH_LOG`, `info` when unset or unparsable
pub fn level_from_env() -> LevelFilter {
    level_from(std::env::var(LOG_LEVEL_ENV).ok())
}

/// Parse a level filter value, falling back to `info`
pub fn level_from(value: Option<String>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Log hash computation error
pub fn log_hash_error(path: &Path, algorithm: Option<HashAlgorithm>, error: &dyn std::error::Error) {
    match algorithm {
        Some(algorithm) => error!(
            "Hash computation failed - Algorithm: {}, Path: {}, Error: {}",
            algorithm,
            path.display(),
            error
        ),
        None => error!(
            "Hash computation failed - Path: {}, Error: {}",
            path.display(),
            error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_value() {
        assert_eq!(level_from(Some("debug".to_string())), LevelFilter::Debug);
        assert_eq!(level_from(Some(" TRACE ".to_string())), LevelFilter::Trace);
        assert_eq!(level_from(Some("off".to_string())), LevelFilter::Off);
        assert_eq!(level_from(Some("chatty".to_string())), LevelFilter::Info);
        assert_eq!(level_from(None), LevelFilter::Info);
    }
}

use log::LevelFilter;
use std::io::Write;

/// Installs the process logger. Calling it again only moves the level.
///
/// `GYMTRACK_LOG` takes env_logger filter directives and overrides `level`.
pub fn init_logger(level: LevelFilter) {
    let directives = std::env::var("GYMTRACK_LOG").ok();
    let logger = build_logger(level, directives.as_deref());
    let max = logger.filter();

    let _ = log::set_boxed_logger(Box::new(logger));
    log::set_max_level(max);
}

fn build_logger(level: LevelFilter, directives: Option<&str>) -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .filter_level(level);
    if let Some(directives) = directives {
        builder.parse_filters(directives);
    }
    builder.build()
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directives_can_raise_the_level() {
        let logger = build_logger(LevelFilter::Warn, Some("debug"));
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn level_applies_without_directives() {
        assert_eq!(build_logger(LevelFilter::Info, None).filter(), LevelFilter::Info);
    }

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }
}

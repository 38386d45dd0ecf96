// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parse a configured level, falling back to `default` when missing or invalid.
pub fn parse_level(log_level: Option<&str>, default: Level) -> Level {
    log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(default)
}

/// Initialize logging on stderr with optional level from config.
/// Falls back to WARN; `RUST_LOG` overrides both.
pub fn init_logging(log_level: Option<&str>) {
    let level = parse_level(log_level, Level::WARN);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("debug"), Level::WARN), Level::DEBUG);
        assert_eq!(parse_level(Some("ERROR"), Level::WARN), Level::ERROR);
        assert_eq!(parse_level(Some("loud"), Level::WARN), Level::WARN);
        assert_eq!(parse_level(None, Level::INFO), Level::INFO);
    }
}

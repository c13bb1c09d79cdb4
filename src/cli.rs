//! Command Line Interface (CLI) arguments.

use clap::Parser;

/// Volume explorer command line interface
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct CommandLineArgs {
    /// Path to the session file to inspect
    #[arg(env = "VOLUME_EXPLORER_SESSION_FILE")]
    pub session_file: String,
    /// Directory holding the JSON datasets referenced by the session's `volume_picked` metadata
    #[arg(long, env = "VOLUME_EXPLORER_DATA_DIR")]
    pub data_dir: Option<String>,
    /// Maximum number of undo steps kept per history
    #[arg(long, default_value_t = 20, env = "VOLUME_EXPLORER_MAX_HISTORY")]
    pub max_history: usize,
    /// Delay in milliseconds before frequent changes are committed to history
    #[arg(long, default_value_t = 500, env = "VOLUME_EXPLORER_DEBOUNCE_MS")]
    pub debounce_ms: u64,
    /// Lower percentile of dynamic color ranges
    #[arg(long, default_value_t = 1.0, env = "VOLUME_EXPLORER_LOW_PERCENTILE")]
    pub low_percentile: f64,
    /// Upper percentile of dynamic color ranges
    #[arg(long, default_value_t = 99.0, env = "VOLUME_EXPLORER_HIGH_PERCENTILE")]
    pub high_percentile: f64,
    /// Write the session's change log to this path
    #[arg(long, env = "VOLUME_EXPLORER_EXPORT_CHANGE_LOG")]
    pub export_change_log: Option<String>,
    /// Save the validated session to this path
    #[arg(long, env = "VOLUME_EXPLORER_RESAVE")]
    pub resave: Option<String>,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CommandLineArgs::try_parse_from(["volume-explorer", "session.json"]).unwrap();
        assert_eq!("session.json", args.session_file);
        assert_eq!(20, args.max_history);
        assert_eq!(500, args.debounce_ms);
        assert_eq!(1.0, args.low_percentile);
        assert_eq!(99.0, args.high_percentile);
        assert_eq!(None, args.data_dir);
        assert_eq!(None, args.export_change_log);
        assert_eq!(None, args.resave);
    }

    #[test]
    fn options() {
        let args = CommandLineArgs::try_parse_from([
            "volume-explorer",
            "session.json",
            "--max-history",
            "5",
            "--debounce-ms",
            "250",
            "--low-percentile",
            "2.5",
            "--export-change-log",
            "changes.json",
        ])
        .unwrap();
        assert_eq!(5, args.max_history);
        assert_eq!(250, args.debounce_ms);
        assert_eq!(2.5, args.low_percentile);
        assert_eq!(Some("changes.json".to_string()), args.export_change_log);
    }

    #[test]
    fn session_file_required() {
        assert!(CommandLineArgs::try_parse_from(["volume-explorer"]).is_err());
    }
}

//! Runtime configuration.

use crate::cli::CommandLineArgs;
use crate::debounce::DEFAULT_DEBOUNCE_DELAY;
use crate::extractor::Percentiles;
use crate::history::DEFAULT_MAX_HISTORY;

use std::time::Duration;

/// Settings shared by the views of a session
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
    /// Maximum number of snapshots kept per history
    pub max_history: usize,
    /// Delay before debounced changes are committed
    pub debounce: Duration,
    /// Percentiles used for dynamic color ranges
    pub percentiles: Percentiles,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            max_history: DEFAULT_MAX_HISTORY,
            debounce: DEFAULT_DEBOUNCE_DELAY,
            percentiles: Percentiles::default(),
        }
    }
}

impl From<&CommandLineArgs> for ExplorerConfig {
    fn from(args: &CommandLineArgs) -> Self {
        ExplorerConfig {
            max_history: args.max_history,
            debounce: Duration::from_millis(args.debounce_ms),
            percentiles: Percentiles {
                low: args.low_percentile,
                high: args.high_percentile,
                ..Default::default()
            },
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOTAL: usize = 1_000_000;
pub const DEFAULT_INPUT_FILE: &str = "input.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_SCREENSHOT_DIR: &str = "debug_screenshots";
pub const MASTER_FILE_NAME: &str = "businesses_without_websites_master.csv";

/// Timing and limit knobs for one scraping session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// How long a scroll may take to render new entries before it counts as a stall.
    pub settle_timeout: Duration,
    pub poll_interval: Duration,
    /// Upper bound on scrolls per search term.
    pub max_scrolls: usize,
    /// How long a clicked entry's detail view may take to show that entry.
    /// Entries without a label get a fixed pause of this length instead.
    pub detail_wait: Duration,
    pub search_timeout: Duration,
    pub init_attempts: usize,
    pub headless: bool,
    /// Where diagnostic screenshots go; `None` disables them.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            settle_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(250),
            max_scrolls: 20,
            detail_wait: Duration::from_secs(5),
            search_timeout: Duration::from_secs(10),
            init_attempts: 5,
            headless: true,
            screenshot_dir: Some(PathBuf::from(DEFAULT_SCREENSHOT_DIR)),
        }
    }
}

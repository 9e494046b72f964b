use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{info, warn};

use crate::browser::ResultsPage;
use crate::output::sanitize_filename;

/// Saves a screenshot of the page for later debugging. Best effort: every
/// failure is logged and swallowed. Returns the file written, if any.
pub fn capture(page: &dyn ResultsPage, dir: Option<&Path>, label: &str) -> Option<PathBuf> {
    let dir = dir?;
    let png = match page.screenshot() {
        Ok(png) => png,
        Err(e) => {
            warn!("Could not take screenshot '{}': {:#}", label, e);
            return None;
        }
    };
    if let Err(e) = fs::create_dir_all(dir) {
        warn!("Could not create screenshot directory {:?}: {}", dir, e);
        return None;
    }
    let file = dir.join(format!(
        "{}_{}.png",
        sanitize_filename(label),
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ));
    match fs::write(&file, png) {
        Ok(()) => {
            info!("Saved screenshot {:?}", file);
            Some(file)
        }
        Err(e) => {
            warn!("Could not write screenshot {:?}: {}", file, e);
            None
        }
    }
}

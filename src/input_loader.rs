use std::fs;
use std::path::Path;
use log::{info, error};

/// Search terms from a text file, one per line, in file order. Blank lines are
/// skipped. A missing or unreadable file yields no terms.
pub fn load_search_terms<P: AsRef<Path>>(filename: P) -> Vec<String> {
    let path = filename.as_ref();
    if !path.exists() {
        error!("Input file {:?} does not exist.", path);
        return Vec::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            error!("Could not read input file {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let terms = parse_search_terms(&content);
    info!("Loaded {} search terms from {:?}", terms.len(), path);
    terms
}

pub fn parse_search_terms(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

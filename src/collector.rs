use log::{debug, error, info, warn};

use crate::browser::ResultsPage;
use crate::business::BusinessRecord;
use crate::dedup::DedupSet;
use crate::diagnostics;
use crate::extractor::Extractor;
use crate::loader::{IncrementalLoader, LoadState};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectStatus {
    /// The requested number of records was collected.
    Complete,
    /// The list ran out first.
    Exhausted,
    /// The results page broke; records collected so far are kept.
    Aborted(String),
}

/// Unique records for one search term, in the order they were first rendered.
#[derive(Debug)]
pub struct RunResult {
    pub search_term: String,
    pub records: Vec<BusinessRecord>,
    pub status: CollectStatus,
    pub duplicates: usize,
}

impl RunResult {
    fn new(search_term: &str) -> Self {
        RunResult {
            search_term: search_term.to_string(),
            records: Vec::new(),
            status: CollectStatus::Complete,
            duplicates: 0,
        }
    }

    pub fn errors(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }
}

/// Searches for `search_term` and collects up to `requested_maximum` unique
/// records. Never fails: entry problems become error records and a broken
/// results page ends collection with whatever was gathered.
pub fn collect(
    page: &mut dyn ResultsPage,
    search_term: &str,
    requested_maximum: usize,
    settings: &Settings,
) -> RunResult {
    let mut run = RunResult::new(search_term);
    if requested_maximum == 0 {
        return run;
    }

    if let Err(e) = page.search(search_term) {
        error!("Search for '{}' failed: {:#}", search_term, e);
        diagnostics::capture(&*page, settings.screenshot_dir.as_deref(), &format!("search_failed_{}", search_term));
        run.status = CollectStatus::Aborted(format!("{:#}", e));
        return run;
    }

    let page: &dyn ResultsPage = page;
    let extractor = Extractor::new();
    let mut seen = DedupSet::new();
    let mut loader = IncrementalLoader::new(page, settings);
    let mut processed = 0;

    let mut last_state = None;
    run.status = loop {
        let visible = match loader.current_count() {
            Ok(visible) => visible,
            Err(e) => break abort(page, search_term, e, settings),
        };
        let before = processed;

        while processed < visible && run.records.len() < requested_maximum {
            let record = read_entry(page, &extractor, processed, settings);
            processed += 1;
            if seen.is_new(&record) {
                run.records.push(record);
            } else {
                debug!("Skipping duplicate '{}'", record.name);
                run.duplicates += 1;
            }
            if processed % 5 == 0 {
                info!(
                    "Processed {}/{} listings. Added: {}, Duplicates: {}",
                    processed, visible, run.records.len(), run.duplicates
                );
            }
        }

        if run.records.len() >= requested_maximum {
            break CollectStatus::Complete;
        }
        match last_state {
            Some(LoadState::Exhausted) => break CollectStatus::Exhausted,
            // The list claimed enough entries but none were new to us.
            Some(LoadState::Enough) if processed == before => break CollectStatus::Exhausted,
            _ => {}
        }

        match loader.ensure(processed + 1) {
            Ok(state) => last_state = Some(state),
            Err(e) => break abort(page, search_term, e, settings),
        }
    };

    info!(
        "Search '{}' done ({:?}). Added {} businesses, skipped {} duplicates, {} with errors.",
        search_term,
        run.status,
        run.records.len(),
        run.duplicates,
        run.errors()
    );
    run
}

fn abort(page: &dyn ResultsPage, search_term: &str, e: anyhow::Error, settings: &Settings) -> CollectStatus {
    error!("Results list for '{}' became unusable: {:#}", search_term, e);
    diagnostics::capture(page, settings.screenshot_dir.as_deref(), &format!("list_failed_{}", search_term));
    CollectStatus::Aborted(format!("{:#}", e))
}

fn read_entry(page: &dyn ResultsPage, extractor: &Extractor, index: usize, settings: &Settings) -> BusinessRecord {
    let label = page.entry_label(index).unwrap_or_else(|e| {
        debug!("No label for listing {}: {:#}", index, e);
        None
    });
    let mut record = match page.open_entry(index) {
        Ok(panel) => extractor.extract(panel.as_ref()),
        Err(e) => {
            warn!("Couldn't open listing {}: {:#}", index, e);
            BusinessRecord::failed(format!("Couldn't open listing: {}", e))
        }
    };
    // Every record needs a name so that faulty entries stay distinct.
    if record.name.is_empty() {
        record.name = label.unwrap_or_else(|| placeholder_name(&record, index));
    }
    if record.is_error() {
        diagnostics::capture(page, settings.screenshot_dir.as_deref(), &format!("entry_{}", index));
    }
    record
}

/// Positional name (1-based) for an entry nothing else could name.
fn placeholder_name(record: &BusinessRecord, index: usize) -> String {
    if record.is_error() {
        format!("Error Processing Business {}", index + 1)
    } else {
        format!("Unknown Business {}", index + 1)
    }
}

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::browser::ResultsPage;
use crate::collector::{self, CollectStatus};
use crate::master_list::MasterList;
use crate::output;
use crate::settings::{Settings, MASTER_FILE_NAME};

#[derive(Debug, Default)]
pub struct RunSummary {
    pub terms: usize,
    pub aborted_terms: usize,
    pub records: usize,
    pub added_to_master: usize,
    pub output_files: Vec<PathBuf>,
}

pub fn master_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MASTER_FILE_NAME)
}

/// Collects every term in order on one page, writing a CSV per term and
/// folding website-less businesses into the master list. Problems with a
/// single term are logged and the next term is processed.
pub fn run_searches(
    page: &mut dyn ResultsPage,
    terms: &[String],
    total: usize,
    output_dir: &Path,
    settings: &Settings,
) -> anyhow::Result<RunSummary> {
    let master_file = master_path(output_dir);
    let mut master = MasterList::load(&master_file)?;
    let mut summary = RunSummary::default();

    for (index, term) in terms.iter().enumerate() {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        info!("-----");
        info!("{} - {}", index, term);

        let run = collector::collect(page, term, total, settings);
        summary.terms += 1;
        summary.records += run.records.len();
        if let CollectStatus::Aborted(reason) = &run.status {
            warn!("Search '{}' stopped early: {}", term, reason);
            summary.aborted_terms += 1;
        }

        match output::write_run(output_dir, term, &run.records) {
            Ok(path) => summary.output_files.push(path),
            Err(e) => error!("Failed to write results for '{}': {:#}", term, e),
        }

        let added = master.merge(&run);
        if added > 0 {
            summary.added_to_master += added;
            if let Err(e) = master.save(&master_file) {
                error!("Failed to save master list {:?}: {:#}", master_file, e);
            }
        }
    }

    info!(
        "Finished {} search terms ({} stopped early): {} businesses, {} new without a website.",
        summary.terms, summary.aborted_terms, summary.records, summary.added_to_master
    );
    Ok(summary)
}

use std::fs::{self, File};
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::business::BusinessRecord;
use crate::collector::RunResult;
use crate::dedup::DedupSet;

/// One row of the persistent list of businesses without a website.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MasterEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub date_added: String,
}

impl MasterEntry {
    fn as_record(&self) -> BusinessRecord {
        BusinessRecord {
            name: self.name.clone(),
            address: self.address.clone(),
            website: self.website.clone(),
            phone_number: self.phone_number.clone(),
            error_message: None,
        }
    }
}

/// Businesses without a website, across every run. Entries are only appended.
#[derive(Debug, Default)]
pub struct MasterList {
    entries: Vec<MasterEntry>,
    seen: DedupSet,
}

impl MasterList {
    pub fn new() -> Self {
        MasterList::default()
    }

    /// Reads the list persisted by earlier runs. A missing file is an empty list.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut list = MasterList::new();
        if !path.exists() {
            info!("No master list at {:?}, starting a new one.", path);
            return Ok(list);
        }

        let file = File::open(path).with_context(|| format!("failed to open master list {:?}", path))?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        for result in rdr.deserialize::<MasterEntry>() {
            match result {
                Ok(entry) => {
                    let record = entry.as_record();
                    if record.has_website() {
                        warn!("Dropping '{}' from master list: it has a website", entry.name);
                        continue;
                    }
                    if list.seen.is_new(&record) {
                        list.entries.push(entry);
                    }
                }
                Err(e) => error!("Skipping malformed master list row: {}", e),
            }
        }
        if list.is_empty() {
            info!("Master list {:?} has no businesses yet.", path);
        } else {
            info!("Loaded {} businesses without websites from {:?}", list.len(), path);
        }
        Ok(list)
    }

    /// Appends every website-less record of `run` not already listed.
    /// Returns how many were added.
    pub fn merge(&mut self, run: &RunResult) -> usize {
        let date_added = Local::now().format("%Y-%m-%d").to_string();
        let mut added = 0;
        for record in &run.records {
            if record.has_website() || record.is_error() || record.name.is_empty() {
                continue;
            }
            if !self.seen.is_new(record) {
                continue;
            }
            self.entries.push(MasterEntry {
                name: record.name.clone(),
                address: record.address.clone(),
                website: None,
                phone_number: record.phone_number.clone(),
                search_term: run.search_term.clone(),
                date_added: date_added.clone(),
            });
            added += 1;
        }
        if added > 0 {
            info!("Added {} new businesses without websites to master list.", added);
        } else {
            info!("No new businesses without websites to add to master list.");
        }
        added
    }

    /// Rewrites the whole list to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {:?}", dir))?;
        }
        let mut wtr = csv::Writer::from_path(path).with_context(|| format!("failed to create {:?}", path))?;
        if self.entries.is_empty() {
            wtr.write_record(["name", "address", "website", "phone_number", "search_term", "date_added"])?;
        }
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        info!("Master list saved to {:?} ({} businesses)", path, self.len());
        Ok(())
    }

    pub fn entries(&self) -> &[MasterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

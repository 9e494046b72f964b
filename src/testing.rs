//! In-memory stand-in for a browser results page, used by unit tests.

use std::cell::{Cell, RefCell};

use crate::browser::ResultsPage;
use crate::extractor::{DetailPanel, Field, PanelSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// Clicking the entry fails.
    Open,
    /// The detail view opens but breaks while being read.
    Read,
    /// The entry drops out of the list: no label, and clicking fails.
    Detached,
}

#[derive(Debug, Clone)]
pub struct FakeEntry {
    pub name: String,
    pub address: String,
    pub website: Option<String>,
    pub fault: Fault,
}

impl FakeEntry {
    pub fn new(name: &str, address: &str) -> Self {
        FakeEntry {
            name: name.to_string(),
            address: address.to_string(),
            website: None,
            fault: Fault::None,
        }
    }

    pub fn website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    pub fn fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }

    fn html(&self) -> String {
        let website = self
            .website
            .as_ref()
            .map(|w| format!(r#"<a data-item-id="authority"><div class="fontBodyMedium">{}</div></a>"#, w))
            .unwrap_or_default();
        format!(
            r#"<html><body><h1 class="DUwDvf">{}</h1>
               <button data-item-id="address"><div class="fontBodyMedium">{}</div></button>{}
               </body></html>"#,
            self.name, self.address, website
        )
    }
}

struct BrokenPanel;

impl DetailPanel for BrokenPanel {
    fn field_text(&self, field: Field) -> anyhow::Result<Option<String>> {
        anyhow::bail!("detail view closed while reading {:?}", field)
    }
}

/// Results list that reveals `batch` more entries per scroll, each scroll
/// becoming visible only after `lag` further count polls.
pub struct ScriptedPage {
    pub entries: Vec<FakeEntry>,
    pub batch: usize,
    pub lag: usize,
    pub search_fails: bool,
    /// `load_more` starts failing once this many scrolls have happened.
    pub feed_breaks_after: Option<usize>,
    pub screenshot_fails: bool,
    visible: Cell<usize>,
    pending: Cell<usize>,
    lag_left: Cell<usize>,
    pub scrolls: Cell<usize>,
    pub screenshots: Cell<usize>,
    pub opened: RefCell<Vec<usize>>,
    pub searched: RefCell<Vec<String>>,
}

impl ScriptedPage {
    pub const SCREENSHOT: &'static [u8] = b"\x89PNG fake";

    pub fn new(entries: Vec<FakeEntry>, batch: usize) -> Self {
        ScriptedPage {
            entries,
            batch,
            lag: 0,
            search_fails: false,
            feed_breaks_after: None,
            screenshot_fails: false,
            visible: Cell::new(0),
            pending: Cell::new(0),
            lag_left: Cell::new(0),
            scrolls: Cell::new(0),
            screenshots: Cell::new(0),
            opened: RefCell::new(Vec::new()),
            searched: RefCell::new(Vec::new()),
        }
    }

    pub fn with_names(names: &[&str]) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| FakeEntry::new(name, &format!("{} Main St", i + 1)))
            .collect();
        ScriptedPage::new(entries, names.len().max(1))
    }
}

impl ResultsPage for ScriptedPage {
    fn search(&mut self, term: &str) -> anyhow::Result<()> {
        self.searched.borrow_mut().push(term.to_string());
        if self.search_fails {
            anyhow::bail!("results page unreachable");
        }
        let first = self.batch.min(self.entries.len());
        self.visible.set(first);
        self.pending.set(first);
        self.lag_left.set(0);
        Ok(())
    }

    fn entry_count(&self) -> anyhow::Result<usize> {
        if self.lag_left.get() > 0 {
            self.lag_left.set(self.lag_left.get() - 1);
        } else {
            self.visible.set(self.pending.get());
        }
        Ok(self.visible.get())
    }

    fn load_more(&self) -> anyhow::Result<()> {
        if let Some(limit) = self.feed_breaks_after {
            if self.scrolls.get() >= limit {
                anyhow::bail!("results page went away");
            }
        }
        self.scrolls.set(self.scrolls.get() + 1);
        self.pending.set((self.pending.get() + self.batch).min(self.entries.len()));
        self.lag_left.set(self.lag);
        Ok(())
    }

    fn entry_label(&self, index: usize) -> anyhow::Result<Option<String>> {
        if index >= self.visible.get() {
            anyhow::bail!("entry {} is not rendered", index);
        }
        let entry = &self.entries[index];
        if entry.fault == Fault::Detached {
            anyhow::bail!("entry {} detached from the list", index);
        }
        Ok(Some(entry.name.clone()).filter(|n| !n.is_empty()))
    }

    fn open_entry(&self, index: usize) -> anyhow::Result<Box<dyn DetailPanel>> {
        self.opened.borrow_mut().push(index);
        if index >= self.visible.get() {
            anyhow::bail!("entry {} is not rendered", index);
        }
        let entry = &self.entries[index];
        match entry.fault {
            Fault::Open => anyhow::bail!("could not click entry {}", index),
            Fault::Detached => anyhow::bail!("entry {} detached from the list", index),
            Fault::Read => Ok(Box::new(BrokenPanel)),
            Fault::None => Ok(Box::new(PanelSnapshot::parse(&entry.html(), Some(entry.name.clone())))),
        }
    }

    fn screenshot(&self) -> anyhow::Result<Vec<u8>> {
        if self.screenshot_fails {
            anyhow::bail!("renderer crashed");
        }
        self.screenshots.set(self.screenshots.get() + 1);
        Ok(Self::SCREENSHOT.to_vec())
    }
}

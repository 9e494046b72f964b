use log::{debug, info};

use crate::browser::ResultsPage;
use crate::delay_manager;
use crate::settings::Settings;

/// Consecutive non-growing scrolls after which the list counts as exhausted.
/// One stall is tolerated because rendering can lag behind the scroll.
const STALL_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Enough,
    Exhausted,
}

/// Scrolls a results list to reveal more entries.
pub struct IncrementalLoader<'a> {
    page: &'a dyn ResultsPage,
    settings: &'a Settings,
    last_seen: usize,
    stalls: usize,
    scrolls: usize,
}

impl<'a> IncrementalLoader<'a> {
    pub fn new(page: &'a dyn ResultsPage, settings: &'a Settings) -> Self {
        IncrementalLoader {
            page,
            settings,
            last_seen: 0,
            stalls: 0,
            scrolls: 0,
        }
    }

    pub fn current_count(&self) -> anyhow::Result<usize> {
        self.page.entry_count()
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    /// One scroll. True if more entries are visible than before it, waiting up
    /// to the settle timeout for them to render.
    pub fn advance(&mut self) -> anyhow::Result<bool> {
        let before = self.current_count()?;
        self.page.load_more()?;
        self.scrolls += 1;

        let page = self.page;
        let mut after = before;
        let grew = delay_manager::wait_until(
            self.settings.settle_timeout,
            self.settings.poll_interval,
            || {
                after = page.entry_count()?;
                Ok(after > before)
            },
        )?;
        self.last_seen = after;
        info!("Currently found: {} listings (scroll {})", after, self.scrolls);
        Ok(grew)
    }

    /// Scrolls until at least `target` entries are visible or the list stops growing.
    pub fn ensure(&mut self, target: usize) -> anyhow::Result<LoadState> {
        loop {
            let count = self.current_count()?;
            if count > self.last_seen {
                // Entries that rendered late still count as progress.
                self.stalls = 0;
            }
            self.last_seen = count;

            if count >= target {
                return Ok(LoadState::Enough);
            }
            if self.stalls >= STALL_LIMIT {
                info!("No new listings after {} scrolls, stopping at {}", STALL_LIMIT, count);
                return Ok(LoadState::Exhausted);
            }
            if self.scrolls >= self.settings.max_scrolls {
                info!("Scroll limit of {} reached, stopping at {}", self.settings.max_scrolls, count);
                return Ok(LoadState::Exhausted);
            }

            if self.advance()? {
                self.stalls = 0;
            } else {
                self.stalls += 1;
                debug!("Scroll {} revealed nothing new ({} in a row)", self.scrolls, self.stalls);
            }
        }
    }
}

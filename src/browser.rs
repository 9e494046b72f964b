use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info, warn};

use crate::delay_manager;
use crate::diagnostics;
use crate::extractor::{clean_text, DetailPanel, PanelSnapshot};
use crate::settings::Settings;

const MAPS_HOME: &str = "https://www.google.com/maps";
const MAPS_SEARCH: &str = "https://www.google.com/maps/search/";
const SEARCH_BOX: &str = "#searchboxinput";
const LISTING: &str = r#"a[href*="/maps/place"]"#;
const FEED: &str = r#"div[role="feed"]"#;
const DETAIL_HEADING: &str = "h1.DUwDvf";

/// What the collection pipeline needs from a browser showing a results list.
pub trait ResultsPage {
    /// Shows the results list for `term`. A list with zero entries is not an error.
    fn search(&mut self, term: &str) -> anyhow::Result<()>;

    fn entry_count(&self) -> anyhow::Result<usize>;

    /// One load-more action (a scroll of the results feed).
    fn load_more(&self) -> anyhow::Result<()>;

    /// The name entry `index` carries in the results list, if it shows one.
    fn entry_label(&self, index: usize) -> anyhow::Result<Option<String>>;

    /// Opens entry `index` (rendered order) and returns its detail view.
    fn open_entry(&self, index: usize) -> anyhow::Result<Box<dyn DetailPanel>>;

    /// PNG of the current viewport.
    fn screenshot(&self) -> anyhow::Result<Vec<u8>>;
}

/// A headless Chrome window on the maps site. The browser process lives as long
/// as this value and is shut down when it is dropped.
pub struct ChromeSession {
    // Field order matters: the tab is released before the browser.
    tab: Arc<Tab>,
    _browser: Browser,
    settings: Settings,
}

impl ChromeSession {
    /// Starts the browser and waits for the maps search box. Any failure here
    /// leaves no usable session.
    pub fn launch(settings: &Settings) -> anyhow::Result<Self> {
        info!("Launching browser (headless: {})...", settings.headless);
        let options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .window_size(Some((1920, 1080)))
            .build()
            .map_err(|e| anyhow!("invalid browser launch options: {}", e))?;
        let browser = Browser::new(options).context("failed to start browser")?;
        let tab = browser.new_tab().context("failed to open browser tab")?;
        tab.set_default_timeout(settings.search_timeout.max(Duration::from_secs(30)));

        let session = ChromeSession {
            tab,
            _browser: browser,
            settings: settings.clone(),
        };
        session.open_maps()?;
        Ok(session)
    }

    fn open_maps(&self) -> anyhow::Result<()> {
        let attempts = self.settings.init_attempts.max(1);
        for attempt in 1..=attempts {
            info!("Attempt {}/{} to load maps...", attempt, attempts);
            match self.try_open_maps() {
                Ok(()) => {
                    info!("Maps loaded, search box is visible.");
                    return Ok(());
                }
                Err(e) => {
                    warn!("Maps not ready on attempt {}: {:#}", attempt, e);
                    diagnostics::capture(self, self.settings.screenshot_dir.as_deref(), &format!("maps_failed_{}", attempt));
                }
            }
        }
        Err(anyhow!("maps search box never appeared after {} attempts", attempts))
    }

    fn try_open_maps(&self) -> anyhow::Result<()> {
        self.tab.navigate_to(MAPS_HOME)?.wait_until_navigated()?;
        self.tab
            .wait_for_element_with_custom_timeout(SEARCH_BOX, self.settings.search_timeout)
            .context("search box not found")?;
        Ok(())
    }

    fn eval(&self, script: &str) -> anyhow::Result<serde_json::Value> {
        let result = self.tab.evaluate(script, false)?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn detail_heading(&self) -> anyhow::Result<String> {
        let script = format!(
            "(() => {{ const h = document.querySelector('{}'); return h ? h.textContent : ''; }})()",
            DETAIL_HEADING
        );
        Ok(self.eval(&script)?.as_str().unwrap_or_default().to_string())
    }

    /// Polls until the detail view shows `label` as its heading. The previous
    /// entry's view stays on screen until the click takes effect.
    fn wait_for_detail(&self, label: &str) -> anyhow::Result<()> {
        let shown = delay_manager::wait_until(self.settings.detail_wait, self.settings.poll_interval, || {
            Ok(heading_matches(&self.detail_heading()?, label))
        })?;
        if !shown {
            anyhow::bail!("detail view for {:?} did not open within {:?}", label, self.settings.detail_wait);
        }
        Ok(())
    }
}

/// Whether a detail-view heading names the listing labelled `label`.
fn heading_matches(heading: &str, label: &str) -> bool {
    let heading = clean_text(heading);
    !heading.is_empty() && heading == clean_text(label)
}

impl ResultsPage for ChromeSession {
    fn search(&mut self, term: &str) -> anyhow::Result<()> {
        let url = format!("{}{}", MAPS_SEARCH, urlencoding::encode(term));
        info!("Searching: {}", url);
        self.tab
            .navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .with_context(|| format!("navigation to results for {:?} failed", term))?;

        let rendered = delay_manager::wait_until(
            self.settings.search_timeout,
            self.settings.poll_interval,
            || Ok(self.entry_count()? > 0),
        )?;
        if !rendered {
            warn!("No listings rendered for {:?} within {:?}", term, self.settings.search_timeout);
        }
        Ok(())
    }

    fn entry_count(&self) -> anyhow::Result<usize> {
        let script = format!("document.querySelectorAll('{}').length", LISTING);
        let value = self.eval(&script)?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| anyhow!("unexpected listing count {}", value))
    }

    fn load_more(&self) -> anyhow::Result<()> {
        let script = format!(
            "(() => {{ const feed = document.querySelector('{}'); \
             if (!feed) {{ return false; }} \
             feed.scrollBy(0, 10000); return true; }})()",
            FEED
        );
        // No feed happens on empty result lists; nothing to scroll is not a fault.
        if self.eval(&script)?.as_bool() != Some(true) {
            debug!("No results feed to scroll");
        }
        Ok(())
    }

    fn entry_label(&self, index: usize) -> anyhow::Result<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelectorAll('{}')[{}]; \
             return el ? (el.getAttribute('aria-label') || '') : null; }})()",
            LISTING, index
        );
        match self.eval(&script)? {
            serde_json::Value::String(label) => Ok(Some(clean_text(&label)).filter(|l| !l.is_empty())),
            _ => anyhow::bail!("listing {} is not rendered", index),
        }
    }

    fn open_entry(&self, index: usize) -> anyhow::Result<Box<dyn DetailPanel>> {
        let script = format!(
            "(() => {{ const el = document.querySelectorAll('{}')[{}]; \
             if (!el) {{ return null; }} \
             el.scrollIntoView(); el.click(); \
             return el.getAttribute('aria-label') || ''; }})()",
            LISTING, index
        );
        let label = match self.eval(&script)? {
            serde_json::Value::String(label) => label,
            other => anyhow::bail!("listing {} could not be clicked (got {})", index, other),
        };
        if label.trim().is_empty() {
            // Nothing to recognise the view by.
            delay_manager::pause(self.settings.detail_wait, "detail view");
        } else {
            self.wait_for_detail(&label)?;
        }
        let html = self.tab.get_content().context("failed to read detail view")?;
        Ok(Box::new(PanelSnapshot::parse(&html, Some(label))))
    }

    fn screenshot(&self) -> anyhow::Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_must_name_the_clicked_listing() {
        assert!(heading_matches("Joe's Pizza", "Joe's Pizza"));
        assert!(heading_matches(" Joe's\u{a0}Pizza \n", "Joe's Pizza"));
        assert!(!heading_matches("Previous Bakery", "Joe's Pizza"));
        assert!(!heading_matches("joe's pizza", "Joe's Pizza"));
    }

    #[test]
    fn blank_heading_never_matches() {
        assert!(!heading_matches("", ""));
        assert!(!heading_matches("   ", "Joe's Pizza"));
    }
}

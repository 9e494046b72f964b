use log::{debug, warn};
use scraper::{Html, Selector};

use crate::business::{normalize_website, BusinessRecord};

const NAME_HEADING: &str = "h1.DUwDvf";
const ANY_HEADING: &str = "h1";
const ADDRESS: &str = r#"button[data-item-id="address"] .fontBodyMedium"#;
const WEBSITE: &str = r#"a[data-item-id="authority"] .fontBodyMedium"#;
const PHONE: &str = r#"button[data-item-id^="phone:tel:"] .fontBodyMedium"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    Website,
    Phone,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Address, Field::Website, Field::Phone];
}

/// An opened detail view that fields can be read from.
///
/// `Ok(None)` means the field is not shown for this business. `Err` means the
/// view itself could not be read (closed, navigated away, ...).
pub trait DetailPanel {
    fn field_text(&self, field: Field) -> anyhow::Result<Option<String>>;
}

/// Rendered HTML of a page with an entry's detail view open, together with the
/// label the entry carried in the results list.
pub struct PanelSnapshot {
    label: Option<String>,
    document: Html,
}

impl PanelSnapshot {
    pub fn parse(html: &str, label: Option<String>) -> Self {
        PanelSnapshot {
            label: label.map(|l| clean_text(&l)).filter(|l| !l.is_empty()),
            document: Html::parse_document(html),
        }
    }

    fn first_text(&self, css: &str) -> anyhow::Result<Option<String>> {
        let selector = Selector::parse(css)
            .map_err(|e| anyhow::anyhow!("invalid selector {:?}: {}", css, e))?;
        Ok(self
            .document
            .select(&selector)
            .map(|el| clean_text(&el.text().collect::<String>()))
            .find(|text| !text.is_empty()))
    }
}

impl DetailPanel for PanelSnapshot {
    fn field_text(&self, field: Field) -> anyhow::Result<Option<String>> {
        match field {
            Field::Name => {
                if let Some(label) = &self.label {
                    return Ok(Some(label.clone()));
                }
                match self.first_text(NAME_HEADING)? {
                    Some(name) => Ok(Some(name)),
                    None => self.first_text(ANY_HEADING),
                }
            }
            Field::Address => self.first_text(ADDRESS),
            Field::Website => self.first_text(WEBSITE),
            Field::Phone => self.first_text(PHONE),
        }
    }
}

pub(crate) fn clean_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}

/// Turns a detail view into a `BusinessRecord`. Never fails: a broken view
/// yields a record with `error_message` set.
#[derive(Debug, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Extractor
    }

    pub fn extract(&self, panel: &dyn DetailPanel) -> BusinessRecord {
        match self.read_fields(panel) {
            Ok(record) => record,
            Err(e) => {
                warn!("Error processing listing: {:#}", e);
                BusinessRecord::failed(format!("Error processing listing: {}", e))
            }
        }
    }

    fn read_fields(&self, panel: &dyn DetailPanel) -> anyhow::Result<BusinessRecord> {
        let mut record = BusinessRecord::default();
        for field in Field::ALL {
            let value = panel
                .field_text(field)?
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                debug!("{:?} not shown for this listing", field);
            }
            match field {
                Field::Name => record.name = value.unwrap_or_default(),
                Field::Address => record.address = value,
                Field::Website => record.website = value.as_deref().and_then(normalize_website),
                Field::Phone => record.phone_number = value,
            }
        }
        Ok(record)
    }
}

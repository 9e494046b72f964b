pub mod business;
pub mod dedup;
pub mod extractor;
pub mod loader;
pub mod collector;
pub mod master_list;
pub mod browser;
pub mod output;
pub mod input_loader;
pub mod diagnostics;
pub mod delay_manager;
pub mod settings;
pub mod logger;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

// Exporting types for convenience
pub use business::BusinessRecord;
pub use browser::{ChromeSession, ResultsPage};
pub use collector::{collect, CollectStatus, RunResult};
pub use dedup::DedupSet;
pub use extractor::Extractor;
pub use master_list::MasterList;
pub use settings::Settings;

use log::LevelFilter;
use env_logger::Builder;
use std::io::Write;
use chrono::Local;

/// Timestamped console logging for the scraper. `RUST_LOG` overrides the level.
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.module_path().unwrap_or("scraper"),
                record.args()
            )
        })
        .filter(None, level)
        // The browser crate is chatty about every devtools message.
        .filter_module("headless_chrome", LevelFilter::Warn)
        .parse_default_env()
        .init();
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{DateTime, Local};
use log::{info, warn};
use regex::Regex;

use crate::business::BusinessRecord;

const HEADERS: [&str; 5] = ["name", "address", "website", "phone_number", "error_message"];

static INVALID_FILENAME_CHARS: OnceLock<Regex> = OnceLock::new();

/// Replaces characters that are not allowed in file names.
pub fn sanitize_filename(name: &str) -> String {
    let invalid = INVALID_FILENAME_CHARS
        .get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid filename pattern"));
    invalid.replace_all(name, "_").trim().to_string()
}

pub fn run_file_name(search_term: &str, at: DateTime<Local>) -> String {
    format!(
        "google_maps_data_{}_{}.csv",
        sanitize_filename(search_term),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// `dir/name`, or `dir/stem_2.csv`, `dir/stem_3.csv`, ... when that is taken.
fn unused_path(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if !path.exists() {
        return path;
    }
    let stem = name.trim_end_matches(".csv");
    (2..)
        .map(|n| dir.join(format!("{}_{}.csv", stem, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Writes one search term's records to a new timestamped CSV in `dir`.
/// An existing file is never overwritten. An empty run still produces a file
/// with just the header.
pub fn write_run(dir: &Path, search_term: &str, records: &[BusinessRecord]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create output directory {:?}", dir))?;
    let path = unused_path(dir, &run_file_name(search_term, Local::now()));

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("failed to create {:?}", path))?;
    wtr.write_record(HEADERS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    if records.is_empty() {
        warn!("No businesses found. Empty CSV created at {:?}", path);
    } else {
        info!("Data saved to {:?} with {} records.", path, records.len());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitizes_reserved_characters() {
        assert_eq!(sanitize_filename(r#" cafes in a/b: "best"? "#), "cafes in a_b_ _best__");
        assert_eq!(sanitize_filename(r"x\y|z*<w>"), "x_y_z__w_");
        assert_eq!(sanitize_filename("plain"), "plain");
    }

    #[test]
    fn file_name_carries_term_and_second() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        assert_eq!(run_file_name("dentists/NYC", at), "google_maps_data_dentists_NYC_2024-03-09_14-05-59.csv");
    }

    #[test]
    fn same_term_twice_keeps_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let alpha = BusinessRecord {
            name: "Alpha".to_string(),
            ..Default::default()
        };
        let beta = BusinessRecord {
            name: "Beta".to_string(),
            ..Default::default()
        };
        let first = write_run(tmp.path(), "a/b", &[alpha]).unwrap();
        let second = write_run(tmp.path(), "a:b", &[beta]).unwrap();
        assert_ne!(first, second);
        assert!(fs::read_to_string(&first).unwrap().contains("Alpha"));
        assert!(fs::read_to_string(&second).unwrap().contains("Beta"));
    }

    #[test]
    fn taken_names_get_a_counter() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("run.csv"), "").unwrap();
        fs::write(tmp.path().join("run_2.csv"), "").unwrap();
        assert_eq!(unused_path(tmp.path(), "run.csv"), tmp.path().join("run_3.csv"));
        assert_eq!(unused_path(tmp.path(), "other.csv"), tmp.path().join("other.csv"));
    }

    #[test]
    fn writes_records_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![
            BusinessRecord {
                name: "Alpha, Inc".to_string(),
                address: Some("1 Road".to_string()),
                website: Some("https://alpha.example".to_string()),
                phone_number: None,
                error_message: None,
            },
            BusinessRecord::failed("Couldn't open listing: gone"),
        ];
        let path = write_run(&tmp.path().join("out"), "alpha", &records).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "name,address,website,phone_number,error_message");
        assert_eq!(lines[1], "\"Alpha, Inc\",1 Road,https://alpha.example,,");
        assert_eq!(lines[2], ",,,,Couldn't open listing: gone");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_run_writes_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_run(tmp.path(), "nothing", &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,address,website,phone_number,error_message\n");
    }
}

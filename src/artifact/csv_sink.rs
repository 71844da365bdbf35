//! CSV artifact writer.
//!
//! One harvest produces one CSV file named after the domain, the URL
//! count, and the local wall clock, with one page URL per record.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Build the artifact filename for `count` URLs harvested at `at`.
///
/// Shape: `{domain}_{count}_Urls_{YYYY}_{MM}_{MonthName}_{HH}_{MM}_{AM|PM}.csv`
/// with a zero-padded 24-hour clock value next to the AM/PM marker.
pub fn artifact_name(domain_hint: &str, count: usize, at: DateTime<Local>) -> String {
    format!(
        "{domain_hint}_{count}_Urls_{}.csv",
        at.format("%Y_%m_%B_%H_%M_%p")
    )
}

/// Write every URL to a timestamped CSV in `out_dir`, one record per URL.
///
/// Returns the path written. Quoting is the CSV writer's problem, so URLs
/// carrying commas, quotes, or unicode read back exactly as collected.
pub fn save_urls(urls: &[String], domain_hint: &str, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    let path = out_dir.join(artifact_name(domain_hint, urls.len(), Local::now()));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for url in urls {
        writer
            .write_record([url.as_str()])
            .with_context(|| format!("failed to write record to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_name_format() {
        let at = Local.with_ymd_and_hms(2026, 8, 5, 14, 7, 0).unwrap();
        assert_eq!(
            artifact_name("example.com", 42, at),
            "example.com_42_Urls_2026_08_August_14_07_PM.csv"
        );

        let morning = Local.with_ymd_and_hms(2026, 1, 30, 9, 3, 0).unwrap();
        assert_eq!(
            artifact_name("blog.example.org", 7, morning),
            "blog.example.org_7_Urls_2026_01_January_09_03_AM.csv"
        );
    }

    #[test]
    fn test_save_urls_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let urls = vec![
            "https://example.com/a?q=1&r=2".to_string(),
            "https://example.com/b#fragment".to_string(),
            "https://example.com/c,with,commas".to_string(),
            "https://example.com/d\"quoted\"".to_string(),
            "https://\u{4f8b}\u{3048}.jp/\u{30da}\u{30fc}\u{30b8}".to_string(),
        ];

        let path = save_urls(&urls, "example.com", dir.path()).unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("example.com_5_Urls_"));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let read: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(read, urls);
    }

    #[test]
    fn test_save_urls_creates_missing_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let urls = vec!["https://example.com/".to_string()];

        let path = save_urls(&urls, "example.com", &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}

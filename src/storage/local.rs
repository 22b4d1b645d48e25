//! Flat-file cache of resolved years.
//!
//! The whole file is read on every load. New years are appended; patching an
//! existing year rewrites the file through a temporary sibling and a rename.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::YearRecord;
use crate::storage::block;

/// Year cache backed by a local file, or a no-op store when disabled.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: Option<PathBuf>,
}

impl CacheStore {
    /// A store that keeps nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Open a file-backed store, creating the file if needed.
    ///
    /// Fails if the path is a directory or the file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        check_writable(&path)?;
        Ok(Self { path: Some(path) })
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Read every cached year. I/O failures yield an empty map.
    pub async fn load(&self) -> BTreeMap<i32, YearRecord> {
        let Some(path) = &self.path else {
            return BTreeMap::new();
        };
        match tokio::fs::read_to_string(path).await {
            Ok(content) => block::decode(&content)
                .into_iter()
                .map(|r| (r.year, r))
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No cache file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Failed to read cache {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    /// Add a block for a year seen for the first time.
    pub async fn append(&self, record: &YearRecord) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(block::encode(record).as_bytes()).await?;
        file.flush().await?;
        log::debug!("Cached year {} in {}", record.year, path.display());
        Ok(())
    }

    /// Replace the block for `record.year`, moving it to the end of the file.
    ///
    /// Blocks of other years are copied through as-is, malformed ones
    /// included.
    pub async fn rewrite(&self, record: &YearRecord) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let existing = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut content = String::with_capacity(existing.len());
        for raw in block::raw_blocks(&existing) {
            if block::block_year(raw) == Some(record.year) {
                continue;
            }
            content.push_str(raw);
            if !raw.ends_with('\n') {
                content.push('\n');
            }
        }
        content.push_str(&block::encode(record));

        write_replacing(path, content.as_bytes()).await?;
        log::debug!("Rewrote year {} in {}", record.year, path.display());
        Ok(())
    }
}

/// Confirm the cache path can be created and written, then release it.
fn check_writable(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(AppError::config(format!(
            "cache path {} is a directory",
            path.display()
        )));
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            AppError::config(format!("cannot create cache {}: {}", path.display(), e))
        })?;
    Ok(())
}

/// Write bytes to a temporary sibling, then rename it over `path`.
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(year: i32, holidays: &[(u32, u32)], workdays: &[(u32, u32)]) -> YearRecord {
        YearRecord {
            year,
            holidays: holidays.iter().map(|&(m, d)| ymd(year, m, d)).collect(),
            workdays: workdays.iter().map(|&(m, d)| ymd(year, m, d)).collect(),
        }
    }

    #[test]
    fn test_open_creates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("holiday-data");

        let store = CacheStore::open(&path).unwrap();
        assert!(store.is_enabled());
        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_directory() {
        let tmp = TempDir::new().unwrap();
        let err = CacheStore::open(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_open_rejects_missing_parent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("holiday-data");
        assert!(CacheStore::open(path).is_err());
    }

    #[tokio::test]
    async fn test_disabled_store_is_noop() {
        let store = CacheStore::disabled();
        let r = record(2024, &[(1, 1)], &[]);

        store.append(&r).await.unwrap();
        store.rewrite(&r).await.unwrap();
        assert!(store.load().await.is_empty());
        assert!(!store.is_enabled());
    }

    #[tokio::test]
    async fn test_append_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path().join("cache")).unwrap();

        let r2023 = record(2023, &[(1, 1), (1, 2)], &[(1, 28)]);
        let r2024 = record(2024, &[(1, 1)], &[]);
        store.append(&r2023).await.unwrap();
        store.append(&r2024).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&2023], r2023);
        assert_eq!(loaded[&2024], r2024);
    }

    #[tokio::test]
    async fn test_rewrite_replaces_one_year() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache");
        let store = CacheStore::open(&path).unwrap();

        let r2023 = record(2023, &[(1, 1)], &[(10, 7)]);
        let r2024 = record(2024, &[(1, 1)], &[(2, 4)]);
        store.append(&r2023).await.unwrap();
        store.append(&r2024).await.unwrap();

        let mut patched = r2023.clone();
        patched.merge_workdays(&[ymd(2023, 12, 31)]);
        store.rewrite(&patched).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "2024\n2024-01-01\n2024-02-04\n---------------\n\
             2023\n2023-01-01\n2023-10-07,2023-12-31\n---------------\n"
        );

        let loaded = store.load().await;
        assert_eq!(loaded[&2023], patched);
        assert_eq!(loaded[&2024], r2024);
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_rewrite_keeps_malformed_blocks_of_other_years() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache");
        let bad = "2022\n2022-13-45\n\n---------------\n";
        std::fs::write(
            &path,
            format!("{bad}2023\n2023-01-01\n\n---------------\n"),
        )
        .unwrap();
        let store = CacheStore::open(&path).unwrap();

        let patched = record(2023, &[(1, 1)], &[(12, 31)]);
        store.rewrite(&patched).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("{bad}2023\n2023-01-01\n2023-12-31\n---------------\n")
        );

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&2023], patched);
    }

    #[tokio::test]
    async fn test_rewrite_adds_missing_year() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path().join("cache")).unwrap();

        let r = record(2022, &[(1, 1)], &[]);
        store.rewrite(&r).await.unwrap();
        assert_eq!(store.load().await[&2022], r);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache");
        let store = CacheStore::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(store.load().await.is_empty());
    }
}

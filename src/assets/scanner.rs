//! Asset directory scanner
//!
//! Lists the base names of image files directly inside the assets directory.
//! The listing is sorted so candidate order does not depend on the
//! filesystem. Results may be cached for a configurable TTL; with a TTL of
//! zero every scan reads the directory again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use globset::{GlobBuilder, GlobMatcher};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::logger;

/// Build a case-insensitive glob matching `*.{ext1,ext2,...}`
///
/// # Examples
/// ```
/// use picfind::assets::build_pattern;
///
/// let glob = build_pattern(&["png".to_string(), "svg".to_string()]).unwrap();
/// assert!(glob.is_match("logo.PNG"));
/// assert!(!glob.is_match("notes.txt"));
/// ```
pub fn build_pattern(extensions: &[String]) -> Result<GlobMatcher> {
    let extensions: Vec<&str> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .collect();

    let pattern = match extensions.as_slice() {
        [] => {
            return Err(Error::InvalidConfig(
                "at least one asset extension is required".to_string(),
            ))
        }
        [single] => format!("*.{single}"),
        many => format!("*.{{{}}}", many.join(",")),
    };

    let glob = GlobBuilder::new(&pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

struct CachedScan {
    scanned_at: Instant,
    files: Arc<Vec<String>>,
}

/// Scanner for one assets directory
pub struct AssetScanner {
    dir: PathBuf,
    pattern: GlobMatcher,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedScan>>,
}

impl AssetScanner {
    pub fn new(dir: impl Into<PathBuf>, pattern: GlobMatcher, cache_ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            pattern,
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a file name returned by [`scan`](Self::scan)
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// List matching file names, using the cache when it is still fresh
    ///
    /// Names come back sorted lexicographically, not in directory order.
    /// This order is the candidate order the matcher's tie-breaks use.
    pub async fn scan(&self) -> Result<Arc<Vec<String>>> {
        if !self.cache_ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.scanned_at.elapsed() < self.cache_ttl {
                    return Ok(Arc::clone(&cached.files));
                }
            }
        }

        let files = Arc::new(self.read_dir().await?);

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedScan {
                scanned_at: Instant::now(),
                files: Arc::clone(&files),
            });
        }

        Ok(files)
    }

    /// Drop any cached listing so the next scan reads the directory
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    async fn read_dir(&self) -> Result<Vec<String>> {
        let map_err = |source| Error::AssetDir {
            path: self.dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.dir).await.map_err(map_err)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(map_err)? {
            let Ok(name) = entry.file_name().into_string() else {
                logger::log_warning(&format!(
                    "Skipping asset with non UTF-8 name in '{}'",
                    self.dir.display()
                ));
                continue;
            };

            // Hidden files are never candidates
            if name.starts_with('.') || !self.pattern.is_match(&name) {
                continue;
            }

            // metadata() follows symlinks
            match fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => files.push(name),
                Ok(_) => {}
                Err(e) => {
                    logger::log_warning(&format!("Skipping unreadable asset '{name}': {e}"));
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

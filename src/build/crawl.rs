// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Directory crawl: feeds plain-text files into an [`IndexerSession`].
//!
//! Directories are walked depth first with entries in name order, so document
//! ids are stable across runs over the same tree. Symbolic links are not
//! followed. A file that cannot be read is logged and skipped; the crawl goes on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::IndexerSession;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// File extensions to index, without the dot; compared case-insensitively
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".into(), "text".into(), "md".into()],
            recursive: true,
        }
    }
}

impl CrawlOptions {
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub files: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Index every matching file under `root` (or `root` itself if it is a file).
pub fn index_path(session: &mut IndexerSession, root: &Path, options: &CrawlOptions) -> Result<CrawlStats> {
    let meta = fs::symlink_metadata(root).map_err(|e| Error::open(root, e))?;
    let mut stats = CrawlStats::default();

    if meta.is_file() {
        index_file(session, root, &mut stats)?;
        return Ok(stats);
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match read_sorted(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read directory");
                stats.skipped += 1;
                continue;
            }
        };

        let mut subdirs = Vec::new();
        for path in entries {
            let Ok(meta) = fs::symlink_metadata(&path) else {
                stats.skipped += 1;
                continue;
            };
            if meta.file_type().is_symlink() {
                debug!(path = %path.display(), "symbolic link not followed");
            } else if meta.is_dir() {
                if options.recursive {
                    subdirs.push(path);
                }
            } else if meta.is_file() && options.wants(&path) {
                index_file(session, &path, &mut stats)?;
            }
        }
        // Reversed so the stack pops them in name order
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(stats)
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn index_file(session: &mut IndexerSession, path: &Path, stats: &mut CrawlStats) -> Result<()> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read file");
            stats.skipped += 1;
            return Ok(());
        }
    };
    let text = String::from_utf8_lossy(&bytes);

    let dir = path.parent().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir_index = session.add_directory(&dir);
    let mut file = session.begin_file(dir_index, &name, bytes.len() as u64, None);
    file.index_text(&text, None)?;
    drop(file);

    stats.files += 1;
    stats.bytes += bytes.len() as u64;
    Ok(())
}

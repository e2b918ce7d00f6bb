// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction.
//!
//! An [`IndexerSession`] owns all state of one indexing run: the in-memory word
//! map, the document and directory tables, the meta-name IDs, and the
//! temporary directory holding partial indices. The crawl driver feeds it one
//! file at a time through [`IndexerSession::begin_file`], which hands back a
//! [`FileIndexer`] for that document's words.
//!
//! ```text
//! Accumulating ──(words since flush ≥ threshold)──▶ Flush partial ──▶ Accumulating
//!      │
//!      └──(finish)──▶ flush residual ──▶ Merge (partials [+ existing index]) ──▶ index file
//! ```
//!
//! Document ids count up from zero (or from the existing document count when
//! appending) and are global across partial indices.

pub mod crawl;
mod merge;
mod partial;
pub mod words;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::binary::{decode_meta_name, decode_string, DocumentRecord, FilePosting};
use crate::error::{Error, Result};
use crate::index::{AccessPattern, Blob, IndexFile};
use crate::scoring::FrequencyLimit;
use crate::stem::{NoStemmer, Stemmer};
use crate::stop_words::StopWords;

pub use merge::MergeSummary;

use merge::{MergeInput, write_index};
use partial::{write_partial, PartialIndex};

/// Document identifier: position in the file segment.
pub type DocId = u32;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Flush a partial index after this many words since the last flush
    pub word_threshold: usize,
    /// Words in too many files are demoted to stop words during the merge
    pub frequency: FrequencyLimit,
    /// Shortest word indexed, in characters
    pub word_min_size: usize,
    /// Longest word indexed, in characters
    pub word_max_size: usize,
    /// Where partial indices go; the system temp directory if unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            word_threshold: 250_000,
            frequency: FrequencyLimit::default(),
            word_min_size: 2,
            word_max_size: 25,
            temp_dir: None,
        }
    }
}

impl IndexerConfig {
    pub fn with_word_threshold(mut self, words: usize) -> Self {
        self.word_threshold = words;
        self
    }

    pub fn with_files_max(mut self, files: u64) -> Self {
        self.frequency.files_max = files;
        self
    }

    pub fn with_word_percent_max(mut self, percent: u8) -> Self {
        self.frequency.percent_max = percent;
        self
    }

    pub fn with_word_sizes(mut self, min: usize, max: usize) -> Self {
        self.word_min_size = min;
        self.word_max_size = max;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.word_threshold == 0 {
            return Err(Error::InvalidConfig("word threshold must be at least 1".into()));
        }
        if self.frequency.percent_max > 100 {
            return Err(Error::InvalidConfig(format!(
                "word percentage {} exceeds 100",
                self.frequency.percent_max
            )));
        }
        if self.word_min_size == 0 || self.word_min_size > self.word_max_size {
            return Err(Error::InvalidConfig(format!(
                "word sizes {}..={} are not a valid range",
                self.word_min_size, self.word_max_size
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// State of one indexing run.
pub struct IndexerSession {
    config: IndexerConfig,
    stemmer: Box<dyn Stemmer>,
    stop_words: StopWords,
    words: BTreeMap<String, Vec<FilePosting>>,
    words_since_flush: usize,
    files: Vec<DocumentRecord>,
    directories: Vec<String>,
    directory_ids: HashMap<String, u32>,
    meta_names: HashMap<String, u32>,
    temp_dir: TempDir,
    partials: Vec<PathBuf>,
    /// Index being appended to; merged as the first source
    base: Option<IndexFile>,
}

impl IndexerSession {
    pub fn new(config: IndexerConfig, stop_words: StopWords) -> Result<Self> {
        config.validate()?;
        let temp_dir = match &config.temp_dir {
            Some(dir) => tempfile::Builder::new().prefix("quarry-").tempdir_in(dir),
            None => tempfile::Builder::new().prefix("quarry-").tempdir(),
        }
        .map_err(|e| Error::create(config.temp_dir.clone().unwrap_or_default(), e))?;

        Ok(Self {
            config,
            stemmer: Box::new(NoStemmer),
            stop_words,
            words: BTreeMap::new(),
            words_since_flush: 0,
            files: Vec::new(),
            directories: Vec::new(),
            directory_ids: HashMap::new(),
            meta_names: HashMap::new(),
            temp_dir,
            partials: Vec::new(),
            base: None,
        })
    }

    /// Start a session that adds documents to an existing index.
    ///
    /// Directories, files, meta names and stop words of the existing index are
    /// kept; new documents are numbered after the existing ones. The existing
    /// word segment is merged back in at `finish`, so every rank is recomputed.
    pub fn append_to(existing: impl AsRef<Path>, config: IndexerConfig) -> Result<Self> {
        let existing = existing.as_ref();
        let base = IndexFile::from_blob(Blob::map(existing, AccessPattern::Sequential)?)?;
        let mut session = Self::new(config, StopWords::none())?;
        session.load_base(&base)?;
        session.base = Some(base);
        info!(
            path = %existing.display(),
            files = session.files.len(),
            "appending to existing index"
        );
        Ok(session)
    }

    fn load_base(&mut self, index: &IndexFile) -> Result<()> {
        for entry in index.stop_words().iter() {
            self.stop_words.insert(decode_string(entry?)?.to_string());
        }
        for entry in index.directories().iter() {
            let dir = decode_string(entry?)?.to_string();
            self.add_directory(&dir);
        }
        for entry in index.files().iter() {
            self.files.push(DocumentRecord::decode(entry?)?);
        }
        for entry in index.meta_names().iter() {
            let (name, id) = decode_meta_name(entry?)?;
            self.meta_names.insert(name.to_string(), id);
        }
        Ok(())
    }

    pub fn with_stemmer(mut self, stemmer: impl Stemmer + 'static) -> Self {
        self.stemmer = Box::new(stemmer);
        self
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn document_count(&self) -> usize {
        self.files.len()
    }

    /// Number of partial indices flushed so far.
    pub fn partial_count(&self) -> usize {
        self.partials.len()
    }

    /// Directory index for `path`, assigned on first encounter.
    pub fn add_directory(&mut self, path: &str) -> u32 {
        if let Some(&id) = self.directory_ids.get(path) {
            return id;
        }
        let id = self.directories.len() as u32;
        self.directories.push(path.to_string());
        self.directory_ids.insert(path.to_string(), id);
        id
    }

    /// Meta-name ID for `name`, assigned in encounter order.
    pub fn meta_id(&mut self, name: &str) -> u32 {
        let name = crate::utils::fold(name);
        let next = self.meta_names.len() as u32;
        *self.meta_names.entry(name).or_insert(next)
    }

    /// Register a document and start indexing its words.
    ///
    /// The document's word count is recorded when the returned indexer drops.
    pub fn begin_file(
        &mut self,
        dir_index: u32,
        file_name: &str,
        size: u64,
        title: Option<&str>,
    ) -> FileIndexer<'_> {
        let doc_id = self.files.len() as DocId;
        self.files.push(DocumentRecord {
            dir_index,
            file_name: file_name.to_string(),
            size,
            word_count: 0,
            title: title.unwrap_or(file_name).to_string(),
        });
        FileIndexer {
            session: self,
            doc_id,
            next_position: 0,
            word_count: 0,
        }
    }

    fn record(&mut self, word: String, doc_id: DocId, position: u32, meta: Option<u32>) -> Result<()> {
        let postings = self.words.entry(word).or_default();
        if postings.last().is_none_or(|last| last.doc_id != doc_id) {
            postings.push(FilePosting {
                doc_id,
                ..FilePosting::default()
            });
        }
        let Some(posting) = postings.last_mut() else {
            return Err(Error::corrupt("empty posting list"));
        };

        posting.occurrences = posting.occurrences.saturating_add(1);
        if let Some(id) = meta {
            if let Err(at) = posting.meta_ids.binary_search(&id) {
                posting.meta_ids.insert(at, id);
            }
        }
        if cfg!(feature = "word-pos") {
            posting.positions.push(position);
        }

        self.words_since_flush += 1;
        if self.words_since_flush >= self.config.word_threshold {
            self.flush_partial()?;
        }
        Ok(())
    }

    /// Write the word map to a new partial index and clear it.
    fn flush_partial(&mut self) -> Result<()> {
        let path = self
            .temp_dir
            .path()
            .join(format!("partial.{}", self.partials.len()));
        write_partial(&path, &self.words)?;
        info!(
            partial = self.partials.len(),
            words = self.words.len(),
            "flushed partial index"
        );
        self.partials.push(path);
        self.words.clear();
        self.words_since_flush = 0;
        Ok(())
    }

    /// Flush what is left, merge everything, and write the index to `out`.
    pub fn finish(mut self, out: impl AsRef<Path>) -> Result<MergeSummary> {
        if !self.words.is_empty() {
            self.flush_partial()?;
        }

        let partials = self
            .partials
            .iter()
            .map(|path| PartialIndex::open(path))
            .collect::<Result<Vec<_>>>()?;
        let mut sources = Vec::with_capacity(partials.len() + 1);
        if let Some(base) = &self.base {
            sources.push(base.words());
        }
        sources.extend(partials.iter().map(PartialIndex::words));

        let input = MergeInput {
            sources,
            files: &self.files,
            directories: &self.directories,
            meta_names: self
                .meta_names
                .iter()
                .map(|(name, &id)| (name.as_str(), id))
                .collect(),
            limit: self.config.frequency,
        };
        let summary = write_index(&input, &mut self.stop_words, out.as_ref())?;
        debug!(temp_dir = %self.temp_dir.path().display(), "removing partial indices");
        Ok(summary)
    }
}

// ============================================================================
// PER-FILE INDEXER
// ============================================================================

/// Feeds one document's words into the session.
pub struct FileIndexer<'s> {
    session: &'s mut IndexerSession,
    doc_id: DocId,
    next_position: u32,
    word_count: u32,
}

impl FileIndexer<'_> {
    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    pub fn set_title(&mut self, title: &str) {
        self.session.files[self.doc_id as usize].title = title.to_string();
    }

    pub fn meta_id(&mut self, name: &str) -> u32 {
        self.session.meta_id(name)
    }

    /// Index one word at the next position, optionally under a meta name.
    ///
    /// Words that fail the length/alphabet checks or are stop words still take
    /// up a position but are not indexed.
    pub fn index_word(&mut self, raw: &str, meta: Option<u32>) -> Result<()> {
        let position = self.next_position;
        self.next_position = self.next_position.saturating_add(1);
        self.word_count = self.word_count.saturating_add(1);

        let word = words::prepare(raw);
        let config = &self.session.config;
        if let Err(reason) = words::check(&word, config.word_min_size, config.word_max_size) {
            debug!(word = %word, ?reason, "word skipped");
            return Ok(());
        }
        if self.session.stop_words.contains(&word) {
            return Ok(());
        }

        // Stop words are checked on the surface form and again on the stem
        let stemmed = self.session.stemmer.stem(&word);
        if stemmed != word && self.session.stop_words.contains(&stemmed) {
            return Ok(());
        }
        self.session.record(stemmed, self.doc_id, position, meta)
    }

    /// Index every word of a text span.
    pub fn index_text(&mut self, text: &str, meta: Option<u32>) -> Result<()> {
        let folded = crate::utils::fold(text);
        for word in words::candidates(&folded) {
            self.index_word(word, meta)?;
        }
        Ok(())
    }
}

impl Drop for FileIndexer<'_> {
    fn drop(&mut self) {
        if let Some(record) = self.session.files.get_mut(self.doc_id as usize) {
            record.word_count = self.word_count;
        }
    }
}

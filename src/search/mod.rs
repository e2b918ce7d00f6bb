// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query answering: from a query string to ranked documents.
//!
//! ```text
//! fold ──▶ tokenize ──▶ parse (resolve words) ──▶ distribute near ──▶ eval ──▶ normalize + sort
//! ```
//!
//! A [`Searcher`] borrows an open [`IndexFile`] and keeps no per-query state, so
//! one searcher can serve many threads at once. Each call builds its own tree.

pub mod lexer;
pub mod parser;
pub mod tree;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::build::DocId;
use crate::error::{Error, Result};
use crate::index::IndexFile;
use crate::scoring::{normalize_rank, FrequencyLimit};
use crate::stem::{NoStemmer, Stemmer};
use crate::utils::fold;

use parser::QueryParser;
use tree::EvalContext;

pub use tree::{QueryNode, WordNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Words in too many documents are ignored and reported
    pub frequency: FrequencyLimit,
    /// Largest position difference still counted as `near`
    pub near_distance: u32,
    /// At most this many hits are returned
    pub max_results: Option<usize>,
    /// Hits to skip before the first one returned
    pub skip_results: usize,
    /// Shortest query word looked up; should match the indexer's setting
    pub word_min_size: usize,
    /// Longest query word looked up
    pub word_max_size: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            frequency: FrequencyLimit::default(),
            near_distance: 10,
            max_results: None,
            skip_results: 0,
            word_min_size: 2,
            word_max_size: 25,
        }
    }
}

impl QueryOptions {
    pub fn with_files_max(mut self, files: u64) -> Self {
        self.frequency.files_max = files;
        self
    }

    pub fn with_word_percent_max(mut self, percent: u8) -> Self {
        self.frequency.percent_max = percent;
        self
    }

    pub fn with_near_distance(mut self, distance: u32) -> Self {
        self.near_distance = distance;
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn with_skip_results(mut self, skip: usize) -> Self {
        self.skip_results = skip;
        self
    }

    pub fn with_word_sizes(mut self, min: usize, max: usize) -> Self {
        self.word_min_size = min;
        self.word_max_size = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
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

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub doc_id: DocId,
    /// 1..=100, relative to the best hit
    pub rank: u32,
    pub path: PathBuf,
    pub size: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Matching documents before skip/limit
    pub total: usize,
    pub hits: Vec<Hit>,
    /// Stop words and too-frequent words that took no part, sorted
    pub ignored: Vec<String>,
}

pub struct Searcher<'i> {
    index: &'i IndexFile,
    options: QueryOptions,
    stemmer: Box<dyn Stemmer>,
}

impl<'i> Searcher<'i> {
    pub fn new(index: &'i IndexFile) -> Self {
        Self {
            index,
            options: QueryOptions::default(),
            stemmer: Box::new(NoStemmer),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Must be the stemmer the index was built with.
    pub fn with_stemmer(mut self, stemmer: impl Stemmer + 'static) -> Self {
        self.stemmer = Box::new(stemmer);
        self
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Parse a query into its distributed operator tree, reporting ignored words.
    pub fn parse(&self, query: &str) -> Result<(QueryNode, Vec<String>)> {
        let tokens = lexer::tokenize(&fold(query))?;
        let (tree, ignored) = QueryParser::new(tokens, self.index, self.stemmer.as_ref())
            .with_word_sizes(self.options.word_min_size, self.options.word_max_size)
            .parse()?;
        Ok((tree.distribute()?, ignored.into_iter().collect()))
    }

    /// Document ids and normalized ranks of every match, best first.
    pub fn scores(&self, query: &str) -> Result<(Vec<(DocId, u32)>, Vec<String>)> {
        self.options.validate()?;
        let (tree, stop_words) = self.parse(query)?;

        let mut ctx = EvalContext::new(self.index, self.options.frequency, self.options.near_distance);
        let scores = tree.eval(&mut ctx)?;
        let mut ignored = ctx.ignored;
        ignored.extend(stop_words);

        let top = scores.values().copied().max().unwrap_or(0);
        let mut ranked: Vec<(DocId, u32)> = scores
            .into_iter()
            .map(|(doc, score)| (doc, normalize_rank(score, top)))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        debug!(query, matches = ranked.len(), ignored = ignored.len(), "query evaluated");
        Ok((ranked, ignored.into_iter().collect()))
    }

    pub fn search(&self, query: &str) -> Result<SearchResults> {
        let (ranked, ignored) = self.scores(query)?;
        let total = ranked.len();
        let limit = self.options.max_results.unwrap_or(usize::MAX);

        let hits = ranked
            .into_iter()
            .skip(self.options.skip_results)
            .take(limit)
            .map(|(doc_id, rank)| {
                let record = self.index.document(doc_id)?;
                Ok(Hit {
                    doc_id,
                    rank,
                    path: self.index.document_path(&record)?,
                    size: record.size,
                    title: record.title,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchResults { total, hits, ignored })
    }
}

/// Run one query with default stemming.
pub fn search(index: &IndexFile, query: &str, options: QueryOptions) -> Result<SearchResults> {
    Searcher::new(index).with_options(options).search(query)
}

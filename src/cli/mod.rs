// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the quarry command-line interface.
//!
//! Three subcommands: `index` to build (or extend) an index from directories of
//! text files, `search` to query it, and `inspect` to print segment counts.
//! `search` and `inspect` print JSON with `--json` for scripting.

pub mod display;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use quarry::{CrawlOptions, IndexerConfig, QueryOptions};

#[derive(Parser)]
#[command(name = "quarry", about = "Small-footprint full-text search", version)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index directories (or single files) of plain text
    Index {
        /// Directories or files to index
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Index file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Add to the existing index at --output instead of replacing it
        #[arg(short, long)]
        append: bool,

        /// File extensions to index (comma separated)
        #[arg(short, long, value_delimiter = ',', default_value = "txt,text,md")]
        extensions: Vec<String>,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recurse: bool,

        /// Stop-word file (one word per line); the built-in English list otherwise
        #[arg(long, conflicts_with = "no_stop_words")]
        stop_words: Option<PathBuf>,

        /// Index every word, including common ones
        #[arg(long)]
        no_stop_words: bool,

        /// Words indexed before a partial index is flushed to disk
        #[arg(short = 'W', long, default_value_t = 250_000)]
        word_threshold: usize,

        /// Directory for partial indices
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        #[command(flatten)]
        frequency: FrequencyArgs,

        /// Shortest word indexed
        #[arg(long, default_value_t = 2)]
        min_word: usize,

        /// Longest word indexed
        #[arg(long, default_value_t = 25)]
        max_word: usize,

        /// Print the merge summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Query an index
    Search {
        /// Index file
        index: PathBuf,

        /// Query, e.g. `cat and (dog or bird*)`
        query: String,

        /// Maximum number of results to print
        #[arg(short = 'm', long, default_value_t = 100)]
        max_results: usize,

        /// Results to skip before printing
        #[arg(short, long, default_value_t = 0)]
        skip: usize,

        /// Largest word distance that counts as `near`
        #[arg(short, long, default_value_t = 10)]
        distance: u32,

        #[command(flatten)]
        frequency: FrequencyArgs,

        /// Shortest query word looked up; match the value used at index time
        #[arg(long, default_value_t = 2)]
        min_word: usize,

        /// Longest query word looked up
        #[arg(long, default_value_t = 25)]
        max_word: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print segment counts of an index
    Inspect {
        /// Index file
        index: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Limits on how common a word may be before it is dropped.
#[derive(Args)]
pub struct FrequencyArgs {
    /// Ignore words found in more than this many files
    #[arg(short = 'f', long)]
    pub files_max: Option<u64>,

    /// Ignore words found in more than this percentage of files
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percent_max: Option<u8>,
}

impl FrequencyArgs {
    fn apply(&self, mut limit: quarry::FrequencyLimit) -> quarry::FrequencyLimit {
        if let Some(files) = self.files_max {
            limit.files_max = files;
        }
        if let Some(percent) = self.percent_max {
            limit.percent_max = percent;
        }
        limit
    }

    pub fn indexer_config(
        &self,
        word_threshold: usize,
        min_word: usize,
        max_word: usize,
        temp_dir: Option<PathBuf>,
    ) -> IndexerConfig {
        let mut config = IndexerConfig::default()
            .with_word_threshold(word_threshold)
            .with_word_sizes(min_word, max_word);
        config.frequency = self.apply(config.frequency);
        config.temp_dir = temp_dir;
        config
    }

    pub fn query_options(
        &self,
        max_results: usize,
        skip: usize,
        distance: u32,
        min_word: usize,
        max_word: usize,
    ) -> QueryOptions {
        let mut options = QueryOptions::default()
            .with_max_results(max_results)
            .with_skip_results(skip)
            .with_near_distance(distance)
            .with_word_sizes(min_word, max_word);
        options.frequency = self.apply(options.frequency);
        options
    }
}

pub fn crawl_options(extensions: Vec<String>, no_recurse: bool) -> CrawlOptions {
    CrawlOptions::default()
        .with_extensions(extensions.into_iter().map(|e| e.trim_start_matches('.').to_string()))
        .with_recursive(!no_recurse)
}

//! Small-footprint full-text search over a file corpus.
//!
//! An index is one memory-mapped file: five offset-table segments (words,
//! stop words, directories, files, meta names) over varint-encoded posting
//! lists. Queries are boolean with optional proximity (`near`, `not near`)
//! and prefix wildcards.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ build::    │──▶│ build::      │──▶│ build::     │──▶│  index file  │
//! │ crawl      │   │ IndexerSess. │   │ merge       │   │ (binary::*)  │
//! └────────────┘   └──────┬───────┘   └──────▲──────┘   └──────┬───────┘
//!                         │ flush            │                 │ mmap
//!                         ▼                  │                 ▼
//!                  ┌──────────────┐          │          ┌──────────────┐
//!                  │  partial     │──────────┘          │ index::      │
//!                  │  indices     │                     │ IndexFile    │
//!                  └──────────────┘                     └──────┬───────┘
//!                                                              ▼
//!                                 query ──▶ search::lexer ──▶ parser ──▶ tree::eval
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use quarry::{IndexFile, IndexerConfig, IndexerSession, QueryOptions, Searcher, StopWords};
//!
//! # fn main() -> quarry::Result<()> {
//! let mut session = IndexerSession::new(IndexerConfig::default(), StopWords::builtin())?;
//! let dir = session.add_directory("/notes");
//! let mut file = session.begin_file(dir, "todo.txt", 24, None);
//! file.index_text("buy cat food, walk dog", None)?;
//! drop(file);
//! session.finish("notes.qx")?;
//!
//! let index = IndexFile::open("notes.qx")?;
//! let results = Searcher::new(&index)
//!     .with_options(QueryOptions::default().with_max_results(10))
//!     .search("cat and not bird")?;
//! for hit in &results.hits {
//!     println!("{:3} {}", hit.rank, hit.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod build;
pub mod error;
pub mod index;
pub mod scoring;
pub mod search;
pub mod stem;
pub mod stop_words;
pub mod testing;
mod utils;

pub use build::crawl::{index_path, CrawlOptions, CrawlStats};
pub use build::{DocId, FileIndexer, IndexerConfig, IndexerSession, MergeSummary};
pub use error::{Error, Result};
pub use index::{IndexFile, IndexStats};
pub use scoring::FrequencyLimit;
pub use search::{search, Hit, QueryOptions, SearchResults, Searcher};
pub use stem::{NoStemmer, Stemmer};
pub use stop_words::StopWords;
pub use utils::fold;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quarry::{index_path, IndexFile, IndexerSession, Searcher, StopWords};

mod cli;
use cli::display::{print_results, print_stats, print_summary, Style};
use cli::{crawl_options, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("quarry: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let style = Style::detect();

    match command {
        Commands::Index {
            inputs,
            output,
            append,
            extensions,
            no_recurse,
            stop_words,
            no_stop_words,
            word_threshold,
            temp_dir,
            frequency,
            min_word,
            max_word,
            json,
        } => {
            let config = frequency.indexer_config(word_threshold, min_word, max_word, temp_dir);
            let mut session = if append && output.exists() {
                IndexerSession::append_to(&output, config)?
            } else {
                let stop_words = match (&stop_words, no_stop_words) {
                    (_, true) => StopWords::none(),
                    (Some(path), false) => StopWords::from_file(path)?,
                    (None, false) => StopWords::builtin(),
                };
                IndexerSession::new(config, stop_words)?
            };

            let options = crawl_options(extensions, no_recurse);
            for input in &inputs {
                let stats = index_path(&mut session, input, &options)
                    .with_context(|| format!("indexing {}", input.display()))?;
                info!(input = %input.display(), files = stats.files, skipped = stats.skipped, "crawled");
            }

            let files = session.document_count();
            let summary = session
                .finish(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                print_summary(&mut out, &summary, files, style)?;
            }
        }

        Commands::Search {
            index,
            query,
            max_results,
            skip,
            distance,
            frequency,
            min_word,
            max_word,
            json,
        } => {
            let file = IndexFile::open(&index)?;
            let options = frequency.query_options(max_results, skip, distance, min_word, max_word);
            let results = Searcher::new(&file).with_options(options).search(&query)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &results)?;
                writeln!(out)?;
            } else {
                print_results(&mut out, &results, style)?;
            }
        }

        Commands::Inspect { index, json } => {
            let file = IndexFile::open(&index)?;
            let stats = file.stats();
            if json {
                serde_json::to_writer_pretty(&mut out, &stats)?;
                writeln!(out)?;
            } else {
                print_stats(&mut out, &stats, style)?;
            }
        }
    }

    Ok(())
}

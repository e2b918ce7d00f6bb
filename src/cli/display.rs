// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for the quarry CLI.
//!
//! Plain text with a little color when stdout is a terminal. Respects
//! `NO_COLOR`. Everything here writes to a `Write` so it can be tested.

use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

use quarry::{IndexStats, MergeSummary, SearchResults};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

static COLOR: OnceLock<bool> = OnceLock::new();

/// Whether to emit escape codes (cached)
pub fn use_color() -> bool {
    *COLOR.get_or_init(|| std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal())
}

#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn detect() -> Self {
        Self { color: use_color() }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn rank(&self, rank: u32) -> String {
        let text = format!("{:>3}", rank);
        match rank {
            75.. => self.paint(GREEN, &text),
            25..=74 => self.paint(YELLOW, &text),
            _ => self.paint(DIM, &text),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH RESULTS
// ═══════════════════════════════════════════════════════════════════════════

/// One line per hit: rank, path, size, title.
pub fn print_results(out: &mut impl Write, results: &SearchResults, style: Style) -> io::Result<()> {
    if !results.ignored.is_empty() {
        writeln!(
            out,
            "{}",
            style.paint(DIM, &format!("# ignored: {}", results.ignored.join(" ")))
        )?;
    }
    writeln!(
        out,
        "{}",
        style.paint(BOLD, &format!("# results: {}", results.total))
    )?;
    for hit in &results.hits {
        writeln!(
            out,
            "{} {} {} {}",
            style.rank(hit.rank),
            hit.path.display(),
            hit.size,
            hit.title
        )?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// INDEX SUMMARIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_stats(out: &mut impl Write, stats: &IndexStats, style: Style) -> io::Result<()> {
    let rows = [
        ("bytes", stats.bytes),
        ("words", stats.words),
        ("stop words", stats.stop_words),
        ("directories", stats.directories),
        ("files", stats.files),
        ("meta names", stats.meta_names),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<12} {}", style.paint(DIM, label), value)?;
    }
    Ok(())
}

pub fn print_summary(out: &mut impl Write, summary: &MergeSummary, files: usize, style: Style) -> io::Result<()> {
    writeln!(
        out,
        "{} {} files, {} words, {} stop words ({} demoted) from {} sources",
        style.paint(GREEN, "indexed"),
        files,
        summary.words,
        summary.stop_words,
        summary.demoted.len(),
        summary.sources
    )
}

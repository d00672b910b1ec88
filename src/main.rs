//! Main entry point for the tinywiki CLI application.
//!
//! Loads the title index of a multistream dump once, then prints or saves
//! the raw source of the requested articles.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use tinywiki::{Cli, DumpSource, LookupTable, ReadAt, Wiki};

/// Maximum number of articles extracted at the same time.
const MAX_IN_FLIGHT: usize = 16;

/// Application entry point.
///
/// Parses command-line arguments, loads the index, and dispatches to the
/// list or extract mode.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(cli.log_level().into())
                .from_env_lossy(),
        )
        .init();

    // The service cannot work without an index: any failure here is fatal
    let index = Arc::new(
        DumpSource::open(&cli.index)
            .await
            .with_context(|| format!("cannot open index {}", cli.index))?,
    );
    let table = tinywiki::load_index(index)
        .await
        .with_context(|| format!("cannot load index {}", cli.index))?;
    info!(titles = table.len(), "loaded index {}", cli.index);

    let titles = select_titles(&table, &cli.titles);

    // List mode: only the index is needed
    if cli.list {
        let mut stdout = tokio::io::stdout();
        for title in &titles {
            stdout.write_all(title.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
        return Ok(());
    }

    if titles.is_empty() {
        bail!("no titles given (use -l to list the index)");
    }

    let content = Arc::new(
        DumpSource::open(&cli.data)
            .await
            .with_context(|| format!("cannot open content {}", cli.data))?,
    );
    let transferred_before = content.transferred_bytes();

    let wiki = Wiki::new(table, content.clone());
    let failed = extract_all(&wiki, &titles, &cli).await?;

    // Display network transfer statistics for HTTP sources
    if let (Some(before), Some(after)) = (transferred_before, content.transferred_bytes()) {
        if !cli.is_quiet() {
            eprintln!("\nTotal bytes transferred: {}", format_size(after - before));
        }
    }

    if failed > 0 {
        bail!("{} of {} articles could not be extracted", failed, titles.len());
    }

    Ok(())
}

/// Expand the requested titles against the index.
///
/// Exact titles are kept as given, even when absent from the index, so the
/// lookup reports them. Glob patterns expand to the matching titles in
/// sorted order. No request at all selects every title.
fn select_titles(table: &LookupTable, requested: &[String]) -> Vec<String> {
    let all_titles = table.titles();
    if requested.is_empty() {
        return all_titles.into_iter().map(str::to_string).collect();
    }

    let mut titles = Vec::new();
    for request in requested {
        if has_glob_chars(request) {
            let matches: Vec<String> = all_titles
                .iter()
                .copied()
                .filter(|title| glob_match(request, title))
                .map(str::to_string)
                .collect();
            if matches.is_empty() {
                warn!("pattern {:?} matches no title", request);
            }
            titles.extend(matches);
        } else {
            titles.push(request.clone());
        }
    }
    titles
}

/// Extract every title, a bounded batch at a time, and emit results in
/// request order.
///
/// Each article runs on its own task; a failing article is reported and
/// does not stop the others. Returns the number of failures.
async fn extract_all<R: ReadAt + 'static>(
    wiki: &Wiki<R>,
    titles: &[String],
    cli: &Cli,
) -> Result<usize> {
    let mut failed = 0;
    let show_title = titles.len() > 1;

    for batch in titles.chunks(MAX_IN_FLIGHT) {
        let mut tasks = JoinSet::new();
        for (i, title) in batch.iter().enumerate() {
            let wiki = wiki.clone();
            let title = title.clone();
            tasks.spawn(async move { (i, wiki.article(&title).await) });
        }

        let mut results: Vec<Option<tinywiki::Result<String>>> =
            (0..batch.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (i, result) = joined?;
            results[i] = Some(result);
        }

        for (title, result) in batch.iter().zip(results) {
            match result {
                Some(Ok(text)) => write_article(title, &text, cli, show_title).await?,
                Some(Err(e)) if e.is_not_found() => {
                    failed += 1;
                    warn!("{}: {}", title, e);
                }
                Some(Err(e)) => {
                    failed += 1;
                    error!("{}: {}", title, e);
                }
                None => failed += 1,
            }
        }
    }

    Ok(failed)
}

/// Write one article to stdout or into the output directory.
///
/// Handles the overwrite options (`-n`, `-f`) for existing files.
async fn write_article(title: &str, text: &str, cli: &Cli, show_title: bool) -> Result<()> {
    let Some(dir) = &cli.output_dir else {
        let mut stdout = tokio::io::stdout();
        if show_title {
            stdout
                .write_all(format!("--- {} ---\n", title).as_bytes())
                .await?;
        }
        stdout.write_all(text.as_bytes()).await?;
        if show_title {
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
        return Ok(());
    };

    let output_path = PathBuf::from(dir).join(article_file_name(title));

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_very_quiet() {
                eprintln!("Skipping: {} (file exists)", output_path.display());
            }
            return Ok(());
        }

        if !cli.overwrite {
            if !cli.is_very_quiet() {
                eprintln!("Skipping: {} (use -f to overwrite)", output_path.display());
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", title);
    }

    save_article(&output_path, text).await
}

async fn save_article(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// File name for a saved article: the title with path separators replaced.
fn article_file_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.wiki", name)
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star: skip it, or consume one character and keep it
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

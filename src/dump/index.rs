//! Title index: `offset:id:title` lines mapped into a [`LookupTable`].

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::Result;
use crate::io::ReadAt;

use super::segment::open_multistream;

/// Location of one article inside the content container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Byte offset of the compressed segment holding the article
    pub offset: u64,
    /// Internal page id, unique within its segment
    pub id: String,
}

/// Title to [`IndexEntry`] map.
///
/// Built once by [`parse_index`] and never modified afterwards; share it
/// behind an `Arc` for concurrent lookups.
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    entries: HashMap<String, IndexEntry>,
}

impl LookupTable {
    /// Exact, case-sensitive title lookup
    pub fn get(&self, title: &str) -> Option<&IndexEntry> {
        self.entries.get(title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All titles, sorted
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        titles.sort_unstable();
        titles
    }

    fn insert(&mut self, title: String, entry: IndexEntry) {
        // Later lines win for duplicate titles
        self.entries.insert(title, entry);
    }
}

/// Parse one index line into `(title, entry)`.
///
/// Only the first two colons split; the title keeps any colons of its own.
fn parse_line(line: &str) -> std::result::Result<(String, IndexEntry), String> {
    let mut fields = line.splitn(3, ':');
    let (Some(offset), Some(id), Some(title)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err("expected offset:id:title".to_string());
    };

    let offset = offset
        .parse::<u64>()
        .map_err(|e| format!("invalid offset {:?}: {}", offset, e))?;

    Ok((
        title.to_string(),
        IndexEntry {
            offset,
            id: id.trim().to_string(),
        },
    ))
}

/// Build a [`LookupTable`] from decompressed index text.
///
/// Malformed lines, including lines that are not UTF-8, are logged and
/// skipped. Read or decompression errors abort the load.
pub fn parse_index<B: BufRead>(index: B) -> Result<LookupTable> {
    let mut table = LookupTable::default();
    let mut skipped = 0usize;

    for (line_no, raw) in index.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if raw.is_empty() {
            continue;
        }
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                skipped += 1;
                warn!(line = line_no + 1, "skipping index line: {}", e.utf8_error());
                continue;
            }
        };
        match parse_line(&line) {
            Ok((title, entry)) => table.insert(title, entry),
            Err(msg) => {
                skipped += 1;
                warn!(line = line_no + 1, "skipping index line: {}", msg);
            }
        }
    }

    info!(entries = table.len(), skipped, "index loaded");
    Ok(table)
}

/// Decompress and parse the index container.
///
/// Blocks the calling task on the blocking pool until the whole index is in
/// memory.
pub async fn load_index<R: ReadAt + 'static>(source: Arc<R>) -> Result<LookupTable> {
    let handle = Handle::current();
    tokio::task::spawn_blocking(move || parse_index(open_multistream(source, handle))).await?
}

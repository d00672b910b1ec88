//! Multistream dump access.
//!
//! A multistream dump comes as two files:
//!
//! 1. The content container: many bzip2 streams concatenated, each holding
//!    about a hundred consecutive `<page>` elements of the XML export.
//! 2. The index container: bzip2 text with one `offset:id:title` line per
//!    article, where `offset` is the byte position of the stream holding it.
//!
//! ## Architecture
//!
//! - [`index`]: parses the index into an in-memory [`LookupTable`]
//! - [`segment`]: opens a fresh decompressor at a stream boundary
//! - [`scanner`]: the page state machine selecting one article by id
//! - [`extractor`]: drives the XML tokenizer through the scanner
//!
//! Extracting an article touches a single compressed segment, never the
//! rest of the container.

mod extractor;
mod index;
mod scanner;
mod segment;

pub use extractor::{extract_article, scan_segment};
pub use index::{IndexEntry, LookupTable, load_index, parse_index};
pub use scanner::{PageScanner, ScanState};
pub use segment::{SOURCE_READ_SIZE, SegmentStream, SourceCursor, open_multistream, open_segment};

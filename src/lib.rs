//! # tinywiki
//!
//! Read single articles out of a multistream Wikipedia dump without
//! decompressing the archive.
//!
//! A multistream dump ships an index of `offset:id:title` lines next to the
//! content file. The offset names the independent bzip2 stream holding the
//! article, so fetching one article means decompressing one small segment
//! and picking the right `<page>` out of it. Both files can be read from the
//! local filesystem or from an HTTP server that supports Range requests.
//!
//! ## Features
//!
//! - Load the title index into memory once, then serve lookups concurrently
//! - Seek straight to the segment holding an article
//! - Disambiguate between the pages of one segment by internal id
//! - Local files, in-memory buffers and HTTP/HTTPS sources via [`ReadAt`]
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tinywiki::{LocalFileReader, Wiki};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let index = Arc::new(LocalFileReader::new(Path::new(
//!         "enwiki-latest-pages-articles-multistream-index.txt.bz2",
//!     ))?);
//!     let content = Arc::new(LocalFileReader::new(Path::new(
//!         "enwiki-latest-pages-articles-multistream.xml.bz2",
//!     ))?);
//!
//!     let wiki = Wiki::open(index, content).await?;
//!     println!("{}", wiki.article("Anarchism").await?);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod dump;
pub mod error;
pub mod io;
pub mod wiki;

pub use cli::Cli;
pub use dump::{IndexEntry, LookupTable, extract_article, load_index};
pub use error::{Error, Result};
pub use io::{DumpSource, HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use wiki::Wiki;

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{BufRead, ErrorKind};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

use crate::io::ReadAt;
use crate::{Error, Result};

use super::scanner::PageScanner;
use super::segment::open_segment;

/// Scan a decompressed segment for the page with internal id `id`.
///
/// Returns as soon as that page's `text` element closes; markup after it is
/// never read. Reaching the end of the segment, including a segment cut
/// short by the end of the container, yields [`Error::ArticleNotFound`].
/// Unparseable markup or a corrupt compressed stream is an error for this
/// call only.
pub fn scan_segment<B: BufRead>(segment: B, id: &str) -> Result<String> {
    let mut reader = Reader::from_reader(segment);
    let mut scanner = PageScanner::new(id);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(quick_xml::Error::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(quick_xml::Error::Io(e)) => {
                return Err(Error::Io(std::io::Error::new(e.kind(), e.to_string())));
            }
            Err(e) => return Err(e.into()),
        };

        match event {
            Event::Start(e) => scanner.on_start(e.local_name().as_ref()),
            Event::End(e) => {
                if let Some(text) = scanner.on_end(e.local_name().as_ref()) {
                    return Ok(text);
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                scanner.on_start(name.as_ref());
                if let Some(text) = scanner.on_end(name.as_ref()) {
                    return Ok(text);
                }
            }
            Event::Text(e) => scanner.on_text(&e.unescape().map_err(quick_xml::Error::from)?),
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| Error::Io(std::io::Error::new(ErrorKind::InvalidData, e)))?;
                scanner.on_text(text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::ArticleNotFound { id: id.to_string() })
}

/// Extract the source text of the article `id` from the segment at `offset`.
///
/// Runs on the blocking pool with its own decompression stream, so calls
/// for different articles can proceed in parallel over one shared source.
pub async fn extract_article<R: ReadAt + 'static>(
    source: Arc<R>,
    offset: u64,
    id: &str,
) -> Result<String> {
    if offset >= source.size() {
        debug!(offset, size = source.size(), "offset outside container");
        return Err(Error::ArticleNotFound { id: id.to_string() });
    }

    let handle = Handle::current();
    let id = id.to_string();
    tokio::task::spawn_blocking(move || {
        debug!(offset, id = %id, "scanning segment");
        scan_segment(open_segment(source, offset, handle), &id)
    })
    .await?
}

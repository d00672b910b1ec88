use std::sync::Arc;
use tracing::{debug, info};

use crate::dump::{IndexEntry, LookupTable, extract_article, load_index};
use crate::io::ReadAt;
use crate::{Error, Result};

/// Title based article lookup over one multistream dump.
///
/// Cheap to clone; clones share the lookup table and the content source, so
/// one clone per request task is the intended use.
pub struct Wiki<R: ReadAt> {
    table: Arc<LookupTable>,
    content: Arc<R>,
}

impl<R: ReadAt> Clone for Wiki<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            content: self.content.clone(),
        }
    }
}

impl<R: ReadAt + 'static> Wiki<R> {
    pub fn new(table: LookupTable, content: Arc<R>) -> Self {
        Self {
            table: Arc::new(table),
            content,
        }
    }

    /// Load the index from `index` and serve articles from `content`.
    pub async fn open<I: ReadAt + 'static>(index: Arc<I>, content: Arc<R>) -> Result<Self> {
        let table = load_index(index).await?;
        info!(titles = table.len(), "dump ready");
        Ok(Self::new(table, content))
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Resolve a title to its segment offset and internal id
    pub fn locate(&self, title: &str) -> Result<&IndexEntry> {
        self.table
            .get(title)
            .ok_or_else(|| Error::TitleNotFound(title.to_string()))
    }

    /// Fetch the raw source text of the article called `title`.
    pub async fn article(&self, title: &str) -> Result<String> {
        let entry = self.locate(title)?;
        debug!(title, offset = entry.offset, id = %entry.id, "found index entry");
        extract_article(self.content.clone(), entry.offset, &entry.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::parse_index;
    use crate::io::MemoryReader;
    use bzip2::Compression;
    use bzip2::write::BzEncoder;
    use std::io::Write;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn sample_wiki() -> Wiki<MemoryReader> {
        let content = compress(b"<page><id>7</id><text>alpha text</text></page>");
        let index = "0:7:Alpha\n0:8:Ghost\n";
        let table = parse_index(index.as_bytes()).unwrap();
        Wiki::new(table, Arc::new(MemoryReader::new(content)))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_article_by_title() {
        let wiki = sample_wiki();
        assert_eq!(wiki.article("Alpha").await.unwrap(), "alpha text");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_title() {
        let wiki = sample_wiki();
        let err = wiki.article("alpha").await.unwrap_err();
        assert!(matches!(err, Error::TitleNotFound(ref t) if t == "alpha"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_index_points_at_wrong_segment() {
        let wiki = sample_wiki();
        let err = wiki.article("Ghost").await.unwrap_err();
        assert!(matches!(err, Error::ArticleNotFound { ref id } if id == "8"));
    }
}

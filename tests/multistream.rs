//! End-to-end lookups against a small multistream dump written to disk.

use bzip2::Compression;
use bzip2::write::BzEncoder;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::task::JoinSet;

use tinywiki::{Error, LocalFileReader, Wiki, extract_article};

fn compress(data: &str) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn page(id: u32, title: &str, body: &str) -> String {
    format!(
        "<page><title>{title}</title><ns>0</ns><id>{id}</id>\
         <revision><id>{}</id><text xml:space=\"preserve\">{body}</text></revision></page>\n",
        id * 100 + 1
    )
}

/// Writes `segments` as one multistream container and the matching index.
/// Returns both files and the offset of every segment.
fn write_dump(segments: &[Vec<(u32, String)>]) -> (NamedTempFile, NamedTempFile, Vec<u64>) {
    let mut content = NamedTempFile::new().unwrap();
    let mut index_text = String::new();
    let mut offsets = Vec::new();
    let mut offset = 0u64;

    let header = compress("<mediawiki>\n<siteinfo><sitename>Test</sitename></siteinfo>\n");
    content.write_all(&header).unwrap();
    offset += header.len() as u64;

    for segment in segments {
        let mut markup = String::new();
        for (id, title) in segment {
            markup.push_str(&page(*id, title, &format!("body of {}", title)));
            index_text.push_str(&format!("{}:{}:{}\n", offset, id, title));
        }
        let compressed = compress(&markup);
        content.write_all(&compressed).unwrap();
        offsets.push(offset);
        offset += compressed.len() as u64;
    }
    content.write_all(&compress("</mediawiki>\n")).unwrap();
    content.flush().unwrap();

    let mut index = NamedTempFile::new().unwrap();
    index.write_all(&compress(&index_text)).unwrap();
    index.flush().unwrap();

    (index, content, offsets)
}

fn sample_segments() -> Vec<Vec<(u32, String)>> {
    (0..4)
        .map(|s| {
            (0..5)
                .map(|p| {
                    let id = s * 10 + p + 1;
                    (id, format!("Article {}", id))
                })
                .collect()
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lookup_by_title() {
    let (index, content, _) = write_dump(&sample_segments());
    let wiki = Wiki::open(
        Arc::new(LocalFileReader::new(index.path()).unwrap()),
        Arc::new(LocalFileReader::new(content.path()).unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(wiki.table().len(), 20);
    assert_eq!(
        wiki.article("Article 23").await.unwrap(),
        "body of Article 23"
    );
    assert!(matches!(
        wiki.article("Article 99").await,
        Err(Error::TitleNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_extractions() {
    let segments = sample_segments();
    let (index, content, _) = write_dump(&segments);
    let wiki = Wiki::open(
        Arc::new(LocalFileReader::new(index.path()).unwrap()),
        Arc::new(LocalFileReader::new(content.path()).unwrap()),
    )
    .await
    .unwrap();

    let mut tasks = JoinSet::new();
    for round in 0..3 {
        for (_, title) in segments.iter().flatten() {
            let wiki = wiki.clone();
            let title = title.clone();
            tasks.spawn(async move {
                let text = wiki.article(&title).await;
                (round, title, text)
            });
        }
    }

    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let (_, title, text) = joined.unwrap();
        assert_eq!(text.unwrap(), format!("body of {}", title));
        done += 1;
    }
    assert_eq!(done, 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_extract_by_offset() {
    let segments = sample_segments();
    let (_index, content, offsets) = write_dump(&segments);
    let source = Arc::new(LocalFileReader::new(content.path()).unwrap());

    let text = extract_article(source.clone(), offsets[2], "24").await.unwrap();
    assert_eq!(text, "body of Article 24");

    // Right id, wrong segment
    let err = extract_article(source.clone(), offsets[1], "24").await.unwrap_err();
    assert!(err.is_not_found());

    // Revision ids never match
    let err = extract_article(source, offsets[2], "2101").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_corrupt_segment_is_isolated() {
    let mut content = NamedTempFile::new().unwrap();
    let good = compress(&page(1, "Good", "fine"));
    let bad = compress("<page><id>2</id><text>broken</nope></page>");
    content.write_all(&good).unwrap();
    content.write_all(&bad).unwrap();
    content.flush().unwrap();

    let source = Arc::new(LocalFileReader::new(content.path()).unwrap());

    let err = extract_article(source.clone(), good.len() as u64, "2")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Markup(_)));

    // The same source keeps serving other requests
    assert_eq!(extract_article(source, 0, "1").await.unwrap(), "fine");
}

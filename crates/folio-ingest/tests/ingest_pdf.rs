//! End-to-end ingestion of a generated PDF

use folio_ingest::{find_single_pdf, ingest_single_pdf, ChunkConfig, Chunker, LopdfExtractor};
use folio_store::read_pages;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

fn write_pdf(path: &Path, pages: &[&str]) -> anyhow::Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path)?;
    Ok(())
}

#[test]
fn ingest_then_chunk_generated_pdf() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf_dir = dir.path().join("pdfs");
    std::fs::create_dir_all(&pdf_dir)?;
    write_pdf(
        &pdf_dir.join("lecture.pdf"),
        &["Hello World from page one", "Term frequency on page two"],
    )?;

    let pdf = find_single_pdf(&pdf_dir)?;
    let pages_path = dir.path().join("interim").join("pages.jsonl");
    let report = ingest_single_pdf(&pdf, &pages_path, &LopdfExtractor)?;
    assert_eq!(report.pdf_name, "lecture.pdf");
    assert_eq!(report.n_pages, 2);

    let pages = read_pages(&pages_path)?;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].doc_id, "lecture");
    assert!(pages[0].text_clean.contains("Hello World"));
    assert!(pages[1].text_clean.contains("Term frequency"));

    let chunks = Chunker::new(ChunkConfig::default()).chunk_pages(&pages);
    assert_eq!(chunks.len(), 1);
    assert_eq!((chunks[0].page_start, chunks[0].page_end), (1, 2));
    assert!(chunks[0].text.contains("[PAGE 2]"));
    Ok(())
}

//! End-to-end extraction on PDFs synthesized with lopdf.

mod common;

use common::{bold_below, constant, run, PdfSpec};
use pdfoutline::{
    extract_outline_bytes, Error, HeadingLevel, JsonFormat, OutlineConfig, OutlineEntry,
    OutlineExtractor, OutlineSource, PdfOutline,
};

/// Cover page with a large title, then two chapters with bold headings.
fn field_guide() -> PdfSpec {
    PdfSpec::default()
        .page(vec![
            run("Field Notes on Coastal Birds", 24.0, true, 72.0, 90.0),
            run("A survey of shorebird habitats", 12.0, false, 72.0, 130.0),
            run("This report summarizes a season of observations.", 11.0, false, 72.0, 200.0),
        ])
        .page(vec![
            run("Shorebirds", 18.0, true, 72.0, 80.0),
            run("Shorebirds feed along the tide line.", 11.0, false, 72.0, 120.0),
        ])
        .page(vec![
            run("Plovers", 14.0, true, 72.0, 80.0),
            run("Plovers nest above the high water mark.", 11.0, false, 72.0, 110.0),
        ])
}

#[test]
fn test_inferred_outline_from_layout() {
    let pdf = field_guide().build();
    let extractor = OutlineExtractor::new(bold_below(20.0), OutlineConfig::default()).unwrap();
    let extraction = extractor.extract_bytes(&pdf).unwrap();

    assert_eq!(extraction.source, OutlineSource::Inferred);
    assert_eq!(extraction.document.title, "Field Notes on Coastal Birds");
    assert_eq!(
        extraction.document.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Shorebirds", 1),
            OutlineEntry::new(HeadingLevel::H2, "Plovers", 2),
        ]
    );
}

#[test]
fn test_bookmarks_drive_outline() {
    let pdf = field_guide()
        .title("Coastal Birds 2024")
        .bookmark(0, "Shorebirds", 1)
        .bookmark(1, "Plovers", 2)
        .bookmark(0, "Appendix", 2)
        .build();

    let extraction = PdfOutline::new(constant(0.0)).extract_bytes(&pdf).unwrap();

    assert_eq!(extraction.source, OutlineSource::Bookmarks);
    assert_eq!(extraction.document.title, "Coastal Birds 2024");
    assert_eq!(
        extraction.document.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Shorebirds", 1),
            OutlineEntry::new(HeadingLevel::H2, "Plovers", 2),
            OutlineEntry::new(HeadingLevel::H1, "Appendix", 2),
        ]
    );
}

#[test]
fn test_disabled_bookmarks_fall_back_to_inference() {
    let pdf = field_guide()
        .bookmark(0, "Shorebirds", 1)
        .bookmark(0, "Plovers", 2)
        .bookmark(0, "Appendix", 2)
        .build();

    let extraction = PdfOutline::new(bold_below(20.0))
        .without_bookmarks()
        .extract_bytes(&pdf)
        .unwrap();
    assert_eq!(extraction.source, OutlineSource::Inferred);
    assert_eq!(extraction.document.outline.len(), 2);
}

#[test]
fn test_printed_toc_with_front_matter() {
    let pdf = PdfSpec::default()
        .page(vec![run("Coastal Birds", 24.0, true, 200.0, 120.0)])
        .page(vec![
            run("Contents", 16.0, true, 72.0, 80.0),
            run("Shorebirds ........ 1", 11.0, false, 72.0, 120.0),
            run("Plovers ........ 2", 11.0, false, 90.0, 140.0),
            run("Gulls ........ 3", 11.0, false, 72.0, 160.0),
        ])
        .page(vec![
            run("Shorebirds", 18.0, true, 72.0, 80.0),
            run("Shorebirds feed along the tide line.", 11.0, false, 72.0, 120.0),
        ])
        .page(vec![
            run("Plovers", 14.0, true, 72.0, 80.0),
            run("Plovers nest above the high water mark.", 11.0, false, 72.0, 120.0),
        ])
        .page(vec![
            run("Gulls", 18.0, true, 72.0, 80.0),
            run("Gulls follow the fishing boats.", 11.0, false, 72.0, 120.0),
        ])
        .build();

    // A model that never fires proves the outline comes from the ToC page.
    let extraction = PdfOutline::new(constant(0.0)).extract_bytes(&pdf).unwrap();

    assert_eq!(extraction.source, OutlineSource::TableOfContents);
    assert_eq!(extraction.document.title, "Coastal Birds");
    assert_eq!(
        extraction.document.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Shorebirds", 2),
            OutlineEntry::new(HeadingLevel::H2, "Plovers", 3),
            OutlineEntry::new(HeadingLevel::H1, "Gulls", 4),
        ]
    );
}

#[test]
fn test_page_without_text_is_empty_outline() {
    let pdf = PdfSpec::default().title("Scanned Letter").page(vec![]).build();
    let extraction = PdfOutline::new(constant(1.0)).extract_bytes(&pdf).unwrap();

    assert_eq!(extraction.source, OutlineSource::Empty);
    assert_eq!(
        extraction.to_json(JsonFormat::Compact).unwrap(),
        r#"{"title":"Scanned Letter","outline":[]}"#
    );
}

#[test]
fn test_json_shape() {
    let pdf = field_guide().build();
    let outline = extract_outline_bytes(&pdf, bold_below(20.0)).unwrap();
    let json = pdfoutline::render::to_json(&outline, JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"title":"Field Notes on Coastal Birds","outline":["#,
            r#"{"level":"H1","text":"Shorebirds","page":1},"#,
            r#"{"level":"H2","text":"Plovers","page":2}]}"#
        )
    );
}

#[test]
fn test_unreadable_input() {
    let result = extract_outline_bytes(b"<html>not a pdf</html>", constant(1.0));
    assert!(matches!(result, Err(Error::UnknownFormat)));

    let err = extract_outline_bytes(b"%PDF-x.y", constant(1.0)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion(_)));
    assert!(err.is_unreadable_document());
}

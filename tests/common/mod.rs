//! Shared helpers: synthetic PDFs built with lopdf and in-memory documents.

#![allow(dead_code)]

use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use pdfoutline::model::{RawDocument, RawLine, RawPage};
use pdfoutline::{FeatureVector, HeadingModel};

pub const PAGE_HEIGHT: f32 = 792.0;

/// One text run placed on a page.
#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    /// Baseline distance from the top of the page
    pub top: f32,
}

pub fn run(text: &str, size: f32, bold: bool, x: f32, top: f32) -> Run {
    Run {
        text: text.to_string(),
        size,
        bold,
        x,
        top,
    }
}

/// Description of a synthetic PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfSpec {
    pub title: Option<String>,
    pub pages: Vec<Vec<Run>>,
    /// (depth, title, 0-indexed page)
    pub bookmarks: Vec<(u8, String, usize)>,
}

impl PdfSpec {
    pub fn page(mut self, runs: Vec<Run>) -> Self {
        self.pages.push(runs);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn bookmark(mut self, depth: u8, title: &str, page: usize) -> Self {
        self.bookmarks.push((depth, title.to_string(), page));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        build_pdf(self)
    }
}

fn literal(text: &str) -> Object {
    Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
}

pub fn build_pdf(spec: &PdfSpec) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for runs in &spec.pages {
        let mut operations = Vec::new();
        for r in runs {
            let font = if r.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), r.size.into()]));
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    r.x.into(),
                    (PAGE_HEIGHT - r.top).into(),
                ],
            ));
            operations.push(Operation::new("Tj", vec![literal(&r.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap_or_default(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => regular, "F2" => bold },
            },
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| id.into()).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !spec.bookmarks.is_empty() {
        let outlines_id = add_outline_tree(&mut doc, &spec.bookmarks, &page_ids);
        catalog.set("Outlines", outlines_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = &spec.title {
        let info_id = doc.add_object(dictionary! { "Title" => literal(title) });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Link a depth-annotated bookmark list into an `/Outlines` tree.
fn add_outline_tree(
    doc: &mut Document,
    bookmarks: &[(u8, String, usize)],
    page_ids: &[ObjectId],
) -> ObjectId {
    let outlines_id = doc.new_object_id();
    let ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    // Parent index of each item (None = root) and children of each parent.
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(bookmarks.len());
    let mut stack: Vec<usize> = Vec::new();
    for (i, (depth, _, _)) in bookmarks.iter().enumerate() {
        while stack.len() > *depth as usize {
            stack.pop();
        }
        parents.push(stack.last().copied());
        stack.push(i);
    }
    let children = |parent: Option<usize>| -> Vec<usize> {
        (0..bookmarks.len()).filter(|&i| parents[i] == parent).collect()
    };

    for (i, (_, title, page)) in bookmarks.iter().enumerate() {
        let parent_id = parents[i].map(|p| ids[p]).unwrap_or(outlines_id);
        let mut item = dictionary! {
            "Title" => literal(title),
            "Parent" => parent_id,
            "Dest" => vec![page_ids[*page].into(), "Fit".into()],
        };
        let siblings = children(parents[i]);
        let pos = siblings.iter().position(|&s| s == i).unwrap();
        if pos > 0 {
            item.set("Prev", ids[siblings[pos - 1]]);
        }
        if pos + 1 < siblings.len() {
            item.set("Next", ids[siblings[pos + 1]]);
        }
        let kids = children(Some(i));
        if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
            item.set("First", ids[first]);
            item.set("Last", ids[last]);
            item.set("Count", kids.len() as i64);
        }
        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    let roots = children(None);
    let mut outlines = dictionary! { "Type" => "Outlines" };
    if let (Some(&first), Some(&last)) = (roots.first(), roots.last()) {
        outlines.set("First", ids[first]);
        outlines.set("Last", ids[last]);
        outlines.set("Count", roots.len() as i64);
    }
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));
    outlines_id
}

/// Model that accepts bold lines whose size is below `max_size`.
pub fn bold_below(max_size: f32) -> Arc<dyn HeadingModel> {
    Arc::new(move |f: &FeatureVector| {
        if f.is_bold > 0.5 && f.font_size < max_size {
            0.95_f32
        } else {
            0.05_f32
        }
    })
}

/// Model that gives every line the same score.
pub fn constant(score: f32) -> Arc<dyn HeadingModel> {
    Arc::new(move |_: &FeatureVector| score)
}

/// A raw line with its top edge at `y` (top-down coordinates).
pub fn raw_line(text: &str, x: f32, y: f32, size: f32, bold: bool) -> RawLine {
    let font = if bold { "Helvetica-Bold" } else { "Helvetica" };
    let width = text.chars().count() as f32 * size * 0.5;
    RawLine::new(text, (x, y, x + width, y + size), size, font)
}

/// In-memory document from (page, lines) pairs, US Letter pages.
pub fn raw_document(pages: Vec<Vec<RawLine>>) -> RawDocument {
    let mut doc = RawDocument::new();
    for (index, lines) in pages.into_iter().enumerate() {
        let mut page = RawPage::letter(index as u32);
        for line in lines {
            page.push(line);
        }
        doc.pages.push(page);
    }
    doc
}

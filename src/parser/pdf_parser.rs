//! PDF document reader using lopdf.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{Bookmark, RawDocument, RawPage};

use super::backend::{decode_pdf_string, LopdfBackend, PageId, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};
use super::page_labels::read_page_labels;

/// Bookmark trees deeper than this are truncated.
const MAX_BOOKMARK_DEPTH: u8 = 32;

/// PDF document reader.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        log::debug!("Opening {} ({})", path.display(), header);

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend, options })
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        sniff_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// PDF version of the loaded document.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Read the document into raw per-page lines plus document-level structures.
    pub fn parse(&self) -> Result<RawDocument> {
        let pages = self.backend.pages();
        let total_pages = pages.len() as u32;
        let limit = self
            .options
            .max_pages
            .map(|max| max.min(total_pages))
            .unwrap_or(total_pages);

        let mut document = RawDocument::new();
        document.title = self.metadata_title();

        let analyzer = LayoutAnalyzer::new(&self.backend);
        for (index, page_id) in pages.values().take(limit as usize).enumerate() {
            let index = index as u32;
            let page = self.parse_page(&analyzer, index, *page_id)?;
            document.pages.push(page);
        }

        if self.options.read_bookmarks {
            document.bookmarks = self.bookmarks(&pages);
        }
        if self.options.read_page_labels {
            document.page_labels = read_page_labels(self.backend.raw_doc(), total_pages);
        }

        log::debug!(
            "Read {} pages, {} lines, {} bookmarks",
            document.page_count(),
            document.line_count(),
            document.bookmarks.len()
        );
        Ok(document)
    }

    /// Read a single page.
    fn parse_page(
        &self,
        analyzer: &LayoutAnalyzer<'_, LopdfBackend>,
        index: u32,
        page_id: PageId,
    ) -> Result<RawPage> {
        let (width, height) = self.backend.page_size(page_id);
        let mut page = RawPage::new(index, width, height);

        match analyzer.extract_page_lines(page_id, height) {
            Ok(lines) => page.lines = lines,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(Error::TextExtract(format!("Page {}: {}", index + 1, e)));
                }
                log::warn!("Failed to extract text from page {}: {}", index + 1, e);
            }
        }

        Ok(page)
    }

    /// `/Title` from the document information dictionary.
    fn metadata_title(&self) -> Option<String> {
        let doc = self.backend.raw_doc();
        let info = match doc.trailer.get(b"Info").ok()? {
            Object::Reference(r) => doc.get_dictionary(*r).ok()?,
            Object::Dictionary(d) => d,
            _ => return None,
        };
        get_string_from_dict(info, b"Title")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Flatten the `/Outlines` tree depth-first.
    fn bookmarks(&self, pages: &BTreeMap<u32, PageId>) -> Vec<Bookmark> {
        let doc = self.backend.raw_doc();
        let Some(first) = doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|o| o.as_reference().ok())
            .and_then(|r| doc.get_dictionary(r).ok())
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|f| f.as_reference().ok())
        else {
            return Vec::new();
        };

        let page_index: BTreeMap<PageId, u32> = pages
            .values()
            .enumerate()
            .map(|(i, id)| (*id, i as u32))
            .collect();

        let mut items = Vec::new();
        let mut visited = HashSet::new();
        self.extract_outline_items(first, 0, &page_index, &mut visited, &mut items);
        items
    }

    /// Walk a sibling chain, recursing into children.
    fn extract_outline_items(
        &self,
        first: ObjectId,
        depth: u8,
        page_index: &BTreeMap<PageId, u32>,
        visited: &mut HashSet<ObjectId>,
        items: &mut Vec<Bookmark>,
    ) {
        if depth > MAX_BOOKMARK_DEPTH {
            return;
        }

        let doc = self.backend.raw_doc();
        let mut current = Some(first);
        while let Some(item_ref) = current {
            if !visited.insert(item_ref) {
                log::warn!("Cyclic bookmark tree at object {:?}", item_ref);
                return;
            }
            let Ok(item_dict) = doc.get_dictionary(item_ref) else {
                return;
            };

            let title = get_string_from_dict(item_dict, b"Title").unwrap_or_default();
            let page = self
                .outline_destination(item_dict)
                .and_then(|id| page_index.get(&id).copied());
            items.push(Bookmark {
                depth,
                title: title.trim().to_string(),
                page,
            });

            if let Ok(child) = item_dict.get(b"First").and_then(|o| o.as_reference()) {
                self.extract_outline_items(child, depth + 1, page_index, visited, items);
            }

            current = item_dict.get(b"Next").and_then(|o| o.as_reference()).ok();
        }
    }

    /// Destination page object of an outline item (`/Dest` or a GoTo `/A`).
    fn outline_destination(&self, item_dict: &Dictionary) -> Option<PageId> {
        let doc = self.backend.raw_doc();
        if let Ok(dest) = item_dict.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        let action = match item_dict.get(b"A").ok()? {
            Object::Reference(r) => doc.get_dictionary(*r).ok()?,
            Object::Dictionary(d) => d,
            _ => return None,
        };
        self.resolve_destination(action.get(b"D").ok()?, 0)
    }

    /// Resolve an explicit or named destination to a page object.
    fn resolve_destination(&self, dest: &Object, hops: u8) -> Option<PageId> {
        if hops > 4 {
            return None;
        }
        let doc = self.backend.raw_doc();
        match dest {
            Object::Array(array) => array.first()?.as_reference().ok(),
            Object::Reference(r) => self.resolve_destination(doc.get_object(*r).ok()?, hops + 1),
            Object::Dictionary(d) => self.resolve_destination(d.get(b"D").ok()?, hops + 1),
            Object::Name(name) | Object::String(name, _) => {
                let target = self.named_destination(name)?;
                self.resolve_destination(target, hops + 1)
            }
            _ => None,
        }
    }

    /// Look up a named destination in `/Dests` or the `/Names` tree.
    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let doc = self.backend.raw_doc();
        let catalog = doc.catalog().ok()?;

        if let Some(dests) = catalog.get(b"Dests").ok().and_then(|o| deref_dict(doc, o)) {
            if let Ok(found) = dests.get(name) {
                return Some(found);
            }
        }

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|o| deref_dict(doc, o))?
            .get(b"Dests")
            .ok()
            .and_then(|o| deref_dict(doc, o))?;
        find_in_name_tree(doc, tree, name, 0)
    }
}

fn deref_dict<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Dictionary(d) => Some(d),
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        _ => None,
    }
}

fn deref_array<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match obj {
        Object::Array(a) => Some(a),
        Object::Reference(r) => doc.get_object(*r).ok()?.as_array().ok(),
        _ => None,
    }
}

fn find_in_name_tree<'a>(
    doc: &'a lopdf::Document,
    node: &'a Dictionary,
    name: &[u8],
    depth: u8,
) -> Option<&'a Object> {
    if depth > 16 {
        return None;
    }
    if let Some(names) = node.get(b"Names").ok().and_then(|o| deref_array(doc, o)) {
        for pair in names.chunks_exact(2) {
            if let Object::String(key, _) = &pair[0] {
                if key.as_slice() == name {
                    return Some(&pair[1]);
                }
            }
        }
    }
    let kids = node.get(b"Kids").ok().and_then(|o| deref_array(doc, o))?;
    kids.iter()
        .filter_map(|kid| deref_dict(doc, kid))
        .find_map(|kid| find_in_name_tree(doc, kid, name, depth + 1))
}

/// Helper function to get a string from a dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Stream, StringFormat};

    /// Two-page document with metadata, a bookmark tree and text.
    fn sample_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });

        let mut kids = Vec::new();
        let mut page_ids = Vec::new();
        for text in ["Annual Report", "Chapter One"] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 20.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap_or_default(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            });
            kids.push(page_id.into());
            page_ids.push(page_id);
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
            }),
        );

        let outlines_id = doc.new_object_id();
        let child_id = doc.new_object_id();
        let top_id = doc.add_object(dictionary! {
            "Title" => Object::String(b"Chapter One".to_vec(), StringFormat::Literal),
            "Parent" => outlines_id,
            "Dest" => vec![page_ids[1].into(), "Fit".into()],
            "First" => child_id,
            "Last" => child_id,
        });
        doc.objects.insert(
            child_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::String(b"Section 1.1".to_vec(), StringFormat::Literal),
                "Parent" => top_id,
                "Dest" => vec![page_ids[1].into(), "Fit".into()],
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => top_id,
                "Last" => top_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(b"  Annual Report 2024 ".to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_parse_sample() {
        let parser = PdfParser::from_bytes(&sample_pdf()).unwrap();
        assert_eq!(parser.page_count(), 2);

        let raw = parser.parse().unwrap();
        assert_eq!(raw.title.as_deref(), Some("Annual Report 2024"));
        assert_eq!(raw.pages.len(), 2);
        assert_eq!(raw.pages[0].lines.len(), 1);

        let line = &raw.pages[1].lines[0];
        assert_eq!(line.text, "Chapter One");
        assert_eq!(line.font_size, 20.0);
        assert!(line.is_bold);
        assert!(line.y0 < 100.0);
    }

    #[test]
    fn test_bookmarks_flattened() {
        let raw = PdfParser::from_bytes(&sample_pdf()).unwrap().parse().unwrap();
        assert_eq!(
            raw.bookmarks,
            vec![
                Bookmark {
                    depth: 0,
                    title: "Chapter One".into(),
                    page: Some(1)
                },
                Bookmark {
                    depth: 1,
                    title: "Section 1.1".into(),
                    page: Some(1)
                },
            ]
        );
    }

    #[test]
    fn test_max_pages_and_disabled_bookmarks() {
        let options = ParseOptions::new().with_max_pages(1).with_bookmarks(false);
        let raw = PdfParser::from_bytes_with_options(&sample_pdf(), options)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(raw.pages.len(), 1);
        assert!(raw.bookmarks.is_empty());
    }

    #[test]
    fn test_rejects_non_pdf() {
        let err = PdfParser::from_bytes(b"PK\x03\x04 zip").err().unwrap();
        assert!(matches!(err, Error::UnknownFormat));
    }

    #[test]
    fn test_get_string_from_dict() {
        let dict = dictionary! {
            "Title" => Object::String(vec![0xFE, 0xFF, 0x00, 0x41], StringFormat::Hexadecimal),
            "Kind" => "Report",
        };
        assert_eq!(get_string_from_dict(&dict, b"Title").as_deref(), Some("A"));
        assert_eq!(get_string_from_dict(&dict, b"Kind").as_deref(), Some("Report"));
        assert!(get_string_from_dict(&dict, b"Missing").is_none());
    }
}

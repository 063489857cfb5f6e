//! `/PageLabels` number tree decoding.
//!
//! A PDF can give its pages printed labels ("i", "ii", "1", "A-3", ...)
//! independent of physical order. The outline pipeline uses them to map
//! printed table-of-contents page numbers to physical pages.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use super::backend::decode_pdf_string;

/// Numbering style of a label range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// 1, 2, 3
    Decimal,
    /// i, ii, iii
    LowerRoman,
    /// I, II, III
    UpperRoman,
    /// a, b, ..., z, aa
    LowerAlpha,
    /// A, B, ..., Z, AA
    UpperAlpha,
    /// Prefix only
    None,
}

impl LabelStyle {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"D" => LabelStyle::Decimal,
            b"r" => LabelStyle::LowerRoman,
            b"R" => LabelStyle::UpperRoman,
            b"a" => LabelStyle::LowerAlpha,
            b"A" => LabelStyle::UpperAlpha,
            _ => LabelStyle::Decimal,
        }
    }
}

/// One entry of the number tree: labels from `start_page` onward.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRange {
    /// First physical page (0-indexed) of the range
    pub start_page: u32,
    pub style: LabelStyle,
    pub prefix: String,
    /// Numeric value of the first page in the range
    pub start_value: u32,
}

impl LabelRange {
    pub fn new(start_page: u32, style: LabelStyle) -> Self {
        Self {
            start_page,
            style,
            prefix: String::new(),
            start_value: 1,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_start_value(mut self, value: u32) -> Self {
        self.start_value = value.max(1);
        self
    }

    /// Label of a physical page that falls in this range.
    fn label(&self, page: u32) -> String {
        let value = self.start_value + (page - self.start_page);
        let number = match self.style {
            LabelStyle::Decimal => value.to_string(),
            LabelStyle::LowerRoman => to_roman(value).to_lowercase(),
            LabelStyle::UpperRoman => to_roman(value),
            LabelStyle::LowerAlpha => to_alpha(value).to_lowercase(),
            LabelStyle::UpperAlpha => to_alpha(value),
            LabelStyle::None => String::new(),
        };
        format!("{}{}", self.prefix, number)
    }
}

/// Compute one label per physical page from the ranges.
///
/// Pages before the first range get plain decimal labels.
pub fn compute_labels(ranges: &[LabelRange], page_count: u32) -> Vec<String> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.start_page);

    (0..page_count)
        .map(|page| match sorted.iter().rev().find(|r| r.start_page <= page) {
            Some(range) => range.label(page),
            None => (page + 1).to_string(),
        })
        .collect()
}

/// Read the document's page labels.
///
/// Returns an empty vector when the catalog has no `/PageLabels`.
pub fn read_page_labels(doc: &LopdfDocument, page_count: u32) -> Vec<String> {
    let Some(root) = doc
        .catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"PageLabels").ok())
        .and_then(|obj| resolve_dict(doc, obj))
    else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    collect_ranges(doc, root, &mut ranges, 0);
    if ranges.is_empty() {
        return Vec::new();
    }
    log::debug!("Read {} page label ranges", ranges.len());
    compute_labels(&ranges, page_count)
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Dictionary(d) => Some(d),
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        _ => None,
    }
}

fn resolve_array<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match obj {
        Object::Array(a) => Some(a),
        Object::Reference(r) => doc.get_object(*r).ok()?.as_array().ok(),
        _ => None,
    }
}

/// Walk a number tree node. `/Kids` nesting is bounded to survive cycles.
fn collect_ranges(doc: &LopdfDocument, node: &Dictionary, out: &mut Vec<LabelRange>, depth: u8) {
    if depth > 16 {
        return;
    }

    if let Some(nums) = node.get(b"Nums").ok().and_then(|o| resolve_array(doc, o)) {
        for pair in nums.chunks_exact(2) {
            let Object::Integer(start) = pair[0] else {
                continue;
            };
            let Some(label_dict) = resolve_dict(doc, &pair[1]) else {
                continue;
            };
            out.push(parse_label_dict(start.max(0) as u32, label_dict));
        }
    }

    if let Some(kids) = node.get(b"Kids").ok().and_then(|o| resolve_array(doc, o)) {
        for kid in kids {
            if let Some(kid_dict) = resolve_dict(doc, kid) {
                collect_ranges(doc, kid_dict, out, depth + 1);
            }
        }
    }
}

fn parse_label_dict(start_page: u32, dict: &Dictionary) -> LabelRange {
    let style = match dict.get(b"S") {
        Ok(Object::Name(name)) => LabelStyle::from_name(name),
        _ => LabelStyle::None,
    };
    let mut range = LabelRange::new(start_page, style);
    if let Ok(Object::String(bytes, _)) = dict.get(b"P") {
        range.prefix = decode_pdf_string(bytes);
    }
    if let Ok(Object::Integer(n)) = dict.get(b"St") {
        range.start_value = (*n).max(1) as u32;
    }
    range
}

/// Uppercase roman numeral.
pub fn to_roman(mut n: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for &(value, numeral) in &NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Uppercase alphabetic label: A..Z, then AA..ZZ, AAA..
fn to_alpha(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let letter = (b'A' + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(repeat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_to_roman() {
        assert_eq!(to_roman(1), "I");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(9), "IX");
        assert_eq!(to_roman(14), "XIV");
        assert_eq!(to_roman(1994), "MCMXCIV");
    }

    #[test]
    fn test_to_alpha() {
        assert_eq!(to_alpha(1), "A");
        assert_eq!(to_alpha(26), "Z");
        assert_eq!(to_alpha(27), "AA");
        assert_eq!(to_alpha(28), "BB");
    }

    #[test]
    fn test_front_matter_then_decimal() {
        let ranges = vec![
            LabelRange::new(0, LabelStyle::LowerRoman),
            LabelRange::new(3, LabelStyle::Decimal),
        ];
        let labels = compute_labels(&ranges, 6);
        assert_eq!(labels, vec!["i", "ii", "iii", "1", "2", "3"]);
    }

    #[test]
    fn test_prefix_and_start_value() {
        let ranges = vec![LabelRange::new(0, LabelStyle::Decimal)
            .with_prefix("A-")
            .with_start_value(7)];
        assert_eq!(compute_labels(&ranges, 2), vec!["A-7", "A-8"]);
    }

    #[test]
    fn test_pages_before_first_range() {
        let ranges = vec![LabelRange::new(2, LabelStyle::UpperAlpha)];
        assert_eq!(compute_labels(&ranges, 4), vec!["1", "2", "A", "B"]);
    }

    #[test]
    fn test_read_inline_number_tree() {
        let mut doc = LopdfDocument::with_version("1.5");
        let labels = dictionary! {
            "Nums" => vec![
                Object::Integer(0),
                Object::Dictionary(dictionary! { "S" => "r" }),
                Object::Integer(2),
                Object::Dictionary(dictionary! { "S" => "D" }),
            ],
        };
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "PageLabels" => labels,
        });
        doc.trailer.set("Root", catalog_id);

        assert_eq!(read_page_labels(&doc, 4), vec!["i", "ii", "1", "2"]);
    }

    #[test]
    fn test_missing_page_labels() {
        let mut doc = LopdfDocument::with_version("1.5");
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog_id);
        assert!(read_page_labels(&doc, 3).is_empty());
    }
}

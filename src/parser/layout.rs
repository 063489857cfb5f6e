//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream into positioned, font-tagged text spans and
//! groups the spans into lines in reading order. Everything downstream of this
//! module works on [`RawLine`]s in top-down page coordinates.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{is_bold_font_name, RawLine};

use super::backend::{decode_text_simple, get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};

/// TJ adjustments larger than this (thousandths of an em) read as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size, used when the
/// font's width table is not consulted.
const AVG_GLYPH_ADVANCE: f32 = 0.5;

/// A text span with position and style information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF bottom-up coordinates)
    pub y: f32,
    /// Width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span; width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_ADVANCE;
        let is_bold = is_bold_font_name(&font_name);
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }
}

/// A text line composed of spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Baseline of the first span
    pub y: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        Self { spans, y }
    }

    /// Get the combined text of all spans.
    ///
    /// A space is inserted where the horizontal gap between spans exceeds
    /// 20% of the average character width, except between spaceless-script
    /// characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.right();

                let char_count = span.text.chars().count();
                let avg_char_width = if char_count > 0 && span.width > 0.0 {
                    span.width / char_count as f32
                } else {
                    span.font_size * AVG_GLYPH_ADVANCE
                };

                let boundary_is_spaceless = prev
                    .text
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false)
                    && span
                        .text
                        .chars()
                        .next()
                        .map(is_spaceless_script_char)
                        .unwrap_or(false);

                let already_spaced = result.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);

                if gap > avg_char_width * 0.2 && !boundary_is_spaceless && !already_spaced {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Character-weighted mean font size.
    pub fn font_size(&self) -> f32 {
        let total_chars: usize = self.spans.iter().map(|s| s.text.chars().count()).sum();
        if total_chars == 0 {
            return self.spans.first().map(|s| s.font_size).unwrap_or(0.0);
        }
        let weighted: f32 = self
            .spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        weighted / total_chars as f32
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .spans
            .iter()
            .filter(|s| s.is_bold)
            .map(|s| s.text.chars().count())
            .sum();
        let total_chars: usize = self.spans.iter().map(|s| s.text.chars().count()).sum();
        total_chars > 0 && bold_chars * 2 > total_chars
    }

    /// Font of the first span.
    pub fn font_name(&self) -> &str {
        self.spans.first().map(|s| s.font_name.as_str()).unwrap_or("")
    }

    /// Convert to a [`RawLine`] in top-down coordinates.
    pub fn to_raw(&self, page_height: f32) -> RawLine {
        let x0 = self
            .spans
            .iter()
            .map(|s| s.x)
            .fold(f32::INFINITY, f32::min);
        let x1 = self
            .spans
            .iter()
            .map(|s| s.right())
            .fold(f32::NEG_INFINITY, f32::max);
        let top = self
            .spans
            .iter()
            .map(|s| s.top())
            .fold(f32::NEG_INFINITY, f32::max);
        let bottom = self
            .spans
            .iter()
            .map(|s| s.bottom())
            .fold(f32::INFINITY, f32::min);

        let mut raw = RawLine::new(
            self.text(),
            (x0, page_height - top, x1, page_height - bottom),
            self.font_size(),
            self.font_name(),
        );
        raw.is_bold = self.is_bold();
        raw
    }
}

/// A detected column in the page layout.
#[derive(Debug, Clone)]
pub struct Column {
    /// Left boundary X coordinate
    pub left: f32,
    /// Right boundary X coordinate
    pub right: f32,
    /// Column index (0 = leftmost)
    pub index: usize,
}

impl Column {
    /// Check if a span belongs to this column by its left edge or center.
    pub fn contains_span(&self, span: &TextSpan) -> bool {
        let center = span.x + span.width / 2.0;
        (self.left..=self.right).contains(&span.x) || (self.left..=self.right).contains(&center)
    }
}

/// Page layout analyzer over any [`PdfBackend`].
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page: PageId) -> Result<Vec<TextSpan>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let content = self.backend.page_content(page)?;
        let ops = self.backend.decode_content(&content)?;

        Ok(interpret_content(&ops, &fonts, |font, bytes| {
            self.backend.decode_text(page, font, bytes)
        }))
    }

    /// Extract the page's lines in reading order, top-down coordinates.
    pub fn extract_page_lines(&self, page: PageId, page_height: f32) -> Result<Vec<RawLine>> {
        let spans = self.extract_page_spans(page)?;
        let lines = group_spans_into_lines(spans);
        Ok(lines
            .iter()
            .map(|line| line.to_raw(page_height))
            .filter(|raw| !raw.text.trim().is_empty())
            .collect())
    }
}

/// 2D affine matrix in PDF row-vector convention `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n = |i: usize| get_number_from_value(&operands[i]);
        Some(Self {
            a: n(0)?,
            b: n(1)?,
            c: n(2)?,
            d: n(3)?,
            e: n(4)?,
            f: n(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state while walking a content stream.
#[derive(Debug, Clone, Default)]
struct TextState {
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }
}

/// Interpret content stream operations into text spans.
///
/// `fonts` maps font resource names to base font names; `decode` turns a
/// string operand into text for the given font resource.
pub fn interpret_content<F>(
    ops: &[ContentOp],
    fonts: &HashMap<Vec<u8>, String>,
    decode: F,
) -> Vec<TextSpan>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut spans = Vec::new();
    let mut ctm = Matrix::IDENTITY;
    let mut ctm_stack: Vec<Matrix> = Vec::new();
    let mut state = TextState {
        font_size: 12.0,
        ..TextState::default()
    };
    let mut in_text_block = false;

    for op in ops {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    ctm = m.then(&ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                state.tm = Matrix::IDENTITY;
                state.tlm = Matrix::IDENTITY;
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if let (Some(PdfValue::Name(key)), Some(size)) = (operands.first(), operands.get(1))
                {
                    state.font_name = fonts
                        .get(key)
                        .filter(|name| !name.is_empty())
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                    state.font_key = key.clone();
                    state.font_size = get_number_from_value(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(tl) = operands.first().and_then(get_number_from_value) {
                    state.leading = tl;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number_from_value(&operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    state.tm = m;
                    state.tlm = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "TJ" | "'" | "\"" => {
                if op.operator == "'" || op.operator == "\"" {
                    state.next_line();
                }
                if !in_text_block {
                    continue;
                }

                let text = match op.operator.as_str() {
                    "TJ" => match operands.first() {
                        Some(PdfValue::Array(items)) => {
                            decode_tj_array(items, |bytes| decode(&state.font_key, bytes))
                        }
                        _ => String::new(),
                    },
                    "\"" => string_operand(operands.get(2), |b| decode(&state.font_key, b)),
                    _ => string_operand(operands.first(), |b| decode(&state.font_key, b)),
                };

                let advance = text.chars().count() as f32 * state.font_size * AVG_GLYPH_ADVANCE;
                if !text.trim().is_empty() {
                    let rendering = state.tm.then(&ctm);
                    let size = state.font_size * rendering.vertical_scale();
                    let mut span =
                        TextSpan::new(text, rendering.e, rendering.f, size, state.font_name.clone());
                    span.width = advance * rendering.horizontal_scale();
                    spans.push(span);
                }
                state.tm = Matrix::translation(advance, 0.0).then(&state.tm);
            }
            _ => {}
        }
    }

    spans
}

fn string_operand<F: Fn(&[u8]) -> String>(value: Option<&PdfValue>, decode: F) -> String {
    match value {
        Some(PdfValue::Str(bytes)) => decode(bytes),
        _ => String::new(),
    }
}

/// Decode a TJ array, turning large negative kerning into word spaces.
fn decode_tj_array<F: Fn(&[u8]) -> String>(items: &[PdfValue], decode: F) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                let needs_space = adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                    && !combined
                        .chars()
                        .last()
                        .map(is_spaceless_script_char)
                        .unwrap_or(false);
                if needs_space {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Group spans into lines in reading order, respecting column boundaries.
///
/// In two-column layouts each column is read top to bottom before the next.
pub fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    let columns = detect_columns(&spans);
    if columns.len() <= 1 {
        return group_single_column(spans);
    }

    log::debug!("Detected {} columns", columns.len());
    let mut column_spans: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
    for span in spans {
        let col_idx = columns
            .iter()
            .position(|c| c.contains_span(&span))
            .unwrap_or(0);
        column_spans[col_idx].push(span);
    }

    // Full-width lines (titles, headings spanning the gutter) end up in the
    // left column; keep columns sequential so headings precede their body.
    column_spans.into_iter().flat_map(group_single_column).collect()
}

/// Y-based line grouping for a single column.
fn group_single_column(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    // PDF Y is bottom-up: descending Y is top to bottom.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Detect a two-column layout from a vertical gutter free of text.
fn detect_columns(spans: &[TextSpan]) -> Vec<Column> {
    let min_x = spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let max_x = spans
        .iter()
        .map(|s| s.right())
        .fold(f32::NEG_INFINITY, f32::max);
    let single = vec![Column {
        left: min_x - 10.0,
        right: max_x + 10.0,
        index: 0,
    }];

    let extent = max_x - min_x;
    if extent < 250.0 || spans.len() < 20 {
        return single;
    }

    let slice_width = 3.0;
    let num_slices = (extent / slice_width) as usize + 1;
    let mut occupancy = vec![0usize; num_slices];
    for span in spans {
        let start = ((span.x - min_x) / slice_width) as usize;
        let end = (((span.right()) - min_x) / slice_width) as usize;
        for slot in occupancy
            .iter_mut()
            .take(end.min(num_slices - 1) + 1)
            .skip(start)
        {
            *slot += 1;
        }
    }

    // Widest empty run in the middle 70% of the text extent.
    let search = (num_slices * 15 / 100)..(num_slices * 85 / 100);
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = None;
    for i in search.clone() {
        if occupancy[i] == 0 {
            run_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = run_start.take() {
            let len = i - start;
            if best.map(|(_, l)| len > l).unwrap_or(true) {
                best = Some((start, len));
            }
        }
    }
    if let Some(start) = run_start {
        let len = search.end - start;
        if best.map(|(_, l)| len > l).unwrap_or(true) {
            best = Some((start, len));
        }
    }

    let Some((gap_start, gap_len)) = best else {
        return single;
    };
    if gap_len as f32 * slice_width < 12.0 {
        return single;
    }

    let gutter = min_x + (gap_start as f32 + gap_len as f32 / 2.0) * slice_width;
    if gutter - min_x < 80.0 || max_x - gutter < 80.0 {
        return single;
    }

    let left = spans.iter().filter(|s| s.x + s.width / 2.0 < gutter).count();
    let right = spans.len() - left;
    let min_spans = (spans.len() / 10).max(2);
    if left < min_spans || right < min_spans {
        return single;
    }

    vec![
        Column {
            left: min_x - 10.0,
            right: gutter,
            index: 0,
        },
        Column {
            left: gutter,
            right: max_x + 10.0,
            index: 1,
        },
    ]
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Decoder used when no backend is involved (tests, synthetic streams).
pub fn simple_decoder(_font: &[u8], bytes: &[u8]) -> String {
    decode_text_simple(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp::new(operator, operands)
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn fonts() -> HashMap<Vec<u8>, String> {
        let mut fonts = HashMap::new();
        fonts.insert(b"F1".to_vec(), "Helvetica".to_string());
        fonts.insert(b"F2".to_vec(), "Helvetica-Bold".to_string());
        fonts
    }

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, "Times-Roman".to_string())
    }

    #[test]
    fn test_text_span_bold_detection() {
        assert!(span("x", 0.0, 0.0, 12.0).width > 0.0);
        let bold = TextSpan::new("T".into(), 0.0, 0.0, 12.0, "Helvetica-Bold".into());
        assert!(bold.is_bold);
        let oblique = TextSpan::new("T".into(), 0.0, 0.0, 12.0, "Helvetica-Oblique".into());
        assert!(!oblique.is_bold);
    }

    #[test]
    fn test_interpret_tm_and_tf() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(18.0)]),
            op("Tm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(72.0), num(700.0)]),
            op("Tj", vec![PdfValue::Str(b"Introduction".to_vec())]),
            op("ET", vec![]),
        ];
        let spans = interpret_content(&ops, &fonts(), simple_decoder);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Introduction");
        assert_eq!(spans[0].x, 72.0);
        assert_eq!(spans[0].y, 700.0);
        assert_eq!(spans[0].font_size, 18.0);
        assert!(spans[0].is_bold);
    }

    #[test]
    fn test_interpret_td_is_relative_to_line_start() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            op("Td", vec![num(100.0), num(500.0)]),
            op("Tj", vec![PdfValue::Str(b"first".to_vec())]),
            op("Td", vec![num(0.0), num(-14.0)]),
            op("Tj", vec![PdfValue::Str(b"second".to_vec())]),
            op("ET", vec![]),
        ];
        let spans = interpret_content(&ops, &fonts(), simple_decoder);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].x, 100.0);
        assert_eq!(spans[1].y, 486.0);
    }

    #[test]
    fn test_interpret_cm_scales_font() {
        let ops = vec![
            op("q", vec![]),
            op("cm", vec![num(2.0), num(0.0), num(0.0), num(2.0), num(0.0), num(0.0)]),
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(9.0)]),
            op("Td", vec![num(10.0), num(20.0)]),
            op("Tj", vec![PdfValue::Str(b"Scaled".to_vec())]),
            op("ET", vec![]),
            op("Q", vec![]),
        ];
        let spans = interpret_content(&ops, &fonts(), simple_decoder);
        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!(spans[0].x, 20.0);
        assert_eq!(spans[0].y, 40.0);
    }

    #[test]
    fn test_tj_array_word_spacing() {
        let items = vec![
            PdfValue::Str(b"Table".to_vec()),
            PdfValue::Integer(-250),
            PdfValue::Str(b"of".to_vec()),
            PdfValue::Integer(-30),
            PdfValue::Str(b"Contents".to_vec()),
        ];
        assert_eq!(decode_tj_array(&items, decode_text_simple), "Table ofContents");
    }

    #[test]
    fn test_group_spans_into_lines() {
        let spans = vec![
            span("World", 130.0, 700.0, 12.0),
            span("Hello", 100.0, 700.5, 12.0),
            span("Next line", 100.0, 680.0, 12.0),
        ];
        let lines = group_spans_into_lines(spans);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[1].text(), "Next line");
    }

    #[test]
    fn test_line_to_raw_flips_coordinates() {
        let line = TextLine::from_spans(vec![span("Title", 100.0, 700.0, 20.0)]);
        let raw = line.to_raw(792.0);
        assert_eq!(raw.x0, 100.0);
        assert!((raw.y0 - (792.0 - 716.0)).abs() < 1e-3);
        assert!((raw.y1 - (792.0 - 696.0)).abs() < 1e-3);
        assert!(raw.y0 < raw.y1);
        assert_eq!(raw.font_size, 20.0);
    }

    #[test]
    fn test_line_style_summary() {
        let mut bold = span("Bold heading", 0.0, 0.0, 14.0);
        bold.font_name = "Arial-Bold".into();
        bold.is_bold = true;
        let plain = span("x", 200.0, 0.0, 10.0);
        let line = TextLine::from_spans(vec![bold, plain]);
        assert!(line.is_bold());
        assert_eq!(line.font_name(), "Arial-Bold");
        assert!(line.font_size() > 13.0);
    }

    #[test]
    fn test_column_contains_span() {
        let col = Column {
            left: 100.0,
            right: 200.0,
            index: 0,
        };
        let mut inside = span("Test", 120.0, 0.0, 12.0);
        inside.width = 50.0;
        assert!(col.contains_span(&inside));

        let mut straddling = span("Test", 90.0, 0.0, 12.0);
        straddling.width = 40.0;
        assert!(col.contains_span(&straddling));

        let mut outside = span("Test", 250.0, 0.0, 12.0);
        outside.width = 30.0;
        assert!(!col.contains_span(&outside));
    }

    #[test]
    fn test_two_column_reading_order() {
        let mut spans = Vec::new();
        for i in 0..15 {
            let y = 700.0 - i as f32 * 14.0;
            let mut left = span(&format!("left {i}"), 72.0, y, 10.0);
            left.width = 200.0;
            let mut right = span(&format!("right {i}"), 330.0, y, 10.0);
            right.width = 200.0;
            spans.push(left);
            spans.push(right);
        }
        let lines = group_spans_into_lines(spans);
        assert_eq!(lines.len(), 30);
        assert_eq!(lines[0].text(), "left 0");
        assert_eq!(lines[14].text(), "left 14");
        assert_eq!(lines[15].text(), "right 0");
    }
}

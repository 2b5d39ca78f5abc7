//! Line-aware text from a page content stream.
//!
//! Shown strings accumulate on the current line. A line ends at `T*`, at the
//! `'` and `"` operators (which move to the next line before showing), and
//! whenever the text position moves vertically through `Td`, `TD`, `Tm` or a
//! new `BT` block placed at another height. A horizontal move on the same
//! line reads as a word gap.

use lopdf::content::Operation;
use lopdf::{Document, Object};
use std::collections::BTreeMap;

/// TJ adjustments below this (thousandths of text space) read as a word gap
const TJ_SPACE_THRESHOLD: f32 = -100.0;

/// Vertical moves smaller than this stay on the same line
const SAME_LINE_EPSILON: f32 = 0.5;

/// Font resource name to the encoding name of that font
pub type FontEncodings<'a> = BTreeMap<Vec<u8>, &'a str>;

/// Collect the font encodings a page can select with `Tf`
pub fn page_encodings(document: &Document, page_id: lopdf::ObjectId) -> FontEncodings<'_> {
    document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect()
}

#[derive(Default)]
struct LineWriter {
    text: String,
    line: String,
    /// Height of the text on `line`, once something was shown
    line_y: Option<f32>,
    y: f32,
    leading: f32,
    gap: bool,
}

impl LineWriter {
    fn end_line(&mut self) {
        if !self.line.is_empty() {
            self.text.push_str(&self.line);
            self.text.push('\n');
            self.line.clear();
        }
        self.line_y = None;
        self.gap = false;
    }

    fn next_line(&mut self) {
        self.end_line();
        self.y -= self.leading;
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.y += ty;
        if ty.abs() < SAME_LINE_EPSILON && tx != 0.0 {
            self.gap = true;
        }
    }

    fn move_to(&mut self, y: f32) {
        if (y - self.y).abs() < SAME_LINE_EPSILON {
            self.gap = true;
        }
        self.y = y;
    }

    fn show(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if self
            .line_y
            .is_some_and(|line_y| (line_y - self.y).abs() >= SAME_LINE_EPSILON)
        {
            self.end_line();
        }
        if self.gap
            && !self.line.is_empty()
            && !self.line.ends_with(char::is_whitespace)
            && !s.starts_with(char::is_whitespace)
        {
            self.line.push(' ');
        }
        self.gap = false;
        self.line.push_str(s);
        self.line_y = Some(self.y);
    }

    fn finish(mut self) -> String {
        self.end_line();
        self.text
    }
}

fn number(operands: &[Object], index: usize) -> f32 {
    operands
        .get(index)
        .and_then(|operand| operand.as_float().ok())
        .unwrap_or(0.0)
}

fn decode(encoding: Option<&str>, operand: Option<&Object>) -> String {
    match operand {
        Some(Object::String(bytes, _)) => Document::decode_text(encoding, bytes),
        _ => String::new(),
    }
}

/// Decode one TJ array: strings joined, wide negative kerning as spaces
fn decode_array(encoding: Option<&str>, operand: Option<&Object>) -> String {
    let mut out = String::new();
    let Some(Object::Array(items)) = operand else {
        return out;
    };
    for item in items {
        match item {
            Object::String(bytes, _) => out.push_str(&Document::decode_text(encoding, bytes)),
            Object::Integer(_) | Object::Real(_) => {
                let adjust = item.as_float().unwrap_or(0.0);
                if adjust < TJ_SPACE_THRESHOLD && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
    out
}

/// Render the text operators of a page as newline-separated lines
pub fn page_lines(operations: &[Operation], encodings: &FontEncodings<'_>) -> String {
    let mut writer = LineWriter::default();
    let mut encoding: Option<&str> = None;

    for operation in operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                writer.y = 0.0;
                writer.gap = true;
            }
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "TL" => writer.leading = number(operands, 0),
            "Td" => writer.move_by(number(operands, 0), number(operands, 1)),
            "TD" => {
                writer.leading = -number(operands, 1);
                writer.move_by(number(operands, 0), number(operands, 1));
            }
            "Tm" => writer.move_to(number(operands, 5)),
            "T*" => writer.next_line(),
            "Tj" => writer.show(&decode(encoding, operands.first())),
            "TJ" => writer.show(&decode_array(encoding, operands.first())),
            "'" => {
                writer.next_line();
                writer.show(&decode(encoding, operands.first()));
            }
            "\"" => {
                writer.next_line();
                writer.show(&decode(encoding, operands.get(2)));
            }
            _ => {}
        }
    }

    writer.finish()
}

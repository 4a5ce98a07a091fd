use super::tree::{inherited_attribute, resolve_dictionary};
use super::PdfDocument;
use crate::page_range::PageIndexSet;
use anyhow::{anyhow, Context, Result};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::str::FromStr;

/// US Letter, used when no `/MediaBox` is found anywhere up the page tree.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Average Helvetica-Bold glyph advance, in text space units per point.
const AVERAGE_GLYPH_WIDTH: f32 = 0.58;
/// Helvetica-Bold cap height, in text space units per point.
const CAP_HEIGHT: f32 = 0.72;

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parses `#RRGGBB` (the `#` is optional, hex digits are case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow!("Invalid colour {:?} (expected #RRGGBB)", s));
        }
        let channel = |at: usize| -> Result<f32> {
            let value = u8::from_str_radix(&hex[at..at + 2], 16)
                .with_context(|| format!("Invalid colour {:?}", s))?;
            Ok(f32::from(value) / 255.0)
        };
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Text stamped diagonally across a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    pub text: String,
    pub font_size: f32,
    /// Fill opacity, `0.0` (invisible) to `1.0` (solid).
    pub opacity: f32,
    /// Counter-clockwise, in degrees.
    pub rotation: f32,
    pub color: Rgb,
}

impl Default for Watermark {
    fn default() -> Self {
        Watermark {
            text: "CONFIDENTIAL".to_string(),
            font_size: 50.0,
            opacity: 0.5,
            rotation: 45.0,
            color: Rgb {
                r: 1.0,
                g: 0.0,
                b: 0.0,
            },
        }
    }
}

impl Watermark {
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            anyhow::bail!("Watermark text is empty");
        }
        if !(self.font_size > 0.0 && self.font_size.is_finite()) {
            anyhow::bail!("Invalid font size: {}", self.font_size);
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            anyhow::bail!("Invalid opacity: {} (must be between 0 and 1)", self.opacity);
        }
        if !self.rotation.is_finite() {
            anyhow::bail!("Invalid rotation: {}", self.rotation);
        }
        Ok(())
    }

    /// The text as a WinAnsi literal; characters outside Latin-1 become `?`.
    fn encoded_text(&self) -> Vec<u8> {
        self.text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect()
    }

    /// Drawing operations that centre the text on `media_box`, rotated about
    /// the box centre.
    fn operations(&self, media_box: [f32; 4], font: &str, state: &str) -> Vec<Operation> {
        let [x0, y0, x1, y1] = media_box;
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

        let half_width =
            self.text.chars().count() as f32 * self.font_size * AVERAGE_GLYPH_WIDTH / 2.0;
        let half_height = self.font_size * CAP_HEIGHT / 2.0;

        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let tx = cx - (cos * half_width - sin * half_height);
        let ty = cy - (sin * half_width + cos * half_height);

        vec![
            Operation::new("Q", vec![]),
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(state.as_bytes().to_vec())]),
            Operation::new(
                "rg",
                vec![
                    Object::Real(self.color.r),
                    Object::Real(self.color.g),
                    Object::Real(self.color.b),
                ],
            ),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Real(self.font_size)],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(cos),
                    Object::Real(sin),
                    Object::Real(-sin),
                    Object::Real(cos),
                    Object::Real(tx),
                    Object::Real(ty),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(self.encoded_text(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]
    }
}

impl PdfDocument {
    /// Stamp `mark` over every selected page. Returns how many pages were
    /// stamped.
    pub fn watermark_pages(
        &mut self,
        selection: &PageIndexSet,
        mark: &Watermark,
    ) -> Result<usize> {
        mark.validate()?;

        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let state_id = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => Object::Real(mark.opacity),
            "CA" => Object::Real(mark.opacity),
        });
        // Isolates the existing content's graphics state from the stamp.
        let save_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

        let mut stamped = 0;
        for (num, page_id) in self.page_ids() {
            if !selection.contains(num - 1) {
                continue;
            }
            stamp_page(&mut self.doc, page_id, mark, font_id, state_id, save_id)
                .with_context(|| format!("Failed to watermark page {}", num))?;
            stamped += 1;
        }

        debug!("Stamped {:?} on {} page(s)", mark.text, stamped);
        Ok(stamped)
    }
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    mark: &Watermark,
    font_id: ObjectId,
    state_id: ObjectId,
    save_id: ObjectId,
) -> Result<()> {
    let media_box = media_box(doc, page_id)?;

    let mut resources = inherited_attribute(doc, page_id, b"Resources")?
        .and_then(|value| resolve_dictionary(doc, value))
        .unwrap_or_default();
    let font = add_resource(doc, &mut resources, b"Font", "WmFont", font_id);
    let state = add_resource(doc, &mut resources, b"ExtGState", "WmState", state_id);

    let content = Content {
        operations: mark.operations(media_box, &font, &state),
    };
    // Streams are concatenated as-is, so keep the leading `Q` apart from
    // whatever operator ended the previous stream.
    let mut stamp = b"\n".to_vec();
    stamp.extend(content.encode()?);
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp));

    let page = doc.get_dictionary_mut(page_id)?;
    let mut contents = vec![Object::Reference(save_id)];
    match page.get(b"Contents") {
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        Ok(existing) => contents.push(existing.clone()),
        Err(_) => {}
    }
    contents.push(Object::Reference(stamp_id));

    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Register `target` in the `category` sub-dictionary of `resources` under a
/// name not already taken, and return that name.
fn add_resource(
    doc: &Document,
    resources: &mut Dictionary,
    category: &[u8],
    base: &str,
    target: ObjectId,
) -> String {
    let mut entries = resources
        .get(category)
        .ok()
        .and_then(|value| resolve_dictionary(doc, value))
        .unwrap_or_default();

    let mut name = base.to_string();
    let mut n = 1;
    while entries.has(name.as_bytes()) {
        n += 1;
        name = format!("{}{}", base, n);
    }

    entries.set(name.as_bytes().to_vec(), Object::Reference(target));
    resources.set(category.to_vec(), Object::Dictionary(entries));
    name
}

fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4]> {
    let Some(value) = inherited_attribute(doc, page_id, b"MediaBox")? else {
        return Ok(DEFAULT_MEDIA_BOX);
    };
    let array = match value {
        Object::Reference(id) => doc.get_object(*id)?.as_array()?,
        other => other.as_array()?,
    };

    let numbers: Vec<f32> = array
        .iter()
        .map(Object::as_float)
        .collect::<lopdf::Result<_>>()?;
    match numbers[..] {
        [a, b, c, d] => Ok([a.min(c), b.min(d), a.max(c), b.max(d)]),
        _ => Err(anyhow!("MediaBox has {} entries, expected 4", numbers.len())),
    }
}

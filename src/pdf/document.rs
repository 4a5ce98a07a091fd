use super::tree::inherited_attribute;
use crate::page_range::{OutputGroup, PageIndexSet};
use anyhow::{anyhow, Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::num::NonZeroU32;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Right, // 90° clockwise
    Down,  // 180°
    Left,  // 90° counter-clockwise
}

impl Rotation {
    /// Accepts any multiple of 90, including negative ones.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(anyhow!(
                "Invalid rotation: {} (must be a multiple of 90)",
                degrees
            ));
        }
        Ok(match degrees.rem_euclid(360) {
            90 => Rotation::Right,
            180 => Rotation::Down,
            270 => Rotation::Left,
            _ => Rotation::None,
        })
    }

    pub fn degrees(self) -> i64 {
        match self {
            Rotation::None => 0,
            Rotation::Right => 90,
            Rotation::Down => 180,
            Rotation::Left => 270,
        }
    }
}

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// The page count as the range resolver wants it; a document without
    /// pages cannot be split, extracted or rotated.
    pub fn page_count_nonzero(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.page_count())
            .ok_or_else(|| anyhow!("PDF has no pages: {}", self.path))
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Build a new document holding only the pages of `group`.
    pub fn extract_group(&self, group: &OutputGroup) -> Result<Document> {
        let total = self.page_count();
        let keep = group.page_numbers();

        if let Some(&page) = keep.iter().find(|&&page| page == 0 || page > total) {
            anyhow::bail!("Page {} is out of range (1-{})", page, total);
        }

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| !keep.contains(num))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Add `rotation` to the `/Rotate` of every selected page. Returns how
    /// many pages were touched.
    pub fn rotate_pages(&mut self, selection: &PageIndexSet, rotation: Rotation) -> Result<usize> {
        let mut rotated = 0;

        for (num, page_id) in self.page_ids() {
            if !selection.contains(num - 1) {
                continue;
            }

            let current = inherited_attribute(&self.doc, page_id, b"Rotate")
                .with_context(|| format!("Failed to read rotation of page {}", num))?
                .and_then(|value| value.as_i64().ok())
                .unwrap_or(0);
            let updated = (current + rotation.degrees()).rem_euclid(360);

            self.doc
                .get_dictionary_mut(page_id)
                .with_context(|| format!("Page {} is not a dictionary", num))?
                .set("Rotate", Object::Integer(updated));
            rotated += 1;
        }

        Ok(rotated)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

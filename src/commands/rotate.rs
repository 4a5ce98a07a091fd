use crate::page_range::{select_pages, BackwardSpan, PageIndexSet};
use crate::pdf::{PdfDocument, Rotation};
use anyhow::Result;
use log::warn;
use std::path::Path;

/// Rotate the selected pages of `input` by `degrees` and save to `output`.
/// An absent or unusable selection rotates every page. Returns the number of
/// pages rotated.
pub fn rotate<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    degrees: i64,
    pages: Option<&str>,
    policy: BackwardSpan,
    output: Q,
) -> Result<usize> {
    let rotation = Rotation::from_degrees(degrees)?;
    let mut doc = PdfDocument::open(&input)?;
    let page_count = doc.page_count_nonzero()?;

    let mut selection = select_pages(page_count, pages, policy);
    if selection.is_empty() {
        if pages.is_some_and(|p| !p.trim().is_empty()) {
            warn!("Page selection matched nothing, rotating all pages");
        }
        selection = PageIndexSet::all(page_count);
    }

    let rotated = doc.rotate_pages(&selection, rotation)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    Ok(rotated)
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    degrees: i64,
    pages: Option<&str>,
    policy: BackwardSpan,
    output: Q,
) -> Result<()> {
    let rotated = rotate(input, degrees, pages, policy, &output)?;

    println!(
        "Rotated {} page(s) by {}° into {}",
        rotated,
        degrees,
        output.as_ref().display()
    );

    Ok(())
}

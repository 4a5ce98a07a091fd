use crate::page_range::{select_pages, BackwardSpan, PageIndexSet};
use crate::pdf::{PdfDocument, Watermark};
use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};

/// `watermarked-<name>` next to the input.
pub fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(format!("watermarked-{}", name))
}

/// Stamp `mark` on the selected pages of `input` and save to `output`. Like
/// rotate, an absent or unusable selection covers every page. Returns the
/// number of pages stamped.
pub fn watermark<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    mark: &Watermark,
    pages: Option<&str>,
    policy: BackwardSpan,
    output: Q,
) -> Result<usize> {
    mark.validate()?;
    let mut doc = PdfDocument::open(&input)?;
    let page_count = doc.page_count_nonzero()?;

    let mut selection = select_pages(page_count, pages, policy);
    if selection.is_empty() {
        if pages.is_some_and(|p| !p.trim().is_empty()) {
            warn!("Page selection matched nothing, watermarking all pages");
        }
        selection = PageIndexSet::all(page_count);
    }

    let stamped = doc.watermark_pages(&selection, mark)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    Ok(stamped)
}

pub fn run<P: AsRef<Path>>(
    input: P,
    mark: &Watermark,
    pages: Option<&str>,
    policy: BackwardSpan,
    output: Option<&Path>,
) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input.as_ref()));
    let stamped = watermark(input, mark, pages, policy, &output)?;

    println!(
        "Watermarked {} page(s) with {:?} into {}",
        stamped,
        mark.text,
        output.display()
    );

    Ok(())
}

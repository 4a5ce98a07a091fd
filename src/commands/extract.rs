use crate::page_range::{plan_partition, select_pages, BackwardSpan};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

/// Write the pages selected by `pages` into `output`, returning how many
/// pages were written. Unlike `split`, an empty selection is an error.
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    policy: BackwardSpan,
    output: Q,
) -> Result<usize> {
    let doc = PdfDocument::open(&input)?;
    let page_count = doc.page_count_nonzero()?;

    let selection = select_pages(page_count, Some(pages), policy);
    if selection.is_empty() {
        anyhow::bail!("No valid pages selected by {:?} (1-{})", pages, page_count);
    }

    let plan = plan_partition(&selection, page_count);
    let mut new_doc = doc.extract_group(&plan.groups[0])?;
    PdfDocument::save(&mut new_doc, &output)?;

    Ok(selection.len())
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    policy: BackwardSpan,
    output: Q,
) -> Result<()> {
    let written = extract(input, pages, policy, &output)?;

    println!(
        "Extracted {} page(s) to {}",
        written,
        output.as_ref().display()
    );

    Ok(())
}

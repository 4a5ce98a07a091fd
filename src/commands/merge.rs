use crate::pdf::merge::merge_documents;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

/// Merge `inputs` in order into `output`, returning the merged page count.
pub fn merge<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<u32> {
    if inputs.len() < 2 {
        anyhow::bail!("At least 2 files are required to merge");
    }

    let documents = inputs
        .iter()
        .map(|input| PdfDocument::open(input).map(|pdf| pdf.doc))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = merge_documents(documents)?;
    let page_count = merged.get_pages().len() as u32;
    PdfDocument::save(&mut merged, &output)?;

    Ok(page_count)
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    let total_pages = merge(inputs, &output)?;

    println!(
        "Merged {} files ({} pages) into {}",
        inputs.len(),
        total_pages,
        output.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_labels, write_sample};
    use lopdf::Document;

    #[test]
    fn test_merge_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_sample(dir.path(), "a.pdf", 1);
        let second = write_sample(dir.path(), "b.pdf", 2);
        let output = dir.path().join("merged.pdf");

        assert_eq!(merge(&[&first, &second], &output).unwrap(), 3);

        let doc = Document::load(&output).unwrap();
        assert_eq!(page_labels(&doc), vec!["Page 1", "Page 1", "Page 2"]);
    }

    #[test]
    fn test_merge_single_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let only = write_sample(dir.path(), "a.pdf", 1);
        assert!(merge(&[&only], dir.path().join("merged.pdf")).is_err());
    }

    #[test]
    fn test_merge_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_sample(dir.path(), "a.pdf", 1);
        let missing = dir.path().join("missing.pdf");
        assert!(merge(&[&good, &missing], dir.path().join("merged.pdf")).is_err());
    }
}

use crate::page_range::{resolve_partition_plan_with, BackwardSpan, PartitionMode};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Serialize)]
pub struct SplitOutcome {
    pub mode: PartitionMode,
    pub page_count: u32,
    /// Files written to disk: one per group, or the single archive.
    pub outputs: Vec<PathBuf>,
    /// Member names inside the archive; empty unless zipping.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
}

/// Split `input` into `output_dir` following the partition plan for `pages`.
///
/// With no usable selection every page becomes `<stem>_page_<n>.pdf`;
/// otherwise the selected pages go into a single `<stem>_selected.pdf`.
/// With `zip` set those files are packed into `<stem>_split.zip` instead of
/// being written individually.
pub fn split<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    policy: BackwardSpan,
    output_dir: Q,
    zip: bool,
) -> Result<SplitOutcome> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let doc = PdfDocument::open(input)?;
    let page_count = doc.page_count_nonzero()?;
    let plan = resolve_partition_plan_with(page_count, pages, policy);

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    // Get the base name of the input file
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");

    let mut archive = if zip {
        let archive_path = output_dir.join(format!("{}_split.zip", stem));
        let file = File::create(&archive_path)
            .with_context(|| format!("Failed to create archive: {}", archive_path.display()))?;
        Some((archive_path, ZipWriter::new(file)))
    } else {
        None
    };
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut outputs = Vec::with_capacity(plan.groups.len());
    let mut entries = Vec::new();
    for group in &plan.groups {
        let file_name = match plan.mode {
            PartitionMode::EachPage => format!("{}_page_{}.pdf", stem, group.indices()[0] + 1),
            PartitionMode::Selected => format!("{}_selected.pdf", stem),
        };
        let mut new_doc = doc.extract_group(group)?;

        match archive.as_mut() {
            Some((archive_path, writer)) => {
                let mut bytes = Vec::new();
                new_doc
                    .save_to(&mut bytes)
                    .with_context(|| format!("Failed to write {}", file_name))?;
                writer
                    .start_file(file_name.as_str(), options)
                    .with_context(|| format!("Failed to add {}", file_name))?;
                writer.write_all(&bytes).with_context(|| {
                    format!("Failed to write {} to {}", file_name, archive_path.display())
                })?;
                info!("Added {} page(s) as {}", group.len(), file_name);
                entries.push(file_name);
            }
            None => {
                let output_path = output_dir.join(file_name);
                PdfDocument::save(&mut new_doc, &output_path)?;
                info!("Wrote {} page(s) to {}", group.len(), output_path.display());
                outputs.push(output_path);
            }
        }
    }

    if let Some((archive_path, writer)) = archive {
        writer
            .finish()
            .with_context(|| format!("Failed to finish archive: {}", archive_path.display()))?;
        info!("Wrote {} file(s) to {}", entries.len(), archive_path.display());
        outputs.push(archive_path);
    }

    Ok(SplitOutcome {
        mode: plan.mode,
        page_count: page_count.get(),
        outputs,
        entries,
    })
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    policy: BackwardSpan,
    output_dir: Q,
    zip: bool,
) -> Result<()> {
    let outcome = split(input, pages, policy, &output_dir, zip)?;

    if zip {
        for archive in &outcome.outputs {
            println!(
                "Packed {} file(s) into {}",
                outcome.entries.len(),
                archive.display()
            );
        }
        return Ok(());
    }

    match outcome.mode {
        PartitionMode::EachPage => println!(
            "Split {} pages into {}",
            outcome.page_count,
            output_dir.as_ref().display()
        ),
        PartitionMode::Selected => {
            for output in &outcome.outputs {
                println!("Extracted selected pages to {}", output.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_labels, write_sample};
    use lopdf::Document;
    use std::io::Read;

    #[test]
    fn test_split_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), "report.pdf", 3);
        let out = dir.path().join("out");

        let outcome = split(&input, None, BackwardSpan::Normalize, &out, false).unwrap();
        assert_eq!(outcome.mode, PartitionMode::EachPage);
        assert_eq!(
            outcome.outputs,
            vec![
                out.join("report_page_1.pdf"),
                out.join("report_page_2.pdf"),
                out.join("report_page_3.pdf"),
            ]
        );

        let second = Document::load(&outcome.outputs[1]).unwrap();
        assert_eq!(page_labels(&second), vec!["Page 2"]);
    }

    #[test]
    fn test_split_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), "report.pdf", 5);

        let outcome = split(
            &input,
            Some("4, 1-2, 2"),
            BackwardSpan::Normalize,
            dir.path(),
            false,
        )
        .unwrap();
        assert_eq!(outcome.mode, PartitionMode::Selected);
        assert_eq!(outcome.outputs, vec![dir.path().join("report_selected.pdf")]);

        let selected = Document::load(&outcome.outputs[0]).unwrap();
        assert_eq!(page_labels(&selected), vec!["Page 1", "Page 2", "Page 4"]);
    }

    #[test]
    fn test_split_invalid_selection_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), "report.pdf", 2);

        let outcome =
            split(&input, Some("abc,99"), BackwardSpan::Normalize, dir.path(), false).unwrap();
        assert_eq!(outcome.mode, PartitionMode::EachPage);
        assert_eq!(outcome.outputs.len(), 2);
    }

    #[test]
    fn test_split_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(split(&missing, None, BackwardSpan::Normalize, dir.path(), false).is_err());
    }

    #[test]
    fn test_split_into_zip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), "report.pdf", 3);

        let outcome = split(&input, None, BackwardSpan::Normalize, dir.path(), true).unwrap();
        assert_eq!(outcome.outputs, vec![dir.path().join("report_split.zip")]);
        assert_eq!(
            outcome.entries,
            vec!["report_page_1.pdf", "report_page_2.pdf", "report_page_3.pdf"]
        );
        assert!(!dir.path().join("report_page_1.pdf").exists());

        let file = File::open(&outcome.outputs[0]).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 3);

        let mut bytes = Vec::new();
        archive
            .by_name("report_page_3.pdf")
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        let page = Document::load_mem(&bytes).unwrap();
        assert_eq!(page_labels(&page), vec!["Page 3"]);
    }

    #[test]
    fn test_split_selection_into_zip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path(), "report.pdf", 4);

        let outcome =
            split(&input, Some("2-3"), BackwardSpan::Normalize, dir.path(), true).unwrap();
        assert_eq!(outcome.mode, PartitionMode::Selected);
        assert_eq!(outcome.entries, vec!["report_selected.pdf"]);
    }
}

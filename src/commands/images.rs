use crate::pdf::images::{images_to_document, PageImage};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct ImagesOutcome {
    pub page_count: usize,
    /// Inputs that were not JPEG or PNG.
    pub skipped: Vec<PathBuf>,
}

/// Convert JPEG and PNG `inputs` into one PDF at `output`, one page per
/// image, in the given order. Other formats are skipped; if nothing is left
/// the conversion fails.
pub fn images_to_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    inputs: &[P],
    output: Q,
) -> Result<ImagesOutcome> {
    let mut images = Vec::with_capacity(inputs.len());
    let mut skipped = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read image: {}", input.display()))?;

        match PageImage::from_bytes(bytes)
            .with_context(|| format!("Failed to decode image: {}", input.display()))?
        {
            Some(image) => {
                info!("{}: {}x{}", input.display(), image.width, image.height);
                images.push(image);
            }
            None => {
                warn!("Skipping {}: not a JPEG or PNG image", input.display());
                skipped.push(input.to_path_buf());
            }
        }
    }

    if images.is_empty() {
        anyhow::bail!("No JPEG or PNG images among {} input(s)", inputs.len());
    }

    let page_count = images.len();
    let mut doc = images_to_document(images)?;
    PdfDocument::save(&mut doc, &output)?;

    Ok(ImagesOutcome {
        page_count,
        skipped,
    })
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    let outcome = images_to_pdf(inputs, &output)?;

    println!(
        "Converted {} image(s) into {}",
        outcome.page_count,
        output.as_ref().display()
    );
    for path in &outcome.skipped {
        println!("Skipped {} (unsupported format)", path.display());
    }

    Ok(())
}

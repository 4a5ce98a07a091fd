use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands::{
    extract::extract, images::images_to_pdf, merge::merge, plan::plan, rotate::rotate,
    split::split, watermark::watermark,
};
use crate::page_range::BackwardSpan;
use crate::pdf::{Rgb, Watermark};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPlanRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5, 8, 11-13'). Omit to split every page.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Treat backward spans like '5-3' as selecting nothing (default: false, read as '3-5')")]
    #[serde(default)]
    pub ignore_backward_spans: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5, 8, 11-13'). Omit to split every page.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Directory to write the output files to")]
    pub output_dir: String,
    #[schemars(description = "Pack the output files into <name>_split.zip (default: false)")]
    #[serde(default)]
    pub zip: bool,
    #[schemars(description = "Treat backward spans like '5-3' as selecting nothing (default: false)")]
    #[serde(default)]
    pub ignore_backward_spans: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5,10,15-20')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Treat backward spans like '5-3' as selecting nothing (default: false)")]
    #[serde(default)]
    pub ignore_backward_spans: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "PDF files to merge, in order (at least two)")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRotateRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Clockwise rotation in degrees, a multiple of 90 (default: 90)")]
    #[serde(default = "default_degrees")]
    pub degrees: i64,
    #[schemars(description = "Page ranges to rotate. Omit to rotate every page.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Treat backward spans like '5-3' as selecting nothing (default: false)")]
    #[serde(default)]
    pub ignore_backward_spans: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfWatermarkRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Watermark text (default: CONFIDENTIAL)")]
    #[serde(default)]
    pub text: Option<String>,
    #[schemars(description = "Font size in points (default: 50)")]
    #[serde(default)]
    pub font_size: Option<f32>,
    #[schemars(description = "Opacity from 0 to 1 (default: 0.5)")]
    #[serde(default)]
    pub opacity: Option<f32>,
    #[schemars(description = "Counter-clockwise rotation in degrees (default: 45)")]
    #[serde(default)]
    pub rotation: Option<f32>,
    #[schemars(description = "Text colour as #RRGGBB (default: #FF0000)")]
    #[serde(default)]
    pub color: Option<String>,
    #[schemars(description = "Page ranges to watermark. Omit to watermark every page.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
    #[schemars(description = "Treat backward spans like '5-3' as selecting nothing (default: false)")]
    #[serde(default)]
    pub ignore_backward_spans: bool,
}

impl PdfWatermarkRequest {
    fn watermark(&self) -> Result<Watermark> {
        let defaults = Watermark::default();
        Ok(Watermark {
            text: self.text.clone().unwrap_or(defaults.text),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            rotation: self.rotation.unwrap_or(defaults.rotation),
            color: match &self.color {
                Some(hex) => hex.parse::<Rgb>()?,
                None => defaults.color,
            },
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfFromImagesRequest {
    #[schemars(description = "JPEG or PNG files, one page each, in order. Other formats are skipped.")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

fn default_degrees() -> i64 {
    90
}

fn span_policy(ignore_backward_spans: bool) -> BackwardSpan {
    if ignore_backward_spans {
        BackwardSpan::Ignore
    } else {
        BackwardSpan::Normalize
    }
}

fn to_json<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => format!("Error: {:#}", e),
    }
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Show how a PDF would be split for a page range expression, without writing files. Returns zero-based page index groups.")]
    fn pdf_plan(&self, Parameters(req): Parameters<PdfPlanRequest>) -> String {
        to_json(plan(
            &req.path,
            req.pages.as_deref(),
            span_policy(req.ignore_backward_spans),
        ))
    }

    #[tool(description = "Split a PDF. Without a usable page selection every page becomes its own file; otherwise the selected pages are extracted into one file. Optionally packs the files into a zip archive.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        to_json(split(
            &req.path,
            req.pages.as_deref(),
            span_policy(req.ignore_backward_spans),
            &req.output_dir,
            req.zip,
        ))
    }

    #[tool(description = "Extract specific pages from a PDF and save them to a new file")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let result = extract(
            &req.path,
            &req.pages,
            span_policy(req.ignore_backward_spans),
            &req.output,
        )
        .map(|page_count| ExtractResult {
            output_path: req.output.clone(),
            page_count,
        });
        to_json(result)
    }

    #[tool(description = "Combine two or more PDFs into one, in the given order")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        let result = merge(&req.inputs, &req.output).map(|page_count| MergeResult {
            output_path: req.output.clone(),
            input_count: req.inputs.len(),
            page_count,
        });
        to_json(result)
    }

    #[tool(description = "Rotate pages of a PDF clockwise by a multiple of 90 degrees")]
    fn pdf_rotate(&self, Parameters(req): Parameters<PdfRotateRequest>) -> String {
        let result = rotate(
            &req.path,
            req.degrees,
            req.pages.as_deref(),
            span_policy(req.ignore_backward_spans),
            &req.output,
        )
        .map(|rotated| RotateResult {
            output_path: req.output.clone(),
            rotated_pages: rotated,
            degrees: req.degrees,
        });
        to_json(result)
    }

    #[tool(description = "Stamp semi-transparent, rotated text across the pages of a PDF")]
    fn pdf_watermark(&self, Parameters(req): Parameters<PdfWatermarkRequest>) -> String {
        let result = req.watermark().and_then(|mark| {
            watermark(
                &req.path,
                &mark,
                req.pages.as_deref(),
                span_policy(req.ignore_backward_spans),
                &req.output,
            )
            .map(|stamped| WatermarkResult {
                output_path: req.output.clone(),
                watermarked_pages: stamped,
                text: mark.text,
            })
        });
        to_json(result)
    }

    #[tool(description = "Convert JPEG and PNG images into a PDF with one page per image, each page sized to its image")]
    fn pdf_from_images(&self, Parameters(req): Parameters<PdfFromImagesRequest>) -> String {
        let result = images_to_pdf(&req.inputs, &req.output).map(|outcome| ImagesResult {
            output_path: req.output.clone(),
            page_count: outcome.page_count,
            skipped: outcome
                .skipped
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        });
        to_json(result)
    }
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page tools. Use pdf_plan to preview how a page range expression splits a \
                 document, pdf_split to write the split files, pdf_extract to copy a page \
                 selection into a new PDF, pdf_merge to combine PDFs, pdf_rotate to turn pages, \
                 pdf_watermark to stamp text over pages and pdf_from_images to turn JPEG/PNG \
                 images into a PDF."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExtractResult {
    pub output_path: String,
    pub page_count: usize,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MergeResult {
    pub output_path: String,
    pub input_count: usize,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RotateResult {
    pub output_path: String,
    pub rotated_pages: usize,
    pub degrees: i64,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WatermarkResult {
    pub output_path: String,
    pub watermarked_pages: usize,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ImagesResult {
    pub output_path: String,
    pub page_count: usize,
    pub skipped: Vec<String>,
}

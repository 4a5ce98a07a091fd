use clap::{Args, Parser, Subcommand};
use pagesplit::page_range::BackwardSpan;
use pagesplit::pdf::Rgb;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagesplit")]
#[command(about = "Split, extract, merge, rotate and watermark PDF pages, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Copy)]
pub struct RangeOptions {
    /// How to read spans written backward, like "5-3"
    #[arg(long, value_enum, default_value_t = BackwardSpan::Normalize)]
    pub backward_spans: BackwardSpan,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Show how a PDF would be split, without writing anything
    Plan {
        /// PDF file to inspect
        path: PathBuf,

        /// Page ranges (e.g., "1-5, 8, 11-13"); omit to split every page
        #[arg(short, long)]
        pages: Option<String>,

        /// Print the plan as JSON (zero-based page indices)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        range: RangeOptions,
    },

    /// Split a PDF into one file per page, or extract a selection into one file
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Page ranges (e.g., "1-5, 8, 11-13"); omit to split every page
        #[arg(short, long)]
        pages: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Pack the output files into <name>_split.zip
        #[arg(long)]
        zip: bool,

        #[command(flatten)]
        range: RangeOptions,
    },

    /// Extract page ranges to a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-5,10,15-20")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        range: RangeOptions,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge (at least two)
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Rotate pages by a multiple of 90 degrees
    Rotate {
        /// PDF file to rotate
        path: PathBuf,

        /// Clockwise rotation in degrees (90, 180, 270, -90)
        #[arg(short, long, allow_hyphen_values = true, default_value = "90")]
        degrees: i64,

        /// Page ranges to rotate; omit to rotate every page
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        range: RangeOptions,
    },

    /// Stamp text across pages
    Watermark {
        /// PDF file to watermark
        path: PathBuf,

        /// Watermark text
        #[arg(short, long, default_value = "CONFIDENTIAL")]
        text: String,

        /// Font size in points
        #[arg(short, long, default_value_t = 50.0)]
        size: f32,

        /// Opacity from 0 (invisible) to 1 (solid)
        #[arg(long, default_value_t = 0.5)]
        opacity: f32,

        /// Counter-clockwise rotation in degrees
        #[arg(short, long, allow_hyphen_values = true, default_value_t = 45.0)]
        rotation: f32,

        /// Text colour as #RRGGBB
        #[arg(short, long, default_value = "#FF0000")]
        color: Rgb,

        /// Page ranges to watermark; omit to watermark every page
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file [default: watermarked-<name> next to the input]
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        range: RangeOptions,
    },

    /// Convert JPEG and PNG images to a PDF, one page per image
    #[command(alias = "jpg-to-pdf")]
    Images {
        /// Image files, in page order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

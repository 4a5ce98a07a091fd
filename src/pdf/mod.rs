pub mod document;
pub mod images;
pub mod merge;
#[cfg(test)]
pub mod testing;
pub mod tree;
pub mod watermark;

pub use document::{PdfDocument, Rotation};
pub use watermark::{Rgb, Watermark};

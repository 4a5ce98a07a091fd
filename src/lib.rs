//! PDF page tools built around a lenient page range resolver.
//!
//! [`page_range`] turns a page count and an optional expression like
//! `"1-3, 8, 10-11"` into a partition plan; [`pdf`] applies plans and
//! other page operations to documents through `lopdf`.

pub mod commands;
pub mod mcp;
pub mod page_range;
pub mod pdf;

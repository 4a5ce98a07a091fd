use crate::page_range::{
    resolve_partition_plan_with, BackwardSpan, PartitionMode, PartitionPlan,
};
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub path: String,
    pub page_count: u32,
    #[serde(flatten)]
    pub plan: PartitionPlan,
}

/// Open the PDF and work out how it would be split, without writing anything.
pub fn plan<P: AsRef<Path>>(
    path: P,
    pages: Option<&str>,
    policy: BackwardSpan,
) -> Result<PlanReport> {
    let doc = PdfDocument::open(&path)?;
    let page_count = doc.page_count_nonzero()?;

    Ok(PlanReport {
        path: doc.path,
        page_count: page_count.get(),
        plan: resolve_partition_plan_with(page_count, pages, policy),
    })
}

pub fn run<P: AsRef<Path>>(
    path: P,
    pages: Option<&str>,
    policy: BackwardSpan,
    json: bool,
) -> Result<()> {
    let report = plan(path, pages, policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", report.path);
    println!("Pages: {}", report.page_count);
    match report.plan.mode {
        PartitionMode::EachPage => {
            println!("Mode: each page ({} outputs)", report.plan.groups.len())
        }
        PartitionMode::Selected => println!("Mode: selected pages (1 output)"),
    }
    for (n, group) in report.plan.groups.iter().enumerate() {
        println!("  {}: pages {}", n + 1, format_pages(&group.page_numbers()));
    }

    Ok(())
}

/// Collapse consecutive page numbers, e.g. [1, 2, 3, 8] -> "1-3, 8".
fn format_pages(pages: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = pages.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(", ")
}

//! Page range selection for split-style tools.
//!
//! A range expression such as `"1-3, 8, 10-11"` is parsed leniently into
//! tokens, resolved against a page count into an ascending set of zero-based
//! indices, and finally turned into a [`PartitionPlan`]: either one output
//! per page (nothing usable selected) or one output with the selection.
//! Nothing in here fails; malformed and out-of-range input is dropped.

pub mod partition;
pub mod resolve;
pub mod token;

pub use partition::{plan_partition, OutputGroup, PartitionMode, PartitionPlan};
pub use resolve::{resolve_indices, BackwardSpan, PageIndexSet};
pub use token::{parse_range_expression, RangeToken};

use std::num::NonZeroU32;

/// Resolve an optional range expression into a partition plan, reading
/// backward spans like "5-3" as "3-5".
pub fn resolve_partition_plan(page_count: NonZeroU32, expr: Option<&str>) -> PartitionPlan {
    resolve_partition_plan_with(page_count, expr, BackwardSpan::default())
}

pub fn resolve_partition_plan_with(
    page_count: NonZeroU32,
    expr: Option<&str>,
    policy: BackwardSpan,
) -> PartitionPlan {
    let selection = select_pages(page_count, expr, policy);
    plan_partition(&selection, page_count)
}

/// The selected zero-based indices; empty when `expr` is absent, blank or
/// selects nothing valid.
pub fn select_pages(
    page_count: NonZeroU32,
    expr: Option<&str>,
    policy: BackwardSpan,
) -> PageIndexSet {
    match expr.map(str::trim) {
        None | Some("") => PageIndexSet::default(),
        Some(expr) => resolve_indices(&parse_range_expression(expr), page_count, policy),
    }
}

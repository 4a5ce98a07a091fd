use super::token::RangeToken;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::num::NonZeroU32;

/// How a span written backward, like "5-3", is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackwardSpan {
    /// Read "5-3" as "3-5".
    #[default]
    Normalize,
    /// "5-3" selects nothing.
    Ignore,
}

/// Ascending, duplicate-free zero-based page indices, all below the page
/// count they were resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageIndexSet(Vec<u32>);

impl PageIndexSet {
    /// Every page of a document.
    pub fn all(page_count: NonZeroU32) -> Self {
        PageIndexSet((0..page_count.get()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn into_indices(self) -> Vec<u32> {
        self.0
    }
}

impl FromIterator<u32> for PageIndexSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let unique: BTreeSet<u32> = iter.into_iter().collect();
        PageIndexSet(unique.into_iter().collect())
    }
}

/// Turn tokens into the set of selected zero-based indices.
///
/// Page numbers outside `1..=page_count` are dropped. Spans are clamped to
/// the document before iterating, so a span like "1-4000000000" costs no more
/// than the page count.
pub fn resolve_indices(
    tokens: &[RangeToken],
    page_count: NonZeroU32,
    policy: BackwardSpan,
) -> PageIndexSet {
    let total = page_count.get();
    let mut selected = BTreeSet::new();

    for token in tokens {
        match *token {
            RangeToken::Single(n) => {
                if (1..=total).contains(&n) {
                    selected.insert(n - 1);
                }
            }
            RangeToken::Span { start, end } => {
                let (low, high) = match policy {
                    BackwardSpan::Normalize => (start.min(end), start.max(end)),
                    BackwardSpan::Ignore => (start, end),
                };
                let low = low.max(1);
                let high = high.min(total);
                if low <= high {
                    selected.extend((low..=high).map(|page| page - 1));
                }
            }
        }
    }

    PageIndexSet(selected.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_range::token::parse_range_expression;

    fn resolve(expr: &str, total: u32) -> Vec<u32> {
        resolve_with(expr, total, BackwardSpan::Normalize)
    }

    fn resolve_with(expr: &str, total: u32, policy: BackwardSpan) -> Vec<u32> {
        let tokens = parse_range_expression(expr);
        resolve_indices(&tokens, NonZeroU32::new(total).unwrap(), policy).into_indices()
    }

    #[test]
    fn test_single_pages_are_zero_based() {
        assert_eq!(resolve("1,3", 5), vec![0, 2]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(resolve("1-3,2,3", 10), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_dropped() {
        assert_eq!(resolve("1,10,3", 5), vec![0, 2]);
        assert_eq!(resolve("0", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_span_clamped_to_document() {
        assert_eq!(resolve("4-9", 5), vec![3, 4]);
        assert_eq!(resolve("0-2", 5), vec![0, 1]);
        assert_eq!(resolve("7-9", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_huge_span_is_bounded() {
        assert_eq!(resolve("1-4000000000", 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_ascending_regardless_of_input_order() {
        assert_eq!(resolve("5,1,3", 10), vec![0, 2, 4]);
        assert_eq!(resolve("1,3,5", 10), vec![0, 2, 4]);
    }

    #[test]
    fn test_backward_span_normalized() {
        assert_eq!(resolve("5-3", 10), vec![2, 3, 4]);
    }

    #[test]
    fn test_backward_span_ignored() {
        assert_eq!(
            resolve_with("5-3", 10, BackwardSpan::Ignore),
            Vec::<u32>::new()
        );
        assert_eq!(resolve_with("5-3,7", 10, BackwardSpan::Ignore), vec![6]);
    }

    #[test]
    fn test_no_tokens_is_empty_selection() {
        assert!(resolve("abc,xyz", 4).is_empty());
    }

    #[test]
    fn test_index_set_helpers() {
        let set: PageIndexSet = vec![4, 1, 4, 2].into_iter().collect();
        assert_eq!(set.indices(), &[1, 2, 4]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(2));
        assert!(!set.contains(3));
        assert_eq!(
            PageIndexSet::all(NonZeroU32::new(3).unwrap()).indices(),
            &[0, 1, 2]
        );
    }
}

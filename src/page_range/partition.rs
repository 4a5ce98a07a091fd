use super::resolve::PageIndexSet;
use log::debug;
use serde::Serialize;
use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// Nothing usable was selected: one output per page.
    EachPage,
    /// One output holding every selected page.
    Selected,
}

/// Zero-based page indices destined for a single output document. Never
/// empty, always ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputGroup(Vec<u32>);

impl OutputGroup {
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// 1-based page numbers, as lopdf and humans count them.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.0.iter().map(|i| i + 1).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionPlan {
    pub mode: PartitionMode,
    pub groups: Vec<OutputGroup>,
}

impl PartitionPlan {
    pub fn each_page(page_count: NonZeroU32) -> Self {
        PartitionPlan {
            mode: PartitionMode::EachPage,
            groups: (0..page_count.get())
                .map(|i| OutputGroup(vec![i]))
                .collect(),
        }
    }

    pub fn group_indices(&self) -> Vec<&[u32]> {
        self.groups.iter().map(OutputGroup::indices).collect()
    }
}

/// Decide how the document's pages are split into outputs.
pub fn plan_partition(selection: &PageIndexSet, page_count: NonZeroU32) -> PartitionPlan {
    if selection.is_empty() {
        debug!(
            "No usable page selection, splitting all {} pages individually",
            page_count
        );
        return PartitionPlan::each_page(page_count);
    }

    debug!("Extracting {} selected page(s) into one document", selection.len());
    PartitionPlan {
        mode: PartitionMode::Selected,
        groups: vec![OutputGroup(selection.indices().to_vec())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_empty_selection_splits_every_page() {
        let plan = plan_partition(&PageIndexSet::default(), pages(3));
        assert_eq!(plan.mode, PartitionMode::EachPage);
        assert_eq!(plan.group_indices(), vec![&[0][..], &[1][..], &[2][..]]);
    }

    #[test]
    fn test_single_page_document() {
        let plan = plan_partition(&PageIndexSet::default(), pages(1));
        assert_eq!(plan.group_indices(), vec![&[0][..]]);
    }

    #[test]
    fn test_selection_becomes_one_group() {
        let selection: PageIndexSet = vec![7, 0, 2].into_iter().collect();
        let plan = plan_partition(&selection, pages(10));
        assert_eq!(plan.mode, PartitionMode::Selected);
        assert_eq!(plan.group_indices(), vec![&[0, 2, 7][..]]);
        assert_eq!(plan.groups[0].page_numbers(), vec![1, 3, 8]);
    }

    #[test]
    fn test_plan_serializes_zero_based() {
        let selection: PageIndexSet = vec![1, 3].into_iter().collect();
        let plan = plan_partition(&selection, pages(4));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mode": "selected", "groups": [[1, 3]] })
        );
    }
}

pub mod extract;
pub mod images;
pub mod merge;
pub mod plan;
pub mod rotate;
pub mod split;
pub mod watermark;

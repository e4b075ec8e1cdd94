//! Skill matching pipeline: segmentation, candidate filtering, extraction,
//! and CV / job description comparison

pub mod comparator;
pub mod extractor;
pub mod filter;
pub mod segmenter;

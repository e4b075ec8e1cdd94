//! Skill matcher library
//!
//! Extracts canonical skills from free-form text by embedding similarity
//! against a fixed taxonomy, and compares two extractions (CV vs job
//! description) into matched / missing / nice-to-have partitions.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod matching;
pub mod output;

pub use catalog::{CanonicalSkill, SkillCatalog};
pub use config::Config;
pub use embedding::{EmbeddingProvider, HashEmbedder};
pub use error::{Result, SkillMatcherError};
pub use matching::comparator::{CompareOptions, ComparisonResult, SkillComparator};
pub use matching::extractor::{ExtractionOptions, ExtractionResult, SkillExtractor, SkillMatch};

//! CV / job description skill reconciliation
//!
//! Runs the extractor on both texts and partitions the union of extracted
//! skills into matched (required and present), missing (required, absent or
//! too weak in the CV), and nice-to-have (present in the CV, not required).

use crate::embedding::{round2, round4};
use crate::error::{Result, SkillMatcherError};
use crate::matching::extractor::{ExtractionOptions, ExtractionResult, SkillExtractor};
use crate::matching::segmenter::DEFAULT_MAX_CHUNK_SIZE;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Inclusion-stage threshold used for both extractions.
    pub threshold: f32,
    /// Minimum similarity for a required skill to count as satisfied.
    /// Must be >= `threshold`; lower values are clamped up.
    pub match_threshold: f32,
    pub max_chunk_size: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            threshold: crate::matching::extractor::DEFAULT_THRESHOLD,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedSkill {
    pub skill: String,
    pub category: String,
    /// Best of the two sides.
    pub similarity: f32,
    pub cv_similarity: f32,
    pub jd_similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub skill: String,
    pub category: String,
    pub jd_similarity: f32,
    /// Sub-threshold CV similarity, 0 when the CV extraction lacks the skill.
    pub cv_similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NiceToHaveSkill {
    pub skill: String,
    pub category: String,
    pub similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_matched: usize,
    pub total_missing: usize,
    pub total_nice_to_have: usize,
    /// matched / JD skills * 100, 0 when the JD yields no skills.
    pub match_percentage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub matched: Vec<MatchedSkill>,
    pub missing: Vec<MissingSkill>,
    pub nice_to_have: Vec<NiceToHaveSkill>,
    pub summary: ComparisonSummary,
}

pub struct SkillComparator {
    extractor: SkillExtractor,
}

impl SkillComparator {
    pub fn new(extractor: SkillExtractor) -> Self {
        Self { extractor }
    }

    /// Compare CV skills against job description skills.
    ///
    /// Job description text is required; an empty CV is legal and simply
    /// leaves every required skill missing. The two extractions run
    /// concurrently. Recomputed in full on every call; there is no hidden
    /// state beyond the catalog caches.
    pub async fn compare(
        &self,
        cv_text: &str,
        jd_text: &str,
        options: &CompareOptions,
    ) -> Result<ComparisonResult> {
        if jd_text.trim().is_empty() {
            return Err(SkillMatcherError::InvalidInput(
                "job description text is required".to_string(),
            ));
        }

        let match_threshold = if options.match_threshold < options.threshold {
            warn!(
                "match threshold {} below extraction threshold {}, clamping up",
                options.match_threshold, options.threshold
            );
            options.threshold
        } else {
            options.match_threshold
        };

        let extraction_options = ExtractionOptions {
            threshold: options.threshold,
            max_chunk_size: options.max_chunk_size,
            skip_filter: false,
        };

        let (cv, jd) = tokio::try_join!(
            self.extractor.extract(cv_text, &extraction_options),
            self.extractor.extract(jd_text, &extraction_options),
        )?;

        Ok(reconcile(&cv, &jd, match_threshold))
    }
}

/// Pure set reconciliation between two extraction results.
///
/// A skill is matched only when the CV extraction contains it and the best
/// of its two similarities clears `match_threshold`; a skill the CV never
/// surfaced stays missing no matter how strongly the JD scored it.
fn reconcile(cv: &ExtractionResult, jd: &ExtractionResult, match_threshold: f32) -> ComparisonResult {
    let cv_similarities: HashMap<&str, f32> = cv
        .skills
        .iter()
        .map(|m| (m.skill.as_str(), m.similarity))
        .collect();
    let jd_names: HashSet<&str> = jd.skills.iter().map(|m| m.skill.as_str()).collect();

    let mut matched = Vec::new();
    let mut matched_names: HashSet<&str> = HashSet::new();

    for jd_skill in &jd.skills {
        if let Some(&cv_similarity) = cv_similarities.get(jd_skill.skill.as_str()) {
            let best = jd_skill.similarity.max(cv_similarity);
            if best >= match_threshold {
                matched.push(MatchedSkill {
                    skill: jd_skill.skill.clone(),
                    category: jd_skill.category.clone(),
                    similarity: round4(best),
                    cv_similarity,
                    jd_similarity: jd_skill.similarity,
                });
                matched_names.insert(jd_skill.skill.as_str());
            }
        }
    }

    let mut missing = Vec::new();
    for jd_skill in &jd.skills {
        if matched_names.contains(jd_skill.skill.as_str()) {
            continue;
        }
        missing.push(MissingSkill {
            skill: jd_skill.skill.clone(),
            category: jd_skill.category.clone(),
            jd_similarity: jd_skill.similarity,
            cv_similarity: cv_similarities
                .get(jd_skill.skill.as_str())
                .copied()
                .unwrap_or(0.0),
        });
    }

    let mut nice_to_have = Vec::new();
    for cv_skill in &cv.skills {
        if matched_names.contains(cv_skill.skill.as_str())
            || jd_names.contains(cv_skill.skill.as_str())
        {
            continue;
        }
        nice_to_have.push(NiceToHaveSkill {
            skill: cv_skill.skill.clone(),
            category: cv_skill.category.clone(),
            similarity: cv_skill.similarity,
        });
    }

    matched.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    missing.sort_by(|a, b| b.jd_similarity.total_cmp(&a.jd_similarity));
    nice_to_have.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    let match_percentage = if jd.skills.is_empty() {
        0.0
    } else {
        round2(matched.len() as f32 / jd.skills.len() as f32 * 100.0)
    };

    ComparisonResult {
        summary: ComparisonSummary {
            total_matched: matched.len(),
            total_missing: missing.len(),
            total_nice_to_have: nice_to_have.len(),
            match_percentage,
        },
        matched,
        missing,
        nice_to_have,
    }
}

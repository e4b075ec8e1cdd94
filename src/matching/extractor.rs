//! Embedding-based skill extraction from free-form text
//!
//! Orchestrates segmentation, candidate filtering, and per-skill best-match
//! scoring: each chunk is embedded once, every candidate skill keeps the
//! maximum similarity across all chunks, and the result is gated at the
//! threshold and ranked.

use crate::catalog::{CanonicalSkill, SkillCatalog};
use crate::embedding::{cosine_similarity, round4, EmbeddingProvider};
use crate::error::{Result, SkillMatcherError};
use crate::matching::filter::CandidateFilter;
use crate::matching::segmenter::{self, DEFAULT_MAX_CHUNK_SIZE};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Minimum cosine similarity for a skill to count as present.
    pub threshold: f32,
    /// Maximum chunk length handed to the segmenter.
    pub max_chunk_size: usize,
    /// Score every catalog skill instead of pre-filtered candidates only.
    /// Slower; recovers skills the lexical pre-screen would miss.
    pub skip_filter: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            skip_filter: false,
        }
    }
}

/// One extracted skill: the best similarity between any chunk of the input
/// and the skill's canonical embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub category: String,
    pub similarity: f32,
}

/// Ranked extraction output plus segmentation diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Descending by similarity; ties keep catalog order.
    pub skills: Vec<SkillMatch>,
    pub chunks: Vec<String>,
    pub chunk_count: usize,
    pub candidate_count: usize,
}

impl ExtractionResult {
    fn empty() -> Self {
        Self {
            skills: Vec::new(),
            chunks: Vec::new(),
            chunk_count: 0,
            candidate_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

pub struct SkillExtractor {
    catalog: Arc<SkillCatalog>,
    provider: Arc<dyn EmbeddingProvider>,
    filter: CandidateFilter,
}

impl SkillExtractor {
    pub fn new(catalog: Arc<SkillCatalog>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            catalog,
            provider,
            filter: CandidateFilter::new(),
        }
    }

    pub fn with_filter(
        catalog: Arc<SkillCatalog>,
        provider: Arc<dyn EmbeddingProvider>,
        filter: CandidateFilter,
    ) -> Self {
        Self {
            catalog,
            provider,
            filter,
        }
    }

    /// Extract canonical skills from `text`.
    ///
    /// Empty or whitespace-only text yields an empty result. An embedding
    /// provider failure fails the whole call; a silently zero-scored skill
    /// would corrupt downstream comparisons.
    ///
    /// Skills rejected by the candidate pre-filter are never scored, so
    /// they cannot appear in the result even if their true similarity would
    /// clear the threshold. That is the intended precision/performance
    /// trade-off; set `skip_filter` to disable it.
    pub async fn extract(
        &self,
        text: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult> {
        if text.trim().is_empty() {
            return Ok(ExtractionResult::empty());
        }

        let skills = self.catalog.load_skills().await?;
        let skill_embeddings = self.catalog.skill_embeddings(self.provider.as_ref()).await?;

        let chunks = segmenter::segment(text, options.max_chunk_size);
        let candidates = if options.skip_filter {
            skills.as_ref().clone()
        } else {
            self.filter.filter_candidates(&chunks, &skills)?
        };
        debug!(
            "segmented into {} chunks, {} of {} skills remain after pre-filter",
            chunks.len(),
            candidates.len(),
            skills.len()
        );

        // One provider call per unique chunk; this cache lives only for the
        // duration of the call.
        let mut chunk_embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            chunk_embeddings.push(self.provider.embed(chunk).await?);
        }

        let scored = best_similarity_per_skill(&candidates, &chunk_embeddings, &skill_embeddings)?;

        let mut matches: Vec<SkillMatch> = scored
            .into_iter()
            .filter(|(_, similarity)| *similarity >= options.threshold)
            .map(|(skill, similarity)| SkillMatch {
                skill: skill.name,
                category: skill.category,
                similarity: round4(similarity),
            })
            .collect();

        // Stable sort: equal scores keep catalog insertion order.
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        Ok(ExtractionResult {
            skills: matches,
            chunk_count: chunks.len(),
            candidate_count: candidates.len(),
            chunks,
        })
    }
}

/// Fold over (skill, chunk) pairs keeping the maximum similarity per skill.
/// Pure with respect to its inputs; candidate order is preserved.
fn best_similarity_per_skill(
    candidates: &[CanonicalSkill],
    chunk_embeddings: &[Vec<f32>],
    skill_embeddings: &HashMap<String, Arc<Vec<f32>>>,
) -> Result<Vec<(CanonicalSkill, f32)>> {
    candidates
        .iter()
        .map(|skill| {
            let skill_vector = skill_embeddings.get(&skill.name).ok_or_else(|| {
                SkillMatcherError::Embedding(format!(
                    "no cached embedding for catalog skill '{}'",
                    skill.name
                ))
            })?;

            let mut best = 0.0f32;
            for chunk_vector in chunk_embeddings {
                best = best.max(cosine_similarity(chunk_vector, skill_vector)?);
            }

            Ok((skill.clone(), best))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Keyword-presence embedder: one dimension per vocabulary term set to
    /// 1.0 when the term appears in the text, plus a constant bias dimension
    /// so unrelated texts score low but non-zero.
    struct KeywordProvider {
        vocabulary: Vec<&'static str>,
    }

    impl KeywordProvider {
        fn new() -> Self {
            Self {
                vocabulary: vec!["python", "docker", "rust"],
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            let mut vector: Vec<f32> = self
                .vocabulary
                .iter()
                .map(|term| if lower.contains(term) { 1.0 } else { 0.0 })
                .collect();
            vector.push(0.25);
            Ok(vector)
        }

        fn dimension(&self) -> usize {
            self.vocabulary.len() + 1
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SkillMatcherError::Embedding("backend unavailable".to_string()))
        }

        fn dimension(&self) -> usize {
            0
        }
    }

    const TAXONOMY: &str = r#"{
        "categories": {
            "programming_languages": ["Python", "Rust"],
            "devops_tools": ["Docker"]
        }
    }"#;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(
            Arc::new(SkillCatalog::from_json(TAXONOMY)),
            Arc::new(KeywordProvider::new()),
        )
    }

    #[tokio::test]
    async fn test_empty_text_yields_empty_result() {
        let result = extractor()
            .extract("   \n ", &ExtractionOptions::default())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.chunk_count, 0);
    }

    #[tokio::test]
    async fn test_extracts_mentioned_skills() {
        let result = extractor()
            .extract(
                "5 years Python experience, Docker deployments",
                &ExtractionOptions::default(),
            )
            .await
            .unwrap();

        let names: Vec<&str> = result.skills.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(names, vec!["Python", "Docker"]);
        assert_eq!(result.skills[0].category, "programming_languages");
        for m in &result.skills {
            assert!(m.similarity >= DEFAULT_THRESHOLD);
            assert!(m.similarity <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_ties_keep_catalog_order() {
        // Both chunks contain exactly their skill term, so both score 1.0;
        // Python precedes Docker in the taxonomy.
        let result = extractor()
            .extract("Docker, Python", &ExtractionOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = result.skills.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(names, vec!["Python", "Docker"]);
    }

    #[tokio::test]
    async fn test_threshold_is_monotonic() {
        let extractor = extractor();
        let text = "Python services in Docker containers";

        let loose = extractor
            .extract(
                text,
                &ExtractionOptions {
                    threshold: 0.1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let strict = extractor
            .extract(
                text,
                &ExtractionOptions {
                    threshold: 0.9,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        for m in &strict.skills {
            assert!(
                loose.skills.iter().any(|l| l.skill == m.skill),
                "raising the threshold must never add skills"
            );
        }
        assert!(strict.skills.len() <= loose.skills.len());
    }

    #[tokio::test]
    async fn test_zero_threshold_includes_verbatim_mention() {
        let result = extractor()
            .extract(
                "I use Python daily",
                &ExtractionOptions {
                    threshold: 0.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.skills.iter().any(|m| m.skill == "Python"));
    }

    #[tokio::test]
    async fn test_prefiltered_skills_are_never_scored() {
        // "Rust" appears nowhere in the text, so the pre-filter drops it and
        // it cannot surface even at threshold 0.
        let extractor = extractor();
        let options = ExtractionOptions {
            threshold: 0.0,
            ..Default::default()
        };
        let filtered = extractor
            .extract("Python data pipelines", &options)
            .await
            .unwrap();
        assert!(!filtered.skills.iter().any(|m| m.skill == "Rust"));

        let unfiltered = extractor
            .extract(
                "Python data pipelines",
                &ExtractionOptions {
                    skip_filter: true,
                    threshold: 0.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(unfiltered.skills.iter().any(|m| m.skill == "Rust"));
    }

    #[tokio::test]
    async fn test_provider_failure_fails_extraction() {
        let extractor = SkillExtractor::new(
            Arc::new(SkillCatalog::from_json(TAXONOMY)),
            Arc::new(FailingProvider),
        );
        let err = extractor
            .extract("Python experience", &ExtractionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SkillMatcherError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_extraction_is_deterministic() {
        let extractor = extractor();
        let text = "Python, Docker; Rust tooling";
        let first = extractor
            .extract(text, &ExtractionOptions::default())
            .await
            .unwrap();
        let second = extractor
            .extract(text, &ExtractionOptions::default())
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}

//! Canonical skill taxonomy and per-skill embedding cache
//!
//! The taxonomy is static configuration: an ordered list of categories, each
//! with an ordered list of skill names. Parsed once, validated, and shared
//! read-only. Skill embeddings are computed lazily on first use (one provider
//! call per skill) and reused for the process lifetime; `clear_cache` is the
//! only invalidation.

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SkillMatcherError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Taxonomy bundled into the binary so it runs without external data files.
const DEFAULT_TAXONOMY: &str = include_str!("../data/skills.json");

/// A named entry in the fixed taxonomy. Identity is `name`, which is unique
/// across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSkill {
    pub name: String,
    pub category: String,
}

enum TaxonomySource {
    BuiltIn,
    File(PathBuf),
    Inline(String),
}

#[derive(Default)]
struct CatalogState {
    skills: Option<Arc<Vec<CanonicalSkill>>>,
    embeddings: HashMap<String, Arc<Vec<f32>>>,
}

/// Skill list plus embedding cache with an explicit lifecycle.
///
/// Both caches populate lazily behind one async mutex, so concurrent
/// first-use races serialize into a single load / embedding pass.
pub struct SkillCatalog {
    source: TaxonomySource,
    state: Mutex<CatalogState>,
}

impl SkillCatalog {
    /// Catalog backed by the bundled `data/skills.json`.
    pub fn built_in() -> Self {
        Self {
            source: TaxonomySource::BuiltIn,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Catalog backed by a taxonomy file on disk.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: TaxonomySource::File(path.into()),
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Catalog backed by an in-memory JSON document.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            source: TaxonomySource::Inline(json.into()),
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Canonical skill list in taxonomy order. Idempotent; the source is
    /// read and validated once, on first call.
    pub async fn load_skills(&self) -> Result<Arc<Vec<CanonicalSkill>>> {
        let mut state = self.state.lock().await;
        self.load_skills_locked(&mut state)
    }

    /// Mapping from skill name to its canonical embedding.
    ///
    /// Missing entries are computed in catalog order; already-cached entries
    /// are never recomputed. The lock is held for the whole pass, so only
    /// one embedding pass happens even under concurrent first use.
    pub async fn skill_embeddings(
        &self,
        provider: &dyn EmbeddingProvider,
    ) -> Result<HashMap<String, Arc<Vec<f32>>>> {
        let mut state = self.state.lock().await;
        let skills = self.load_skills_locked(&mut state)?;

        let mut computed = 0usize;
        for skill in skills.iter() {
            if state.embeddings.contains_key(&skill.name) {
                continue;
            }
            let vector = provider.embed(&skill.name).await?;
            state.embeddings.insert(skill.name.clone(), Arc::new(vector));
            computed += 1;
        }

        if computed > 0 {
            info!("generated embeddings for {} catalog skills", computed);
        }

        Ok(state.embeddings.clone())
    }

    /// Eagerly populate both caches. Returns the number of skills embedded
    /// by this call (0 when already warm).
    pub async fn warm(&self, provider: &dyn EmbeddingProvider) -> Result<usize> {
        let mut state = self.state.lock().await;
        let skills = self.load_skills_locked(&mut state)?;
        let before = state.embeddings.len();

        for skill in skills.iter() {
            if state.embeddings.contains_key(&skill.name) {
                continue;
            }
            let vector = provider.embed(&skill.name).await?;
            state.embeddings.insert(skill.name.clone(), Arc::new(vector));
        }

        Ok(state.embeddings.len() - before)
    }

    /// Drop both caches; the next call reloads the taxonomy and recomputes
    /// embeddings. Used for tests and taxonomy hot-reload.
    pub async fn clear_cache(&self) {
        let mut state = self.state.lock().await;
        state.skills = None;
        state.embeddings.clear();
        debug!("skill catalog caches cleared");
    }

    fn load_skills_locked(&self, state: &mut CatalogState) -> Result<Arc<Vec<CanonicalSkill>>> {
        if let Some(skills) = &state.skills {
            return Ok(Arc::clone(skills));
        }

        let raw = match &self.source {
            TaxonomySource::BuiltIn => DEFAULT_TAXONOMY.to_string(),
            TaxonomySource::Inline(json) => json.clone(),
            TaxonomySource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                SkillMatcherError::CatalogLoad(format!(
                    "failed to read taxonomy file {}: {}",
                    path.display(),
                    e
                ))
            })?,
        };

        let skills = Arc::new(parse_taxonomy(&raw)?);
        info!("loaded {} canonical skills", skills.len());
        state.skills = Some(Arc::clone(&skills));
        Ok(skills)
    }
}

#[derive(Deserialize)]
struct TaxonomyFile {
    categories: serde_json::Map<String, serde_json::Value>,
}

/// Parse and validate the taxonomy JSON. Category and skill order are
/// preserved; duplicate names and empty fields are malformed.
fn parse_taxonomy(raw: &str) -> Result<Vec<CanonicalSkill>> {
    let file: TaxonomyFile = serde_json::from_str(raw)
        .map_err(|e| SkillMatcherError::CatalogLoad(format!("malformed taxonomy JSON: {}", e)))?;

    if file.categories.is_empty() {
        return Err(SkillMatcherError::CatalogLoad(
            "taxonomy has no categories".to_string(),
        ));
    }

    let mut skills = Vec::new();
    let mut seen = HashSet::new();

    for (category, entries) in &file.categories {
        if category.trim().is_empty() {
            return Err(SkillMatcherError::CatalogLoad(
                "taxonomy contains an empty category name".to_string(),
            ));
        }

        let entries = entries.as_array().ok_or_else(|| {
            SkillMatcherError::CatalogLoad(format!(
                "category '{}' is not an array of skill names",
                category
            ))
        })?;

        for entry in entries {
            let name = entry.as_str().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(SkillMatcherError::CatalogLoad(format!(
                    "category '{}' contains an empty or non-string skill name",
                    category
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(SkillMatcherError::CatalogLoad(format!(
                    "duplicate skill name '{}' in taxonomy",
                    name
                )));
            }
            skills.push(CanonicalSkill {
                name: name.to_string(),
                category: category.clone(),
            });
        }
    }

    if skills.is_empty() {
        return Err(SkillMatcherError::CatalogLoad(
            "taxonomy contains no skills".to_string(),
        ));
    }

    Ok(skills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    const TAXONOMY: &str = r#"{
        "categories": {
            "programming_languages": ["Python", "Rust"],
            "devops_tools": ["Docker"]
        }
    }"#;

    #[tokio::test]
    async fn test_load_skills_preserves_order() {
        let catalog = SkillCatalog::from_json(TAXONOMY);
        let skills = catalog.load_skills().await.unwrap();

        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Rust", "Docker"]);
        assert_eq!(skills[0].category, "programming_languages");
        assert_eq!(skills[2].category, "devops_tools");
    }

    #[tokio::test]
    async fn test_duplicate_skill_name_is_malformed() {
        let catalog = SkillCatalog::from_json(
            r#"{"categories": {"a": ["Python"], "b": ["Python"]}}"#,
        );
        let err = catalog.load_skills().await.unwrap_err();
        assert!(matches!(err, SkillMatcherError::CatalogLoad(_)));
    }

    #[tokio::test]
    async fn test_empty_category_is_malformed() {
        let catalog = SkillCatalog::from_json(r#"{"categories": {"  ": ["Python"]}}"#);
        assert!(catalog.load_skills().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_catalog_load_error() {
        let catalog = SkillCatalog::from_file("/nonexistent/skills.json");
        let err = catalog.load_skills().await.unwrap_err();
        assert!(matches!(err, SkillMatcherError::CatalogLoad(_)));
    }

    #[tokio::test]
    async fn test_embeddings_computed_once() {
        let catalog = SkillCatalog::from_json(TAXONOMY);
        let provider = CountingProvider::new();

        let first = catalog.skill_embeddings(&provider).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(provider.call_count(), 3);

        let second = catalog.skill_embeddings(&provider).await.unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(provider.call_count(), 3, "cached entries must not recompute");
    }

    #[tokio::test]
    async fn test_clear_cache_forces_recompute() {
        let catalog = SkillCatalog::from_json(TAXONOMY);
        let provider = CountingProvider::new();

        catalog.skill_embeddings(&provider).await.unwrap();
        catalog.clear_cache().await;
        catalog.skill_embeddings(&provider).await.unwrap();

        assert_eq!(provider.call_count(), 6);
    }

    #[tokio::test]
    async fn test_warm_reports_embedded_count() {
        let catalog = SkillCatalog::from_json(TAXONOMY);
        let provider = CountingProvider::new();

        assert_eq!(catalog.warm(&provider).await.unwrap(), 3);
        assert_eq!(catalog.warm(&provider).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_built_in_taxonomy_is_valid() {
        let catalog = SkillCatalog::built_in();
        let skills = catalog.load_skills().await.unwrap();
        assert!(skills.iter().any(|s| s.name == "Python"));
        assert!(skills.iter().any(|s| s.name == "Docker"));
    }

    #[tokio::test]
    async fn test_taxonomy_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, TAXONOMY).unwrap();

        let catalog = SkillCatalog::from_file(&path);
        let skills = catalog.load_skills().await.unwrap();
        assert_eq!(skills.len(), 3);
    }
}

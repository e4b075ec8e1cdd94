//! Lexical candidate pre-screen
//!
//! Narrows the catalog to skills that could plausibly appear in the text
//! before any embedding comparison runs, turning O(chunks × all-skills)
//! scoring into O(chunks × candidates). Recall-oriented: a false positive
//! costs one wasted embedding comparison, a false negative silently drops a
//! skill, so the alias table exists to cover the abbreviation mismatches
//! that word matching misses (k8s, postgres, cpp, ...).

use crate::catalog::CanonicalSkill;
use crate::error::{Result, SkillMatcherError};
use aho_corasick::AhoCorasick;
use serde_json::Value;

/// Alias table bundled into the binary; callers can supply their own via
/// [`CandidateFilter::from_alias_json`].
const DEFAULT_ALIASES: &str = include_str!("../../data/aliases.json");

/// Words of a skill name shorter than this ("on", "of", "db") are too
/// generic to use as match evidence.
const MIN_WORD_LEN: usize = 3;

#[derive(Debug, Clone)]
struct AliasEntry {
    key: String,
    variants: Vec<String>,
}

/// Case-insensitive lexical pre-filter with a variant-spelling alias table.
pub struct CandidateFilter {
    aliases: Vec<AliasEntry>,
}

impl CandidateFilter {
    /// Filter with the bundled alias table.
    pub fn new() -> Self {
        Self::from_alias_json(DEFAULT_ALIASES)
            .expect("bundled alias table is valid")
    }

    /// Filter with a caller-provided alias table: a JSON object mapping a
    /// canonical spelling to its list of variant spellings. Entry order is
    /// preserved; the first entry matching a skill name wins.
    pub fn from_alias_json(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json).map_err(|e| {
            SkillMatcherError::Configuration(format!("malformed alias table: {}", e))
        })?;

        let object = root.as_object().ok_or_else(|| {
            SkillMatcherError::Configuration("alias table must be a JSON object".to_string())
        })?;

        let mut aliases = Vec::with_capacity(object.len());
        for (key, value) in object {
            let variants: Vec<String> = value
                .as_array()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(|s| s.to_lowercase())
                        .collect()
                })
                .unwrap_or_default();

            if variants.is_empty() {
                return Err(SkillMatcherError::Configuration(format!(
                    "alias entry '{}' has no variants",
                    key
                )));
            }

            aliases.push(AliasEntry {
                key: key.to_lowercase(),
                variants,
            });
        }

        Ok(Self { aliases })
    }

    /// Could `skill_name` plausibly be mentioned in `chunk`?
    ///
    /// Case-insensitive. Direct substring containment always qualifies.
    /// Skills covered by the alias table are otherwise decided solely by
    /// variant containment; for the rest, any word of the name longer than
    /// two characters appearing in the chunk qualifies.
    pub fn is_candidate(&self, chunk: &str, skill_name: &str) -> bool {
        let chunk = chunk.to_lowercase();
        let name = skill_name.to_lowercase();

        if chunk.contains(&name) {
            return true;
        }

        if let Some(entry) = self.alias_entry(&name) {
            return entry.variants.iter().any(|variant| chunk.contains(variant));
        }

        name.split_whitespace()
            .filter(|word| word.len() >= MIN_WORD_LEN)
            .any(|word| chunk.contains(word))
    }

    /// Subsequence of `skills` (catalog order preserved) where at least one
    /// chunk satisfies [`CandidateFilter::is_candidate`].
    ///
    /// All per-skill patterns are compiled into one Aho-Corasick automaton so
    /// each chunk is scanned once, instead of once per skill.
    pub fn filter_candidates(
        &self,
        chunks: &[String],
        skills: &[CanonicalSkill],
    ) -> Result<Vec<CanonicalSkill>> {
        if chunks.is_empty() || skills.is_empty() {
            return Ok(Vec::new());
        }

        let mut patterns: Vec<String> = Vec::new();
        let mut owners: Vec<usize> = Vec::new();

        for (index, skill) in skills.iter().enumerate() {
            let name = skill.name.to_lowercase();

            patterns.push(name.clone());
            owners.push(index);

            match self.alias_entry(&name) {
                Some(entry) => {
                    for variant in &entry.variants {
                        patterns.push(variant.clone());
                        owners.push(index);
                    }
                }
                None => {
                    for word in name
                        .split_whitespace()
                        .filter(|word| word.len() >= MIN_WORD_LEN)
                    {
                        patterns.push(word.to_string());
                        owners.push(index);
                    }
                }
            }
        }

        let automaton = AhoCorasick::new(&patterns).map_err(|e| {
            SkillMatcherError::Configuration(format!("failed to build candidate matcher: {}", e))
        })?;

        // Patterns are already lowercased; lowercasing the chunk the same way
        // keeps this path equivalent to `is_candidate` beyond ASCII.
        let mut is_hit = vec![false; skills.len()];
        for chunk in chunks {
            let chunk = chunk.to_lowercase();
            for mat in automaton.find_overlapping_iter(&chunk) {
                is_hit[owners[mat.pattern().as_usize()]] = true;
            }
        }

        Ok(skills
            .iter()
            .zip(is_hit)
            .filter(|(_, hit)| *hit)
            .map(|(skill, _)| skill.clone())
            .collect())
    }

    fn alias_entry(&self, name_lower: &str) -> Option<&AliasEntry> {
        self.aliases.iter().find(|entry| {
            name_lower.contains(&entry.key)
                || entry.variants.iter().any(|variant| variant == name_lower)
        })
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, category: &str) -> CanonicalSkill {
        CanonicalSkill {
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_verbatim_containment_is_always_candidate() {
        let filter = CandidateFilter::new();
        assert!(filter.is_candidate("5 years Python experience", "Python"));
        assert!(filter.is_candidate("5 YEARS PYTHON EXPERIENCE", "Python"));
        assert!(filter.is_candidate("we run node.js in production", "Node.js"));
    }

    #[test]
    fn test_alias_variants_cover_abbreviations() {
        let filter = CandidateFilter::new();
        assert!(filter.is_candidate("managing k8s clusters", "Kubernetes"));
        assert!(filter.is_candidate("postgres tuning", "PostgreSQL"));
        assert!(filter.is_candidate("modern cpp development", "C++"));
        assert!(filter.is_candidate("node backend services", "Node.js"));
    }

    #[test]
    fn test_word_match_for_multi_word_names() {
        let filter = CandidateFilter::new();
        // "Spring Boot" is not aliased; the word "spring" is evidence enough.
        assert!(filter.is_candidate("spring microservices", "Spring Boot"));
        // Containment is literal: "boost" does not contain "boot".
        assert!(!filter.is_candidate("getting a boost", "Spring Boot"));
        // Aliased skills are decided by their variants alone.
        assert!(!filter.is_candidate("working on things", "Ruby on Rails"));
    }

    #[test]
    fn test_unrelated_chunk_is_not_candidate() {
        let filter = CandidateFilter::new();
        assert!(!filter.is_candidate("customer support phone line", "Kubernetes"));
        assert!(!filter.is_candidate("warehouse logistics", "Python"));
    }

    #[test]
    fn test_filter_candidates_preserves_catalog_order() {
        let filter = CandidateFilter::new();
        let skills = vec![
            skill("Python", "programming_languages"),
            skill("Docker", "devops_tools"),
            skill("Kubernetes", "devops_tools"),
        ];
        let chunks = vec![
            "k8s and docker deployments".to_string(),
            "python scripting".to_string(),
        ];

        let candidates = filter.filter_candidates(&chunks, &skills).unwrap();
        let names: Vec<&str> = candidates.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Docker", "Kubernetes"]);
    }

    #[test]
    fn test_filter_candidates_excludes_absent_skills() {
        let filter = CandidateFilter::new();
        let skills = vec![
            skill("Python", "programming_languages"),
            skill("Terraform", "devops_tools"),
        ];
        let chunks = vec!["python data pipelines".to_string()];

        let candidates = filter.filter_candidates(&chunks, &skills).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Python");
    }

    #[test]
    fn test_batch_path_agrees_with_single_path() {
        let filter = CandidateFilter::new();
        let skills = vec![
            skill("Python", "programming_languages"),
            skill("JavaScript", "programming_languages"),
            skill("Kubernetes", "devops_tools"),
            skill("Machine Learning", "data_science"),
            skill("Ruby on Rails", "web_frameworks"),
        ];
        let chunks = vec![
            "JS and rails development".to_string(),
            "trained machine learning models".to_string(),
        ];

        let batch = filter.filter_candidates(&chunks, &skills).unwrap();
        for skill in &skills {
            let single = chunks
                .iter()
                .any(|chunk| filter.is_candidate(chunk, &skill.name));
            assert_eq!(
                batch.iter().any(|c| c.name == skill.name),
                single,
                "paths disagree for {}",
                skill.name
            );
        }
    }

    #[test]
    fn test_batch_path_is_case_insensitive_beyond_ascii() {
        let filter = CandidateFilter::new();
        let skills = vec![
            skill("Čeština", "languages"),
            skill("Python", "programming_languages"),
        ];
        let chunks = vec!["documentation in ČEŠTINA".to_string()];

        assert!(filter.is_candidate(&chunks[0], "Čeština"));

        let candidates = filter.filter_candidates(&chunks, &skills).unwrap();
        let names: Vec<&str> = candidates.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Čeština"]);
    }

    #[test]
    fn test_custom_alias_table() {
        let filter =
            CandidateFilter::from_alias_json(r#"{"golang": ["golang", "go"]}"#).unwrap();
        assert!(filter.is_candidate("backend in go services", "Golang"));
    }

    #[test]
    fn test_malformed_alias_table_is_rejected() {
        assert!(CandidateFilter::from_alias_json("[1, 2]").is_err());
        assert!(CandidateFilter::from_alias_json(r#"{"x": []}"#).is_err());
    }
}

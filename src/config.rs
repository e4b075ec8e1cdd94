//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatcherError};
use crate::matching::comparator::{CompareOptions, DEFAULT_MATCH_THRESHOLD};
use crate::matching::extractor::{ExtractionOptions, DEFAULT_THRESHOLD};
use crate::matching::segmenter::DEFAULT_MAX_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Inclusion-stage similarity threshold for extraction.
    pub threshold: f32,
    /// Threshold for a required skill to count as satisfied in comparisons.
    pub match_threshold: f32,
    pub max_chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Taxonomy JSON file; the bundled taxonomy is used when unset.
    pub taxonomy_path: Option<PathBuf>,
    /// Alias table JSON file; the bundled table is used when unset.
    pub alias_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                threshold: DEFAULT_THRESHOLD,
                match_threshold: DEFAULT_MATCH_THRESHOLD,
                max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            },
            data: DataConfig {
                taxonomy_path: None,
                alias_path: None,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                SkillMatcherError::Configuration(format!("failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SkillMatcherError::Configuration(format!("failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;
        if !(0.0..=1.0).contains(&m.threshold) || !(0.0..=1.0).contains(&m.match_threshold) {
            return Err(SkillMatcherError::Configuration(
                "thresholds must be within [0, 1]".to_string(),
            ));
        }
        if m.max_chunk_size == 0 {
            return Err(SkillMatcherError::Configuration(
                "max_chunk_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            threshold: self.matching.threshold,
            max_chunk_size: self.matching.max_chunk_size,
            skip_filter: false,
        }
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            threshold: self.matching.threshold,
            match_threshold: self.matching.match_threshold,
            max_chunk_size: self.matching.max_chunk_size,
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }
}

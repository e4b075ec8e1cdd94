//! Embedding provider abstraction and vector similarity
//!
//! The matching core only depends on a "text in, fixed-length vector out"
//! capability. Real model backends (Model2Vec, ONNX, remote APIs) live behind
//! [`EmbeddingProvider`]; [`HashEmbedder`] is a deterministic lexical fallback
//! so the binary works without a model download.

use crate::error::{Result, SkillMatcherError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Abstract text-to-vector capability.
///
/// Implementations must be deterministic for identical input and should
/// return vectors suitable for cosine comparison. Calls are treated as
/// independent, retryable I/O-bound operations; a failure fails the whole
/// extraction call rather than silently scoring a skill as zero.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension, used for diagnostics only.
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two embeddings, clamped to `[0, 1]`.
///
/// Dimension mismatch is a provider contract violation and fails loudly.
/// Zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillMatcherError::Embedding(format!(
            "embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(0.0, 1.0))
}

/// Round to 4 decimal digits before reporting, for deterministic comparisons.
pub fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal digits (percentages).
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Deterministic bag-of-words embedder using the hashing trick.
///
/// Tokens are lowercased, stop-word filtered, FNV-1a hashed into a
/// fixed-dimension term-frequency vector, and L2-normalized. Identical
/// input always yields an identical vector, across runs and platforms.
/// Not a semantic model; good enough for lexical overlap scoring and as
/// a default backend for the CLI.
pub struct HashEmbedder {
    dimension: usize,
    stop_words: HashSet<&'static str>,
}

const DEFAULT_DIMENSION: usize = 256;

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            stop_words: Self::stop_words(),
        }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in self.tokenize(text) {
            let slot = (fnv1a(&token) % self.dimension as u64) as usize;
            vector[slot] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vector.iter_mut() {
                *x /= norm;
            }
        }

        vector
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| c.is_alphanumeric() || *c == '+' || *c == '#')
                    .collect::<String>()
                    .to_lowercase()
            })
            .filter(|token| token.len() > 1 && !self.stop_words.contains(token.as_str()))
            .collect()
    }

    fn stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in",
            "is", "it", "of", "on", "or", "that", "the", "to", "was", "we", "will", "with",
            "you", "your", "our", "their", "this", "these", "those", "they", "using",
        ]
        .into_iter()
        .collect()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.encode(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// 64-bit FNV-1a. Stable across platforms, unlike `DefaultHasher`.
fn fnv1a(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

//! Hashed TF-IDF text vectors.
//!
//! Tokens are bucketed into a fixed number of dimensions by SHA-256, weighted
//! by term frequency times a smoothed IDF taken from a [`Vocabulary`] built once
//! from the startup corpus, then L2-normalized. Similarity between vectors is
//! always cosine similarity.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::normalize::TextNormalizer;

/// Default number of hashed dimensions.
pub const DEFAULT_DIMENSIONS: usize = 1024;

/// Fixed-length numeric representation of a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vector(Vec<f32>);

impl Vector {
    #[must_use]
    pub fn zeros(dimensions: usize) -> Self {
        Self(vec![0.0; dimensions])
    }

    #[must_use]
    pub fn from_values(values: Vec<f32>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every component is zero (no similarity signal).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    #[must_use]
    pub fn norm(&self) -> f32 {
        self.0.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Cosine similarity in `[-1.0, 1.0]`.
    ///
    /// Defined as `0.0` when either side is a zero vector or the lengths differ.
    #[must_use]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.0.len() != other.0.len() {
            return 0.0;
        }
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        let dot: f32 = self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum();
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Document frequencies gathered from the startup corpus.
///
/// Immutable once built; shared by every vectorizer through an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    document_count: usize,
    document_frequency: HashMap<String, usize>,
}

impl Vocabulary {
    /// Count in how many documents each token appears.
    pub fn from_corpus<'a, I>(normalizer: &TextNormalizer, documents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut document_count = 0;
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            document_count += 1;
            let unique: HashSet<String> = normalizer.tokens(doc).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        tracing::debug!(
            documents = document_count,
            terms = document_frequency.len(),
            "vocabulary built"
        );

        Self {
            document_count,
            document_frequency,
        }
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.document_frequency.len()
    }

    /// Smoothed inverse document frequency: `ln((1 + N) / (1 + df)) + 1`.
    ///
    /// Unseen tokens get `df = 0`, the highest weight.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn idf(&self, token: &str) -> f32 {
        let df = self.document_frequency.get(token).copied().unwrap_or(0);
        let n = self.document_count as f32;
        ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0
    }
}

/// Turns text into [`Vector`]s with a fixed normalizer, vocabulary and size.
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    normalizer: Arc<TextNormalizer>,
    vocabulary: Arc<Vocabulary>,
    dimensions: usize,
}

impl TextVectorizer {
    /// `dimensions` of zero is bumped to one so every vector has a slot.
    #[must_use]
    pub fn new(
        normalizer: Arc<TextNormalizer>,
        vocabulary: Arc<Vocabulary>,
        dimensions: usize,
    ) -> Self {
        Self {
            normalizer,
            vocabulary,
            dimensions: dimensions.max(1),
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Vectorize `text`. Token-free text yields the zero vector.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vectorize(&self, text: &str) -> Vector {
        let tokens = self.normalizer.tokens(text);
        let mut values = vec![0.0_f32; self.dimensions];
        if tokens.is_empty() {
            return Vector(values);
        }

        // Ordered so float accumulation is identical on every call.
        let mut tf: BTreeMap<&str, usize> = BTreeMap::new();
        for token in &tokens {
            *tf.entry(token.as_str()).or_insert(0) += 1;
        }

        for (token, count) in tf {
            let bucket = bucket_for(token, self.dimensions);
            values[bucket] += count as f32 * self.vocabulary.idf(token);
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }
        Vector(values)
    }
}

/// Stable bucket for a token: first 8 bytes of SHA-256 as a big-endian u64,
/// modulo `dimensions`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn bucket_for(token: &str, dimensions: usize) -> usize {
    let hash = Sha256::digest(token.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    (u64::from_be_bytes(bytes) % dimensions as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer_for(corpus: &[&str]) -> TextVectorizer {
        let normalizer = Arc::new(TextNormalizer::default());
        let vocabulary = Arc::new(Vocabulary::from_corpus(&normalizer, corpus.iter().copied()));
        TextVectorizer::new(normalizer, vocabulary, DEFAULT_DIMENSIONS)
    }

    #[test]
    fn same_text_yields_identical_vectors() {
        let v = vectorizer_for(&["the cat sat", "the dog ran"]);
        let a = v.vectorize("The cat sat on the mat, the cat did.");
        let b = v.vectorize("The cat sat on the mat, the cat did.");
        assert_eq!(a, b);
    }

    #[test]
    fn blank_text_yields_zero_vector() {
        let v = vectorizer_for(&[]);
        assert!(v.vectorize("").is_zero());
        assert!(v.vectorize("   \n\t").is_zero());
        assert!(v.vectorize("@someone https://t.co/x").is_zero());
    }

    #[test]
    fn vectors_have_fixed_length_and_unit_norm() {
        let v = vectorizer_for(&["alpha beta"]);
        let vec = v.vectorize("alpha beta gamma");
        assert_eq!(vec.len(), DEFAULT_DIMENSIONS);
        assert!((vec.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_vector_similarity_is_zero() {
        let v = vectorizer_for(&["alpha"]);
        let zero = v.vectorize("");
        let other = v.vectorize("alpha");
        assert!(zero.cosine_similarity(&other).abs() < f32::EPSILON);
        assert!(zero.cosine_similarity(&zero).abs() < f32::EPSILON);
    }

    #[test]
    fn identical_texts_are_fully_similar() {
        let v = vectorizer_for(&["alpha beta"]);
        let a = v.vectorize("alpha beta");
        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn case_and_punctuation_do_not_change_vector() {
        let v = vectorizer_for(&["cats are great"]);
        assert_eq!(v.vectorize("Cats are GREAT!!!"), v.vectorize("cats are great"));
    }

    #[test]
    fn shared_words_increase_similarity() {
        let v = vectorizer_for(&["cats are great", "cats are wonderful", "stock market crash"]);
        let a = v.vectorize("cats are great");
        let b = v.vectorize("cats are wonderful");
        let c = v.vectorize("stock market crash");
        assert!(a.cosine_similarity(&b) > a.cosine_similarity(&c));
    }

    #[test]
    fn rare_terms_weigh_more_than_common_terms() {
        let normalizer = TextNormalizer::default();
        let vocab = Vocabulary::from_corpus(&normalizer, ["the cat", "the dog", "the bird"]);
        assert_eq!(vocab.document_count(), 3);
        assert!(vocab.idf("cat") > vocab.idf("the"));
        assert!(vocab.idf("unseen") > vocab.idf("cat"));
    }

    #[test]
    fn mismatched_lengths_are_not_similar() {
        let a = Vector::from_values(vec![1.0, 0.0]);
        let b = Vector::from_values(vec![1.0, 0.0, 0.0]);
        assert!(a.cosine_similarity(&b).abs() < f32::EPSILON);
    }

    #[test]
    fn bucket_is_stable_and_in_range() {
        let first = bucket_for("hello", 97);
        assert_eq!(first, bucket_for("hello", 97));
        assert!(first < 97);
    }
}
